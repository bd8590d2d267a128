//! Tests for deck handlers.

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::{App, test as actix_test, web};
use rstest::rstest;
use serde_json::{Value, json};

use super::*;
use crate::domain::{Account, Coins, Hero, ItemRef, Spell, UserId};
use crate::inbound::http::test_utils::{
    hero_fixture, login_as, spell_fixture, test_login, test_session_middleware,
};
use crate::outbound::memory::InMemoryStore;

fn test_app(
    store: Arc<InMemoryStore>,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let state = HttpState::from_repositories(store.clone(), store.clone(), store);
    App::new()
        .app_data(web::Data::new(state))
        .wrap(test_session_middleware())
        .route("/test-login/{user_id}", web::post().to(test_login))
        .service(
            web::scope("/api/v1")
                .service(list_decks)
                .service(create_deck)
                .service(add_hero)
                .service(add_spell)
                .service(get_deck)
                .service(remove_hero)
                .service(remove_spell),
        )
}

struct World {
    store: Arc<InMemoryStore>,
    user: UserId,
    owned_hero: Hero,
    unowned_hero: Hero,
    owned_spell: Spell,
}

fn world() -> World {
    let store = Arc::new(InMemoryStore::new());
    let user = UserId::random();
    store.seed_account(Account::new(user, "ada", "ada@example.com", Coins::new(100)));
    let owned_hero = hero_fixture("Knight", 160, 60, 60);
    let unowned_hero = hero_fixture("Giant", 210, 45, 80);
    let owned_spell = spell_fixture("Zap", 80, 10);
    store.seed_hero(owned_hero.clone());
    store.seed_hero(unowned_hero.clone());
    store.seed_spell(owned_spell.clone());
    store.grant(user, ItemRef::Hero(owned_hero.id));
    store.grant(user, ItemRef::Spell(owned_spell.id));
    World {
        store,
        user,
        owned_hero,
        unowned_hero,
        owned_spell,
    }
}

#[actix_web::test]
async fn first_placement_creates_a_default_deck() {
    let world = world();
    let app = actix_test::init_service(test_app(world.store.clone())).await;
    let cookie = login_as(&app, &world.user).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/decks/heroes")
            .cookie(cookie)
            .set_json(json!({"heroId": world.owned_hero.id}))
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::OK);
    let decks: Vec<Deck> = actix_test::read_body_json(res).await;
    assert_eq!(decks.len(), 1);
    assert_eq!(decks[0].hero_ids, vec![world.owned_hero.id]);
    assert_eq!(decks[0].owner, world.user);
}

#[actix_web::test]
async fn unowned_hero_is_forbidden_and_creates_nothing() {
    let world = world();
    let app = actix_test::init_service(test_app(world.store.clone())).await;
    let cookie = login_as(&app, &world.user).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/decks/heroes")
            .cookie(cookie)
            .set_json(json!({"heroId": world.unowned_hero.id}))
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["code"], "not_owned");
    assert_eq!(world.store.deck_count(&world.user), 0);
}

#[rstest]
#[case(json!({}), "missing_field")]
#[case(json!({"heroId": "nope"}), "invalid_uuid")]
#[case(json!({"heroId": "3fa85f64-5717-4562-b3fc-2c963f66afa6", "deckId": "nope"}), "invalid_uuid")]
#[actix_web::test]
async fn malformed_placement_bodies_are_rejected(#[case] body: Value, #[case] code: &str) {
    let world = world();
    let app = actix_test::init_service(test_app(world.store.clone())).await;
    let cookie = login_as(&app, &world.user).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/decks/heroes")
            .cookie(cookie)
            .set_json(body)
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["details"]["code"], code);
}

#[actix_web::test]
async fn spells_join_the_named_deck_and_can_be_removed() {
    let world = world();
    let app = actix_test::init_service(test_app(world.store.clone())).await;
    let cookie = login_as(&app, &world.user).await;

    let created = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/decks")
            .cookie(cookie.clone())
            .set_json(json!({"name": "Burn"}))
            .to_request(),
    )
    .await;
    assert_eq!(created.status(), StatusCode::CREATED);
    let created: Vec<Deck> = actix_test::read_body_json(created).await;
    let deck = created[0].id;

    let added = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/decks/spells")
            .cookie(cookie.clone())
            .set_json(json!({"deckId": deck, "spellId": world.owned_spell.id}))
            .to_request(),
    )
    .await;
    let added: Vec<Deck> = actix_test::read_body_json(added).await;
    assert_eq!(added[0].spell_ids, vec![world.owned_spell.id]);

    let removed = actix_test::call_service(
        &app,
        actix_test::TestRequest::delete()
            .uri(&format!("/api/v1/decks/{deck}/spells/{}", world.owned_spell.id))
            .cookie(cookie.clone())
            .to_request(),
    )
    .await;
    assert_eq!(removed.status(), StatusCode::OK);
    let removed: Vec<Deck> = actix_test::read_body_json(removed).await;
    assert!(removed[0].spell_ids.is_empty());

    let fetched = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri(&format!("/api/v1/decks/{deck}"))
            .cookie(cookie)
            .to_request(),
    )
    .await;
    let fetched: Deck = actix_test::read_body_json(fetched).await;
    assert_eq!(fetched.name, "Burn");
}

#[actix_web::test]
async fn foreign_decks_are_invisible() {
    let world = world();
    let intruder = UserId::random();
    world
        .store
        .seed_account(Account::new(intruder, "eve", "eve@example.com", Coins::new(0)));
    let app = actix_test::init_service(test_app(world.store.clone())).await;
    let owner_cookie = login_as(&app, &world.user).await;

    let placed = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/decks/heroes")
            .cookie(owner_cookie)
            .set_json(json!({"heroId": world.owned_hero.id}))
            .to_request(),
    )
    .await;
    let decks: Vec<Deck> = actix_test::read_body_json(placed).await;
    let deck = decks[0].id;

    let intruder_cookie = login_as(&app, &intruder).await;
    let read = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri(&format!("/api/v1/decks/{deck}"))
            .cookie(intruder_cookie.clone())
            .to_request(),
    )
    .await;
    let delete = actix_test::call_service(
        &app,
        actix_test::TestRequest::delete()
            .uri(&format!("/api/v1/decks/{deck}/heroes/{}", world.owned_hero.id))
            .cookie(intruder_cookie)
            .to_request(),
    )
    .await;

    assert_eq!(read.status(), StatusCode::NOT_FOUND);
    assert_eq!(delete.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn deck_listing_requires_a_session() {
    let world = world();
    let app = actix_test::init_service(test_app(world.store)).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::get().uri("/api/v1/decks").to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}
