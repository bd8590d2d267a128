//! Tests for catalogue handlers.

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::{App, test as actix_test, web};
use rstest::rstest;
use serde_json::{Value, json};

use super::*;
use crate::domain::{Account, Coins, ItemRef, UserId, UserRole};
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
                .service(list_heroes)
                .service(get_hero)
                .service(create_hero)
                .service(list_spells)
                .service(get_spell)
                .service(create_spell)
                .service(owned_heroes)
                .service(owned_spells),
        )
}

fn seeded_store(role: UserRole) -> (Arc<InMemoryStore>, UserId) {
    let store = Arc::new(InMemoryStore::new());
    let user = UserId::random();
    store.seed_account(
        Account::new(user, "ada", "ada@example.com", Coins::new(100)).with_role(role),
    );
    store.seed_hero(hero_fixture("Knight", 160, 60, 60));
    store.seed_hero(hero_fixture("Giant", 210, 45, 80));
    store.seed_hero(hero_fixture("Archer", 90, 60, 40));
    store.seed_spell(spell_fixture("Fireball", 325, 30));
    store.seed_spell(spell_fixture("Zap", 80, 10));
    (store, user)
}

fn names(body: &Value) -> Vec<String> {
    body["items"]
        .as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(|item| item["name"].as_str().map(str::to_owned))
                .collect()
        })
        .unwrap_or_default()
}

#[actix_web::test]
async fn listing_requires_a_session() {
    let (store, _) = seeded_store(UserRole::User);
    let app = actix_test::init_service(test_app(store)).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::get().uri("/api/v1/heroes").to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[rstest]
#[case("sortBy=damage&sortOrder=desc", &["Giant", "Knight", "Archer"])]
#[case("sortBy=name", &["Archer", "Giant", "Knight"])]
#[case("sortBy=name&filterName=I", &["Giant", "Knight"])]
#[case("sortBy=damage&pageSize=2&page=2", &["Giant"])]
#[actix_web::test]
async fn heroes_are_sorted_filtered_and_paged(#[case] query: &str, #[case] expected: &[&str]) {
    let (store, user) = seeded_store(UserRole::User);
    let app = actix_test::init_service(test_app(store)).await;
    let cookie = login_as(&app, &user).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri(&format!("/api/v1/heroes?{query}"))
            .cookie(cookie)
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(names(&body), expected);
}

#[actix_web::test]
async fn malformed_listing_options_fall_back_to_defaults() {
    let (store, user) = seeded_store(UserRole::User);
    let app = actix_test::init_service(test_app(store)).await;
    let cookie = login_as(&app, &user).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/spells?sortBy=price;drop&sortOrder=up&page=abc&pageSize=-1")
            .cookie(cookie)
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["page"], 1);
    assert_eq!(body["pageSize"], 10);
    assert_eq!(names(&body).len(), 2);
}

#[actix_web::test]
async fn malformed_hero_id_is_a_bad_request() {
    let (store, user) = seeded_store(UserRole::User);
    let app = actix_test::init_service(test_app(store)).await;
    let cookie = login_as(&app, &user).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/heroes/not-a-uuid")
            .cookie(cookie)
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["details"]["field"], "id");
}

#[actix_web::test]
async fn unknown_spell_is_not_found() {
    let (store, user) = seeded_store(UserRole::User);
    let app = actix_test::init_service(test_app(store)).await;
    let cookie = login_as(&app, &user).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri(&format!("/api/v1/spells/{}", SpellId::random()))
            .cookie(cookie)
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn hero_detail_round_trips_catalogue_entry() {
    let (store, user) = seeded_store(UserRole::User);
    let hero = hero_fixture("Valkyrie", 120, 60, 70);
    store.seed_hero(hero.clone());
    let app = actix_test::init_service(test_app(store)).await;
    let cookie = login_as(&app, &user).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri(&format!("/api/v1/heroes/{}", hero.id))
            .cookie(cookie)
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::OK);
    let body: Hero = actix_test::read_body_json(res).await;
    assert_eq!(body, hero);
}

#[rstest]
#[case(UserRole::User, StatusCode::FORBIDDEN)]
#[case(UserRole::Admin, StatusCode::CREATED)]
#[actix_web::test]
async fn only_admins_author_heroes(#[case] role: UserRole, #[case] expected: StatusCode) {
    let (store, user) = seeded_store(role);
    let app = actix_test::init_service(test_app(store)).await;
    let cookie = login_as(&app, &user).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/heroes")
            .cookie(cookie)
            .set_json(json!({"name": "Prince", "damage": 245, "speed": 60, "price": 90}))
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), expected);
}

#[actix_web::test]
async fn blank_spell_names_are_rejected() {
    let (store, user) = seeded_store(UserRole::Admin);
    let app = actix_test::init_service(test_app(store)).await;
    let cookie = login_as(&app, &user).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/spells")
            .cookie(cookie)
            .set_json(json!({"name": "   ", "damage": 10, "price": 5}))
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn unstorable_hero_prices_are_rejected() {
    let (store, user) = seeded_store(UserRole::Admin);
    let app = actix_test::init_service(test_app(store)).await;
    let cookie = login_as(&app, &user).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/heroes")
            .cookie(cookie)
            .set_json(json!({"name": "Prince", "damage": 245, "price": u64::MAX}))
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["code"], "invalid_request");
}

#[actix_web::test]
async fn collection_lists_only_owned_items() {
    let (store, user) = seeded_store(UserRole::User);
    let owned = hero_fixture("Musketeer", 100, 60, 40);
    store.seed_hero(owned.clone());
    store.grant(user, ItemRef::Hero(owned.id));
    let app = actix_test::init_service(test_app(store)).await;
    let cookie = login_as(&app, &user).await;

    let heroes = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/users/me/heroes")
            .cookie(cookie.clone())
            .to_request(),
    )
    .await;
    let spells = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/users/me/spells")
            .cookie(cookie)
            .to_request(),
    )
    .await;

    assert_eq!(heroes.status(), StatusCode::OK);
    let heroes: Vec<Hero> = actix_test::read_body_json(heroes).await;
    assert_eq!(heroes, vec![owned]);
    let spells: Vec<Spell> = actix_test::read_body_json(spells).await;
    assert!(spells.is_empty());
}
