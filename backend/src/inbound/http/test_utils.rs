//! Helpers for handler tests.

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceResponse};
use actix_web::test as actix_test;
use actix_web::{HttpResponse, web};

use crate::domain::{Coins, Hero, HeroId, Spell, SpellId, UserId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::validation::{FieldName, parse_id};

/// Cookie session middleware with a fresh key and the `Secure` flag off.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// Stand-in for the external login flow: `POST /test-login/{user_id}`.
pub async fn test_login(
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let user: UserId = parse_id(path.into_inner(), FieldName::new("userId"))?;
    session.persist_user(&user)?;
    Ok(HttpResponse::NoContent().finish())
}

/// The `session` cookie set by `res`.
///
/// # Panics
///
/// Panics when the response did not set a session cookie.
pub fn session_cookie_from<B>(res: &ServiceResponse<B>) -> Cookie<'static> {
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .map(Cookie::into_owned)
        .expect("session cookie set")
}

/// Sign `user` in through `/test-login/{user_id}` and return the cookie.
///
/// The app under test must route `test_login` at that path.
pub async fn login_as<S>(app: &S, user: &UserId) -> Cookie<'static>
where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let req = actix_test::TestRequest::post()
        .uri(&format!("/test-login/{user}"))
        .to_request();
    let res = actix_test::call_service(app, req).await;
    assert!(res.status().is_success(), "test login failed");
    session_cookie_from(&res)
}

/// A hero with plausible stats.
pub fn hero_fixture(name: &str, damage: i32, speed: i32, price: u64) -> Hero {
    Hero {
        id: HeroId::random(),
        name: name.to_owned(),
        description: format!("{name} fights for coins"),
        rarity: "common".to_owned(),
        damage_type: "melee".to_owned(),
        effect: String::new(),
        hitpoint: 500,
        damage,
        cost: 3,
        damage_tower: damage,
        speed,
        price: Coins::new(price),
    }
}

/// A spell with plausible stats.
pub fn spell_fixture(name: &str, damage: i32, price: u64) -> Spell {
    Spell {
        id: SpellId::random(),
        name: name.to_owned(),
        description: String::new(),
        area: 3,
        damage_type: "fire".to_owned(),
        damage,
        duration: 0,
        effect: "burn".to_owned(),
        price: Coins::new(price),
    }
}
