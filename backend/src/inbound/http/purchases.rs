//! Purchase endpoints.
//!
//! ```text
//! POST /api/v1/heroes/{id}/purchase
//! POST /api/v1/spells/{id}/purchase
//! ```
//!
//! Both are idempotent per item: buying something already owned returns a
//! receipt with `charged: 0`.

use actix_web::{post, web};

use crate::domain::ports::PurchaseReceipt;
use crate::domain::{HeroId, SpellId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_id};

/// Buy a hero with the caller's coins.
#[utoipa::path(
    post,
    path = "/api/v1/heroes/{id}/purchase",
    params(("id" = String, Path, description = "Hero identifier")),
    responses(
        (status = 200, description = "Hero owned", body = PurchaseReceipt),
        (status = 400, description = "Invalid id", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 402, description = "Insufficient funds", body = ErrorSchema),
        (status = 404, description = "Unknown hero or account", body = ErrorSchema),
        (status = 409, description = "Balance kept changing; retry", body = ErrorSchema)
    ),
    tags = ["purchases"],
    operation_id = "buyHero",
    security(("SessionCookie" = []))
)]
#[post("/heroes/{id}/purchase")]
pub async fn buy_hero(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<PurchaseReceipt>> {
    let user = session.require_user_id()?;
    let hero: HeroId = parse_id(path.into_inner(), FieldName::new("id"))?;
    Ok(web::Json(state.purchases.buy_hero(&user, &hero).await?))
}

/// Buy a spell with the caller's coins.
#[utoipa::path(
    post,
    path = "/api/v1/spells/{id}/purchase",
    params(("id" = String, Path, description = "Spell identifier")),
    responses(
        (status = 200, description = "Spell owned", body = PurchaseReceipt),
        (status = 400, description = "Invalid id", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 402, description = "Insufficient funds", body = ErrorSchema),
        (status = 404, description = "Unknown spell or account", body = ErrorSchema),
        (status = 409, description = "Balance kept changing; retry", body = ErrorSchema)
    ),
    tags = ["purchases"],
    operation_id = "buySpell",
    security(("SessionCookie" = []))
)]
#[post("/spells/{id}/purchase")]
pub async fn buy_spell(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<PurchaseReceipt>> {
    let user = session.require_user_id()?;
    let spell: SpellId = parse_id(path.into_inner(), FieldName::new("id"))?;
    Ok(web::Json(state.purchases.buy_spell(&user, &spell).await?))
}
