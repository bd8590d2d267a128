//! Catalogue endpoints.
//!
//! ```text
//! GET  /api/v1/heroes            List heroes (sorted, filtered, paged)
//! GET  /api/v1/heroes/{id}       Hero detail
//! POST /api/v1/heroes            Create a hero (admin)
//! GET  /api/v1/spells            List spells
//! GET  /api/v1/spells/{id}       Spell detail
//! POST /api/v1/spells            Create a spell (admin)
//! GET  /api/v1/users/me/heroes   Heroes the caller owns
//! GET  /api/v1/users/me/spells   Spells the caller owns
//! ```

use actix_web::{HttpResponse, get, post, web};
use pagination::{Page, PageRequest};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::domain::{
    HeroDraft, HeroId, HeroListing, HeroSortKey, NameFilter, SortDirection, Spell, SpellDraft,
    SpellId, SpellListing, SpellSortKey,
};
use crate::domain::Hero;
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{ErrorSchema, HeroPageSchema, SpellPageSchema};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_id};

/// Listing query string. Unknown or malformed values fall back to defaults.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query, rename_all = "camelCase")]
pub struct ListQuery {
    /// Sort column; heroes accept `name`, `damage`, `speed`, spells accept
    /// `name`, `damage`. Anything else sorts by id.
    pub sort_by: Option<String>,
    /// `asc` or `desc`.
    pub sort_order: Option<String>,
    /// Case-insensitive substring of the name.
    pub filter_name: Option<String>,
    /// One-based page number.
    pub page: Option<String>,
    /// Items per page, at most 100.
    pub page_size: Option<String>,
}

impl ListQuery {
    fn page_request(&self) -> PageRequest {
        let number = |raw: &Option<String>| raw.as_deref().and_then(|value| value.trim().parse().ok());
        PageRequest::new(number(&self.page), number(&self.page_size))
    }

    fn hero_listing(&self) -> HeroListing {
        HeroListing {
            sort: HeroSortKey::parse_or_default(self.sort_by.as_deref()),
            direction: SortDirection::parse_or_default(self.sort_order.as_deref()),
            name: NameFilter::new(self.filter_name.as_deref()),
            page: self.page_request(),
        }
    }

    fn spell_listing(&self) -> SpellListing {
        SpellListing {
            sort: SpellSortKey::parse_or_default(self.sort_by.as_deref()),
            direction: SortDirection::parse_or_default(self.sort_order.as_deref()),
            name: NameFilter::new(self.filter_name.as_deref()),
            page: self.page_request(),
        }
    }
}

/// List heroes.
#[utoipa::path(
    get,
    path = "/api/v1/heroes",
    params(ListQuery),
    responses(
        (status = 200, description = "One page of heroes", body = HeroPageSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["catalogue"],
    operation_id = "listHeroes",
    security(("SessionCookie" = []))
)]
#[get("/heroes")]
pub async fn list_heroes(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<ListQuery>,
) -> ApiResult<web::Json<Page<Hero>>> {
    session.require_user_id()?;
    let page = state.catalog.list_heroes(query.hero_listing()).await?;
    Ok(web::Json(page))
}

/// Fetch one hero.
#[utoipa::path(
    get,
    path = "/api/v1/heroes/{id}",
    params(("id" = String, Path, description = "Hero identifier")),
    responses(
        (status = 200, description = "Hero", body = Hero),
        (status = 400, description = "Invalid id", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["catalogue"],
    operation_id = "getHero",
    security(("SessionCookie" = []))
)]
#[get("/heroes/{id}")]
pub async fn get_hero(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<Hero>> {
    session.require_user_id()?;
    let id: HeroId = parse_id(path.into_inner(), FieldName::new("id"))?;
    Ok(web::Json(state.catalog.hero(&id).await?))
}

/// Add a hero to the catalogue.
#[utoipa::path(
    post,
    path = "/api/v1/heroes",
    request_body = HeroDraft,
    responses(
        (status = 201, description = "Created hero", body = Hero),
        (status = 400, description = "Invalid draft", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Caller is not an admin", body = ErrorSchema),
        (status = 409, description = "Duplicate hero", body = ErrorSchema)
    ),
    tags = ["catalogue"],
    operation_id = "createHero",
    security(("SessionCookie" = []))
)]
#[post("/heroes")]
pub async fn create_hero(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<HeroDraft>,
) -> ApiResult<HttpResponse> {
    let user = session.require_user_id()?;
    let hero = state
        .catalog_admin
        .create_hero(&user, payload.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(hero))
}

/// List spells.
#[utoipa::path(
    get,
    path = "/api/v1/spells",
    params(ListQuery),
    responses(
        (status = 200, description = "One page of spells", body = SpellPageSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["catalogue"],
    operation_id = "listSpells",
    security(("SessionCookie" = []))
)]
#[get("/spells")]
pub async fn list_spells(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<ListQuery>,
) -> ApiResult<web::Json<Page<Spell>>> {
    session.require_user_id()?;
    let page = state.catalog.list_spells(query.spell_listing()).await?;
    Ok(web::Json(page))
}

/// Fetch one spell.
#[utoipa::path(
    get,
    path = "/api/v1/spells/{id}",
    params(("id" = String, Path, description = "Spell identifier")),
    responses(
        (status = 200, description = "Spell", body = Spell),
        (status = 400, description = "Invalid id", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["catalogue"],
    operation_id = "getSpell",
    security(("SessionCookie" = []))
)]
#[get("/spells/{id}")]
pub async fn get_spell(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<Spell>> {
    session.require_user_id()?;
    let id: SpellId = parse_id(path.into_inner(), FieldName::new("id"))?;
    Ok(web::Json(state.catalog.spell(&id).await?))
}

/// Add a spell to the catalogue.
#[utoipa::path(
    post,
    path = "/api/v1/spells",
    request_body = SpellDraft,
    responses(
        (status = 201, description = "Created spell", body = Spell),
        (status = 400, description = "Invalid draft", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Caller is not an admin", body = ErrorSchema),
        (status = 409, description = "Duplicate spell", body = ErrorSchema)
    ),
    tags = ["catalogue"],
    operation_id = "createSpell",
    security(("SessionCookie" = []))
)]
#[post("/spells")]
pub async fn create_spell(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<SpellDraft>,
) -> ApiResult<HttpResponse> {
    let user = session.require_user_id()?;
    let spell = state
        .catalog_admin
        .create_spell(&user, payload.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(spell))
}

/// Heroes owned by the caller.
#[utoipa::path(
    get,
    path = "/api/v1/users/me/heroes",
    responses(
        (status = 200, description = "Owned heroes", body = Vec<Hero>),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["collection"],
    operation_id = "listOwnedHeroes",
    security(("SessionCookie" = []))
)]
#[get("/users/me/heroes")]
pub async fn owned_heroes(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<Hero>>> {
    let user = session.require_user_id()?;
    Ok(web::Json(state.catalog.owned_heroes(&user).await?))
}

/// Spells owned by the caller.
#[utoipa::path(
    get,
    path = "/api/v1/users/me/spells",
    responses(
        (status = 200, description = "Owned spells", body = Vec<Spell>),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["collection"],
    operation_id = "listOwnedSpells",
    security(("SessionCookie" = []))
)]
#[get("/users/me/spells")]
pub async fn owned_spells(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<Spell>>> {
    let user = session.require_user_id()?;
    Ok(web::Json(state.catalog.owned_spells(&user).await?))
}

#[cfg(test)]
#[path = "catalog_tests.rs"]
mod tests;
