//! Deck composition endpoints.
//!
//! ```text
//! GET    /api/v1/decks
//! POST   /api/v1/decks
//! GET    /api/v1/decks/{id}
//! POST   /api/v1/decks/heroes                    {"deckId"?, "heroId"}
//! DELETE /api/v1/decks/{deck_id}/heroes/{hero_id}
//! POST   /api/v1/decks/spells                    {"deckId"?, "spellId"}
//! DELETE /api/v1/decks/{deck_id}/spells/{spell_id}
//! ```
//!
//! Every mutation answers with the caller's full deck list.

use actix_web::{HttpResponse, delete, get, post, web};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::domain::{Deck, DeckDraft, DeckId, HeroId, SpellId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, optional_id, parse_id, require_id};

const DECK_ID: FieldName = FieldName::new("deckId");
const HERO_ID: FieldName = FieldName::new("heroId");
const SPELL_ID: FieldName = FieldName::new("spellId");

/// Body for slotting a hero.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddHeroRequest {
    /// Target deck; the oldest deck when omitted, a new deck when unknown.
    #[schema(format = Uuid)]
    pub deck_id: Option<String>,
    /// Owned hero to slot.
    #[schema(format = Uuid)]
    pub hero_id: Option<String>,
}

/// Body for slotting a spell.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddSpellRequest {
    /// Target deck; the oldest deck when omitted, a new deck when unknown.
    #[schema(format = Uuid)]
    pub deck_id: Option<String>,
    /// Owned spell to slot.
    #[schema(format = Uuid)]
    pub spell_id: Option<String>,
}

/// List the caller's decks, oldest first.
#[utoipa::path(
    get,
    path = "/api/v1/decks",
    responses(
        (status = 200, description = "Decks", body = Vec<Deck>),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["decks"],
    operation_id = "listDecks",
    security(("SessionCookie" = []))
)]
#[get("/decks")]
pub async fn list_decks(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<Deck>>> {
    let user = session.require_user_id()?;
    Ok(web::Json(state.decks_query.decks_for_user(&user).await?))
}

/// Create an empty deck.
#[utoipa::path(
    post,
    path = "/api/v1/decks",
    request_body = DeckDraft,
    responses(
        (status = 201, description = "Decks after creation", body = Vec<Deck>),
        (status = 400, description = "Invalid draft", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["decks"],
    operation_id = "createDeck",
    security(("SessionCookie" = []))
)]
#[post("/decks")]
pub async fn create_deck(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<DeckDraft>,
) -> ApiResult<HttpResponse> {
    let user = session.require_user_id()?;
    let decks = state.decks.create_deck(&user, payload.into_inner()).await?;
    Ok(HttpResponse::Created().json(decks))
}

/// Fetch one of the caller's decks.
#[utoipa::path(
    get,
    path = "/api/v1/decks/{id}",
    params(("id" = String, Path, description = "Deck identifier")),
    responses(
        (status = 200, description = "Deck", body = Deck),
        (status = 400, description = "Invalid id", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Unknown or foreign deck", body = ErrorSchema)
    ),
    tags = ["decks"],
    operation_id = "getDeck",
    security(("SessionCookie" = []))
)]
#[get("/decks/{id}")]
pub async fn get_deck(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<Deck>> {
    let user = session.require_user_id()?;
    let deck: DeckId = parse_id(path.into_inner(), FieldName::new("id"))?;
    Ok(web::Json(state.decks_query.deck_for_user(&user, &deck).await?))
}

/// Slot an owned hero into a deck.
#[utoipa::path(
    post,
    path = "/api/v1/decks/heroes",
    request_body = AddHeroRequest,
    responses(
        (status = 200, description = "Decks after placement", body = Vec<Deck>),
        (status = 400, description = "Missing or invalid id", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Hero not owned", body = ErrorSchema),
        (status = 404, description = "Foreign deck", body = ErrorSchema)
    ),
    tags = ["decks"],
    operation_id = "addHeroToDeck",
    security(("SessionCookie" = []))
)]
#[post("/decks/heroes")]
pub async fn add_hero(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<AddHeroRequest>,
) -> ApiResult<web::Json<Vec<Deck>>> {
    let user = session.require_user_id()?;
    let AddHeroRequest { deck_id, hero_id } = payload.into_inner();
    let hero: HeroId = require_id(hero_id, HERO_ID)?;
    let deck: Option<DeckId> = optional_id(deck_id, DECK_ID)?;
    Ok(web::Json(state.decks.add_hero_to_deck(&user, deck, &hero).await?))
}

/// Remove a hero from one of the caller's decks.
#[utoipa::path(
    delete,
    path = "/api/v1/decks/{deck_id}/heroes/{hero_id}",
    params(
        ("deck_id" = String, Path, description = "Deck identifier"),
        ("hero_id" = String, Path, description = "Hero identifier")
    ),
    responses(
        (status = 200, description = "Decks after removal", body = Vec<Deck>),
        (status = 400, description = "Invalid id", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Unknown deck or hero", body = ErrorSchema)
    ),
    tags = ["decks"],
    operation_id = "removeHeroFromDeck",
    security(("SessionCookie" = []))
)]
#[delete("/decks/{deck_id}/heroes/{hero_id}")]
pub async fn remove_hero(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<(String, String)>,
) -> ApiResult<web::Json<Vec<Deck>>> {
    let user = session.require_user_id()?;
    let (deck_id, hero_id) = path.into_inner();
    let deck: DeckId = parse_id(deck_id, DECK_ID)?;
    let hero: HeroId = parse_id(hero_id, HERO_ID)?;
    Ok(web::Json(
        state.decks.delete_hero_from_deck(&user, &deck, &hero).await?,
    ))
}

/// Slot an owned spell into a deck.
#[utoipa::path(
    post,
    path = "/api/v1/decks/spells",
    request_body = AddSpellRequest,
    responses(
        (status = 200, description = "Decks after placement", body = Vec<Deck>),
        (status = 400, description = "Missing or invalid id", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Spell not owned", body = ErrorSchema),
        (status = 404, description = "Foreign deck", body = ErrorSchema)
    ),
    tags = ["decks"],
    operation_id = "addSpellToDeck",
    security(("SessionCookie" = []))
)]
#[post("/decks/spells")]
pub async fn add_spell(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<AddSpellRequest>,
) -> ApiResult<web::Json<Vec<Deck>>> {
    let user = session.require_user_id()?;
    let AddSpellRequest { deck_id, spell_id } = payload.into_inner();
    let spell: SpellId = require_id(spell_id, SPELL_ID)?;
    let deck: Option<DeckId> = optional_id(deck_id, DECK_ID)?;
    Ok(web::Json(state.decks.add_spell_to_deck(&user, deck, &spell).await?))
}

/// Remove a spell from one of the caller's decks.
#[utoipa::path(
    delete,
    path = "/api/v1/decks/{deck_id}/spells/{spell_id}",
    params(
        ("deck_id" = String, Path, description = "Deck identifier"),
        ("spell_id" = String, Path, description = "Spell identifier")
    ),
    responses(
        (status = 200, description = "Decks after removal", body = Vec<Deck>),
        (status = 400, description = "Invalid id", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Unknown deck or spell", body = ErrorSchema)
    ),
    tags = ["decks"],
    operation_id = "removeSpellFromDeck",
    security(("SessionCookie" = []))
)]
#[delete("/decks/{deck_id}/spells/{spell_id}")]
pub async fn remove_spell(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<(String, String)>,
) -> ApiResult<web::Json<Vec<Deck>>> {
    let user = session.require_user_id()?;
    let (deck_id, spell_id) = path.into_inner();
    let deck: DeckId = parse_id(deck_id, DECK_ID)?;
    let spell: SpellId = parse_id(spell_id, SPELL_ID)?;
    Ok(web::Json(
        state.decks.delete_spell_from_deck(&user, &deck, &spell).await?,
    ))
}

#[cfg(test)]
#[path = "decks_tests.rs"]
mod tests;
