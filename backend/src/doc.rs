//! OpenAPI document for the REST API.
//!
//! Registers every `/api/v1` handler plus the health probes, the schema
//! wrappers from [`crate::inbound::http::schemas`], and the session cookie
//! security scheme. Swagger UI serves it in debug builds.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::ports::PurchaseReceipt;
use crate::domain::{Deck, DeckDraft, Hero, HeroDraft, Spell, SpellDraft};
use crate::inbound::http::decks::{AddHeroRequest, AddSpellRequest};
use crate::inbound::http::schemas::{
    ErrorCodeSchema, ErrorSchema, HeroPageSchema, ItemRefSchema, SpellPageSchema,
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie carrying the signed-in user id.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Card arena backend API",
        description = "Catalogue browsing, purchases and deck composition."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::catalog::list_heroes,
        crate::inbound::http::catalog::get_hero,
        crate::inbound::http::catalog::create_hero,
        crate::inbound::http::catalog::list_spells,
        crate::inbound::http::catalog::get_spell,
        crate::inbound::http::catalog::create_spell,
        crate::inbound::http::catalog::owned_heroes,
        crate::inbound::http::catalog::owned_spells,
        crate::inbound::http::purchases::buy_hero,
        crate::inbound::http::purchases::buy_spell,
        crate::inbound::http::decks::list_decks,
        crate::inbound::http::decks::create_deck,
        crate::inbound::http::decks::get_deck,
        crate::inbound::http::decks::add_hero,
        crate::inbound::http::decks::remove_hero,
        crate::inbound::http::decks::add_spell,
        crate::inbound::http::decks::remove_spell,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Hero,
        Spell,
        HeroDraft,
        SpellDraft,
        Deck,
        DeckDraft,
        PurchaseReceipt,
        AddHeroRequest,
        AddSpellRequest,
        HeroPageSchema,
        SpellPageSchema,
        ItemRefSchema,
        ErrorSchema,
        ErrorCodeSchema
    )),
    tags(
        (name = "catalogue", description = "Heroes and spells on offer"),
        (name = "collection", description = "Items the caller owns"),
        (name = "purchases", description = "Spending coins on items"),
        (name = "decks", description = "Deck composition"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
