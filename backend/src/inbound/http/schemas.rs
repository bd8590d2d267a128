//! OpenAPI schemas for types whose serde shape utoipa cannot derive.
//!
//! [`crate::domain::Error`] serialises through a DTO, [`crate::domain::ItemRef`]
//! is an adjacently tagged enum, and `Page<T>` lives in a crate without
//! utoipa. The wrappers here mirror their wire format.

use utoipa::ToSchema;

use crate::domain::{Hero, Spell};

/// OpenAPI schema for [`crate::domain::ErrorCode`].
#[derive(ToSchema)]
#[schema(as = crate::domain::ErrorCode)]
pub enum ErrorCodeSchema {
    /// The request is malformed or fails validation.
    #[schema(rename = "invalid_request")]
    InvalidRequest,
    /// No valid session.
    #[schema(rename = "unauthorized")]
    Unauthorized,
    /// Authenticated but not permitted.
    #[schema(rename = "forbidden")]
    Forbidden,
    /// Unknown hero, spell, deck or account.
    #[schema(rename = "not_found")]
    NotFound,
    /// Item has not been purchased.
    #[schema(rename = "not_owned")]
    NotOwned,
    /// Balance cannot cover the price.
    #[schema(rename = "insufficient_funds")]
    InsufficientFunds,
    /// Lost a concurrent update; safe to retry.
    #[schema(rename = "conflict")]
    Conflict,
    /// Storage is unreachable.
    #[schema(rename = "service_unavailable")]
    ServiceUnavailable,
    /// Unexpected failure.
    #[schema(rename = "internal_error")]
    InternalError,
}

/// OpenAPI schema for [`crate::domain::Error`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Error)]
#[schema(rename_all = "camelCase")]
#[expect(dead_code, reason = "Used only for OpenAPI schema generation via utoipa")]
pub struct ErrorSchema {
    /// Machine-readable error code.
    #[schema(example = "insufficient_funds")]
    code: ErrorCodeSchema,
    /// Human-readable message.
    #[schema(example = "balance 40 cannot cover price 50")]
    message: String,
    /// Trace identifier of the failed request.
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    trace_id: Option<String>,
    /// Structured context, such as the offending field.
    details: Option<serde_json::Value>,
}

/// OpenAPI schema for [`crate::domain::ItemRef`].
#[derive(ToSchema)]
#[schema(as = crate::domain::ItemRef)]
#[expect(dead_code, reason = "Used only for OpenAPI schema generation via utoipa")]
pub struct ItemRefSchema {
    /// `hero` or `spell`.
    #[schema(example = "hero")]
    kind: String,
    /// Item identifier.
    #[schema(format = Uuid)]
    id: String,
}

/// One page of heroes.
#[derive(ToSchema)]
#[schema(rename_all = "camelCase")]
#[expect(dead_code, reason = "Used only for OpenAPI schema generation via utoipa")]
pub struct HeroPageSchema {
    /// Heroes on this page.
    items: Vec<Hero>,
    /// One-based page number.
    page: u32,
    /// Requested page size.
    page_size: u32,
}

/// One page of spells.
#[derive(ToSchema)]
#[schema(rename_all = "camelCase")]
#[expect(dead_code, reason = "Used only for OpenAPI schema generation via utoipa")]
pub struct SpellPageSchema {
    /// Spells on this page.
    items: Vec<Spell>,
    /// One-based page number.
    page: u32,
    /// Requested page size.
    page_size: u32,
}
