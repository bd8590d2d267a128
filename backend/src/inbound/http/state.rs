//! Shared HTTP adapter state.
//!
//! Handlers receive this through `web::Data` and only see driving ports, so
//! they can be exercised with mocks or the in-memory store.

use std::sync::Arc;

use crate::domain::ports::{
    CatalogCommand, CatalogQuery, CatalogRepository, DeckCommand, DeckQuery, DeckRepository,
    LedgerRepository, PurchaseCommand,
};
use crate::domain::{CatalogService, DeckService, PurchaseService};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Hero and spell purchases.
    pub purchases: Arc<dyn PurchaseCommand>,
    /// Deck mutations.
    pub decks: Arc<dyn DeckCommand>,
    /// Deck reads.
    pub decks_query: Arc<dyn DeckQuery>,
    /// Catalogue and collection reads.
    pub catalog: Arc<dyn CatalogQuery>,
    /// Admin catalogue authoring.
    pub catalog_admin: Arc<dyn CatalogCommand>,
}

impl HttpState {
    /// Bundle the driving ports.
    pub fn new(
        purchases: Arc<dyn PurchaseCommand>,
        decks: Arc<dyn DeckCommand>,
        decks_query: Arc<dyn DeckQuery>,
        catalog: Arc<dyn CatalogQuery>,
        catalog_admin: Arc<dyn CatalogCommand>,
    ) -> Self {
        Self {
            purchases,
            decks,
            decks_query,
            catalog,
            catalog_admin,
        }
    }

    /// Wire the domain services over one set of repositories.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use arena_backend::inbound::http::state::HttpState;
    /// use arena_backend::outbound::memory::InMemoryStore;
    ///
    /// let store = Arc::new(InMemoryStore::new());
    /// let _state = HttpState::from_repositories(store.clone(), store.clone(), store);
    /// ```
    pub fn from_repositories<L, C, D>(ledger: Arc<L>, catalog: Arc<C>, decks: Arc<D>) -> Self
    where
        L: LedgerRepository + 'static,
        C: CatalogRepository + 'static,
        D: DeckRepository + 'static,
    {
        let purchases = Arc::new(PurchaseService::new(ledger.clone(), catalog.clone()));
        let deck_service = Arc::new(DeckService::new(decks, ledger.clone(), catalog.clone()));
        let catalog_service = Arc::new(CatalogService::new(catalog, ledger));
        Self::new(
            purchases,
            deck_service.clone(),
            deck_service,
            catalog_service.clone(),
            catalog_service,
        )
    }
}
