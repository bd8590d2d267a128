//! Storage selection: PostgreSQL adapters when a database URL is configured,
//! otherwise the in-memory store.

use std::sync::Arc;

use tracing::{info, warn};

use arena_backend::inbound::http::state::HttpState;
use arena_backend::outbound::memory::InMemoryStore;
use arena_backend::outbound::persistence::{
    DbPool, DieselCatalogRepository, DieselDeckRepository, DieselLedgerRepository, PoolConfig,
    run_pending_migrations,
};

use super::ServerConfig;

/// Wire driving ports over the configured storage backend.
///
/// # Errors
///
/// Fails when migrations cannot be applied or the pool cannot be built.
pub async fn build_http_state(config: &ServerConfig) -> std::io::Result<HttpState> {
    let Some(database_url) = config.database_url.as_deref() else {
        warn!("no database configured; state lives in memory and is lost on restart");
        let store = Arc::new(InMemoryStore::new());
        return Ok(HttpState::from_repositories(
            store.clone(),
            store.clone(),
            store,
        ));
    };

    run_pending_migrations(database_url)
        .await
        .map_err(|err| std::io::Error::other(err.to_string()))?;
    let pool = DbPool::new(
        PoolConfig::new(database_url)
            .with_max_size(config.db_max_connections)
            .with_min_idle(config.db_min_idle)
            .with_connection_timeout(config.db_connect_timeout),
    )
    .await
    .map_err(|err| std::io::Error::other(err.to_string()))?;
    info!(max_connections = config.db_max_connections, "database pool ready");

    Ok(HttpState::from_repositories(
        Arc::new(DieselLedgerRepository::new(pool.clone())),
        Arc::new(DieselCatalogRepository::new(pool.clone())),
        Arc::new(DieselDeckRepository::new(pool)),
    ))
}
