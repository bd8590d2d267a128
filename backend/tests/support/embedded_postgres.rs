//! Per-test databases on the shared embedded PostgreSQL cluster.
//!
//! Every suite gets a fresh temporary database with the crate's migrations
//! applied, so adapter tests never observe each other's rows. The database
//! is dropped when the returned [`TemporaryDatabase`] goes out of scope.

use std::time::Duration;

use arena_backend::outbound::persistence::run_pending_migrations;
use pg_embedded_setup_unpriv::TemporaryDatabase;
use pg_embedded_setup_unpriv::test_support::shared_cluster_handle;
use tokio::runtime::Runtime;

const PROVISION_RETRIES: usize = 3;
const PROVISION_RETRY_DELAY: Duration = Duration::from_millis(250);

/// Render a `postgres` error with its SQLSTATE and detail.
///
/// `postgres::Error`'s `Display` collapses server errors to "db error".
pub fn format_postgres_error(error: &postgres::Error) -> String {
    let Some(db_error) = error.as_db_error() else {
        return error.to_string();
    };

    let mut summary = format!(
        "postgres error {:?}: {}",
        db_error.code(),
        db_error.message()
    );
    if let Some(detail) = db_error.detail() {
        summary.push_str("; detail: ");
        summary.push_str(detail);
    }
    summary
}

fn provision_attempt(runtime: &Runtime, attempt: usize) -> Result<TemporaryDatabase, String> {
    let cluster = shared_cluster_handle()
        .map_err(|err| format!("cluster: attempt {attempt}/{PROVISION_RETRIES}: {err}"))?;
    let database_name = format!("test_{}", uuid::Uuid::new_v4().simple());
    let database = cluster
        .temporary_database(database_name.as_str())
        .map_err(|err| format!("create database: attempt {attempt}/{PROVISION_RETRIES}: {err}"))?;
    runtime
        .block_on(run_pending_migrations(database.url()))
        .map_err(|err| format!("migrate: {err}"))?;
    Ok(database)
}

/// Create a migrated temporary database, retrying transient bootstrap errors.
pub fn provision_database(runtime: &Runtime) -> Result<TemporaryDatabase, String> {
    let mut last_error = String::from("create database: exhausted retries");
    for attempt in 1..=PROVISION_RETRIES {
        match provision_attempt(runtime, attempt) {
            Ok(database) => return Ok(database),
            Err(error) => last_error = error,
        }
        if attempt < PROVISION_RETRIES {
            std::thread::sleep(PROVISION_RETRY_DELAY);
        }
    }
    Err(last_error)
}
