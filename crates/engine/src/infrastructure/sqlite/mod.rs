//! SQLite database implementations.

use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;

mod character_repo;
mod schema;

pub use character_repo::SqliteCharacterRepo;
pub use schema::{ensure_schema, SCHEMA_STATEMENTS};

const MAX_CONNECTIONS: u32 = 5;

/// Open a connection pool for `database_url` (e.g. `sqlite:characters.db?mode=rwc`).
pub async fn connect_pool(database_url: &str) -> Result<SqlitePool, sqlx::Error> {
    SqlitePoolOptions::new()
        .max_connections(MAX_CONNECTIONS)
        .connect(database_url)
        .await
}

/// Single-connection in-memory pool. The database lives as long as that
/// connection, so it must never be recycled.
#[cfg(test)]
pub(crate) async fn memory_pool() -> Result<SqlitePool, sqlx::Error> {
    SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
}
