//! SQLite schema initialization - characters table and lookup indexes.

use sqlx::SqlitePool;

/// DDL for the characters table, in the order it must run.
///
/// Every statement is `IF NOT EXISTS`, so running them again is a no-op.
pub const SCHEMA_STATEMENTS: [&str; 3] = [
    r#"
    CREATE TABLE IF NOT EXISTS characters (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        character_class TEXT NOT NULL,
        level INTEGER NOT NULL,
        hp INTEGER NOT NULL,
        mana INTEGER NOT NULL,
        attack INTEGER NOT NULL,
        items TEXT NOT NULL DEFAULT '[]',
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_characters_level ON characters (level)",
    "CREATE INDEX IF NOT EXISTS idx_characters_class ON characters (character_class)",
];

/// Create the characters table and its indexes if they are missing.
///
/// Called once on startup, before the repository serves requests.
pub async fn ensure_schema(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    for statement in SCHEMA_STATEMENTS {
        sqlx::query(statement).execute(pool).await?;
    }

    tracing::info!("SQLite schema initialized (characters table and indexes ensured)");
    Ok(())
}
