//! SQLite character repository implementation.
//!
//! One row per character. `items` is a JSON array in a TEXT column, ids are
//! the table's integer rowid rendered as a decimal string.

use std::sync::Arc;

use async_trait::async_trait;
use roster_domain::common::{format_datetime, parse_datetime};
use roster_domain::{Character, CharacterData, CharacterId, CharacterPatch, FieldValue};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use super::schema::ensure_schema;
use crate::infrastructure::ports::{CharacterRepo, ClockPort, RepoError};

const COLUMNS: &str =
    "id, name, character_class, level, hp, mana, attack, items, created_at, updated_at";

/// SQLite implementation of [`CharacterRepo`].
pub struct SqliteCharacterRepo {
    pool: SqlitePool,
    clock: Arc<dyn ClockPort>,
}

impl SqliteCharacterRepo {
    /// Wraps an existing pool. The schema must already exist.
    pub fn new(pool: SqlitePool, clock: Arc<dyn ClockPort>) -> Self {
        Self { pool, clock }
    }

    /// Connects to `database_url` and ensures the schema.
    pub async fn connect(database_url: &str, clock: Arc<dyn ClockPort>) -> Result<Self, RepoError> {
        let pool = super::connect_pool(database_url)
            .await
            .map_err(|e| RepoError::database("sqlite.connect", e))?;
        ensure_schema(&pool)
            .await
            .map_err(|e| RepoError::database("sqlite.ensure_schema", e))?;
        Ok(Self::new(pool, clock))
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    async fn find_where(
        &self,
        operation: &'static str,
        condition: &str,
        value: FieldValue,
    ) -> Result<Vec<Character>, RepoError> {
        let sql = format!("SELECT {COLUMNS} FROM characters WHERE {condition} ORDER BY id");
        let rows = bind_value(sqlx::query(&sql), value)?
            .fetch_all(&self.pool)
            .await
            .map_err(|e| RepoError::database(operation, e))?;
        rows.iter().map(row_to_character).collect()
    }
}

/// Row ids are positive integers in their canonical decimal form. Anything
/// else, including zero-padded spellings of a stored id, cannot exist.
fn parse_row_id(id: &CharacterId) -> Option<i64> {
    let raw = id.as_str();
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let row_id: i64 = raw.parse().ok()?;
    (row_id.to_string() == raw).then_some(row_id)
}

fn encode_items(items: &[String]) -> Result<String, RepoError> {
    serde_json::to_string(items).map_err(RepoError::serialization)
}

fn bind_value<'q>(
    query: sqlx::query::Query<'q, sqlx::Sqlite, sqlx::sqlite::SqliteArguments<'q>>,
    value: FieldValue,
) -> Result<sqlx::query::Query<'q, sqlx::Sqlite, sqlx::sqlite::SqliteArguments<'q>>, RepoError> {
    Ok(match value {
        FieldValue::Text(text) => query.bind(text),
        FieldValue::Integer(number) => query.bind(number),
        FieldValue::List(items) => query.bind(encode_items(&items)?),
    })
}

fn map_write_error(operation: &'static str, error: sqlx::Error) -> RepoError {
    match &error {
        sqlx::Error::Database(db) if db.is_unique_violation() => RepoError::constraint(db.message()),
        _ => RepoError::database(operation, error),
    }
}

fn row_to_character(row: &SqliteRow) -> Result<Character, RepoError> {
    let decode = |e: sqlx::Error| RepoError::database("sqlite.decode", e);

    let id: i64 = row.try_get("id").map_err(decode)?;
    let items_json: String = row.try_get("items").map_err(decode)?;
    let items: Vec<String> =
        serde_json::from_str(&items_json).map_err(RepoError::serialization)?;
    let created_at: String = row.try_get("created_at").map_err(decode)?;
    let updated_at: String = row.try_get("updated_at").map_err(decode)?;

    let data = CharacterData {
        name: row.try_get("name").map_err(decode)?,
        character_class: row.try_get("character_class").map_err(decode)?,
        level: row.try_get("level").map_err(decode)?,
        hp: row.try_get("hp").map_err(decode)?,
        mana: row.try_get("mana").map_err(decode)?,
        attack: row.try_get("attack").map_err(decode)?,
        items,
    };

    Ok(Character::new(CharacterId::new(id.to_string()), data).with_timestamps(
        parse_datetime(&created_at).map_err(RepoError::serialization)?,
        parse_datetime(&updated_at).map_err(RepoError::serialization)?,
    ))
}

#[async_trait]
impl CharacterRepo for SqliteCharacterRepo {
    async fn find_all(&self) -> Result<Vec<Character>, RepoError> {
        let sql = format!("SELECT {COLUMNS} FROM characters ORDER BY id");
        let rows = sqlx::query(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| RepoError::database("sqlite.find_all", e))?;
        rows.iter().map(row_to_character).collect()
    }

    async fn find_one(&self, id: &CharacterId) -> Result<Option<Character>, RepoError> {
        let Some(row_id) = parse_row_id(id) else {
            return Ok(None);
        };
        let sql = format!("SELECT {COLUMNS} FROM characters WHERE id = ?");
        let row = sqlx::query(&sql)
            .bind(row_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepoError::database("sqlite.find_one", e))?;
        row.as_ref().map(row_to_character).transpose()
    }

    async fn add(&self, data: &CharacterData) -> Result<Character, RepoError> {
        let now = format_datetime(self.clock.now());
        let sql = format!(
            "INSERT INTO characters \
             (name, character_class, level, hp, mana, attack, items, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?) RETURNING {COLUMNS}"
        );
        let row = sqlx::query(&sql)
            .bind(&data.name)
            .bind(&data.character_class)
            .bind(data.level)
            .bind(data.hp)
            .bind(data.mana)
            .bind(data.attack)
            .bind(encode_items(&data.items)?)
            .bind(&now)
            .bind(&now)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_write_error("sqlite.add", e))?;

        let character = row_to_character(&row)?;
        tracing::debug!(character_id = %character.id, "Inserted character row");
        Ok(character)
    }

    async fn update(
        &self,
        id: &CharacterId,
        data: &CharacterData,
    ) -> Result<Option<Character>, RepoError> {
        let Some(row_id) = parse_row_id(id) else {
            return Ok(None);
        };
        let sql = format!(
            "UPDATE characters SET name = ?, character_class = ?, level = ?, hp = ?, \
             mana = ?, attack = ?, items = ?, updated_at = ? WHERE id = ? RETURNING {COLUMNS}"
        );
        let row = sqlx::query(&sql)
            .bind(&data.name)
            .bind(&data.character_class)
            .bind(data.level)
            .bind(data.hp)
            .bind(data.mana)
            .bind(data.attack)
            .bind(encode_items(&data.items)?)
            .bind(format_datetime(self.clock.now()))
            .bind(row_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_write_error("sqlite.update", e))?;
        row.as_ref().map(row_to_character).transpose()
    }

    async fn partial_update(
        &self,
        id: &CharacterId,
        patch: &CharacterPatch,
    ) -> Result<Option<Character>, RepoError> {
        let Some(row_id) = parse_row_id(id) else {
            return Ok(None);
        };
        let entries = patch.entries();
        if entries.is_empty() {
            return self.find_one(id).await;
        }

        // Column names come from CharacterField, never from the request
        let mut sql = String::from("UPDATE characters SET ");
        for (field, _) in &entries {
            sql.push_str(field.column());
            sql.push_str(" = ?, ");
        }
        sql.push_str("updated_at = ? WHERE id = ? RETURNING ");
        sql.push_str(COLUMNS);

        let mut query = sqlx::query(&sql);
        for (_, value) in entries {
            query = bind_value(query, value)?;
        }
        let row = query
            .bind(format_datetime(self.clock.now()))
            .bind(row_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_write_error("sqlite.partial_update", e))?;
        row.as_ref().map(row_to_character).transpose()
    }

    async fn delete(&self, id: &CharacterId) -> Result<Option<Character>, RepoError> {
        let Some(row_id) = parse_row_id(id) else {
            return Ok(None);
        };
        let sql = format!("DELETE FROM characters WHERE id = ? RETURNING {COLUMNS}");
        let row = sqlx::query(&sql)
            .bind(row_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepoError::database("sqlite.delete", e))?;
        row.as_ref().map(row_to_character).transpose()
    }

    async fn find_by_level(&self, level: i32) -> Result<Vec<Character>, RepoError> {
        self.find_where("sqlite.find_by_level", "level = ?", FieldValue::Integer(level))
            .await
    }

    async fn find_by_class(&self, character_class: &str) -> Result<Vec<Character>, RepoError> {
        self.find_where(
            "sqlite.find_by_class",
            "character_class = ?",
            FieldValue::Text(character_class.to_string()),
        )
        .await
    }

    async fn count(&self) -> Result<u64, RepoError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM characters")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| RepoError::database("sqlite.count", e))?;
        Ok(count.max(0) as u64)
    }

    async fn close(&self) {
        self.pool.close().await;
        tracing::info!("SQLite pool closed");
    }
}
