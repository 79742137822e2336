//! Builds the configured character repository.

use std::sync::Arc;

use crate::infrastructure::config::BackendConfig;
use crate::infrastructure::dynamo::{self, DynamoCharacterRepo, DynamoTableAdmin};
use crate::infrastructure::memory::InMemoryCharacterRepo;
use crate::infrastructure::mongo::MongoCharacterRepo;
use crate::infrastructure::ports::{CharacterRepo, ClockPort, RandomPort, RepoError};
use crate::infrastructure::sqlite::SqliteCharacterRepo;

/// Connect the backend named by `config`.
///
/// Called once at startup. The returned handle is shared by every request
/// and released with [`CharacterRepo::close`] at shutdown.
pub async fn connect(
    config: &BackendConfig,
    clock: Arc<dyn ClockPort>,
    random: Arc<dyn RandomPort>,
) -> Result<Arc<dyn CharacterRepo>, RepoError> {
    let repo: Arc<dyn CharacterRepo> = match config {
        BackendConfig::Memory { seed: true } => Arc::new(InMemoryCharacterRepo::seeded()),
        BackendConfig::Memory { seed: false } => Arc::new(InMemoryCharacterRepo::new()),
        BackendConfig::Sqlite(settings) => {
            Arc::new(SqliteCharacterRepo::connect(&settings.database_url, clock).await?)
        }
        BackendConfig::MongoDb(settings) => Arc::new(
            MongoCharacterRepo::connect(
                &settings.uri,
                &settings.database,
                &settings.collection,
                clock,
            )
            .await?,
        ),
        BackendConfig::DynamoDb(settings) => {
            let client =
                dynamo::build_client(&settings.region, settings.endpoint.as_deref()).await;

            // Tables are provisioned out of band; only report what we find
            match DynamoTableAdmin::new(client.clone(), &settings.table_name)
                .describe()
                .await
            {
                Ok(Some(summary)) => {
                    tracing::info!(table = %summary.name, status = %summary.status, "DynamoDB table found")
                }
                Ok(None) => tracing::warn!(
                    table = %settings.table_name,
                    "DynamoDB table does not exist; run `cargo xtask dynamo create`"
                ),
                Err(e) => tracing::warn!(error = %e, "Could not describe DynamoDB table"),
            }

            Arc::new(DynamoCharacterRepo::new(
                client,
                settings.table_name.clone(),
                clock,
                random,
            ))
        }
    };

    tracing::info!(backend = config.name(), "Character repository ready");
    Ok(repo)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::clock::{SystemClock, SystemRandom};
    use crate::infrastructure::config::SqliteSettings;
    use crate::test_fixtures::gandalf;

    #[tokio::test]
    async fn memory_backend_can_start_seeded() {
        let repo = connect(
            &BackendConfig::Memory { seed: true },
            Arc::new(SystemClock::new()),
            Arc::new(SystemRandom::new()),
        )
        .await
        .unwrap();
        assert_eq!(repo.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn sqlite_backend_creates_schema_on_connect() {
        let repo = connect(
            &BackendConfig::Sqlite(SqliteSettings {
                database_url: "sqlite::memory:".into(),
            }),
            Arc::new(SystemClock::new()),
            Arc::new(SystemRandom::new()),
        )
        .await
        .unwrap();

        let created = repo.add(&gandalf()).await.unwrap();
        assert!(repo.find_one(&created.id).await.unwrap().is_some());
        repo.close().await;
    }
}
