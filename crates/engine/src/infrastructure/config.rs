//! Engine configuration loaded from the environment.

use std::env;
use std::path::{Path, PathBuf};

/// Configuration problems reported at startup.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("unknown STORAGE_BACKEND {0:?} (expected memory, sqlite, mongodb or dynamodb)")]
    UnknownBackend(String),

    #[error("{key} has invalid value {value:?}")]
    InvalidValue { key: &'static str, value: String },
}

/// Engine configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Listen host
    pub server_host: String,
    /// Listen port
    pub server_port: u16,
    /// CORS allowed origins (comma-separated, or "*" for any). Empty disables CORS.
    pub cors_allowed_origins: Vec<String>,
    /// Which store backs the character repository
    pub backend: BackendConfig,
}

/// Storage backend selection and its connection settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendConfig {
    Memory { seed: bool },
    Sqlite(SqliteSettings),
    MongoDb(MongoSettings),
    DynamoDb(DynamoSettings),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqliteSettings {
    pub database_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MongoSettings {
    pub uri: String,
    pub database: String,
    pub collection: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DynamoSettings {
    pub table_name: String,
    pub region: String,
    /// Endpoint override, e.g. DynamoDB Local
    pub endpoint: Option<String>,
}

fn or_default(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: &str) -> String {
    lookup(key)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn parse_bool(key: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            key,
            value: value.to_string(),
        }),
    }
}

impl SqliteSettings {
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            database_url: or_default(&lookup, "DATABASE_URL", "sqlite:characters.db?mode=rwc"),
        }
    }
}

impl MongoSettings {
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            uri: or_default(&lookup, "MONGODB_URI", "mongodb://localhost:27017"),
            database: or_default(&lookup, "MONGODB_DB", "characters"),
            collection: or_default(&lookup, "MONGODB_COLLECTION", "characters"),
        }
    }
}

impl DynamoSettings {
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            table_name: or_default(&lookup, "DYNAMODB_TABLE", "Characters"),
            region: or_default(&lookup, "AWS_REGION", "us-east-1"),
            endpoint: lookup("DYNAMODB_ENDPOINT")
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty()),
        }
    }

    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }
}

impl BackendConfig {
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let backend = or_default(&lookup, "STORAGE_BACKEND", "memory");
        match backend.to_ascii_lowercase().as_str() {
            "memory" | "in-memory" => {
                let seed = or_default(&lookup, "MEMORY_SEED", "false");
                Ok(Self::Memory {
                    seed: parse_bool("MEMORY_SEED", &seed)?,
                })
            }
            "sqlite" | "sql" => Ok(Self::Sqlite(SqliteSettings::from_lookup(lookup))),
            "mongodb" | "mongo" => Ok(Self::MongoDb(MongoSettings::from_lookup(lookup))),
            "dynamodb" | "dynamo" => Ok(Self::DynamoDb(DynamoSettings::from_lookup(lookup))),
            _ => Err(ConfigError::UnknownBackend(backend)),
        }
    }

    /// Short name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Memory { .. } => "memory",
            Self::Sqlite(_) => "sqlite",
            Self::MongoDb(_) => "mongodb",
            Self::DynamoDb(_) => "dynamodb",
        }
    }
}

impl EngineConfig {
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let port = lookup("SERVER_PORT")
            .or_else(|| lookup("PORT"))
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| "3000".to_string());
        let server_port = port.parse().map_err(|_| ConfigError::InvalidValue {
            key: "SERVER_PORT",
            value: port.clone(),
        })?;

        Ok(Self {
            server_host: or_default(&lookup, "SERVER_HOST", "0.0.0.0"),
            server_port,
            cors_allowed_origins: lookup("CORS_ALLOWED_ORIGINS")
                .unwrap_or_default()
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            backend: BackendConfig::from_lookup(&lookup)?,
        })
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}

/// Env files read at startup, local overrides first. Paths are anchored at
/// the workspace root so every binary sees the same settings whatever its
/// working directory.
pub fn dotenv_files() -> [PathBuf; 2] {
    let repo_root = Path::new(env!("CARGO_MANIFEST_DIR")).join("..").join("..");
    [repo_root.join(".env.local"), repo_root.join(".env")]
}

/// Loads the workspace `.env.local` and `.env`. Variables already set win.
pub fn load_dotenv_from_repo_root() {
    for path in dotenv_files() {
        if path.exists() {
            let _ = dotenvy::from_path(&path);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn dotenv_files_live_at_the_workspace_root() {
        let [local, shared] = dotenv_files();
        assert_eq!(local.file_name().and_then(|n| n.to_str()), Some(".env.local"));
        assert_eq!(shared.file_name().and_then(|n| n.to_str()), Some(".env"));
        assert_eq!(local.parent(), shared.parent());

        let root = local.parent().unwrap();
        let manifest = std::fs::read_to_string(root.join("Cargo.toml")).unwrap();
        assert!(manifest.contains("[workspace]"));
    }

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_to_unseeded_memory_on_port_3000() {
        let config = EngineConfig::from_lookup(lookup_from(&[])).unwrap();

        assert_eq!(config.server_host, "0.0.0.0");
        assert_eq!(config.server_port, 3000);
        assert!(config.cors_allowed_origins.is_empty());
        assert_eq!(config.backend, BackendConfig::Memory { seed: false });
        assert_eq!(config.listen_addr(), "0.0.0.0:3000");
    }

    #[test]
    fn port_falls_back_to_port_variable() {
        let config = EngineConfig::from_lookup(lookup_from(&[("PORT", "8080")])).unwrap();
        assert_eq!(config.server_port, 8080);

        let config = EngineConfig::from_lookup(lookup_from(&[
            ("PORT", "8080"),
            ("SERVER_PORT", "9090"),
        ]))
        .unwrap();
        assert_eq!(config.server_port, 9090);
    }

    #[test]
    fn invalid_port_is_rejected() {
        let err = EngineConfig::from_lookup(lookup_from(&[("SERVER_PORT", "http")])).unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidValue {
                key: "SERVER_PORT",
                value: "http".into()
            }
        );
    }

    #[test]
    fn unknown_backend_is_rejected() {
        let err = BackendConfig::from_lookup(lookup_from(&[("STORAGE_BACKEND", "redis")]))
            .unwrap_err();
        assert_eq!(err, ConfigError::UnknownBackend("redis".into()));
    }

    #[test]
    fn memory_seed_flag_is_parsed() {
        let backend = BackendConfig::from_lookup(lookup_from(&[
            ("STORAGE_BACKEND", "memory"),
            ("MEMORY_SEED", "true"),
        ]))
        .unwrap();
        assert_eq!(backend, BackendConfig::Memory { seed: true });

        let err = BackendConfig::from_lookup(lookup_from(&[("MEMORY_SEED", "maybe")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { key: "MEMORY_SEED", .. }));
    }

    #[test]
    fn sqlite_backend_reads_database_url() {
        let backend = BackendConfig::from_lookup(lookup_from(&[
            ("STORAGE_BACKEND", "sqlite"),
            ("DATABASE_URL", "sqlite::memory:"),
        ]))
        .unwrap();
        assert_eq!(
            backend,
            BackendConfig::Sqlite(SqliteSettings {
                database_url: "sqlite::memory:".into()
            })
        );
        assert_eq!(backend.name(), "sqlite");
    }

    #[test]
    fn mongodb_backend_uses_defaults() {
        let backend =
            BackendConfig::from_lookup(lookup_from(&[("STORAGE_BACKEND", "MongoDB")])).unwrap();
        assert_eq!(
            backend,
            BackendConfig::MongoDb(MongoSettings {
                uri: "mongodb://localhost:27017".into(),
                database: "characters".into(),
                collection: "characters".into(),
            })
        );
    }

    #[test]
    fn dynamodb_backend_reads_endpoint_override() {
        let backend = BackendConfig::from_lookup(lookup_from(&[
            ("STORAGE_BACKEND", "dynamodb"),
            ("DYNAMODB_TABLE", "Heroes"),
            ("AWS_REGION", "eu-west-1"),
            ("DYNAMODB_ENDPOINT", "http://localhost:8000"),
        ]))
        .unwrap();
        assert_eq!(
            backend,
            BackendConfig::DynamoDb(DynamoSettings {
                table_name: "Heroes".into(),
                region: "eu-west-1".into(),
                endpoint: Some("http://localhost:8000".into()),
            })
        );
    }

    #[test]
    fn cors_origins_are_split_and_trimmed() {
        let config = EngineConfig::from_lookup(lookup_from(&[(
            "CORS_ALLOWED_ORIGINS",
            "http://localhost:5173, https://roster.example ,",
        )]))
        .unwrap();
        assert_eq!(
            config.cors_allowed_origins,
            vec!["http://localhost:5173", "https://roster.example"]
        );
    }
}
