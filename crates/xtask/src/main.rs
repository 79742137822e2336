use std::sync::Arc;

use anyhow::Context;
use roster_engine::infrastructure::clock::{SystemClock, SystemRandom};
use roster_engine::infrastructure::config::{
    load_dotenv_from_repo_root, DynamoSettings, SqliteSettings,
};
use roster_engine::infrastructure::dynamo::{
    self, DynamoCharacterRepo, DynamoTableAdmin, TableCreation, DEFAULT_WAIT_ATTEMPTS,
    DEFAULT_WAIT_INTERVAL,
};
use roster_engine::infrastructure::ports::CharacterRepo;
use roster_engine::infrastructure::sqlite::{self, SCHEMA_STATEMENTS};

const USAGE: &str = "Usage: cargo xtask <command>

Commands:
  arch-check                  check that domain crates stay free of storage and web deps
  sql-schema [--apply]        print the SQLite schema, or apply it to DATABASE_URL
  dynamo create               create the DynamoDB table (DYNAMODB_TABLE)
  dynamo delete               delete the DynamoDB table
  dynamo describe             show table status and approximate item count
  dynamo list                 list tables in the region
  dynamo wait                 wait until the table is ACTIVE
  dynamo info                 describe the table and count its items with a scan";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    load_dotenv_from_repo_root();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "roster_engine=info".into()),
        )
        .init();

    let mut args = std::env::args().skip(1);
    match args.next().as_deref() {
        Some("arch-check") => arch_check(),
        Some("sql-schema") => sql_schema(args.next().as_deref() == Some("--apply")).await,
        Some("dynamo") => match args.next().as_deref() {
            Some(action) => dynamo_command(action).await,
            None => anyhow::bail!("{USAGE}"),
        },
        Some(cmd) => anyhow::bail!("Unknown xtask command: {cmd}\n\n{USAGE}"),
        None => anyhow::bail!("{USAGE}"),
    }
}

/// Crates that must stay independent of storage drivers and the web stack.
const PURE_CRATES: [&str; 2] = ["roster-domain", "roster-shared"];
const FORBIDDEN_DEPS: [&str; 7] = [
    "sqlx",
    "mongodb",
    "aws-config",
    "aws-sdk-dynamodb",
    "axum",
    "tokio",
    "roster-engine",
];

#[derive(serde::Deserialize)]
struct Metadata {
    packages: Vec<Package>,
}

#[derive(serde::Deserialize)]
struct Package {
    name: String,
    dependencies: Vec<Dependency>,
}

#[derive(serde::Deserialize)]
struct Dependency {
    name: String,
}

fn arch_check() -> anyhow::Result<()> {
    let output = std::process::Command::new("cargo")
        .args(["metadata", "--format-version", "1", "--no-deps"])
        .output()
        .context("running cargo metadata")?;

    if !output.status.success() {
        anyhow::bail!("cargo metadata failed")
    }

    let metadata: Metadata =
        serde_json::from_slice(&output.stdout).context("parsing cargo metadata")?;

    let mut violations = Vec::new();
    for package in metadata
        .packages
        .iter()
        .filter(|p| PURE_CRATES.contains(&p.name.as_str()))
    {
        for dep in &package.dependencies {
            if FORBIDDEN_DEPS.contains(&dep.name.as_str()) {
                violations.push(format!("{} depends on {}", package.name, dep.name));
            }
        }
    }

    if !violations.is_empty() {
        anyhow::bail!("Architecture check failed:\n  {}", violations.join("\n  "));
    }

    println!("Architecture check passed");
    Ok(())
}

async fn sql_schema(apply: bool) -> anyhow::Result<()> {
    if !apply {
        for statement in SCHEMA_STATEMENTS {
            println!("{};", statement.trim());
        }
        return Ok(());
    }

    let settings = SqliteSettings::from_lookup(|key| std::env::var(key).ok());
    let pool = sqlite::connect_pool(&settings.database_url)
        .await
        .with_context(|| format!("connecting to {}", settings.database_url))?;
    sqlite::ensure_schema(&pool)
        .await
        .context("applying schema")?;
    pool.close().await;

    println!("Schema applied to {}", settings.database_url);
    Ok(())
}

async fn dynamo_command(action: &str) -> anyhow::Result<()> {
    let settings = DynamoSettings::from_env();
    let client = dynamo::build_client(&settings.region, settings.endpoint.as_deref()).await;
    let admin = DynamoTableAdmin::new(client.clone(), &settings.table_name);

    match action {
        "create" => match admin.create_table().await? {
            TableCreation::Created => println!("Created table {}", settings.table_name),
            TableCreation::AlreadyExists => {
                println!("Table {} already exists", settings.table_name)
            }
        },
        "delete" => {
            if admin.delete_table().await? {
                println!("Deleted table {}", settings.table_name);
            } else {
                println!("Table {} does not exist", settings.table_name);
            }
        }
        "describe" => match admin.describe().await? {
            Some(summary) => println!(
                "{}: {} (~{} items)",
                summary.name,
                summary.status,
                summary
                    .item_count
                    .map_or_else(|| "?".to_string(), |n| n.to_string())
            ),
            None => println!("Table {} does not exist", settings.table_name),
        },
        "list" => {
            for name in admin.list_tables().await? {
                println!("{name}");
            }
        }
        "wait" => {
            let summary = admin
                .wait_until_active(DEFAULT_WAIT_INTERVAL, DEFAULT_WAIT_ATTEMPTS)
                .await?;
            println!("{} is {}", summary.name, summary.status);
        }
        "info" => {
            let summary = admin
                .describe()
                .await?
                .with_context(|| format!("table {} does not exist", settings.table_name))?;
            let repo = DynamoCharacterRepo::new(
                client,
                settings.table_name.clone(),
                Arc::new(SystemClock::new()),
                Arc::new(SystemRandom::new()),
            );
            let count = repo.count().await.context("counting characters")?;
            println!("Table:      {}", summary.name);
            println!("Status:     {}", summary.status);
            println!("Characters: {count}");
            println!("Region:     {}", settings.region);
            if let Some(endpoint) = &settings.endpoint {
                println!("Endpoint:   {endpoint}");
            }
        }
        other => anyhow::bail!("Unknown dynamo action: {other}\n\n{USAGE}"),
    }

    Ok(())
}
