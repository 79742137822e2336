use std::sync::Arc;

use chrono::{TimeZone, Utc};
use testcontainers::{core::WaitFor, runners::AsyncRunner, ContainerAsync, GenericImage};

use super::MongoCharacterRepo;
use crate::infrastructure::clock::FixedClock;
use crate::infrastructure::contract_tests;
use crate::infrastructure::ports::{CharacterRepo, ClockPort};
use crate::test_fixtures::gandalf;

const MONGO_PORT: u16 = 27017;

fn mongo_image() -> GenericImage {
    GenericImage::new("mongo", "7.0")
        .with_exposed_port(MONGO_PORT)
        .with_wait_for(WaitFor::message_on_stdout("Waiting for connections"))
}

async fn start_repo(
    collection: &str,
) -> (ContainerAsync<GenericImage>, MongoCharacterRepo) {
    let container = mongo_image().start().await;
    let port = container.get_host_port_ipv4(MONGO_PORT).await;
    let clock: Arc<dyn ClockPort> = Arc::new(FixedClock(
        Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap(),
    ));
    let repo = MongoCharacterRepo::connect(
        &format!("mongodb://127.0.0.1:{port}"),
        "characters_test",
        collection,
        clock,
    )
    .await
    .expect("connect to MongoDB container");
    (container, repo)
}

#[tokio::test]
#[ignore = "requires docker (testcontainers)"]
async fn mongo_repo_satisfies_repository_contract() {
    let (_container, repo) = start_repo("contract").await;
    contract_tests::assert_repository_contract(&repo).await;
    repo.close().await;
}

#[tokio::test]
#[ignore = "requires docker (testcontainers)"]
async fn mongo_repo_supports_example_lookups() {
    let (_container, repo) = start_repo("lookups").await;
    contract_tests::assert_example_lookups(&repo).await;
    repo.close().await;
}

#[tokio::test]
#[ignore = "requires docker (testcontainers)"]
async fn mongo_ids_are_object_id_hex_and_timestamps_are_kept() {
    let (_container, repo) = start_repo("ids").await;

    let created = repo.add(&gandalf()).await.expect("add");
    assert_eq!(created.id.as_str().len(), 24);
    assert!(created.id.as_str().bytes().all(|b| b.is_ascii_hexdigit()));

    let found = repo
        .find_one(&created.id)
        .await
        .expect("find_one")
        .expect("stored document");
    assert_eq!(found.created_at, created.created_at);
    assert_eq!(found.updated_at, created.updated_at);
    assert_eq!(repo.count().await.expect("count"), 1);
}
