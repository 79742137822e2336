//! DynamoDB database implementations.

use aws_config::BehaviorVersion;
use aws_sdk_dynamodb::config::Region;
use aws_sdk_dynamodb::Client;

mod admin;
mod character_repo;
mod items;


pub use admin::{
    DynamoTableAdmin, ProvisionError, TableCreation, TableSummary, DEFAULT_WAIT_ATTEMPTS,
    DEFAULT_WAIT_INTERVAL,
};
pub use character_repo::DynamoCharacterRepo;

/// Build a client from the default AWS credential chain.
///
/// `endpoint` overrides the service URL, e.g. `http://localhost:8000` for
/// DynamoDB Local.
pub async fn build_client(region: &str, endpoint: Option<&str>) -> Client {
    let mut loader =
        aws_config::defaults(BehaviorVersion::latest()).region(Region::new(region.to_string()));
    if let Some(endpoint) = endpoint {
        loader = loader.endpoint_url(endpoint);
    }
    Client::new(&loader.load().await)
}
