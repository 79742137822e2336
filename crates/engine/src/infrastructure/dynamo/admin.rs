//! DynamoDB table provisioning.
//!
//! Used by the `xtask dynamo` commands and by startup checks. The repository
//! itself never creates or deletes tables.

use std::time::Duration;

use aws_sdk_dynamodb::error::DisplayErrorContext;
use aws_sdk_dynamodb::types::{
    AttributeDefinition, BillingMode, KeySchemaElement, KeyType, ScalarAttributeType, TableStatus,
};
use aws_sdk_dynamodb::Client;

use super::items;

/// How long `wait_until_active` sleeps between checks by default.
pub const DEFAULT_WAIT_INTERVAL: Duration = Duration::from_secs(2);
/// How many checks `wait_until_active` makes by default.
pub const DEFAULT_WAIT_ATTEMPTS: u32 = 30;

#[derive(Debug, thiserror::Error)]
pub enum ProvisionError {
    #[error("table {0} does not exist")]
    TableMissing(String),

    #[error("table {table} still not active after {attempts} checks")]
    Timeout { table: String, attempts: u32 },

    #[error("DynamoDB request failed in {operation}: {message}")]
    Request {
        operation: &'static str,
        message: String,
    },
}

impl ProvisionError {
    fn request(operation: &'static str, message: impl ToString) -> Self {
        Self::Request {
            operation,
            message: message.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableCreation {
    Created,
    AlreadyExists,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSummary {
    pub name: String,
    pub status: String,
    /// Approximate, refreshed by DynamoDB roughly every six hours.
    pub item_count: Option<i64>,
}

/// Administrative operations on the characters table.
pub struct DynamoTableAdmin {
    client: Client,
    table_name: String,
}

impl DynamoTableAdmin {
    pub fn new(client: Client, table_name: impl Into<String>) -> Self {
        Self {
            client,
            table_name: table_name.into(),
        }
    }

    /// Creates the table with hash key `id` (S), on-demand billing.
    pub async fn create_table(&self) -> Result<TableCreation, ProvisionError> {
        let id_definition = AttributeDefinition::builder()
            .attribute_name(items::ID)
            .attribute_type(ScalarAttributeType::S)
            .build()
            .map_err(|e| ProvisionError::request("create_table", e))?;
        let id_key = KeySchemaElement::builder()
            .attribute_name(items::ID)
            .key_type(KeyType::Hash)
            .build()
            .map_err(|e| ProvisionError::request("create_table", e))?;

        let result = self
            .client
            .create_table()
            .table_name(&self.table_name)
            .attribute_definitions(id_definition)
            .key_schema(id_key)
            .billing_mode(BillingMode::PayPerRequest)
            .send()
            .await;

        match result {
            Ok(_) => {
                tracing::info!(table = %self.table_name, "Created DynamoDB table");
                Ok(TableCreation::Created)
            }
            Err(err)
                if err
                    .as_service_error()
                    .is_some_and(|e| e.is_resource_in_use_exception()) =>
            {
                tracing::info!(table = %self.table_name, "DynamoDB table already exists");
                Ok(TableCreation::AlreadyExists)
            }
            Err(err) => Err(ProvisionError::request(
                "create_table",
                DisplayErrorContext(err),
            )),
        }
    }

    /// Deletes the table. Returns `false` if it did not exist.
    pub async fn delete_table(&self) -> Result<bool, ProvisionError> {
        let result = self
            .client
            .delete_table()
            .table_name(&self.table_name)
            .send()
            .await;

        match result {
            Ok(_) => {
                tracing::info!(table = %self.table_name, "Deleted DynamoDB table");
                Ok(true)
            }
            Err(err)
                if err
                    .as_service_error()
                    .is_some_and(|e| e.is_resource_not_found_exception()) =>
            {
                Ok(false)
            }
            Err(err) => Err(ProvisionError::request(
                "delete_table",
                DisplayErrorContext(err),
            )),
        }
    }

    /// Current name, status and approximate item count, or `None` if missing.
    pub async fn describe(&self) -> Result<Option<TableSummary>, ProvisionError> {
        let result = self
            .client
            .describe_table()
            .table_name(&self.table_name)
            .send()
            .await;

        let output = match result {
            Ok(output) => output,
            Err(err)
                if err
                    .as_service_error()
                    .is_some_and(|e| e.is_resource_not_found_exception()) =>
            {
                return Ok(None);
            }
            Err(err) => {
                return Err(ProvisionError::request(
                    "describe_table",
                    DisplayErrorContext(err),
                ))
            }
        };

        Ok(output.table().map(|table| TableSummary {
            name: table
                .table_name()
                .unwrap_or(self.table_name.as_str())
                .to_string(),
            status: table
                .table_status()
                .map(|status| status.as_str().to_string())
                .unwrap_or_else(|| "UNKNOWN".to_string()),
            item_count: table.item_count(),
        }))
    }

    /// Every table name in the account and region.
    pub async fn list_tables(&self) -> Result<Vec<String>, ProvisionError> {
        let mut names = Vec::new();
        let mut start: Option<String> = None;

        loop {
            let output = self
                .client
                .list_tables()
                .set_exclusive_start_table_name(start.take())
                .send()
                .await
                .map_err(|e| ProvisionError::request("list_tables", DisplayErrorContext(e)))?;
            names.extend(output.table_names().iter().cloned());

            match output.last_evaluated_table_name {
                Some(name) => start = Some(name),
                None => break,
            }
        }

        Ok(names)
    }

    /// Polls until the table reports `ACTIVE`.
    ///
    /// A table that does not exist is an error straight away rather than
    /// something to wait for.
    pub async fn wait_until_active(
        &self,
        interval: Duration,
        attempts: u32,
    ) -> Result<TableSummary, ProvisionError> {
        for attempt in 1..=attempts {
            let summary = self
                .describe()
                .await?
                .ok_or_else(|| ProvisionError::TableMissing(self.table_name.clone()))?;

            if summary.status == TableStatus::Active.as_str() {
                return Ok(summary);
            }

            tracing::debug!(
                table = %self.table_name,
                status = %summary.status,
                attempt,
                "Waiting for DynamoDB table to become active"
            );
            if attempt < attempts {
                tokio::time::sleep(interval).await;
            }
        }

        Err(ProvisionError::Timeout {
            table: self.table_name.clone(),
            attempts,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provision_errors_name_the_table() {
        assert_eq!(
            ProvisionError::TableMissing("Characters".into()).to_string(),
            "table Characters does not exist"
        );
        assert_eq!(
            ProvisionError::Timeout {
                table: "Characters".into(),
                attempts: 30
            }
            .to_string(),
            "table Characters still not active after 30 checks"
        );
    }
}
