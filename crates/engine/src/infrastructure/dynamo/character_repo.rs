//! DynamoDB character repository implementation.
//!
//! One item per character, hash key `id` (a client-generated UUID string).
//! Lookups by level or class are filtered scans.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use aws_sdk_dynamodb::error::DisplayErrorContext;
use aws_sdk_dynamodb::types::{AttributeValue, ReturnValue, Select};
use aws_sdk_dynamodb::Client;
use chrono::{DateTime, Utc};
use roster_domain::common::format_datetime;
use roster_domain::{Character, CharacterData, CharacterField, CharacterId, CharacterPatch, FieldValue};

use super::items::{self, field_value_to_attribute, item_to_character, Item};
use crate::infrastructure::ports::{CharacterRepo, ClockPort, RandomPort, RepoError};

const ITEM_EXISTS: &str = "attribute_exists(#id)";
const ITEM_ABSENT: &str = "attribute_not_exists(#id)";

/// A `SET` update expression with its placeholder maps.
#[derive(Debug)]
struct UpdateExpression {
    expression: String,
    names: HashMap<String, String>,
    values: HashMap<String, AttributeValue>,
}

impl UpdateExpression {
    /// `SET #a0 = :v0, ..., #updatedAt = :updatedAt`, guarded on `#id`.
    fn set(entries: Vec<(CharacterField, FieldValue)>, now: DateTime<Utc>) -> Self {
        let mut assignments = Vec::with_capacity(entries.len() + 1);
        let mut names = HashMap::from([("#id".to_string(), items::ID.to_string())]);
        let mut values = HashMap::new();

        for (index, (field, value)) in entries.into_iter().enumerate() {
            let name = format!("#a{index}");
            let placeholder = format!(":v{index}");
            assignments.push(format!("{name} = {placeholder}"));
            names.insert(name, field.attribute().to_string());
            values.insert(placeholder, field_value_to_attribute(value));
        }

        assignments.push("#updatedAt = :updatedAt".to_string());
        names.insert("#updatedAt".to_string(), items::UPDATED_AT.to_string());
        values.insert(
            ":updatedAt".to_string(),
            AttributeValue::S(format_datetime(now)),
        );

        Self {
            expression: format!("SET {}", assignments.join(", ")),
            names,
            values,
        }
    }
}

/// A scan filter on a single attribute.
struct ScanFilter {
    expression: &'static str,
    name: (&'static str, &'static str),
    value: (&'static str, AttributeValue),
}

/// DynamoDB implementation of [`CharacterRepo`].
pub struct DynamoCharacterRepo {
    client: Client,
    table_name: String,
    clock: Arc<dyn ClockPort>,
    random: Arc<dyn RandomPort>,
}

impl DynamoCharacterRepo {
    pub fn new(
        client: Client,
        table_name: impl Into<String>,
        clock: Arc<dyn ClockPort>,
        random: Arc<dyn RandomPort>,
    ) -> Self {
        Self {
            client,
            table_name: table_name.into(),
            clock,
            random,
        }
    }

    /// Scans the whole table, following `LastEvaluatedKey` until exhausted.
    async fn scan(
        &self,
        operation: &'static str,
        filter: Option<ScanFilter>,
    ) -> Result<Vec<Character>, RepoError> {
        let mut characters = Vec::new();
        let mut start_key: Option<Item> = None;

        loop {
            let mut request = self
                .client
                .scan()
                .table_name(&self.table_name)
                .set_exclusive_start_key(start_key.take());
            if let Some(filter) = &filter {
                request = request
                    .filter_expression(filter.expression)
                    .expression_attribute_names(filter.name.0, filter.name.1)
                    .expression_attribute_values(filter.value.0, filter.value.1.clone());
            }

            let output = request
                .send()
                .await
                .map_err(|e| RepoError::database(operation, DisplayErrorContext(e)))?;
            for item in output.items() {
                characters.push(item_to_character(item)?);
            }

            match output.last_evaluated_key {
                Some(key) if !key.is_empty() => start_key = Some(key),
                _ => break,
            }
        }

        Ok(characters)
    }

    async fn apply_update(
        &self,
        operation: &'static str,
        id: &CharacterId,
        update: UpdateExpression,
    ) -> Result<Option<Character>, RepoError> {
        let Some(key) = items::lookup_key(id) else {
            return Ok(None);
        };
        let result = self
            .client
            .update_item()
            .table_name(&self.table_name)
            .set_key(Some(key))
            .update_expression(update.expression)
            .condition_expression(ITEM_EXISTS)
            .set_expression_attribute_names(Some(update.names))
            .set_expression_attribute_values(Some(update.values))
            .return_values(ReturnValue::AllNew)
            .send()
            .await;

        match result {
            Ok(output) => output.attributes.as_ref().map(item_to_character).transpose(),
            Err(err)
                if err
                    .as_service_error()
                    .is_some_and(|e| e.is_conditional_check_failed_exception()) =>
            {
                Ok(None)
            }
            Err(err) => Err(RepoError::database(operation, DisplayErrorContext(err))),
        }
    }
}

#[async_trait]
impl CharacterRepo for DynamoCharacterRepo {
    async fn find_all(&self) -> Result<Vec<Character>, RepoError> {
        self.scan("dynamo.find_all", None).await
    }

    async fn find_one(&self, id: &CharacterId) -> Result<Option<Character>, RepoError> {
        let Some(key) = items::lookup_key(id) else {
            return Ok(None);
        };
        let output = self
            .client
            .get_item()
            .table_name(&self.table_name)
            .set_key(Some(key))
            .consistent_read(true)
            .send()
            .await
            .map_err(|e| RepoError::database("dynamo.find_one", DisplayErrorContext(e)))?;
        output.item.as_ref().map(item_to_character).transpose()
    }

    async fn add(&self, data: &CharacterData) -> Result<Character, RepoError> {
        let now = self.clock.now();
        let id = CharacterId::new(self.random.gen_uuid().to_string());
        let item = items::character_to_item(
            &Character::new(id, data.clone()).with_timestamps(now, now),
        );
        // What a later read returns, timestamps truncated as stored
        let stored = item_to_character(&item)?;

        let result = self
            .client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(item))
            .condition_expression(ITEM_ABSENT)
            .expression_attribute_names("#id", items::ID)
            .send()
            .await;

        match result {
            Ok(_) => {
                tracing::debug!(character_id = %stored.id, "Put character item");
                Ok(stored)
            }
            Err(err)
                if err
                    .as_service_error()
                    .is_some_and(|e| e.is_conditional_check_failed_exception()) =>
            {
                Err(RepoError::constraint(format!(
                    "character id {} already exists",
                    stored.id
                )))
            }
            Err(err) => Err(RepoError::database("dynamo.add", DisplayErrorContext(err))),
        }
    }

    async fn update(
        &self,
        id: &CharacterId,
        data: &CharacterData,
    ) -> Result<Option<Character>, RepoError> {
        // Every attribute is SET, createdAt is left alone
        let update = UpdateExpression::set(data.entries(), self.clock.now());
        self.apply_update("dynamo.update", id, update).await
    }

    async fn partial_update(
        &self,
        id: &CharacterId,
        patch: &CharacterPatch,
    ) -> Result<Option<Character>, RepoError> {
        if patch.is_empty() {
            return self.find_one(id).await;
        }
        let update = UpdateExpression::set(patch.entries(), self.clock.now());
        self.apply_update("dynamo.partial_update", id, update).await
    }

    async fn delete(&self, id: &CharacterId) -> Result<Option<Character>, RepoError> {
        let Some(key) = items::lookup_key(id) else {
            return Ok(None);
        };
        let output = self
            .client
            .delete_item()
            .table_name(&self.table_name)
            .set_key(Some(key))
            .return_values(ReturnValue::AllOld)
            .send()
            .await
            .map_err(|e| RepoError::database("dynamo.delete", DisplayErrorContext(e)))?;
        output.attributes.as_ref().map(item_to_character).transpose()
    }

    async fn find_by_level(&self, level: i32) -> Result<Vec<Character>, RepoError> {
        let filter = ScanFilter {
            expression: "#level = :level",
            name: ("#level", "level"),
            value: (":level", AttributeValue::N(level.to_string())),
        };
        self.scan("dynamo.find_by_level", Some(filter)).await
    }

    async fn find_by_class(&self, character_class: &str) -> Result<Vec<Character>, RepoError> {
        let filter = ScanFilter {
            expression: "#characterClass = :characterClass",
            name: ("#characterClass", "characterClass"),
            value: (
                ":characterClass",
                AttributeValue::S(character_class.to_string()),
            ),
        };
        self.scan("dynamo.find_by_class", Some(filter)).await
    }

    async fn count(&self) -> Result<u64, RepoError> {
        let mut total: u64 = 0;
        let mut start_key: Option<Item> = None;

        loop {
            let output = self
                .client
                .scan()
                .table_name(&self.table_name)
                .select(Select::Count)
                .set_exclusive_start_key(start_key.take())
                .send()
                .await
                .map_err(|e| RepoError::database("dynamo.count", DisplayErrorContext(e)))?;
            total += output.count.max(0) as u64;

            match output.last_evaluated_key {
                Some(key) if !key.is_empty() => start_key = Some(key),
                _ => break,
            }
        }

        Ok(total)
    }
}
