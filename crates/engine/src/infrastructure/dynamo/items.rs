//! Conversion between characters and DynamoDB items.
//!
//! Attribute names match the JSON wire names (`characterClass`, `createdAt`).
//! Numbers travel as `N`, the inventory as an `L` of `S`.

use std::collections::HashMap;

use aws_sdk_dynamodb::types::AttributeValue;
use roster_domain::common::{format_datetime, parse_datetime};
use roster_domain::{Character, CharacterData, CharacterField, CharacterId, FieldValue};

use crate::infrastructure::ports::RepoError;

pub(crate) type Item = HashMap<String, AttributeValue>;

pub(crate) const ID: &str = "id";
pub(crate) const CREATED_AT: &str = "createdAt";
pub(crate) const UPDATED_AT: &str = "updatedAt";

/// DynamoDB's limit on a partition key value.
pub(crate) const MAX_KEY_BYTES: usize = 2048;

pub(crate) fn key(id: &CharacterId) -> Item {
    HashMap::from([(ID.to_string(), AttributeValue::S(id.as_str().to_string()))])
}

/// Whether `id` fits in the table's partition key at all.
pub(crate) fn is_storable_key(id: &CharacterId) -> bool {
    !id.as_str().is_empty() && id.as_str().len() <= MAX_KEY_BYTES
}

/// Key for a lookup by id, or `None` when no stored item can carry that id.
pub(crate) fn lookup_key(id: &CharacterId) -> Option<Item> {
    is_storable_key(id).then(|| key(id))
}

pub(crate) fn field_value_to_attribute(value: FieldValue) -> AttributeValue {
    match value {
        FieldValue::Text(text) => AttributeValue::S(text),
        FieldValue::Integer(number) => AttributeValue::N(number.to_string()),
        FieldValue::List(items) => {
            AttributeValue::L(items.into_iter().map(AttributeValue::S).collect())
        }
    }
}

pub(crate) fn character_to_item(character: &Character) -> Item {
    let mut item = key(&character.id);
    for (field, value) in character.data.entries() {
        item.insert(field.attribute().to_string(), field_value_to_attribute(value));
    }
    if let Some(created_at) = character.created_at {
        item.insert(CREATED_AT.to_string(), AttributeValue::S(format_datetime(created_at)));
    }
    if let Some(updated_at) = character.updated_at {
        item.insert(UPDATED_AT.to_string(), AttributeValue::S(format_datetime(updated_at)));
    }
    item
}

pub(crate) fn item_to_character(item: &Item) -> Result<Character, RepoError> {
    let data = CharacterData {
        name: get_string(item, CharacterField::Name.attribute())?,
        character_class: get_string(item, CharacterField::CharacterClass.attribute())?,
        level: get_i32(item, CharacterField::Level.attribute())?,
        hp: get_i32(item, CharacterField::Hp.attribute())?,
        mana: get_i32(item, CharacterField::Mana.attribute())?,
        attack: get_i32(item, CharacterField::Attack.attribute())?,
        items: get_string_list(item, CharacterField::Items.attribute())?,
    };
    let mut character = Character::new(CharacterId::new(get_string(item, ID)?), data);

    if let (Some(created), Some(updated)) = (item.get(CREATED_AT), item.get(UPDATED_AT)) {
        let created = parse_timestamp(CREATED_AT, created)?;
        let updated = parse_timestamp(UPDATED_AT, updated)?;
        character = character.with_timestamps(created, updated);
    }
    Ok(character)
}

fn get_string(item: &Item, name: &str) -> Result<String, RepoError> {
    item.get(name)
        .ok_or_else(|| RepoError::serialization(format!("item is missing {name}")))?
        .as_s()
        .cloned()
        .map_err(|_| RepoError::serialization(format!("{name} is not a string")))
}

fn get_i32(item: &Item, name: &str) -> Result<i32, RepoError> {
    item.get(name)
        .ok_or_else(|| RepoError::serialization(format!("item is missing {name}")))?
        .as_n()
        .map_err(|_| RepoError::serialization(format!("{name} is not a number")))?
        .parse()
        .map_err(|e| RepoError::serialization(format!("{name}: {e}")))
}

/// A missing inventory is empty. String sets are read too.
fn get_string_list(item: &Item, name: &str) -> Result<Vec<String>, RepoError> {
    match item.get(name) {
        None => Ok(Vec::new()),
        Some(AttributeValue::L(values)) => values
            .iter()
            .map(|value| {
                value
                    .as_s()
                    .cloned()
                    .map_err(|_| RepoError::serialization(format!("{name} holds a non-string")))
            })
            .collect(),
        Some(AttributeValue::Ss(values)) => Ok(values.clone()),
        Some(_) => Err(RepoError::serialization(format!("{name} is not a list"))),
    }
}

fn parse_timestamp(
    name: &str,
    value: &AttributeValue,
) -> Result<chrono::DateTime<chrono::Utc>, RepoError> {
    let raw = value
        .as_s()
        .map_err(|_| RepoError::serialization(format!("{name} is not a string")))?;
    parse_datetime(raw).map_err(|e| RepoError::serialization(format!("{name}: {e}")))
}
