//! Stored shape of a character in MongoDB.

use mongodb::bson::oid::ObjectId;
use mongodb::bson::{Bson, Document};
use roster_domain::common::{format_datetime, parse_datetime};
use roster_domain::{Character, CharacterData, CharacterField, CharacterId, FieldValue};
use serde::{Deserialize, Serialize};

use crate::infrastructure::ports::RepoError;

/// One character per document, keyed by a server-generated `ObjectId`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CharacterDocument {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub name: String,
    pub character_class: String,
    pub level: i32,
    pub hp: i32,
    pub mana: i32,
    pub attack: i32,
    #[serde(default)]
    pub items: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl CharacterDocument {
    /// A document ready for insertion; MongoDB fills in `_id`.
    pub fn new(data: &CharacterData, now: String) -> Self {
        Self {
            id: None,
            name: data.name.clone(),
            character_class: data.character_class.clone(),
            level: data.level,
            hp: data.hp,
            mana: data.mana,
            attack: data.attack,
            items: data.items.clone(),
            created_at: Some(now.clone()),
            updated_at: Some(now),
        }
    }

    pub fn into_character(self) -> Result<Character, RepoError> {
        let id = self
            .id
            .ok_or_else(|| RepoError::serialization("character document without _id"))?;
        let data = CharacterData {
            name: self.name,
            character_class: self.character_class,
            level: self.level,
            hp: self.hp,
            mana: self.mana,
            attack: self.attack,
            items: self.items,
        };
        let mut character = Character::new(CharacterId::new(id.to_hex()), data);
        if let (Some(created), Some(updated)) = (self.created_at, self.updated_at) {
            character = character.with_timestamps(
                parse_datetime(&created).map_err(RepoError::serialization)?,
                parse_datetime(&updated).map_err(RepoError::serialization)?,
            );
        }
        Ok(character)
    }
}

/// Lowercase hex ObjectIds only, the form `add` hands out. Any other id,
/// including an uppercase spelling of a stored one, cannot name a document.
pub(crate) fn parse_object_id(id: &CharacterId) -> Option<ObjectId> {
    let oid = ObjectId::parse_str(id.as_str()).ok()?;
    (oid.to_hex() == id.as_str()).then_some(oid)
}

pub(crate) fn field_value_to_bson(value: FieldValue) -> Bson {
    match value {
        FieldValue::Text(text) => Bson::String(text),
        FieldValue::Integer(number) => Bson::Int32(number),
        FieldValue::List(items) => Bson::Array(items.into_iter().map(Bson::String).collect()),
    }
}

/// Body of a `$set` for the given fields plus a fresh `updatedAt`.
pub(crate) fn set_document(
    entries: Vec<(CharacterField, FieldValue)>,
    now: chrono::DateTime<chrono::Utc>,
) -> Document {
    let mut set = Document::new();
    for (field, value) in entries {
        set.insert(field.attribute(), field_value_to_bson(value));
    }
    set.insert("updatedAt", format_datetime(now));
    set
}
