//! Character entity
//!
//! `CharacterData` is the seven attribute fields a client supplies.
//! `Character` is a persisted record: data plus the backend-assigned id
//! and, where the backend keeps them, creation/update timestamps.
//! `CharacterPatch` is a partial update where absent fields stay untouched.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{CharacterId, DomainError};

/// Attribute fields of a character, without identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterData {
    pub name: String,
    pub character_class: String,
    pub level: i32,
    pub hp: i32,
    pub mana: i32,
    pub attack: i32,
    #[serde(default)]
    pub items: Vec<String>,
}

impl CharacterData {
    pub fn new(name: impl Into<String>, character_class: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            character_class: character_class.into(),
            level: 1,
            hp: 0,
            mana: 0,
            attack: 0,
            items: Vec::new(),
        }
    }

    pub fn with_level(mut self, level: i32) -> Self {
        self.level = level;
        self
    }

    pub fn with_hp(mut self, hp: i32) -> Self {
        self.hp = hp;
        self
    }

    pub fn with_mana(mut self, mana: i32) -> Self {
        self.mana = mana;
        self
    }

    pub fn with_attack(mut self, attack: i32) -> Self {
        self.attack = attack;
        self
    }

    pub fn with_items<I, S>(mut self, items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.items = items.into_iter().map(Into::into).collect();
        self
    }

    /// Checks the numeric ranges: `level >= 1`, `hp`, `mana`, `attack >= 0`.
    pub fn validate(&self) -> Result<(), DomainError> {
        check_level(self.level)?;
        check_non_negative("hp", self.hp)?;
        check_non_negative("mana", self.mana)?;
        check_non_negative("attack", self.attack)
    }

    /// Every field as a `(field, value)` entry, in canonical order.
    pub fn entries(&self) -> Vec<(CharacterField, FieldValue)> {
        vec![
            (CharacterField::Name, FieldValue::Text(self.name.clone())),
            (
                CharacterField::CharacterClass,
                FieldValue::Text(self.character_class.clone()),
            ),
            (CharacterField::Level, FieldValue::Integer(self.level)),
            (CharacterField::Hp, FieldValue::Integer(self.hp)),
            (CharacterField::Mana, FieldValue::Integer(self.mana)),
            (CharacterField::Attack, FieldValue::Integer(self.attack)),
            (CharacterField::Items, FieldValue::List(self.items.clone())),
        ]
    }
}

/// A persisted character.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Character {
    pub id: CharacterId,
    #[serde(flatten)]
    pub data: CharacterData,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Character {
    pub fn new(id: CharacterId, data: CharacterData) -> Self {
        Self {
            id,
            data,
            created_at: None,
            updated_at: None,
        }
    }

    pub fn with_timestamps(mut self, created_at: DateTime<Utc>, updated_at: DateTime<Utc>) -> Self {
        self.created_at = Some(created_at);
        self.updated_at = Some(updated_at);
        self
    }
}

/// Partial update: only the `Some` fields are applied.
///
/// Deserializing a JSON body into a patch is also how request input is
/// sanitized: unknown keys are ignored and absent or `null` keys become `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub character_class: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hp: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mana: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attack: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<String>>,
}

impl CharacterPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_character_class(mut self, character_class: impl Into<String>) -> Self {
        self.character_class = Some(character_class.into());
        self
    }

    pub fn with_level(mut self, level: i32) -> Self {
        self.level = Some(level);
        self
    }

    pub fn with_hp(mut self, hp: i32) -> Self {
        self.hp = Some(hp);
        self
    }

    pub fn with_mana(mut self, mana: i32) -> Self {
        self.mana = Some(mana);
        self
    }

    pub fn with_attack(mut self, attack: i32) -> Self {
        self.attack = Some(attack);
        self
    }

    pub fn with_items<I, S>(mut self, items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.items = Some(items.into_iter().map(Into::into).collect());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }

    /// Supplied fields as `(field, value)` entries, in canonical order.
    ///
    /// Adapters build their dynamic update statements from this list, so
    /// the field names that reach a query are always from the closed
    /// [`CharacterField`] set.
    pub fn entries(&self) -> Vec<(CharacterField, FieldValue)> {
        let mut entries = Vec::new();
        if let Some(name) = &self.name {
            entries.push((CharacterField::Name, FieldValue::Text(name.clone())));
        }
        if let Some(class) = &self.character_class {
            entries.push((CharacterField::CharacterClass, FieldValue::Text(class.clone())));
        }
        if let Some(level) = self.level {
            entries.push((CharacterField::Level, FieldValue::Integer(level)));
        }
        if let Some(hp) = self.hp {
            entries.push((CharacterField::Hp, FieldValue::Integer(hp)));
        }
        if let Some(mana) = self.mana {
            entries.push((CharacterField::Mana, FieldValue::Integer(mana)));
        }
        if let Some(attack) = self.attack {
            entries.push((CharacterField::Attack, FieldValue::Integer(attack)));
        }
        if let Some(items) = &self.items {
            entries.push((CharacterField::Items, FieldValue::List(items.clone())));
        }
        entries
    }

    /// Checks ranges of the supplied fields only.
    pub fn validate(&self) -> Result<(), DomainError> {
        if let Some(level) = self.level {
            check_level(level)?;
        }
        if let Some(hp) = self.hp {
            check_non_negative("hp", hp)?;
        }
        if let Some(mana) = self.mana {
            check_non_negative("mana", mana)?;
        }
        if let Some(attack) = self.attack {
            check_non_negative("attack", attack)?;
        }
        Ok(())
    }

    /// Merges the supplied fields into `data`.
    pub fn apply_to(&self, data: &mut CharacterData) {
        if let Some(name) = &self.name {
            data.name = name.clone();
        }
        if let Some(class) = &self.character_class {
            data.character_class = class.clone();
        }
        if let Some(level) = self.level {
            data.level = level;
        }
        if let Some(hp) = self.hp {
            data.hp = hp;
        }
        if let Some(mana) = self.mana {
            data.mana = mana;
        }
        if let Some(attack) = self.attack {
            data.attack = attack;
        }
        if let Some(items) = &self.items {
            data.items = items.clone();
        }
    }

    /// Builds full character data for create / replace.
    ///
    /// All scalar fields are required; `items` defaults to empty.
    pub fn into_data(self) -> Result<CharacterData, DomainError> {
        Ok(CharacterData {
            name: self.name.ok_or_else(|| DomainError::missing_field("name"))?,
            character_class: self
                .character_class
                .ok_or_else(|| DomainError::missing_field("characterClass"))?,
            level: self.level.ok_or_else(|| DomainError::missing_field("level"))?,
            hp: self.hp.ok_or_else(|| DomainError::missing_field("hp"))?,
            mana: self.mana.ok_or_else(|| DomainError::missing_field("mana"))?,
            attack: self.attack.ok_or_else(|| DomainError::missing_field("attack"))?,
            items: self.items.unwrap_or_default(),
        })
    }
}

impl From<CharacterData> for CharacterPatch {
    fn from(data: CharacterData) -> Self {
        Self {
            name: Some(data.name),
            character_class: Some(data.character_class),
            level: Some(data.level),
            hp: Some(data.hp),
            mana: Some(data.mana),
            attack: Some(data.attack),
            items: Some(data.items),
        }
    }
}

/// The closed set of updatable character fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CharacterField {
    Name,
    CharacterClass,
    Level,
    Hp,
    Mana,
    Attack,
    Items,
}

impl CharacterField {
    /// Relational column name.
    pub fn column(self) -> &'static str {
        match self {
            CharacterField::Name => "name",
            CharacterField::CharacterClass => "character_class",
            CharacterField::Level => "level",
            CharacterField::Hp => "hp",
            CharacterField::Mana => "mana",
            CharacterField::Attack => "attack",
            CharacterField::Items => "items",
        }
    }

    /// Document / item attribute name (matches the JSON wire name).
    pub fn attribute(self) -> &'static str {
        match self {
            CharacterField::Name => "name",
            CharacterField::CharacterClass => "characterClass",
            CharacterField::Level => "level",
            CharacterField::Hp => "hp",
            CharacterField::Mana => "mana",
            CharacterField::Attack => "attack",
            CharacterField::Items => "items",
        }
    }
}

/// A field value, typed the way stores need to encode it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    Integer(i32),
    List(Vec<String>),
}

fn check_level(level: i32) -> Result<(), DomainError> {
    if level < 1 {
        return Err(DomainError::validation(format!(
            "level must be at least 1, got {level}"
        )));
    }
    Ok(())
}

fn check_non_negative(field: &str, value: i32) -> Result<(), DomainError> {
    if value < 0 {
        return Err(DomainError::validation(format!(
            "{field} must not be negative, got {value}"
        )));
    }
    Ok(())
}
