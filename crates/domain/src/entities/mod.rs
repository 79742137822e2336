//! Domain entities.

mod character;

pub use character::{Character, CharacterData, CharacterField, CharacterPatch, FieldValue};
