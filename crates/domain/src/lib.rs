//! Roster domain types.
//!
//! The character record and the shapes used to create, replace and partially
//! update it. Storage adapters and the HTTP layer both speak these types.

extern crate self as roster_domain;

pub mod common;
pub mod entities;
pub mod error;
pub mod ids;

pub use entities::{Character, CharacterData, CharacterField, CharacterPatch, FieldValue};
pub use error::DomainError;
pub use ids::CharacterId;
