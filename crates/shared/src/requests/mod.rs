//! Request payloads.

mod character;

pub use character::{CharacterInput, ListCharactersQuery};
