use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque character identity.
///
/// Each backend mints its own format (sequence number, database key,
/// ObjectId hex, UUID). Callers only compare and display it; adapters
/// convert to their native key type internally.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CharacterId(String);

impl CharacterId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CharacterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for CharacterId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for CharacterId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<CharacterId> for String {
    fn from(value: CharacterId) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_as_plain_string() {
        let id = CharacterId::new("65f1c0ffee");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"65f1c0ffee\"");
        let back: CharacterId = serde_json::from_str("\"65f1c0ffee\"").unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn display_is_the_raw_value() {
        assert_eq!(CharacterId::from("42").to_string(), "42");
    }
}
