use roster_domain::CharacterPatch;
use serde::{Deserialize, Serialize};

/// Character body accepted by create, replace and partial update.
///
/// Only the seven known keys are read. Any other key in the body is ignored,
/// and a key that is missing or `null` is dropped by [`CharacterInput::sanitize`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterInput {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub character_class: Option<String>,
    #[serde(default)]
    pub level: Option<i32>,
    #[serde(default)]
    pub hp: Option<i32>,
    #[serde(default)]
    pub mana: Option<i32>,
    #[serde(default)]
    pub attack: Option<i32>,
    #[serde(default)]
    pub items: Option<Vec<String>>,
}

impl CharacterInput {
    /// Keeps only the fields that were actually supplied.
    pub fn sanitize(self) -> CharacterPatch {
        CharacterPatch {
            name: self.name,
            character_class: self.character_class,
            level: self.level,
            hp: self.hp,
            mana: self.mana,
            attack: self.attack,
            items: self.items,
        }
    }
}

/// Query string for `GET /api/characters`.
///
/// At most one of the two example lookups applies; `level` wins when both are given.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListCharactersQuery {
    #[serde(default)]
    pub level: Option<i32>,
    #[serde(default)]
    pub character_class: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use roster_domain::{CharacterField, FieldValue};

    #[test]
    fn sanitize_drops_absent_null_and_unknown_keys() {
        let input: CharacterInput = serde_json::from_str(
            r#"{"name": "Gandalf", "mana": null, "isAdmin": true, "id": "999"}"#,
        )
        .unwrap();
        let patch = input.sanitize();

        assert_eq!(
            patch.entries(),
            vec![(CharacterField::Name, FieldValue::Text("Gandalf".into()))]
        );
    }

    #[test]
    fn full_body_sanitizes_to_full_data() {
        let input: CharacterInput = serde_json::from_value(serde_json::json!({
            "name": "Gandalf",
            "characterClass": "Wizard",
            "level": 50,
            "hp": 100,
            "mana": 200,
            "attack": 75,
            "items": ["Staff of Power", "Robe of the Archmagi"]
        }))
        .unwrap();

        let data = input.sanitize().into_data().unwrap();
        assert_eq!(data.character_class, "Wizard");
        assert_eq!(data.items.len(), 2);
    }

    #[test]
    fn list_query_reads_camel_case_keys() {
        let query: ListCharactersQuery =
            serde_json::from_str(r#"{"characterClass": "Wizard"}"#).unwrap();
        assert_eq!(query.character_class.as_deref(), Some("Wizard"));
        assert_eq!(query.level, None);
    }
}
