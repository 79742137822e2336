//! In-memory character store for development and testing.
//!
//! Characters live in a `Vec` behind a `tokio::sync::RwLock`, in insertion
//! order. Ids are a sequence counter (`"1"`, `"2"`, ...) kept under the same
//! lock, so two concurrent adds can never mint the same id. Nothing is
//! persisted and no timestamps are kept.

use async_trait::async_trait;
use roster_domain::{Character, CharacterData, CharacterId, CharacterPatch};
use tokio::sync::RwLock;

use crate::infrastructure::ports::{CharacterRepo, RepoError};

struct MemoryState {
    characters: Vec<Character>,
    next_id: u64,
}

impl MemoryState {
    fn position(&self, id: &CharacterId) -> Option<usize> {
        self.characters.iter().position(|c| &c.id == id)
    }

    fn insert(&mut self, data: CharacterData) -> Character {
        let id = CharacterId::new(self.next_id.to_string());
        self.next_id += 1;
        let character = Character::new(id, data);
        self.characters.push(character.clone());
        character
    }
}

/// In-memory implementation of [`CharacterRepo`].
pub struct InMemoryCharacterRepo {
    state: RwLock<MemoryState>,
}

impl InMemoryCharacterRepo {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(MemoryState {
                characters: Vec::new(),
                next_id: 1,
            }),
        }
    }

    /// Starts with the given characters already stored, ids assigned in order.
    pub fn with_characters(characters: impl IntoIterator<Item = CharacterData>) -> Self {
        let mut state = MemoryState {
            characters: Vec::new(),
            next_id: 1,
        };
        for data in characters {
            state.insert(data);
        }
        Self {
            state: RwLock::new(state),
        }
    }

    /// Starts with the two default characters.
    pub fn seeded() -> Self {
        Self::with_characters(default_characters())
    }
}

impl Default for InMemoryCharacterRepo {
    fn default() -> Self {
        Self::new()
    }
}

/// The roster a fresh seeded store starts with.
pub fn default_characters() -> Vec<CharacterData> {
    vec![
        CharacterData::new("John Doe", "Warrior")
            .with_level(1)
            .with_hp(100)
            .with_mana(50)
            .with_attack(10)
            .with_items(["Sword", "Shield"]),
        CharacterData::new("Jane Doe", "Wizard")
            .with_level(1)
            .with_hp(100)
            .with_mana(50)
            .with_attack(10)
            .with_items(["Sword", "Shield"]),
    ]
}

#[async_trait]
impl CharacterRepo for InMemoryCharacterRepo {
    async fn find_all(&self) -> Result<Vec<Character>, RepoError> {
        Ok(self.state.read().await.characters.clone())
    }

    async fn find_one(&self, id: &CharacterId) -> Result<Option<Character>, RepoError> {
        let state = self.state.read().await;
        Ok(state.characters.iter().find(|c| &c.id == id).cloned())
    }

    async fn add(&self, data: &CharacterData) -> Result<Character, RepoError> {
        let character = self.state.write().await.insert(data.clone());
        tracing::debug!(character_id = %character.id, "Stored character in memory");
        Ok(character)
    }

    async fn update(
        &self,
        id: &CharacterId,
        data: &CharacterData,
    ) -> Result<Option<Character>, RepoError> {
        let mut state = self.state.write().await;
        let Some(index) = state.position(id) else {
            return Ok(None);
        };
        let character = &mut state.characters[index];
        character.data = data.clone();
        Ok(Some(character.clone()))
    }

    async fn partial_update(
        &self,
        id: &CharacterId,
        patch: &CharacterPatch,
    ) -> Result<Option<Character>, RepoError> {
        let mut state = self.state.write().await;
        let Some(index) = state.position(id) else {
            return Ok(None);
        };
        let character = &mut state.characters[index];
        patch.apply_to(&mut character.data);
        Ok(Some(character.clone()))
    }

    async fn delete(&self, id: &CharacterId) -> Result<Option<Character>, RepoError> {
        let mut state = self.state.write().await;
        Ok(state
            .position(id)
            .map(|index| state.characters.remove(index)))
    }

    async fn count(&self) -> Result<u64, RepoError> {
        Ok(self.state.read().await.characters.len() as u64)
    }
}
