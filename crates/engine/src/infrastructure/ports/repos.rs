//! Repository port trait for character storage.

use async_trait::async_trait;
use roster_domain::{Character, CharacterData, CharacterId, CharacterPatch};

use super::error::RepoError;

// =============================================================================
// Character Storage
// =============================================================================

/// Storage contract every character backend satisfies.
///
/// Ids are opaque strings at this boundary. An id the backend cannot even
/// parse (a non-numeric key for SQL, a non-ObjectId for MongoDB) is simply
/// absent, so it yields `Ok(None)` like any other unknown id. `Err` is
/// reserved for the store failing.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CharacterRepo: Send + Sync {
    // CRUD
    /// Every stored character, in backend-defined order.
    async fn find_all(&self) -> Result<Vec<Character>, RepoError>;
    async fn find_one(&self, id: &CharacterId) -> Result<Option<Character>, RepoError>;
    /// Persists a new character under a backend-assigned id.
    ///
    /// Never overwrites an existing record; an id collision is a
    /// `ConstraintViolation`.
    async fn add(&self, data: &CharacterData) -> Result<Character, RepoError>;
    /// Replaces every attribute of the character.
    async fn update(
        &self,
        id: &CharacterId,
        data: &CharacterData,
    ) -> Result<Option<Character>, RepoError>;
    /// Changes only the fields present in `patch`.
    async fn partial_update(
        &self,
        id: &CharacterId,
        patch: &CharacterPatch,
    ) -> Result<Option<Character>, RepoError>;
    /// Removes the character and returns its last stored value.
    async fn delete(&self, id: &CharacterId) -> Result<Option<Character>, RepoError>;

    // Queries
    async fn find_by_level(&self, level: i32) -> Result<Vec<Character>, RepoError> {
        let characters = self.find_all().await?;
        Ok(characters
            .into_iter()
            .filter(|c| c.data.level == level)
            .collect())
    }

    async fn find_by_class(&self, character_class: &str) -> Result<Vec<Character>, RepoError> {
        let characters = self.find_all().await?;
        Ok(characters
            .into_iter()
            .filter(|c| c.data.character_class == character_class)
            .collect())
    }

    async fn count(&self) -> Result<u64, RepoError> {
        Ok(self.find_all().await?.len() as u64)
    }

    // Lifecycle
    /// Releases pooled connections. Called once at shutdown.
    async fn close(&self) {}
}
