//! Character CRUD operations.

use std::sync::Arc;

use roster_domain::{Character, CharacterId, CharacterPatch};

use crate::infrastructure::ports::CharacterRepo;

use super::ManagementError;

/// Which characters `list` returns.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CharacterFilter {
    #[default]
    All,
    Level(i32),
    Class(String),
}

pub struct CharacterCrud {
    repo: Arc<dyn CharacterRepo>,
}

impl CharacterCrud {
    pub fn new(repo: Arc<dyn CharacterRepo>) -> Self {
        Self { repo }
    }

    pub async fn list(&self, filter: CharacterFilter) -> Result<Vec<Character>, ManagementError> {
        let characters = match filter {
            CharacterFilter::All => self.repo.find_all().await?,
            CharacterFilter::Level(level) => self.repo.find_by_level(level).await?,
            CharacterFilter::Class(class) => self.repo.find_by_class(&class).await?,
        };
        Ok(characters)
    }

    pub async fn get(&self, id: &CharacterId) -> Result<Character, ManagementError> {
        self.repo
            .find_one(id)
            .await?
            .ok_or(ManagementError::NotFound)
    }

    /// Creates a character. Every scalar field must be supplied.
    pub async fn create(&self, input: CharacterPatch) -> Result<Character, ManagementError> {
        let data = input.into_data()?;
        data.validate()?;

        let character = self.repo.add(&data).await?;
        tracing::info!(character_id = %character.id, name = %character.data.name, "Character created");
        Ok(character)
    }

    /// Replaces every field of an existing character.
    pub async fn replace(
        &self,
        id: &CharacterId,
        input: CharacterPatch,
    ) -> Result<Character, ManagementError> {
        let data = input.into_data()?;
        data.validate()?;

        self.repo
            .update(id, &data)
            .await?
            .ok_or(ManagementError::NotFound)
    }

    /// Changes only the supplied fields.
    pub async fn patch(
        &self,
        id: &CharacterId,
        patch: CharacterPatch,
    ) -> Result<Character, ManagementError> {
        patch.validate()?;

        self.repo
            .partial_update(id, &patch)
            .await?
            .ok_or(ManagementError::NotFound)
    }

    /// Deletes and returns the removed character.
    pub async fn delete(&self, id: &CharacterId) -> Result<Character, ManagementError> {
        let removed = self
            .repo
            .delete(id)
            .await?
            .ok_or(ManagementError::NotFound)?;
        tracing::info!(character_id = %removed.id, "Character deleted");
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::ports::{MockCharacterRepo, RepoError};
    use crate::test_fixtures::gandalf;
    use mockall::predicate::eq;
    use roster_domain::CharacterData;

    fn crud(repo: MockCharacterRepo) -> CharacterCrud {
        CharacterCrud::new(Arc::new(repo))
    }

    fn stored(id: &str, data: CharacterData) -> Character {
        Character::new(CharacterId::from(id), data)
    }

    #[tokio::test]
    async fn create_rejects_missing_fields_without_touching_the_store() {
        let mut repo = MockCharacterRepo::new();
        repo.expect_add().never();

        let err = crud(repo)
            .create(CharacterPatch::new().with_name("Gandalf"))
            .await
            .unwrap_err();
        assert!(matches!(err, ManagementError::InvalidInput(msg) if msg.contains("characterClass")));
    }

    #[tokio::test]
    async fn create_rejects_level_below_one() {
        let mut repo = MockCharacterRepo::new();
        repo.expect_add().never();

        let input = CharacterPatch::from(gandalf().with_level(0));
        let err = crud(repo).create(input).await.unwrap_err();
        assert!(matches!(err, ManagementError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn create_stores_full_data() {
        let mut repo = MockCharacterRepo::new();
        repo.expect_add()
            .with(eq(gandalf()))
            .times(1)
            .returning(|data| Ok(stored("1", data.clone())));

        let created = crud(repo)
            .create(CharacterPatch::from(gandalf()))
            .await
            .unwrap();
        assert_eq!(created.id.as_str(), "1");
        assert_eq!(created.data, gandalf());
    }

    #[tokio::test]
    async fn get_maps_absence_to_not_found() {
        let mut repo = MockCharacterRepo::new();
        repo.expect_find_one().returning(|_| Ok(None));

        let err = crud(repo).get(&CharacterId::from("42")).await.unwrap_err();
        assert!(matches!(err, ManagementError::NotFound));
    }

    #[tokio::test]
    async fn backend_failure_is_not_reported_as_not_found() {
        let mut repo = MockCharacterRepo::new();
        repo.expect_find_one()
            .returning(|_| Err(RepoError::database("mongo.find_one", "connection reset")));

        let err = crud(repo).get(&CharacterId::from("42")).await.unwrap_err();
        assert!(matches!(err, ManagementError::Repo(RepoError::Database { .. })));
    }

    #[tokio::test]
    async fn replace_requires_every_field() {
        let mut repo = MockCharacterRepo::new();
        repo.expect_update().never();

        let err = crud(repo)
            .replace(&CharacterId::from("1"), CharacterPatch::new().with_level(55))
            .await
            .unwrap_err();
        assert!(matches!(err, ManagementError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn replace_of_missing_character_is_not_found() {
        let mut repo = MockCharacterRepo::new();
        repo.expect_update().times(1).returning(|_, _| Ok(None));

        let err = crud(repo)
            .replace(&CharacterId::from("404"), CharacterPatch::from(gandalf()))
            .await
            .unwrap_err();
        assert!(matches!(err, ManagementError::NotFound));
    }

    #[tokio::test]
    async fn patch_passes_only_supplied_fields() {
        let mut repo = MockCharacterRepo::new();
        repo.expect_partial_update()
            .withf(|id, patch| id.as_str() == "1" && *patch == CharacterPatch::new().with_level(55))
            .times(1)
            .returning(|_, _| Ok(Some(stored("1", gandalf().with_level(55)))));

        let patched = crud(repo)
            .patch(&CharacterId::from("1"), CharacterPatch::new().with_level(55))
            .await
            .unwrap();
        assert_eq!(patched.data.level, 55);
        assert_eq!(patched.data.name, "Gandalf");
    }

    #[tokio::test]
    async fn patch_rejects_negative_hp() {
        let mut repo = MockCharacterRepo::new();
        repo.expect_partial_update().never();

        let err = crud(repo)
            .patch(&CharacterId::from("1"), CharacterPatch::new().with_hp(-5))
            .await
            .unwrap_err();
        assert!(matches!(err, ManagementError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn delete_returns_removed_then_not_found() {
        let mut repo = MockCharacterRepo::new();
        let mut sequence = mockall::Sequence::new();
        repo.expect_delete()
            .times(1)
            .in_sequence(&mut sequence)
            .returning(|id| Ok(Some(stored(id.as_str(), gandalf()))));
        repo.expect_delete()
            .times(1)
            .in_sequence(&mut sequence)
            .returning(|_| Ok(None));

        let crud = crud(repo);
        let id = CharacterId::from("7");
        assert_eq!(crud.delete(&id).await.unwrap().data, gandalf());
        assert!(matches!(
            crud.delete(&id).await.unwrap_err(),
            ManagementError::NotFound
        ));
    }

    #[tokio::test]
    async fn list_dispatches_on_filter() {
        let mut repo = MockCharacterRepo::new();
        repo.expect_find_by_level()
            .with(eq(35))
            .times(1)
            .returning(|_| Ok(vec![]));
        repo.expect_find_by_class()
            .withf(|class| class == "Wizard")
            .times(1)
            .returning(|_| Ok(vec![stored("1", gandalf())]));
        repo.expect_find_all().times(1).returning(|| Ok(vec![]));

        let crud = crud(repo);
        assert!(crud.list(CharacterFilter::Level(35)).await.unwrap().is_empty());
        assert_eq!(
            crud.list(CharacterFilter::Class("Wizard".into()))
                .await
                .unwrap()
                .len(),
            1
        );
        assert!(crud.list(CharacterFilter::All).await.unwrap().is_empty());
    }
}
