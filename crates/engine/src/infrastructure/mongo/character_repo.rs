//! MongoDB character repository implementation.

use std::sync::Arc;

use async_trait::async_trait;
use futures_util::TryStreamExt;
use mongodb::bson::{doc, Document};
use mongodb::error::{ErrorKind, WriteFailure};
use mongodb::options::ReturnDocument;
use mongodb::{Client, Collection, IndexModel};
use roster_domain::common::format_datetime;
use roster_domain::{Character, CharacterData, CharacterId, CharacterPatch};

use super::document::{parse_object_id, set_document, CharacterDocument};
use crate::infrastructure::ports::{CharacterRepo, ClockPort, RepoError};

const DUPLICATE_KEY: i32 = 11000;

/// MongoDB implementation of [`CharacterRepo`].
pub struct MongoCharacterRepo {
    client: Client,
    collection: Collection<CharacterDocument>,
    clock: Arc<dyn ClockPort>,
}

impl MongoCharacterRepo {
    pub fn new(client: Client, database: &str, collection: &str, clock: Arc<dyn ClockPort>) -> Self {
        let collection = client.database(database).collection(collection);
        Self {
            client,
            collection,
            clock,
        }
    }

    /// Connects, verifies the server answers a ping, and ensures lookup indexes.
    pub async fn connect(
        uri: &str,
        database: &str,
        collection: &str,
        clock: Arc<dyn ClockPort>,
    ) -> Result<Self, RepoError> {
        let client = Client::with_uri_str(uri)
            .await
            .map_err(|e| RepoError::database("mongo.connect", e))?;
        client
            .database(database)
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|e| RepoError::database("mongo.ping", e))?;

        let repo = Self::new(client, database, collection, clock);
        repo.ensure_indexes().await?;
        tracing::info!(database, collection, "Connected to MongoDB");
        Ok(repo)
    }

    /// Index `level` and `characterClass` for the lookup queries.
    pub async fn ensure_indexes(&self) -> Result<(), RepoError> {
        for keys in [doc! { "level": 1 }, doc! { "characterClass": 1 }] {
            self.collection
                .create_index(IndexModel::builder().keys(keys).build())
                .await
                .map_err(|e| RepoError::database("mongo.ensure_indexes", e))?;
        }
        Ok(())
    }

    async fn find_many(
        &self,
        operation: &'static str,
        filter: Document,
    ) -> Result<Vec<Character>, RepoError> {
        let documents: Vec<CharacterDocument> = self
            .collection
            .find(filter)
            .sort(doc! { "_id": 1 })
            .await
            .map_err(|e| RepoError::database(operation, e))?
            .try_collect()
            .await
            .map_err(|e| RepoError::database(operation, e))?;
        documents
            .into_iter()
            .map(CharacterDocument::into_character)
            .collect()
    }

    async fn set_fields(
        &self,
        operation: &'static str,
        id: &CharacterId,
        set: Document,
    ) -> Result<Option<Character>, RepoError> {
        let Some(oid) = parse_object_id(id) else {
            return Ok(None);
        };
        self.collection
            .find_one_and_update(doc! { "_id": oid }, doc! { "$set": set })
            .return_document(ReturnDocument::After)
            .await
            .map_err(|e| RepoError::database(operation, e))?
            .map(CharacterDocument::into_character)
            .transpose()
    }
}

fn is_duplicate_key(error: &mongodb::error::Error) -> bool {
    matches!(
        error.kind.as_ref(),
        ErrorKind::Write(WriteFailure::WriteError(write_error)) if write_error.code == DUPLICATE_KEY
    )
}

#[async_trait]
impl CharacterRepo for MongoCharacterRepo {
    async fn find_all(&self) -> Result<Vec<Character>, RepoError> {
        self.find_many("mongo.find_all", doc! {}).await
    }

    async fn find_one(&self, id: &CharacterId) -> Result<Option<Character>, RepoError> {
        let Some(oid) = parse_object_id(id) else {
            return Ok(None);
        };
        self.collection
            .find_one(doc! { "_id": oid })
            .await
            .map_err(|e| RepoError::database("mongo.find_one", e))?
            .map(CharacterDocument::into_character)
            .transpose()
    }

    async fn add(&self, data: &CharacterData) -> Result<Character, RepoError> {
        let mut document = CharacterDocument::new(data, format_datetime(self.clock.now()));
        let result = self
            .collection
            .insert_one(&document)
            .await
            .map_err(|e| {
                if is_duplicate_key(&e) {
                    RepoError::constraint(e)
                } else {
                    RepoError::database("mongo.add", e)
                }
            })?;

        let oid = result
            .inserted_id
            .as_object_id()
            .ok_or_else(|| RepoError::serialization("inserted _id is not an ObjectId"))?;
        document.id = Some(oid);

        let character = document.into_character()?;
        tracing::debug!(character_id = %character.id, "Inserted character document");
        Ok(character)
    }

    async fn update(
        &self,
        id: &CharacterId,
        data: &CharacterData,
    ) -> Result<Option<Character>, RepoError> {
        // $set of every attribute leaves createdAt in place
        let set = set_document(data.entries(), self.clock.now());
        self.set_fields("mongo.update", id, set).await
    }

    async fn partial_update(
        &self,
        id: &CharacterId,
        patch: &CharacterPatch,
    ) -> Result<Option<Character>, RepoError> {
        if patch.is_empty() {
            return self.find_one(id).await;
        }
        let set = set_document(patch.entries(), self.clock.now());
        self.set_fields("mongo.partial_update", id, set).await
    }

    async fn delete(&self, id: &CharacterId) -> Result<Option<Character>, RepoError> {
        let Some(oid) = parse_object_id(id) else {
            return Ok(None);
        };
        self.collection
            .find_one_and_delete(doc! { "_id": oid })
            .await
            .map_err(|e| RepoError::database("mongo.delete", e))?
            .map(CharacterDocument::into_character)
            .transpose()
    }

    async fn find_by_level(&self, level: i32) -> Result<Vec<Character>, RepoError> {
        self.find_many("mongo.find_by_level", doc! { "level": level })
            .await
    }

    async fn find_by_class(&self, character_class: &str) -> Result<Vec<Character>, RepoError> {
        self.find_many(
            "mongo.find_by_class",
            doc! { "characterClass": character_class },
        )
        .await
    }

    async fn count(&self) -> Result<u64, RepoError> {
        self.collection
            .count_documents(doc! {})
            .await
            .map_err(|e| RepoError::database("mongo.count", e))
    }

    async fn close(&self) {
        self.client.clone().shutdown().await;
        tracing::info!("MongoDB client shut down");
    }
}
