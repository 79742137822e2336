//! MongoDB database implementations.

mod character_repo;
mod document;

#[cfg(test)]
mod integration_tests;

pub use character_repo::MongoCharacterRepo;
