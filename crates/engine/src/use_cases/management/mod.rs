//! Management use cases for CRUD-style operations.
//!
//! These use cases keep HTTP handlers thin while coordinating the repository.

use roster_domain::DomainError;

use crate::infrastructure::ports::RepoError;

mod character;

pub use character::{CharacterCrud, CharacterFilter};

/// Shared error type for management use cases.
#[derive(Debug, thiserror::Error)]
pub enum ManagementError {
    #[error("Not found")]
    NotFound,
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Repository error: {0}")]
    Repo(#[from] RepoError),
}

impl From<DomainError> for ManagementError {
    fn from(err: DomainError) -> Self {
        Self::InvalidInput(err.to_string())
    }
}

/// Container for management use cases.
pub struct ManagementUseCases {
    pub character: CharacterCrud,
}

impl ManagementUseCases {
    pub fn new(character: CharacterCrud) -> Self {
        Self { character }
    }
}
