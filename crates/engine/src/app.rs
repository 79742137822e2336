//! Application state and composition.

use std::sync::Arc;

use crate::infrastructure::ports::CharacterRepo;
use crate::use_cases;
use crate::use_cases::management::CharacterCrud;

/// Main application state.
///
/// Holds the repository handle and the use cases built on it.
/// Passed to HTTP handlers via Axum state.
pub struct App {
    pub repositories: Repositories,
    pub use_cases: UseCases,
}

/// Container for repository handles.
pub struct Repositories {
    pub character: Arc<dyn CharacterRepo>,
}

/// Container for all use cases.
pub struct UseCases {
    pub management: use_cases::ManagementUseCases,
}

impl App {
    /// Create a new App around the configured character repository.
    pub fn new(character_repo: Arc<dyn CharacterRepo>) -> Self {
        let management =
            use_cases::ManagementUseCases::new(CharacterCrud::new(character_repo.clone()));

        Self {
            repositories: Repositories {
                character: character_repo,
            },
            use_cases: UseCases { management },
        }
    }

    /// Release backend connections. Called once after the server stops.
    pub async fn shutdown(&self) {
        self.repositories.character.close().await;
    }
}
