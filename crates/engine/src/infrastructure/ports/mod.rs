//! Port traits for infrastructure boundaries.
//!
//! These are the ONLY abstractions in the engine. Everything else is concrete types.
//! Ports exist for:
//! - Character storage (in-memory, SQLite, MongoDB, DynamoDB)
//! - Clock/Random (for testing)

mod error;
mod repos;
mod testing;

// =============================================================================
// Repository Ports
// =============================================================================
pub use repos::CharacterRepo;

// =============================================================================
// Test-Only Mocks (only available during test builds)
// =============================================================================
#[cfg(test)]
pub use repos::MockCharacterRepo;

#[cfg(test)]
pub use testing::MockClockPort;

// =============================================================================
// Testing Ports
// =============================================================================
pub use testing::{ClockPort, RandomPort};

// =============================================================================
// Error Types
// =============================================================================
pub use error::RepoError;
