//! Testability ports for injecting time and randomness.

use chrono::{DateTime, Utc};
use uuid::Uuid;

// =============================================================================
// Testability Ports
// =============================================================================

#[cfg_attr(test, mockall::automock)]
pub trait ClockPort: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Source of client-generated identifiers.
pub trait RandomPort: Send + Sync {
    fn gen_uuid(&self) -> Uuid;
}
