//! Roster Engine library.
//!
//! Character storage behind one repository contract, with interchangeable
//! backends and an HTTP API on top.
//!
//! ## Structure
//!
//! - `infrastructure/` - Repository port, storage adapters, config
//! - `use_cases/` - Validation and not-found handling over the port
//! - `api/` - HTTP entry points
//! - `app` - Application composition

pub mod api;
pub mod app;
pub mod infrastructure;
pub mod use_cases;

/// Shared test characters.
#[cfg(test)]
pub mod test_fixtures;

pub use app::App;
