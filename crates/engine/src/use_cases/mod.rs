//! Use cases - User story orchestration.
//!
//! Use cases sit between the HTTP handlers and the repository port: they
//! validate input and turn "absent" into a typed error the handlers map.

pub mod management;

pub use management::ManagementUseCases;
