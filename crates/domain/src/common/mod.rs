//! Common utility functions shared by the engine adapters.
//!
//! Pure functions only, no I/O.

pub mod datetime;

pub use datetime::{format_datetime, parse_datetime};
