//! Infrastructure implementations.
//!
//! Contains port trait implementations for external dependencies.

pub mod backend;
pub mod clock;
pub mod config;
pub mod dynamo;
pub mod memory;
pub mod mongo;
pub mod ports;
pub mod sqlite;

#[cfg(test)]
mod contract_tests;
