//! Library crate for scoreboard-sync, exposing modules for binaries and integration tests.

/// Runtime configuration.
pub mod config;
/// Workbook access.
pub mod dao;
/// HTTP and webhook wire types.
pub mod dto;
/// Error types.
pub mod error;
/// HTTP routes.
pub mod routes;
/// Sync pipeline services.
pub mod services;
/// Shared application state.
pub mod state;

#[cfg(test)]
mod test_support;
