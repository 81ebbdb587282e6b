//! cielterm Library
//!
//! This module exposes the data clients, cache, configuration and CLI
//! modules for use in integration tests.

pub mod cache;
pub mod cli;
pub mod config;
pub mod data;
pub mod fetch;
