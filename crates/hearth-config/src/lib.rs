//! # Hearth Config
//!
//! Configuration management for Hearth.
//! Supports layered configuration from files and environment variables,
//! validation on load, and runtime refresh.

mod app_config;
mod loader;
mod validation;

pub use app_config::*;
pub use loader::*;
pub use validation::*;
