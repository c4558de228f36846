//! Cross-cutting configuration.

pub mod config;
