//! Infrastructure adapters. Implement ports.
//!
//! JSON fixtures, in-memory store, clock, HTTP. Map errors to DomainError.

pub mod clock;
pub mod http;
pub mod persistence;
