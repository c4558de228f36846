//! revenue-intel: sales revenue analytics over a CRM snapshot, served as JSON.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod shared;
pub mod usecases;
