//! Application use cases. Orchestrate domain logic via ports.

pub mod analytics_service;
pub mod risk_scan;

pub use analytics_service::AnalyticsService;
