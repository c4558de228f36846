//! Port traits. API boundaries for the hexagon.
//!
//! - Inbound: Called by the HTTP adapter into the application
//! - Outbound: Called by the application into infrastructure (records, clock)

pub mod inbound;
pub mod outbound;

pub use inbound::AnalyticsPort;
pub use outbound::{Clock, RecordSource, RecordStore};
