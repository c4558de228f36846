//! Core domain layer. No external I/O dependencies.
//!
//! Entities, calendar rules and report shapes live here. Dependencies flow inward.

pub mod calendar;
pub mod entities;
pub mod errors;
pub mod reports;

pub use calendar::{Quarter, month_key, quarter_months, trailing_months};
pub use entities::{Account, Activity, Deal, RecordSet, Rep, Target};
pub use errors::DomainError;
pub use reports::{
    AccountActivity, HealthReport, LowActivityAccountsData, MonthlyRevenue, Priority,
    Recommendation, RepPerformance, RevenueDrivers, RiskFactor, RiskKind, Severity, StaleDeal,
    StaleDealsData, SummaryReport, UnderperformingRepsData,
};
