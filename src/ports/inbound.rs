//! Inbound port. The HTTP adapter calls into the application.

use crate::domain::{
    HealthReport, MonthlyRevenue, Recommendation, RevenueDrivers, RiskFactor, SummaryReport,
};

/// Report queries. Every call reads "today" fresh from the injected clock.
pub trait AnalyticsPort: Send + Sync {
    fn summary(&self) -> SummaryReport;

    fn revenue_drivers(&self) -> RevenueDrivers;

    /// Risk checks in fixed order: stale deals, reps, accounts. Empty checks are omitted.
    fn risk_factors(&self) -> Vec<RiskFactor>;

    /// Up to five recommendations in fixed order, each only when its trigger holds.
    fn recommendations(&self) -> Vec<Recommendation>;

    /// Closed-won revenue vs target for the last `months` months, oldest first.
    fn revenue_trend(&self, months: usize) -> Vec<MonthlyRevenue>;

    fn health(&self) -> HealthReport;
}
