//! Report shapes returned by the analytics use case and serialized by the HTTP adapter.

use serde::Serialize;

/// Current-quarter revenue against target, plus quarter-over-quarter movement.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryReport {
    pub current_quarter: u32,
    pub current_quarter_year: i32,
    pub revenue: f64,
    pub target: f64,
    pub gap: f64,
    pub gap_percentage: f64,
    pub qoq_change: f64,
    pub qoq_change_percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RevenueDrivers {
    pub pipeline_size: f64,
    /// Percentage, 0..=100.
    pub win_rate: f64,
    pub average_deal_size: f64,
    /// Mean days from creation to close over won deals.
    pub sales_cycle_time: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    High,
    Medium,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
}

/// One risk check result. Serializes as `{type, data, description, severity}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskFactor {
    #[serde(flatten)]
    pub kind: RiskKind,
    pub description: String,
    pub severity: Severity,
}

impl RiskFactor {
    /// Wire name of the check (`stale_deals`, ...).
    pub fn type_name(&self) -> &'static str {
        match self.kind {
            RiskKind::StaleDeals(_) => "stale_deals",
            RiskKind::UnderperformingReps(_) => "underperforming_reps",
            RiskKind::LowActivityAccounts(_) => "low_activity_accounts",
        }
    }
}

/// Payload per risk check, tagged by `type` with the body under `data`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum RiskKind {
    StaleDeals(StaleDealsData),
    UnderperformingReps(UnderperformingRepsData),
    LowActivityAccounts(LowActivityAccountsData),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StaleDealsData {
    /// Total qualifying deals; `deals` holds at most the first five.
    pub count: usize,
    pub deals: Vec<StaleDeal>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StaleDeal {
    pub deal_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rep_name: Option<String>,
    pub stage: String,
    pub age_days: i64,
    pub activity_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub segment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnderperformingRepsData {
    pub count: usize,
    pub reps: Vec<RepPerformance>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RepPerformance {
    pub rep_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rep_name: Option<String>,
    pub win_rate: f64,
    pub total_deals: usize,
    pub won_deals: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LowActivityAccountsData {
    /// Total qualifying accounts; `accounts` holds at most the first five.
    pub count: usize,
    pub accounts: Vec<AccountActivity>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccountActivity {
    pub account_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub segment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,
    pub open_deals: usize,
    pub total_activities: usize,
    pub avg_activities: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub priority: Priority,
    pub action: String,
    pub impact: String,
    pub description: String,
}

/// Closed-won revenue and target for one month of the trend chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyRevenue {
    pub month: String,
    pub revenue: f64,
    pub target: f64,
}

/// Record counts of the loaded snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HealthReport {
    pub status: &'static str,
    pub accounts: usize,
    pub reps: usize,
    pub deals: usize,
    pub activities: usize,
    pub targets: usize,
}
