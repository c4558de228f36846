//! Outbound ports. Application calls into infrastructure.
//!
//! Implemented by adapters.

use crate::domain::{Account, Activity, Deal, DomainError, Quarter, RecordSet, Rep, Target};
use chrono::NaiveDate;
use std::collections::HashSet;

/// Source of the CRM snapshot. Loaded once at startup.
#[async_trait::async_trait]
pub trait RecordSource: Send + Sync {
    /// Load every collection. Fails as a whole; never returns a partial set.
    async fn load(&self) -> Result<RecordSet, DomainError>;
}

/// Read-only view over the loaded snapshot.
///
/// Lookups that miss return `None` / empty, never an error.
pub trait RecordStore: Send + Sync {
    fn accounts(&self) -> &[Account];
    fn reps(&self) -> &[Rep];
    fn deals(&self) -> &[Deal];
    fn activities(&self) -> &[Activity];
    fn targets(&self) -> &[Target];

    fn account(&self, account_id: &str) -> Option<&Account>;
    fn rep(&self, rep_id: &str) -> Option<&Rep>;

    /// Number of activities logged against `deal_id`.
    fn activity_count(&self, deal_id: &str) -> usize;

    /// Target for a `YYYY-MM` month; 0 when none is recorded.
    fn target_for_month(&self, month: &str) -> f64;

    fn deals_for_account(&self, account_id: &str) -> Vec<&Deal> {
        self.deals()
            .iter()
            .filter(|d| d.account_id == account_id)
            .collect()
    }

    fn deals_for_rep(&self, rep_id: &str) -> Vec<&Deal> {
        self.deals().iter().filter(|d| d.rep_id == rep_id).collect()
    }

    fn deals_in_stage(&self, stage: &str) -> Vec<&Deal> {
        self.deals().iter().filter(|d| d.stage == stage).collect()
    }

    fn open_deals(&self) -> Vec<&Deal> {
        self.deals().iter().filter(|d| d.is_open()).collect()
    }

    /// Closed-won deals that carry an amount.
    fn closed_won_deals(&self) -> Vec<&Deal> {
        self.deals()
            .iter()
            .filter(|d| d.is_closed_won() && d.amount.is_some())
            .collect()
    }

    fn activities_for_deal(&self, deal_id: &str) -> Vec<&Activity> {
        self.activities()
            .iter()
            .filter(|a| a.deal_id == deal_id)
            .collect()
    }

    /// Deals ordered oldest first (largest age). Stable for equal ages.
    fn deals_by_age(&self, today: NaiveDate) -> Vec<&Deal> {
        let mut deals: Vec<&Deal> = self.deals().iter().collect();
        deals.sort_by_key(|d| std::cmp::Reverse(d.age_days(today)));
        deals
    }

    fn quarter_target(&self, quarter: Quarter) -> f64 {
        quarter
            .months()
            .iter()
            .map(|m| self.target_for_month(m))
            .sum()
    }

    /// Sum of closed-won amounts whose close date falls in `quarter`.
    fn quarter_revenue(&self, quarter: Quarter) -> f64 {
        let months: HashSet<String> = quarter.months().into_iter().collect();
        won_revenue_where(self.deals(), |month| months.contains(month))
    }

    /// Sum of closed-won amounts whose close date falls in the `YYYY-MM` month.
    fn month_revenue(&self, month: &str) -> f64 {
        won_revenue_where(self.deals(), |m| m == month)
    }
}

fn won_revenue_where(deals: &[Deal], in_window: impl Fn(&str) -> bool) -> f64 {
    deals
        .iter()
        .filter(|d| d.is_closed_won())
        .filter_map(|d| match (d.amount, d.closed_at) {
            (Some(amount), Some(closed)) => Some((amount, closed)),
            _ => None,
        })
        .filter(|(_, closed)| in_window(&crate::domain::month_key(*closed)))
        .map(|(amount, _)| amount)
        .sum()
}

/// Wall-clock capability. Injected so reports can be pinned to a date.
pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
}
