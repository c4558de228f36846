//! Analytics service. Builds the revenue reports from the record store.
//!
//! Every report is a pure read over the store; "today" comes from the injected clock on each call.

use crate::domain::{
    HealthReport, LowActivityAccountsData, MonthlyRevenue, Priority, Quarter, Recommendation,
    RevenueDrivers, RiskFactor, RiskKind, Severity, StaleDealsData, SummaryReport,
    UnderperformingRepsData, trailing_months,
};
use crate::domain::entities::STAGE_NEGOTIATION;
use crate::ports::{AnalyticsPort, Clock, RecordStore};
use crate::usecases::risk_scan::{self, percentage};
use std::sync::Arc;
use tracing::debug;

/// Stale deals and low-activity accounts list at most this many entries.
pub const RISK_SAMPLE_LIMIT: usize = 5;
/// Healthy pipeline is at least this multiple of next quarter's target.
pub const PIPELINE_COVERAGE_MULTIPLE: f64 = 3.0;

/// Service behind the report endpoints.
///
/// Holds the read-only store and the clock; cheap to share behind an `Arc`.
pub struct AnalyticsService {
    store: Arc<dyn RecordStore>,
    clock: Arc<dyn Clock>,
}

impl AnalyticsService {
    pub fn new(store: Arc<dyn RecordStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Sum of amounts over open deals that carry one.
    fn pipeline_value(&self) -> f64 {
        self.store
            .open_deals()
            .iter()
            .filter_map(|d| d.amount)
            .sum()
    }

    /// Pipeline value over next quarter's target. `None` when that target is not positive.
    pub fn pipeline_coverage(&self) -> Option<f64> {
        let next = Quarter::containing(self.clock.today()).next();
        let target = self.store.quarter_target(next);
        (target > 0.0).then(|| self.pipeline_value() / target)
    }
}

impl AnalyticsPort for AnalyticsService {
    fn summary(&self) -> SummaryReport {
        let current = Quarter::containing(self.clock.today());
        let revenue = self.store.quarter_revenue(current);
        let target = self.store.quarter_target(current);
        let gap = target - revenue;

        let previous_revenue = self.store.quarter_revenue(current.previous());
        let qoq_change = revenue - previous_revenue;

        debug!(
            quarter = current.quarter,
            year = current.year,
            revenue,
            target,
            previous_revenue,
            "summary computed"
        );

        SummaryReport {
            current_quarter: current.quarter,
            current_quarter_year: current.year,
            revenue,
            target,
            gap,
            gap_percentage: percentage(gap, target),
            qoq_change,
            qoq_change_percentage: percentage(qoq_change, previous_revenue),
        }
    }

    fn revenue_drivers(&self) -> RevenueDrivers {
        let today = self.clock.today();
        let deals = self.store.deals();

        let won_count = deals.iter().filter(|d| d.is_closed_won()).count();
        let win_rate = percentage(won_count as f64, deals.len() as f64);

        let won_amounts: Vec<f64> = self
            .store
            .closed_won_deals()
            .iter()
            .filter_map(|d| d.amount)
            .collect();
        let average_deal_size = mean(&won_amounts);

        // Non-positive ages are data anomalies and are left out, not counted as zero.
        let cycle_days: Vec<f64> = deals
            .iter()
            .filter(|d| d.is_closed_won())
            .map(|d| d.age_days(today))
            .filter(|&age| age > 0)
            .map(|age| age as f64)
            .collect();
        let sales_cycle_time = mean(&cycle_days);

        let pipeline_size = self.pipeline_value();
        debug!(pipeline_size, win_rate, average_deal_size, sales_cycle_time, "drivers computed");

        RevenueDrivers {
            pipeline_size,
            win_rate,
            average_deal_size,
            sales_cycle_time,
        }
    }

    fn risk_factors(&self) -> Vec<RiskFactor> {
        let store = self.store.as_ref();
        let mut risks = Vec::new();

        let stale = risk_scan::stale_deals(store, self.clock.today());
        if !stale.is_empty() {
            let count = stale.len();
            risks.push(RiskFactor {
                kind: RiskKind::StaleDeals(StaleDealsData {
                    count,
                    deals: stale.into_iter().take(RISK_SAMPLE_LIMIT).collect(),
                }),
                description: format!(
                    "Found {} deals older than {} days without recent activity",
                    count,
                    risk_scan::STALE_DEAL_DAYS
                ),
                severity: Severity::High,
            });
        }

        let reps = risk_scan::underperforming_reps(store);
        if !reps.is_empty() {
            let count = reps.len();
            risks.push(RiskFactor {
                kind: RiskKind::UnderperformingReps(UnderperformingRepsData { count, reps }),
                description: format!(
                    "Found {} sales reps with win rate below {}%",
                    count,
                    risk_scan::REP_WIN_RATE_FLOOR
                ),
                severity: Severity::Medium,
            });
        }

        let accounts = risk_scan::low_activity_accounts(store);
        if !accounts.is_empty() {
            let count = accounts.len();
            risks.push(RiskFactor {
                kind: RiskKind::LowActivityAccounts(LowActivityAccountsData {
                    count,
                    accounts: accounts.into_iter().take(RISK_SAMPLE_LIMIT).collect(),
                }),
                description: format!(
                    "Found {} accounts with open deals but low activity",
                    count
                ),
                severity: Severity::Medium,
            });
        }

        debug!(risks = risks.len(), "risk factors computed");
        risks
    }

    fn recommendations(&self) -> Vec<Recommendation> {
        let store = self.store.as_ref();
        let today = self.clock.today();
        let mut recs = Vec::new();

        let at_risk = risk_scan::stale_enterprise_value(store, today);
        if at_risk > 0.0 {
            recs.push(Recommendation {
                priority: Priority::High,
                action: format!(
                    "Focus on Enterprise deals older than {} days",
                    risk_scan::ENTERPRISE_STALE_DAYS
                ),
                impact: format!("Potential revenue at risk: ${:.0}", at_risk),
                description: "Enterprise deals have the highest value but are moving slowly. \
                              Engage with decision-makers to accelerate closure."
                    .to_string(),
            });
        }

        if let Some(rep) = risk_scan::underperforming_reps(store).into_iter().next() {
            let name = rep.rep_name.unwrap_or(rep.rep_id);
            recs.push(Recommendation {
                priority: Priority::Medium,
                action: format!("Coach {} on win rate improvement", name),
                impact: format!("Current win rate: {:.1}%, Target: 25%", rep.win_rate),
                description: "Provide training on objection handling and closing techniques."
                    .to_string(),
            });
        }

        if let Some((segment, _)) = risk_scan::lowest_activity_segment(store) {
            recs.push(Recommendation {
                priority: Priority::Medium,
                action: format!("Increase activity for {} segment", segment),
                impact: "Expected 15-20% improvement in conversion rate".to_string(),
                description: "Accounts with higher engagement show better conversion rates. \
                              Schedule regular check-ins and demos."
                    .to_string(),
            });
        }

        if self
            .pipeline_coverage()
            .is_some_and(|ratio| ratio < PIPELINE_COVERAGE_MULTIPLE)
        {
            recs.push(Recommendation {
                priority: Priority::High,
                action: "Increase pipeline coverage - currently below 3x target".to_string(),
                impact: "Ensure target achievement for next quarter".to_string(),
                description: "Pipeline should be 3-4x of quarterly target for healthy conversion."
                    .to_string(),
            });
        }

        let negotiating = store.deals_in_stage(STAGE_NEGOTIATION).len();
        if negotiating > 0 {
            recs.push(Recommendation {
                priority: Priority::Medium,
                action: format!("Fast-track deals in {} stage", STAGE_NEGOTIATION),
                impact: format!("{} deals worth prioritizing", negotiating),
                description: "Deals in negotiation are close to closure. \
                              Provide additional resources or executive support."
                    .to_string(),
            });
        }

        debug!(recommendations = recs.len(), "recommendations computed");
        recs
    }

    fn revenue_trend(&self, months: usize) -> Vec<MonthlyRevenue> {
        trailing_months(self.clock.today(), months)
            .into_iter()
            .map(|month| MonthlyRevenue {
                revenue: self.store.month_revenue(&month),
                target: self.store.target_for_month(&month),
                month,
            })
            .collect()
    }

    fn health(&self) -> HealthReport {
        HealthReport {
            status: "ok",
            accounts: self.store.accounts().len(),
            reps: self.store.reps().len(),
            deals: self.store.deals().len(),
            activities: self.store.activities().len(),
            targets: self.store.targets().len(),
        }
    }
}

/// Arithmetic mean; 0 for an empty slice.
fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::clock::FixedClock;
    use crate::adapters::persistence::InMemoryStore;
    use crate::domain::{Account, Activity, Deal, RecordSet, Rep, Target};
    use chrono::{Days, NaiveDate};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 5, 15).unwrap()
    }

    fn days_ago(n: u64) -> NaiveDate {
        today().checked_sub_days(Days::new(n)).unwrap()
    }

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn service(records: RecordSet) -> AnalyticsService {
        AnalyticsService::new(
            Arc::new(InMemoryStore::new(records)),
            Arc::new(FixedClock::new(today())),
        )
    }

    fn enterprise_account() -> Account {
        Account {
            account_id: "A1".into(),
            name: "Globex".into(),
            industry: "Manufacturing".into(),
            segment: "Enterprise".into(),
        }
    }

    fn rep() -> Rep {
        Rep {
            rep_id: "R1".into(),
            name: "Dana".into(),
        }
    }

    fn open_deal(id: &str, amount: Option<f64>, created: NaiveDate) -> Deal {
        Deal {
            deal_id: id.into(),
            account_id: "A1".into(),
            rep_id: "R1".into(),
            stage: "Proposal".into(),
            amount,
            created_at: created,
            closed_at: None,
        }
    }

    fn won_deal(id: &str, amount: Option<f64>, created: &str, closed: &str) -> Deal {
        Deal {
            stage: "Closed Won".into(),
            closed_at: Some(date(closed)),
            ..open_deal(id, amount, date(created))
        }
    }

    fn target(month: &str, value: f64) -> Target {
        Target {
            month: month.into(),
            target: value,
        }
    }

    #[test]
    fn test_empty_store_reports() {
        let svc = service(RecordSet::default());

        let summary = svc.summary();
        assert_eq!(summary.current_quarter, 2);
        assert_eq!(summary.current_quarter_year, 2025);
        assert_eq!(summary.revenue, 0.0);
        assert_eq!(summary.target, 0.0);
        assert_eq!(summary.gap, 0.0);
        assert_eq!(summary.gap_percentage, 0.0);
        assert_eq!(summary.qoq_change_percentage, 0.0);

        let drivers = svc.revenue_drivers();
        assert_eq!(drivers.win_rate, 0.0);
        assert_eq!(drivers.average_deal_size, 0.0);

        assert!(svc.risk_factors().is_empty());
        assert!(svc.recommendations().is_empty());
    }

    #[test]
    fn test_summary_quarter_revenue_and_qoq() {
        let svc = service(RecordSet {
            deals: vec![
                won_deal("D1", Some(30_000.0), "2025-03-01", "2025-04-10"),
                won_deal("D2", Some(10_000.0), "2025-01-01", "2025-06-30"),
                // Unquoted won deal contributes nothing
                won_deal("D3", None, "2025-01-01", "2025-05-01"),
                // Created in quarter but closed the previous one
                won_deal("D4", Some(20_000.0), "2025-01-01", "2025-02-01"),
            ],
            targets: vec![
                target("2025-04", 20_000.0),
                target("2025-05", 20_000.0),
                target("2025-06", 40_000.0),
            ],
            ..Default::default()
        });

        let s = svc.summary();
        assert_eq!(s.revenue, 40_000.0);
        assert_eq!(s.target, 80_000.0);
        assert_eq!(s.gap, 40_000.0);
        assert_eq!(s.gap_percentage, 50.0);
        assert_eq!(s.qoq_change, 20_000.0);
        assert_eq!(s.qoq_change_percentage, 100.0);
    }

    #[test]
    fn test_gap_percentage_zero_without_target() {
        let svc = service(RecordSet {
            deals: vec![won_deal("D1", Some(5_000.0), "2025-04-01", "2025-04-20")],
            ..Default::default()
        });
        let s = svc.summary();
        assert_eq!(s.revenue, 5_000.0);
        assert_eq!(s.gap, -5_000.0);
        assert_eq!(s.gap_percentage, 0.0);
    }

    #[test]
    fn test_drivers() {
        let svc = service(RecordSet {
            deals: vec![
                won_deal("D1", Some(10_000.0), "2025-01-01", "2025-01-11"),
                won_deal("D2", Some(30_000.0), "2025-01-01", "2025-01-31"),
                // Won, unquoted: counts for win rate and cycle time, not deal size
                won_deal("D3", None, "2025-01-01", "2025-01-21"),
                // Closed the day it opened: excluded from cycle time
                won_deal("D4", Some(20_000.0), "2025-02-01", "2025-02-01"),
                open_deal("D5", Some(5_000.0), date("2025-04-01")),
                open_deal("D6", None, date("2025-04-01")),
                Deal {
                    stage: "Closed Lost".into(),
                    ..open_deal("D7", Some(99_000.0), date("2025-01-01"))
                },
                open_deal("D8", Some(2_500.0), date("2025-04-01")),
            ],
            ..Default::default()
        });

        let d = svc.revenue_drivers();
        assert_eq!(d.pipeline_size, 7_500.0);
        assert_eq!(d.win_rate, 50.0);
        assert_eq!(d.average_deal_size, 20_000.0);
        assert_eq!(d.sales_cycle_time, 20.0);
    }

    #[test]
    fn test_stale_enterprise_scenario() {
        let current_month = today().format("%Y-%m").to_string();
        let svc = service(RecordSet {
            accounts: vec![enterprise_account()],
            reps: vec![rep()],
            deals: vec![open_deal("D1", Some(50_000.0), days_ago(90))],
            targets: vec![target(&current_month, 10_000.0)],
            ..Default::default()
        });

        let risks = svc.risk_factors();
        let stale = risks
            .iter()
            .find_map(|r| match &r.kind {
                RiskKind::StaleDeals(data) => Some(data),
                _ => None,
            })
            .expect("stale_deals risk");
        assert_eq!(stale.count, 1);
        assert_eq!(stale.deals[0].age_days, 90);
        assert_eq!(stale.deals[0].account_name.as_deref(), Some("Globex"));
        assert_eq!(stale.deals[0].rep_name.as_deref(), Some("Dana"));
        assert_eq!(stale.deals[0].segment.as_deref(), Some("Enterprise"));
        assert_eq!(stale.deals[0].amount, Some(50_000.0));

        let recs = svc.recommendations();
        let focus = recs
            .iter()
            .find(|r| r.action == "Focus on Enterprise deals older than 30 days")
            .expect("enterprise recommendation");
        assert!(focus.impact.contains("$50000"));
        assert_eq!(focus.priority, Priority::High);
    }

    #[test]
    fn test_stale_list_truncated_to_five() {
        let deals = (0..7)
            .map(|i| open_deal(&format!("D{i}"), None, days_ago(100)))
            .collect();
        let svc = service(RecordSet {
            deals,
            ..Default::default()
        });
        let risks = svc.risk_factors();
        match &risks[0].kind {
            RiskKind::StaleDeals(data) => {
                assert_eq!(data.count, 7);
                assert_eq!(data.deals.len(), RISK_SAMPLE_LIMIT);
                assert_eq!(data.deals[0].deal_id, "D0");
            }
            other => panic!("expected stale deals first, got {other:?}"),
        }
        assert_eq!(risks[0].description, "Found 7 deals older than 60 days without recent activity");
    }

    #[test]
    fn test_underperforming_rep_scenario() {
        let mut deals = vec![won_deal("D0", Some(1_000.0), "2025-01-01", "2025-02-01")];
        for i in 1..10 {
            let mut d = open_deal(&format!("D{i}"), Some(1_000.0), date("2025-05-01"));
            if i % 2 == 0 {
                d.stage = "Closed Lost".into();
            }
            deals.push(d);
        }
        let svc = service(RecordSet {
            accounts: vec![enterprise_account()],
            reps: vec![rep()],
            deals,
            activities: (0..40)
                .map(|i| Activity {
                    activity_id: format!("X{i}"),
                    deal_id: format!("D{}", i % 10),
                    activity_type: "call".into(),
                    timestamp: "2025-05-02T10:00:00Z".into(),
                })
                .collect(),
            ..Default::default()
        });

        let risks = svc.risk_factors();
        assert_eq!(risks.len(), 1);
        assert_eq!(risks[0].type_name(), "underperforming_reps");
        assert_eq!(risks[0].severity, Severity::Medium);
        match &risks[0].kind {
            RiskKind::UnderperformingReps(data) => {
                assert_eq!(data.count, 1);
                let r = &data.reps[0];
                assert_eq!(r.total_deals, 10);
                assert_eq!(r.won_deals, 1);
                assert_eq!(r.win_rate, 10.0);
                assert!(r.total_deals >= 5 && (r.won_deals as f64 / r.total_deals as f64) < 0.20);
            }
            other => panic!("unexpected risk {other:?}"),
        }

        let recs = svc.recommendations();
        let coach = recs
            .iter()
            .find(|r| r.action.starts_with("Coach"))
            .expect("coach recommendation");
        assert_eq!(coach.action, "Coach Dana on win rate improvement");
        assert_eq!(coach.impact, "Current win rate: 10.0%, Target: 25%");
    }

    #[test]
    fn test_recommendation_order_is_fixed() {
        let mut negotiation = open_deal("D2", Some(1_000.0), days_ago(5));
        negotiation.stage = "Negotiation".into();
        let mut deals = vec![open_deal("D1", Some(50_000.0), days_ago(45)), negotiation];
        for i in 3..8 {
            let mut d = open_deal(&format!("D{i}"), None, days_ago(1));
            d.stage = "Closed Lost".into();
            deals.push(d);
        }
        let svc = service(RecordSet {
            accounts: vec![enterprise_account()],
            reps: vec![rep()],
            deals,
            // Next quarter is Q3 2025
            targets: vec![target("2025-07", 100_000.0)],
            ..Default::default()
        });

        let actions: Vec<String> = svc.recommendations().into_iter().map(|r| r.action).collect();
        assert_eq!(
            actions,
            vec![
                "Focus on Enterprise deals older than 30 days".to_string(),
                "Coach Dana on win rate improvement".to_string(),
                "Increase activity for Enterprise segment".to_string(),
                "Increase pipeline coverage - currently below 3x target".to_string(),
                "Fast-track deals in Negotiation stage".to_string(),
            ]
        );
    }

    #[test]
    fn test_pipeline_coverage_needs_next_quarter_target() {
        let svc = service(RecordSet {
            deals: vec![open_deal("D1", Some(10_000.0), days_ago(1))],
            ..Default::default()
        });
        assert_eq!(svc.pipeline_coverage(), None);
        assert!(
            !svc.recommendations()
                .iter()
                .any(|r| r.action.starts_with("Increase pipeline coverage"))
        );

        let covered = service(RecordSet {
            deals: vec![open_deal("D1", Some(30_000.0), days_ago(1))],
            targets: vec![target("2025-08", 10_000.0)],
            ..Default::default()
        });
        assert_eq!(covered.pipeline_coverage(), Some(3.0));
        assert!(
            !covered
                .recommendations()
                .iter()
                .any(|r| r.action.starts_with("Increase pipeline coverage"))
        );
    }

    #[test]
    fn test_revenue_trend() {
        let svc = service(RecordSet {
            deals: vec![
                won_deal("D1", Some(1_000.0), "2025-01-01", "2025-03-05"),
                won_deal("D2", Some(2_000.0), "2025-01-01", "2025-05-01"),
            ],
            targets: vec![target("2025-05", 4_000.0)],
            ..Default::default()
        });
        let trend = svc.revenue_trend(3);
        assert_eq!(trend.len(), 3);
        assert_eq!(trend[0].month, "2025-03");
        assert_eq!(trend[0].revenue, 1_000.0);
        assert_eq!(trend[1].revenue, 0.0);
        assert_eq!(trend[2].month, "2025-05");
        assert_eq!(trend[2].revenue, 2_000.0);
        assert_eq!(trend[2].target, 4_000.0);
    }

    #[test]
    fn test_health_counts() {
        let svc = service(RecordSet {
            accounts: vec![enterprise_account()],
            reps: vec![rep()],
            ..Default::default()
        });
        let h = svc.health();
        assert_eq!(h.status, "ok");
        assert_eq!(h.accounts, 1);
        assert_eq!(h.deals, 0);
    }
}
