//! Risk scans over the record store. Shared by risk factors and recommendations.
//!
//! Each scan is a linear pass; grouped results come out of ordered maps so they are sorted by id.

use crate::domain::entities::SEGMENT_ENTERPRISE;
use crate::domain::{AccountActivity, Deal, RepPerformance, StaleDeal};
use crate::ports::RecordStore;
use chrono::{Days, NaiveDate};
use std::collections::BTreeMap;

/// Open deals created more than this many days ago are stale.
pub const STALE_DEAL_DAYS: u64 = 60;
/// Age threshold for the Enterprise focus recommendation.
pub const ENTERPRISE_STALE_DAYS: u64 = 30;
/// Reps need at least this many deals before their win rate is judged.
pub const MIN_REP_DEALS: usize = 5;
/// Win rate (percent) below which a rep is underperforming.
pub const REP_WIN_RATE_FLOOR: f64 = 20.0;
/// Mean activities per open deal below which an account is low-activity.
pub const ACCOUNT_ACTIVITY_FLOOR: f64 = 2.0;
/// Mean activities per open deal below which a segment gets an activity push.
pub const SEGMENT_ACTIVITY_FLOOR: f64 = 3.0;

/// `today` minus `days`; saturates at the earliest representable date.
fn cutoff(today: NaiveDate, days: u64) -> NaiveDate {
    today.checked_sub_days(Days::new(days)).unwrap_or(NaiveDate::MIN)
}

fn created_before(deal: &Deal, cutoff: NaiveDate) -> bool {
    deal.created_at < cutoff
}

/// Open deals older than [`STALE_DEAL_DAYS`], in store order.
pub fn stale_deals(store: &dyn RecordStore, today: NaiveDate) -> Vec<StaleDeal> {
    let cutoff = cutoff(today, STALE_DEAL_DAYS);
    store
        .deals()
        .iter()
        .filter(|d| d.is_open() && created_before(d, cutoff))
        .map(|d| {
            let account = store.account(&d.account_id);
            StaleDeal {
                deal_id: d.deal_id.clone(),
                account_name: account.map(|a| a.name.clone()),
                rep_name: store.rep(&d.rep_id).map(|r| r.name.clone()),
                stage: d.stage.clone(),
                age_days: d.age_days(today),
                activity_count: store.activity_count(&d.deal_id),
                segment: account.map(|a| a.segment.clone()),
                amount: d.amount,
            }
        })
        .collect()
}

/// Reps with at least [`MIN_REP_DEALS`] deals and a win rate under [`REP_WIN_RATE_FLOOR`].
///
/// Grouped by the deal's rep id, so reps missing from the rep list still appear (unnamed).
pub fn underperforming_reps(store: &dyn RecordStore) -> Vec<RepPerformance> {
    let mut by_rep: BTreeMap<&str, (usize, usize)> = BTreeMap::new();
    for deal in store.deals() {
        let (total, won) = by_rep.entry(deal.rep_id.as_str()).or_insert((0, 0));
        *total += 1;
        if deal.is_closed_won() {
            *won += 1;
        }
    }

    by_rep
        .into_iter()
        .filter_map(|(rep_id, (total, won))| {
            let win_rate = percentage(won as f64, total as f64);
            if total >= MIN_REP_DEALS && win_rate < REP_WIN_RATE_FLOOR {
                Some(RepPerformance {
                    rep_id: rep_id.to_string(),
                    rep_name: store.rep(rep_id).map(|r| r.name.clone()),
                    win_rate,
                    total_deals: total,
                    won_deals: won,
                })
            } else {
                None
            }
        })
        .collect()
}

/// Accounts with open deals averaging fewer than [`ACCOUNT_ACTIVITY_FLOOR`] activities each.
pub fn low_activity_accounts(store: &dyn RecordStore) -> Vec<AccountActivity> {
    let mut by_account: BTreeMap<&str, (usize, usize)> = BTreeMap::new();
    for deal in store.deals().iter().filter(|d| d.is_open()) {
        let (deals, activities) = by_account.entry(deal.account_id.as_str()).or_insert((0, 0));
        *deals += 1;
        *activities += store.activity_count(&deal.deal_id);
    }

    by_account
        .into_iter()
        .filter_map(|(account_id, (open_deals, total_activities))| {
            let avg_activities = total_activities as f64 / open_deals as f64;
            if avg_activities >= ACCOUNT_ACTIVITY_FLOOR {
                return None;
            }
            let account = store.account(account_id);
            Some(AccountActivity {
                account_id: account_id.to_string(),
                account_name: account.map(|a| a.name.clone()),
                segment: account.map(|a| a.segment.clone()),
                industry: account.map(|a| a.industry.clone()),
                open_deals,
                total_activities,
                avg_activities,
            })
        })
        .collect()
}

/// Value of open Enterprise deals older than [`ENTERPRISE_STALE_DAYS`]. Unquoted deals add nothing.
pub fn stale_enterprise_value(store: &dyn RecordStore, today: NaiveDate) -> f64 {
    let cutoff = cutoff(today, ENTERPRISE_STALE_DAYS);
    store
        .deals()
        .iter()
        .filter(|d| d.is_open() && created_before(d, cutoff))
        .filter(|d| {
            store
                .account(&d.account_id)
                .is_some_and(|a| a.segment == SEGMENT_ENTERPRISE)
        })
        .filter_map(|d| d.amount)
        .sum()
}

/// Segment with the lowest mean activities per open deal, if that mean is under
/// [`SEGMENT_ACTIVITY_FLOOR`]. Deals whose account is unknown are skipped.
///
/// Ties go to the alphabetically first segment.
pub fn lowest_activity_segment(store: &dyn RecordStore) -> Option<(String, f64)> {
    let mut by_segment: BTreeMap<&str, (usize, usize)> = BTreeMap::new();
    for deal in store.deals().iter().filter(|d| d.is_open()) {
        if let Some(account) = store.account(&deal.account_id) {
            let (deals, activities) = by_segment.entry(account.segment.as_str()).or_insert((0, 0));
            *deals += 1;
            *activities += store.activity_count(&deal.deal_id);
        }
    }

    let mut lowest: Option<(&str, f64)> = None;
    for (segment, (deals, activities)) in by_segment {
        let avg = activities as f64 / deals as f64;
        if lowest.is_none_or(|(_, best)| avg < best) {
            lowest = Some((segment, avg));
        }
    }

    lowest
        .filter(|(_, avg)| *avg < SEGMENT_ACTIVITY_FLOOR)
        .map(|(segment, avg)| (segment.to_string(), avg))
}

/// `part / whole * 100`, or 0 when `whole` is not positive.
pub fn percentage(part: f64, whole: f64) -> f64 {
    if whole > 0.0 { part / whole * 100.0 } else { 0.0 }
}
