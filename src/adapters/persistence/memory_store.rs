//! Implements RecordStore over an in-memory RecordSet.
//!
//! Built once from the loaded snapshot; id lookups and per-deal activity counts are indexed.

use crate::domain::{Account, Activity, Deal, RecordSet, Rep, Target};
use crate::ports::RecordStore;
use std::collections::HashMap;

/// Immutable snapshot with id indices. Safe to share across request handlers.
pub struct InMemoryStore {
    records: RecordSet,
    account_idx: HashMap<String, usize>,
    rep_idx: HashMap<String, usize>,
    activity_counts: HashMap<String, usize>,
    targets_by_month: HashMap<String, f64>,
}

impl InMemoryStore {
    pub fn new(records: RecordSet) -> Self {
        // First occurrence wins on duplicate ids, matching a linear scan.
        let mut account_idx = HashMap::with_capacity(records.accounts.len());
        for (i, a) in records.accounts.iter().enumerate() {
            account_idx.entry(a.account_id.clone()).or_insert(i);
        }
        let mut rep_idx = HashMap::with_capacity(records.reps.len());
        for (i, r) in records.reps.iter().enumerate() {
            rep_idx.entry(r.rep_id.clone()).or_insert(i);
        }
        let mut activity_counts: HashMap<String, usize> = HashMap::new();
        for a in &records.activities {
            *activity_counts.entry(a.deal_id.clone()).or_insert(0) += 1;
        }
        let mut targets_by_month = HashMap::with_capacity(records.targets.len());
        for t in &records.targets {
            targets_by_month.entry(t.month.clone()).or_insert(t.target);
        }

        Self {
            records,
            account_idx,
            rep_idx,
            activity_counts,
            targets_by_month,
        }
    }
}

impl RecordStore for InMemoryStore {
    fn accounts(&self) -> &[Account] {
        &self.records.accounts
    }

    fn reps(&self) -> &[Rep] {
        &self.records.reps
    }

    fn deals(&self) -> &[Deal] {
        &self.records.deals
    }

    fn activities(&self) -> &[Activity] {
        &self.records.activities
    }

    fn targets(&self) -> &[Target] {
        &self.records.targets
    }

    fn account(&self, account_id: &str) -> Option<&Account> {
        self.account_idx
            .get(account_id)
            .map(|&i| &self.records.accounts[i])
    }

    fn rep(&self, rep_id: &str) -> Option<&Rep> {
        self.rep_idx.get(rep_id).map(|&i| &self.records.reps[i])
    }

    fn activity_count(&self, deal_id: &str) -> usize {
        self.activity_counts.get(deal_id).copied().unwrap_or(0)
    }

    fn target_for_month(&self, month: &str) -> f64 {
        self.targets_by_month.get(month).copied().unwrap_or(0.0)
    }
}
