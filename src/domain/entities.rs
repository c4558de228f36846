//! Domain entities. Pure data structures for the CRM snapshot.
//!
//! No file or HTTP types here; adapters map their formats into these.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

/// Terminal stage: deal closed and booked.
pub const STAGE_CLOSED_WON: &str = "Closed Won";
/// Terminal stage: deal closed and lost.
pub const STAGE_CLOSED_LOST: &str = "Closed Lost";
/// Late open stage targeted by the fast-track recommendation.
pub const STAGE_NEGOTIATION: &str = "Negotiation";
/// Segment targeted by the stale-enterprise recommendation.
pub const SEGMENT_ENTERPRISE: &str = "Enterprise";

/// A customer account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub account_id: String,
    pub name: String,
    pub industry: String,
    pub segment: String,
}

/// A sales representative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rep {
    pub rep_id: String,
    pub name: String,
}

/// A sales opportunity owned by one rep against one account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deal {
    pub deal_id: String,
    pub account_id: String,
    pub rep_id: String,
    /// Free text; `Closed Won` / `Closed Lost` are terminal, everything else is open.
    pub stage: String,
    /// Absent until the deal is quoted. Never treated as zero.
    #[serde(default)]
    pub amount: Option<f64>,
    pub created_at: NaiveDate,
    #[serde(default, deserialize_with = "optional_date")]
    pub closed_at: Option<NaiveDate>,
}

impl Deal {
    pub fn is_closed_won(&self) -> bool {
        self.stage == STAGE_CLOSED_WON
    }

    pub fn is_closed_lost(&self) -> bool {
        self.stage == STAGE_CLOSED_LOST
    }

    /// Open = not in either terminal stage.
    pub fn is_open(&self) -> bool {
        !self.is_closed_won() && !self.is_closed_lost()
    }

    /// Whole days from creation to close date, or to `today` when no close date is set.
    /// Negative when the data puts the end before the start.
    pub fn age_days(&self, today: NaiveDate) -> i64 {
        let end = self.closed_at.unwrap_or(today);
        (end - self.created_at).num_days()
    }
}

/// An interaction event on a deal. Only the count per deal is used.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    pub activity_id: String,
    pub deal_id: String,
    #[serde(rename = "type")]
    pub activity_type: String,
    pub timestamp: String,
}

/// Revenue target for one calendar month (`YYYY-MM`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Target {
    pub month: String,
    pub target: f64,
}

/// The full immutable snapshot loaded at startup.
#[derive(Debug, Clone, Default)]
pub struct RecordSet {
    pub accounts: Vec<Account>,
    pub reps: Vec<Rep>,
    pub deals: Vec<Deal>,
    pub activities: Vec<Activity>,
    pub targets: Vec<Target>,
}

/// `null`, a missing field and `""` all mean "not closed".
fn optional_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}
