//! Calendar quarters and `YYYY-MM` month keys.

use chrono::{Datelike, Months, NaiveDate};
use serde::Serialize;

/// Calendar quarter `quarter` (1..=4) of `year`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Quarter {
    pub quarter: u32,
    pub year: i32,
}

impl Quarter {
    pub fn new(quarter: u32, year: i32) -> Self {
        Self { quarter, year }
    }

    /// Quarter containing `date`.
    pub fn containing(date: NaiveDate) -> Self {
        Self {
            quarter: (date.month() - 1) / 3 + 1,
            year: date.year(),
        }
    }

    /// Q1's predecessor is Q4 of the prior year.
    pub fn previous(self) -> Self {
        if self.quarter <= 1 {
            Self::new(4, self.year - 1)
        } else {
            Self::new(self.quarter - 1, self.year)
        }
    }

    /// Q4's successor is Q1 of the next year.
    pub fn next(self) -> Self {
        if self.quarter >= 4 {
            Self::new(1, self.year + 1)
        } else {
            Self::new(self.quarter + 1, self.year)
        }
    }

    pub fn months(self) -> Vec<String> {
        quarter_months(self.quarter, self.year)
    }
}

/// The three `YYYY-MM` keys of quarter `quarter` in `year`, starting at month `(quarter-1)*3+1`.
pub fn quarter_months(quarter: u32, year: i32) -> Vec<String> {
    let start = (quarter.saturating_sub(1)) * 3 + 1;
    (start..start + 3).map(|m| format!("{:04}-{:02}", year, m)).collect()
}

pub fn month_key(date: NaiveDate) -> String {
    date.format("%Y-%m").to_string()
}

/// The `count` month keys ending with the month of `today`, oldest first.
pub fn trailing_months(today: NaiveDate, count: usize) -> Vec<String> {
    let first_of_month = today.with_day(1).unwrap_or(today);
    (0..count)
        .rev()
        .filter_map(|back| first_of_month.checked_sub_months(Months::new(back as u32)))
        .map(month_key)
        .collect()
}
