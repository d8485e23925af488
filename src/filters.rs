//! Time-column filtering for the table view.
//!
//! A row matches when its local calendar date equals the filter's date.
//! Time of day is ignored.

use chrono::NaiveDate;

use crate::models::{Earthquake, parse_local_time};

/// Parsed free-text filter on the time column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayFilter {
    /// Match rows on this calendar day
    Day(NaiveDate),
    /// Filter text is not a date; nothing matches
    Invalid,
}

impl DayFilter {
    /// Parse filter text. Blank input means no filter.
    #[must_use]
    pub fn from_input(input: &str) -> Option<Self> {
        let input = input.trim();
        if input.is_empty() {
            return None;
        }

        Some(
            parse_local_time(input)
                .map_or(Self::Invalid, |t| Self::Day(t.date_naive())),
        )
    }

    /// Check if a record falls on the filter's day.
    #[must_use]
    pub fn matches(&self, quake: &Earthquake) -> bool {
        match self {
            Self::Invalid => false,
            Self::Day(day) => quake
                .local_time()
                .is_some_and(|t| t.date_naive() == *day),
        }
    }
}

impl std::str::FromStr for DayFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match Self::from_input(s) {
            Some(Self::Day(day)) => Ok(Self::Day(day)),
            Some(Self::Invalid) => Err(format!("not a date: {s} (expected YYYY-MM-DD)")),
            None => Err("date filter is empty".to_string()),
        }
    }
}
