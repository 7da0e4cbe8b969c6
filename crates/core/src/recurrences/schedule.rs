//! Pure calendar math for recurrence schedules. No I/O.
//!
//! Month and year advancement clamp to the last day of the target month
//! (chrono's `checked_add_months` semantics). Occurrences are always
//! computed from the schedule's *anchor* date — occurrence `k` is
//! `anchor + k units` — so a day-31 anchor clamps independently per month
//! (Jan 31, Feb 29, Mar 31, ...) instead of drifting down to the 28th
//! after the first short month.

use chrono::{Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::{errors::ValidationError, Error, Result};

/// How often a recurrence fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Frequency {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl Frequency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Frequency::Daily => "DAILY",
            Frequency::Weekly => "WEEKLY",
            Frequency::Monthly => "MONTHLY",
            Frequency::Yearly => "YEARLY",
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Frequency {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "DAILY" => Ok(Frequency::Daily),
            "WEEKLY" => Ok(Frequency::Weekly),
            "MONTHLY" => Ok(Frequency::Monthly),
            "YEARLY" => Ok(Frequency::Yearly),
            other => Err(Error::Validation(ValidationError::InvalidInput(format!(
                "Unknown frequency: {}",
                other
            )))),
        }
    }
}

/// The date exactly one unit after `from`.
///
/// Deterministic: identical inputs always produce identical outputs.
/// Returns `None` only on calendar overflow (far beyond any real ledger).
pub fn next_occurrence(frequency: Frequency, from: NaiveDate) -> Option<NaiveDate> {
    occurrence_at(frequency, from, 1)
}

/// The `index`-th occurrence of a schedule anchored at `anchor`
/// (occurrence 0 is the anchor itself).
pub fn occurrence_at(frequency: Frequency, anchor: NaiveDate, index: u32) -> Option<NaiveDate> {
    match frequency {
        Frequency::Daily => anchor.checked_add_days(Days::new(u64::from(index))),
        Frequency::Weekly => anchor.checked_add_days(Days::new(7 * u64::from(index))),
        Frequency::Monthly => anchor.checked_add_months(Months::new(index)),
        Frequency::Yearly => index
            .checked_mul(12)
            .and_then(|months| anchor.checked_add_months(Months::new(months))),
    }
}

/// Lazy, finite, restartable sequence of occurrence dates.
///
/// Yields `anchor + k units` for k = 0, 1, 2, ... while the date stays
/// within `horizon_end` and `until` (the schedule's own end date, when
/// set). Re-invoking with a larger horizon yields a superset; this is a
/// deterministic function of its inputs, not a stateful generator.
#[derive(Debug, Clone)]
pub struct Occurrences {
    frequency: Frequency,
    anchor: NaiveDate,
    until: Option<NaiveDate>,
    horizon_end: NaiveDate,
    index: u32,
}

impl Iterator for Occurrences {
    type Item = NaiveDate;

    fn next(&mut self) -> Option<NaiveDate> {
        let date = occurrence_at(self.frequency, self.anchor, self.index)?;
        if date > self.horizon_end {
            return None;
        }
        if let Some(until) = self.until {
            if date > until {
                return None;
            }
        }
        self.index += 1;
        Some(date)
    }
}

/// All occurrences of a schedule up to `horizon_end` (inclusive),
/// starting at the anchor.
pub fn occurrences(
    frequency: Frequency,
    start_date: NaiveDate,
    end_date: Option<NaiveDate>,
    horizon_end: NaiveDate,
) -> Occurrences {
    Occurrences {
        frequency,
        anchor: start_date,
        until: end_date,
        horizon_end,
        index: 0,
    }
}

/// Occurrences on or after `today`, reached by advancing from the anchor
/// rather than by jumping.
pub fn upcoming_occurrences(
    frequency: Frequency,
    start_date: NaiveDate,
    end_date: Option<NaiveDate>,
    today: NaiveDate,
    horizon_end: NaiveDate,
) -> impl Iterator<Item = NaiveDate> {
    occurrences(frequency, start_date, end_date, horizon_end).filter(move |date| *date >= today)
}
