//! Stay date range value object.

use chrono::NaiveDate;
use hearth_core::{HearthError, HearthResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A requested stay, either bound of which may be open.
///
/// When both bounds are present `start` strictly precedes `end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct DateRange {
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
}

impl DateRange {
    /// Creates a date range, rejecting `start >= end`.
    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> HearthResult<Self> {
        if let (Some(s), Some(e)) = (start, end) {
            if s >= e {
                return Err(HearthError::validation(format!(
                    "start date {} must be before end date {}",
                    s, e
                )));
            }
        }
        Ok(Self { start, end })
    }

    /// A range with neither bound.
    #[must_use]
    pub const fn unbounded() -> Self {
        Self {
            start: None,
            end: None,
        }
    }

    #[must_use]
    pub const fn start(&self) -> Option<NaiveDate> {
        self.start
    }

    #[must_use]
    pub const fn end(&self) -> Option<NaiveDate> {
        self.end
    }

    /// True when neither bound is set; such a range excludes nothing.
    #[must_use]
    pub const fn is_unbounded(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    /// Whether a stay from `begin` to `end` (inclusive) collides with this range.
    ///
    /// Touching a boundary date counts as a collision. An open bound never
    /// restricts, so an unbounded range collides with nothing.
    #[must_use]
    pub fn overlaps(&self, begin: NaiveDate, end: NaiveDate) -> bool {
        match (self.start, self.end) {
            (Some(s), Some(e)) => begin <= e && end >= s,
            (Some(s), None) => end >= s,
            (None, Some(e)) => begin <= e,
            (None, None) => false,
        }
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bound = |d: Option<NaiveDate>| d.map_or_else(|| "..".to_string(), |d| d.to_string());
        write!(f, "[{}, {}]", bound(self.start), bound(self.end))
    }
}
