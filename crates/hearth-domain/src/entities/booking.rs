//! Booking entity.

use crate::DateRange;
use chrono::NaiveDate;
use hearth_core::{BookingId, UnitId};
use serde::{Deserialize, Serialize};

/// An existing reservation of a unit. Read-only on the listing path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Booking {
    pub id: BookingId,
    pub unit_id: UnitId,
    /// First night of the stay.
    pub begin_date: NaiveDate,
    /// Last day of the stay.
    pub end_date: NaiveDate,
}

impl Booking {
    /// Whether this booking makes its unit unavailable for `range`.
    #[must_use]
    pub fn conflicts_with(&self, range: &DateRange) -> bool {
        range.overlaps(self.begin_date, self.end_date)
    }
}
