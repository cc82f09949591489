//! Units made unavailable by existing bookings.

use hearth_core::{HearthResult, UnitId};
use hearth_domain::DateRange;
use hearth_repository::BookingRepository;
use hearth_resilience::TimeoutPolicy;
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::debug;

/// Units to exclude from one search. Lives only for the duration of that search.
pub type ConflictSet = BTreeSet<UnitId>;

/// Finds the units whose bookings collide with a requested stay.
#[derive(Clone)]
pub struct ConflictResolver {
    bookings: Arc<dyn BookingRepository>,
    timeouts: TimeoutPolicy,
}

impl ConflictResolver {
    #[must_use]
    pub fn new(bookings: Arc<dyn BookingRepository>, timeouts: TimeoutPolicy) -> Self {
        Self { bookings, timeouts }
    }

    /// Units with at least one booking overlapping `range`.
    ///
    /// An unbounded range excludes nothing and does not touch the repository.
    /// Repository failures are returned, never read as "no conflicts".
    pub async fn find_conflicting(&self, range: &DateRange) -> HearthResult<ConflictSet> {
        if range.is_unbounded() {
            return Ok(ConflictSet::new());
        }

        let bookings = self
            .timeouts
            .repository("bookings.find_overlapping", self.bookings.find_overlapping(range))
            .await?;

        let conflicts: ConflictSet = bookings.into_iter().map(|booking| booking.unit_id).collect();
        debug!(range = %range, conflicts = conflicts.len(), "Resolved booking conflicts");
        Ok(conflicts)
    }
}
