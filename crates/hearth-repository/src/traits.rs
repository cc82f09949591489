//! Repository trait definitions.

use async_trait::async_trait;
use hearth_core::{AreaId, HearthResult, Page, PageRequest, UnitId};
use hearth_domain::{Area, Booking, DateRange, Unit, UnitDetail};
use std::collections::BTreeSet;

/// Row predicate for a unit listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UnitFilter {
    /// Restrict to one area.
    pub area_id: Option<AreaId>,
    /// Units that must not appear in the result.
    pub exclude: BTreeSet<UnitId>,
}

impl UnitFilter {
    /// Whether a unit passes the predicate.
    #[must_use]
    pub fn matches(&self, unit: &Unit) -> bool {
        self.area_id.map_or(true, |area| unit.area_id == area) && !self.exclude.contains(&unit.id)
    }
}

/// Result ordering for a unit listing.
///
/// Every ordering breaks ties on the unit id so page boundaries are stable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum UnitOrdering {
    /// `created_at DESC`
    #[default]
    CreatedDesc,
    /// `booking_count DESC`
    BookingCountDesc,
    /// `price ASC`
    PriceAsc,
    /// `price DESC`
    PriceDesc,
}

impl UnitOrdering {
    /// SQL `ORDER BY` body for this ordering over the `u` alias.
    #[must_use]
    pub const fn sql(&self) -> &'static str {
        match self {
            Self::CreatedDesc => "u.created_at DESC, u.id DESC",
            Self::BookingCountDesc => "u.booking_count DESC, u.id DESC",
            Self::PriceAsc => "u.price ASC, u.id ASC",
            Self::PriceDesc => "u.price DESC, u.id DESC",
        }
    }

    /// Compares two units under this ordering.
    #[must_use]
    pub fn compare(&self, a: &Unit, b: &Unit) -> std::cmp::Ordering {
        match self {
            Self::CreatedDesc => b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)),
            Self::BookingCountDesc => b.booking_count.cmp(&a.booking_count).then(b.id.cmp(&a.id)),
            Self::PriceAsc => a.price.cmp(&b.price).then(a.id.cmp(&b.id)),
            Self::PriceDesc => b.price.cmp(&a.price).then(b.id.cmp(&a.id)),
        }
    }
}

/// A fully planned listing query: predicate, ordering and page window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitQuery {
    pub filter: UnitFilter,
    pub ordering: UnitOrdering,
    pub page: PageRequest,
}

/// Unit repository trait.
#[async_trait]
pub trait UnitRepository: Send + Sync {
    /// Fetches one page of units matching the query together with the total
    /// match count. A page past the end yields no items and the real count.
    async fn find_by_filter(&self, query: &UnitQuery) -> HearthResult<Page<Unit>>;

    /// Finds a unit with its images and facilities.
    async fn find_detail(&self, id: UnitId) -> HearthResult<Option<UnitDetail>>;

    /// The `limit` most booked units.
    async fn find_most_booked(&self, limit: u32) -> HearthResult<Vec<Unit>>;
}

/// Booking repository trait.
#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Bookings that collide with `range` (see [`DateRange::overlaps`]).
    async fn find_overlapping(&self, range: &DateRange) -> HearthResult<Vec<Booking>>;
}

/// Area repository trait.
#[async_trait]
pub trait AreaRepository: Send + Sync {
    /// All areas ordered by id.
    async fn find_all(&self) -> HearthResult<Vec<Area>>;
}
