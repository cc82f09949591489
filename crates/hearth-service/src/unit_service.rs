//! Unit service trait definition.

use crate::dto::{UnitDetailResponse, UnitSummary};
use async_trait::async_trait;
use hearth_core::{HearthResult, UnitId};

/// Unit service trait.
#[async_trait]
pub trait UnitService: Send + Sync {
    /// Gets the detail view of a unit.
    async fn get_unit_detail(&self, id: UnitId) -> HearthResult<UnitDetailResponse>;

    /// The most booked units, for the home page.
    async fn featured_units(&self) -> HearthResult<Vec<UnitSummary>>;

    /// Drops everything cached about a unit, listings included.
    /// Returns the number of keys removed.
    async fn invalidate_unit(&self, id: UnitId) -> u64;
}
