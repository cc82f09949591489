//! Rentable unit entity.

use chrono::{DateTime, Utc};
use hearth_core::{AreaId, UnitId};
use serde::{Deserialize, Serialize};

/// A rentable unit as stored by the repository.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Unit {
    /// Unique identifier for the unit.
    pub id: UnitId,

    /// Owning user (opaque to this crate).
    pub owner_id: i64,

    /// Area the unit belongs to.
    pub area_id: AreaId,

    /// Area display name, joined from the areas table.
    pub area_name: Option<String>,

    /// Listing title.
    pub title: String,

    /// Nightly price in cents.
    pub price: i64,

    /// Street address.
    pub address: String,

    /// Number of rooms.
    pub room_count: u32,

    /// Floor area in square meters.
    pub acreage: u32,

    /// Layout description, e.g. "two bedrooms one living room".
    pub layout: String,

    /// Number of guests the unit sleeps.
    pub capacity: u32,

    /// Bed configuration.
    pub beds: String,

    /// Deposit in cents.
    pub deposit: i64,

    /// Minimum stay in nights.
    pub min_days: u32,

    /// Maximum stay in nights; 0 means unlimited.
    pub max_days: u32,

    /// Completed bookings, used for popularity ordering.
    pub booking_count: u32,

    /// Relative key of the cover image.
    pub index_image_url: Option<String>,

    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// A unit together with the data only its detail view needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitDetail {
    pub unit: Unit,
    /// Relative keys of every image, in upload order.
    pub image_urls: Vec<String>,
    /// Facility identifiers attached to the unit.
    pub facility_ids: Vec<i64>,
}
