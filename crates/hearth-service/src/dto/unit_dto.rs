//! Unit-related DTOs.

use hearth_core::{AreaId, UnitId};
use serde::{Deserialize, Serialize};

/// What a listing shows for one unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitSummary {
    pub unit_id: UnitId,
    pub title: String,
    /// Nightly price in cents.
    pub price: i64,
    pub area_name: String,
    /// Absolute cover image URL, empty when the unit has none.
    pub image_url: String,
    pub room_count: u32,
    pub booking_count: u32,
    pub address: String,
    /// Creation day, `YYYY-MM-DD`.
    pub created_at: String,
}

/// Full view of one unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitDetailResponse {
    pub unit_id: UnitId,
    pub owner_id: i64,
    pub area_id: AreaId,
    pub area_name: String,
    pub title: String,
    pub price: i64,
    pub address: String,
    pub room_count: u32,
    pub acreage: u32,
    pub layout: String,
    pub capacity: u32,
    pub beds: String,
    pub deposit: i64,
    pub min_days: u32,
    pub max_days: u32,
    pub booking_count: u32,
    /// Absolute image URLs in upload order.
    pub image_urls: Vec<String>,
    pub facility_ids: Vec<i64>,
    pub created_at: String,
}
