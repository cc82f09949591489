//! Unit records to caller-facing representations.

use crate::dto::{SearchResult, UnitDetailResponse, UnitSummary};
use hearth_core::{HearthError, HearthResult, Page};
use hearth_domain::{Unit, UnitDetail};

/// Day format used for `created_at` in summaries.
const CREATED_FORMAT: &str = "%Y-%m-%d";

/// Pure transformation from units to summaries. No I/O.
#[derive(Debug, Clone)]
pub struct ResultAssembler {
    image_url_prefix: String,
}

impl ResultAssembler {
    /// Creates an assembler that prefixes stored image keys with `image_url_prefix`.
    #[must_use]
    pub fn new(image_url_prefix: impl Into<String>) -> Self {
        Self {
            image_url_prefix: image_url_prefix.into(),
        }
    }

    /// Summarises units, keeping their order.
    pub fn summarize(&self, units: Vec<Unit>) -> HearthResult<Vec<UnitSummary>> {
        units.into_iter().map(|unit| self.summary(unit)).collect()
    }

    /// Builds the result for one repository page.
    pub fn page(&self, page: Page<Unit>) -> HearthResult<SearchResult> {
        let total_pages = page.total_pages();
        Ok(SearchResult {
            items: self.summarize(page.content)?,
            total_pages,
        })
    }

    /// Summarises a single unit.
    ///
    /// Fails with [`HearthError::MalformedRecord`] if the unit has no area name.
    pub fn summary(&self, unit: Unit) -> HearthResult<UnitSummary> {
        let area_name = required_area_name(&unit)?;
        Ok(UnitSummary {
            unit_id: unit.id,
            image_url: self.image_url(unit.index_image_url.as_deref()),
            title: unit.title,
            price: unit.price,
            area_name,
            room_count: unit.room_count,
            booking_count: unit.booking_count,
            address: unit.address,
            created_at: unit.created_at.format(CREATED_FORMAT).to_string(),
        })
    }

    /// Builds the detail view of a unit.
    pub fn detail(&self, detail: UnitDetail) -> HearthResult<UnitDetailResponse> {
        let UnitDetail {
            unit,
            image_urls,
            facility_ids,
        } = detail;
        let area_name = required_area_name(&unit)?;

        Ok(UnitDetailResponse {
            unit_id: unit.id,
            owner_id: unit.owner_id,
            area_id: unit.area_id,
            area_name,
            title: unit.title,
            price: unit.price,
            address: unit.address,
            room_count: unit.room_count,
            acreage: unit.acreage,
            layout: unit.layout,
            capacity: unit.capacity,
            beds: unit.beds,
            deposit: unit.deposit,
            min_days: unit.min_days,
            max_days: unit.max_days,
            booking_count: unit.booking_count,
            image_urls: image_urls
                .iter()
                .map(|key| self.image_url(Some(key.as_str())))
                .collect(),
            facility_ids,
            created_at: unit.created_at.format(CREATED_FORMAT).to_string(),
        })
    }

    fn image_url(&self, key: Option<&str>) -> String {
        match key {
            Some(key) if !key.is_empty() => format!("{}{}", self.image_url_prefix, key),
            _ => String::new(),
        }
    }
}

fn required_area_name(unit: &Unit) -> HearthResult<String> {
    unit.area_name.clone().ok_or_else(|| {
        HearthError::MalformedRecord(format!("unit {} has no area name", unit.id))
    })
}
