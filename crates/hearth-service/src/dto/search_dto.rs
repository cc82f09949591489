//! Listing search DTOs.

use super::UnitSummary;
use chrono::NaiveDate;
use hearth_core::rules::{self, DATE_FORMAT};
use hearth_core::{AreaId, HearthError, HearthResult, ValidateExt};
use hearth_domain::{DateRange, SortKey};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// A listing search exactly as the caller sent it.
///
/// Empty strings stand for "not given". Use [`SearchQuery::parse`] to turn it
/// into a validated [`SearchRequest`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct SearchQuery {
    /// Area id.
    #[validate(custom(function = "rules::optional_identifier"))]
    pub aid: String,

    /// Start date, `YYYY-MM-DD`.
    #[validate(custom(function = "rules::iso_date"))]
    pub sd: String,

    /// End date, `YYYY-MM-DD`.
    #[validate(custom(function = "rules::iso_date"))]
    pub ed: String,

    /// Sort key: `new`, `booking`, `price-inc` or `price-des`. Anything else
    /// sorts newest first.
    pub sk: String,

    /// 1-indexed page number.
    #[validate(custom(function = "rules::positive_integer"))]
    pub p: String,
}

impl Default for SearchQuery {
    fn default() -> Self {
        Self {
            aid: String::new(),
            sd: String::new(),
            ed: String::new(),
            sk: SortKey::Newest.as_str().to_string(),
            p: "1".to_string(),
        }
    }
}

impl SearchQuery {
    /// Validates and parses the raw strings.
    ///
    /// Fails with [`HearthError::Validation`] on a malformed field or when
    /// the start date does not strictly precede the end date.
    pub fn parse(self) -> HearthResult<SearchRequest> {
        self.validate_request()?;

        let page = self
            .p
            .trim()
            .parse::<u32>()
            .map_err(|_| HearthError::validation(format!("p: page {} is out of range", self.p)))?;

        let area_id = if self.aid.is_empty() {
            None
        } else {
            Some(
                self.aid
                    .parse::<AreaId>()
                    .map_err(|e| HearthError::validation(format!("aid: {}", e)))?,
            )
        };

        let date_range = DateRange::new(parse_date("sd", &self.sd)?, parse_date("ed", &self.ed)?)?;
        let sort_key = SortKey::parse_lenient(&self.sk);

        Ok(SearchRequest {
            area_id,
            date_range,
            sort_key,
            page,
            raw: RawFilter {
                area_id: self.aid,
                start_date: self.sd,
                end_date: self.ed,
                sort_key: self.sk,
            },
        })
    }
}

fn parse_date(field: &str, raw: &str) -> HearthResult<Option<NaiveDate>> {
    if raw.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(raw, DATE_FORMAT)
        .map(Some)
        .map_err(|e| HearthError::validation(format!("{}: {}", field, e)))
}

/// The filter inputs of a search as received, used to address the cache.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RawFilter {
    pub area_id: String,
    pub start_date: String,
    pub end_date: String,
    pub sort_key: String,
}

/// A validated listing search.
///
/// Only [`SearchQuery::parse`] builds one, so `date_range` is always ordered
/// and `page` is at least 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub area_id: Option<AreaId>,
    pub date_range: DateRange,
    pub sort_key: SortKey,
    pub page: u32,
    raw: RawFilter,
}

impl SearchRequest {
    /// The raw filter strings this request was parsed from.
    #[must_use]
    pub fn raw(&self) -> &RawFilter {
        &self.raw
    }
}

/// One page of listing results. This is also the cached payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    pub items: Vec<UnitSummary>,
    pub total_pages: u64,
}
