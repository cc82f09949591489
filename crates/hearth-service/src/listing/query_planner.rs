//! Search request to repository query translation.

use super::ConflictSet;
use crate::dto::SearchRequest;
use hearth_core::PageRequest;
use hearth_domain::SortKey;
use hearth_repository::{UnitFilter, UnitOrdering, UnitQuery};

/// Builds repository queries with a fixed page capacity.
#[derive(Debug, Clone, Copy)]
pub struct QueryPlanner {
    page_capacity: u32,
}

impl QueryPlanner {
    #[must_use]
    pub const fn new(page_capacity: u32) -> Self {
        Self { page_capacity }
    }

    #[must_use]
    pub fn plan(&self, request: &SearchRequest, conflicts: ConflictSet) -> UnitQuery {
        UnitQuery {
            filter: UnitFilter {
                area_id: request.area_id,
                exclude: conflicts,
            },
            ordering: ordering_for(request.sort_key),
            page: PageRequest::fixed(request.page, self.page_capacity),
        }
    }
}

/// Repository ordering for a sort key.
#[must_use]
pub const fn ordering_for(sort_key: SortKey) -> UnitOrdering {
    match sort_key {
        SortKey::Newest => UnitOrdering::CreatedDesc,
        SortKey::BookingCount => UnitOrdering::BookingCountDesc,
        SortKey::PriceAsc => UnitOrdering::PriceAsc,
        SortKey::PriceDesc => UnitOrdering::PriceDesc,
    }
}
