//! Area DTOs.

use hearth_core::AreaId;
use hearth_domain::Area;
use serde::{Deserialize, Serialize};

/// One entry of the area list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AreaInfo {
    pub area_id: AreaId,
    pub name: String,
}

impl From<Area> for AreaInfo {
    fn from(area: Area) -> Self {
        Self {
            area_id: area.id,
            name: area.name,
        }
    }
}
