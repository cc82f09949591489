//! Area entity.

use hearth_core::AreaId;
use serde::{Deserialize, Serialize};

/// A city district units are grouped under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Area {
    pub id: AreaId,
    pub name: String,
}
