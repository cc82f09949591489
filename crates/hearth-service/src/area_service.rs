//! Area service trait definition.

use crate::dto::AreaInfo;
use async_trait::async_trait;
use hearth_core::HearthResult;

/// Area service trait.
#[async_trait]
pub trait AreaService: Send + Sync {
    /// Lists every area, ordered by id.
    async fn list_areas(&self) -> HearthResult<Vec<AreaInfo>>;
}
