//! MySQL area repository implementation.

use crate::{AreaRepository, DatabasePool};
use async_trait::async_trait;
use hearth_core::{AreaId, HearthResult};
use hearth_domain::Area;
use sqlx::FromRow;
use std::sync::Arc;

/// MySQL area repository implementation.
#[derive(Clone)]
pub struct MySqlAreaRepository {
    pool: Arc<DatabasePool>,
}

impl MySqlAreaRepository {
    /// Creates a new MySQL area repository.
    #[must_use]
    pub fn new(pool: Arc<DatabasePool>) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct AreaRow {
    id: i64,
    name: String,
}

#[async_trait]
impl AreaRepository for MySqlAreaRepository {
    async fn find_all(&self) -> HearthResult<Vec<Area>> {
        let rows = sqlx::query_as::<_, AreaRow>("SELECT id, name FROM areas ORDER BY id")
            .fetch_all(self.pool.inner())
            .await?;

        Ok(rows
            .into_iter()
            .map(|row| Area {
                id: AreaId::new(row.id),
                name: row.name,
            })
            .collect())
    }
}
