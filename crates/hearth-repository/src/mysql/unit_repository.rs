//! MySQL unit repository implementation.

use crate::{DatabasePool, UnitFilter, UnitQuery, UnitRepository};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use hearth_core::{AreaId, HearthError, HearthResult, Page, UnitId};
use hearth_domain::{Unit, UnitDetail};
use sqlx::{FromRow, MySql, QueryBuilder};
use std::sync::Arc;
use tracing::debug;

const UNIT_COLUMNS: &str = r#"
    SELECT u.id, u.owner_id, u.area_id, a.name AS area_name, u.title, u.price,
           u.address, u.room_count, u.acreage, u.layout, u.capacity, u.beds,
           u.deposit, u.min_days, u.max_days, u.booking_count, u.index_image_url,
           u.created_at
    FROM units u
    LEFT JOIN areas a ON a.id = u.area_id
"#;

/// MySQL unit repository implementation.
#[derive(Clone)]
pub struct MySqlUnitRepository {
    pool: Arc<DatabasePool>,
}

impl MySqlUnitRepository {
    /// Creates a new MySQL unit repository.
    #[must_use]
    pub fn new(pool: Arc<DatabasePool>) -> Self {
        Self { pool }
    }
}

/// Database row representation of a unit.
#[derive(Debug, FromRow)]
struct UnitRow {
    id: i64,
    owner_id: i64,
    area_id: i64,
    area_name: Option<String>,
    title: String,
    price: i64,
    address: String,
    room_count: i32,
    acreage: i32,
    layout: String,
    capacity: i32,
    beds: String,
    deposit: i64,
    min_days: i32,
    max_days: i32,
    booking_count: i32,
    index_image_url: Option<String>,
    created_at: DateTime<Utc>,
}

fn non_negative(id: i64, column: &str, value: i32) -> HearthResult<u32> {
    u32::try_from(value).map_err(|_| {
        HearthError::MalformedRecord(format!("unit {} has negative {}: {}", id, column, value))
    })
}

impl TryFrom<UnitRow> for Unit {
    type Error = HearthError;

    fn try_from(row: UnitRow) -> Result<Self, Self::Error> {
        Ok(Unit {
            id: UnitId::new(row.id),
            owner_id: row.owner_id,
            area_id: AreaId::new(row.area_id),
            area_name: row.area_name,
            title: row.title,
            price: row.price,
            address: row.address,
            room_count: non_negative(row.id, "room_count", row.room_count)?,
            acreage: non_negative(row.id, "acreage", row.acreage)?,
            layout: row.layout,
            capacity: non_negative(row.id, "capacity", row.capacity)?,
            beds: row.beds,
            deposit: row.deposit,
            min_days: non_negative(row.id, "min_days", row.min_days)?,
            max_days: non_negative(row.id, "max_days", row.max_days)?,
            booking_count: non_negative(row.id, "booking_count", row.booking_count)?,
            index_image_url: row.index_image_url,
            created_at: row.created_at,
        })
    }
}

fn push_filter(builder: &mut QueryBuilder<'_, MySql>, filter: &UnitFilter) {
    builder.push(" WHERE 1 = 1");

    if let Some(area_id) = filter.area_id {
        builder.push(" AND u.area_id = ").push_bind(area_id.into_inner());
    }

    // Excluded ids are integer literals, not binds: MySQL caps a statement
    // at 65,535 placeholders and the set grows with the booked inventory.
    if !filter.exclude.is_empty() {
        builder.push(" AND u.id NOT IN (");
        let mut ids = builder.separated(", ");
        for id in &filter.exclude {
            ids.push(id.into_inner());
        }
        ids.push_unseparated(")");
    }
}

#[async_trait]
impl UnitRepository for MySqlUnitRepository {
    async fn find_by_filter(&self, query: &UnitQuery) -> HearthResult<Page<Unit>> {
        debug!(
            area_id = ?query.filter.area_id,
            excluded = query.filter.exclude.len(),
            ordering = ?query.ordering,
            page = query.page.page,
            "Finding units by filter"
        );

        let mut count = QueryBuilder::<MySql>::new("SELECT COUNT(*) FROM units u");
        push_filter(&mut count, &query.filter);
        let total: i64 = count
            .build_query_scalar::<i64>()
            .fetch_one(self.pool.inner())
            .await?;

        let mut select = QueryBuilder::<MySql>::new(UNIT_COLUMNS);
        push_filter(&mut select, &query.filter);
        select
            .push(" ORDER BY ")
            .push(query.ordering.sql())
            .push(" LIMIT ")
            .push_bind(query.page.limit())
            .push(" OFFSET ")
            .push_bind(query.page.offset());

        let rows = select
            .build_query_as::<UnitRow>()
            .fetch_all(self.pool.inner())
            .await?;

        let units = rows
            .into_iter()
            .map(Unit::try_from)
            .collect::<HearthResult<Vec<_>>>()?;

        Ok(Page::new(units, query.page, total.max(0) as u64))
    }

    async fn find_detail(&self, id: UnitId) -> HearthResult<Option<UnitDetail>> {
        debug!("Finding unit detail: {}", id);

        let row = sqlx::query_as::<_, UnitRow>(&format!("{} WHERE u.id = ?", UNIT_COLUMNS))
            .bind(id.into_inner())
            .fetch_optional(self.pool.inner())
            .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let image_urls: Vec<String> =
            sqlx::query_scalar("SELECT url FROM unit_images WHERE unit_id = ? ORDER BY id")
                .bind(id.into_inner())
                .fetch_all(self.pool.inner())
                .await?;

        let facility_ids: Vec<i64> = sqlx::query_scalar(
            "SELECT facility_id FROM unit_facilities WHERE unit_id = ? ORDER BY facility_id",
        )
        .bind(id.into_inner())
        .fetch_all(self.pool.inner())
        .await?;

        Ok(Some(UnitDetail {
            unit: Unit::try_from(row)?,
            image_urls,
            facility_ids,
        }))
    }

    async fn find_most_booked(&self, limit: u32) -> HearthResult<Vec<Unit>> {
        debug!("Finding {} most booked units", limit);

        let rows = sqlx::query_as::<_, UnitRow>(&format!(
            "{} ORDER BY u.booking_count DESC, u.id DESC LIMIT ?",
            UNIT_COLUMNS
        ))
        .bind(limit)
        .fetch_all(self.pool.inner())
        .await?;

        rows.into_iter().map(Unit::try_from).collect()
    }
}
