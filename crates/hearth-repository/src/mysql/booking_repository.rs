//! MySQL booking repository implementation.

use crate::{BookingRepository, DatabasePool};
use async_trait::async_trait;
use chrono::NaiveDate;
use hearth_core::{BookingId, HearthResult, UnitId};
use hearth_domain::{Booking, DateRange};
use sqlx::{FromRow, MySql, QueryBuilder};
use std::sync::Arc;
use tracing::debug;

/// MySQL booking repository implementation.
#[derive(Clone)]
pub struct MySqlBookingRepository {
    pool: Arc<DatabasePool>,
}

impl MySqlBookingRepository {
    /// Creates a new MySQL booking repository.
    #[must_use]
    pub fn new(pool: Arc<DatabasePool>) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct BookingRow {
    id: i64,
    unit_id: i64,
    begin_date: NaiveDate,
    end_date: NaiveDate,
}

impl From<BookingRow> for Booking {
    fn from(row: BookingRow) -> Self {
        Booking {
            id: BookingId::from(row.id),
            unit_id: UnitId::new(row.unit_id),
            begin_date: row.begin_date,
            end_date: row.end_date,
        }
    }
}

#[async_trait]
impl BookingRepository for MySqlBookingRepository {
    async fn find_overlapping(&self, range: &DateRange) -> HearthResult<Vec<Booking>> {
        let mut builder =
            QueryBuilder::<MySql>::new("SELECT id, unit_id, begin_date, end_date FROM bookings");

        match (range.start(), range.end()) {
            (Some(start), Some(end)) => {
                builder
                    .push(" WHERE begin_date <= ")
                    .push_bind(end)
                    .push(" AND end_date >= ")
                    .push_bind(start);
            }
            (Some(start), None) => {
                builder.push(" WHERE end_date >= ").push_bind(start);
            }
            (None, Some(end)) => {
                builder.push(" WHERE begin_date <= ").push_bind(end);
            }
            (None, None) => return Ok(Vec::new()),
        }

        debug!("Finding bookings overlapping {}", range);

        let rows = builder
            .build_query_as::<BookingRow>()
            .fetch_all(self.pool.inner())
            .await?;

        Ok(rows.into_iter().map(Booking::from).collect())
    }
}
