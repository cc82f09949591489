//! In-process repository implementations.
//!
//! These hold their rows in memory and count every call, which lets the
//! service tests assert exactly when the store was (or was not) consulted.
//! [`InMemoryUnitRepository::set_unavailable`] and friends make every
//! subsequent call fail with [`HearthError::Database`].

use crate::{AreaRepository, BookingRepository, UnitQuery, UnitRepository};
use async_trait::async_trait;
use hearth_core::{HearthError, HearthResult, Page, UnitId};
use hearth_domain::{Area, Booking, DateRange, Unit, UnitDetail};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

fn unavailable() -> HearthError {
    HearthError::Database("store unavailable".to_string())
}

/// Call bookkeeping shared by the in-memory repositories.
#[derive(Debug, Default)]
struct CallLog {
    calls: AtomicUsize,
    unavailable: AtomicBool,
}

impl CallLog {
    fn enter(&self) -> HearthResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.unavailable.load(Ordering::SeqCst) {
            Err(unavailable())
        } else {
            Ok(())
        }
    }
}

/// Unit repository over a `Vec<Unit>`.
#[derive(Debug, Default)]
pub struct InMemoryUnitRepository {
    units: Mutex<Vec<Unit>>,
    images: Mutex<HashMap<UnitId, Vec<String>>>,
    facilities: Mutex<HashMap<UnitId, Vec<i64>>>,
    queries: Mutex<Vec<UnitQuery>>,
    log: CallLog,
}

impl InMemoryUnitRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a repository holding `units`.
    #[must_use]
    pub fn with_units(units: impl IntoIterator<Item = Unit>) -> Self {
        let repo = Self::new();
        repo.units.lock().extend(units);
        repo
    }

    /// Adds or replaces a unit.
    pub fn upsert(&self, unit: Unit) {
        let mut units = self.units.lock();
        units.retain(|existing| existing.id != unit.id);
        units.push(unit);
    }

    /// Attaches detail data to a unit.
    pub fn set_detail(&self, id: UnitId, image_urls: Vec<String>, facility_ids: Vec<i64>) {
        self.images.lock().insert(id, image_urls);
        self.facilities.lock().insert(id, facility_ids);
    }

    /// Makes every following call fail (or succeed again).
    pub fn set_unavailable(&self, unavailable: bool) {
        self.log.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Number of calls made so far, failed ones included.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.log.calls.load(Ordering::SeqCst)
    }

    /// Every listing query received, oldest first.
    #[must_use]
    pub fn queries(&self) -> Vec<UnitQuery> {
        self.queries.lock().clone()
    }
}

#[async_trait]
impl UnitRepository for InMemoryUnitRepository {
    async fn find_by_filter(&self, query: &UnitQuery) -> HearthResult<Page<Unit>> {
        self.queries.lock().push(query.clone());
        self.log.enter()?;

        let mut matching: Vec<Unit> = self
            .units
            .lock()
            .iter()
            .filter(|unit| query.filter.matches(unit))
            .cloned()
            .collect();
        matching.sort_by(|a, b| query.ordering.compare(a, b));

        let total = matching.len() as u64;
        let content = matching
            .into_iter()
            .skip(usize::try_from(query.page.offset()).unwrap_or(usize::MAX))
            .take(query.page.size as usize)
            .collect();

        Ok(Page::new(content, query.page, total))
    }

    async fn find_detail(&self, id: UnitId) -> HearthResult<Option<UnitDetail>> {
        self.log.enter()?;

        let unit = self.units.lock().iter().find(|unit| unit.id == id).cloned();
        Ok(unit.map(|unit| UnitDetail {
            image_urls: self.images.lock().get(&id).cloned().unwrap_or_default(),
            facility_ids: self.facilities.lock().get(&id).cloned().unwrap_or_default(),
            unit,
        }))
    }

    async fn find_most_booked(&self, limit: u32) -> HearthResult<Vec<Unit>> {
        self.log.enter()?;

        let mut units = self.units.lock().clone();
        units.sort_by(|a, b| b.booking_count.cmp(&a.booking_count).then(b.id.cmp(&a.id)));
        units.truncate(limit as usize);
        Ok(units)
    }
}

/// Booking repository over a `Vec<Booking>`.
#[derive(Debug, Default)]
pub struct InMemoryBookingRepository {
    bookings: Mutex<Vec<Booking>>,
    log: CallLog,
}

impl InMemoryBookingRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a repository holding `bookings`.
    #[must_use]
    pub fn with_bookings(bookings: impl IntoIterator<Item = Booking>) -> Self {
        let repo = Self::new();
        repo.bookings.lock().extend(bookings);
        repo
    }

    /// Records a new booking.
    pub fn insert(&self, booking: Booking) {
        self.bookings.lock().push(booking);
    }

    /// Makes every following call fail (or succeed again).
    pub fn set_unavailable(&self, unavailable: bool) {
        self.log.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Number of calls made so far, failed ones included.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.log.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl BookingRepository for InMemoryBookingRepository {
    async fn find_overlapping(&self, range: &DateRange) -> HearthResult<Vec<Booking>> {
        self.log.enter()?;

        Ok(self
            .bookings
            .lock()
            .iter()
            .filter(|booking| booking.conflicts_with(range))
            .cloned()
            .collect())
    }
}

/// Area repository over a `Vec<Area>`.
#[derive(Debug, Default)]
pub struct InMemoryAreaRepository {
    areas: Mutex<Vec<Area>>,
    log: CallLog,
}

impl InMemoryAreaRepository {
    /// Creates a repository holding `areas`.
    #[must_use]
    pub fn with_areas(areas: impl IntoIterator<Item = Area>) -> Self {
        let repo = Self::default();
        repo.areas.lock().extend(areas);
        repo
    }

    /// Makes every following call fail (or succeed again).
    pub fn set_unavailable(&self, unavailable: bool) {
        self.log.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Number of calls made so far, failed ones included.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.log.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AreaRepository for InMemoryAreaRepository {
    async fn find_all(&self) -> HearthResult<Vec<Area>> {
        self.log.enter()?;

        let mut areas = self.areas.lock().clone();
        areas.sort_by_key(|area| area.id);
        Ok(areas)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{UnitFilter, UnitOrdering};
    use chrono::{NaiveDate, TimeZone, Utc};
    use hearth_core::{AreaId, BookingId, PageRequest};

    fn unit(id: i64, area: i64, price: i64, booking_count: u32) -> Unit {
        Unit {
            id: UnitId::new(id),
            owner_id: 1,
            area_id: AreaId::new(area),
            area_name: Some(format!("area-{}", area)),
            title: format!("unit {}", id),
            price,
            address: String::new(),
            room_count: 1,
            acreage: 30,
            layout: String::new(),
            capacity: 2,
            beds: String::new(),
            deposit: 0,
            min_days: 1,
            max_days: 0,
            booking_count,
            index_image_url: None,
            created_at: Utc.timestamp_opt(1_700_000_000 + id, 0).unwrap(),
        }
    }

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[tokio::test]
    async fn test_find_by_filter_pages_and_counts() {
        let repo = InMemoryUnitRepository::with_units((1..=5).map(|id| unit(id, 1, 100 * id, 0)));
        let query = UnitQuery {
            filter: UnitFilter::default(),
            ordering: UnitOrdering::PriceAsc,
            page: PageRequest::new(2, 2),
        };

        let page = repo.find_by_filter(&query).await.unwrap();
        let ids: Vec<i64> = page.content.iter().map(|u| u.id.into_inner()).collect();
        assert_eq!(ids, vec![3, 4]);
        assert_eq!(page.info.total_elements, 5);
        assert_eq!(page.info.total_pages, 3);
        assert_eq!(repo.calls(), 1);
        assert_eq!(repo.queries(), vec![query]);
    }

    #[tokio::test]
    async fn test_find_by_filter_applies_area_and_exclusions() {
        let repo = InMemoryUnitRepository::with_units(vec![
            unit(1, 5, 100, 0),
            unit(2, 5, 200, 0),
            unit(3, 6, 300, 0),
        ]);
        let query = UnitQuery {
            filter: UnitFilter {
                area_id: Some(AreaId::new(5)),
                exclude: [UnitId::new(1)].into_iter().collect(),
            },
            ordering: UnitOrdering::CreatedDesc,
            page: PageRequest::first(),
        };

        let page = repo.find_by_filter(&query).await.unwrap();
        assert_eq!(page.content.len(), 1);
        assert_eq!(page.content[0].id, UnitId::new(2));
    }

    #[tokio::test]
    async fn test_unavailable_store_fails_and_counts() {
        let repo = InMemoryUnitRepository::new();
        repo.set_unavailable(true);

        let err = repo.find_most_booked(5).await.unwrap_err();
        assert!(matches!(err, HearthError::Database(_)));
        assert_eq!(repo.calls(), 1);
    }

    #[tokio::test]
    async fn test_find_detail_joins_images() {
        let repo = InMemoryUnitRepository::with_units(vec![unit(7, 1, 100, 0)]);
        repo.set_detail(UnitId::new(7), vec!["a.jpg".to_string()], vec![3]);

        let detail = repo.find_detail(UnitId::new(7)).await.unwrap().unwrap();
        assert_eq!(detail.image_urls, vec!["a.jpg".to_string()]);
        assert_eq!(detail.facility_ids, vec![3]);
        assert!(repo.find_detail(UnitId::new(8)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_most_booked_orders_by_count() {
        let repo = InMemoryUnitRepository::with_units(vec![
            unit(1, 1, 100, 3),
            unit(2, 1, 100, 9),
            unit(3, 1, 100, 9),
        ]);

        let ids: Vec<i64> = repo
            .find_most_booked(2)
            .await
            .unwrap()
            .iter()
            .map(|u| u.id.into_inner())
            .collect();
        assert_eq!(ids, vec![3, 2]);
    }

    #[tokio::test]
    async fn test_find_overlapping_uses_range_semantics() {
        let repo = InMemoryBookingRepository::with_bookings(vec![
            Booking {
                id: BookingId::from(1),
                unit_id: UnitId::new(1),
                begin_date: date("2024-01-10"),
                end_date: date("2024-01-20"),
            },
            Booking {
                id: BookingId::from(2),
                unit_id: UnitId::new(2),
                begin_date: date("2024-03-01"),
                end_date: date("2024-03-05"),
            },
        ]);

        let range = DateRange::new(Some(date("2024-01-20")), Some(date("2024-02-01"))).unwrap();
        let found = repo.find_overlapping(&range).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].unit_id, UnitId::new(1));

        assert!(repo.find_overlapping(&DateRange::unbounded()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_areas_sorted_by_id() {
        let repo = InMemoryAreaRepository::with_areas(vec![
            Area { id: AreaId::new(2), name: "East".to_string() },
            Area { id: AreaId::new(1), name: "West".to_string() },
        ]);

        let areas = repo.find_all().await.unwrap();
        assert_eq!(areas[0].name, "West");
        assert_eq!(repo.calls(), 1);
    }
}
