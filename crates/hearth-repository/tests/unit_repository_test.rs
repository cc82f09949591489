//! Integration tests for the MySQL repositories.
//!
//! These tests run against a real MySQL database using testcontainers.
//! Requires Docker to be available on the system.

mod common;

use chrono::NaiveDate;
use common::TestDatabase;
use hearth_core::{AreaId, HearthError, PageRequest, UnitId};
use hearth_domain::DateRange;
use hearth_repository::{
    AreaRepository, BookingRepository, MySqlAreaRepository, MySqlBookingRepository,
    MySqlUnitRepository, UnitFilter, UnitOrdering, UnitQuery, UnitRepository,
};

async fn seed(db: &TestDatabase) {
    db.execute("INSERT INTO areas (id, name) VALUES (5, 'Harbour'), (6, 'Old Town')")
        .await;
    db.execute(
        "INSERT INTO units (id, owner_id, area_id, title, price, booking_count, created_at) VALUES \
         (1, 1, 5, 'Loft', 30000, 4, '2024-01-01 00:00:00'), \
         (2, 1, 5, 'Studio', 10000, 9, '2024-01-02 00:00:00'), \
         (3, 2, 5, 'Cabin', 20000, 1, '2024-01-03 00:00:00'), \
         (4, 2, 6, 'Villa', 90000, 2, '2024-01-04 00:00:00')",
    )
    .await;
    db.execute("INSERT INTO unit_images (unit_id, url) VALUES (2, 'b1.jpg'), (2, 'b2.jpg')")
        .await;
    db.execute("INSERT INTO unit_facilities (unit_id, facility_id) VALUES (2, 7), (2, 3)")
        .await;
    db.execute(
        "INSERT INTO bookings (unit_id, begin_date, end_date) VALUES \
         (1, '2024-02-10', '2024-02-15'), \
         (4, '2024-03-01', '2024-03-03')",
    )
    .await;
}

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_find_by_filter_orders_pages_and_excludes() {
    let db = TestDatabase::new().await;
    seed(&db).await;
    let repo = MySqlUnitRepository::new(db.pool());

    let query = UnitQuery {
        filter: UnitFilter {
            area_id: Some(AreaId::new(5)),
            exclude: [UnitId::new(1)].into_iter().collect(),
        },
        ordering: UnitOrdering::PriceAsc,
        page: PageRequest::new(1, 1),
    };

    let page = repo.find_by_filter(&query).await.expect("Query failed");
    assert_eq!(page.info.total_elements, 2);
    assert_eq!(page.info.total_pages, 2);
    assert_eq!(page.content[0].id, UnitId::new(2));
    assert_eq!(page.content[0].area_name.as_deref(), Some("Harbour"));

    let beyond = UnitQuery {
        page: PageRequest::new(9, 1),
        ..query
    };
    let page = repo.find_by_filter(&beyond).await.expect("Query failed");
    assert!(page.is_empty());
    assert_eq!(page.info.total_elements, 2);
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_find_by_filter_with_exclusions_past_placeholder_limit() {
    let db = TestDatabase::new().await;
    seed(&db).await;
    let repo = MySqlUnitRepository::new(db.pool());

    let mut exclude: std::collections::BTreeSet<UnitId> = (100..70_100).map(UnitId::new).collect();
    exclude.insert(UnitId::new(3));
    let query = UnitQuery {
        filter: UnitFilter {
            area_id: None,
            exclude,
        },
        ordering: UnitOrdering::PriceAsc,
        page: PageRequest::new(1, 10),
    };

    let page = repo.find_by_filter(&query).await.expect("Query failed");
    assert_eq!(page.info.total_elements, 3);
    let ids: Vec<_> = page.content.iter().map(|unit| unit.id).collect();
    assert_eq!(ids, vec![UnitId::new(2), UnitId::new(1), UnitId::new(4)]);
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_find_by_filter_newest_first() {
    let db = TestDatabase::new().await;
    seed(&db).await;
    let repo = MySqlUnitRepository::new(db.pool());

    let query = UnitQuery {
        filter: UnitFilter::default(),
        ordering: UnitOrdering::CreatedDesc,
        page: PageRequest::new(1, 10),
    };

    let ids: Vec<i64> = repo
        .find_by_filter(&query)
        .await
        .expect("Query failed")
        .content
        .iter()
        .map(|u| u.id.into_inner())
        .collect();
    assert_eq!(ids, vec![4, 3, 2, 1]);
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_find_detail_and_most_booked() {
    let db = TestDatabase::new().await;
    seed(&db).await;
    let repo = MySqlUnitRepository::new(db.pool());

    let detail = repo
        .find_detail(UnitId::new(2))
        .await
        .expect("Query failed")
        .expect("Unit not found");
    assert_eq!(detail.image_urls, vec!["b1.jpg".to_string(), "b2.jpg".to_string()]);
    assert_eq!(detail.facility_ids, vec![3, 7]);

    assert!(repo.find_detail(UnitId::new(99)).await.expect("Query failed").is_none());

    let top = repo.find_most_booked(2).await.expect("Query failed");
    let ids: Vec<i64> = top.iter().map(|u| u.id.into_inner()).collect();
    assert_eq!(ids, vec![2, 1]);
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_negative_count_is_malformed() {
    let db = TestDatabase::new().await;
    seed(&db).await;
    db.execute("UPDATE units SET room_count = -1 WHERE id = 3").await;
    let repo = MySqlUnitRepository::new(db.pool());

    let err = repo.find_detail(UnitId::new(3)).await.unwrap_err();
    assert!(matches!(err, HearthError::MalformedRecord(_)));
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_find_overlapping_bound_variants() {
    let db = TestDatabase::new().await;
    seed(&db).await;
    let repo = MySqlBookingRepository::new(db.pool());

    let both = DateRange::new(Some(date("2024-02-15")), Some(date("2024-02-20"))).unwrap();
    let found = repo.find_overlapping(&both).await.expect("Query failed");
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].unit_id, UnitId::new(1));

    let start_only = DateRange::new(Some(date("2024-02-16")), None).unwrap();
    let found = repo.find_overlapping(&start_only).await.expect("Query failed");
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].unit_id, UnitId::new(4));

    let end_only = DateRange::new(None, Some(date("2024-02-10"))).unwrap();
    let found = repo.find_overlapping(&end_only).await.expect("Query failed");
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].unit_id, UnitId::new(1));

    assert!(repo
        .find_overlapping(&DateRange::unbounded())
        .await
        .expect("Query failed")
        .is_empty());
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_find_all_areas() {
    let db = TestDatabase::new().await;
    seed(&db).await;
    let repo = MySqlAreaRepository::new(db.pool());

    let areas = repo.find_all().await.expect("Query failed");
    let names: Vec<&str> = areas.iter().map(|a| a.name.as_str()).collect();
    assert_eq!(names, vec!["Harbour", "Old Town"]);
}
