//! Issue store tests against an in-memory SQLite database

#![cfg(feature = "database")]

use kite_exporter::metrics::instruments::{
    DATABASE_CONNECTIONS_ACTIVE, DATABASE_CONNECTIONS_IDLE, ISSUES_BY_SEVERITY, ISSUES_TOTAL,
};
use kite_exporter::metrics::VectorOutcome;
use kite_exporter::testing::{TestDb, get as test_get};
use kite_exporter::{
    AggregateRow, App, IssueCollector, IssueDimension, IssueRecord, IssueStore, KiteError,
    MetricRegistry, SeaOrmIssueStore,
};
use std::sync::Arc;

async fn seeded_db() -> TestDb {
    let db = TestDb::new().await.expect("Failed to create test database");
    for issue in [
        IssueRecord::new("i1", "a", "major", "active", "build"),
        IssueRecord::new("i2", "a", "major", "active", "build"),
        IssueRecord::new("i3", "b", "minor", "resolved", "test"),
    ] {
        db.insert_issue(&issue).await.unwrap();
    }
    db
}

fn sorted(mut rows: Vec<AggregateRow>) -> Vec<AggregateRow> {
    rows.sort_by(|a, b| a.dimensions.cmp(&b.dimensions));
    rows
}

#[tokio::test]
async fn test_count_grouped_matches_group_by() {
    let db = seeded_db().await;
    let store = db.store();

    let rows = store
        .count_grouped(&[
            IssueDimension::Namespace,
            IssueDimension::Severity,
            IssueDimension::State,
            IssueDimension::Type,
        ])
        .await
        .unwrap();

    assert_eq!(
        sorted(rows),
        vec![
            AggregateRow::new(
                vec!["a".into(), "major".into(), "active".into(), "build".into()],
                2
            ),
            AggregateRow::new(
                vec!["b".into(), "minor".into(), "resolved".into(), "test".into()],
                1
            ),
        ]
    );
}

#[tokio::test]
async fn test_count_grouped_rejects_empty_dimensions() {
    let db = seeded_db().await;
    assert!(matches!(
        db.store().count_grouped(&[]).await,
        Err(KiteError::BadRequest(_))
    ));
}

#[tokio::test]
async fn test_missing_table_is_a_query_failure() {
    let db = seeded_db().await;
    db.drop_issues_table().await.unwrap();

    let result = db.store().count_grouped(&[IssueDimension::State]).await;
    assert!(matches!(result, Err(KiteError::Database(_))));
}

#[tokio::test]
async fn test_pool_snapshot_reports_sqlite_pool() {
    let db = seeded_db().await;
    let snapshot = db.store().pool_snapshot().unwrap();
    // Single-connection pool, idle between queries
    assert_eq!(snapshot.in_use + snapshot.idle, 1);
}

#[tokio::test]
async fn test_custom_table_name() {
    let db = TestDb::empty().await.unwrap();
    db.seed(&[
        "CREATE TABLE tracker_issues (id TEXT PRIMARY KEY, namespace TEXT, severity TEXT, state TEXT, issue_type TEXT)",
        "INSERT INTO tracker_issues VALUES ('1', 'ops', 'critical', 'active', 'deploy')",
    ])
    .await
    .unwrap();

    let store = SeaOrmIssueStore::new(db.connection())
        .with_table("tracker_issues")
        .unwrap();
    let rows = store.count_grouped(&[IssueDimension::Namespace]).await.unwrap();
    assert_eq!(rows, vec![AggregateRow::new(vec!["ops".into()], 1)]);

    assert!(SeaOrmIssueStore::new(db.connection()).with_table("issues--").is_err());
}

#[tokio::test]
async fn test_collector_refresh_against_database() {
    let db = seeded_db().await;
    let registry = Arc::new(MetricRegistry::new());
    kite_exporter::metrics::declare_standard(&registry).unwrap();
    let collector = IssueCollector::new(registry.clone(), Arc::new(db.store()));

    let report = collector.refresh().await;
    assert!(report.is_complete());

    db.seed(&["UPDATE issues SET state = 'resolved' WHERE id = 'i1'"])
        .await
        .unwrap();
    collector.refresh().await;

    let snapshot = registry.snapshot();
    assert_eq!(
        snapshot.value(ISSUES_TOTAL, &["a", "major", "active", "build"]),
        Some(1.0)
    );
    assert_eq!(
        snapshot.value(ISSUES_BY_SEVERITY, &["major", "resolved"]),
        Some(1.0)
    );
    assert_eq!(
        snapshot.value(DATABASE_CONNECTIONS_ACTIVE, &[]).unwrap()
            + snapshot.value(DATABASE_CONNECTIONS_IDLE, &[]).unwrap(),
        1.0
    );
}

#[tokio::test]
async fn test_severed_store_keeps_serving_scrapes() {
    let db = seeded_db().await;
    let app = App::new().unwrap().with_issue_store(Arc::new(db.store()));
    let registry = app.registry();
    let collector = app.collector().unwrap();
    let router = app.into_router();

    test_get(router.clone(), "/metrics").execute().await.assert_ok();
    db.drop_issues_table().await.unwrap();

    test_get(router, "/metrics")
        .execute()
        .await
        .assert_ok()
        .assert_not_contains("issues_total{")
        .await;

    let report = collector.refresh().await;
    assert_eq!(report.outcome(ISSUES_TOTAL), Some(VectorOutcome::Failed));
    assert!(registry.snapshot().series(ISSUES_TOTAL).is_empty());
}
