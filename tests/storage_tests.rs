//! Result store behavior over a real SQLite database.

use std::sync::Arc;

use chrono::Duration;
use futures_util::StreamExt;
use tokio::runtime::Handle;

use riskwarden::adapter::outbound::sqlite::SqliteResultBackend;
use riskwarden::application::storage::{
    DiscardWindows, ExposureWindowRetention, RetainWindows, RiskResultStore,
};
use riskwarden::domain::{ResultId, RiskLevel, RiskLevelResult};
use riskwarden::port::ResultStorageBackend;
use riskwarden::testkit::db::TempDb;
use riskwarden::testkit::domain::{at, result_at, result_with_windows};
use riskwarden::testkit::legacy::StaticMigrator;
use riskwarden::testkit::report::RecordingReporter;

struct Harness {
    _db: TempDb,
    backend: Arc<SqliteResultBackend>,
    reporter: Arc<RecordingReporter>,
    store: RiskResultStore,
}

fn harness(name: &str, limit: usize, retain: bool, legacy: Vec<RiskLevelResult>) -> Harness {
    let db = TempDb::create(name);
    let backend = Arc::new(SqliteResultBackend::new(db.pool().clone(), Handle::current()));
    let windows: Arc<dyn ExposureWindowRetention> = if retain {
        Arc::new(RetainWindows::new(backend.clone()))
    } else {
        Arc::new(DiscardWindows::new(backend.clone()))
    };
    let reporter = Arc::new(RecordingReporter::new());
    let store = RiskResultStore::new(
        backend.clone(),
        windows,
        Arc::new(StaticMigrator::new(legacy)),
        reporter.clone(),
        limit,
    );
    Harness {
        _db: db,
        backend,
        reporter,
        store,
    }
}

fn timestamps(results: &[RiskLevelResult]) -> Vec<i64> {
    results.iter().map(|r| r.calculated_at().timestamp()).collect()
}

#[tokio::test]
async fn limit_two_keeps_the_two_newest() {
    let h = harness("limit-two", 2, false, vec![]);

    for t in 1..=3 {
        assert!(h.store.store_result(&result_at(t)).await.is_stored());
    }

    let stored = h.store.risk_level_results().next().await.unwrap();
    assert_eq!(timestamps(&stored), vec![2, 3]);
    for limit in [1, 2, 100] {
        assert_eq!(timestamps(&h.store.get_latest_results(limit).await), vec![2, 3]);
    }
    assert!(h.reporter.failures().is_empty());
}

#[tokio::test]
async fn retention_holds_after_every_cycle() {
    let h = harness("retention", 3, false, vec![]);
    let order = [5, 1, 9, 3, 7, 2, 8];
    let mut seen = Vec::new();

    for t in order {
        h.store.store_result(&result_at(t)).await;
        seen.push(t);
        seen.sort_unstable();
        let expected: Vec<i64> = seen.iter().rev().take(3).rev().copied().collect();

        let stored = h.store.current_risk_level_results().await;
        assert_eq!(timestamps(&stored), expected);
    }
}

#[tokio::test]
async fn no_window_outlives_its_result() {
    let h = harness("orphans", 1, true, vec![]);

    for t in 1..=4 {
        h.store.store_result(&result_with_windows(t, 2)).await;

        let parents: Vec<ResultId> = h
            .backend
            .results()
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.id)
            .collect();
        let windows = h.backend.windows().await.unwrap();
        assert_eq!(windows.len(), 2);
        assert!(windows.iter().all(|w| parents.contains(&w.result_id)));
    }
}

#[tokio::test]
async fn empty_table_emits_legacy_set() {
    let legacy = vec![RiskLevelResult::new(RiskLevel::Increased, at(42))];
    let h = harness("legacy", 2, false, legacy.clone());

    assert_eq!(h.store.risk_level_results().next().await.unwrap(), legacy);
    assert_eq!(
        h.store.last_risk_level_result().next().await.unwrap(),
        legacy[0]
    );
}

#[tokio::test]
async fn clear_empties_both_streams() {
    let h = harness("clear", 2, true, vec![]);
    h.store.store_result(&result_with_windows(1, 3)).await;
    h.store.store_result(&result_with_windows(2, 1)).await;

    assert!(h.store.clear().await);

    assert!(h.store.risk_level_results().next().await.unwrap().is_empty());
    assert!(h.store.exposure_windows().next().await.unwrap().is_empty());
    assert_eq!(
        h.store.last_risk_level_result().next().await.unwrap(),
        RiskLevelResult::initial()
    );
}

#[tokio::test]
async fn stored_result_round_trips_its_fields() {
    let h = harness("fields", 2, false, vec![]);
    let result = result_with_windows(10, 2);

    h.store.store_result(&result).await;

    let stored = h.store.current_risk_level_results().await;
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].risk_level(), RiskLevel::Increased);
    assert_eq!(stored[0].calculated_at(), result.calculated_at());
    assert_eq!(stored[0].matched_key_count(), 2);
    assert!(stored[0].is_increased_risk());
    assert!(stored[0].exposure_windows().is_none());
}

#[tokio::test]
async fn subscribers_see_each_store_cycle() {
    let h = harness("subscribe", 2, false, vec![]);
    let mut last = h.store.last_risk_level_result();
    assert_eq!(last.next().await.unwrap(), RiskLevelResult::initial());

    h.store.store_result(&result_at(1)).await;
    assert_eq!(last.next().await.unwrap().calculated_at().timestamp(), 1);

    h.store.store_result(&result_at(2)).await;
    assert_eq!(last.next().await.unwrap().calculated_at().timestamp(), 2);
}

#[tokio::test]
async fn newest_result_wins_within_one_millisecond() {
    let base = at(1_700_000_000);
    for run in 0..10 {
        let h = harness(&format!("same-milli-{run}"), 1, false, vec![]);
        let older = RiskLevelResult::new(RiskLevel::Low, base + Duration::nanoseconds(100));
        let newer =
            RiskLevelResult::new(RiskLevel::Increased, base + Duration::nanoseconds(900_000));

        h.store.store_result(&older).await;
        h.store.store_result(&newer).await;

        assert_eq!(h.store.current_risk_level_results().await, vec![newer]);
    }
}

#[tokio::test]
async fn large_counters_read_back_unchanged() {
    let h = harness("counters", 2, false, vec![]);
    let result = RiskLevelResult::new(
        RiskLevel::Increased,
        at(1_700_000_020) + Duration::nanoseconds(123_456_789),
    )
    .with_counts(3_000_000_000, 1);

    assert!(h.store.store_result(&result).await.is_clean());

    assert_eq!(h.store.current_risk_level_results().await, vec![result]);
}
