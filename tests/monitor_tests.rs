//! Config change monitoring end to end: broadcast provider, task queue and
//! in-memory risk state.

use std::sync::Arc;
use std::time::Duration;

use tokio::runtime::Handle;

use riskwarden::adapter::outbound::channel::{ConfigBroadcast, TaskQueue};
use riskwarden::adapter::outbound::memory::InMemoryRiskState;
use riskwarden::application::monitor::{ConfigChangeMonitor, ORIGIN_TAG};
use riskwarden::domain::{ConfigData, DiagnosisKeysDataMapping, ReportType, RiskLevel};
use riskwarden::infrastructure::bootstrap::{build_config_monitor, MonitorDeps};
use riskwarden::port::{RiskLevelData, RiskLevelState, TaskKind};
use riskwarden::testkit::domain::mapping;
use riskwarden::testkit::engine::FakeScoringEngine;
use riskwarden::testkit::report::RecordingReporter;
use riskwarden::testkit::wait_until;

#[tokio::test]
async fn unset_identifier_means_no_reset() {
    let configs = Arc::new(ConfigBroadcast::new(8));
    let (queue, mut tasks) = TaskQueue::new();
    let state = Arc::new(InMemoryRiskState::new(RiskLevel::Low));
    let engine = Arc::new(FakeScoringEngine::new(DiagnosisKeysDataMapping::default()));

    let monitor = build_config_monitor(
        MonitorDeps {
            config_provider: configs.clone(),
            scheduler: Arc::new(queue),
            risk_level_data: state.clone(),
            risk_level_state: state.clone(),
            engine: engine.clone(),
        },
        Handle::current(),
    );
    let handle = monitor.launch();

    configs.publish(ConfigData::new("X"));
    wait_until(|| engine.read_calls() == 1).await;

    assert!(tasks.try_recv().is_err());
    assert_eq!(state.current_risk_level(), RiskLevel::Low);
    assert_eq!(state.last_used_config_identifier(), None);
    handle.abort();
}

#[tokio::test]
async fn changed_identifier_resets_and_queues_one_task() {
    let configs = Arc::new(ConfigBroadcast::new(8));
    let (queue, mut tasks) = TaskQueue::new();
    let state = Arc::new(InMemoryRiskState::new(RiskLevel::Increased));
    state.set_last_used_config_identifier(Some("X".into()));
    let mut levels = state.subscribe();

    let monitor = build_config_monitor(
        MonitorDeps {
            config_provider: configs.clone(),
            scheduler: Arc::new(queue),
            risk_level_data: state.clone(),
            risk_level_state: state.clone(),
            engine: Arc::new(FakeScoringEngine::new(DiagnosisKeysDataMapping::default())),
        },
        Handle::current(),
    );
    let handle = monitor.launch();

    configs.publish(ConfigData::new("Y"));

    let task = tokio::time::timeout(Duration::from_secs(2), tasks.recv())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(task.request.kind, TaskKind::RiskLevel);
    assert_eq!(task.request.origin_tag, ORIGIN_TAG);
    assert!(!task.is_awaited());

    levels.changed().await.unwrap();
    assert_eq!(*levels.borrow(), RiskLevel::Undetermined);
    assert_eq!(state.last_used_config_identifier().as_deref(), Some("Y"));

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(tasks.try_recv().is_err());
    handle.abort();
}

#[tokio::test]
async fn replayed_config_is_processed_on_launch() {
    let configs = Arc::new(ConfigBroadcast::new(8));
    configs.publish(
        ConfigData::new("X").with_diagnosis_keys_data_mapping(mapping(ReportType::ConfirmedTest)),
    );
    let (queue, _tasks) = TaskQueue::new();
    let state = Arc::new(InMemoryRiskState::default());
    let engine = Arc::new(FakeScoringEngine::new(DiagnosisKeysDataMapping::default()));

    let monitor = build_config_monitor(
        MonitorDeps {
            config_provider: configs.clone(),
            scheduler: Arc::new(queue),
            risk_level_data: state.clone(),
            risk_level_state: state,
            engine: engine.clone(),
        },
        Handle::current(),
    );
    let handle = monitor.launch();

    wait_until(|| engine.set_calls().len() == 1).await;
    assert_eq!(engine.active_mapping(), mapping(ReportType::ConfirmedTest));
    handle.abort();
}

#[tokio::test]
async fn rejected_mapping_keeps_the_subscription_alive() {
    let configs = Arc::new(ConfigBroadcast::new(8));
    let (queue, _tasks) = TaskQueue::new();
    let state = Arc::new(InMemoryRiskState::default());
    let engine = Arc::new(FakeScoringEngine::new(DiagnosisKeysDataMapping::default()));
    let reporter = Arc::new(RecordingReporter::new());
    engine.reject_next_set(39501);

    let monitor = Arc::new(ConfigChangeMonitor::new(
        configs.clone(),
        Arc::new(queue),
        state.clone(),
        state,
        engine.clone(),
        reporter.clone(),
        Handle::current(),
    ));
    let handle = monitor.launch();

    configs.publish(
        ConfigData::new("A").with_diagnosis_keys_data_mapping(mapping(ReportType::SelfReport)),
    );
    wait_until(|| engine.set_calls().len() == 1).await;
    assert_eq!(engine.active_mapping(), DiagnosisKeysDataMapping::default());

    configs.publish(
        ConfigData::new("B").with_diagnosis_keys_data_mapping(mapping(ReportType::Recursive)),
    );
    wait_until(|| engine.set_calls().len() == 2).await;

    assert_eq!(engine.active_mapping(), mapping(ReportType::Recursive));
    assert_eq!(reporter.failures().len(), 1);
    assert!(!handle.is_finished());
    handle.abort();
}
