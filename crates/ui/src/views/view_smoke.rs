use std::sync::Arc;

use serde_json::json;
use services::feedback::{HIDDEN_MISMATCH_HINT, SUCCESS_BANNER};
use storage::{BlobRepository, InMemoryRepository, ProgressStore, Storage, StorageError};

use super::test_harness::{
    FakeApi, exercise_id, grading, setup_view_harness, setup_view_harness_with_storage,
};
use crate::vm::TrainerIntent;

#[tokio::test(flavor = "current_thread")]
async fn trainer_view_smoke_renders_first_exercise_and_catalog() {
    let mut harness = setup_view_harness(Arc::new(FakeApi::catalog()), None).await;
    harness.rebuild();
    harness.settle().await;

    let html = harness.render();
    for expected in [
        "Count up",
        "Exercise 1 / 3",
        "Write a function.",
        "Return the result.",
        "basics",
        "loops",
        "Countdown",
        "Global score: 0%",
        "Reveal hint",
        "0 of 2 hints",
        "Exercise: 0%",
        "not started",
    ] {
        assert!(html.contains(expected), "missing {expected} in {html}");
    }
    assert!(!html.contains("Running..."), "idle run control in {html}");
    assert!(!html.contains("feedback-summary"), "results area should be hidden in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn trainer_view_smoke_run_shows_results_and_scores() {
    let api = Arc::new(FakeApi::catalog());
    api.respond_all_passed();
    let mut harness = setup_view_harness(api, None).await;
    harness.rebuild();
    harness.settle().await;

    harness.dispatch(TrainerIntent::Run);
    harness.settle().await;

    let html = harness.render();
    for expected in [
        SUCCESS_BANNER,
        "2 of 2 tests passed",
        "Test 1",
        "Exercise: 100%",
        "basics: 50% (1/2)",
        "Global: 33%",
        "completed",
    ] {
        assert!(html.contains(expected), "missing {expected} in {html}");
    }

    let saved = ProgressStore::open(Arc::clone(&harness.storage.blobs)).await;
    assert_eq!(saved.get(&exercise_id("e1")).map(|entry| entry.score()), Some(100));
}

#[tokio::test(flavor = "current_thread")]
async fn trainer_view_smoke_open_switches_exercise() {
    let mut harness = setup_view_harness(Arc::new(FakeApi::catalog()), None).await;
    harness.rebuild();
    harness.settle().await;

    harness.dispatch(TrainerIntent::Open(exercise_id("e3")));
    harness.settle().await;

    let html = harness.render();
    assert!(html.contains("Exercise 3 / 3"), "missing position in {html}");
    assert!(html.contains("loops: 0% (0/1)"), "missing category score in {html}");
    assert!(!html.contains("Reveal hint"), "hint control shown without hints in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn trainer_view_smoke_reveals_hints_in_order() {
    let mut harness = setup_view_harness(Arc::new(FakeApi::catalog()), None).await;
    harness.rebuild();
    harness.settle().await;

    harness.dispatch(TrainerIntent::RevealHint);
    harness.settle().await;

    let html = harness.render();
    assert!(html.contains("Start from zero."), "missing first hint in {html}");
    assert!(!html.contains("Use a loop."), "second hint revealed early in {html}");
    assert!(html.contains("1 of 2 hints"), "missing hint count in {html}");
    assert!(html.contains("Hide hints"), "missing toggle in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn trainer_view_smoke_restores_saved_results() {
    let storage = Storage::in_memory();
    let mut seeded = ProgressStore::open(Arc::clone(&storage.blobs)).await;
    seeded
        .record_grading(
            &exercise_id("e2"),
            "def e2(): return 0",
            grading(json!({
                "success": true,
                "tests": [{"passed": false, "hidden": true, "expected": 6, "actual": 0}]
            })),
        )
        .await
        .unwrap();

    let mut harness = setup_view_harness_with_storage(
        Arc::new(FakeApi::catalog()),
        Some(exercise_id("e2")),
        storage,
    )
    .await;
    harness.rebuild();
    harness.settle().await;

    let html = harness.render();
    assert!(html.contains("Sum list"), "missing title in {html}");
    assert!(html.contains("Hidden test"), "missing hidden row in {html}");
    assert!(html.contains(HIDDEN_MISMATCH_HINT), "missing generic hint in {html}");
    assert!(html.contains("0 of 1 tests passed"), "missing summary in {html}");
    assert!(!html.contains("Expected"), "hidden values leaked in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn trainer_view_smoke_renders_error_state() {
    let mut harness = setup_view_harness(Arc::new(FakeApi::offline()), None).await;
    harness.rebuild();
    harness.settle().await;

    let html = harness.render();
    assert!(
        html.contains("Could not reach the exercise service"),
        "missing error in {html}"
    );
    assert!(html.contains("Retry"), "missing retry in {html}");
}

struct FailingWrites(InMemoryRepository);

#[async_trait::async_trait]
impl BlobRepository for FailingWrites {
    async fn read_blob(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.0.read_blob(key).await
    }

    async fn write_blob(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
        Err(StorageError::Connection("fail".to_string()))
    }
}

#[tokio::test(flavor = "current_thread")]
async fn trainer_view_smoke_failed_save_keeps_run_available() {
    let api = Arc::new(FakeApi::catalog());
    api.respond_all_passed();
    let storage = Storage {
        blobs: Arc::new(FailingWrites(InMemoryRepository::new())),
    };
    let mut harness = setup_view_harness_with_storage(api, None, storage).await;
    harness.rebuild();
    harness.settle().await;

    harness.dispatch(TrainerIntent::Run);
    harness.settle().await;

    let html = harness.render();
    assert!(html.contains("Your work could not be saved."), "missing error in {html}");
    assert!(!html.contains(SUCCESS_BANNER), "unsaved results shown in {html}");
    assert!(!html.contains("Running..."), "run control stuck in {html}");
    assert!(html.contains("Exercise: 0%"), "unsaved score shown in {html}");
}
