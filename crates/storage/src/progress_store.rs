//! Durable per-exercise progress, persisted as one JSON blob.
//!
//! The store keeps the decoded mapping in memory and writes the whole mapping
//! back on every change, before returning to the caller. A change becomes
//! visible in memory only once the write has succeeded.

use std::sync::Arc;

use tracing::{debug, info, warn};
use trainer_core::model::{ExerciseId, ExerciseProgress, GradingResult, ProgressMap};

use crate::repository::{BlobRepository, StorageError};

/// Name of the blob holding the progress mapping.
pub const PROGRESS_BLOB_KEY: &str = "trainerProgress";

#[derive(Clone)]
pub struct ProgressStore {
    blobs: Arc<dyn BlobRepository>,
    key: String,
    progress: ProgressMap,
}

impl ProgressStore {
    /// Store with an empty in-memory mapping. Call [`ProgressStore::open`] to
    /// start from the persisted state instead.
    #[must_use]
    pub fn new(blobs: Arc<dyn BlobRepository>) -> Self {
        Self {
            blobs,
            key: PROGRESS_BLOB_KEY.to_owned(),
            progress: ProgressMap::new(),
        }
    }

    #[must_use]
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    /// Build a store and populate it from the persisted blob.
    pub async fn open(blobs: Arc<dyn BlobRepository>) -> Self {
        let mut store = Self::new(blobs);
        store.reload().await;
        store
    }

    /// Read and decode the persisted mapping.
    ///
    /// Never fails: a missing blob, a backend error or an undecodable value all
    /// yield an empty mapping.
    pub async fn load(&self) -> ProgressMap {
        let raw = match self.blobs.read_blob(&self.key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!(key = %self.key, "no saved progress");
                return ProgressMap::new();
            }
            Err(err) => {
                warn!(key = %self.key, error = %err, "failed to read saved progress; starting empty");
                return ProgressMap::new();
            }
        };

        match serde_json::from_str::<ProgressMap>(&raw) {
            Ok(map) => {
                info!(key = %self.key, entries = map.len(), "loaded saved progress");
                map
            }
            Err(err) => {
                warn!(key = %self.key, error = %err, "saved progress is corrupt; starting empty");
                ProgressMap::new()
            }
        }
    }

    /// Replace the in-memory mapping with the persisted one.
    pub async fn reload(&mut self) -> &ProgressMap {
        self.progress = self.load().await;
        &self.progress
    }

    /// Overwrite the persisted blob with `map` (whole-value replace).
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the mapping cannot be encoded or written.
    pub async fn save(&mut self, map: ProgressMap) -> Result<(), StorageError> {
        self.write_map(&map).await?;
        self.progress = map;
        Ok(())
    }

    #[must_use]
    pub fn progress(&self) -> &ProgressMap {
        &self.progress
    }

    #[must_use]
    pub fn get(&self, id: &ExerciseId) -> Option<&ExerciseProgress> {
        self.progress.get(id)
    }

    /// Save editor content for `id`, creating the entry when needed.
    /// Score and completion are left untouched.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the mapping cannot be persisted.
    pub async fn record_code(&mut self, id: &ExerciseId, code: &str) -> Result<(), StorageError> {
        let mut next = self.progress.clone();
        next.entry_mut(id).set_code(code);
        self.save(next).await
    }

    /// Replace the entry for `id` with the graded state derived from `result`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the mapping cannot be persisted.
    pub async fn record_grading(
        &mut self,
        id: &ExerciseId,
        code: &str,
        result: GradingResult,
    ) -> Result<&ExerciseProgress, StorageError> {
        let entry = ExerciseProgress::graded(code, result);
        info!(
            exercise = %id,
            score = entry.score(),
            completed = entry.completed(),
            "recording grading"
        );
        let mut next = self.progress.clone();
        next.insert(id.clone(), entry);
        self.save(next).await?;
        self.progress.get(id).ok_or_else(|| {
            StorageError::Serialization(format!("progress entry for {id} vanished"))
        })
    }

    async fn write_map(&self, map: &ProgressMap) -> Result<(), StorageError> {
        let raw = serde_json::to_string(map)
            .map_err(|err| StorageError::Serialization(err.to_string()))?;
        self.blobs.write_blob(&self.key, &raw).await.map_err(|err| {
            warn!(key = %self.key, error = %err, "failed to save progress");
            err
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::InMemoryRepository;
    use async_trait::async_trait;
    use trainer_core::model::TestResult;

    /// Reads from an inner repository, refuses every write.
    struct ReadOnlyRepository(InMemoryRepository);

    #[async_trait]
    impl BlobRepository for ReadOnlyRepository {
        async fn read_blob(&self, key: &str) -> Result<Option<String>, StorageError> {
            self.0.read_blob(key).await
        }

        async fn write_blob(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Connection("disk full".into()))
        }
    }

    fn id(raw: &str) -> ExerciseId {
        ExerciseId::new(raw).unwrap()
    }

    fn test(passed: bool) -> TestResult {
        TestResult {
            passed,
            hidden: false,
            description: None,
            input: None,
            expected: None,
            actual: None,
            error: None,
        }
    }

    #[tokio::test]
    async fn missing_blob_loads_empty() {
        let store = ProgressStore::new(Arc::new(InMemoryRepository::new()));
        assert!(store.load().await.is_empty());
    }

    #[tokio::test]
    async fn corrupt_blob_loads_empty() {
        let repo = InMemoryRepository::new();
        repo.write_blob(PROGRESS_BLOB_KEY, "{not json").await.unwrap();
        let store = ProgressStore::open(Arc::new(repo.clone())).await;
        assert!(store.progress().is_empty());

        repo.write_blob(PROGRESS_BLOB_KEY, r#"{"e1": {"score": "high"}}"#)
            .await
            .unwrap();
        assert!(store.load().await.is_empty());
    }

    #[tokio::test]
    async fn save_then_load_round_trips() {
        let repo = Arc::new(InMemoryRepository::new());
        let mut store = ProgressStore::new(repo.clone());

        let mut map = ProgressMap::new();
        map.insert(id("e1"), ExerciseProgress::with_code("print(1)"));
        map.insert(
            id("e2"),
            ExerciseProgress::graded(
                "def f(): return 2",
                GradingResult {
                    success: false,
                    error: None,
                    traceback: None,
                    tests: vec![test(true), test(false)],
                },
            ),
        );
        store.save(map.clone()).await.unwrap();

        let reopened = ProgressStore::open(repo).await;
        assert_eq!(reopened.progress(), &map);
    }

    #[tokio::test]
    async fn record_code_keeps_score_and_persists_immediately() {
        let repo = Arc::new(InMemoryRepository::new());
        let mut store = ProgressStore::new(repo.clone());
        let e1 = id("e1");

        store
            .record_grading(
                &e1,
                "v1",
                GradingResult {
                    success: true,
                    error: None,
                    traceback: None,
                    tests: vec![test(true)],
                },
            )
            .await
            .unwrap();
        store.record_code(&e1, "v2").await.unwrap();

        let persisted = ProgressStore::open(repo).await;
        let entry = persisted.get(&e1).unwrap();
        assert_eq!(entry.code(), "v2");
        assert_eq!(entry.score(), 100);
        assert!(entry.completed());
    }

    #[tokio::test]
    async fn record_grading_replaces_entry() {
        let mut store = ProgressStore::new(Arc::new(InMemoryRepository::new()));
        let e1 = id("e1");
        store.record_code(&e1, "draft").await.unwrap();

        let entry = store
            .record_grading(
                &e1,
                "def f(:",
                GradingResult {
                    success: false,
                    error: Some("SyntaxError: invalid syntax".into()),
                    traceback: None,
                    tests: vec![],
                },
            )
            .await
            .unwrap();
        assert_eq!(entry.code(), "def f(:");
        assert_eq!(entry.score(), 0);
        assert!(!entry.completed());
        assert!(entry.last_result().is_some());
    }

    #[tokio::test]
    async fn custom_key_is_isolated() {
        let repo = Arc::new(InMemoryRepository::new());
        let mut scratch = ProgressStore::new(repo.clone()).with_key("scratch");
        scratch.record_code(&id("e1"), "x").await.unwrap();

        let default = ProgressStore::open(repo).await;
        assert!(default.progress().is_empty());
    }

    #[tokio::test]
    async fn failed_write_leaves_memory_matching_disk() {
        let repo = InMemoryRepository::new();
        let e1 = id("e1");
        let mut seeded = ProgressStore::new(Arc::new(repo.clone()));
        seeded.record_code(&e1, "v1").await.unwrap();

        let mut store = ProgressStore::open(Arc::new(ReadOnlyRepository(repo.clone()))).await;
        let err = store.record_code(&e1, "v2").await.unwrap_err();
        assert!(matches!(err, StorageError::Connection(_)));
        assert_eq!(store.get(&e1).unwrap().code(), "v1");

        let err = store
            .record_grading(
                &e1,
                "v3",
                GradingResult {
                    success: true,
                    error: None,
                    traceback: None,
                    tests: vec![test(true)],
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::Connection(_)));
        assert_eq!(store.get(&e1).unwrap().score(), 0);

        let persisted = ProgressStore::open(Arc::new(repo)).await;
        assert_eq!(store.progress(), persisted.progress());
    }
}
