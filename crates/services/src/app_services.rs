use std::sync::Arc;

use storage::{ProgressStore, Storage};
use tracing::info;

use crate::api::{ApiConfig, HttpTrainerApi, TrainerApi};
use crate::error::AppServicesError;
use crate::sessions::ExerciseSession;

/// Assembles the app-facing collaborators: progress storage and the remote API.
#[derive(Clone)]
pub struct AppServices {
    api: Arc<dyn TrainerApi>,
    progress: ProgressStore,
}

impl AppServices {
    /// Build services backed by `SQLite` storage and the HTTP API.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization fails.
    pub async fn new_sqlite(db_url: &str, api: ApiConfig) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        let progress = ProgressStore::open(Arc::clone(&storage.blobs)).await;
        info!(
            api = %api.base_url,
            saved_exercises = progress.progress().len(),
            "services ready"
        );
        Ok(Self::from_parts(Arc::new(HttpTrainerApi::new(api)), progress))
    }

    #[must_use]
    pub fn from_parts(api: Arc<dyn TrainerApi>, progress: ProgressStore) -> Self {
        Self { api, progress }
    }

    #[must_use]
    pub fn api(&self) -> Arc<dyn TrainerApi> {
        Arc::clone(&self.api)
    }

    #[must_use]
    pub fn progress(&self) -> &ProgressStore {
        &self.progress
    }

    /// Fresh session over the saved progress. Nothing is fetched yet.
    #[must_use]
    pub fn session(&self) -> ExerciseSession {
        ExerciseSession::new(self.api(), self.progress.clone())
    }
}
