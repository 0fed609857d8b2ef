use std::env;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use tracing::debug;
use trainer_core::model::{Category, Exercise, ExerciseId, GradingResult};

use crate::error::ApiError;

/// Default address of the exercise/grading service.
pub const DEFAULT_API_URL: &str = "http://localhost:8000";

#[derive(Clone, Debug)]
pub struct ApiConfig {
    pub base_url: String,
}

impl ApiConfig {
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    /// Reads `TRAINER_API_URL`, falling back to [`DEFAULT_API_URL`].
    #[must_use]
    pub fn from_env() -> Self {
        let base_url = env::var("TRAINER_API_URL")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.into());
        Self { base_url }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/api/{path}", self.base_url.trim_end_matches('/'))
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self::new(DEFAULT_API_URL)
    }
}

/// Body of `POST run`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Submission {
    pub code: String,
    pub exercise_id: ExerciseId,
}

/// Remote collaborator serving the catalog, exercise definitions and grading.
#[async_trait]
pub trait TrainerApi: Send + Sync {
    /// Fetch every category with its exercise listing, in display order.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` for transport, status or decode failures.
    async fn categories(&self) -> Result<Vec<Category>, ApiError>;

    /// Fetch the full definition of one exercise.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` for transport, status or decode failures.
    async fn exercise(&self, id: &ExerciseId) -> Result<Exercise, ApiError>;

    /// Submit code for grading.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` for transport, status or decode failures. A graded
    /// submission with a global error is still `Ok`.
    async fn run(&self, submission: &Submission) -> Result<GradingResult, ApiError>;
}

/// `TrainerApi` over HTTP/JSON.
#[derive(Clone)]
pub struct HttpTrainerApi {
    client: Client,
    config: ApiConfig,
}

impl HttpTrainerApi {
    #[must_use]
    pub fn new(config: ApiConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    async fn decode<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ApiError> {
        if !response.status().is_success() {
            return Err(ApiError::HttpStatus(response.status()));
        }
        Ok(response.json().await?)
    }
}

#[async_trait]
impl TrainerApi for HttpTrainerApi {
    async fn categories(&self) -> Result<Vec<Category>, ApiError> {
        let url = self.config.endpoint("categories");
        debug!(%url, "fetching categories");
        let response = self.client.get(url).send().await?;
        Self::decode(response).await
    }

    async fn exercise(&self, id: &ExerciseId) -> Result<Exercise, ApiError> {
        let url = self.config.endpoint(&format!("exercise/{id}"));
        debug!(%url, "fetching exercise");
        let response = self.client.get(url).send().await?;
        Self::decode(response).await
    }

    async fn run(&self, submission: &Submission) -> Result<GradingResult, ApiError> {
        let url = self.config.endpoint("run");
        debug!(%url, exercise = %submission.exercise_id, code_len = submission.code.len(), "submitting code");
        let response = self.client.post(url).json(submission).send().await?;
        Self::decode(response).await
    }
}
