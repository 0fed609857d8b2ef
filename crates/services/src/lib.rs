#![forbid(unsafe_code)]

pub mod api;
pub mod app_services;
pub mod error;
pub mod feedback;
pub mod sessions;

pub use api::{ApiConfig, HttpTrainerApi, Submission, TrainerApi, DEFAULT_API_URL};
pub use app_services::AppServices;
pub use error::{ApiError, AppServicesError, SessionError};
pub use feedback::{FeedbackBlock, FeedbackView};

pub use sessions::{
    CatalogOverview, ExerciseSession, GradingOutcome, GradingReport, GradingRequest, HintPanel,
    LoadedExercise, ScoreBoard, SessionState,
};
