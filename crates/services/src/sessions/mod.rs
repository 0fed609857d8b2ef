mod hints;
mod overview;
mod service;
mod state;

// Public API of the session subsystem.
pub use crate::error::SessionError;
pub use hints::HintPanel;
pub use overview::{CatalogOverview, CategoryOverview, CategoryScore, ExerciseOverview, ScoreBoard};
pub use service::{
    ExerciseSession, GradingOutcome, GradingReport, GradingRequest, LoadedExercise, RunTicket,
};
pub use state::SessionState;
