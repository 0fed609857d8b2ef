mod exercise;
mod grading;
mod ids;
mod progress;

pub use ids::{ExerciseId, IdError};

pub use exercise::{Category, Exercise, ExerciseSummary};
pub use grading::{GradingResult, TestResult};
pub use progress::{ExerciseProgress, ExerciseStatus, ProgressMap};
