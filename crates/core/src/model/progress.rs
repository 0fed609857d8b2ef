use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::model::grading::GradingResult;
use crate::model::ids::ExerciseId;
use crate::scoring;

/// Saved state for one exercise.
///
/// `score` and `completed` are only ever derived from a grading result, so
/// `completed` implies `score == 100`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ExerciseProgress {
    #[serde(default)]
    code: String,
    #[serde(default)]
    score: u8,
    #[serde(default)]
    completed: bool,
    #[serde(
        default,
        rename = "lastTestResults",
        skip_serializing_if = "Option::is_none"
    )]
    last_result: Option<GradingResult>,
}

impl ExerciseProgress {
    /// Fresh entry created by a first edit: score 0, not completed.
    #[must_use]
    pub fn with_code(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            ..Self::default()
        }
    }

    /// Full replacement entry after a grading.
    #[must_use]
    pub fn graded(code: impl Into<String>, result: GradingResult) -> Self {
        Self {
            code: code.into(),
            score: scoring::exercise_score(&result.tests),
            completed: result.is_completed(),
            last_result: Some(result),
        }
    }

    pub fn set_code(&mut self, code: impl Into<String>) {
        self.code = code.into();
    }

    #[must_use]
    pub fn code(&self) -> &str {
        &self.code
    }

    #[must_use]
    pub fn score(&self) -> u8 {
        self.score
    }

    #[must_use]
    pub fn completed(&self) -> bool {
        self.completed
    }

    #[must_use]
    pub fn last_result(&self) -> Option<&GradingResult> {
        self.last_result.as_ref()
    }

    #[must_use]
    pub fn status(&self) -> ExerciseStatus {
        ExerciseStatus::from_progress(Some(self))
    }
}

/// Badge shown next to an exercise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExerciseStatus {
    NotStarted,
    InProgress,
    Completed,
}

impl ExerciseStatus {
    #[must_use]
    pub fn from_progress(progress: Option<&ExerciseProgress>) -> Self {
        match progress {
            Some(entry) if entry.completed() => Self::Completed,
            Some(entry) if entry.score() > 0 => Self::InProgress,
            _ => Self::NotStarted,
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::NotStarted => "not started",
            Self::InProgress => "in progress",
            Self::Completed => "completed",
        }
    }
}

/// Mapping from exercise id to saved progress; serialized as one JSON object.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProgressMap(BTreeMap<ExerciseId, ExerciseProgress>);

impl ProgressMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, id: &ExerciseId) -> Option<&ExerciseProgress> {
        self.0.get(id)
    }

    /// Entry for `id`, created with defaults when absent.
    pub fn entry_mut(&mut self, id: &ExerciseId) -> &mut ExerciseProgress {
        self.0.entry(id.clone()).or_default()
    }

    pub fn insert(&mut self, id: ExerciseId, progress: ExerciseProgress) {
        self.0.insert(id, progress);
    }

    /// Stored score, 0 when no entry exists.
    #[must_use]
    pub fn score_of(&self, id: &ExerciseId) -> u8 {
        self.0.get(id).map_or(0, ExerciseProgress::score)
    }

    #[must_use]
    pub fn is_completed(&self, id: &ExerciseId) -> bool {
        self.0.get(id).is_some_and(ExerciseProgress::completed)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ExerciseId, &ExerciseProgress)> {
        self.0.iter()
    }
}
