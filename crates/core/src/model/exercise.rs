use serde::{Deserialize, Serialize};

use crate::model::ids::ExerciseId;

/// A single coding challenge as served by `GET exercise(id)`.
///
/// Immutable once fetched; the session keeps its own copy for the loaded exercise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exercise {
    pub id: ExerciseId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub template: String,
    #[serde(default)]
    pub hints: Vec<String>,
}

impl Exercise {
    /// Description split on its embedded line breaks, ready for display.
    pub fn description_lines(&self) -> impl Iterator<Item = &str> {
        self.description.lines()
    }

    #[must_use]
    pub fn has_hints(&self) -> bool {
        !self.hints.is_empty()
    }
}

/// Listing entry for an exercise inside a category.
///
/// The categories endpoint may carry more fields; only id and title are kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExerciseSummary {
    pub id: ExerciseId,
    pub title: String,
}

/// Named, ordered grouping of exercises.
///
/// Order is significant: it drives navigation and aggregate scoring.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub name: String,
    #[serde(default)]
    pub exercises: Vec<ExerciseSummary>,
}
