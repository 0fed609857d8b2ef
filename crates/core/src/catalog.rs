//! Flattened, ordered exercise index used for prev/next navigation.

use crate::model::{Category, ExerciseId, ExerciseSummary};

/// Every exercise of every category, in category order then exercise order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExerciseCatalog {
    entries: Vec<ExerciseSummary>,
}

impl ExerciseCatalog {
    /// Flatten categories in fetch order. No resorting happens here.
    #[must_use]
    pub fn build(categories: &[Category]) -> Self {
        let entries = categories
            .iter()
            .flat_map(|category| category.exercises.iter().cloned())
            .collect();
        Self { entries }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Position of `id` in the flattened sequence; `None` when absent.
    #[must_use]
    pub fn index_of(&self, id: &ExerciseId) -> Option<usize> {
        self.entries.iter().position(|entry| &entry.id == id)
    }

    #[must_use]
    pub fn at(&self, index: usize) -> Option<&ExerciseSummary> {
        self.entries.get(index)
    }

    /// False at position 0. Never wraps around.
    #[must_use]
    pub fn has_prev(&self, index: usize) -> bool {
        index > 0 && index < self.entries.len()
    }

    /// False at the last position. Never wraps around.
    #[must_use]
    pub fn has_next(&self, index: usize) -> bool {
        index + 1 < self.entries.len()
    }

    #[must_use]
    pub fn prev_id(&self, index: usize) -> Option<&ExerciseId> {
        if !self.has_prev(index) {
            return None;
        }
        self.entries.get(index - 1).map(|entry| &entry.id)
    }

    #[must_use]
    pub fn next_id(&self, index: usize) -> Option<&ExerciseId> {
        if !self.has_next(index) {
            return None;
        }
        self.entries.get(index + 1).map(|entry| &entry.id)
    }

    /// "Exercise i / n" style position, 1-based.
    #[must_use]
    pub fn position_label(&self, index: usize) -> String {
        format!("Exercise {} / {}", index + 1, self.entries.len())
    }

    pub fn iter(&self) -> impl Iterator<Item = &ExerciseSummary> {
        self.entries.iter()
    }
}
