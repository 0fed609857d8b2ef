use trainer_core::model::{Category, ExerciseId, ExerciseStatus, ProgressMap};
use trainer_core::scoring;

/// Aggregate score line for one category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryScore {
    pub name: String,
    pub score: u8,
    pub completed: usize,
    pub total: usize,
}

impl CategoryScore {
    #[must_use]
    pub fn compute(category: &Category, progress: &ProgressMap) -> Self {
        Self {
            name: category.name.clone(),
            score: scoring::category_score(category, progress),
            completed: scoring::completed_count(category, progress),
            total: category.exercises.len(),
        }
    }
}

/// Scores to refresh after a grading or a load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreBoard {
    pub exercise: u8,
    pub status: ExerciseStatus,
    /// Category holding the loaded exercise, when it is part of the catalog.
    pub category: Option<CategoryScore>,
    pub global: u8,
}

impl ScoreBoard {
    #[must_use]
    pub fn compute(categories: &[Category], progress: &ProgressMap, current: &ExerciseId) -> Self {
        let category = categories
            .iter()
            .find(|category| category.exercises.iter().any(|e| &e.id == current))
            .map(|category| CategoryScore::compute(category, progress));
        Self {
            exercise: progress.score_of(current),
            status: ExerciseStatus::from_progress(progress.get(current)),
            category,
            global: scoring::global_score(categories, progress),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExerciseOverview {
    pub id: ExerciseId,
    pub title: String,
    pub score: u8,
    pub completed: bool,
    pub current: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryOverview {
    pub score: CategoryScore,
    /// Only the first category starts expanded.
    pub expanded: bool,
    pub exercises: Vec<ExerciseOverview>,
}

/// Listing of every category and exercise with their scores.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogOverview {
    pub categories: Vec<CategoryOverview>,
    pub global_score: u8,
}

impl CatalogOverview {
    #[must_use]
    pub fn build(
        categories: &[Category],
        progress: &ProgressMap,
        current: Option<&ExerciseId>,
    ) -> Self {
        let items = categories
            .iter()
            .enumerate()
            .map(|(index, category)| CategoryOverview {
                score: CategoryScore::compute(category, progress),
                expanded: index == 0,
                exercises: category
                    .exercises
                    .iter()
                    .map(|exercise| ExerciseOverview {
                        id: exercise.id.clone(),
                        title: exercise.title.clone(),
                        score: progress.score_of(&exercise.id),
                        completed: progress.is_completed(&exercise.id),
                        current: current == Some(&exercise.id),
                    })
                    .collect(),
            })
            .collect();

        Self {
            categories: items,
            global_score: scoring::global_score(categories, progress),
        }
    }
}
