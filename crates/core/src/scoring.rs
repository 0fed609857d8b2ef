//! Score arithmetic over test results and stored progress.
//!
//! All percentages are integers in `0..=100`, rounded half-up. The rounding is
//! done in integer arithmetic so `12.5` always becomes `13`.

use crate::model::{Category, ProgressMap, TestResult};

//
// ─── EXERCISE ──────────────────────────────────────────────────────────────────
//

/// Percentage of passing tests, rounded to the nearest integer.
///
/// Returns 0 for an empty list.
///
/// # Examples
///
/// ```
/// # use trainer_core::model::TestResult;
/// # use trainer_core::scoring::exercise_score;
/// let test = |passed| TestResult {
///     passed,
///     hidden: false,
///     description: None,
///     input: None,
///     expected: None,
///     actual: None,
///     error: None,
/// };
/// assert_eq!(exercise_score(&[]), 0);
/// assert_eq!(exercise_score(&[test(true)]), 100);
/// assert_eq!(exercise_score(&[test(true), test(false)]), 50);
/// ```
#[must_use]
pub fn exercise_score(tests: &[TestResult]) -> u8 {
    let passed = tests.iter().filter(|test| test.passed).count() as u64;
    rounded_mean(passed * 100, tests.len() as u64)
}

//
// ─── AGGREGATES ────────────────────────────────────────────────────────────────
//

/// Mean stored score over the category's exercises (missing entries count as 0).
///
/// Returns 0 for a category without exercises.
#[must_use]
pub fn category_score(category: &Category, progress: &ProgressMap) -> u8 {
    let total: u64 = category
        .exercises
        .iter()
        .map(|exercise| u64::from(progress.score_of(&exercise.id)))
        .sum();
    rounded_mean(total, category.exercises.len() as u64)
}

/// Mean stored score over every exercise of every category.
///
/// Exercises are flattened first, so a large category weighs more than a small
/// one. Returns 0 when there are no exercises at all.
#[must_use]
pub fn global_score(categories: &[Category], progress: &ProgressMap) -> u8 {
    let (total, count) = categories
        .iter()
        .flat_map(|category| category.exercises.iter())
        .fold((0_u64, 0_u64), |(total, count), exercise| {
            (total + u64::from(progress.score_of(&exercise.id)), count + 1)
        });
    rounded_mean(total, count)
}

/// Number of completed exercises in a category.
#[must_use]
pub fn completed_count(category: &Category, progress: &ProgressMap) -> usize {
    category
        .exercises
        .iter()
        .filter(|exercise| progress.is_completed(&exercise.id))
        .count()
}

/// `round_half_up(total / count)`, clamped to a percentage; 0 when `count == 0`.
fn rounded_mean(total: u64, count: u64) -> u8 {
    if count == 0 {
        return 0;
    }
    let rounded = (2 * total + count) / (2 * count);
    u8::try_from(rounded.min(100)).unwrap_or(100)
}
