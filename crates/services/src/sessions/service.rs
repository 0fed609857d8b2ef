use std::sync::Arc;

use storage::ProgressStore;
use tracing::{debug, error, info, warn};
use trainer_core::ExerciseCatalog;
use trainer_core::model::{Category, Exercise, ExerciseId, ExerciseProgress, GradingResult};

use super::hints::HintPanel;
use super::overview::{CatalogOverview, ScoreBoard};
use super::state::SessionState;
use crate::api::{Submission, TrainerApi};
use crate::error::{ApiError, SessionError};
use crate::feedback::{self, FeedbackView};

//
// ─── LOADED EXERCISE ───────────────────────────────────────────────────────────
//

/// Exercise currently shown, with its editor buffer and panels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedExercise {
    exercise: Exercise,
    code: String,
    position: Option<usize>,
    hints: HintPanel,
    feedback: Option<FeedbackView>,
}

impl LoadedExercise {
    #[must_use]
    pub fn exercise(&self) -> &Exercise {
        &self.exercise
    }

    #[must_use]
    pub fn id(&self) -> &ExerciseId {
        &self.exercise.id
    }

    /// Editor buffer.
    #[must_use]
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Index in the flattened catalog, when the exercise is listed there.
    #[must_use]
    pub fn position(&self) -> Option<usize> {
        self.position
    }

    #[must_use]
    pub fn hints(&self) -> &HintPanel {
        &self.hints
    }

    /// Rendered results; `None` keeps the results area hidden.
    #[must_use]
    pub fn feedback(&self) -> Option<&FeedbackView> {
        self.feedback.as_ref()
    }
}

//
// ─── GRADING ───────────────────────────────────────────────────────────────────
//

/// Identifies one submission so its response can be matched on return.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunTicket(u64);

/// A submission taken from the session, to be sent to the grading service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GradingRequest {
    pub ticket: RunTicket,
    pub submission: Submission,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GradingReport {
    pub feedback: FeedbackView,
    pub scores: ScoreBoard,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GradingOutcome {
    Applied(GradingReport),
    /// The response belonged to an exercise that is no longer loaded.
    Discarded,
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// Single-owner controller for the trainer: catalog, loaded exercise, hints,
/// grading and persisted progress.
///
/// At most one grading request is outstanding at a time. Navigation stays
/// allowed while it runs; its response is applied only if the same exercise is
/// still loaded when it arrives.
pub struct ExerciseSession {
    api: Arc<dyn TrainerApi>,
    progress: ProgressStore,
    categories: Vec<Category>,
    catalog: ExerciseCatalog,
    state: SessionState,
    current: Option<LoadedExercise>,
    in_flight: Option<RunTicket>,
    next_ticket: u64,
}

impl ExerciseSession {
    #[must_use]
    pub fn new(api: Arc<dyn TrainerApi>, progress: ProgressStore) -> Self {
        Self {
            api,
            progress,
            categories: Vec::new(),
            catalog: ExerciseCatalog::default(),
            state: SessionState::Idle,
            current: None,
            in_flight: None,
            next_ticket: 1,
        }
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state
    }

    #[must_use]
    pub fn current(&self) -> Option<&LoadedExercise> {
        self.current.as_ref()
    }

    #[must_use]
    pub fn catalog(&self) -> &ExerciseCatalog {
        &self.catalog
    }

    #[must_use]
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    #[must_use]
    pub fn progress(&self) -> &ProgressStore {
        &self.progress
    }

    /// Whether the run control is enabled.
    #[must_use]
    pub fn can_run(&self) -> bool {
        self.current.is_some() && self.in_flight.is_none() && self.state.can_run()
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Fetch the category listing and rebuild the navigation index.
    ///
    /// On failure the previous catalog is kept.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Api` if the categories cannot be fetched.
    pub async fn load_catalog(&mut self) -> Result<&ExerciseCatalog, SessionError> {
        let categories = match self.api.categories().await {
            Ok(categories) => categories,
            Err(err) => {
                error!(error = %err, "failed to load categories");
                return Err(err.into());
            }
        };

        self.catalog = ExerciseCatalog::build(&categories);
        self.categories = categories;
        if let Some(current) = self.current.as_mut() {
            current.position = self.catalog.index_of(&current.exercise.id);
        }
        info!(
            categories = self.categories.len(),
            exercises = self.catalog.len(),
            "catalog loaded"
        );
        Ok(&self.catalog)
    }

    /// Fetch an exercise and make it the loaded one.
    ///
    /// The editor gets the saved code when there is some, else the template.
    /// Hints restart from zero and the last saved grading, if any, is rendered.
    /// On failure the session keeps whatever it showed before.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Api` if the exercise cannot be fetched.
    pub async fn load_exercise(
        &mut self,
        id: &ExerciseId,
    ) -> Result<&LoadedExercise, SessionError> {
        let exercise = match self.api.exercise(id).await {
            Ok(exercise) => exercise,
            Err(err) => {
                error!(exercise = %id, error = %err, "failed to load exercise");
                return Err(err.into());
            }
        };

        let saved = self.progress.get(&exercise.id);
        let code = saved
            .map(ExerciseProgress::code)
            .filter(|code| !code.is_empty())
            .unwrap_or(exercise.template.as_str())
            .to_owned();
        let feedback = saved
            .and_then(ExerciseProgress::last_result)
            .map(feedback::render);
        let position = self.catalog.index_of(&exercise.id);
        let hints = HintPanel::new(exercise.hints.clone());

        info!(
            exercise = %exercise.id,
            position = ?position,
            restored_results = feedback.is_some(),
            "exercise loaded"
        );
        self.state = SessionState::Loaded;
        Ok(&*self.current.insert(LoadedExercise {
            exercise,
            code,
            position,
            hints,
            feedback,
        }))
    }

    /// Replace the editor buffer and save it right away.
    ///
    /// The buffer keeps the new code even when saving fails; saved progress
    /// then still holds the previous code.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Busy` while grading, `SessionError::NoExercise`
    /// with nothing loaded, or `SessionError::Storage` if saving fails.
    pub async fn edit(&mut self, code: impl Into<String>) -> Result<(), SessionError> {
        if !self.state.can_edit() {
            return Err(SessionError::Busy);
        }
        let current = self.current.as_mut().ok_or(SessionError::NoExercise)?;
        current.code = code.into();
        self.progress
            .record_code(&current.exercise.id, &current.code)
            .await?;
        Ok(())
    }

    /// Take the loaded code as a submission and enter `Running`.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Busy` if a request is already outstanding and
    /// `SessionError::NoExercise` if nothing is loaded.
    pub fn begin_run(&mut self) -> Result<GradingRequest, SessionError> {
        if self.in_flight.is_some() || self.state == SessionState::Running {
            return Err(SessionError::Busy);
        }
        let current = self.current.as_ref().ok_or(SessionError::NoExercise)?;
        if !self.state.can_run() {
            return Err(SessionError::NoExercise);
        }

        let ticket = RunTicket(self.next_ticket);
        self.next_ticket += 1;
        let request = GradingRequest {
            ticket,
            submission: Submission {
                code: current.code.clone(),
                exercise_id: current.exercise.id.clone(),
            },
        };

        self.in_flight = Some(ticket);
        self.state = SessionState::Running;
        debug!(exercise = %request.submission.exercise_id, ticket = ticket.0, "grading started");
        Ok(request)
    }

    /// Apply the response to a request from [`ExerciseSession::begin_run`].
    ///
    /// A response for an exercise that is no longer loaded is dropped. A
    /// transport failure puts the session back in `Loaded` without touching
    /// saved progress.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Grading` on transport failure and
    /// `SessionError::Storage` if the graded state cannot be saved. Either way
    /// the session goes back to `Loaded` and the results area is unchanged.
    pub async fn finish_run(
        &mut self,
        request: GradingRequest,
        response: Result<GradingResult, ApiError>,
    ) -> Result<GradingOutcome, SessionError> {
        if self.in_flight != Some(request.ticket) {
            warn!(ticket = request.ticket.0, "dropping response for unknown grading request");
            return Ok(GradingOutcome::Discarded);
        }
        self.in_flight = None;

        let exercise_id = request.submission.exercise_id;
        let Some(current) = self
            .current
            .as_mut()
            .filter(|current| current.exercise.id == exercise_id)
        else {
            warn!(exercise = %exercise_id, "exercise changed while grading; response discarded");
            return Ok(GradingOutcome::Discarded);
        };

        let result = match response {
            Ok(result) => result,
            Err(err) => {
                error!(exercise = %exercise_id, error = %err, "grading request failed");
                self.state = SessionState::Loaded;
                return Err(SessionError::Grading(err));
            }
        };

        let view = feedback::render(&result);
        if let Err(err) = self
            .progress
            .record_grading(&exercise_id, &request.submission.code, result)
            .await
        {
            error!(exercise = %exercise_id, error = %err, "grading could not be saved");
            self.state = SessionState::Loaded;
            return Err(err.into());
        }
        self.state = SessionState::Graded;
        current.feedback = Some(view.clone());
        let scores = ScoreBoard::compute(&self.categories, self.progress.progress(), &exercise_id);
        info!(
            exercise = %exercise_id,
            score = scores.exercise,
            global = scores.global,
            "grading applied"
        );
        Ok(GradingOutcome::Applied(GradingReport {
            feedback: view,
            scores,
        }))
    }

    /// Submit the loaded code and wait for the grading.
    ///
    /// # Errors
    ///
    /// See [`ExerciseSession::begin_run`] and [`ExerciseSession::finish_run`].
    pub async fn run_code(&mut self) -> Result<GradingOutcome, SessionError> {
        let request = self.begin_run()?;
        let response = self.api.run(&request.submission).await;
        self.finish_run(request, response).await
    }

    #[must_use]
    pub fn has_prev(&self) -> bool {
        self.position()
            .is_some_and(|index| self.catalog.has_prev(index))
    }

    #[must_use]
    pub fn has_next(&self) -> bool {
        self.position()
            .is_some_and(|index| self.catalog.has_next(index))
    }

    /// Load the previous exercise. Returns `false` (and does nothing) at the start.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Api` if the neighbour cannot be fetched.
    pub async fn navigate_prev(&mut self) -> Result<bool, SessionError> {
        let Some(target) = self
            .position()
            .and_then(|index| self.catalog.prev_id(index))
            .cloned()
        else {
            return Ok(false);
        };
        self.load_exercise(&target).await?;
        Ok(true)
    }

    /// Load the next exercise. Returns `false` (and does nothing) at the end.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Api` if the neighbour cannot be fetched.
    pub async fn navigate_next(&mut self) -> Result<bool, SessionError> {
        let Some(target) = self
            .position()
            .and_then(|index| self.catalog.next_id(index))
            .cloned()
        else {
            return Ok(false);
        };
        self.load_exercise(&target).await?;
        Ok(true)
    }

    /// Reveal the next hint of the loaded exercise.
    pub fn reveal_hint(&mut self) -> Option<&str> {
        self.current.as_mut()?.hints.reveal_next()
    }

    /// Fold or unfold the revealed hints. Returns the new visibility.
    pub fn toggle_hints(&mut self) -> Option<bool> {
        self.current.as_mut().map(|current| current.hints.toggle())
    }

    /// "Exercise i / n" for the loaded exercise.
    #[must_use]
    pub fn position_label(&self) -> Option<String> {
        self.position()
            .map(|index| self.catalog.position_label(index))
    }

    #[must_use]
    pub fn scoreboard(&self) -> Option<ScoreBoard> {
        let current = self.current.as_ref()?;
        Some(ScoreBoard::compute(
            &self.categories,
            self.progress.progress(),
            &current.exercise.id,
        ))
    }

    #[must_use]
    pub fn overview(&self) -> CatalogOverview {
        CatalogOverview::build(
            &self.categories,
            self.progress.progress(),
            self.current.as_ref().map(LoadedExercise::id),
        )
    }

    fn position(&self) -> Option<usize> {
        self.current.as_ref()?.position
    }
}
