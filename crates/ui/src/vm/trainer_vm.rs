use std::sync::Arc;

use services::{
    AppServices, CatalogOverview, ExerciseSession, GradingRequest, HintPanel, ScoreBoard,
    SessionError, SessionState, TrainerApi,
};
use tokio::sync::Mutex;
use trainer_core::model::ExerciseId;

use super::feedback_vm::{FeedbackVm, map_feedback};
use crate::views::ViewError;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TrainerIntent {
    Open(ExerciseId),
    Prev,
    Next,
    Edit(String),
    Run,
    RevealHint,
    ToggleHints,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExerciseVm {
    pub id: ExerciseId,
    pub title: String,
    pub description: Vec<String>,
    pub code: String,
    pub position_label: Option<String>,
    pub has_hints: bool,
    pub hints: HintPanel,
    pub feedback: Option<FeedbackVm>,
}

/// Everything the trainer page renders, captured from the session in one go.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TrainerSnapshot {
    pub exercise: Option<ExerciseVm>,
    pub overview: CatalogOverview,
    pub scores: Option<ScoreBoard>,
    pub state: SessionState,
    pub can_run: bool,
    pub running: bool,
    pub has_prev: bool,
    pub has_next: bool,
}

impl TrainerSnapshot {
    fn capture(session: &ExerciseSession) -> Self {
        let exercise = session.current().map(|loaded| {
            let exercise = loaded.exercise();
            ExerciseVm {
                id: exercise.id.clone(),
                title: exercise.title.clone(),
                description: exercise.description_lines().map(str::to_owned).collect(),
                code: loaded.code().to_owned(),
                position_label: session.position_label(),
                has_hints: exercise.has_hints(),
                hints: loaded.hints().clone(),
                feedback: loaded.feedback().map(map_feedback),
            }
        });
        Self {
            exercise,
            overview: session.overview(),
            scores: session.scoreboard(),
            state: session.state(),
            can_run: session.can_run(),
            running: session.is_running(),
            has_prev: session.has_prev(),
            has_next: session.has_next(),
        }
    }

    #[must_use]
    pub fn run_label(&self) -> &'static str {
        if self.running { "Running..." } else { "Run" }
    }
}

/// Snapshot after an intent, plus the error to surface if it failed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TrainerUpdate {
    pub snapshot: TrainerSnapshot,
    pub error: Option<ViewError>,
}

/// Shared handle on the trainer session.
///
/// Intents lock the session one at a time. The grading request itself runs
/// without the lock, so the learner can keep navigating while it is out.
#[derive(Clone)]
pub struct TrainerVm {
    session: Arc<Mutex<ExerciseSession>>,
    api: Arc<dyn TrainerApi>,
}

impl TrainerVm {
    #[must_use]
    pub fn new(services: &AppServices) -> Self {
        Self {
            session: Arc::new(Mutex::new(services.session())),
            api: services.api(),
        }
    }

    /// Load the catalog, then open `initial` or the first listed exercise.
    ///
    /// A catalog failure is tolerated when there is still something to open.
    ///
    /// # Errors
    ///
    /// Returns a `ViewError` when nothing could be opened because of a
    /// service failure.
    pub async fn start(&self, initial: Option<ExerciseId>) -> Result<TrainerSnapshot, ViewError> {
        let mut session = self.session.lock().await;
        let catalog = session.load_catalog().await.map(|_| ());
        let target = initial.or_else(|| session.catalog().at(0).map(|entry| entry.id.clone()));

        match (target, catalog) {
            (Some(target), _) => {
                session.load_exercise(&target).await.map_err(view_error)?;
            }
            (None, Err(err)) => return Err(view_error(err)),
            (None, Ok(())) => {}
        }
        Ok(TrainerSnapshot::capture(&session))
    }

    /// Apply every intent except [`TrainerIntent::Run`], which goes through
    /// [`TrainerVm::begin_run`] and [`TrainerVm::complete_run`].
    pub async fn apply(&self, intent: TrainerIntent) -> TrainerUpdate {
        let mut session = self.session.lock().await;
        let result = match intent {
            TrainerIntent::Open(id) => session.load_exercise(&id).await.map(|_| ()),
            TrainerIntent::Prev => session.navigate_prev().await.map(|_| ()),
            TrainerIntent::Next => session.navigate_next().await.map(|_| ()),
            TrainerIntent::Edit(code) => session.edit(code).await,
            TrainerIntent::RevealHint => {
                session.reveal_hint();
                Ok(())
            }
            TrainerIntent::ToggleHints => {
                session.toggle_hints();
                Ok(())
            }
            TrainerIntent::Run => Err(SessionError::Busy),
        };
        update(&session, result)
    }

    /// Take the submission and switch the run control to its running label.
    pub async fn begin_run(&self) -> (TrainerUpdate, Option<GradingRequest>) {
        let mut session = self.session.lock().await;
        match session.begin_run() {
            Ok(request) => (update(&session, Ok(())), Some(request)),
            Err(err) => (update(&session, Err(err)), None),
        }
    }

    /// Send the submission and apply the response, unless the learner has
    /// moved to another exercise in the meantime.
    pub async fn complete_run(&self, request: GradingRequest) -> TrainerUpdate {
        let response = self.api.run(&request.submission).await;
        let mut session = self.session.lock().await;
        let result = session.finish_run(request, response).await.map(|_| ());
        update(&session, result)
    }
}

fn update(session: &ExerciseSession, result: Result<(), SessionError>) -> TrainerUpdate {
    TrainerUpdate {
        snapshot: TrainerSnapshot::capture(session),
        error: result.err().map(view_error),
    }
}

fn view_error(err: SessionError) -> ViewError {
    match err {
        SessionError::Api(_) | SessionError::Grading(_) => ViewError::Offline,
        SessionError::Storage(_) => ViewError::NotSaved,
        SessionError::Busy => ViewError::Busy,
        _ => ViewError::Unknown,
    }
}
