use std::sync::Arc;

use services::AppServices;
use trainer_core::model::ExerciseId;

pub trait UiApp: Send + Sync {
    fn services(&self) -> AppServices;

    /// Exercise to open on launch; `None` opens the first one in the catalog.
    fn initial_exercise(&self) -> Option<ExerciseId>;
}

#[derive(Clone)]
pub struct AppContext {
    services: AppServices,
    initial_exercise: Option<ExerciseId>,
}

impl AppContext {
    #[must_use]
    pub fn new(app: &Arc<dyn UiApp>) -> Self {
        Self {
            services: app.services(),
            initial_exercise: app.initial_exercise(),
        }
    }

    #[must_use]
    pub fn services(&self) -> &AppServices {
        &self.services
    }

    #[must_use]
    pub fn initial_exercise(&self) -> Option<ExerciseId> {
        self.initial_exercise.clone()
    }
}

// Provided by the composition root in `crates/app`.

/// Build an `AppContext` from a UI-facing app implementation.
#[must_use]
pub fn build_app_context(app: &Arc<dyn UiApp>) -> AppContext {
    AppContext::new(app)
}
