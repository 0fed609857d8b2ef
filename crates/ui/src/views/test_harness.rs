use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use dioxus::core::NoOpMutations;
use dioxus::prelude::*;
use dioxus_router::{Routable, Router};
use reqwest::StatusCode;
use serde_json::json;
use services::{ApiError, AppServices, Submission, TrainerApi};
use storage::{ProgressStore, Storage};
use trainer_core::model::{Category, Exercise, ExerciseId, GradingResult};

use crate::context::{UiApp, build_app_context};
use crate::views::TrainerView;
use crate::views::trainer::TrainerTestHandles;
use crate::vm::TrainerIntent;

/// Three exercises in two categories: `e1` "Count up" (two hints) and
/// `e2` "Sum list" under basics, `e3` "Countdown" under loops.
#[derive(Default)]
pub struct FakeApi {
    categories: Vec<Category>,
    exercises: HashMap<String, Exercise>,
    offline: bool,
    runs: Mutex<VecDeque<GradingResult>>,
}

impl FakeApi {
    pub fn catalog() -> Self {
        let categories: Vec<Category> = serde_json::from_value(json!([
            {"name": "basics", "exercises": [
                {"id": "e1", "title": "Count up"},
                {"id": "e2", "title": "Sum list"}
            ]},
            {"name": "loops", "exercises": [{"id": "e3", "title": "Countdown"}]}
        ]))
        .unwrap();
        let exercises = [
            ("e1", "Count up", vec!["Start from zero.", "Use a loop."]),
            ("e2", "Sum list", vec![]),
            ("e3", "Countdown", vec![]),
        ]
        .into_iter()
        .map(|(raw, title, hints)| {
            let exercise: Exercise = serde_json::from_value(json!({
                "id": raw,
                "title": title,
                "description": "Write a function.\nReturn the result.",
                "template": format!("def {raw}():\n    pass"),
                "hints": hints
            }))
            .unwrap();
            (raw.to_string(), exercise)
        })
        .collect();
        Self {
            categories,
            exercises,
            ..Self::default()
        }
    }

    pub fn offline() -> Self {
        Self {
            offline: true,
            ..Self::default()
        }
    }

    pub fn respond(&self, result: GradingResult) {
        self.runs.lock().unwrap().push_back(result);
    }

    pub fn respond_all_passed(&self) {
        self.respond(grading(json!({
            "success": true,
            "tests": [{"passed": true, "input": [3], "expected": 3, "actual": 3}, {"passed": true}]
        })));
    }
}

#[async_trait]
impl TrainerApi for FakeApi {
    async fn categories(&self) -> Result<Vec<Category>, ApiError> {
        if self.offline {
            return Err(ApiError::HttpStatus(StatusCode::SERVICE_UNAVAILABLE));
        }
        Ok(self.categories.clone())
    }

    async fn exercise(&self, id: &ExerciseId) -> Result<Exercise, ApiError> {
        if self.offline {
            return Err(ApiError::HttpStatus(StatusCode::SERVICE_UNAVAILABLE));
        }
        self.exercises
            .get(id.as_str())
            .cloned()
            .ok_or(ApiError::HttpStatus(StatusCode::NOT_FOUND))
    }

    async fn run(&self, _submission: &Submission) -> Result<GradingResult, ApiError> {
        self.runs
            .lock()
            .unwrap()
            .pop_front()
            .ok_or(ApiError::HttpStatus(StatusCode::INTERNAL_SERVER_ERROR))
    }
}

pub fn grading(value: serde_json::Value) -> GradingResult {
    serde_json::from_value(value).unwrap()
}

pub fn exercise_id(raw: &str) -> ExerciseId {
    ExerciseId::new(raw).unwrap()
}

pub async fn fake_services(api: Arc<FakeApi>) -> AppServices {
    fake_services_with_storage(api, &Storage::in_memory()).await
}

pub async fn fake_services_with_storage(api: Arc<FakeApi>, storage: &Storage) -> AppServices {
    let progress = ProgressStore::open(Arc::clone(&storage.blobs)).await;
    AppServices::from_parts(api, progress)
}

#[derive(Clone)]
struct TestApp {
    services: AppServices,
    initial: Option<ExerciseId>,
}

impl UiApp for TestApp {
    fn services(&self) -> AppServices {
        self.services.clone()
    }

    fn initial_exercise(&self) -> Option<ExerciseId> {
        self.initial.clone()
    }
}

#[derive(Props, Clone)]
struct ViewHarnessProps {
    app: Arc<TestApp>,
    handles: TrainerTestHandles,
}

impl PartialEq for ViewHarnessProps {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

impl Eq for ViewHarnessProps {}

#[component]
fn ViewRouterHarness(props: ViewHarnessProps) -> Element {
    let app: Arc<dyn UiApp> = props.app.clone();
    use_context_provider(|| build_app_context(&app));
    use_context_provider(|| props.handles.clone());
    rsx! { Router::<TestRoute> {} }
}

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum TestRoute {
    #[route("/")]
    Root {},
}

#[component]
fn Root() -> Element {
    rsx! { TrainerView {} }
}

pub struct ViewHarness {
    pub dom: VirtualDom,
    pub storage: Storage,
    handles: TrainerTestHandles,
}

impl ViewHarness {
    pub fn rebuild(&mut self) {
        self.dom.rebuild_in_place();
        drive_dom(&mut self.dom);
    }

    pub async fn drive_async(&mut self) {
        let _ = tokio::time::timeout(
            std::time::Duration::from_millis(50),
            self.dom.wait_for_work(),
        )
        .await;
        self.dom.render_immediate(&mut NoOpMutations);
        self.dom.process_events();
    }

    /// Drive until spawned intents and resources have had time to finish.
    pub async fn settle(&mut self) {
        for _ in 0..8 {
            self.drive_async().await;
        }
    }

    pub fn dispatch(&self, intent: TrainerIntent) {
        let dispatch = self.handles.dispatch();
        self.dom.in_runtime(|| dispatch.call(intent));
    }

    pub fn render(&self) -> String {
        dioxus_ssr::render(&self.dom)
    }
}

pub fn drive_dom(dom: &mut VirtualDom) {
    dom.process_events();
    dom.render_immediate(&mut NoOpMutations);
    dom.process_events();
}

pub async fn setup_view_harness(api: Arc<FakeApi>, initial: Option<ExerciseId>) -> ViewHarness {
    setup_view_harness_with_storage(api, initial, Storage::in_memory()).await
}

pub async fn setup_view_harness_with_storage(
    api: Arc<FakeApi>,
    initial: Option<ExerciseId>,
    storage: Storage,
) -> ViewHarness {
    let services = fake_services_with_storage(api, &storage).await;
    let handles = TrainerTestHandles::default();
    let app = Arc::new(TestApp { services, initial });

    let dom = VirtualDom::new_with_props(
        ViewRouterHarness,
        ViewHarnessProps {
            app,
            handles: handles.clone(),
        },
    );

    ViewHarness {
        dom,
        storage,
        handles,
    }
}
