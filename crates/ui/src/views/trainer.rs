use dioxus::prelude::*;

use crate::context::AppContext;
use crate::views::{ViewError, ViewState, view_state_from_resource};
use crate::vm::{TrainerIntent, TrainerSnapshot, TrainerUpdate, TrainerVm};

mod catalog;
mod feedback;
mod hints;
mod scores;

use catalog::CatalogSidebar;
use feedback::FeedbackPanel;
use hints::HintsPanel;
use scores::ScoreLine;

#[cfg(test)]
use std::cell::RefCell;
#[cfg(test)]
use std::rc::Rc;

#[component]
pub fn TrainerView() -> Element {
    let ctx = use_context::<AppContext>();

    let vm = use_signal(|| None::<TrainerVm>);
    let snapshot = use_signal(|| None::<TrainerSnapshot>);
    let error = use_signal(|| None::<ViewError>);

    let resource = use_resource(move || {
        let ctx = ctx.clone();
        let mut vm = vm;
        let mut snapshot = snapshot;
        let mut error = error;

        async move {
            let trainer = TrainerVm::new(ctx.services());
            let first = trainer.start(ctx.initial_exercise()).await?;
            vm.set(Some(trainer));
            snapshot.set(Some(first));
            error.set(None);
            Ok::<_, ViewError>(())
        }
    });
    let state = view_state_from_resource(&resource);

    let dispatch_intent = use_callback(move |intent: TrainerIntent| {
        let mut snapshot = snapshot;
        let mut error = error;
        let Some(trainer) = vm() else {
            return;
        };

        let mut show = move |update: TrainerUpdate| {
            snapshot.set(Some(update.snapshot));
            error.set(update.error);
        };

        match intent {
            TrainerIntent::Edit(code) => {
                // The textarea already shows the new code; only a failed save is reported back.
                if let Some(exercise) = snapshot
                    .write()
                    .as_mut()
                    .and_then(|view| view.exercise.as_mut())
                {
                    exercise.code.clone_from(&code);
                }
                spawn(async move {
                    let update = trainer.apply(TrainerIntent::Edit(code)).await;
                    error.set(update.error);
                });
            }
            TrainerIntent::Run => {
                spawn(async move {
                    let (started, request) = trainer.begin_run().await;
                    show(started);
                    let Some(request) = request else {
                        return;
                    };
                    show(trainer.complete_run(request).await);
                });
            }
            other => {
                spawn(async move {
                    show(trainer.apply(other).await);
                });
            }
        }
    });

    #[cfg(test)]
    {
        let mut registered = use_signal(|| false);
        if !registered() {
            registered.set(true);
            if let Some(handles) = try_consume_context::<TrainerTestHandles>() {
                handles.register(dispatch_intent);
            }
        }
    }

    rsx! {
        div { class: "page trainer-page",
            match state {
                ViewState::Idle => rsx! {
                    p { "Idle" }
                },
                ViewState::Loading => rsx! {
                    p { "Loading..." }
                },
                ViewState::Error(err) => rsx! {
                    p { "{err.message()}" }
                    button {
                        class: "btn btn-secondary",
                        r#type: "button",
                        onclick: move |_| {
                            let mut resource = resource;
                            resource.restart();
                        },
                        "Retry"
                    }
                },
                ViewState::Ready(()) => rsx! {
                    if let Some(view) = snapshot() {
                        TrainerBody { view, error: error(), on_intent: dispatch_intent }
                    }
                },
            }
        }
    }
}

#[component]
fn TrainerBody(
    view: TrainerSnapshot,
    error: Option<ViewError>,
    on_intent: EventHandler<TrainerIntent>,
) -> Element {
    let run_label = view.run_label();
    let state_label = view.state.label();

    rsx! {
        div { class: "trainer",
            CatalogSidebar { overview: view.overview.clone(), on_intent }
            section { class: "trainer-main",
                if let Some(err) = error {
                    p { class: "trainer-error", role: "alert", "{err.message()}" }
                }
                match view.exercise.clone() {
                    None => rsx! {
                        p { class: "trainer-empty", "No exercise loaded." }
                    },
                    Some(exercise) => rsx! {
                        header { class: "exercise-header",
                            h2 { class: "exercise-title", "{exercise.title}" }
                            if let Some(position) = exercise.position_label.clone() {
                                span { class: "exercise-position", "{position}" }
                            }
                            span {
                                class: "session-state session-state--{state_label}",
                                "{state_label}"
                            }
                        }
                        div { class: "exercise-description",
                            for line in exercise.description.iter() {
                                p { "{line}" }
                            }
                        }
                        textarea {
                            class: "exercise-editor",
                            id: "exercise-editor",
                            spellcheck: "false",
                            readonly: view.running,
                            value: "{exercise.code}",
                            oninput: move |evt: FormEvent| {
                                on_intent.call(TrainerIntent::Edit(evt.value()));
                            },
                        }
                        div { class: "exercise-controls",
                            button {
                                class: "btn btn-secondary",
                                id: "exercise-prev",
                                r#type: "button",
                                disabled: !view.has_prev,
                                onclick: move |_| on_intent.call(TrainerIntent::Prev),
                                "Previous"
                            }
                            button {
                                class: "btn btn-primary",
                                id: "exercise-run",
                                r#type: "button",
                                disabled: !view.can_run,
                                onclick: move |_| on_intent.call(TrainerIntent::Run),
                                "{run_label}"
                            }
                            button {
                                class: "btn btn-secondary",
                                id: "exercise-next",
                                r#type: "button",
                                disabled: !view.has_next,
                                onclick: move |_| on_intent.call(TrainerIntent::Next),
                                "Next"
                            }
                        }
                        if exercise.has_hints {
                            HintsPanel { hints: exercise.hints.clone(), on_intent }
                        }
                        if let Some(scores) = view.scores.clone() {
                            ScoreLine { scores }
                        }
                        if let Some(feedback) = exercise.feedback.clone() {
                            FeedbackPanel { feedback }
                        }
                    },
                }
            }
        }
    }
}

#[cfg(test)]
#[derive(Clone, Default)]
pub(crate) struct TrainerTestHandles {
    dispatch: Rc<RefCell<Option<Callback<TrainerIntent>>>>,
}

#[cfg(test)]
impl TrainerTestHandles {
    pub(crate) fn register(&self, dispatch: Callback<TrainerIntent>) {
        *self.dispatch.borrow_mut() = Some(dispatch);
    }

    pub(crate) fn dispatch(&self) -> Callback<TrainerIntent> {
        (*self.dispatch.borrow()).expect("trainer dispatch registered")
    }
}
