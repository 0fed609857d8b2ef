use dioxus::prelude::*;
use services::CatalogOverview;
use services::sessions::{CategoryOverview, ExerciseOverview};

use crate::vm::TrainerIntent;

#[component]
pub(super) fn CatalogSidebar(
    overview: CatalogOverview,
    on_intent: EventHandler<TrainerIntent>,
) -> Element {
    rsx! {
        nav { class: "catalog",
            p { class: "catalog-global", "Global score: {overview.global_score}%" }
            if overview.categories.is_empty() {
                p { class: "catalog-empty", "No exercises listed." }
            }
            for category in overview.categories.iter() {
                CategoryGroup { category: category.clone(), on_intent }
            }
        }
    }
}

#[component]
fn CategoryGroup(category: CategoryOverview, on_intent: EventHandler<TrainerIntent>) -> Element {
    // The category holding the current exercise stays open.
    let open = category.expanded || category.exercises.iter().any(|exercise| exercise.current);
    let score = &category.score;

    rsx! {
        details { class: "catalog-category", open: open,
            summary {
                span { class: "catalog-category__name", "{score.name}" }
                span { class: "catalog-category__score",
                    "{score.score}% ({score.completed}/{score.total})"
                }
            }
            ul {
                for exercise in category.exercises.iter() {
                    ExerciseLink { entry: exercise.clone(), on_intent }
                }
            }
        }
    }
}

#[component]
fn ExerciseLink(entry: ExerciseOverview, on_intent: EventHandler<TrainerIntent>) -> Element {
    let class = if entry.current {
        "catalog-exercise catalog-exercise--current"
    } else {
        "catalog-exercise"
    };
    let mark = if entry.completed { "done" } else { "open" };
    let id = entry.id.clone();

    rsx! {
        li { class: "{class}",
            button {
                r#type: "button",
                onclick: move |_| on_intent.call(TrainerIntent::Open(id.clone())),
                span { class: "catalog-mark catalog-mark--{mark}" }
                span { class: "catalog-exercise__title", "{entry.title}" }
                span { class: "catalog-exercise__score", "{entry.score}%" }
            }
        }
    }
}
