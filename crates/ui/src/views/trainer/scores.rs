use dioxus::prelude::*;
use services::ScoreBoard;

#[component]
pub(super) fn ScoreLine(scores: ScoreBoard) -> Element {
    let status = scores.status.label();

    rsx! {
        div { class: "scores",
            span { class: "scores-item", "Exercise: {scores.exercise}%" }
            span { class: "scores-item scores-status", "{status}" }
            if let Some(category) = scores.category.clone() {
                span { class: "scores-item",
                    "{category.name}: {category.score}% ({category.completed}/{category.total})"
                }
            }
            span { class: "scores-item", "Global: {scores.global}%" }
        }
    }
}
