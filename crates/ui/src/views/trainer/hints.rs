use dioxus::prelude::*;
use services::HintPanel;

use crate::vm::TrainerIntent;

#[component]
pub(super) fn HintsPanel(hints: HintPanel, on_intent: EventHandler<TrainerIntent>) -> Element {
    let count = format!("{} of {} hints", hints.revealed().len(), hints.total());
    let toggle_label = if hints.is_visible() { "Hide hints" } else { "Show hints" };

    rsx! {
        section { class: "hints",
            div { class: "hints-controls",
                button {
                    class: "btn btn-secondary",
                    id: "hint-reveal",
                    r#type: "button",
                    disabled: !hints.can_reveal(),
                    onclick: move |_| on_intent.call(TrainerIntent::RevealHint),
                    "Reveal hint"
                }
                if hints.can_toggle() {
                    button {
                        class: "btn btn-ghost",
                        id: "hint-toggle",
                        r#type: "button",
                        onclick: move |_| on_intent.call(TrainerIntent::ToggleHints),
                        "{toggle_label}"
                    }
                }
                span { class: "hints-count", "{count}" }
            }
            if !hints.shown().is_empty() {
                ol { class: "hints-list",
                    for hint in hints.shown().iter() {
                        li { "{hint}" }
                    }
                }
            }
        }
    }
}
