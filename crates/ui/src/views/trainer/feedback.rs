use dioxus::prelude::*;

use crate::vm::{FeedbackItemVm, FeedbackVm, TestRowVm};

#[component]
pub(super) fn FeedbackPanel(feedback: FeedbackVm) -> Element {
    rsx! {
        section { class: "feedback", id: "feedback",
            if let Some(summary) = feedback.summary.clone() {
                p { class: "feedback-summary", "{summary}" }
            }
            for item in feedback.items.iter() {
                match item.clone() {
                    FeedbackItemVm::Banner(text) => rsx! {
                        div { class: "feedback-banner", role: "status", "{text}" }
                    },
                    FeedbackItemVm::Error { message, traceback } => rsx! {
                        div { class: "feedback-error", role: "alert",
                            p { class: "feedback-error__message", "{message}" }
                            if let Some(traceback) = traceback {
                                pre { class: "feedback-error__traceback", "{traceback}" }
                            }
                        }
                    },
                    FeedbackItemVm::Test(row) => rsx! {
                        TestRowItem { row }
                    },
                }
            }
        }
    }
}

#[component]
fn TestRowItem(row: TestRowVm) -> Element {
    let mark = if row.passed { "Passed" } else { "Failed" };

    rsx! {
        div { class: "{row.class}",
            div { class: "test-row__heading",
                span { class: "test-row__mark", "{mark}" }
                span { class: "test-row__title", "{row.heading}" }
                if let Some(description) = row.description.clone() {
                    span { class: "test-row__description", "{description}" }
                }
            }
            if let Some(values) = row.values.clone() {
                dl { class: "test-row__values",
                    dt { "Input" }
                    dd { code { "{values.input}" } }
                    dt { "Expected" }
                    dd { code { "{values.expected}" } }
                    dt { "Actual" }
                    dd { code { "{values.actual}" } }
                }
            }
            if let Some(note) = row.note.clone() {
                p { class: "test-row__note", "{note}" }
            }
        }
    }
}
