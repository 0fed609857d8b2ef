use dioxus::prelude::*;
use dioxus_router::{Outlet, Routable};

use crate::views::TrainerView;

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
pub enum Route {
    #[layout(Layout)]
        #[route("/", TrainerView)] Trainer {},
}

#[component]
fn Layout() -> Element {
    rsx! {
        div { class: "app",
            header { class: "topbar",
                h1 { "Exercise Trainer" }
            }
            main { class: "content",
                Outlet::<Route> {}
            }
        }
    }
}
