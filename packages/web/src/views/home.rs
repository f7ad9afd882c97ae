//! Dashboard shown at `/` to signed-in users.

use dioxus::prelude::*;
use ui::{use_auth, AnimatedCounter, LogoutButton};

use crate::Route;

#[component]
pub fn Home() -> Element {
    let auth = use_auth();
    let nav = use_navigator();
    let state = auth();

    // Not signed in: send to the sign-in form once the session lookup is done.
    if !state.loading && state.user.is_none() {
        nav.replace(Route::SignIn {});
    }

    let Some(user) = state.user else {
        return rsx! {};
    };

    rsx! {
        main {
            class: "home",

            header {
                class: "home-header",
                div {
                    h1 {
                        "Welcome, "
                        span { class: "highlight", "{user.first_name()}" }
                    }
                    p {
                        class: "text-16 text-gray-600",
                        "Access and manage your account and transactions efficiently."
                    }
                }
                LogoutButton {
                    class: "logout-btn",
                    on_logout: move |_| {
                        nav.replace(Route::SignIn {});
                    },
                }
            }

            section {
                class: "balance-box",
                p { class: "balance-label", "Total Current Balance" }
                AnimatedCounter { amount: 0.0 }
                p { class: "text-14 text-gray-600", "No bank accounts linked yet." }
            }
        }
    }
}
