//! Sign-in page.

use api::FormMode;
use dioxus::prelude::*;
use ui::AuthForm;

use crate::Route;

#[component]
pub fn SignIn() -> Element {
    let nav = use_navigator();

    rsx! {
        main {
            class: "auth-layout",
            AuthForm {
                mode: FormMode::SignIn,
                on_signed_in: move |_| {
                    nav.push(Route::Home {});
                },
            }
        }
    }
}
