//! Sign-up page. On success the form itself switches to the account-linking view.

use api::FormMode;
use dioxus::prelude::*;
use ui::AuthForm;

#[component]
pub fn SignUp() -> Element {
    rsx! {
        main {
            class: "auth-layout",
            AuthForm { mode: FormMode::SignUp }
        }
    }
}
