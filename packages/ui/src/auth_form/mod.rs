//! Sign-in / sign-up form.

use api::{FieldSpec, FormMode, UserInfo};
use dioxus::prelude::*;

use crate::icons::FaSpinner;
use crate::{use_auth, CustomInput, Icon};

mod submit;
pub use submit::{
    AuthFormState, Outcome, Rejected, SubmitState, Submission, GENERIC_FAILURE,
};

const LOGO: Asset = asset!("/assets/logo.svg");

fn row_class(row: &[FieldSpec]) -> &'static str {
    if row.len() > 1 {
        "flex gap-4"
    } else {
        "flex flex-col"
    }
}

/// Authentication form whose fields, validation and call depend on `mode`.
///
/// After a successful sign-in `on_signed_in` is called once with the user; the
/// page decides where to navigate. After sign-up the form is replaced by the
/// account-linking section.
#[component]
pub fn AuthForm(mode: FormMode, #[props(default)] on_signed_in: EventHandler<UserInfo>) -> Element {
    let mut form = use_signal(move || AuthFormState::new(mode));
    let mut auth = use_auth();

    let handle_submit = move |evt: FormEvent| {
        evt.prevent_default();
        let submission = match form.write().begin() {
            Ok(submission) => submission,
            Err(Rejected::Pending) => return,
            Err(Rejected::Invalid(errors)) => {
                tracing::debug!(%errors, "auth form rejected");
                return;
            }
        };

        spawn(async move {
            let result = match submission {
                Submission::SignUp(values) => api::sign_up(values).await,
                Submission::SignIn { email, password } => api::sign_in(email, password).await,
            };

            let outcome = form.write().finish(result.map_err(|e| e.to_string()));
            match outcome {
                Outcome::NavigateHome(user) => {
                    auth.write().user = Some(user.clone());
                    on_signed_in.call(user);
                }
                Outcome::ShowLinkAccount(user) => {
                    auth.write().user = Some(user);
                }
                Outcome::Failed | Outcome::Ignored => {}
            }
        });
    };

    let state = form();
    let other = mode.other();

    rsx! {
        section {
            class: "auth-form",

            header {
                class: "flex flex-col gap-5 md:gap-8",
                Link {
                    class: "cursor-pointer flex items-center gap-1",
                    to: "/",
                    img { src: LOGO, width: 34, height: 34, alt: "Na Moni logo" }
                    h1 { class: "text-26 font-bold text-black-1", "Na Moni" }
                }
                div {
                    class: "flex flex-col gap-1 md:gap-3",
                    h1 { class: "text-24 lg:text-36 font-semibold text-gray-900", "{state.heading()}" }
                    p { class: "text-16 font-normal text-gray-600", "{state.subheading()}" }
                }
            }

            if let Some(user) = state.linked_user() {
                div {
                    class: "flex flex-col gap-4",
                    p {
                        class: "text-16 text-gray-600",
                        "Welcome, {user.first_name()}. Bank account linking is not available yet."
                    }
                    Link { class: "form-link", to: "/", "Continue to dashboard" }
                }
            } else {
                form {
                    onsubmit: handle_submit,
                    class: "space-y-8",

                    if let Some(message) = state.failure_message() {
                        div { class: "form-error", role: "alert", "{message}" }
                    }

                    for row in mode.rows() {
                        div {
                            class: row_class(row),
                            for spec in row.iter().copied() {
                                CustomInput {
                                    key: "{spec.field}",
                                    spec,
                                    value: state.values.get(spec.field).to_string(),
                                    error: state.errors.get(spec.field).map(str::to_string),
                                    oninput: move |value: String| form.write().set_value(spec.field, value),
                                }
                            }
                        }
                    }

                    div {
                        class: "flex flex-col gap-4",
                        button {
                            class: "form-btn",
                            r#type: "submit",
                            disabled: state.is_loading(),
                            if state.is_loading() {
                                Icon { icon: FaSpinner, width: 20, height: 20, class: "animate-spin" }
                                " Loading..."
                            } else {
                                "{mode.title()}"
                            }
                        }
                    }
                }

                footer {
                    class: "flex gap-1 justify-center",
                    p { class: "text-14 font-normal text-gray-600", "{mode.footer_prompt()}" }
                    Link { class: "form-link", to: other.path(), "{other.title()}" }
                }
            }
        }
    }
}
