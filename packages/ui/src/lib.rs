//! This crate contains all shared UI for the workspace.

use dioxus::prelude::*;

// Re-export icon library
pub use dioxus_free_icons::Icon;
pub mod icons {
    pub use dioxus_free_icons::icons::fa_solid_icons::*;
}

pub const MAIN_CSS: Asset = asset!("/assets/main.css");

mod auth;
pub use auth::{use_auth, AuthProvider, AuthState, LogoutButton};

pub mod auth_form;
pub use auth_form::AuthForm;

pub mod counter;
pub use counter::{AnimatedCounter, CountUp};

mod custom_input;
pub use custom_input::CustomInput;
