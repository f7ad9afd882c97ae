//! Authentication flows built on the identity service, plus session helpers.

mod flows;
#[cfg(not(target_arch = "wasm32"))]
mod password;
mod session;

pub use flows::{authenticate, end_session, register, replace_session, resolve_user};
#[cfg(not(target_arch = "wasm32"))]
pub use password::{hash_password, verify_password};
pub use session::SESSION_SECRET_KEY;
