//! Data models shared by the server and its clients.

mod user;

pub use user::{Session, UserInfo};
