//! Request handlers for categories and tasks.
//!
//! Every handler takes the caller's [`AuthUser`](crate::middleware::auth::AuthUser),
//! runs the ownership guard before touching a specific resource, and delegates
//! to the repositories in `taskflow_db`.

pub mod categories;
pub mod tasks;
