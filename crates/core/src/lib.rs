//! Domain layer for the task tracker.
//!
//! Pure types, validation and ownership rules shared by the database and
//! HTTP crates. Nothing in here performs I/O.

pub mod category;
pub mod error;
pub mod nullable;
pub mod ownership;
pub mod stats;
pub mod task;
pub mod text;
pub mod types;
