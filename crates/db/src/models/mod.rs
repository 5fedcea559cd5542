//! Row models.
//!
//! Each submodule contains `FromRow` + `Serialize` structs matching the
//! database rows. Request DTOs and their validation live in `taskflow_core`.

pub mod category;
pub mod stats;
pub mod task;
