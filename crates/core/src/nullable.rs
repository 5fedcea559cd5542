//! Serde support for patch fields that distinguish "absent" from "null".
//!
//! Combine with `#[serde(default)]`:
//!
//! ```ignore
//! #[serde(default, deserialize_with = "crate::nullable::deserialize")]
//! pub description: Option<Option<String>>,
//! ```
//!
//! - key missing      -> `None`
//! - key set to null  -> `Some(None)`
//! - key set to value -> `Some(Some(value))`

use serde::{Deserialize, Deserializer};

pub fn deserialize<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
