//! Shared response bodies for API handlers.
//!
//! Resources are returned as bare JSON. Operations with nothing to return
//! (deletes) answer with a [`MessageResponse`].

use serde::Serialize;

/// `{ "message": "..." }` confirmation body.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

impl MessageResponse {
    pub fn new(message: &'static str) -> Self {
        Self { message }
    }
}
