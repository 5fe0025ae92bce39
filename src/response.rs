//! Standard `{ message }` body, shared by error responses and delete acks.

use serde::Serialize;
use utoipa::ToSchema;

#[derive(Serialize, ToSchema)]
pub struct Message {
    /// Human-readable outcome, e.g. "User deleted" or "WishList not found".
    pub message: String,
}

impl Message {
    pub fn new(message: impl Into<String>) -> Self {
        Message {
            message: message.into(),
        }
    }
}
