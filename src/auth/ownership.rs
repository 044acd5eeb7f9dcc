use uuid::Uuid;

use crate::database::models::{Subtask, Task};
use crate::error::ApiError;

/// Documents that belong to exactly one user
pub trait Owned {
    fn owner_id(&self) -> Uuid;
}

impl Owned for Task {
    fn owner_id(&self) -> Uuid {
        self.user_id
    }
}

impl Owned for Subtask {
    fn owner_id(&self) -> Uuid {
        self.user_id
    }
}

/// Rejects the request with `message` unless `caller` owns `resource`.
pub fn ensure_owner<R: Owned>(resource: &R, caller: Uuid, message: &str) -> Result<(), ApiError> {
    if resource.owner_id() == caller {
        return Ok(());
    }
    tracing::warn!(
        "User {} denied access to a resource owned by {}",
        caller,
        resource.owner_id()
    );
    Err(ApiError::forbidden(message))
}
