//! Ownership guard for per-user resources.
//!
//! Every category and task belongs to exactly one user. Single-resource
//! operations run through [`require_owned`]; list operations filter by
//! `owner_id` in SQL instead of post-checking rows.

use crate::error::CoreError;
use crate::types::DbId;

/// A record that belongs to exactly one user.
pub trait Owned {
    /// Entity name used in error messages (e.g. `"Task"`).
    const ENTITY: &'static str;

    fn owner_id(&self) -> DbId;
}

/// Allow the operation only when `identity` owns `resource`.
pub fn authorize<R: Owned>(identity: DbId, resource: &R) -> Result<(), CoreError> {
    if resource.owner_id() == identity {
        Ok(())
    } else {
        Err(CoreError::Forbidden(format!(
            "You do not own this {}",
            R::ENTITY.to_lowercase()
        )))
    }
}

/// Resolve a looked-up row into an owned resource.
///
/// A missing row is `NotFound`; a row owned by someone else is `Forbidden`.
pub fn require_owned<R: Owned>(
    identity: DbId,
    id: DbId,
    resource: Option<R>,
) -> Result<R, CoreError> {
    let resource = resource.ok_or(CoreError::NotFound {
        entity: R::ENTITY,
        id,
    })?;
    authorize(identity, &resource)?;
    Ok(resource)
}
