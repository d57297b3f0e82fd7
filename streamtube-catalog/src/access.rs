use thiserror::Error;

use crate::PrimaryKey;

/// A resource that belongs to a single user
pub trait Owned {
    fn owner_id(&self) -> PrimaryKey;
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AccessError {
    #[error("Only the owner can modify this resource")]
    NotOwner,
}

/// Every mutating operation on an owned resource passes through this check
pub fn ensure_owner(resource: &impl Owned, requester_id: PrimaryKey) -> Result<(), AccessError> {
    if resource.owner_id() == requester_id {
        Ok(())
    } else {
        Err(AccessError::NotOwner)
    }
}
