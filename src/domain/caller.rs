//! Caller identity and the single authorization rule.
//!
//! Every service operation receives the requesting identity explicitly
//! instead of reading it from ambient request state.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::ROLE_ADMIN;
use crate::errors::{AppError, AppResult};

/// Authenticated identity of the requester.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Caller {
    pub user_id: Uuid,
    pub is_admin: bool,
}

impl Caller {
    /// Regular customer identity
    pub fn user(user_id: Uuid) -> Self {
        Self {
            user_id,
            is_admin: false,
        }
    }

    /// Administrator identity
    pub fn admin(user_id: Uuid) -> Self {
        Self {
            user_id,
            is_admin: true,
        }
    }

    /// Build from a token role claim
    pub fn from_role(user_id: Uuid, role: &str) -> Self {
        Self {
            user_id,
            is_admin: role == ROLE_ADMIN,
        }
    }

    /// Fail with `Forbidden` unless the caller is an administrator.
    pub fn require_admin(&self) -> AppResult<()> {
        if self.is_admin {
            Ok(())
        } else {
            Err(AppError::Forbidden)
        }
    }
}

/// A record owned by exactly one user.
pub trait Owned {
    fn owner_id(&self) -> Uuid;
}

/// Admins may access everything; everyone else only what they own.
pub fn can_access<R: Owned + ?Sized>(caller: &Caller, resource: &R) -> bool {
    caller.is_admin || resource.owner_id() == caller.user_id
}

/// Return the resource if the caller may access it, `NotFound` otherwise.
///
/// Foreign records are reported as missing so their existence is not leaked.
pub fn ensure_access<R: Owned>(caller: &Caller, resource: R) -> AppResult<R> {
    if can_access(caller, &resource) {
        Ok(resource)
    } else {
        Err(AppError::NotFound)
    }
}

/// Like [`ensure_access`] but ignores the admin capability.
///
/// Used where an operation acts on the caller's own data only
/// (paying an order, editing an address), even for administrators.
pub fn ensure_owner<R: Owned>(caller: &Caller, resource: R) -> AppResult<R> {
    if resource.owner_id() == caller.user_id {
        Ok(resource)
    } else {
        Err(AppError::NotFound)
    }
}
