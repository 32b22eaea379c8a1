//! Business rules layered on top of the local store.
//!
//! Every operation takes `&Store`, reads whole collections, derives what it
//! needs in memory, and writes whole collections back.  Authorization (only
//! the seller hides their item, only the sender deletes their message, ...)
//! is enforced here, never by the store itself.

pub mod admin;
pub mod auth;
pub mod chat;
pub mod food;
pub mod notifications;
pub mod orders;
pub mod profile;
pub mod reviews;

use suearhan_store::{Store, User, UserRole};

use crate::error::{AppError, Result};

/// Display label for dangling user references.  There is no cascade delete:
/// records authored by a deleted user survive and resolve to this at read
/// time.
pub const DELETED_USER_LABEL: &str = "deleted user";

/// The signed-in user, or [`AppError::NotSignedIn`].
pub(crate) fn require_user(store: &Store) -> Result<User> {
    store.get_current_user()?.ok_or(AppError::NotSignedIn)
}

/// The signed-in user if they are an admin, or [`AppError::Forbidden`].
pub(crate) fn require_admin(store: &Store) -> Result<User> {
    let user = require_user(store)?;
    if user.role != UserRole::Admin {
        return Err(AppError::Forbidden);
    }
    Ok(user)
}

/// Resolve a user id to a display label, falling back to the username and
/// then to [`DELETED_USER_LABEL`] for dangling references.
pub fn display_name_of(users: &[User], user_id: &str) -> String {
    users
        .iter()
        .find(|u| u.id == user_id)
        .map(display_label)
        .unwrap_or_else(|| DELETED_USER_LABEL.to_string())
}

/// The name a user is shown as: display name when set, username otherwise.
pub(crate) fn display_label(user: &User) -> String {
    if user.display_name.trim().is_empty() {
        user.username.clone()
    } else {
        user.display_name.clone()
    }
}
