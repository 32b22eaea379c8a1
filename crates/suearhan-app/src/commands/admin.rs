//! Admin dashboard operations.

use tracing::info;

use suearhan_store::{Store, User};

use crate::commands::require_admin;
use crate::error::{AppError, Result};

/// Full user roster, registration order.  Admin only.
///
/// The returned records carry plaintext passwords: the dashboard displays
/// them to the admin by design (no real authentication in this system).
pub fn list_users(store: &Store) -> Result<Vec<User>> {
    require_admin(store)?;
    store.get_users().map_err(AppError::from)
}

/// Case-insensitive roster search over username and display name.  Admin
/// only.
pub fn search_users(store: &Store, term: &str) -> Result<Vec<User>> {
    let needle = term.to_lowercase();
    Ok(list_users(store)?
        .into_iter()
        .filter(|u| {
            u.username.to_lowercase().contains(&needle)
                || u.display_name.to_lowercase().contains(&needle)
        })
        .collect())
}

/// Delete a user account.  Admin only.
///
/// There is no cascade: the user's listings, orders, messages and reviews
/// survive as orphans and resolve to the deleted-user placeholder at read
/// time.  If the deleted account was the admin, no re-election happens.
pub fn delete_user(store: &Store, user_id: &str) -> Result<()> {
    let me = require_admin(store)?;
    let users = store.get_users()?;

    if !users.iter().any(|u| u.id == user_id) {
        return Err(AppError::NotFound);
    }

    let remaining: Vec<User> = users.iter().filter(|u| u.id != user_id).cloned().collect();
    store.set_users(&remaining)?;

    info!(user_id, by = %me.username, "user deleted");
    Ok(())
}
