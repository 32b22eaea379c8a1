//! Registration, sign-in and password management.

use chrono::Utc;
use tracing::info;

use suearhan_store::{new_record_id, Store, User, UserRole};

use crate::commands::require_user;
use crate::error::{AppError, Result};

pub const USERNAME_MIN_LEN: usize = 3;
pub const USERNAME_MAX_LEN: usize = 50;
pub const DISPLAY_NAME_MIN_LEN: usize = 2;
pub const PASSWORD_MIN_LEN: usize = 4;
pub const BIO_MAX_LEN: usize = 500;

/// Everything a new registrant submits.
#[derive(Debug, Clone, Default)]
pub struct NewAccount {
    pub username: String,
    pub display_name: String,
    pub password: String,
    pub bio: String,
    /// Data-URL of the profile picture, if one was uploaded.
    pub profile_pic: Option<String>,
}

/// Usernames are `[A-Za-z0-9_]{1,50}`; the minimum length is checked
/// separately so the two rejections keep their own messages.
fn username_is_well_formed(username: &str) -> bool {
    !username.is_empty()
        && username.len() <= USERNAME_MAX_LEN
        && username
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'_')
}

/// Register a new account and sign it in.
///
/// The first-ever registrant becomes the admin; every later one is a plain
/// user.  Usernames are matched case-sensitively for uniqueness.
pub fn register(store: &Store, account: NewAccount) -> Result<User> {
    if !username_is_well_formed(&account.username) || account.username.len() < USERNAME_MIN_LEN {
        return Err(AppError::InvalidUsername);
    }
    if account.display_name.trim().chars().count() < DISPLAY_NAME_MIN_LEN {
        return Err(AppError::DisplayNameTooShort);
    }
    if account.password.len() < PASSWORD_MIN_LEN {
        return Err(AppError::PasswordTooShort);
    }

    let mut users = store.get_users()?;
    if users.iter().any(|u| u.username == account.username) {
        return Err(AppError::UsernameTaken);
    }

    let role = if users.is_empty() {
        UserRole::Admin
    } else {
        UserRole::User
    };

    let bio: String = account.bio.chars().take(BIO_MAX_LEN).collect();

    let user = User {
        id: new_record_id(),
        username: account.username,
        display_name: account.display_name,
        password: account.password,
        bio,
        profile_pic: account.profile_pic,
        role,
        created_at: Utc::now(),
    };

    users.push(user.clone());
    store.set_users(&users)?;
    store.set_current_user(Some(&user))?;

    info!(user_id = %user.id, username = %user.username, role = ?user.role, "user registered");
    Ok(user)
}

/// Sign in with an exact username + password match.
///
/// A single error covers both unknown username and wrong password.
pub fn login(store: &Store, username: &str, password: &str) -> Result<User> {
    let user = store
        .get_users()?
        .into_iter()
        .find(|u| u.username == username && u.password == password)
        .ok_or(AppError::BadCredentials)?;

    store.set_current_user(Some(&user))?;

    info!(user_id = %user.id, username = %user.username, "signed in");
    Ok(user)
}

/// Clear the session.
pub fn logout(store: &Store) -> Result<()> {
    store.set_current_user(None)?;
    Ok(())
}

/// Change the signed-in user's password and re-sync the session snapshot.
///
/// The old password is checked against the session snapshot, which is what
/// the user last saw; it can drift from the canonical record only if another
/// writer changed it meanwhile (last write wins).
pub fn change_password(store: &Store, old: &str, new: &str, confirm: &str) -> Result<()> {
    let me = require_user(store)?;

    if old != me.password {
        return Err(AppError::WrongPassword);
    }
    if new != confirm {
        return Err(AppError::PasswordMismatch);
    }
    if new.len() < PASSWORD_MIN_LEN {
        return Err(AppError::PasswordTooShort);
    }

    let mut users = store.get_users()?;
    for user in users.iter_mut() {
        if user.id == me.id {
            user.password = new.to_string();
        }
    }
    store.set_users(&users)?;

    if let Some(updated) = users.iter().find(|u| u.id == me.id) {
        store.set_current_user(Some(updated))?;
    }

    info!(user_id = %me.id, "password changed");
    Ok(())
}
