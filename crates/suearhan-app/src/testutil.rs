//! Shared fixtures for the command tests.

use suearhan_store::{Database, Store, User};

use crate::commands::auth::NewAccount;

/// Open a store on a throwaway database inside `dir`.
pub(crate) fn open_store(dir: &tempfile::TempDir) -> Store {
    let db = Database::open_at(&dir.path().join("test.db")).expect("open test db");
    Store::new(db)
}

/// Register (and thereby sign in) a user with password `1234` and an
/// uppercased display name.
pub(crate) fn register(store: &Store, username: &str) -> User {
    crate::commands::auth::register(
        store,
        NewAccount {
            username: username.to_string(),
            display_name: username.to_uppercase(),
            password: "1234".to_string(),
            ..Default::default()
        },
    )
    .expect("register test user")
}
