//! Notification inbox operations.
//!
//! Expiry is the store's job: any read through `get_notifications` already
//! drops (and durably purges) records older than five days.

use suearhan_store::{Notification, Store};

use crate::commands::require_user;
use crate::error::{AppError, Result};

/// The signed-in user's notifications, newest first.
pub fn my_notifications(store: &Store) -> Result<Vec<Notification>> {
    let me = require_user(store)?;
    Ok(store
        .get_notifications()?
        .into_iter()
        .filter(|n| n.user_id == me.id)
        .collect())
}

/// How many unread notifications the signed-in user has (badge count).
pub fn unread_count(store: &Store) -> Result<usize> {
    Ok(my_notifications(store)?
        .iter()
        .filter(|n| !n.is_read)
        .count())
}

/// Mark every notification of the signed-in user as read.
pub fn mark_all_read(store: &Store) -> Result<()> {
    let me = require_user(store)?;
    let mut notifications = store.get_notifications()?;
    for notification in notifications.iter_mut() {
        if notification.user_id == me.id {
            notification.is_read = true;
        }
    }
    Ok(store.set_notifications(&notifications)?)
}

/// Remove one notification.  Recipient only.
pub fn dismiss(store: &Store, notification_id: &str) -> Result<()> {
    let me = require_user(store)?;
    let notifications = store.get_notifications()?;

    let notification = notifications
        .iter()
        .find(|n| n.id == notification_id)
        .ok_or(AppError::NotFound)?;
    if notification.user_id != me.id {
        return Err(AppError::Forbidden);
    }

    let remaining: Vec<Notification> = notifications
        .iter()
        .filter(|n| n.id != notification_id)
        .cloned()
        .collect();
    Ok(store.set_notifications(&remaining)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::auth;
    use crate::testutil;
    use suearhan_store::NotificationKind;

    #[test]
    fn inbox_is_scoped_to_the_recipient() {
        let dir = tempfile::tempdir().unwrap();
        let store = testutil::open_store(&dir);
        let alice = testutil::register(&store, "alice");
        let bob = testutil::register(&store, "bob");

        store
            .notify(&alice.id, "For alice", "a", NotificationKind::Status)
            .unwrap();
        store
            .notify(&bob.id, "For bob", "b", NotificationKind::Status)
            .unwrap();

        // bob is signed in.
        let inbox = my_notifications(&store).unwrap();
        assert_eq!(inbox.len(), 1);
        assert_eq!(inbox[0].title, "For bob");
        assert_eq!(unread_count(&store).unwrap(), 1);
    }

    #[test]
    fn mark_all_read_leaves_other_inboxes_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let store = testutil::open_store(&dir);
        let alice = testutil::register(&store, "alice");
        let bob = testutil::register(&store, "bob");

        store
            .notify(&alice.id, "For alice", "a", NotificationKind::Status)
            .unwrap();
        store
            .notify(&bob.id, "For bob", "b", NotificationKind::Status)
            .unwrap();

        mark_all_read(&store).unwrap();
        assert_eq!(unread_count(&store).unwrap(), 0);

        auth::login(&store, &alice.username, &alice.password).unwrap();
        assert_eq!(unread_count(&store).unwrap(), 1);
    }

    #[test]
    fn only_the_recipient_dismisses() {
        let dir = tempfile::tempdir().unwrap();
        let store = testutil::open_store(&dir);
        let alice = testutil::register(&store, "alice");
        testutil::register(&store, "bob");

        let notification = store
            .notify(&alice.id, "For alice", "a", NotificationKind::Status)
            .unwrap();

        assert!(matches!(
            dismiss(&store, &notification.id).unwrap_err(),
            AppError::Forbidden
        ));

        auth::login(&store, &alice.username, &alice.password).unwrap();
        dismiss(&store, &notification.id).unwrap();
        assert!(my_notifications(&store).unwrap().is_empty());
        assert!(matches!(
            dismiss(&store, &notification.id).unwrap_err(),
            AppError::NotFound
        ));
    }
}
