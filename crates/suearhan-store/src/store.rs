//! The local store facade.
//!
//! [`Store`] is the sole point of truth for all entities.  Every operation is
//! a synchronous whole-collection read or write: views read full collections,
//! derive what they need in memory, mutate a copy, and write the whole
//! collection back.  There is no query language, no indexing, no partial
//! update.
//!
//! Contract:
//! - every `set_*` is immediately visible to a subsequent `get_*` in the same
//!   process (read-after-write), and broadcasts a payload-less change event
//!   to all registered observers after the write is durable;
//! - there is no isolation between concurrent read-modify-write cycles: the
//!   last write wins, silently;
//! - there is no transactional grouping across collections.

use chrono::{Duration, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::database::Database;
use crate::error::Result;
use crate::events::{ChangeHub, SubscriberId};
use crate::ids::new_record_id;
use crate::keys;
use crate::models::{
    ChatMessage, ChatRoom, FoodItem, Notification, NotificationKind, Order, Review, User,
};

/// Durable, synchronous, whole-collection persistence with change
/// notification.
pub struct Store {
    db: Database,
    hub: ChangeHub,
}

impl Store {
    /// Wrap an open [`Database`].
    pub fn new(db: Database) -> Self {
        Self {
            db,
            hub: ChangeHub::new(),
        }
    }

    /// Open the default application database (see [`Database::new`]).
    pub fn open_default() -> Result<Self> {
        Ok(Self::new(Database::new()?))
    }

    /// Register a change observer.  The callback fires after every durable
    /// write, with no payload; observers re-read whatever they care about.
    pub fn subscribe<F>(&self, callback: F) -> SubscriberId
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.hub.subscribe(callback)
    }

    /// Remove a previously registered observer.
    pub fn unsubscribe(&self, id: SubscriberId) -> bool {
        self.hub.unsubscribe(id)
    }

    // ------------------------------------------------------------------
    // Generic blob access
    // ------------------------------------------------------------------

    /// Deserialize the full collection stored under `key`; empty when absent.
    fn read_collection<T: DeserializeOwned>(&self, key: &str) -> Result<Vec<T>> {
        match self.db.get_blob(key)? {
            Some(json) => Ok(serde_json::from_str(&json)?),
            None => Ok(Vec::new()),
        }
    }

    /// Serialize `records` and overwrite the collection under `key`, then
    /// broadcast a change event.
    fn write_collection<T: Serialize>(&self, key: &str, records: &[T]) -> Result<()> {
        let json = serde_json::to_string(records)?;
        self.db.put_blob(key, &json)?;
        tracing::debug!(key, records = records.len(), "collection written");
        self.hub.broadcast();
        Ok(())
    }

    // ------------------------------------------------------------------
    // Collections
    // ------------------------------------------------------------------

    pub fn get_users(&self) -> Result<Vec<User>> {
        self.read_collection(keys::KEY_USERS)
    }

    pub fn set_users(&self, users: &[User]) -> Result<()> {
        self.write_collection(keys::KEY_USERS, users)
    }

    pub fn get_food(&self) -> Result<Vec<FoodItem>> {
        self.read_collection(keys::KEY_FOOD)
    }

    pub fn set_food(&self, food: &[FoodItem]) -> Result<()> {
        self.write_collection(keys::KEY_FOOD, food)
    }

    pub fn get_orders(&self) -> Result<Vec<Order>> {
        self.read_collection(keys::KEY_ORDERS)
    }

    pub fn set_orders(&self, orders: &[Order]) -> Result<()> {
        self.write_collection(keys::KEY_ORDERS, orders)
    }

    pub fn get_chats(&self) -> Result<Vec<ChatRoom>> {
        self.read_collection(keys::KEY_CHATS)
    }

    pub fn set_chats(&self, chats: &[ChatRoom]) -> Result<()> {
        self.write_collection(keys::KEY_CHATS, chats)
    }

    pub fn get_messages(&self) -> Result<Vec<ChatMessage>> {
        self.read_collection(keys::KEY_MESSAGES)
    }

    pub fn set_messages(&self, messages: &[ChatMessage]) -> Result<()> {
        self.write_collection(keys::KEY_MESSAGES, messages)
    }

    /// Read all notifications, purging any strictly older than
    /// [`keys::NOTIFICATION_TTL_DAYS`] days.
    ///
    /// When the purge drops records, the filtered set is persisted
    /// immediately, so this read can trigger a write and a change broadcast.
    pub fn get_notifications(&self) -> Result<Vec<Notification>> {
        let notifications: Vec<Notification> = self.read_collection(keys::KEY_NOTIFICATIONS)?;

        let cutoff = Utc::now() - Duration::days(keys::NOTIFICATION_TTL_DAYS);
        let fresh: Vec<Notification> = notifications
            .iter()
            .filter(|n| n.created_at > cutoff)
            .cloned()
            .collect();

        if fresh.len() != notifications.len() {
            tracing::debug!(
                purged = notifications.len() - fresh.len(),
                "expired notifications purged on read"
            );
            self.set_notifications(&fresh)?;
        }

        Ok(fresh)
    }

    pub fn set_notifications(&self, notifications: &[Notification]) -> Result<()> {
        self.write_collection(keys::KEY_NOTIFICATIONS, notifications)
    }

    pub fn get_reviews(&self) -> Result<Vec<Review>> {
        self.read_collection(keys::KEY_REVIEWS)
    }

    pub fn set_reviews(&self, reviews: &[Review]) -> Result<()> {
        self.write_collection(keys::KEY_REVIEWS, reviews)
    }

    // ------------------------------------------------------------------
    // Session singleton
    // ------------------------------------------------------------------

    /// The signed-in user snapshot, if any.  The snapshot can drift from the
    /// canonical record in the users collection until re-synced on mutation.
    pub fn get_current_user(&self) -> Result<Option<User>> {
        match self.db.get_blob(keys::KEY_CURRENT_USER)? {
            Some(json) => Ok(serde_json::from_str(&json)?),
            None => Ok(None),
        }
    }

    /// Replace the session snapshot (`None` signs out), then broadcast.
    pub fn set_current_user(&self, user: Option<&User>) -> Result<()> {
        let json = serde_json::to_string(&user)?;
        self.db.put_blob(keys::KEY_CURRENT_USER, &json)?;
        tracing::debug!(signed_in = user.is_some(), "session written");
        self.hub.broadcast();
        Ok(())
    }

    // ------------------------------------------------------------------
    // Composite
    // ------------------------------------------------------------------

    /// Construct a fresh unread notification for `user_id` and prepend it to
    /// the notification collection.
    pub fn notify(
        &self,
        user_id: &str,
        title: &str,
        message: &str,
        kind: NotificationKind,
    ) -> Result<Notification> {
        let notification = Notification {
            id: new_record_id(),
            user_id: user_id.to_string(),
            title: title.to_string(),
            message: message.to_string(),
            kind,
            is_read: false,
            created_at: Utc::now(),
        };

        let mut notifications = self.get_notifications()?;
        notifications.insert(0, notification.clone());
        self.set_notifications(&notifications)?;

        Ok(notification)
    }
}
