//! Fixed blob keys and store-wide limits.
//!
//! Every collection is persisted as a single JSON blob under one of these
//! namespaced keys.  The names are part of the on-disk format; renaming one
//! orphans existing data.

/// All registered users.
pub const KEY_USERS: &str = "sue_users";

/// All food listings, hidden ones included.
pub const KEY_FOOD: &str = "sue_food";

/// All orders, both pending and delivered.
pub const KEY_ORDERS: &str = "sue_orders";

/// All chat rooms (direct and group).
pub const KEY_CHATS: &str = "sue_chats";

/// All chat messages across all rooms.
pub const KEY_MESSAGES: &str = "sue_messages";

/// All notifications for all recipients.
pub const KEY_NOTIFICATIONS: &str = "sue_notifications";

/// All reviews.
pub const KEY_REVIEWS: &str = "sue_reviews";

/// Snapshot of the signed-in user, or absent when signed out.
pub const KEY_CURRENT_USER: &str = "sue_current_user";

/// Notifications strictly older than this are purged on the next read.
pub const NOTIFICATION_TTL_DAYS: i64 = 5;
