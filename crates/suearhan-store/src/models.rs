//! Domain model structs persisted in the local database.
//!
//! Every struct derives `Serialize` and `Deserialize` with camelCase field
//! renames so the stored JSON blobs keep the original marketplace layout.
//! Record ids are opaque short random strings generated by the writer at
//! creation time (see [`crate::ids::new_record_id`]); collisions are treated
//! as negligible and are not prevented.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// User
// ---------------------------------------------------------------------------

/// Account role.  The first-ever registrant becomes [`UserRole::Admin`];
/// everyone after is [`UserRole::User`].  No re-election happens if the admin
/// record is later deleted.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum UserRole {
    #[serde(rename = "ADMIN")]
    Admin,
    #[serde(rename = "USER")]
    User,
}

/// A registered account.
///
/// The password is stored and exposed in plaintext by design: the admin
/// dashboard displays it to privileged viewers and there is no real
/// authentication layer in this system.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    /// Login name, unique (case-sensitive) across the collection.
    pub username: String,
    /// Name shown to other users.
    pub display_name: String,
    /// Plaintext password.
    pub password: String,
    pub bio: String,
    /// Data-URL of the profile picture, if one was uploaded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_pic: Option<String>,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// FoodItem
// ---------------------------------------------------------------------------

/// A food listing owned by its seller.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FoodItem {
    pub id: String,
    /// Owning user.  Mutations go through the seller; deletion through the
    /// seller or an admin.
    pub seller_id: String,
    /// Denormalized seller name captured at creation time.
    pub seller_name: String,
    pub name: String,
    pub description: String,
    pub price: f64,
    /// Remaining portions.  Never negative; decremented once per accepted
    /// order by the ordered quantity.
    pub stock: u32,
    /// Data-URL of the listing photo (opaque blob, unvalidated).
    pub image: String,
    /// Hidden listings are excluded from the public menu but stay owned.
    pub is_hidden: bool,
    /// Deprecated pass-through field: persisted for blob-format fidelity,
    /// never recomputed.  Live aggregation happens from reviews at read time.
    pub average_rating: f64,
    /// Deprecated pass-through field, same story as `average_rating`.
    pub total_reviews: u32,
}

// ---------------------------------------------------------------------------
// Order
// ---------------------------------------------------------------------------

/// Order lifecycle.  The only exposed transition is PENDING -> DELIVERED;
/// cancellation is a hard delete, not a status.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum OrderStatus {
    #[serde(rename = "PENDING")]
    Pending,
    #[serde(rename = "DELIVERED")]
    Delivered,
}

/// A pickup order placed by a buyer against a listing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: String,
    pub food_id: String,
    /// Denormalized listing name captured at order time.
    pub food_name: String,
    pub seller_id: String,
    pub buyer_id: String,
    /// Pickup name chosen by the buyer; defaults to their username.
    pub buyer_name: String,
    pub quantity: u32,
    pub total_price: f64,
    /// Free-form note to the seller.
    pub notes: String,
    /// Free-form pickup date text, e.g. "14 March".
    pub pickup_time: String,
    pub pickup_location: String,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Chat
// ---------------------------------------------------------------------------

/// A conversation (direct or group).
///
/// Invariant: at most one non-group room exists per unordered pair of
/// participants.  Enforced by the room-resolution rule, not by the store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChatRoom {
    pub id: String,
    /// User ids of the members (2 for direct rooms, 2+ for groups).
    pub participants: Vec<String>,
    pub is_group: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_name: Option<String>,
    /// Preview of the most recent message.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_timestamp: Option<DateTime<Utc>>,
}

/// A single chat message.  Append-only except sender-initiated delete.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: String,
    /// The room this message belongs to.
    pub chat_id: String,
    pub sender_id: String,
    /// Denormalized sender name captured at send time.
    pub sender_name: String,
    pub content: String,
    /// Data-URL of an attached image, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub timestamp: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Notification
// ---------------------------------------------------------------------------

/// What triggered a notification.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum NotificationKind {
    #[serde(rename = "ORDER")]
    Order,
    #[serde(rename = "CHAT")]
    Chat,
    #[serde(rename = "STATUS")]
    Status,
}

/// An in-app notification.  Records strictly older than
/// [`crate::keys::NOTIFICATION_TTL_DAYS`] days are purged lazily on the next
/// read of the collection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: String,
    /// Recipient.
    pub user_id: String,
    pub title: String,
    pub message: String,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Review
// ---------------------------------------------------------------------------

/// A buyer review left after a delivered order.  One review per delivered
/// order is the intended cardinality; duplicates are not prevented.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: String,
    pub food_id: String,
    pub seller_id: String,
    pub buyer_id: String,
    /// Denormalized buyer name captured at review time.
    pub buyer_name: String,
    /// 1 to 5 stars.
    pub rating: u8,
    pub comment: String,
    /// Optional seller response.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply: Option<String>,
    pub created_at: DateTime<Utc>,
}
