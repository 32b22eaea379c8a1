//! Chat rooms and messages.

use chrono::Utc;
use tracing::info;

use suearhan_store::{new_record_id, ChatMessage, ChatRoom, NotificationKind, Store};

use crate::commands::{display_label, display_name_of, require_user, DELETED_USER_LABEL};
use crate::error::{AppError, Result};

/// Room preview and notification text used for image-only messages.
pub const PHOTO_PREVIEW: &str = "sent a photo";

/// Fallback title for a group room without a name.
const UNNAMED_GROUP_LABEL: &str = "Group";

/// Find or create the direct room between the signed-in user and `other_id`.
///
/// Existing non-group rooms are scanned linearly for an exact
/// both-participants match, which keeps at most one direct room per
/// unordered pair of users.  A new room is created only when none exists.
pub fn start_direct_chat(store: &Store, other_id: &str) -> Result<ChatRoom> {
    let me = require_user(store)?;
    if other_id == me.id {
        return Err(AppError::Forbidden);
    }

    let mut chats = store.get_chats()?;
    if let Some(existing) = chats.iter().find(|room| {
        !room.is_group
            && room.participants.iter().any(|p| p == &me.id)
            && room.participants.iter().any(|p| p == other_id)
    }) {
        return Ok(existing.clone());
    }

    let room = ChatRoom {
        id: new_record_id(),
        participants: vec![me.id.clone(), other_id.to_string()],
        is_group: false,
        group_name: None,
        last_message: None,
        last_timestamp: Some(Utc::now()),
    };

    chats.insert(0, room.clone());
    store.set_chats(&chats)?;

    info!(room_id = %room.id, "direct chat created");
    Ok(room)
}

/// Create a group room with the signed-in user plus at least two others.
pub fn start_group_chat(store: &Store, name: &str, member_ids: &[String]) -> Result<ChatRoom> {
    let me = require_user(store)?;

    if name.trim().is_empty() {
        return Err(AppError::MissingField("groupName"));
    }

    let mut participants = vec![me.id.clone()];
    for id in member_ids {
        if id != &me.id && !participants.contains(id) {
            participants.push(id.clone());
        }
    }
    if participants.len() < 3 {
        return Err(AppError::GroupTooSmall);
    }

    let room = ChatRoom {
        id: new_record_id(),
        participants,
        is_group: true,
        group_name: Some(name.trim().to_string()),
        last_message: None,
        last_timestamp: Some(Utc::now()),
    };

    let mut chats = store.get_chats()?;
    chats.insert(0, room.clone());
    store.set_chats(&chats)?;

    info!(room_id = %room.id, members = room.participants.len(), "group chat created");
    Ok(room)
}

/// Send a message into a room the signed-in user belongs to.
///
/// Appends the message, refreshes the room preview, and sends one CHAT
/// notification to every other participant.
pub fn send_message(
    store: &Store,
    chat_id: &str,
    content: &str,
    image: Option<String>,
) -> Result<ChatMessage> {
    let me = require_user(store)?;

    if content.trim().is_empty() && image.is_none() {
        return Err(AppError::EmptyMessage);
    }

    let chats = store.get_chats()?;
    let room = chats
        .iter()
        .find(|room| room.id == chat_id)
        .ok_or(AppError::NotFound)?
        .clone();
    if !room.participants.iter().any(|p| p == &me.id) {
        return Err(AppError::Forbidden);
    }

    let message = ChatMessage {
        id: new_record_id(),
        chat_id: chat_id.to_string(),
        sender_id: me.id.clone(),
        sender_name: display_label(&me),
        content: content.to_string(),
        image,
        timestamp: Utc::now(),
    };

    let mut messages = store.get_messages()?;
    messages.push(message.clone());
    store.set_messages(&messages)?;

    let preview = if message.image.is_some() {
        PHOTO_PREVIEW.to_string()
    } else {
        content.to_string()
    };
    let updated: Vec<ChatRoom> = chats
        .into_iter()
        .map(|r| {
            if r.id == chat_id {
                ChatRoom {
                    last_message: Some(preview.clone()),
                    last_timestamp: Some(message.timestamp),
                    ..r
                }
            } else {
                r
            }
        })
        .collect();
    store.set_chats(&updated)?;

    for participant in &room.participants {
        if participant != &me.id {
            store.notify(
                participant,
                "New message",
                &format!("{}: {}", message.sender_name, preview),
                NotificationKind::Chat,
            )?;
        }
    }

    Ok(message)
}

/// Delete a message.  Sender only.
pub fn delete_message(store: &Store, message_id: &str) -> Result<()> {
    let me = require_user(store)?;
    let messages = store.get_messages()?;

    let message = messages
        .iter()
        .find(|m| m.id == message_id)
        .ok_or(AppError::NotFound)?;
    if message.sender_id != me.id {
        return Err(AppError::Forbidden);
    }

    let remaining: Vec<ChatMessage> = messages
        .iter()
        .filter(|m| m.id != message_id)
        .cloned()
        .collect();
    store.set_messages(&remaining)?;

    info!(message_id, "message deleted");
    Ok(())
}

/// Rooms the signed-in user belongs to.
pub fn my_rooms(store: &Store) -> Result<Vec<ChatRoom>> {
    let me = require_user(store)?;
    Ok(store
        .get_chats()?
        .into_iter()
        .filter(|room| room.participants.iter().any(|p| p == &me.id))
        .collect())
}

/// All messages of one room, in send order.
pub fn room_messages(store: &Store, chat_id: &str) -> Result<Vec<ChatMessage>> {
    Ok(store
        .get_messages()?
        .into_iter()
        .filter(|m| m.chat_id == chat_id)
        .collect())
}

/// Title shown for a room: the group name, or the other participant's
/// display name, falling back to the deleted-user placeholder when that
/// participant no longer exists.
pub fn room_title(store: &Store, room: &ChatRoom) -> Result<String> {
    if room.is_group {
        return Ok(room
            .group_name
            .clone()
            .unwrap_or_else(|| UNNAMED_GROUP_LABEL.to_string()));
    }

    let me = require_user(store)?;
    let users = store.get_users()?;
    Ok(room
        .participants
        .iter()
        .find(|p| *p != &me.id)
        .map(|other| display_name_of(&users, other))
        .unwrap_or_else(|| DELETED_USER_LABEL.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::{admin, auth};
    use crate::testutil;

    #[test]
    fn direct_room_is_unique_per_pair_from_either_side() {
        let dir = tempfile::tempdir().unwrap();
        let store = testutil::open_store(&dir);
        let alice = testutil::register(&store, "alice");
        let bob = testutil::register(&store, "bob");

        // bob is signed in after registering.
        let room = start_direct_chat(&store, &alice.id).unwrap();
        let again = start_direct_chat(&store, &alice.id).unwrap();
        assert_eq!(room.id, again.id);

        auth::login(&store, &alice.username, &alice.password).unwrap();
        let from_alice = start_direct_chat(&store, &bob.id).unwrap();
        assert_eq!(from_alice.id, room.id);

        assert_eq!(store.get_chats().unwrap().len(), 1);
    }

    #[test]
    fn both_participants_must_match_not_just_one() {
        let dir = tempfile::tempdir().unwrap();
        let store = testutil::open_store(&dir);
        let alice = testutil::register(&store, "alice");
        testutil::register(&store, "bob");
        let carol = testutil::register(&store, "carol");

        // carol->alice must not reuse a bob->alice room.
        auth::login(&store, "bob", "1234").unwrap();
        let bob_room = start_direct_chat(&store, &alice.id).unwrap();

        auth::login(&store, &carol.username, &carol.password).unwrap();
        let carol_room = start_direct_chat(&store, &alice.id).unwrap();

        assert_ne!(bob_room.id, carol_room.id);
        assert_eq!(store.get_chats().unwrap().len(), 2);
    }

    #[test]
    fn group_rooms_need_a_name_and_three_members() {
        let dir = tempfile::tempdir().unwrap();
        let store = testutil::open_store(&dir);
        let alice = testutil::register(&store, "alice");
        let bob = testutil::register(&store, "bob");
        let carol = testutil::register(&store, "carol");

        assert!(matches!(
            start_group_chat(&store, "  ", &[alice.id.clone(), bob.id.clone()]).unwrap_err(),
            AppError::MissingField("groupName")
        ));
        assert!(matches!(
            start_group_chat(&store, "lunch", std::slice::from_ref(&alice.id)).unwrap_err(),
            AppError::GroupTooSmall
        ));

        let room =
            start_group_chat(&store, "lunch", &[alice.id.clone(), bob.id.clone()]).unwrap();
        assert!(room.is_group);
        assert_eq!(room.participants, vec![carol.id, alice.id, bob.id]);
        assert_eq!(room_title(&store, &room).unwrap(), "lunch");
    }

    #[test]
    fn sending_updates_preview_and_notifies_the_other_side() {
        let dir = tempfile::tempdir().unwrap();
        let store = testutil::open_store(&dir);
        let alice = testutil::register(&store, "alice");
        let bob = testutil::register(&store, "bob");

        let room = start_direct_chat(&store, &alice.id).unwrap();
        let message = send_message(&store, &room.id, "hello!", None).unwrap();
        assert_eq!(message.sender_id, bob.id);

        let rooms = store.get_chats().unwrap();
        assert_eq!(rooms[0].last_message.as_deref(), Some("hello!"));
        assert!(rooms[0].last_timestamp.is_some());

        let notifications = store.get_notifications().unwrap();
        assert_eq!(notifications.len(), 1);
        assert_eq!(notifications[0].user_id, alice.id);
        assert_eq!(notifications[0].kind, NotificationKind::Chat);

        // Image-only message: allowed, preview swaps to the photo label.
        send_message(&store, &room.id, "", Some("data:image/png;base64,AAAA".into())).unwrap();
        let rooms = store.get_chats().unwrap();
        assert_eq!(rooms[0].last_message.as_deref(), Some(PHOTO_PREVIEW));

        assert!(matches!(
            send_message(&store, &room.id, "   ", None).unwrap_err(),
            AppError::EmptyMessage
        ));
        assert_eq!(room_messages(&store, &room.id).unwrap().len(), 2);
    }

    #[test]
    fn non_participants_cannot_post() {
        let dir = tempfile::tempdir().unwrap();
        let store = testutil::open_store(&dir);
        let alice = testutil::register(&store, "alice");
        testutil::register(&store, "bob");
        let room = start_direct_chat(&store, &alice.id).unwrap();

        testutil::register(&store, "mallory");
        assert!(matches!(
            send_message(&store, &room.id, "hi", None).unwrap_err(),
            AppError::Forbidden
        ));
    }

    #[test]
    fn only_the_sender_deletes_their_message() {
        let dir = tempfile::tempdir().unwrap();
        let store = testutil::open_store(&dir);
        let alice = testutil::register(&store, "alice");
        let bob = testutil::register(&store, "bob");

        let room = start_direct_chat(&store, &alice.id).unwrap();
        let message = send_message(&store, &room.id, "oops", None).unwrap();

        auth::login(&store, &alice.username, &alice.password).unwrap();
        assert!(matches!(
            delete_message(&store, &message.id).unwrap_err(),
            AppError::Forbidden
        ));

        auth::login(&store, &bob.username, &bob.password).unwrap();
        delete_message(&store, &message.id).unwrap();
        assert!(room_messages(&store, &room.id).unwrap().is_empty());
    }

    #[test]
    fn deleted_partner_resolves_to_placeholder_title() {
        let dir = tempfile::tempdir().unwrap();
        let store = testutil::open_store(&dir);
        let admin_user = testutil::register(&store, "admin_user");
        let bob = testutil::register(&store, "bob");

        auth::login(&store, &admin_user.username, &admin_user.password).unwrap();
        let room = start_direct_chat(&store, &bob.id).unwrap();
        assert_eq!(room_title(&store, &room).unwrap(), "BOB");

        admin::delete_user(&store, &bob.id).unwrap();
        assert_eq!(room_title(&store, &room).unwrap(), DELETED_USER_LABEL);
    }
}
