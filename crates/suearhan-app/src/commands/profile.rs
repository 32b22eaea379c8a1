//! Profile editing and the public seller view.

use serde::Serialize;
use tracing::info;

use suearhan_store::{Review, Store, User};

use crate::commands::auth::{BIO_MAX_LEN, DISPLAY_NAME_MIN_LEN};
use crate::commands::{display_name_of, require_user};
use crate::error::{AppError, Result};

/// Editable profile fields.
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub display_name: String,
    pub bio: String,
    pub profile_pic: Option<String>,
}

/// What a profile page shows for one seller.
///
/// The rating aggregate is computed from the Review records at read time;
/// the `average_rating`/`total_reviews` fields on listings are deprecated
/// and never consulted.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SellerProfile {
    /// The canonical record, absent when the user was deleted.
    pub user: Option<User>,
    /// Resolved label (falls back to the deleted-user placeholder).
    pub display_name: String,
    /// Mean rating rounded to one decimal; 0.0 with no reviews.
    pub average_rating: f64,
    pub total_reviews: usize,
    /// Newest first.
    pub reviews: Vec<Review>,
}

/// Update the signed-in user's profile and re-sync the session snapshot.
pub fn update_profile(store: &Store, update: ProfileUpdate) -> Result<User> {
    let me = require_user(store)?;

    if update.display_name.trim().chars().count() < DISPLAY_NAME_MIN_LEN {
        return Err(AppError::DisplayNameTooShort);
    }
    let bio: String = update.bio.chars().take(BIO_MAX_LEN).collect();

    let mut users = store.get_users()?;
    for user in users.iter_mut() {
        if user.id == me.id {
            user.display_name = update.display_name.clone();
            user.bio = bio.clone();
            user.profile_pic = update.profile_pic.clone();
        }
    }
    store.set_users(&users)?;

    let updated = users
        .into_iter()
        .find(|u| u.id == me.id)
        .ok_or(AppError::NotFound)?;
    store.set_current_user(Some(&updated))?;

    info!(user_id = %updated.id, "profile updated");
    Ok(updated)
}

/// Assemble the public profile of a seller.
///
/// A dangling id does not fail: the profile degrades to the placeholder
/// label with whatever orphaned reviews still point at it.
pub fn seller_profile(store: &Store, user_id: &str) -> Result<SellerProfile> {
    let users = store.get_users()?;
    let user = users.iter().find(|u| u.id == user_id).cloned();

    let reviews: Vec<Review> = store
        .get_reviews()?
        .into_iter()
        .filter(|r| r.seller_id == user_id)
        .collect();

    let average_rating = if reviews.is_empty() {
        0.0
    } else {
        let sum: f64 = reviews.iter().map(|r| f64::from(r.rating)).sum();
        (sum / reviews.len() as f64 * 10.0).round() / 10.0
    };

    Ok(SellerProfile {
        display_name: display_name_of(&users, user_id),
        average_rating,
        total_reviews: reviews.len(),
        reviews,
        user,
    })
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::commands::DELETED_USER_LABEL;
    use crate::testutil;
    use suearhan_store::new_record_id;

    fn seeded_review(seller_id: &str, rating: u8) -> Review {
        Review {
            id: new_record_id(),
            food_id: new_record_id(),
            seller_id: seller_id.to_string(),
            buyer_id: new_record_id(),
            buyer_name: "someone".to_string(),
            rating,
            comment: String::new(),
            reply: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn update_profile_rewrites_record_and_session() {
        let dir = tempfile::tempdir().unwrap();
        let store = testutil::open_store(&dir);
        let alice = testutil::register(&store, "alice");

        assert!(matches!(
            update_profile(
                &store,
                ProfileUpdate {
                    display_name: "x".to_string(),
                    ..Default::default()
                }
            )
            .unwrap_err(),
            AppError::DisplayNameTooShort
        ));

        let updated = update_profile(
            &store,
            ProfileUpdate {
                display_name: "Chef Alice".to_string(),
                bio: "y".repeat(600),
                profile_pic: Some("data:image/png;base64,AAAA".to_string()),
            },
        )
        .unwrap();

        assert_eq!(updated.id, alice.id);
        assert_eq!(updated.bio.chars().count(), BIO_MAX_LEN);
        let session = store.get_current_user().unwrap().unwrap();
        assert_eq!(session.display_name, "Chef Alice");
        assert_eq!(store.get_users().unwrap()[0].display_name, "Chef Alice");
    }

    #[test]
    fn aggregate_is_computed_from_reviews_at_read_time() {
        let dir = tempfile::tempdir().unwrap();
        let store = testutil::open_store(&dir);
        let alice = testutil::register(&store, "alice");

        let profile = seller_profile(&store, &alice.id).unwrap();
        assert_eq!(profile.average_rating, 0.0);
        assert_eq!(profile.total_reviews, 0);

        store
            .set_reviews(&[
                seeded_review(&alice.id, 5),
                seeded_review(&alice.id, 4),
                seeded_review(&alice.id, 4),
                seeded_review("someone_else", 1),
            ])
            .unwrap();

        let profile = seller_profile(&store, &alice.id).unwrap();
        assert_eq!(profile.total_reviews, 3);
        // (5 + 4 + 4) / 3 = 4.333... -> one decimal.
        assert_eq!(profile.average_rating, 4.3);
        assert_eq!(profile.display_name, "ALICE");
    }

    #[test]
    fn dangling_seller_id_degrades_to_placeholder() {
        let dir = tempfile::tempdir().unwrap();
        let store = testutil::open_store(&dir);
        testutil::register(&store, "alice");

        store.set_reviews(&[seeded_review("ghost", 2)]).unwrap();

        let profile = seller_profile(&store, "ghost").unwrap();
        assert!(profile.user.is_none());
        assert_eq!(profile.display_name, DELETED_USER_LABEL);
        assert_eq!(profile.total_reviews, 1);
        assert_eq!(profile.average_rating, 2.0);
    }
}
