//! Buyer reviews and seller replies.

use chrono::Utc;
use tracing::info;

use suearhan_store::{new_record_id, NotificationKind, OrderStatus, Review, Store};

use crate::commands::require_user;
use crate::error::{AppError, Result};

/// Leave a review for a delivered order.
///
/// Only the buyer of the order may review, and only once the order is
/// DELIVERED.  Nothing prevents reviewing the same order twice; one review
/// per delivered order is the intended cardinality, not an enforced one.
pub fn submit_review(store: &Store, order_id: &str, rating: u8, comment: &str) -> Result<Review> {
    let me = require_user(store)?;

    let orders = store.get_orders()?;
    let order = orders
        .iter()
        .find(|o| o.id == order_id)
        .ok_or(AppError::NotFound)?;
    if order.buyer_id != me.id {
        return Err(AppError::Forbidden);
    }
    if order.status != OrderStatus::Delivered {
        return Err(AppError::NotDelivered);
    }
    if !(1..=5).contains(&rating) {
        return Err(AppError::InvalidRating);
    }

    let review = Review {
        id: new_record_id(),
        food_id: order.food_id.clone(),
        seller_id: order.seller_id.clone(),
        buyer_id: me.id.clone(),
        buyer_name: me.username.clone(),
        rating,
        comment: comment.to_string(),
        reply: None,
        created_at: Utc::now(),
    };

    let mut reviews = store.get_reviews()?;
    reviews.insert(0, review.clone());
    store.set_reviews(&reviews)?;

    store.notify(
        &review.seller_id,
        "New review!",
        &format!("{} left a {}-star review", review.buyer_name, review.rating),
        NotificationKind::Status,
    )?;

    info!(review_id = %review.id, rating, "review submitted");
    Ok(review)
}

/// Attach (or replace) the seller's reply on a review.  Seller only.
pub fn reply_to_review(store: &Store, review_id: &str, reply: &str) -> Result<Review> {
    let me = require_user(store)?;

    if reply.trim().is_empty() {
        return Err(AppError::MissingField("reply"));
    }

    let mut reviews = store.get_reviews()?;
    let review = reviews
        .iter_mut()
        .find(|r| r.id == review_id)
        .ok_or(AppError::NotFound)?;
    if review.seller_id != me.id {
        return Err(AppError::Forbidden);
    }

    review.reply = Some(reply.trim().to_string());
    let updated = review.clone();
    store.set_reviews(&reviews)?;

    info!(review_id, "review reply saved");
    Ok(updated)
}

/// All reviews left against one seller, newest first.
pub fn reviews_for_seller(store: &Store, seller_id: &str) -> Result<Vec<Review>> {
    Ok(store
        .get_reviews()?
        .into_iter()
        .filter(|r| r.seller_id == seller_id)
        .collect())
}
