//! Food listing management and the public menu.

use tracing::info;

use suearhan_store::{new_record_id, FoodItem, Store, UserRole};

use crate::commands::{display_label, require_user};
use crate::error::{AppError, Result};

/// Everything a seller submits for a new listing.
#[derive(Debug, Clone, Default)]
pub struct NewListing {
    pub name: String,
    pub description: String,
    pub price: f64,
    pub stock: u32,
    /// Data-URL of the listing photo.
    pub image: String,
}

/// Create a listing owned by the signed-in user.
///
/// Name, a positive price and an image are required.  The deprecated
/// aggregate fields start at zero and are never recomputed.
pub fn add_item(store: &Store, listing: NewListing) -> Result<FoodItem> {
    let me = require_user(store)?;

    if listing.name.trim().is_empty() {
        return Err(AppError::MissingField("name"));
    }
    if listing.price <= 0.0 {
        return Err(AppError::MissingField("price"));
    }
    if listing.image.is_empty() {
        return Err(AppError::MissingField("image"));
    }

    let item = FoodItem {
        id: new_record_id(),
        seller_id: me.id.clone(),
        seller_name: me.username.clone(),
        name: listing.name,
        description: listing.description,
        price: listing.price,
        stock: listing.stock,
        image: listing.image,
        is_hidden: false,
        average_rating: 0.0,
        total_reviews: 0,
    };

    let mut food = store.get_food()?;
    food.push(item.clone());
    store.set_food(&food)?;

    info!(item_id = %item.id, seller = %me.username, name = %item.name, "listing added");
    Ok(item)
}

/// All listings visible on the public menu (hidden ones excluded).
pub fn list_visible(store: &Store) -> Result<Vec<FoodItem>> {
    Ok(store
        .get_food()?
        .into_iter()
        .filter(|item| !item.is_hidden)
        .collect())
}

/// The signed-in user's own listings, hidden ones included.
pub fn my_items(store: &Store) -> Result<Vec<FoodItem>> {
    let me = require_user(store)?;
    Ok(store
        .get_food()?
        .into_iter()
        .filter(|item| item.seller_id == me.id)
        .collect())
}

/// Case-insensitive substring search over visible listings, matching the
/// item name or the seller name.
pub fn search_listings(store: &Store, term: &str) -> Result<Vec<FoodItem>> {
    let needle = term.to_lowercase();
    Ok(list_visible(store)?
        .into_iter()
        .filter(|item| {
            item.name.to_lowercase().contains(&needle)
                || item.seller_name.to_lowercase().contains(&needle)
        })
        .collect())
}

/// Flip a listing's hidden flag.  Seller only.
pub fn toggle_hidden(store: &Store, item_id: &str) -> Result<FoodItem> {
    let me = require_user(store)?;
    let mut food = store.get_food()?;

    let item = food
        .iter_mut()
        .find(|item| item.id == item_id)
        .ok_or(AppError::NotFound)?;
    if item.seller_id != me.id {
        return Err(AppError::Forbidden);
    }

    item.is_hidden = !item.is_hidden;
    let updated = item.clone();
    store.set_food(&food)?;

    info!(item_id, hidden = updated.is_hidden, "listing visibility toggled");
    Ok(updated)
}

/// Delete a listing.  Allowed for the seller or an admin.
pub fn delete_item(store: &Store, item_id: &str) -> Result<()> {
    let me = require_user(store)?;
    let food = store.get_food()?;

    let item = food
        .iter()
        .find(|item| item.id == item_id)
        .ok_or(AppError::NotFound)?;
    if item.seller_id != me.id && me.role != UserRole::Admin {
        return Err(AppError::Forbidden);
    }

    let remaining: Vec<FoodItem> = food
        .iter()
        .filter(|item| item.id != item_id)
        .cloned()
        .collect();
    store.set_food(&remaining)?;

    info!(item_id, by = %display_label(&me), "listing deleted");
    Ok(())
}
