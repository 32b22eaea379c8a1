//! Order placement, status transition and cancellation.

use chrono::Utc;
use tracing::info;

use suearhan_store::{new_record_id, FoodItem, NotificationKind, Order, OrderStatus, Store};

use crate::commands::require_user;
use crate::error::{AppError, Result};

/// Pickup location shown until the seller confirms one.
pub const PICKUP_LOCATION_TBD: &str = "Seller will confirm the pickup location";

/// Everything a buyer submits when ordering.
#[derive(Debug, Clone, Default)]
pub struct OrderRequest {
    pub food_id: String,
    pub quantity: u32,
    /// Free-form note to the seller.
    pub notes: String,
    /// Free-form pickup date text, e.g. "14 March".
    pub pickup_time: String,
    /// Pickup name; defaults to the buyer's username.
    pub buyer_name: Option<String>,
}

/// Place an order against a listing.
///
/// Rejected before any write when the quantity is zero, exceeds the current
/// stock, or the listing is the buyer's own.  On success three independent
/// writes happen in order: stock decrement, PENDING order prepend, ORDER
/// notification to the seller.  They are not atomic; in the single-process
/// usage model no invariant spans the gap between them.
pub fn place_order(store: &Store, request: OrderRequest) -> Result<Order> {
    let me = require_user(store)?;

    let food = store.get_food()?;
    let item = food
        .iter()
        .find(|item| item.id == request.food_id)
        .ok_or(AppError::NotFound)?
        .clone();

    if item.seller_id == me.id {
        return Err(AppError::Forbidden);
    }
    if request.quantity == 0 {
        return Err(AppError::InvalidQuantity);
    }
    if request.quantity > item.stock {
        return Err(AppError::InsufficientStock {
            available: item.stock,
            requested: request.quantity,
        });
    }

    let order = Order {
        id: new_record_id(),
        food_id: item.id.clone(),
        food_name: item.name.clone(),
        seller_id: item.seller_id.clone(),
        buyer_id: me.id.clone(),
        buyer_name: request.buyer_name.unwrap_or_else(|| me.username.clone()),
        quantity: request.quantity,
        total_price: item.price * f64::from(request.quantity),
        notes: request.notes,
        pickup_time: request.pickup_time,
        pickup_location: PICKUP_LOCATION_TBD.to_string(),
        status: OrderStatus::Pending,
        created_at: Utc::now(),
    };

    // Stock decrement.
    let updated: Vec<FoodItem> = food
        .into_iter()
        .map(|f| {
            if f.id == item.id {
                FoodItem {
                    stock: f.stock - request.quantity,
                    ..f
                }
            } else {
                f
            }
        })
        .collect();
    store.set_food(&updated)?;

    // Order record.
    let mut orders = store.get_orders()?;
    orders.insert(0, order.clone());
    store.set_orders(&orders)?;

    // Seller notification.
    store.notify(
        &order.seller_id,
        "New order!",
        &format!(
            "{} ordered {} x {}",
            order.buyer_name, order.quantity, order.food_name
        ),
        NotificationKind::Order,
    )?;

    info!(order_id = %order.id, food = %order.food_name, quantity = order.quantity, "order placed");
    Ok(order)
}

/// Move a pending order to DELIVERED and tell the buyer.  Seller only; no
/// reverse transition exists.
pub fn mark_delivered(store: &Store, order_id: &str) -> Result<Order> {
    let me = require_user(store)?;
    let mut orders = store.get_orders()?;

    let order = orders
        .iter_mut()
        .find(|o| o.id == order_id)
        .ok_or(AppError::NotFound)?;
    if order.seller_id != me.id {
        return Err(AppError::Forbidden);
    }
    if order.status != OrderStatus::Pending {
        return Err(AppError::NotPending);
    }

    order.status = OrderStatus::Delivered;
    let delivered = order.clone();
    store.set_orders(&orders)?;

    store.notify(
        &delivered.buyer_id,
        "Order status updated",
        &format!("Your order for {} was marked as delivered", delivered.food_name),
        NotificationKind::Status,
    )?;

    info!(order_id, "order delivered");
    Ok(delivered)
}

/// Cancel an order: a hard delete from any status, allowed for either party.
/// Stock is not restored.
pub fn cancel_order(store: &Store, order_id: &str) -> Result<()> {
    let me = require_user(store)?;
    let orders = store.get_orders()?;

    let order = orders
        .iter()
        .find(|o| o.id == order_id)
        .ok_or(AppError::NotFound)?;
    if order.buyer_id != me.id && order.seller_id != me.id {
        return Err(AppError::Forbidden);
    }

    let remaining: Vec<Order> = orders
        .iter()
        .filter(|o| o.id != order_id)
        .cloned()
        .collect();
    store.set_orders(&remaining)?;

    info!(order_id, "order cancelled");
    Ok(())
}

/// Orders the signed-in user placed.
pub fn my_purchases(store: &Store) -> Result<Vec<Order>> {
    let me = require_user(store)?;
    Ok(store
        .get_orders()?
        .into_iter()
        .filter(|o| o.buyer_id == me.id)
        .collect())
}

/// Orders placed against the signed-in user's listings.
pub fn my_sales(store: &Store) -> Result<Vec<Order>> {
    let me = require_user(store)?;
    Ok(store
        .get_orders()?
        .into_iter()
        .filter(|o| o.seller_id == me.id)
        .collect())
}
