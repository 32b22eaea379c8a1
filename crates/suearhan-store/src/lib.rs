//! # suearhan-store
//!
//! Local persistence for the SueArhan food marketplace, backed by SQLite.
//!
//! The crate exposes a synchronous [`Store`] facade over eight keyed JSON
//! blobs (one per record collection plus the session singleton).  Every
//! write replaces a whole collection and broadcasts a payload-less change
//! event through the store's [`ChangeHub`]; observers re-read whatever
//! collections they care about.

pub mod database;
pub mod events;
pub mod ids;
pub mod keys;
pub mod migrations;
pub mod models;
pub mod store;

mod error;

pub use database::Database;
pub use error::{Result, StoreError};
pub use events::{ChangeHub, SubscriberId};
pub use ids::new_record_id;
pub use models::*;
pub use store::Store;
