//! # suearhan-app
//!
//! Business rules of the SueArhan peer-to-peer food marketplace, layered on
//! top of [`suearhan_store`].  The store owns persistence and change
//! notification; this crate owns validation, authorization and the
//! invariant-preserving write sequences (stock decrement, direct-room
//! uniqueness, review flow, notification fan-out).

pub mod commands;
pub mod logging;
pub mod media;

mod error;

pub use error::{AppError, Result};

#[cfg(test)]
pub(crate) mod testutil;
