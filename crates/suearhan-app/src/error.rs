use suearhan_store::StoreError;
use thiserror::Error;

/// User-facing failures of the business rules.
///
/// The taxonomy is deliberately shallow: a validation failure aborts the
/// operation before any write, missing referenced entities in read paths
/// degrade to a placeholder label instead of erroring, and storage failures
/// propagate as [`AppError::Store`].  There are no retries anywhere.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Username must be 3-50 characters using only letters, digits and underscore")]
    InvalidUsername,

    #[error("Username is already taken")]
    UsernameTaken,

    #[error("Display name must be at least 2 characters")]
    DisplayNameTooShort,

    #[error("Password must be at least 4 characters")]
    PasswordTooShort,

    #[error("Invalid username or password")]
    BadCredentials,

    #[error("Current password is incorrect")]
    WrongPassword,

    #[error("New passwords do not match")]
    PasswordMismatch,

    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Quantity must be at least 1")]
    InvalidQuantity,

    #[error("Not enough stock: {available} left, {requested} requested")]
    InsufficientStock { available: u32, requested: u32 },

    #[error("Order is not pending")]
    NotPending,

    #[error("Order has not been delivered yet")]
    NotDelivered,

    #[error("Rating must be between 1 and 5")]
    InvalidRating,

    #[error("Message needs text or an image")]
    EmptyMessage,

    #[error("A group chat needs at least two other members")]
    GroupTooSmall,

    #[error("Not signed in")]
    NotSignedIn,

    #[error("Permission denied")]
    Forbidden,

    #[error("Record not found")]
    NotFound,
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, AppError>;
