//! Greenleaf Storefront
//!
//! State layer for an organic-produce delivery shop: the customer catalog,
//! cart and checkout flow, and the admin side for inventory, orders and
//! revenue.
//!
//! ## Features
//! - Catalog with category filters, low-stock flags and a draft/commit editor
//! - Shopping cart and checkout with order history
//! - Phone + one-time-code sign-in and an admin PIN
//! - View navigation mirrored into a back/forward history
//! - Session persistence to a key-value store

use thiserror::Error;

pub mod auth;
pub mod backend;
pub mod config;
pub mod domain;
pub mod http;
pub mod navigation;
pub mod payment;
pub mod revenue;
pub mod storage;
pub mod store;

pub use backend::{Backend, BackendError, SimulatedBackend};
pub use config::StorefrontConfig;
pub use navigation::{History, HistoryEntry, MemoryHistory, Navigator, View};
pub use storage::{FileStorage, KeyValueStore, MemoryStorage, StorageError};
pub use store::{CheckoutForm, PaymentMethod, ShopOutcome, Storefront};

use domain::value_objects::PhoneError;

// =============================================================================
// Error Types
// =============================================================================

#[derive(Error, Debug)]
pub enum StorefrontError {
    #[error("Please enter your full name")]
    NameTooShort,

    #[error("Invalid phone number: {0}")]
    InvalidPhone(#[from] PhoneError),

    #[error("Delivery address is required")]
    AddressMissing,

    #[error("Enter the complete 4-digit code")]
    OtpIncomplete,

    #[error("The code you entered is incorrect")]
    OtpMismatch,

    #[error("No login code has been requested")]
    NoOtpRequested,

    #[error("A new code can be requested in {seconds}s")]
    ResendCooldown { seconds: u32 },

    #[error("Incorrect admin PIN")]
    WrongAdminPin,

    #[error("Please sign in to continue")]
    LoginRequired,

    #[error("Admin access required")]
    AdminRequired,

    #[error("Your cart is empty")]
    EmptyCart,

    #[error("Product not found: {0}")]
    ProductNotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, StorefrontError>;
