//! Aggregates module
pub mod product;
pub mod catalog;
pub mod cart;
pub mod order;
pub mod contact;
pub mod profile;

pub use product::{Category, NewProduct, Product, ProductPatch};
pub use catalog::Catalog;
pub use cart::{Cart, CartItem};
pub use order::{LineItem, NewOrder, Order, OrderStatus};
pub use contact::{ContactForm, ContactMessage};
pub use profile::CustomerProfile;
