//! Store events, drained by the UI layer after each operation
use crate::domain::aggregates::OrderStatus;
use crate::domain::value_objects::Money;
use crate::navigation::View;
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StoreEvent {
    CartOpened,
    Navigated { from: View, to: View },
    OrderPlaced { order_id: String, total: Money },
    OrderStatusChanged { order_id: String, status: OrderStatus },
    CatalogCommitted { products: usize },
    ProductAdded { product_id: String },
    ProductDeleted { product_id: String },
    SignedIn { name: String },
    SignedOut,
    AdminUnlocked,
    ContactReceived { message_id: String },
}
