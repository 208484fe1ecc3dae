//! Cart Aggregate

use serde::{Deserialize, Serialize};
use crate::domain::aggregates::order::LineItem;
use crate::domain::aggregates::product::Product;
use crate::domain::value_objects::Money;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    items: Vec<CartItem>,
}

/// A product snapshot plus how many the shopper wants. `quantity` is never 0.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    #[serde(flatten)]
    pub product: Product,
    pub quantity: u32,
}

impl CartItem {
    pub fn id(&self) -> &str { &self.product.id }
    pub fn line_total(&self) -> Money { self.product.price.multiply(self.quantity) }
}

impl Cart {
    pub fn new() -> Self { Self::default() }

    /// Rebuilds a cart from stored entries, dropping any that carry no quantity.
    pub fn from_items(items: Vec<CartItem>) -> Self {
        Self { items: items.into_iter().filter(|i| i.quantity > 0).collect() }
    }

    pub fn items(&self) -> &[CartItem] { &self.items }
    pub fn item_count(&self) -> usize { self.items.len() }
    pub fn unit_count(&self) -> u32 { self.items.iter().map(|i| i.quantity).sum() }
    pub fn is_empty(&self) -> bool { self.items.is_empty() }
    pub fn get(&self, id: &str) -> Option<&CartItem> { self.items.iter().find(|i| i.id() == id) }

    pub fn add(&mut self, product: &Product) {
        if let Some(existing) = self.items.iter_mut().find(|i| i.id() == product.id) {
            existing.quantity = existing.quantity.saturating_add(1);
        } else {
            self.items.push(CartItem { product: product.clone(), quantity: 1 });
        }
    }

    /// Applies `delta` to the entry's quantity; an entry that reaches 0 is removed.
    /// Returns `false` when `id` is not in the cart.
    pub fn update_quantity(&mut self, id: &str, delta: i64) -> bool {
        let Some(item) = self.items.iter_mut().find(|i| i.id() == id) else { return false };
        let next = (i64::from(item.quantity) + delta).clamp(0, i64::from(u32::MAX));
        item.quantity = next as u32;
        self.items.retain(|i| i.quantity > 0);
        true
    }

    pub fn clear(&mut self) { self.items.clear(); }

    pub fn subtotal(&self) -> Money { self.items.iter().map(CartItem::line_total).sum() }

    pub fn to_line_items(&self) -> Vec<LineItem> {
        self.items.iter().map(|i| LineItem { name: i.product.name.clone(), qty: i.quantity, price: i.product.price }).collect()
    }

    pub fn summary(&self) -> String {
        self.items.iter().map(|i| format!("{} x{}", i.product.name, i.quantity)).collect::<Vec<_>>().join(", ")
    }
}
