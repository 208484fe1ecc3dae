//! Order Aggregate

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use crate::domain::value_objects::Money;

/// Display format for order dates, e.g. "Oct 25, 2023".
pub const ORDER_DATE_FORMAT: &str = "%b %d, %Y";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: String,
    pub customer_name: String,
    pub items: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub detailed_items: Vec<LineItem>,
    pub total: Money,
    pub status: OrderStatus,
    pub date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)] pub struct LineItem { pub name: String, pub qty: u32, pub price: Money }

impl LineItem {
    pub fn total(&self) -> Money { self.price.multiply(self.qty) }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderStatus { #[default] Pending, Paid, Packed, Shipped }

impl OrderStatus {
    /// Administrative advancement: Pending → Paid → Packed → Shipped → Pending.
    pub fn next(self) -> Self {
        match self {
            Self::Pending => Self::Paid,
            Self::Paid => Self::Packed,
            Self::Packed => Self::Shipped,
            Self::Shipped => Self::Pending,
        }
    }

    /// Label shown to the customer.
    pub fn label(self) -> &'static str {
        match self {
            Self::Pending => "COD - Pending",
            Self::Paid => "Paid",
            Self::Packed => "Packed",
            Self::Shipped => "Shipped",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{:?}", self) }
}

/// Everything checkout knows when an order is placed.
#[derive(Clone, Debug)]
pub struct NewOrder {
    pub id: String,
    pub customer_name: String,
    pub lines: Vec<LineItem>,
    pub summary: String,
    pub status: OrderStatus,
    pub placed_on: NaiveDate,
    pub address: Option<String>,
    pub phone: Option<String>,
}

impl Order {
    pub fn place(new: NewOrder) -> Self {
        let total = new.lines.iter().map(LineItem::total).sum();
        Self {
            id: new.id,
            customer_name: new.customer_name,
            items: new.summary,
            detailed_items: new.lines,
            total,
            status: new.status,
            date: new.placed_on.format(ORDER_DATE_FORMAT).to_string(),
            address: new.address,
            phone: new.phone,
        }
    }

    /// Parsed placement date; `None` for dates not in the display format.
    pub fn placed_on(&self) -> Option<NaiveDate> { NaiveDate::parse_from_str(&self.date, ORDER_DATE_FORMAT).ok() }

    fn sequence(&self) -> Option<u64> { self.id.strip_prefix("#ORD-")?.parse().ok() }
}

/// Next `#ORD-NNN` id: one past the highest sequence number in `existing`.
pub fn next_order_id(existing: &[Order]) -> String {
    let next = existing.iter().filter_map(Order::sequence).max().unwrap_or(0) + 1;
    format!("#ORD-{:03}", next)
}

fn seed(id: &str, customer: &str, items: &str, total: i64, status: OrderStatus, date: &str) -> Order {
    Order {
        id: id.into(), customer_name: customer.into(), items: items.into(), detailed_items: vec![],
        total: Money::new(total), status, date: date.into(), address: None, phone: None,
    }
}

/// Demo order history shown before any real order is placed.
pub fn seed_orders() -> Vec<Order> {
    vec![
        seed("#ORD-001", "Sarah Johnson", "Organic Kale, Tomatoes...", 450, OrderStatus::Paid, "Oct 25, 2023"),
        seed("#ORD-002", "Michael Chen", "Fresh Carrots (5kg)", 325, OrderStatus::Pending, "Oct 25, 2023"),
        seed("#ORD-003", "Emma Wilson", "Mixed Herbs Box", 280, OrderStatus::Packed, "Oct 24, 2023"),
        seed("#ORD-004", "Robert Fox", "Spinach, Potatoes", 155, OrderStatus::Paid, "Oct 24, 2023"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    #[test]
    fn test_order_total_is_sum_of_lines() {
        let order = Order::place(NewOrder {
            id: "#ORD-005".into(), customer_name: "Asha".into(),
            lines: vec![
                LineItem { name: "Spinach".into(), qty: 2, price: Money::new(60) },
                LineItem { name: "Carrots".into(), qty: 1, price: Money::new(25) },
            ],
            summary: "Spinach x2, Carrots x1".into(), status: OrderStatus::Pending,
            placed_on: NaiveDate::from_ymd_opt(2024, 3, 9).unwrap(), address: None, phone: None,
        });
        assert_eq!(order.total.amount(), 145);
        assert_eq!(order.date, "Mar 09, 2024");
        assert_eq!(order.placed_on(), NaiveDate::from_ymd_opt(2024, 3, 9));
    }
    #[test]
    fn test_status_cycle() {
        let mut status = OrderStatus::Pending;
        for _ in 0..4 { status = status.next(); }
        assert_eq!(status, OrderStatus::Pending);
        assert_eq!(OrderStatus::Pending.next(), OrderStatus::Paid);
        assert_eq!(OrderStatus::Packed.next(), OrderStatus::Shipped);
    }
    #[test]
    fn test_next_order_id() {
        assert_eq!(next_order_id(&[]), "#ORD-001");
        assert_eq!(next_order_id(&seed_orders()), "#ORD-005");
        let mut odd = seed_orders();
        odd[0].id = "1700000000000".into();
        odd[1].id = "#ORD-1200".into();
        assert_eq!(next_order_id(&odd), "#ORD-1201");
    }
    #[test]
    fn test_stored_keys_match_browser_format() {
        let json = serde_json::to_value(&seed_orders()[1]).unwrap();
        assert_eq!(json["customerName"], "Michael Chen");
        assert_eq!(json["status"], "Pending");
        assert!(json.get("detailedItems").is_none());
    }
}
