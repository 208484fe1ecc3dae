//! Revenue and dashboard figures derived from the order list.

use chrono::NaiveDate;
use serde::Serialize;
use std::cmp::Reverse;
use std::collections::HashMap;

use crate::domain::aggregates::{Order, OrderStatus, Product};
use crate::domain::value_objects::Money;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DailyRevenue {
    pub date: String,
    pub revenue: Money,
    pub orders: u32,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RevenueReport {
    pub total_revenue: Money,
    pub order_count: usize,
    /// Newest day first; days whose date cannot be parsed come last.
    pub daily: Vec<DailyRevenue>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DashboardStats {
    pub total_orders: usize,
    pub total_revenue: Money,
    pub pending_orders: usize,
    pub low_stock_items: usize,
    pub contact_messages: usize,
}

pub fn revenue_report(orders: &[Order]) -> RevenueReport {
    let mut by_day: HashMap<&str, (Option<NaiveDate>, DailyRevenue)> = HashMap::new();
    for order in orders {
        let (_, day) = by_day.entry(order.date.as_str()).or_insert_with(|| {
            (order.placed_on(), DailyRevenue { date: order.date.clone(), revenue: Money::ZERO, orders: 0 })
        });
        day.revenue = day.revenue.add(order.total);
        day.orders += 1;
    }

    let mut days: Vec<_> = by_day.into_values().collect();
    days.sort_by(|(a_on, a), (b_on, b)| {
        (a_on.is_none(), Reverse(*a_on), &a.date).cmp(&(b_on.is_none(), Reverse(*b_on), &b.date))
    });

    RevenueReport {
        total_revenue: orders.iter().map(|o| o.total).sum(),
        order_count: orders.len(),
        daily: days.into_iter().map(|(_, day)| day).collect(),
    }
}

pub fn dashboard_stats(orders: &[Order], products: &[Product], contact_messages: usize) -> DashboardStats {
    DashboardStats {
        total_orders: orders.len(),
        total_revenue: orders.iter().map(|o| o.total).sum(),
        pending_orders: orders.iter().filter(|o| o.status == OrderStatus::Pending).count(),
        low_stock_items: products.iter().filter(|p| p.is_low_stock()).count(),
        contact_messages,
    }
}
