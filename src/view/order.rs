//! Order detail view.

use crate::domain::aggregates::{Order, OrderItem, StatusBadge};
use super::format_timestamp;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OrderDetailView {
    pub order_no: String,
    pub badge: StatusBadge,
    pub item_count: i64,
    pub total: String,
    pub meta: String,
    pub lines: Vec<OrderLineView>,
}

/// What the order page shows: a spinner while loading, then either the order or an inline error box.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OrderPageView {
    pub loading: bool,
    pub error: Option<String>,
    pub detail: Option<OrderDetailView>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OrderLineView {
    pub name: String,
    pub image_url: Option<String>,
    pub meta: Option<String>,
    pub unit_price: String,
    pub quantity: i64,
    pub subtotal: String,
}

fn render_line(item: &OrderItem) -> OrderLineView {
    OrderLineView {
        name: item.display_name(),
        image_url: item.image_url.clone().filter(|u| !u.is_empty()),
        meta: item.meta_line(),
        unit_price: item.unit_price.unwrap_or_default().to_string(),
        quantity: item.quantity.unwrap_or(0),
        subtotal: item.subtotal().to_string(),
    }
}

pub fn render_order(order: &Order) -> OrderDetailView {
    let item_count = order.item_count();
    let mut meta = Vec::new();
    if let Some(at) = order.placed_at() { meta.push(format_timestamp(at)); }
    if let Some(method) = order.payment_method.as_deref().filter(|m| !m.is_empty()) { meta.push(format!("Payment: {}", method)); }
    meta.push(format!("{} items", item_count));
    OrderDetailView {
        order_no: format!("#{}", order.id.map(|id| id.to_string()).unwrap_or_else(|| "---".to_string())),
        badge: order.status().badge(),
        item_count,
        total: order.total().to_string(),
        meta: meta.join(" · "),
        lines: order.items.iter().map(render_line).collect(),
    }
}
