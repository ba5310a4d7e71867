//! Order Aggregate

use serde::{Deserialize, Serialize};
use crate::domain::value_objects::Won;

pub type OrderId = i64;

/// Order as returned by the order service. Most fields are optional; older
/// services name the timestamp differently, so all known spellings are kept.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[serde(default)] pub id: Option<OrderId>,
    #[serde(default)] pub status: Option<String>,
    #[serde(default)] pub items: Vec<OrderItem>,
    #[serde(default)] pub total_amount: Option<Won>,
    #[serde(default)] pub total_quantity: Option<i64>,
    #[serde(default)] pub created_at: Option<String>,
    #[serde(default)] pub order_date: Option<String>,
    #[serde(default)] pub ordered_at: Option<String>,
    #[serde(default)] pub order_time: Option<String>,
    #[serde(default)] pub payment_method: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    #[serde(default)] pub product_id: Option<i64>,
    #[serde(default)] pub product_name: Option<String>,
    #[serde(default)] pub name: Option<String>,
    #[serde(default)] pub unit_price: Option<Won>,
    #[serde(default)] pub quantity: Option<i64>,
    #[serde(default, alias = "image_url")] pub image_url: Option<String>,
    #[serde(default)] pub size: Option<String>,
    #[serde(default)] pub option: Option<String>,
    #[serde(default)] pub category: Option<String>,
}

impl OrderItem {
    pub fn subtotal(&self) -> Won { self.unit_price.unwrap_or_default().multiply(self.quantity.unwrap_or(0)) }

    pub fn display_name(&self) -> String {
        non_empty(&self.product_name)
            .or_else(|| non_empty(&self.name))
            .map(str::to_string)
            .unwrap_or_else(|| match self.product_id {
                Some(id) => format!("Product #{}", id),
                None => "Product #".to_string(),
            })
    }

    /// Size, option and category joined for the secondary line.
    pub fn meta_line(&self) -> Option<String> {
        let parts: Vec<&str> = [&self.size, &self.option, &self.category].into_iter().filter_map(non_empty).collect();
        if parts.is_empty() { None } else { Some(parts.join(" · ")) }
    }
}

impl Order {
    /// Falls back to the sum of line subtotals when the service omits the total.
    pub fn total(&self) -> Won { self.total_amount.unwrap_or_else(|| self.items.iter().map(OrderItem::subtotal).sum()) }
    pub fn item_count(&self) -> i64 { self.total_quantity.unwrap_or(self.items.len() as i64) }
    pub fn placed_at(&self) -> Option<&str> {
        [&self.created_at, &self.order_date, &self.ordered_at, &self.order_time].into_iter().find_map(non_empty)
    }
    pub fn status(&self) -> OrderStatus { OrderStatus::parse(self.status.as_deref()) }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OrderStatus { New, Paid, Completed, Cancelled, Other(String) }

impl OrderStatus {
    /// Absent status is a freshly placed order.
    pub fn parse(raw: Option<&str>) -> Self {
        let upper = raw.filter(|s| !s.is_empty()).unwrap_or("NEW").to_uppercase();
        match upper.as_str() {
            "NEW" => Self::New,
            "PAID" | "PROCESSING" => Self::Paid,
            "COMPLETED" => Self::Completed,
            "CANCELLED" | "CANCELED" | "FAILED" => Self::Cancelled,
            _ => Self::Other(upper),
        }
    }

    pub fn badge(&self) -> StatusBadge {
        let (label, background, text, icon) = match self {
            Self::New => ("NEW".to_string(), "bg-primary", "text-white", "bi-bag-plus"),
            Self::Paid => ("Paid".to_string(), "bg-warning", "text-dark", "bi-cash-coin"),
            Self::Completed => ("Completed".to_string(), "bg-success", "text-white", "bi-check2-circle"),
            Self::Cancelled => ("Cancelled".to_string(), "bg-danger", "text-white", "bi-x-circle"),
            Self::Other(raw) => (raw.clone(), "bg-secondary", "text-white", "bi-hourglass-split"),
        };
        StatusBadge { label, background, text, icon }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatusBadge { pub label: String, pub background: &'static str, pub text: &'static str, pub icon: &'static str }

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    fn item(price: i64, qty: i64) -> OrderItem {
        OrderItem { unit_price: Some(Won::new(Decimal::new(price, 0))), quantity: Some(qty), ..Default::default() }
    }
    #[test]
    fn test_total_falls_back_to_lines() {
        let order = Order { items: vec![item(4500, 2), item(3000, 1)], ..Default::default() };
        assert_eq!(order.total().amount(), Decimal::new(12000, 0));
        assert_eq!(order.item_count(), 2);
        let order = Order { total_amount: Some(Won::new(Decimal::new(100, 0))), total_quantity: Some(7), ..order };
        assert_eq!(order.total().amount(), Decimal::new(100, 0));
        assert_eq!(order.item_count(), 7);
    }
    #[test]
    fn test_status_mapping() {
        assert_eq!(OrderStatus::parse(None), OrderStatus::New);
        assert_eq!(OrderStatus::parse(Some("processing")), OrderStatus::Paid);
        assert_eq!(OrderStatus::parse(Some("Canceled")), OrderStatus::Cancelled);
        assert_eq!(OrderStatus::parse(Some("shipped")).badge().label, "SHIPPED");
        assert_eq!(OrderStatus::Paid.badge().text, "text-dark");
    }
    #[test]
    fn test_item_display() {
        let mut it = OrderItem { product_id: Some(9), ..Default::default() };
        assert_eq!(it.display_name(), "Product #9");
        assert_eq!(it.meta_line(), None);
        it.name = Some("Mocha".into());
        it.size = Some("L".into());
        it.category = Some("drink".into());
        assert_eq!(it.display_name(), "Mocha");
        assert_eq!(it.meta_line().as_deref(), Some("L · drink"));
    }
    #[test]
    fn test_placed_at_aliases() {
        let order: Order = serde_json::from_str(r#"{"id":3,"orderDate":"2025-11-08T10:00:00"}"#).unwrap();
        assert_eq!(order.placed_at(), Some("2025-11-08T10:00:00"));
    }
}
