//! Cart and bookmark request payloads. Cart state itself is owned by the cart service.

use serde::Serialize;
use crate::domain::value_objects::Won;
use super::product::{Product, ProductId};

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItemRequest { pub product_id: ProductId, pub quantity: u32 }

impl CartItemRequest {
    pub fn single(product_id: ProductId) -> Self { Self { product_id, quantity: 1 } }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookmarkRequest { pub product_id: ProductId, pub product_name: String, pub category: String, pub price: Won }

impl From<&Product> for BookmarkRequest {
    fn from(p: &Product) -> Self {
        Self { product_id: p.id, product_name: p.name.clone(), category: p.category.clone().unwrap_or_default(), price: p.price }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    #[test]
    fn test_cart_request_shape() {
        let body = serde_json::to_value(CartItemRequest::single(5)).unwrap();
        assert_eq!(body, serde_json::json!({"productId": 5, "quantity": 1}));
    }
    #[test]
    fn test_bookmark_from_product() {
        let p = Product::new(2, "Scone", Won::new(Decimal::new(3200, 0))).with_category("food");
        let b = BookmarkRequest::from(&p);
        assert_eq!(b.product_name, "Scone");
        assert_eq!(b.category, "food");
        let body = serde_json::to_value(&b).unwrap();
        assert_eq!(body["productId"], 2);
        assert_eq!(body["price"].as_f64(), Some(3200.0));
    }
}
