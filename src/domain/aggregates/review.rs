//! Review Aggregate

use serde::{Deserialize, Serialize};
use super::product::ProductId;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: i64,
    #[serde(default)] pub product_id: Option<ProductId>,
    #[serde(default, deserialize_with = "super::null_as_default")] pub author: String,
    #[serde(default, deserialize_with = "super::null_as_default")] pub content: String,
    #[serde(default, deserialize_with = "super::null_as_default")] pub rating: i32,
    #[serde(default)] pub created_at: Option<String>,
}

impl Review {
    pub fn rating_label(&self) -> String { format!("{} / 5", self.rating) }
}
