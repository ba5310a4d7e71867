//! Review table.

use crate::domain::aggregates::{ProductId, Review};
use super::format_timestamp;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReviewListView { pub scope: String, pub rows: Vec<ReviewRow> }

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReviewRow { pub id: i64, pub author: String, pub content: String, pub rating: String, pub created_at: String }

pub fn render_reviews(product: Option<ProductId>, reviews: &[Review]) -> ReviewListView {
    ReviewListView {
        scope: product.map(|id| id.to_string()).unwrap_or_else(|| "All".to_string()),
        rows: reviews
            .iter()
            .map(|r| ReviewRow {
                id: r.id,
                author: r.author.clone(),
                content: r.content.clone(),
                rating: r.rating_label(),
                created_at: r.created_at.as_deref().map(format_timestamp).unwrap_or_default(),
            })
            .collect(),
    }
}
