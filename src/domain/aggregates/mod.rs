//! Aggregates module
pub mod product;
pub mod order;
pub mod cart;
pub mod review;

pub use product::{Product, ProductId, ProductPayload, CategoryKind, StockState, KNOWN_CATEGORIES};
pub use order::{Order, OrderId, OrderItem, OrderStatus, StatusBadge};
pub use cart::{CartItemRequest, BookmarkRequest};
pub use review::Review;

use serde::{Deserialize, Deserializer};

/// Decodes an explicit `null` the same way as a missing key.
pub(crate) fn null_as_default<'de, D, T>(de: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(de)?.unwrap_or_default())
}
