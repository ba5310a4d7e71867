//! Backend services, seen only through their request/response contracts.

pub mod http;

use async_trait::async_trait;

use crate::domain::aggregates::{BookmarkRequest, CartItemRequest, Order, OrderId, Product, ProductId, ProductPayload, Review};
use crate::session::UserId;
use crate::Result;

pub use http::HttpBackend;

/// Identity header required by the cart, bookmark and order services.
pub const USER_ID_HEADER: &str = "X-USER-ID";
pub const REQUEST_ID_HEADER: &str = "X-Request-Id";

pub const PRODUCTS_PATH: &str = "/api/products";
pub const CART_ITEMS_PATH: &str = "/api/cart/items";
pub const BOOKMARKS_PATH: &str = "/api/bookmarks";
pub const ORDERS_PATH: &str = "/api/orders";
pub const REVIEWS_PATH: &str = "/api/reviews";

/// Every endpoint the pages call. A non-2xx status is an error; nothing is retried.
#[async_trait]
pub trait Backend: Send + Sync {
    async fn list_products(&self) -> Result<Vec<Product>>;
    async fn get_product(&self, id: ProductId) -> Result<Product>;
    async fn create_product(&self, payload: &ProductPayload) -> Result<()>;
    async fn update_product(&self, id: ProductId, payload: &ProductPayload) -> Result<()>;
    async fn delete_product(&self, id: ProductId) -> Result<()>;
    async fn add_cart_item(&self, user: &UserId, item: &CartItemRequest) -> Result<()>;
    async fn add_bookmark(&self, user: &UserId, bookmark: &BookmarkRequest) -> Result<()>;
    async fn get_order(&self, user: &UserId, id: OrderId) -> Result<Order>;
    /// All reviews when `product` is `None`.
    async fn list_reviews(&self, product: Option<ProductId>) -> Result<Vec<Review>>;
}
