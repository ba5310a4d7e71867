//! [`Backend`] over HTTP with reqwest.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, error, info_span, Instrument};
use uuid::Uuid;

use super::{Backend, BOOKMARKS_PATH, CART_ITEMS_PATH, ORDERS_PATH, PRODUCTS_PATH, REQUEST_ID_HEADER, REVIEWS_PATH, USER_ID_HEADER};
use crate::config::Config;
use crate::domain::aggregates::{BookmarkRequest, CartItemRequest, Order, OrderId, Product, ProductId, ProductPayload, Review};
use crate::session::UserId;
use crate::{Result, StorefrontError};

impl From<reqwest::Error> for StorefrontError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Timeout
        } else if e.is_decode() {
            Self::Decode(e.to_string())
        } else {
            Self::Transport(e.to_string())
        }
    }
}

#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: String,
}

impl HttpBackend {
    /// Every request is bounded by `timeout`; a hung service fails the action instead of stalling it.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, base_url: base_url.trim_end_matches('/').to_string() })
    }

    pub fn from_config(config: &Config) -> Result<Self> { Self::new(&config.api_base_url, config.request_timeout) }

    pub fn base_url(&self) -> &str { &self.base_url }

    fn url(&self, path: &str) -> String { format!("{}{}", self.base_url, path) }

    /// Sends the request and turns any non-2xx status into [`StorefrontError::Status`].
    async fn send(&self, request: RequestBuilder, method: &'static str, path: &str) -> Result<Response> {
        let request_id = Uuid::new_v4();
        let span = info_span!("backend", method, path, %request_id);
        async move {
            let response = request.header(REQUEST_ID_HEADER, request_id.to_string()).send().await.map_err(|e| {
                error!(error = %e, "request failed");
                StorefrontError::from(e)
            })?;
            let status = response.status();
            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                error!(status = status.as_u16(), body = %body, "request rejected");
                return Err(StorefrontError::Status { status: status.as_u16(), body });
            }
            debug!(status = status.as_u16(), "request ok");
            Ok(response)
        }
        .instrument(span)
        .await
    }

    async fn json<T: DeserializeOwned>(response: Response) -> Result<T> { Ok(response.json().await?) }
}

fn not_found_as(err: StorefrontError, replacement: StorefrontError) -> StorefrontError {
    match err {
        StorefrontError::Status { status, .. } if status == StatusCode::NOT_FOUND.as_u16() => replacement,
        other => other,
    }
}

#[async_trait]
impl Backend for HttpBackend {
    async fn list_products(&self) -> Result<Vec<Product>> {
        let response = self.send(self.client.get(self.url(PRODUCTS_PATH)), "GET", PRODUCTS_PATH).await?;
        // a null body is an empty catalog
        let products: Option<Vec<Product>> = Self::json(response).await?;
        Ok(products.unwrap_or_default())
    }

    async fn get_product(&self, id: ProductId) -> Result<Product> {
        let path = format!("{}/{}", PRODUCTS_PATH, id);
        let response = self.send(self.client.get(self.url(&path)), "GET", &path).await.map_err(|e| not_found_as(e, StorefrontError::ProductNotFound(id)))?;
        Self::json(response).await
    }

    async fn create_product(&self, payload: &ProductPayload) -> Result<()> {
        self.send(self.client.post(self.url(PRODUCTS_PATH)).json(payload), "POST", PRODUCTS_PATH).await?;
        Ok(())
    }

    async fn update_product(&self, id: ProductId, payload: &ProductPayload) -> Result<()> {
        let path = format!("{}/{}", PRODUCTS_PATH, id);
        self.send(self.client.put(self.url(&path)).json(payload), "PUT", &path).await?;
        Ok(())
    }

    async fn delete_product(&self, id: ProductId) -> Result<()> {
        let path = format!("{}/{}", PRODUCTS_PATH, id);
        self.send(self.client.delete(self.url(&path)), "DELETE", &path).await?;
        Ok(())
    }

    async fn add_cart_item(&self, user: &UserId, item: &CartItemRequest) -> Result<()> {
        let request = self.client.post(self.url(CART_ITEMS_PATH)).header(USER_ID_HEADER, user.as_str()).json(item);
        self.send(request, "POST", CART_ITEMS_PATH).await?;
        Ok(())
    }

    async fn add_bookmark(&self, user: &UserId, bookmark: &BookmarkRequest) -> Result<()> {
        let request = self.client.post(self.url(BOOKMARKS_PATH)).header(USER_ID_HEADER, user.as_str()).json(bookmark);
        self.send(request, "POST", BOOKMARKS_PATH).await?;
        Ok(())
    }

    async fn get_order(&self, user: &UserId, id: OrderId) -> Result<Order> {
        let path = format!("{}/{}", ORDERS_PATH, id);
        let request = self.client.get(self.url(&path)).header(USER_ID_HEADER, user.as_str()).header(reqwest::header::ACCEPT, "application/json");
        let response = self.send(request, "GET", &path).await.map_err(|e| not_found_as(e, StorefrontError::OrderNotFound))?;
        Self::json(response).await
    }

    async fn list_reviews(&self, product: Option<ProductId>) -> Result<Vec<Review>> {
        let mut request = self.client.get(self.url(REVIEWS_PATH));
        if let Some(id) = product {
            request = request.query(&[("productId", id)]);
        }
        let response = self.send(request, "GET", REVIEWS_PATH).await?;
        let reviews: Option<Vec<Review>> = Self::json(response).await?;
        Ok(reviews.unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    #[test]
    fn test_base_url_trimmed() {
        let backend = HttpBackend::new("http://localhost:8080/", Duration::from_secs(1)).unwrap();
        assert_eq!(backend.base_url(), "http://localhost:8080");
        assert_eq!(backend.url(PRODUCTS_PATH), "http://localhost:8080/api/products");
    }
    #[test]
    fn test_not_found_mapping() {
        let err = not_found_as(StorefrontError::Status { status: 404, body: String::new() }, StorefrontError::OrderNotFound);
        assert!(matches!(err, StorefrontError::OrderNotFound));
        let err = not_found_as(StorefrontError::Status { status: 500, body: String::new() }, StorefrontError::OrderNotFound);
        assert!(matches!(err, StorefrontError::Status { status: 500, .. }));
    }
}
