//! In-memory stand-in for the cafe services, shared by the integration tests.
#![allow(dead_code)]

use async_trait::async_trait;
use rust_decimal::Decimal;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use cafe_storefront::api::Backend;
use cafe_storefront::domain::aggregates::{BookmarkRequest, CartItemRequest, OrderId};
use cafe_storefront::{Order, OrderItem, Product, ProductId, ProductPayload, Result, Review, StorefrontError, UserId, Won};

#[derive(Default)]
pub struct MockBackend {
    pub products: Mutex<Vec<Product>>,
    pub fail_list: Mutex<bool>,
    pub fail_writes: Mutex<Option<u16>>,
    pub lists: AtomicUsize,
    pub creates: Mutex<Vec<ProductPayload>>,
    pub updates: Mutex<Vec<(ProductId, ProductPayload)>>,
    pub deletes: AtomicUsize,
    pub cart: Mutex<Vec<(UserId, CartItemRequest)>>,
    pub bookmarks: Mutex<Vec<(UserId, BookmarkRequest)>>,
    pub orders: Mutex<Vec<(String, OrderId)>>,
    pub review_queries: Mutex<Vec<Option<ProductId>>>,
}

impl MockBackend {
    pub fn with_products(products: Vec<Product>) -> Arc<Self> {
        Arc::new(Self { products: Mutex::new(products), ..Default::default() })
    }
    pub fn requests(&self) -> usize {
        self.creates.lock().unwrap().len()
            + self.updates.lock().unwrap().len()
            + self.deletes.load(Ordering::SeqCst)
            + self.cart.lock().unwrap().len()
            + self.bookmarks.lock().unwrap().len()
    }
    fn write_result(&self) -> Result<()> {
        match *self.fail_writes.lock().unwrap() {
            Some(status) => Err(StorefrontError::Status { status, body: "nope".into() }),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl Backend for MockBackend {
    async fn list_products(&self) -> Result<Vec<Product>> {
        self.lists.fetch_add(1, Ordering::SeqCst);
        if *self.fail_list.lock().unwrap() {
            return Err(StorefrontError::Transport("connection refused".into()));
        }
        Ok(self.products.lock().unwrap().clone())
    }
    async fn get_product(&self, id: ProductId) -> Result<Product> {
        self.products.lock().unwrap().iter().find(|p| p.id == id).cloned().ok_or(StorefrontError::ProductNotFound(id))
    }
    async fn create_product(&self, payload: &ProductPayload) -> Result<()> {
        self.write_result()?;
        self.creates.lock().unwrap().push(payload.clone());
        Ok(())
    }
    async fn update_product(&self, id: ProductId, payload: &ProductPayload) -> Result<()> {
        self.write_result()?;
        self.updates.lock().unwrap().push((id, payload.clone()));
        Ok(())
    }
    async fn delete_product(&self, id: ProductId) -> Result<()> {
        tokio::time::sleep(Duration::from_millis(50)).await;
        self.write_result()?;
        self.deletes.fetch_add(1, Ordering::SeqCst);
        self.products.lock().unwrap().retain(|p| p.id != id);
        Ok(())
    }
    async fn add_cart_item(&self, user: &UserId, item: &CartItemRequest) -> Result<()> {
        self.write_result()?;
        self.cart.lock().unwrap().push((user.clone(), item.clone()));
        Ok(())
    }
    async fn add_bookmark(&self, user: &UserId, bookmark: &BookmarkRequest) -> Result<()> {
        self.write_result()?;
        self.bookmarks.lock().unwrap().push((user.clone(), bookmark.clone()));
        Ok(())
    }
    async fn get_order(&self, user: &UserId, id: OrderId) -> Result<Order> {
        self.orders.lock().unwrap().push((user.as_str().to_string(), id));
        match id {
            404 => Err(StorefrontError::OrderNotFound),
            500 => Err(StorefrontError::Status { status: 500, body: String::new() }),
            _ => Ok(Order {
                id: Some(id),
                status: Some("PAID".into()),
                items: vec![OrderItem { product_name: Some("Latte".into()), unit_price: Some(won(4500)), quantity: Some(2), ..Default::default() }],
                payment_method: Some("CARD".into()),
                ..Default::default()
            }),
        }
    }
    async fn list_reviews(&self, product: Option<ProductId>) -> Result<Vec<Review>> {
        self.review_queries.lock().unwrap().push(product);
        let all = vec![
            Review { id: 1, product_id: Some(1), author: "kim".into(), content: "good".into(), rating: 5, created_at: None },
            Review { id: 2, product_id: Some(2), author: "lee".into(), content: "ok".into(), rating: 3, created_at: None },
        ];
        Ok(all.into_iter().filter(|r| product.is_none() || r.product_id == product).collect())
    }
}

pub fn won(n: i64) -> Won { Won::new(Decimal::new(n, 0)) }

pub fn catalog(n: i64) -> Vec<Product> {
    (1..=n).map(|i| Product::new(i, format!("Item {i}"), won(1000 * i)).with_stock(5).with_category(if i % 2 == 0 { "food" } else { "drink" })).collect()
}

