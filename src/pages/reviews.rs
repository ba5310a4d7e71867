//! Reviews page: every review, or those of one product.

use std::sync::{Arc, Mutex};
use tracing::{error, info, warn};

use crate::api::Backend;
use crate::domain::aggregates::{ProductId, Review};
use crate::ui::{Notification, Ui};
use crate::view::reviews::{render_reviews, ReviewListView};
use crate::{Result, StorefrontError};

pub struct ReviewsPage {
    backend: Arc<dyn Backend>,
    ui: Arc<dyn Ui>,
    product: Mutex<Option<ProductId>>,
    reviews: Mutex<Vec<Review>>,
}

impl ReviewsPage {
    pub fn new(backend: Arc<dyn Backend>, ui: Arc<dyn Ui>, product: Option<ProductId>) -> Self {
        Self { backend, ui, product: Mutex::new(product), reviews: Mutex::new(Vec::new()) }
    }

    pub fn product(&self) -> Option<ProductId> { *self.product.lock().unwrap_or_else(|e| e.into_inner()) }

    pub fn view(&self) -> ReviewListView {
        render_reviews(self.product(), &self.reviews.lock().unwrap_or_else(|e| e.into_inner()))
    }

    /// Rows are replaced only after a successful fetch.
    pub async fn load(&self) -> Result<ReviewListView> {
        let product = self.product();
        match self.backend.list_reviews(product).await {
            Ok(reviews) => {
                info!(product_id = ?product, count = reviews.len(), "reviews loaded");
                *self.reviews.lock().unwrap_or_else(|e| e.into_inner()) = reviews;
                Ok(self.view())
            }
            Err(e) => {
                error!(product_id = ?product, error = %e, "review lookup failed");
                self.ui.notify(Notification::error("An error occurred while loading reviews."));
                Err(e)
            }
        }
    }

    /// Narrows to the product id typed by the viewer. Blank or non-numeric input sends nothing.
    pub async fn search(&self, input: &str) -> Result<ReviewListView> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            self.ui.notify(Notification::error("Please enter a product ID."));
            return Err(StorefrontError::InvalidForm("product id is required".into()));
        }
        let id = trimmed.parse::<ProductId>().map_err(|_| {
            warn!(input = %trimmed, "non-numeric product id");
            self.ui.notify(Notification::error("Product ID must be a number."));
            StorefrontError::InvalidForm(format!("'{}' is not a product id", trimmed))
        })?;
        *self.product.lock().unwrap_or_else(|e| e.into_inner()) = Some(id);
        self.load().await
    }

    pub async fn show_all(&self) -> Result<ReviewListView> {
        *self.product.lock().unwrap_or_else(|e| e.into_inner()) = None;
        self.load().await
    }
}
