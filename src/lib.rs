//! Cafe Storefront
//!
//! Presentation layer of the cafe ordering application, as headless page
//! controllers whose render functions return plain view trees.
//!
//! ## Pages
//! - Product catalog: role-gated rows, category + search filtering, client-side paging
//! - Product detail: expanded nutritional view from the cached catalog
//! - Order detail: line items, totals and status badge for one order
//! - Reviews: all reviews, or the reviews of one product
//!
//! Backend services are reached through [`api::Backend`]; session identity
//! through [`session::SessionStore`]; notifications, confirmation and
//! navigation through [`ui::Ui`]. [`gateway`] serves the pages over HTTP.

use thiserror::Error;

pub mod api;
pub mod config;
pub mod controller;
pub mod domain;
pub mod form;
pub mod gateway;
pub mod pages;
pub mod policy;
pub mod session;
pub mod state;
pub mod ui;
pub mod view;

pub use domain::aggregates::{Order, OrderItem, Product, ProductId, ProductPayload, Review};
pub use domain::value_objects::{CategoryFilter, FieldValue, Won};
pub use session::{Role, UserId, Viewer};

/// Products shown per catalog page.
pub const PAGE_SIZE: usize = 7;

/// Where viewers without a usable identity are sent.
pub const LOGIN_ROUTE: &str = "/login";

// =============================================================================
// Error Types
// =============================================================================

#[derive(Error, Debug)]
pub enum StorefrontError {
    #[error("Network error: {0}")]
    Transport(String),

    #[error("Request timed out")]
    Timeout,

    #[error("Request failed ({status}) {body}")]
    Status { status: u16, body: String },

    #[error("Malformed response: {0}")]
    Decode(String),

    #[error("Login required")]
    LoginRequired,

    #[error("Session has no user id")]
    MissingUserId,

    #[error("Only the {} account may do this", .required.display_name())]
    PermissionDenied { required: Role },

    #[error("Product {0} not found")]
    ProductNotFound(ProductId),

    #[error("Order not found")]
    OrderNotFound,

    #[error("Invalid input: {0}")]
    InvalidForm(String),

    #[error("Product {0} is sold out")]
    SoldOut(ProductId),

    #[error("The same request is already in progress")]
    RequestInFlight,

    #[error("Template error: {0}")]
    Render(#[from] askama::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl StorefrontError {
    /// Failures that mean the session identity is unusable.
    pub fn is_identity(&self) -> bool { matches!(self, Self::LoginRequired | Self::MissingUserId) }
}

pub type Result<T> = std::result::Result<T, StorefrontError>;
