//! Pages other than the catalog.
pub mod order_detail;
pub mod reviews;

pub use order_detail::OrderDetailPage;
pub use reviews::ReviewsPage;
