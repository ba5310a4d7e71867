//! View trees. Render functions here are pure; [`html`] turns the trees into markup.
pub mod catalog;
pub mod detail;
pub mod html;
pub mod order;
pub mod reviews;

use chrono::{DateTime, NaiveDateTime};

pub use catalog::{CatalogView, Control, ControlKind, DeletePrompt, ProductRow};
pub use detail::ProductDetail;
pub use order::{OrderDetailView, OrderPageView};
pub use reviews::ReviewListView;

/// `YYYY-MM-DD HH:MM` for timestamps the services send; anything unparseable is shown as-is.
pub fn format_timestamp(raw: &str) -> String {
    const OUT: &str = "%Y-%m-%d %H:%M";
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return dt.format(OUT).to_string();
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return dt.format(OUT).to_string();
    }
    raw.to_string()
}
