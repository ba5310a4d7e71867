//! Catalog view events. Every change to the catalog page state goes through one of these.
use crate::domain::aggregates::Product;
use crate::domain::value_objects::CategoryFilter;

#[derive(Clone, Debug)]
pub enum CatalogAction {
    /// A successful fetch replaced the whole catalog.
    CatalogLoaded(Vec<Product>),
    CategoryChanged(CategoryFilter),
    SearchChanged(String),
    PageSelected(usize),
}
