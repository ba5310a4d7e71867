//! Catalog page state. Changes only through [`CatalogState::apply`]; the view
//! is derived from it with [`CatalogState::view`].

use crate::domain::aggregates::{Product, ProductId};
use crate::domain::events::CatalogAction;
use crate::domain::value_objects::CategoryFilter;
use crate::session::Viewer;
use crate::view::catalog::{self, CatalogView};
use crate::PAGE_SIZE;

#[derive(Clone, Debug, PartialEq)]
pub struct CatalogState {
    viewer: Viewer,
    catalog: Vec<Product>,
    category: CategoryFilter,
    search: String,
    page: usize,
    page_size: usize,
}

impl CatalogState {
    pub fn new(viewer: Viewer) -> Self {
        Self { viewer, catalog: Vec::new(), category: CategoryFilter::All, search: String::new(), page: 1, page_size: PAGE_SIZE }
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self { self.page_size = page_size.max(1); self }

    pub fn viewer(&self) -> &Viewer { &self.viewer }
    pub fn catalog(&self) -> &[Product] { &self.catalog }
    pub fn category(&self) -> &CategoryFilter { &self.category }
    pub fn search(&self) -> &str { &self.search }
    pub fn page(&self) -> usize { self.page }
    pub fn find(&self, id: ProductId) -> Option<&Product> { self.catalog.iter().find(|p| p.id == id) }

    pub fn total_pages(&self) -> usize {
        catalog::total_pages(catalog::filter(&self.catalog, &self.category, &self.search).len(), self.page_size)
    }

    /// Anything that changes which products match sends the viewer back to page 1.
    pub fn apply(&mut self, action: CatalogAction) {
        match action {
            CatalogAction::CatalogLoaded(products) => { self.catalog = products; self.page = 1; }
            CatalogAction::CategoryChanged(filter) => { self.category = filter; self.page = 1; }
            CatalogAction::SearchChanged(term) => { self.search = term; self.page = 1; }
            CatalogAction::PageSelected(page) => { self.page = catalog::clamp_page(page, self.total_pages()); }
        }
    }

    pub fn view(&self) -> CatalogView {
        catalog::render(&self.viewer, &self.catalog, &self.category, &self.search, self.page, self.page_size)
    }
}
