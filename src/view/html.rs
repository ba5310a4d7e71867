//! Server-rendered pages. The templates under `templates/` escape every value they print.

use askama::Template;

use super::catalog::{CatalogView, DeletePrompt};
use super::detail::ProductDetail;
use super::order::OrderPageView;
use super::reviews::ReviewListView;
use crate::domain::value_objects::CategoryFilter;
use crate::form::ProductForm;
use crate::ui::Notification;
use crate::Result;

/// Link back to the catalog with the given filter state.
pub fn catalog_href(category: &CategoryFilter, search: &str, page: usize) -> String {
    format!(
        "/products?category={}&search={}&page={}",
        urlencoding::encode(category.as_query()),
        urlencoding::encode(search),
        page
    )
}

/// A prepared catalog link. `href` is already url-encoded.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Link { pub href: String, pub label: String, pub active: bool }

#[derive(Template)]
#[template(path = "catalog.html")]
pub struct CatalogTemplate<'a> {
    pub title: &'a str,
    pub view: &'a CatalogView,
    pub filter_links: Vec<Link>,
    pub page_links: Vec<Link>,
    pub active_category: &'a str,
    pub detail: Option<&'a ProductDetail>,
    pub form: Option<&'a ProductForm>,
    pub prompt: Option<&'a DeletePrompt>,
    pub notes: &'a [Notification],
}

impl<'a> CatalogTemplate<'a> {
    pub fn new(view: &'a CatalogView, notes: &'a [Notification]) -> Self {
        let active = view.filters.iter().find(|f| f.active).map(|f| &f.filter);
        let filter_links = view
            .filters
            .iter()
            .map(|f| Link { href: catalog_href(&f.filter, &view.search_term, 1), label: f.label.clone(), active: f.active })
            .collect();
        let category = active.cloned().unwrap_or_default();
        let page_links = view
            .pagination
            .iter()
            .flat_map(|p| p.pages.iter())
            .map(|p| Link { href: catalog_href(&category, &view.search_term, p.number), label: p.number.to_string(), active: p.current })
            .collect();
        Self {
            title: view.chrome.title,
            view,
            filter_links,
            page_links,
            active_category: active.map_or("ALL", |f| f.as_query()),
            detail: None,
            form: None,
            prompt: None,
            notes,
        }
    }

    pub fn with_detail(mut self, detail: Option<&'a ProductDetail>) -> Self { self.detail = detail; self }
    pub fn with_form(mut self, form: Option<&'a ProductForm>) -> Self { self.form = form; self }
    pub fn with_prompt(mut self, prompt: Option<&'a DeletePrompt>) -> Self { self.prompt = prompt; self }
}

#[derive(Template)]
#[template(path = "order.html")]
pub struct OrderTemplate<'a> {
    pub title: &'a str,
    pub view: &'a OrderPageView,
    pub notes: &'a [Notification],
}

#[derive(Template)]
#[template(path = "reviews.html")]
pub struct ReviewsTemplate<'a> {
    pub title: &'a str,
    pub view: &'a ReviewListView,
    pub notes: &'a [Notification],
}

pub fn catalog_page(template: CatalogTemplate<'_>) -> Result<String> {
    Ok(template.render()?)
}

pub fn order_page(view: &OrderPageView, notes: &[Notification]) -> Result<String> {
    Ok(OrderTemplate { title: "Order detail", view, notes }.render()?)
}

pub fn reviews_page(view: &ReviewListView, notes: &[Notification]) -> Result<String> {
    Ok(ReviewsTemplate { title: "Reviews", view, notes }.render()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::aggregates::Product;
    use crate::domain::value_objects::Won;
    use crate::session::{UserId, Viewer};
    use crate::view::catalog::render;
    use crate::view::detail::find_detail;
    use rust_decimal::Decimal;

    fn latte(name: &str) -> Vec<Product> {
        vec![Product::new(1, name, Won::new(Decimal::new(4500, 0))).with_stock(3).with_category("drink")]
    }

    #[test]
    fn test_catalog_href_encodes() {
        assert_eq!(catalog_href(&CategoryFilter::All, "iced latte", 2), "/products?category=ALL&search=iced%20latte&page=2");
    }

    #[test]
    fn test_catalog_markup_for_owner() {
        let view = render(&Viewer::owner(None), &latte("<Latte>"), &CategoryFilter::All, "", 1, 7);
        let notes = [Notification::success("Saved.")];
        let form = ProductForm::blank();
        let html = catalog_page(CatalogTemplate::new(&view, &notes).with_form(Some(&form))).unwrap();
        assert!(html.contains("&lt;Latte&gt;"));
        assert!(!html.contains("<Latte>"));
        assert!(html.contains("4,500원"));
        assert!(html.contains("href=\"/products/1/delete\""));
        assert!(!html.contains("onsubmit"));
        assert!(html.contains("Add product"));
        assert!(html.contains("alert-success"));
        assert!(html.contains("id=\"productModal\""));
        assert!(!html.contains("/products/1/cart"));
    }

    #[test]
    fn test_catalog_markup_for_user() {
        let view = render(&Viewer::user(Some(UserId::new("5"))), &latte("Latte"), &CategoryFilter::All, "iced tea", 1, 7);
        let html = catalog_page(CatalogTemplate::new(&view, &[])).unwrap();
        assert!(html.contains("action=\"/products/1/cart\""));
        assert!(html.contains("action=\"/products/1/favorite\""));
        assert!(html.contains("search=iced%20tea&page=1"));
        assert!(!html.contains("/products/1/delete"));
    }

    #[test]
    fn test_detail_and_delete_prompt() {
        let products = latte("Latte & Cream");
        let view = render(&Viewer::owner(None), &products, &CategoryFilter::All, "", 1, 7);
        let detail = find_detail(&products, 1).unwrap();
        let prompt = DeletePrompt::for_product(&products[0]);
        let html = catalog_page(CatalogTemplate::new(&view, &[]).with_detail(Some(&detail)).with_prompt(Some(&prompt))).unwrap();
        assert!(html.contains("id=\"productDetail\""));
        assert!(html.contains("Latte &amp; Cream"));
        assert!(html.contains("Do you really want to delete this product?"));
        assert!(html.contains("name=\"confirmed\" value=\"true\""));
    }

    #[test]
    fn test_order_page_error_box() {
        let view = OrderPageView { loading: false, error: Some("Order not found.".into()), detail: None };
        let html = order_page(&view, &[]).unwrap();
        assert!(html.contains("id=\"error\""));
        assert!(!html.contains("tableCard"));
    }

    #[test]
    fn test_reviews_page_escapes_content() {
        let view = ReviewListView { scope: "All".into(), rows: vec![] };
        let html = reviews_page(&view, &[Notification::error("<b>down</b>")]).unwrap();
        assert!(html.contains("&lt;b&gt;down&lt;/b&gt;"));
        assert!(html.contains("id=\"currentProductId\">All<"));
    }
}
