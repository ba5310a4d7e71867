//! Catalog pipeline: filter, paginate, render rows, render page controls.
//!
//! Everything here is a pure function of its arguments. Calling [`render`]
//! twice with the same inputs yields equal trees.

use crate::domain::aggregates::{Product, ProductId, KNOWN_CATEGORIES};
use crate::domain::value_objects::CategoryFilter;
use crate::policy::{self, Capability};
use crate::session::{Role, Viewer};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CatalogView {
    pub chrome: PageChrome,
    pub filters: Vec<FilterButton>,
    pub search_term: String,
    pub rows: Vec<ProductRow>,
    pub pagination: Option<Pagination>,
    pub current_page: usize,
    pub total_pages: usize,
    pub filtered_count: usize,
}

/// Role-dependent parts of the page around the table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PageChrome {
    pub title: &'static str,
    pub nav: Vec<NavLink>,
    pub show_add_product: bool,
    pub show_go_to_cart: bool,
    pub action_header: &'static str,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NavLink { pub href: &'static str, pub label: &'static str, pub active: bool }

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FilterButton { pub filter: CategoryFilter, pub label: String, pub active: bool }

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProductRow {
    pub id: ProductId,
    pub name: String,
    pub image_url: Option<String>,
    pub price: String,
    pub category: Badge,
    pub stock: Badge,
    pub controls: Vec<Control>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Badge { pub label: String, pub icon: &'static str, pub css_class: &'static str }

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ControlKind {
    Edit(ProductId),
    Delete(ProductId),
    AddToCart(ProductId),
    AddToFavorite(ProductId),
    /// Disabled indicator shown instead of buying actions.
    SoldOut,
}

impl ControlKind {
    /// Controls that navigate: editing opens the form, deleting opens the confirmation step.
    pub fn href(&self) -> Option<String> {
        match self {
            Self::Edit(id) => Some(format!("/products/{}/edit", id)),
            Self::Delete(id) => Some(format!("/products/{}/delete", id)),
            _ => None,
        }
    }

    /// Controls that submit straight away.
    pub fn post_action(&self) -> Option<String> {
        match self {
            Self::AddToCart(id) => Some(format!("/products/{}/cart", id)),
            Self::AddToFavorite(id) => Some(format!("/products/{}/favorite", id)),
            _ => None,
        }
    }

    pub fn css_class(&self) -> &'static str {
        match self {
            Self::Edit(_) => "btn-primary",
            Self::Delete(_) => "btn-danger",
            Self::AddToCart(_) => "btn-outline-coffee",
            Self::AddToFavorite(_) => "btn-outline-danger",
            Self::SoldOut => "btn-secondary",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Control { pub kind: ControlKind, pub label: &'static str, pub enabled: bool }

impl Control {
    fn for_capability(capability: Capability, id: ProductId) -> Option<Self> {
        let (kind, label) = match capability {
            Capability::EditProduct => (ControlKind::Edit(id), "Edit"),
            Capability::DeleteProduct => (ControlKind::Delete(id), "Delete"),
            Capability::AddToCart => (ControlKind::AddToCart(id), "Add to cart"),
            Capability::AddToFavorite => (ControlKind::AddToFavorite(id), "♡ Favorite"),
            Capability::CreateProduct => return None,
        };
        Some(Self { kind, label, enabled: true })
    }

    fn sold_out() -> Self { Self { kind: ControlKind::SoldOut, label: "Sold out", enabled: false } }

    pub fn is_actionable(&self) -> bool { self.enabled && self.kind != ControlKind::SoldOut }
}

/// Asked before a delete is sent.
pub const DELETE_QUESTION: &str = "Do you really want to delete this product?";

/// Confirmation step shown before a delete.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeletePrompt { pub id: ProductId, pub name: String, pub question: &'static str }

impl DeletePrompt {
    pub fn for_product(product: &Product) -> Self { Self { id: product.id, name: product.name.clone(), question: DELETE_QUESTION } }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Pagination { pub pages: Vec<PageControl> }

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageControl { pub number: usize, pub current: bool }

/// Keeps a product when the category matches and its name contains the
/// search term, ignoring case and surrounding whitespace.
pub fn filter<'a>(catalog: &'a [Product], category: &CategoryFilter, search: &str) -> Vec<&'a Product> {
    let needle = search.trim().to_lowercase();
    catalog
        .iter()
        .filter(|p| category.matches(p.category.as_deref()))
        .filter(|p| needle.is_empty() || p.name_contains(&needle))
        .collect()
}

/// Never less than one, so an empty result still has a page to be on.
pub fn total_pages(filtered: usize, page_size: usize) -> usize { filtered.div_ceil(page_size.max(1)).max(1) }

pub fn clamp_page(page: usize, total: usize) -> usize { page.clamp(1, total.max(1)) }

pub fn page_slice<T>(items: &[T], page: usize, page_size: usize) -> &[T] {
    let start = page.saturating_sub(1).saturating_mul(page_size).min(items.len());
    let end = start.saturating_add(page_size).min(items.len());
    &items[start..end]
}

pub fn render_row(product: &Product, viewer: &Viewer) -> ProductRow {
    let kind = product.category_kind();
    let stock = product.stock_state();
    let mut controls = Vec::new();
    for capability in Capability::ROW {
        if !policy::allows(viewer, capability) { continue; }
        if capability.needs_stock() && product.is_sold_out() {
            if !controls.iter().any(|c: &Control| c.kind == ControlKind::SoldOut) { controls.push(Control::sold_out()); }
            continue;
        }
        controls.extend(Control::for_capability(capability, product.id));
    }
    ProductRow {
        id: product.id,
        name: product.name.clone(),
        image_url: product.image_url.clone(),
        price: product.price.to_string(),
        category: Badge { label: product.category_label().to_string(), icon: kind.icon(), css_class: kind.css_class() },
        stock: Badge { label: stock.label().to_string(), icon: stock.icon(), css_class: stock.css_class() },
        controls,
    }
}

/// No controls at all for a single page.
pub fn render_pagination(total: usize, current: usize) -> Option<Pagination> {
    if total <= 1 { return None; }
    Some(Pagination { pages: (1..=total).map(|number| PageControl { number, current: number == current }).collect() })
}

pub fn render_filters(active: &CategoryFilter) -> Vec<FilterButton> {
    std::iter::once((CategoryFilter::All, "All".to_string()))
        .chain(KNOWN_CATEGORIES.iter().map(|tag| (CategoryFilter::Tag(tag.to_string()), capitalize(tag))))
        .map(|(filter, label)| FilterButton { active: &filter == active, filter, label })
        .collect()
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() { Some(first) => first.to_uppercase().chain(chars).collect(), None => String::new() }
}

pub fn render_chrome(viewer: &Viewer, current_path: &str) -> PageChrome {
    let links: &[(&'static str, &'static str)] = match viewer.role {
        Some(Role::Owner) => &[
            ("/products", "Products"),
            ("/orders/purchase", "Purchase orders"),
            ("/orders/purchase/history", "Purchase history"),
            ("/admin/users", "Users"),
        ],
        Some(Role::User) => &[("/products", "Products"), ("/cart", "Cart"), ("/orders", "Orders"), ("/favorites", "Favorites")],
        _ => &[("/products", "Products")],
    };
    let nav = links.iter().map(|&(href, label)| NavLink { href, label, active: current_path.starts_with(href) }).collect();
    let is_owner = viewer.has_role(&Role::Owner);
    let is_user = viewer.has_role(&Role::User);
    PageChrome {
        title: if is_owner { "Product management" } else { "Products" },
        nav,
        show_add_product: policy::allows(viewer, Capability::CreateProduct),
        show_go_to_cart: is_user,
        action_header: if is_owner { "Actions" } else if is_user { "Cart" } else { "" },
    }
}

/// The whole pipeline. `page` is clamped into the valid range.
pub fn render(viewer: &Viewer, catalog: &[Product], category: &CategoryFilter, search: &str, page: usize, page_size: usize) -> CatalogView {
    let filtered = filter(catalog, category, search);
    let total = total_pages(filtered.len(), page_size);
    let current = clamp_page(page, total);
    let rows = page_slice(&filtered, current, page_size).iter().map(|p| render_row(p, viewer)).collect();
    CatalogView {
        chrome: render_chrome(viewer, "/products"),
        filters: render_filters(category),
        search_term: search.to_string(),
        rows,
        pagination: render_pagination(total, current),
        current_page: current,
        total_pages: total,
        filtered_count: filtered.len(),
    }
}
