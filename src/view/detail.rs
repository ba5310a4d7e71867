//! Expanded read-only product view, built from the cached catalog.

use crate::domain::aggregates::{Product, ProductId};
use crate::domain::value_objects::{display_or_placeholder, PLACEHOLDER};
use crate::{Result, StorefrontError};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProductDetail {
    pub id: ProductId,
    pub name: String,
    pub image_url: Option<String>,
    pub fields: Vec<DetailField>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DetailField { pub label: &'static str, pub value: String }

impl ProductDetail {
    pub fn field(&self, label: &str) -> Option<&str> {
        self.fields.iter().find(|f| f.label == label).map(|f| f.value.as_str())
    }
}

pub fn render_detail(product: &Product) -> ProductDetail {
    let fields = [
        ("Size", &product.size),
        ("Calories", &product.calorie),
        ("Description", &product.description),
        ("Allergens", &product.allergy),
        ("Fat", &product.fat),
        ("Sugar", &product.sugar),
        ("Sodium", &product.sodium),
        ("Protein", &product.protein),
        ("Caffeine", &product.caffeine),
    ]
    .into_iter()
    .map(|(label, value)| DetailField { label, value: display_or_placeholder(value.as_ref()) })
    .collect();
    ProductDetail {
        id: product.id,
        name: if product.name.is_empty() { PLACEHOLDER.to_string() } else { product.name.clone() },
        image_url: product.image_url.clone().filter(|u| !u.is_empty()),
        fields,
    }
}

/// Looks the product up in `catalog`; no request is made.
pub fn find_detail(catalog: &[Product], id: ProductId) -> Result<ProductDetail> {
    catalog.iter().find(|p| p.id == id).map(render_detail).ok_or(StorefrontError::ProductNotFound(id))
}
