//! Product Aggregate

use serde::{Deserialize, Serialize};
use crate::domain::value_objects::{FieldValue, Won, PLACEHOLDER};

pub type ProductId = i64;

/// Category tags offered as filter buttons and as the create-form default.
pub const KNOWN_CATEGORIES: &[&str] = &["drink", "food"];

/// A catalog entry as the product service returns it. Trusted as-is.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub price: Won,
    #[serde(default)]
    pub stock: Option<i64>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default, alias = "image_url")]
    pub image_url: Option<String>,
    #[serde(default)] pub size: Option<FieldValue>,
    #[serde(default)] pub calorie: Option<FieldValue>,
    #[serde(default)] pub description: Option<FieldValue>,
    #[serde(default)] pub allergy: Option<FieldValue>,
    #[serde(default)] pub fat: Option<FieldValue>,
    #[serde(default)] pub sugar: Option<FieldValue>,
    #[serde(default)] pub sodium: Option<FieldValue>,
    #[serde(default)] pub protein: Option<FieldValue>,
    #[serde(default)] pub caffeine: Option<FieldValue>,
}

impl Product {
    pub fn new(id: ProductId, name: impl Into<String>, price: Won) -> Self {
        Self {
            id, name: name.into(), price, stock: None, category: None, image_url: None,
            size: None, calorie: None, description: None, allergy: None,
            fat: None, sugar: None, sodium: None, protein: None, caffeine: None,
        }
    }

    pub fn with_stock(mut self, stock: i64) -> Self { self.stock = Some(stock); self }
    pub fn with_category(mut self, category: impl Into<String>) -> Self { self.category = Some(category.into()); self }

    /// Missing stock counts as sold out.
    pub fn is_sold_out(&self) -> bool { self.stock.map_or(true, |s| s <= 0) }
    pub fn stock_state(&self) -> StockState { if self.is_sold_out() { StockState::SoldOut } else { StockState::InStock } }
    pub fn category_kind(&self) -> CategoryKind { CategoryKind::classify(self.category.as_deref()) }
    pub fn category_label(&self) -> &str {
        match self.category.as_deref() { Some(c) if !c.is_empty() => c, _ => PLACEHOLDER }
    }
    pub fn name_contains(&self, needle_lowercase: &str) -> bool { self.name.to_lowercase().contains(needle_lowercase) }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CategoryKind { Drink, Food, Other }

impl CategoryKind {
    /// Korean tags are what the product service historically stored.
    pub fn classify(tag: Option<&str>) -> Self {
        match tag {
            Some("drink") | Some("음료") => Self::Drink,
            Some("food") | Some("푸드") => Self::Food,
            _ => Self::Other,
        }
    }
    pub fn icon(&self) -> &'static str {
        match self { Self::Drink => "bi-cup-straw", Self::Food => "bi-egg-fried", Self::Other => "bi-tag" }
    }
    pub fn css_class(&self) -> &'static str {
        match self { Self::Drink => "drink", Self::Food => "food", Self::Other => "" }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StockState { InStock, SoldOut }

impl StockState {
    pub fn label(&self) -> &'static str { match self { Self::InStock => "In stock", Self::SoldOut => "Sold out" } }
    pub fn icon(&self) -> &'static str { match self { Self::InStock => "bi-check-circle", Self::SoldOut => "bi-x-circle" } }
    pub fn css_class(&self) -> &'static str { match self { Self::InStock => "in-stock", Self::SoldOut => "sold-out" } }
}

/// Body of a create or update request. Absent descriptive fields are sent as `null`.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPayload {
    pub name: String,
    pub price: Won,
    pub stock: i32,
    pub category: String,
    pub image_url: Option<String>,
    pub calorie: Option<FieldValue>,
    pub description: Option<FieldValue>,
    pub allergy: Option<FieldValue>,
    pub fat: Option<FieldValue>,
    pub sugar: Option<FieldValue>,
    pub sodium: Option<FieldValue>,
    pub protein: Option<FieldValue>,
    pub caffeine: Option<FieldValue>,
}
