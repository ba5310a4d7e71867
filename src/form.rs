//! Product input form: raw field text in, validated request body out.
//!
//! Nothing leaves this module unless the name is present, the price is a
//! non-negative number, and the stock is a whole number of at least zero.

use serde::{de, Deserialize, Deserializer};
use std::str::FromStr;
use validator::{Validate, ValidationErrors};

use crate::domain::aggregates::{Product, ProductId, ProductPayload, KNOWN_CATEGORIES};
use crate::domain::value_objects::{FieldValue, Won};
use crate::{Result, StorefrontError};

/// Field values exactly as typed. `id` is set when editing an existing product.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProductForm {
    #[serde(deserialize_with = "empty_string_as_none")]
    pub id: Option<ProductId>,
    pub name: String,
    pub price: String,
    pub stock: String,
    pub category: String,
    pub image_url: String,
    pub calorie: String,
    pub description: String,
    pub allergy: String,
    pub fat: String,
    pub sugar: String,
    pub sodium: String,
    pub protein: String,
    pub caffeine: String,
}

#[derive(Debug, Validate)]
struct ProductDraft {
    #[validate(length(min = 1, message = "name is required"))]
    name: String,
    #[validate(range(min = 0, message = "stock must not be negative"))]
    stock: i32,
    #[validate(length(min = 1, message = "category is required"))]
    category: String,
}

impl ProductForm {
    /// New product defaults: in stock, first known category.
    pub fn blank() -> Self {
        Self { stock: "1".into(), category: KNOWN_CATEGORIES[0].to_string(), ..Default::default() }
    }

    /// Stock is shown as an in-stock switch, `1` or `0`.
    pub fn from_product(product: &Product) -> Self {
        let text = |v: &Option<FieldValue>| v.as_ref().map(ToString::to_string).unwrap_or_default();
        Self {
            id: Some(product.id),
            name: product.name.clone(),
            price: product.price.amount().normalize().to_string(),
            stock: if product.is_sold_out() { "0" } else { "1" }.to_string(),
            category: product.category.clone().filter(|c| !c.is_empty()).unwrap_or_else(|| KNOWN_CATEGORIES[0].to_string()),
            image_url: product.image_url.clone().unwrap_or_default(),
            calorie: text(&product.calorie),
            description: text(&product.description),
            allergy: text(&product.allergy),
            fat: text(&product.fat),
            sugar: text(&product.sugar),
            sodium: text(&product.sodium),
            protein: text(&product.protein),
            caffeine: text(&product.caffeine),
        }
    }

    pub fn is_update(&self) -> bool { self.id.is_some() }
    pub fn title(&self) -> &'static str { if self.is_update() { "Edit product" } else { "Add product" } }
    pub fn in_stock(&self) -> bool { self.stock.trim() != "0" }

    /// Free-text inputs as (form name, label, current value).
    pub fn text_fields(&self) -> [(&'static str, &'static str, &str); 12] {
        [
            ("name", "Name", &self.name),
            ("price", "Price", &self.price),
            ("category", "Category", &self.category),
            ("imageUrl", "Image URL", &self.image_url),
            ("calorie", "Calories", &self.calorie),
            ("description", "Description", &self.description),
            ("allergy", "Allergens", &self.allergy),
            ("fat", "Fat", &self.fat),
            ("sugar", "Sugar", &self.sugar),
            ("sodium", "Sodium", &self.sodium),
            ("protein", "Protein", &self.protein),
            ("caffeine", "Caffeine", &self.caffeine),
        ]
    }

    pub fn to_payload(&self) -> Result<ProductPayload> {
        let price = Won::parse(&self.price).map_err(|e| StorefrontError::InvalidForm(format!("price: {}", e)))?;
        let stock_raw = self.stock.trim();
        let stock = i32::from_str(stock_raw)
            .map_err(|_| StorefrontError::InvalidForm(format!("stock: '{}' is not a whole number", stock_raw)))?;
        let draft = ProductDraft { name: self.name.trim().to_string(), stock, category: self.category.trim().to_string() };
        draft.validate().map_err(|e| StorefrontError::InvalidForm(describe(&e)))?;
        Ok(ProductPayload {
            name: draft.name,
            price,
            stock: draft.stock,
            category: draft.category,
            image_url: Some(self.image_url.trim()).filter(|u| !u.is_empty()).map(str::to_string),
            calorie: FieldValue::from_input(&self.calorie),
            description: FieldValue::from_input(&self.description),
            allergy: FieldValue::from_input(&self.allergy),
            fat: FieldValue::from_input(&self.fat),
            sugar: FieldValue::from_input(&self.sugar),
            sodium: FieldValue::from_input(&self.sodium),
            protein: FieldValue::from_input(&self.protein),
            caffeine: FieldValue::from_input(&self.caffeine),
        })
    }
}

fn describe(errors: &ValidationErrors) -> String {
    let mut messages: Vec<String> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| match &e.message {
                Some(m) => m.to_string(),
                None => format!("{}: {}", field, e.code),
            })
        })
        .collect();
    messages.sort();
    messages.join(", ")
}

fn empty_string_as_none<'de, D, T>(de: D) -> std::result::Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let opt = Option::<String>::deserialize(de)?;
    match opt.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => s.parse::<T>().map(Some).map_err(de::Error::custom),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn valid() -> ProductForm {
        ProductForm { name: "Latte".into(), price: "4500".into(), ..ProductForm::blank() }
    }

    #[test]
    fn test_valid_payload() {
        let payload = valid().to_payload().unwrap();
        assert_eq!(payload.price.amount(), Decimal::new(4500, 0));
        assert_eq!(payload.stock, 1);
        assert_eq!(payload.category, "drink");
        assert_eq!(payload.calorie, None);
        let body = serde_json::to_value(&payload).unwrap();
        assert!(body["imageUrl"].is_null());
    }

    #[test]
    fn test_rejects_not_a_number() {
        let form = ProductForm { price: "four thousand".into(), ..valid() };
        assert!(matches!(form.to_payload(), Err(StorefrontError::InvalidForm(m)) if m.starts_with("price")));
        let form = ProductForm { stock: "1.5".into(), ..valid() };
        assert!(matches!(form.to_payload(), Err(StorefrontError::InvalidForm(m)) if m.starts_with("stock")));
    }

    #[test]
    fn test_rejects_negative_and_blank() {
        assert!(ProductForm { price: "-100".into(), ..valid() }.to_payload().is_err());
        let err = ProductForm { stock: "-1".into(), ..valid() }.to_payload().unwrap_err();
        assert_eq!(err.to_string(), "Invalid input: stock must not be negative");
        let err = ProductForm { name: "   ".into(), ..valid() }.to_payload().unwrap_err();
        assert_eq!(err.to_string(), "Invalid input: name is required");
        assert!(ProductForm { stock: "0".into(), ..valid() }.to_payload().is_ok());
    }

    #[test]
    fn test_prefill_from_product() {
        let mut product = Product::new(3, "Mocha", Won::new(Decimal::new(5000, 0))).with_stock(12);
        product.calorie = serde_json::from_str("250").ok();
        let form = ProductForm::from_product(&product);
        assert_eq!(form.id, Some(3));
        assert_eq!(form.stock, "1");
        assert_eq!(form.price, "5000");
        assert_eq!(form.category, "drink");
        assert_eq!(form.calorie, "250");
        assert_eq!(form.title(), "Edit product");
        assert_eq!(ProductForm::blank().title(), "Add product");
    }

    #[test]
    fn test_form_decoding_empty_id() {
        let form: ProductForm = serde_json::from_str(r#"{"id":"","name":"Tea"}"#).unwrap();
        assert_eq!(form.id, None);
        let form: ProductForm = serde_json::from_str(r#"{"id":"8"}"#).unwrap();
        assert_eq!(form.id, Some(8));
    }
}
