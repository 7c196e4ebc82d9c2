//! Core types for catalogd

use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;

/// A row in the `product` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub brand: String,
    pub category: String,
    pub price: f64,
    pub currency: String,
    pub stock: i64,
    pub ean: String,
    pub color: String,
    pub size: String,
    pub availability: String,
    pub internal_id: String,
}

/// Payload for creating a product. The identifier is assigned by the store.
///
/// `price` and `stock` accept either a number or a numeric string; clients
/// of the original service sent both.
#[derive(Debug, Clone, Deserialize)]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub brand: String,
    pub category: String,
    #[serde(deserialize_with = "lenient_f64")]
    pub price: f64,
    pub currency: String,
    #[serde(deserialize_with = "lenient_i64")]
    pub stock: i64,
    pub ean: String,
    pub color: String,
    pub size: String,
    pub availability: String,
    pub internal_id: String,
}

/// Partial update payload: absent fields leave the stored value untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub brand: Option<String>,
    pub category: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64_opt")]
    pub price: Option<f64>,
    pub currency: Option<String>,
    #[serde(default, deserialize_with = "lenient_i64_opt")]
    pub stock: Option<i64>,
    pub ean: Option<String>,
    pub color: Option<String>,
    pub size: Option<String>,
    pub availability: Option<String>,
    pub internal_id: Option<String>,
}

impl ProductPatch {
    /// Overlay the present fields onto an existing row.
    pub fn apply(self, product: &mut Product) {
        if let Some(name) = self.name {
            product.name = name;
        }
        if let Some(description) = self.description {
            product.description = description;
        }
        if let Some(brand) = self.brand {
            product.brand = brand;
        }
        if let Some(category) = self.category {
            product.category = category;
        }
        if let Some(price) = self.price {
            product.price = price;
        }
        if let Some(currency) = self.currency {
            product.currency = currency;
        }
        if let Some(stock) = self.stock {
            product.stock = stock;
        }
        if let Some(ean) = self.ean {
            product.ean = ean;
        }
        if let Some(color) = self.color {
            product.color = color;
        }
        if let Some(size) = self.size {
            product.size = size;
        }
        if let Some(availability) = self.availability {
            product.availability = availability;
        }
        if let Some(internal_id) = self.internal_id {
            product.internal_id = internal_id;
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString<T> {
    Number(T),
    String(String),
}

impl<T: std::str::FromStr> NumberOrString<T>
where
    T::Err: std::fmt::Display,
{
    fn resolve<E: serde::de::Error>(self) -> std::result::Result<T, E> {
        match self {
            NumberOrString::Number(n) => Ok(n),
            NumberOrString::String(s) => s.trim().parse().map_err(serde::de::Error::custom),
        }
    }
}

fn lenient_f64<'de, D>(deserializer: D) -> std::result::Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    NumberOrString::<f64>::deserialize(deserializer)?.resolve()
}

fn lenient_i64<'de, D>(deserializer: D) -> std::result::Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    NumberOrString::<i64>::deserialize(deserializer)?.resolve()
}

fn lenient_f64_opt<'de, D>(deserializer: D) -> std::result::Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<NumberOrString<f64>>::deserialize(deserializer)?
        .map(NumberOrString::resolve)
        .transpose()
}

fn lenient_i64_opt<'de, D>(deserializer: D) -> std::result::Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<NumberOrString<i64>>::deserialize(deserializer)?
        .map(NumberOrString::resolve)
        .transpose()
}
