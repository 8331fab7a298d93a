//! Product catalog models.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Catalog categories a product can belong to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductCategory {
    Summer,
    Winter,
    Male,
    Female,
    Sports,
    Long,
    Cardholder,
}

impl ProductCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProductCategory::Summer => "summer",
            ProductCategory::Winter => "winter",
            ProductCategory::Male => "male",
            ProductCategory::Female => "female",
            ProductCategory::Sports => "sports",
            ProductCategory::Long => "long",
            ProductCategory::Cardholder => "cardholder",
        }
    }
}

impl FromStr for ProductCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "summer" => Ok(ProductCategory::Summer),
            "winter" => Ok(ProductCategory::Winter),
            "male" => Ok(ProductCategory::Male),
            "female" => Ok(ProductCategory::Female),
            "sports" => Ok(ProductCategory::Sports),
            "long" => Ok(ProductCategory::Long),
            "cardholder" => Ok(ProductCategory::Cardholder),
            other => Err(format!("unknown product category: {other}")),
        }
    }
}

impl fmt::Display for ProductCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The two kinds of merchandise the store sells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductType {
    Cap,
    Wallet,
}

impl ProductType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProductType::Cap => "cap",
            ProductType::Wallet => "wallet",
        }
    }
}

impl FromStr for ProductType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cap" => Ok(ProductType::Cap),
            "wallet" => Ok(ProductType::Wallet),
            other => Err(format!("unknown product type: {other}")),
        }
    }
}

impl fmt::Display for ProductType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A sellable catalog item. `id` is the business key used in URLs and
/// order items; prices are whole rupees.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub price: i64,
    pub category: ProductCategory,
    pub main_image: String,
    pub images: Vec<String>,
    pub description: String,
    pub tag: String,
    pub colors: Vec<String>,
    pub features: Vec<String>,
    pub specifications: BTreeMap<String, String>,
    pub stock: i32,
    pub is_active: bool,
    pub product_type: ProductType,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// Create payload, admin only.
#[derive(Debug, Deserialize)]
pub struct CreateProductRequest {
    pub id: String,
    pub name: String,
    pub price: i64,
    pub category: ProductCategory,
    pub main_image: String,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tag: String,
    #[serde(default)]
    pub colors: Vec<String>,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub specifications: BTreeMap<String, String>,
    #[serde(default = "default_stock")]
    pub stock: i32,
    #[serde(default = "default_true")]
    pub is_active: bool,
    pub product_type: ProductType,
}

fn default_stock() -> i32 {
    100
}

fn default_true() -> bool {
    true
}

/// Partial update payload; absent fields are left untouched.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateProductRequest {
    pub name: Option<String>,
    pub price: Option<i64>,
    pub category: Option<ProductCategory>,
    pub main_image: Option<String>,
    pub images: Option<Vec<String>>,
    pub description: Option<String>,
    pub tag: Option<String>,
    pub colors: Option<Vec<String>>,
    pub features: Option<Vec<String>>,
    pub specifications: Option<BTreeMap<String, String>>,
    pub stock: Option<i32>,
    pub is_active: Option<bool>,
    pub product_type: Option<ProductType>,
}

/// Query-string filters for the public listing.
#[derive(Debug, Default, Deserialize)]
pub struct ProductQuery {
    pub category: Option<ProductCategory>,
    pub product_type: Option<ProductType>,
    pub search: Option<String>,
    /// Admin view: include inactive products.
    #[serde(default)]
    pub show_all: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_round_trips_through_str() {
        for name in ["summer", "winter", "male", "female", "sports", "long", "cardholder"] {
            let cat: ProductCategory = name.parse().unwrap();
            assert_eq!(cat.as_str(), name);
        }
    }

    #[test]
    fn unknown_category_is_rejected() {
        assert!("spring".parse::<ProductCategory>().is_err());
    }

    #[test]
    fn create_request_defaults() {
        let req: CreateProductRequest = serde_json::from_value(serde_json::json!({
            "id": "cap-001",
            "name": "Summer Cap",
            "price": 1500,
            "category": "summer",
            "main_image": "/uploads/products/cap.jpg",
            "product_type": "cap"
        }))
        .unwrap();
        assert_eq!(req.stock, 100);
        assert!(req.is_active);
        assert!(req.images.is_empty());
    }
}
