//! Category models.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::product::ProductType;

/// A curated storefront category (distinct from the per-product
/// `ProductCategory` enum): carries display copy and an image.
#[derive(Debug, Clone, Serialize)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub image: String,
    pub product_type: ProductType,
    pub is_featured: bool,
    pub display_order: i32,
    pub is_active: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Deserialize)]
pub struct CreateCategoryRequest {
    pub name: String,
    /// Generated from `name` when omitted.
    pub slug: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image: String,
    pub product_type: ProductType,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default)]
    pub display_order: i32,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateCategoryRequest {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub product_type: Option<ProductType>,
    pub is_featured: Option<bool>,
    pub display_order: Option<i32>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CategoryQuery {
    pub product_type: Option<ProductType>,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub show_all: bool,
}

/// Lowercases, strips non-alphanumerics, hyphenates whitespace runs.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut last_hyphen = true;
    for ch in name.chars() {
        if ch.is_ascii_alphanumeric() {
            slug.push(ch.to_ascii_lowercase());
            last_hyphen = false;
        } else if !last_hyphen {
            slug.push('-');
            last_hyphen = true;
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugify_basic() {
        assert_eq!(slugify("Summer Caps"), "summer-caps");
        assert_eq!(slugify("  Card Holders!  "), "card-holders");
        assert_eq!(slugify("Long Wallets & More"), "long-wallets-more");
    }

    #[test]
    fn slugify_collapses_separator_runs() {
        assert_eq!(slugify("a -- b"), "a-b");
        assert_eq!(slugify("---"), "");
    }
}
