//! Hero carousel slide models (storefront home page).

use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize)]
pub struct HeroImage {
    pub id: Uuid,
    pub title: String,
    pub subtitle: String,
    pub image: String,
    pub link_url: String,
    pub display_order: i32,
    pub is_active: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Deserialize)]
pub struct CreateHeroImageRequest {
    pub title: String,
    #[serde(default)]
    pub subtitle: String,
    pub image: String,
    #[serde(default)]
    pub link_url: String,
    #[serde(default)]
    pub display_order: i32,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateHeroImageRequest {
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub image: Option<String>,
    pub link_url: Option<String>,
    pub display_order: Option<i32>,
    pub is_active: Option<bool>,
}
