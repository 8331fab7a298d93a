//! Domain models and request/response DTOs.

pub mod category;
pub mod hero_image;
pub mod order;
pub mod product;
pub mod user;

pub use category::*;
pub use hero_image::*;
pub use order::*;
pub use product::*;
pub use user::*;

use serde::Serialize;

/// Standard success envelope for list endpoints.
#[derive(Debug, Serialize)]
pub struct ListResponse<T> {
    pub success: bool,
    pub count: usize,
    pub data: Vec<T>,
}

impl<T> ListResponse<T> {
    pub fn new(data: Vec<T>) -> Self {
        Self {
            success: true,
            count: data.len(),
            data,
        }
    }
}

/// Standard success envelope for single-item endpoints.
#[derive(Debug, Serialize)]
pub struct ItemResponse<T> {
    pub success: bool,
    pub data: T,
}

impl<T> ItemResponse<T> {
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Success envelope carrying only a message.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}

/// Paginated list envelope (admin order/user listings).
#[derive(Debug, Serialize)]
pub struct PaginatedResponse<T> {
    pub success: bool,
    pub count: usize,
    pub total_pages: u32,
    pub current_page: u32,
    pub data: Vec<T>,
}

impl<T> PaginatedResponse<T> {
    pub fn new(data: Vec<T>, total: i64, page: u32, limit: u32) -> Self {
        let total_pages = if limit == 0 {
            0
        } else {
            ((total as u64 + limit as u64 - 1) / limit as u64) as u32
        };
        Self {
            success: true,
            count: data.len(),
            total_pages,
            current_page: page,
            data,
        }
    }
}
