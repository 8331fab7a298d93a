//! HTTP route handlers, one module per /api scope.

pub mod category_handlers;
pub mod hero_image_handlers;
pub mod order_handlers;
pub mod product_handlers;
pub mod upload_handlers;
pub mod user_handlers;
