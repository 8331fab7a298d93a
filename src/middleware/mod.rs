//! Request middleware: structured logging and bearer-token auth.

pub mod auth;
pub mod logging;

pub use auth::{AdminUser, AuthMiddleware, AuthenticatedUser};
pub use logging::LoggingMiddleware;
