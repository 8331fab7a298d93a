//! Data access layer.
//!
//! One repository per aggregate, each owning a clone of the shared
//! `PgPool`. Document-shaped fields (images, colors, specifications,
//! embedded order payloads) persist as JSONB.

pub mod category_repository;
pub mod hero_image_repository;
pub mod order_repository;
pub mod product_repository;
pub mod user_repository;

pub use category_repository::CategoryRepository;
pub use hero_image_repository::HeroImageRepository;
pub use order_repository::OrderRepository;
pub use product_repository::ProductRepository;
pub use user_repository::UserRepository;

use crate::errors::RepositoryError;

/// Postgres unique-violation SQLSTATE.
const UNIQUE_VIOLATION: &str = "23505";

/// Translates a unique-constraint failure on insert/update into
/// `DuplicateKey(field)`; everything else stays a query error.
pub(crate) fn map_unique(err: sqlx::Error, field: &str) -> RepositoryError {
    if let sqlx::Error::Database(ref db) = err {
        if db.code().as_deref() == Some(UNIQUE_VIOLATION) {
            return RepositoryError::DuplicateKey(field.to_string());
        }
    }
    RepositoryError::Query(err)
}
