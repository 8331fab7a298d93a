//! Product data access.

use std::collections::BTreeMap;

use sqlx::postgres::PgRow;
use sqlx::types::Json;
use sqlx::{PgPool, Postgres, QueryBuilder, Row};

use crate::errors::{RepoResult, RepositoryError};
use crate::models::{CreateProductRequest, Product, ProductQuery, ProductType, UpdateProductRequest};

const COLUMNS: &str = "id, name, price, category, main_image, images, description, tag, \
                       colors, features, specifications, stock, is_active, product_type, \
                       created_at, updated_at";

pub struct ProductRepository {
    pool: PgPool,
}

impl ProductRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find by business id, the key the storefront uses in URLs.
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Product> {
        let row = sqlx::query(&format!("SELECT {COLUMNS} FROM products WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(RepositoryError::NotFound)?;

        Ok(map_product(&row))
    }

    /// Public/admin listing with query-string filters, newest first.
    pub async fn list(&self, query: &ProductQuery) -> RepoResult<Vec<Product>> {
        let mut qb = build_list_query(query);
        let rows = qb.build().fetch_all(&self.pool).await?;
        Ok(rows.iter().map(map_product).collect())
    }

    /// Distinct categories carried by active products of one type.
    pub async fn distinct_categories(&self, product_type: ProductType) -> RepoResult<Vec<String>> {
        let rows = sqlx::query(
            "SELECT DISTINCT category FROM products \
             WHERE product_type = $1 AND is_active = TRUE ORDER BY category",
        )
        .bind(product_type.as_str())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(|r| r.get("category")).collect())
    }

    pub async fn create(&self, req: &CreateProductRequest) -> RepoResult<Product> {
        let row = sqlx::query(&format!(
            r#"
            INSERT INTO products
                (id, name, price, category, main_image, images, description, tag,
                 colors, features, specifications, stock, is_active, product_type)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(&req.id)
        .bind(&req.name)
        .bind(req.price)
        .bind(req.category.as_str())
        .bind(&req.main_image)
        .bind(Json(&req.images))
        .bind(&req.description)
        .bind(&req.tag)
        .bind(Json(&req.colors))
        .bind(Json(&req.features))
        .bind(Json(&req.specifications))
        .bind(req.stock)
        .bind(req.is_active)
        .bind(req.product_type.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| super::map_unique(e, "id"))?;

        Ok(map_product(&row))
    }

    /// Partial update; absent fields keep their current value.
    pub async fn update(&self, id: &str, req: &UpdateProductRequest) -> RepoResult<Product> {
        let row = sqlx::query(&format!(
            r#"
            UPDATE products SET
                name           = COALESCE($2, name),
                price          = COALESCE($3, price),
                category       = COALESCE($4, category),
                main_image     = COALESCE($5, main_image),
                images         = COALESCE($6, images),
                description    = COALESCE($7, description),
                tag            = COALESCE($8, tag),
                colors         = COALESCE($9, colors),
                features       = COALESCE($10, features),
                specifications = COALESCE($11, specifications),
                stock          = COALESCE($12, stock),
                is_active      = COALESCE($13, is_active),
                product_type   = COALESCE($14, product_type),
                updated_at     = NOW()
            WHERE id = $1
            RETURNING {COLUMNS}
            "#
        ))
        .bind(id)
        .bind(req.name.as_deref())
        .bind(req.price)
        .bind(req.category.map(|c| c.as_str()))
        .bind(req.main_image.as_deref())
        .bind(req.images.as_ref().map(Json))
        .bind(req.description.as_deref())
        .bind(req.tag.as_deref())
        .bind(req.colors.as_ref().map(Json))
        .bind(req.features.as_ref().map(Json))
        .bind(req.specifications.as_ref().map(Json))
        .bind(req.stock)
        .bind(req.is_active)
        .bind(req.product_type.map(|t| t.as_str()))
        .fetch_optional(&self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        Ok(map_product(&row))
    }

    pub async fn delete(&self, id: &str) -> RepoResult<()> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}

fn build_list_query(query: &ProductQuery) -> QueryBuilder<'_, Postgres> {
    let mut qb = QueryBuilder::new(format!("SELECT {COLUMNS} FROM products WHERE TRUE"));

    if !query.show_all {
        qb.push(" AND is_active = TRUE");
    }
    if let Some(category) = query.category {
        qb.push(" AND category = ").push_bind(category.as_str());
    }
    if let Some(product_type) = query.product_type {
        qb.push(" AND product_type = ").push_bind(product_type.as_str());
    }
    if let Some(search) = query.search.as_deref().filter(|s| !s.is_empty()) {
        let pattern = format!("%{search}%");
        qb.push(" AND (name ILIKE ").push_bind(pattern.clone());
        qb.push(" OR description ILIKE ").push_bind(pattern);
        qb.push(")");
    }
    qb.push(" ORDER BY created_at DESC");
    qb
}

pub(crate) fn map_product(row: &PgRow) -> Product {
    Product {
        id: row.get("id"),
        name: row.get("name"),
        price: row.get("price"),
        category: row
            .get::<String, _>("category")
            .parse()
            .unwrap_or(crate::models::ProductCategory::Summer),
        main_image: row.get("main_image"),
        images: row.get::<Json<Vec<String>>, _>("images").0,
        description: row.get("description"),
        tag: row.get("tag"),
        colors: row.get::<Json<Vec<String>>, _>("colors").0,
        features: row.get::<Json<Vec<String>>, _>("features").0,
        specifications: row
            .get::<Json<BTreeMap<String, String>>, _>("specifications")
            .0,
        stock: row.get("stock"),
        is_active: row.get("is_active"),
        product_type: row
            .get::<String, _>("product_type")
            .parse()
            .unwrap_or(ProductType::Cap),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::Execute;

    #[test]
    fn list_query_defaults_to_active_only() {
        let query = ProductQuery::default();
        let mut qb = build_list_query(&query);
        let sql = qb.build().sql().to_string();
        assert!(sql.contains("is_active = TRUE"));
        assert!(sql.ends_with("ORDER BY created_at DESC"));
    }

    #[test]
    fn list_query_show_all_drops_active_filter() {
        let query = ProductQuery {
            show_all: true,
            ..Default::default()
        };
        let mut qb = build_list_query(&query);
        // The select list names the column, so assert on the predicate.
        assert!(!qb.build().sql().contains("is_active = TRUE"));
    }

    #[test]
    fn list_query_search_matches_name_and_description() {
        let query = ProductQuery {
            search: Some("leather".into()),
            ..Default::default()
        };
        let mut qb = build_list_query(&query);
        let sql = qb.build().sql().to_string();
        assert!(sql.contains("name ILIKE"));
        assert!(sql.contains("description ILIKE"));
    }

    #[test]
    fn list_query_empty_search_is_ignored() {
        let query = ProductQuery {
            search: Some(String::new()),
            ..Default::default()
        };
        let mut qb = build_list_query(&query);
        assert!(!qb.build().sql().contains("ILIKE"));
    }
}
