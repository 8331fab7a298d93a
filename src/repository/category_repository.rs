//! Category data access.

use sqlx::postgres::PgRow;
use sqlx::{PgPool, Postgres, QueryBuilder, Row};
use uuid::Uuid;

use crate::errors::{RepoResult, RepositoryError};
use crate::models::{
    Category, CategoryQuery, CreateCategoryRequest, ProductType, UpdateCategoryRequest,
};

const COLUMNS: &str = "id, name, slug, description, image, product_type, is_featured, \
                       display_order, is_active, created_at, updated_at";

pub struct CategoryRepository {
    pool: PgPool,
}

impl CategoryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self, query: &CategoryQuery) -> RepoResult<Vec<Category>> {
        let mut qb = build_list_query(query);
        let rows = qb.build().fetch_all(&self.pool).await?;
        Ok(rows.iter().map(map_category).collect())
    }

    pub async fn find_by_slug(&self, slug: &str) -> RepoResult<Category> {
        let row = sqlx::query(&format!(
            "SELECT {COLUMNS} FROM categories WHERE slug = $1 AND is_active = TRUE"
        ))
        .bind(slug)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        Ok(map_category(&row))
    }

    pub async fn create(&self, req: &CreateCategoryRequest, slug: &str) -> RepoResult<Category> {
        let row = sqlx::query(&format!(
            r#"
            INSERT INTO categories
                (id, name, slug, description, image, product_type, is_featured,
                 display_order, is_active)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(&req.name)
        .bind(slug)
        .bind(&req.description)
        .bind(&req.image)
        .bind(req.product_type.as_str())
        .bind(req.is_featured)
        .bind(req.display_order)
        .bind(req.is_active)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| super::map_unique(e, "slug"))?;

        Ok(map_category(&row))
    }

    pub async fn update(&self, id: Uuid, req: &UpdateCategoryRequest) -> RepoResult<Category> {
        let row = sqlx::query(&format!(
            r#"
            UPDATE categories SET
                name          = COALESCE($2, name),
                slug          = COALESCE($3, slug),
                description   = COALESCE($4, description),
                image         = COALESCE($5, image),
                product_type  = COALESCE($6, product_type),
                is_featured   = COALESCE($7, is_featured),
                display_order = COALESCE($8, display_order),
                is_active     = COALESCE($9, is_active),
                updated_at    = NOW()
            WHERE id = $1
            RETURNING {COLUMNS}
            "#
        ))
        .bind(id)
        .bind(req.name.as_deref())
        .bind(req.slug.as_deref())
        .bind(req.description.as_deref())
        .bind(req.image.as_deref())
        .bind(req.product_type.map(|t| t.as_str()))
        .bind(req.is_featured)
        .bind(req.display_order)
        .bind(req.is_active)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| super::map_unique(e, "slug"))?
        .ok_or(RepositoryError::NotFound)?;

        Ok(map_category(&row))
    }

    pub async fn delete(&self, id: Uuid) -> RepoResult<()> {
        let result = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}

fn build_list_query(query: &CategoryQuery) -> QueryBuilder<'_, Postgres> {
    let mut qb = QueryBuilder::new(format!("SELECT {COLUMNS} FROM categories WHERE TRUE"));

    if !query.show_all {
        qb.push(" AND is_active = TRUE");
    }
    if let Some(product_type) = query.product_type {
        qb.push(" AND product_type = ").push_bind(product_type.as_str());
    }
    if query.featured {
        qb.push(" AND is_featured = TRUE");
    }
    qb.push(" ORDER BY display_order, name");
    qb
}

fn map_category(row: &PgRow) -> Category {
    Category {
        id: row.get("id"),
        name: row.get("name"),
        slug: row.get("slug"),
        description: row.get("description"),
        image: row.get("image"),
        product_type: row
            .get::<String, _>("product_type")
            .parse()
            .unwrap_or(ProductType::Cap),
        is_featured: row.get("is_featured"),
        display_order: row.get("display_order"),
        is_active: row.get("is_active"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::Execute;

    #[test]
    fn featured_filter_present_only_when_asked() {
        let query = CategoryQuery::default();
        let mut qb = build_list_query(&query);
        // The select list names the column, so assert on the predicate.
        assert!(!qb.build().sql().contains("is_featured = TRUE"));

        let query = CategoryQuery {
            featured: true,
            ..Default::default()
        };
        let mut qb = build_list_query(&query);
        assert!(qb.build().sql().contains("is_featured = TRUE"));
    }
}
