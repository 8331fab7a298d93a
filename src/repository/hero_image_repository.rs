//! Hero carousel data access.

use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::errors::{RepoResult, RepositoryError};
use crate::models::{CreateHeroImageRequest, HeroImage, UpdateHeroImageRequest};

const COLUMNS: &str = "id, title, subtitle, image, link_url, display_order, is_active, \
                       created_at, updated_at";

pub struct HeroImageRepository {
    pool: PgPool,
}

impl HeroImageRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Active slides in carousel order (public endpoint).
    pub async fn list_active(&self) -> RepoResult<Vec<HeroImage>> {
        let rows = sqlx::query(&format!(
            "SELECT {COLUMNS} FROM hero_images WHERE is_active = TRUE \
             ORDER BY display_order, created_at"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(map_hero).collect())
    }

    /// Every slide, for the admin panel.
    pub async fn list_all(&self) -> RepoResult<Vec<HeroImage>> {
        let rows = sqlx::query(&format!(
            "SELECT {COLUMNS} FROM hero_images ORDER BY display_order, created_at"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(map_hero).collect())
    }

    pub async fn create(&self, req: &CreateHeroImageRequest) -> RepoResult<HeroImage> {
        let row = sqlx::query(&format!(
            r#"
            INSERT INTO hero_images
                (id, title, subtitle, image, link_url, display_order, is_active)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(&req.title)
        .bind(&req.subtitle)
        .bind(&req.image)
        .bind(&req.link_url)
        .bind(req.display_order)
        .bind(req.is_active)
        .fetch_one(&self.pool)
        .await?;

        Ok(map_hero(&row))
    }

    pub async fn update(&self, id: Uuid, req: &UpdateHeroImageRequest) -> RepoResult<HeroImage> {
        let row = sqlx::query(&format!(
            r#"
            UPDATE hero_images SET
                title         = COALESCE($2, title),
                subtitle      = COALESCE($3, subtitle),
                image         = COALESCE($4, image),
                link_url      = COALESCE($5, link_url),
                display_order = COALESCE($6, display_order),
                is_active     = COALESCE($7, is_active),
                updated_at    = NOW()
            WHERE id = $1
            RETURNING {COLUMNS}
            "#
        ))
        .bind(id)
        .bind(req.title.as_deref())
        .bind(req.subtitle.as_deref())
        .bind(req.image.as_deref())
        .bind(req.link_url.as_deref())
        .bind(req.display_order)
        .bind(req.is_active)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        Ok(map_hero(&row))
    }

    /// Flips is_active; returns the updated slide.
    pub async fn toggle_status(&self, id: Uuid) -> RepoResult<HeroImage> {
        let row = sqlx::query(&format!(
            "UPDATE hero_images SET is_active = NOT is_active, updated_at = NOW() \
             WHERE id = $1 RETURNING {COLUMNS}"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        Ok(map_hero(&row))
    }

    pub async fn delete(&self, id: Uuid) -> RepoResult<()> {
        let result = sqlx::query("DELETE FROM hero_images WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}

fn map_hero(row: &PgRow) -> HeroImage {
    HeroImage {
        id: row.get("id"),
        title: row.get("title"),
        subtitle: row.get("subtitle"),
        image: row.get("image"),
        link_url: row.get("link_url"),
        display_order: row.get("display_order"),
        is_active: row.get("is_active"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}
