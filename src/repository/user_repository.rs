//! User account data access.
//!
//! Password hashes stay inside this layer; reset tokens are stored as
//! sha-256 digests with an expiry, never in the clear.

use chrono::{DateTime, Duration, Utc};
use sha2::{Digest, Sha256};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::errors::{RepoResult, RepositoryError};
use crate::models::{User, UserRole};

const COLUMNS: &str = "id, name, email, password_hash, role, address, is_active, \
                       created_at, updated_at";

/// Reset tokens are valid for one hour.
const RESET_TOKEN_TTL_HOURS: i64 = 1;

pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: Uuid) -> RepoResult<User> {
        let row = sqlx::query(&format!("SELECT {COLUMNS} FROM users WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(RepositoryError::NotFound)?;

        Ok(map_user(&row))
    }

    pub async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        let row = sqlx::query(&format!("SELECT {COLUMNS} FROM users WHERE email = $1"))
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.as_ref().map(map_user))
    }

    pub async fn create(
        &self,
        name: &str,
        email: &str,
        password_hash: &str,
        address: Option<&str>,
        role: UserRole,
    ) -> RepoResult<User> {
        let row = sqlx::query(&format!(
            r#"
            INSERT INTO users (id, name, email, password_hash, role, address)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(name)
        .bind(email)
        .bind(password_hash)
        .bind(role.as_str())
        .bind(address)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| super::map_unique(e, "email"))?;

        Ok(map_user(&row))
    }

    /// Profile update; a supplied hash replaces the password.
    pub async fn update_profile(
        &self,
        id: Uuid,
        name: Option<&str>,
        address: Option<&str>,
        password_hash: Option<&str>,
    ) -> RepoResult<User> {
        let row = sqlx::query(&format!(
            r#"
            UPDATE users SET
                name          = COALESCE($2, name),
                address       = COALESCE($3, address),
                password_hash = COALESCE($4, password_hash),
                updated_at    = NOW()
            WHERE id = $1
            RETURNING {COLUMNS}
            "#
        ))
        .bind(id)
        .bind(name)
        .bind(address)
        .bind(password_hash)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        Ok(map_user(&row))
    }

    pub async fn list(&self, page: u32, limit: u32) -> RepoResult<(Vec<User>, i64)> {
        let offset = i64::from(page.saturating_sub(1)) * i64::from(limit);

        let rows = sqlx::query(&format!(
            "SELECT {COLUMNS} FROM users ORDER BY created_at DESC LIMIT $1 OFFSET $2"
        ))
        .bind(i64::from(limit))
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;

        Ok((rows.iter().map(map_user).collect(), total))
    }

    pub async fn delete(&self, id: Uuid) -> RepoResult<()> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    /// Stores the digest of a freshly issued reset token.
    pub async fn set_reset_token(&self, user_id: Uuid, raw_token: &str) -> RepoResult<()> {
        let expires: DateTime<Utc> = Utc::now() + Duration::hours(RESET_TOKEN_TTL_HOURS);
        sqlx::query(
            "UPDATE users SET reset_token_digest = $2, reset_token_expires = $3 WHERE id = $1",
        )
        .bind(user_id)
        .bind(digest(raw_token))
        .bind(expires)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Looks up the account holding a valid, unexpired reset token.
    pub async fn find_by_reset_token(&self, raw_token: &str) -> RepoResult<Option<User>> {
        let row = sqlx::query(&format!(
            "SELECT {COLUMNS} FROM users \
             WHERE reset_token_digest = $1 AND reset_token_expires > NOW()"
        ))
        .bind(digest(raw_token))
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(map_user))
    }

    /// Sets a new password and consumes the reset token.
    pub async fn reset_password(&self, user_id: Uuid, password_hash: &str) -> RepoResult<()> {
        sqlx::query(
            "UPDATE users SET password_hash = $2, reset_token_digest = NULL, \
             reset_token_expires = NULL, updated_at = NOW() WHERE id = $1",
        )
        .bind(user_id)
        .bind(password_hash)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

fn digest(raw: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(raw.as_bytes());
    hex_encode(&hasher.finalize())
}

fn hex_encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

fn map_user(row: &PgRow) -> User {
    User {
        id: row.get("id"),
        name: row.get("name"),
        email: row.get("email"),
        password_hash: row.get("password_hash"),
        role: row
            .get::<String, _>("role")
            .parse()
            .unwrap_or(UserRole::Customer),
        address: row.get("address"),
        is_active: row.get("is_active"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digest_is_stable_hex() {
        let d = digest("token-abc");
        assert_eq!(d.len(), 64);
        assert_eq!(d, digest("token-abc"));
        assert_ne!(d, digest("token-abd"));
    }
}
