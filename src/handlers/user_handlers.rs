//! Account and session endpoints.

use actix_web::{delete, get, post, put, web, HttpResponse};
use rand::distributions::Alphanumeric;
use rand::Rng;
use uuid::Uuid;

use crate::auth::{hash_password, verify_password, TokenService};
use crate::email::{templates, Mailer};
use crate::errors::{AppError, AppResult, RepositoryError};
use crate::middleware::{AdminUser, AuthenticatedUser};
use crate::models::{
    AuthResponse, ForgotPasswordRequest, ItemResponse, LoginRequest, MessageResponse,
    PaginatedResponse, RegisterRequest, ResetPasswordRequest, UpdateProfileRequest, UserProfile,
    UserRole,
};
use crate::repository::UserRepository;

const MIN_PASSWORD_LEN: usize = 8;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/users")
            .service(register)
            .service(login)
            .service(forgot_password)
            .service(reset_password)
            .service(get_profile)
            .service(update_profile)
            .service(list_users)
            .service(delete_user),
    );
}

#[post("/register")]
async fn register(
    repo: web::Data<UserRepository>,
    tokens: web::Data<TokenService>,
    body: web::Json<RegisterRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let email = normalize_email(&req.email);
    validate_email(&email)?;
    if req.name.trim().is_empty() {
        return Err(AppError::Validation("Name is required".into()));
    }
    validate_password(&req.password)?;

    let hash = hash_password(&req.password)?;
    let user = repo
        .create(
            req.name.trim(),
            &email,
            &hash,
            req.address.as_deref(),
            UserRole::Customer,
        )
        .await?;

    let token = tokens.issue(user.id, user.role, &user.email)?;
    Ok(HttpResponse::Created().json(AuthResponse {
        success: true,
        data: user.into(),
        token,
    }))
}

#[post("/login")]
async fn login(
    repo: web::Data<UserRepository>,
    tokens: web::Data<TokenService>,
    body: web::Json<LoginRequest>,
) -> AppResult<HttpResponse> {
    let user = repo
        .find_by_email(&normalize_email(&body.email))
        .await?
        .ok_or(AppError::InvalidCredentials)?;

    if !verify_password(&body.password, &user.password_hash) {
        return Err(AppError::InvalidCredentials);
    }
    if !user.is_active {
        return Err(AppError::InvalidCredentials);
    }

    let token = tokens.issue(user.id, user.role, &user.email)?;
    Ok(HttpResponse::Ok().json(AuthResponse {
        success: true,
        data: user.into(),
        token,
    }))
}

#[get("/profile")]
async fn get_profile(
    auth: AuthenticatedUser,
    repo: web::Data<UserRepository>,
) -> AppResult<HttpResponse> {
    let user = repo.find_by_id(auth.id).await.map_err(|e| match e {
        RepositoryError::NotFound => AppError::UserNotFound,
        other => other.into(),
    })?;

    Ok(HttpResponse::Ok().json(ItemResponse::new(UserProfile::from(user))))
}

#[put("/profile")]
async fn update_profile(
    auth: AuthenticatedUser,
    repo: web::Data<UserRepository>,
    body: web::Json<UpdateProfileRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    if req.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
        return Err(AppError::Validation("Name cannot be empty".into()));
    }

    let password_hash = match req.password.as_deref() {
        Some(password) => {
            validate_password(password)?;
            Some(hash_password(password)?)
        }
        None => None,
    };

    let user = repo
        .update_profile(
            auth.id,
            req.name.as_deref(),
            req.address.as_deref(),
            password_hash.as_deref(),
        )
        .await
        .map_err(|e| match e {
            RepositoryError::NotFound => AppError::UserNotFound,
            other => other.into(),
        })?;

    Ok(HttpResponse::Ok().json(ItemResponse::new(UserProfile::from(user))))
}

/// Always answers 200 so the endpoint cannot be used to discover which
/// emails have accounts.
#[post("/forgot-password")]
async fn forgot_password(
    repo: web::Data<UserRepository>,
    mailer: web::Data<Mailer>,
    body: web::Json<ForgotPasswordRequest>,
) -> AppResult<HttpResponse> {
    if let Some(user) = repo.find_by_email(&normalize_email(&body.email)).await? {
        let raw_token: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(40)
            .map(char::from)
            .collect();

        repo.set_reset_token(user.id, &raw_token).await?;
        mailer.send_detached(
            user.email.clone(),
            "Password Reset | Classic Carry".to_string(),
            templates::password_reset(&user.name, &raw_token),
        );
    }

    Ok(HttpResponse::Ok().json(MessageResponse::new(
        "If that email has an account, a reset link has been sent",
    )))
}

#[put("/reset-password/{token}")]
async fn reset_password(
    repo: web::Data<UserRepository>,
    path: web::Path<String>,
    body: web::Json<ResetPasswordRequest>,
) -> AppResult<HttpResponse> {
    validate_password(&body.password)?;

    let user = repo
        .find_by_reset_token(&path.into_inner())
        .await?
        .ok_or_else(|| AppError::Validation("Invalid or expired reset token".into()))?;

    let hash = hash_password(&body.password)?;
    repo.reset_password(user.id, &hash).await?;

    Ok(HttpResponse::Ok().json(MessageResponse::new("Password has been reset")))
}

#[get("")]
async fn list_users(
    _admin: AdminUser,
    repo: web::Data<UserRepository>,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let page = query.page.unwrap_or(1).max(1);
    let limit = query.limit.unwrap_or(20).clamp(1, 100);

    let (users, total) = repo.list(page, limit).await?;
    let profiles: Vec<UserProfile> = users.into_iter().map(UserProfile::from).collect();
    Ok(HttpResponse::Ok().json(PaginatedResponse::new(profiles, total, page, limit)))
}

#[delete("/{id}")]
async fn delete_user(
    admin: AdminUser,
    repo: web::Data<UserRepository>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    if id == admin.0.id {
        return Err(AppError::Validation("Cannot delete your own account".into()));
    }

    repo.delete(id).await.map_err(|e| match e {
        RepositoryError::NotFound => AppError::UserNotFound,
        other => other.into(),
    })?;

    Ok(HttpResponse::Ok().json(MessageResponse::new("User deleted successfully")))
}

#[derive(serde::Deserialize)]
struct PageQuery {
    page: Option<u32>,
    limit: Option<u32>,
}

/// Trims surrounding whitespace and lowercases; the stored and the
/// looked-up form must agree or the account is unreachable.
fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn validate_email(email: &str) -> AppResult<()> {
    let well_formed = email
        .split_once('@')
        .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.'));
    if !well_formed {
        return Err(AppError::Validation("A valid email is required".into()));
    }
    Ok(())
}

fn validate_password(password: &str) -> AppResult<()> {
    if password.len() < MIN_PASSWORD_LEN {
        return Err(AppError::Validation(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_is_normalized_before_storage_and_lookup() {
        assert_eq!(normalize_email("  Ali@Example.COM "), "ali@example.com");
        assert_eq!(normalize_email("ali@example.com"), "ali@example.com");
    }

    #[test]
    fn email_validation() {
        assert!(validate_email("ali@example.com").is_ok());
        assert!(validate_email("ali@localhost").is_err());
        assert!(validate_email("@example.com").is_err());
        assert!(validate_email("no-at-sign").is_err());
    }

    #[test]
    fn password_length_enforced() {
        assert!(validate_password("short").is_err());
        assert!(validate_password("long enough").is_ok());
    }
}
