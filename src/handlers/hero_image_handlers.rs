//! Hero carousel endpoints (storefront home page slides).

use actix_web::{delete, get, patch, post, put, web, HttpResponse};
use uuid::Uuid;

use crate::errors::{AppError, AppResult, RepositoryError};
use crate::middleware::AdminUser;
use crate::models::{
    CreateHeroImageRequest, ItemResponse, ListResponse, MessageResponse, UpdateHeroImageRequest,
};
use crate::repository::HeroImageRepository;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/hero-images")
            .service(list_active)
            .service(list_admin)
            .service(create_hero)
            .service(update_hero)
            .service(toggle_status)
            .service(delete_hero),
    );
}

/// Active slides only, carousel order.
#[get("")]
async fn list_active(repo: web::Data<HeroImageRepository>) -> AppResult<HttpResponse> {
    let slides = repo.list_active().await?;
    Ok(HttpResponse::Ok().json(ListResponse::new(slides)))
}

/// All slides, active or not, for the admin panel.
#[get("/admin")]
async fn list_admin(
    _admin: AdminUser,
    repo: web::Data<HeroImageRepository>,
) -> AppResult<HttpResponse> {
    let slides = repo.list_all().await?;
    Ok(HttpResponse::Ok().json(ListResponse::new(slides)))
}

#[post("")]
async fn create_hero(
    _admin: AdminUser,
    repo: web::Data<HeroImageRepository>,
    body: web::Json<CreateHeroImageRequest>,
) -> AppResult<HttpResponse> {
    if body.title.trim().is_empty() {
        return Err(AppError::Validation("Title is required".into()));
    }
    if body.image.trim().is_empty() {
        return Err(AppError::Validation("Image is required".into()));
    }

    let slide = repo.create(&body).await?;
    Ok(HttpResponse::Created().json(ItemResponse::new(slide)))
}

#[put("/{id}")]
async fn update_hero(
    _admin: AdminUser,
    repo: web::Data<HeroImageRepository>,
    path: web::Path<Uuid>,
    body: web::Json<UpdateHeroImageRequest>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let slide = repo.update(id, &body).await.map_err(|e| match e {
        RepositoryError::NotFound => AppError::NotFound("Hero image".into()),
        other => other.into(),
    })?;

    Ok(HttpResponse::Ok().json(ItemResponse::new(slide)))
}

#[patch("/{id}/toggle-status")]
async fn toggle_status(
    _admin: AdminUser,
    repo: web::Data<HeroImageRepository>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let slide = repo.toggle_status(path.into_inner()).await.map_err(|e| match e {
        RepositoryError::NotFound => AppError::NotFound("Hero image".into()),
        other => other.into(),
    })?;

    Ok(HttpResponse::Ok().json(ItemResponse::new(slide)))
}

#[delete("/{id}")]
async fn delete_hero(
    _admin: AdminUser,
    repo: web::Data<HeroImageRepository>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    repo.delete(path.into_inner()).await.map_err(|e| match e {
        RepositoryError::NotFound => AppError::NotFound("Hero image".into()),
        other => other.into(),
    })?;

    Ok(HttpResponse::Ok().json(MessageResponse::new("Hero image deleted successfully")))
}
