//! Category endpoints.

use actix_web::{delete, get, post, put, web, HttpResponse};
use uuid::Uuid;

use crate::errors::{AppError, AppResult, RepositoryError};
use crate::middleware::AdminUser;
use crate::models::{
    slugify, CategoryQuery, CreateCategoryRequest, ItemResponse, ListResponse, MessageResponse,
    UpdateCategoryRequest,
};
use crate::repository::CategoryRepository;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/categories")
            .service(list_categories)
            .service(get_category)
            .service(create_category)
            .service(update_category)
            .service(delete_category),
    );
}

#[get("")]
async fn list_categories(
    repo: web::Data<CategoryRepository>,
    query: web::Query<CategoryQuery>,
) -> AppResult<HttpResponse> {
    let categories = repo.list(&query).await?;
    Ok(HttpResponse::Ok().json(ListResponse::new(categories)))
}

#[get("/{slug}")]
async fn get_category(
    repo: web::Data<CategoryRepository>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let slug = path.into_inner();
    let category = repo.find_by_slug(&slug).await.map_err(|e| match e {
        RepositoryError::NotFound => AppError::CategoryNotFound(slug.clone()),
        other => other.into(),
    })?;

    Ok(HttpResponse::Ok().json(ItemResponse::new(category)))
}

#[post("")]
async fn create_category(
    _admin: AdminUser,
    repo: web::Data<CategoryRepository>,
    body: web::Json<CreateCategoryRequest>,
) -> AppResult<HttpResponse> {
    if body.name.trim().is_empty() {
        return Err(AppError::Validation("Category name is required".into()));
    }

    let slug = match body.slug.as_deref().filter(|s| !s.is_empty()) {
        Some(given) => slugify(given),
        None => slugify(&body.name),
    };
    if slug.is_empty() {
        return Err(AppError::Validation("Category slug cannot be empty".into()));
    }

    let category = repo.create(&body, &slug).await?;
    Ok(HttpResponse::Created().json(ItemResponse::new(category)))
}

#[put("/{id}")]
async fn update_category(
    _admin: AdminUser,
    repo: web::Data<CategoryRepository>,
    path: web::Path<Uuid>,
    body: web::Json<UpdateCategoryRequest>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let category = repo.update(id, &body).await.map_err(|e| match e {
        RepositoryError::NotFound => AppError::CategoryNotFound(id.to_string()),
        other => other.into(),
    })?;

    Ok(HttpResponse::Ok().json(ItemResponse::new(category)))
}

#[delete("/{id}")]
async fn delete_category(
    _admin: AdminUser,
    repo: web::Data<CategoryRepository>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    repo.delete(id).await.map_err(|e| match e {
        RepositoryError::NotFound => AppError::CategoryNotFound(id.to_string()),
        other => other.into(),
    })?;

    Ok(HttpResponse::Ok().json(MessageResponse::new("Category deleted successfully")))
}
