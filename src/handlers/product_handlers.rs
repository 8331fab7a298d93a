//! Product catalog endpoints.

use actix_web::{delete, get, post, put, web, HttpResponse};

use crate::errors::{AppError, AppResult, RepositoryError};
use crate::middleware::AdminUser;
use crate::models::{
    CreateProductRequest, ItemResponse, ListResponse, MessageResponse, ProductQuery, ProductType,
    UpdateProductRequest,
};
use crate::repository::ProductRepository;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/products")
            .service(list_products)
            .service(get_categories)
            .service(get_product)
            .service(create_product)
            .service(update_product)
            .service(delete_product),
    );
}

/// Public listing with category/type/search filters. `show_all=true`
/// (admin panel) includes inactive products.
#[get("")]
async fn list_products(
    repo: web::Data<ProductRepository>,
    query: web::Query<ProductQuery>,
) -> AppResult<HttpResponse> {
    let products = repo.list(&query).await?;
    Ok(HttpResponse::Ok().json(ListResponse::new(products)))
}

/// Distinct categories carried by active products of one type.
#[get("/categories/{product_type}")]
async fn get_categories(
    repo: web::Data<ProductRepository>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let product_type: ProductType = path
        .into_inner()
        .parse()
        .map_err(|_| AppError::Validation("Invalid product type. Must be \"cap\" or \"wallet\"".into()))?;

    let categories = repo.distinct_categories(product_type).await?;
    Ok(HttpResponse::Ok().json(ListResponse::new(categories)))
}

#[get("/{id}")]
async fn get_product(
    repo: web::Data<ProductRepository>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let product = repo.find_by_id(&id).await.map_err(|e| match e {
        RepositoryError::NotFound => AppError::ProductNotFound(id.clone()),
        other => other.into(),
    })?;

    Ok(HttpResponse::Ok().json(ItemResponse::new(product)))
}

#[post("")]
async fn create_product(
    _admin: AdminUser,
    repo: web::Data<ProductRepository>,
    body: web::Json<CreateProductRequest>,
) -> AppResult<HttpResponse> {
    validate_create(&body)?;

    let product = repo.create(&body).await?;
    Ok(HttpResponse::Created().json(ItemResponse::new(product)))
}

#[put("/{id}")]
async fn update_product(
    _admin: AdminUser,
    repo: web::Data<ProductRepository>,
    path: web::Path<String>,
    body: web::Json<UpdateProductRequest>,
) -> AppResult<HttpResponse> {
    validate_update(&body)?;

    let id = path.into_inner();
    let product = repo.update(&id, &body).await.map_err(|e| match e {
        RepositoryError::NotFound => AppError::ProductNotFound(id.clone()),
        other => other.into(),
    })?;

    Ok(HttpResponse::Ok().json(ItemResponse::new(product)))
}

#[delete("/{id}")]
async fn delete_product(
    _admin: AdminUser,
    repo: web::Data<ProductRepository>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    repo.delete(&id).await.map_err(|e| match e {
        RepositoryError::NotFound => AppError::ProductNotFound(id.clone()),
        other => other.into(),
    })?;

    Ok(HttpResponse::Ok().json(MessageResponse::new("Product deleted successfully")))
}

fn validate_create(req: &CreateProductRequest) -> AppResult<()> {
    if req.id.trim().is_empty() {
        return Err(AppError::Validation("Product id is required".into()));
    }
    if req.name.trim().is_empty() {
        return Err(AppError::Validation("Product name is required".into()));
    }
    if req.price < 0 {
        return Err(AppError::Validation("Price must be non-negative".into()));
    }
    if req.stock < 0 {
        return Err(AppError::Validation("Stock must be non-negative".into()));
    }
    if req.main_image.trim().is_empty() {
        return Err(AppError::Validation("Main image is required".into()));
    }
    Ok(())
}

fn validate_update(req: &UpdateProductRequest) -> AppResult<()> {
    if req.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
        return Err(AppError::Validation("Product name cannot be empty".into()));
    }
    if req.price.is_some_and(|p| p < 0) {
        return Err(AppError::Validation("Price must be non-negative".into()));
    }
    if req.stock.is_some_and(|s| s < 0) {
        return Err(AppError::Validation("Stock must be non-negative".into()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn valid_create() -> CreateProductRequest {
        CreateProductRequest {
            id: "cap-001".into(),
            name: "Summer Cap".into(),
            price: 1500,
            category: crate::models::ProductCategory::Summer,
            main_image: "/uploads/products/cap.jpg".into(),
            images: vec![],
            description: String::new(),
            tag: String::new(),
            colors: vec![],
            features: vec![],
            specifications: BTreeMap::new(),
            stock: 10,
            is_active: true,
            product_type: ProductType::Cap,
        }
    }

    #[test]
    fn create_validation_accepts_well_formed() {
        assert!(validate_create(&valid_create()).is_ok());
    }

    #[test]
    fn create_validation_rejects_negative_price() {
        let mut req = valid_create();
        req.price = -1;
        assert!(validate_create(&req).is_err());
    }

    #[test]
    fn create_validation_rejects_blank_id() {
        let mut req = valid_create();
        req.id = "  ".into();
        assert!(validate_create(&req).is_err());
    }

    #[test]
    fn update_validation_allows_empty_payload() {
        assert!(validate_update(&UpdateProductRequest::default()).is_ok());
    }

    #[test]
    fn update_validation_rejects_blank_name() {
        let req = UpdateProductRequest {
            name: Some(String::new()),
            ..Default::default()
        };
        assert!(validate_update(&req).is_err());
    }
}
