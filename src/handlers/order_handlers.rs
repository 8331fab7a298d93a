//! Order endpoints.
//!
//! Checkout is public; the admin panel drives listing and status
//! updates; `/myorders` serves the logged-in storefront profile page.

use actix_web::{get, post, put, web, HttpResponse};

use crate::email::{templates, Mailer};
use crate::errors::{AppError, AppResult, RepositoryError};
use crate::middleware::{AdminUser, AuthenticatedUser};
use crate::models::{
    CreateOrderRequest, ItemResponse, ListResponse, Order, OrderQuery, PaginatedResponse,
    UpdateOrderRequest,
};
use crate::pricing;
use crate::repository::OrderRepository;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/orders")
            .service(create_order)
            .service(list_orders)
            .service(my_orders)
            .service(get_order)
            .service(update_order),
    );
}

/// Checkout. Stock validation, decrement and the order insert are one
/// transaction; confirmation emails go out after commit on a detached
/// task and never affect the response.
#[post("")]
async fn create_order(
    repo: web::Data<OrderRepository>,
    mailer: web::Data<Mailer>,
    body: web::Json<CreateOrderRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    if req.items.is_empty() {
        return Err(AppError::Validation("No order items provided".into()));
    }
    if req.items.iter().any(|i| i.quantity < 1) {
        return Err(AppError::Validation("Item quantity must be at least 1".into()));
    }
    if req.customer.email.trim().is_empty() || !req.customer.email.contains('@') {
        return Err(AppError::Validation("A valid customer email is required".into()));
    }

    let pricing = pricing::verify(&req.items, &req.pricing)?;

    let order = repo.place(&req.customer, &req.items, pricing).await?;

    send_order_emails(&mailer, &order);

    Ok(HttpResponse::Created().json(ItemResponse::new(order)))
}

/// Admin listing with status filter and pagination.
#[get("")]
async fn list_orders(
    _admin: AdminUser,
    repo: web::Data<OrderRepository>,
    query: web::Query<OrderQuery>,
) -> AppResult<HttpResponse> {
    let page = query.page.unwrap_or(1).max(1);
    let limit = query.limit.unwrap_or(20).clamp(1, 100);

    let (orders, total) = repo.list(&query, page, limit).await?;
    Ok(HttpResponse::Ok().json(PaginatedResponse::new(orders, total, page, limit)))
}

/// Orders belonging to the logged-in user's email.
#[get("/myorders")]
async fn my_orders(
    user: AuthenticatedUser,
    repo: web::Data<OrderRepository>,
) -> AppResult<HttpResponse> {
    let orders = repo.find_by_customer_email(&user.email).await?;
    Ok(HttpResponse::Ok().json(ListResponse::new(orders)))
}

/// Public lookup by order number (the storefront success page).
#[get("/{order_number}")]
async fn get_order(
    repo: web::Data<OrderRepository>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let number = path.into_inner();
    let order = repo.find_by_number(&number).await.map_err(|e| match e {
        RepositoryError::NotFound => AppError::OrderNotFound(number.clone()),
        other => other.into(),
    })?;

    Ok(HttpResponse::Ok().json(ItemResponse::new(order)))
}

/// Admin status/payment-status update.
#[put("/{order_number}")]
async fn update_order(
    _admin: AdminUser,
    repo: web::Data<OrderRepository>,
    path: web::Path<String>,
    body: web::Json<UpdateOrderRequest>,
) -> AppResult<HttpResponse> {
    if body.status.is_none() && body.payment_status.is_none() {
        return Err(AppError::Validation(
            "Provide status and/or payment_status".into(),
        ));
    }

    let number = path.into_inner();
    let order = repo
        .update_status(&number, body.status, body.payment_status)
        .await
        .map_err(|e| match e {
            RepositoryError::NotFound => AppError::OrderNotFound(number.clone()),
            other => other.into(),
        })?;

    Ok(HttpResponse::Ok().json(ItemResponse::new(order)))
}

fn send_order_emails(mailer: &Mailer, order: &Order) {
    mailer.send_detached(
        order.customer.email.clone(),
        templates::customer_order_confirmation_subject(order),
        templates::customer_order_confirmation(order),
    );
    mailer.send_detached(
        mailer.owner_email().to_string(),
        templates::owner_order_notification_subject(order),
        templates::owner_order_notification(order),
    );
}
