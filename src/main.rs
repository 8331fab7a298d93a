//! Classic Carry storefront backend.
//!
//! REST API under /api plus static /uploads serving, consumed by the
//! public storefront and the admin panel SPAs.

mod auth;
mod config;
mod email;
mod errors;
mod handlers;
mod middleware;
mod models;
mod pricing;
mod repository;

use actix_cors::Cors;
use actix_files::Files;
use actix_web::middleware::DefaultHeaders;
use actix_web::{get, web, App, HttpResponse, HttpServer};
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::EnvFilter;

use crate::auth::TokenService;
use crate::config::Config;
use crate::email::Mailer;
use crate::handlers::{
    category_handlers, hero_image_handlers, order_handlers, product_handlers, upload_handlers,
    user_handlers,
};
use crate::middleware::{AuthMiddleware, LoggingMiddleware};
use crate::repository::{
    CategoryRepository, HeroImageRepository, OrderRepository, ProductRepository, UserRepository,
};

/// Raised body limit for admin payloads that inline image data.
const JSON_BODY_LIMIT: usize = 50 * 1024 * 1024;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = Config::from_env()?;

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&config.database_url)
        .await?;
    sqlx::migrate!("./migrations").run(&pool).await?;

    for dir in upload_handlers::UploadKind::all_dir_names() {
        tokio::fs::create_dir_all(config.upload_dir.join(dir)).await?;
    }

    let products = web::Data::new(ProductRepository::new(pool.clone()));
    let orders = web::Data::new(OrderRepository::new(pool.clone()));
    let users = web::Data::new(UserRepository::new(pool.clone()));
    let categories = web::Data::new(CategoryRepository::new(pool.clone()));
    let hero_images = web::Data::new(HeroImageRepository::new(pool.clone()));
    let tokens = web::Data::new(TokenService::new(&config.jwt_secret, config.jwt_ttl_secs));
    let mailer = web::Data::new(Mailer::from_config(&config)?);
    let config_data = web::Data::new(config.clone());

    let bind_addr = config.bind_addr();
    tracing::info!(host = %bind_addr.0, port = bind_addr.1, "starting server");

    HttpServer::new(move || {
        let mut cors = Cors::default()
            .allow_any_method()
            .allow_any_header()
            .supports_credentials();
        for origin in &config.allowed_origins {
            cors = cors.allowed_origin(origin);
        }

        App::new()
            .app_data(products.clone())
            .app_data(orders.clone())
            .app_data(users.clone())
            .app_data(categories.clone())
            .app_data(hero_images.clone())
            .app_data(tokens.clone())
            .app_data(mailer.clone())
            .app_data(config_data.clone())
            .app_data(
                web::JsonConfig::default()
                    .limit(JSON_BODY_LIMIT)
                    .error_handler(|err, _| {
                        crate::errors::AppError::Validation(err.to_string()).into()
                    }),
            )
            .wrap(cors)
            .wrap(AuthMiddleware)
            .wrap(LoggingMiddleware)
            .service(index)
            .configure(product_handlers::configure)
            .configure(order_handlers::configure)
            .configure(user_handlers::configure)
            .configure(category_handlers::configure)
            .configure(hero_image_handlers::configure)
            .configure(upload_handlers::configure)
            .service(
                web::scope("/uploads")
                    .wrap(
                        DefaultHeaders::new()
                            .add(("Cross-Origin-Resource-Policy", "cross-origin")),
                    )
                    .service(Files::new("/", config.upload_dir.clone())),
            )
            .default_service(web::route().to(not_found))
    })
    .bind(bind_addr)?
    .run()
    .await?;

    Ok(())
}

/// Service index, mirrors what the SPAs request on startup.
#[get("/")]
async fn index() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "message": "Classic Carry API",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "products": "/api/products",
            "orders": "/api/orders",
            "users": "/api/users",
            "categories": "/api/categories",
            "hero_images": "/api/hero-images",
            "upload": "/api/upload"
        }
    }))
}

async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(serde_json::json!({
        "success": false,
        "message": "Route not found",
        "code": "NOT_FOUND"
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{http::StatusCode, test};

    #[actix_web::test]
    async fn index_lists_endpoints() {
        let app = test::init_service(App::new().service(index)).await;
        let resp =
            test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
        assert!(resp.status().is_success());

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], "Classic Carry API");
        assert!(body["endpoints"]["products"].is_string());
        assert!(body["endpoints"]["orders"].is_string());
    }

    #[actix_web::test]
    async fn unknown_route_gets_enveloped_404() {
        let app =
            test::init_service(App::new().default_service(web::route().to(not_found))).await;
        let resp =
            test::call_service(&app, test::TestRequest::get().uri("/nope").to_request()).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["code"], "NOT_FOUND");
    }
}
