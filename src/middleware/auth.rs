//! Bearer-token authentication.
//!
//! The middleware validates an `Authorization: Bearer` token when one
//! is present and stashes the claims in request extensions; it never
//! rejects by itself. The [`AuthenticatedUser`] and [`AdminUser`]
//! extractors enforce 401/403 on the routes that need it, so public
//! and protected handlers share one middleware stack.

use std::future::{ready, Ready};
use std::rc::Rc;

use actix_web::dev::{forward_ready, Payload, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::{web, Error, FromRequest, HttpMessage, HttpRequest};
use futures::future::LocalBoxFuture;
use uuid::Uuid;

use crate::auth::{Claims, TokenService};
use crate::errors::AppError;
use crate::models::UserRole;

pub struct AuthMiddleware;

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = AuthMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService {
            service: Rc::new(service),
        }))
    }
}

pub struct AuthMiddlewareService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);

        Box::pin(async move {
            let token = req
                .headers()
                .get("Authorization")
                .and_then(|h| h.to_str().ok())
                .and_then(|h| h.strip_prefix("Bearer "));

            if let (Some(token), Some(tokens)) =
                (token, req.app_data::<web::Data<TokenService>>())
            {
                if let Ok(claims) = tokens.verify(token) {
                    req.extensions_mut().insert(claims);
                }
            }

            service.call(req).await
        })
    }
}

/// Extractor for routes requiring a logged-in user; 401 otherwise.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub id: Uuid,
    pub role: UserRole,
    pub email: String,
}

impl From<&Claims> for AuthenticatedUser {
    fn from(c: &Claims) -> Self {
        Self {
            id: c.sub,
            role: c.role,
            email: c.email.clone(),
        }
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let user = req
            .extensions()
            .get::<Claims>()
            .map(AuthenticatedUser::from)
            .ok_or(AppError::Unauthorized);
        ready(user)
    }
}

/// Extractor for admin-only routes; 401 unauthenticated, 403 non-admin.
#[derive(Debug, Clone)]
pub struct AdminUser(pub AuthenticatedUser);

impl FromRequest for AdminUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let result = match req.extensions().get::<Claims>() {
            None => Err(AppError::Unauthorized),
            Some(claims) if !claims.role.is_admin() => Err(AppError::Forbidden),
            Some(claims) => Ok(AdminUser(claims.into())),
        };
        ready(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;
    use chrono::Utc;

    fn claims(role: UserRole) -> Claims {
        Claims {
            sub: Uuid::new_v4(),
            role,
            email: "t@example.com".into(),
            exp: Utc::now().timestamp() + 3600,
            iat: Utc::now().timestamp(),
        }
    }

    #[actix_web::test]
    async fn authenticated_extractor_requires_claims() {
        let req = TestRequest::default().to_http_request();
        let result = AuthenticatedUser::from_request(&req, &mut Payload::None).await;
        assert!(matches!(result, Err(AppError::Unauthorized)));

        req.extensions_mut().insert(claims(UserRole::Customer));
        let user = AuthenticatedUser::from_request(&req, &mut Payload::None)
            .await
            .unwrap();
        assert_eq!(user.email, "t@example.com");
    }

    #[actix_web::test]
    async fn admin_extractor_rejects_customers() {
        let req = TestRequest::default().to_http_request();
        req.extensions_mut().insert(claims(UserRole::Customer));
        let result = AdminUser::from_request(&req, &mut Payload::None).await;
        assert!(matches!(result, Err(AppError::Forbidden)));
    }

    #[actix_web::test]
    async fn admin_extractor_accepts_admins() {
        let req = TestRequest::default().to_http_request();
        req.extensions_mut().insert(claims(UserRole::Admin));
        assert!(AdminUser::from_request(&req, &mut Payload::None).await.is_ok());
    }
}
