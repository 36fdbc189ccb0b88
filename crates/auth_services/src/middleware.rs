use actix_web::{
    Error, HttpMessage, ResponseError, Result,
    body::EitherBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
};
use futures_util::future::LocalBoxFuture;
use std::{
    future::{Ready, ready},
    rc::Rc,
};

use crate::jwt::JwtService;
use crate::types::{AuthError, SessionUser};

/// Middleware that verifies the bearer token on protected scopes and attaches
/// the resulting [`SessionUser`] to the request.
pub struct AuthMiddleware {
    jwt_service: JwtService,
}

impl AuthMiddleware {
    /// Creates the middleware around an existing JWT verifier.
    pub fn new(jwt_service: JwtService) -> Self {
        Self { jwt_service }
    }
}

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = AuthMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService {
            service: Rc::new(service),
            jwt_service: self.jwt_service.clone(),
        }))
    }
}

/// Service that implements the authentication middleware logic
pub struct AuthMiddlewareService<S> {
    service: Rc<S>,
    jwt_service: JwtService,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();
        let jwt_service = self.jwt_service.clone();

        Box::pin(async move {
            // Extract Authorization header
            let auth_header = req
                .headers()
                .get("Authorization")
                .and_then(|h| h.to_str().ok())
                .and_then(|h| h.strip_prefix("Bearer "));

            let token = match auth_header {
                Some(token) => token,
                None => {
                    let response = AuthError::MissingToken.error_response();
                    return Ok(req.into_response(response).map_into_right_body());
                }
            };

            // Verify token and extract the session user
            let session_user = match jwt_service.session_user_from_token(token) {
                Ok(user) => user,
                Err(e) => {
                    let response = e.error_response();
                    return Ok(req.into_response(response).map_into_right_body());
                }
            };

            // Add the session user to request extensions
            req.extensions_mut().insert(session_user);

            // Continue with the request
            let res = service.call(req).await?;
            Ok(res.map_into_left_body())
        })
    }
}

/// Custom extractor for the authenticated session user
pub struct AuthenticatedUser(pub SessionUser);

impl actix_web::FromRequest for AuthenticatedUser {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &actix_web::HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        let session_user = req.extensions().get::<SessionUser>().cloned();

        ready(match session_user {
            Some(user) => Ok(AuthenticatedUser(user)),
            None => Err(actix_web::error::ErrorUnauthorized(
                "User not authenticated",
            )),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{App, HttpResponse, http::StatusCode, test, web};
    use uuid::Uuid;

    async fn whoami(user: AuthenticatedUser) -> HttpResponse {
        HttpResponse::Ok().json(user.0)
    }

    #[actix_web::test]
    async fn request_without_token_gets_the_missing_token_body() {
        let app = test::init_service(App::new().service(
            web::scope("")
                .wrap(AuthMiddleware::new(JwtService::new("test-secret")))
                .route("/whoami", web::get().to(whoami)),
        ))
        .await;

        let req = test::TestRequest::get().uri("/whoami").to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "missing_token");
    }

    #[actix_web::test]
    async fn request_with_a_garbage_token_gets_the_invalid_token_body() {
        let app = test::init_service(App::new().service(
            web::scope("")
                .wrap(AuthMiddleware::new(JwtService::new("test-secret")))
                .route("/whoami", web::get().to(whoami)),
        ))
        .await;

        let req = test::TestRequest::get()
            .uri("/whoami")
            .insert_header(("Authorization", "Bearer not-a-token"))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "invalid_token");
    }

    #[actix_web::test]
    async fn valid_token_reaches_the_handler_with_the_session_user() {
        let jwt_service = JwtService::new("test-secret");
        let user = SessionUser {
            id: Uuid::new_v4(),
            username: "jess".to_string(),
        };
        let token = jwt_service.generate_access_token(&user).unwrap();

        let app = test::init_service(App::new().service(
            web::scope("")
                .wrap(AuthMiddleware::new(jwt_service))
                .route("/whoami", web::get().to(whoami)),
        ))
        .await;
        let req = test::TestRequest::get()
            .uri("/whoami")
            .insert_header(("Authorization", format!("Bearer {token}")))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::OK);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["username"], "jess");
    }
}
