use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The identity attached to an authenticated request.
///
/// Campground authorship embeds a denormalized display name, so the session
/// carries the username alongside the user id.
#[derive(Debug, Clone, Serialize)]
pub struct SessionUser {
    /// Unique identifier for the user
    pub id: Uuid,
    /// Display name of the user
    pub username: String,
}

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Subject of the token, typically the user ID
    pub sub: String, // user ID
    /// Display name of the user
    pub username: String,
    /// Expiration timestamp of the token
    pub exp: usize, // expiration timestamp
    /// Issued at timestamp of the token
    pub iat: usize, // issued at timestamp
}

/// Custom error type for authentication-related errors
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// No bearer token was supplied on a protected route
    #[error("Authorization token is required")]
    MissingToken,

    /// An error occurred while decoding or validating the token
    #[error("JWT error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),
}

impl actix_web::ResponseError for AuthError {
    fn error_response(&self) -> actix_web::HttpResponse {
        use actix_web::HttpResponse;

        match self {
            AuthError::MissingToken => HttpResponse::Unauthorized().json(serde_json::json!({
                "error": "missing_token",
                "message": "Authorization token is required"
            })),
            AuthError::Jwt(_) => HttpResponse::Unauthorized().json(serde_json::json!({
                "error": "invalid_token",
                "message": "Invalid or expired token"
            })),
        }
    }
}
