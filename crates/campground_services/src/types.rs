use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use media_services::StoredImage;

/// Number of campgrounds shown per listing page.
pub const PER_PAGE: i64 = 8;

/// Message returned when a search yields no campgrounds.
pub const NO_MATCH_MESSAGE: &str = "No campgrounds match that query, please try again.";

/// The author of a campground: owner id plus denormalized display name.
///
/// Bound from the caller's session at creation time and immutable afterwards.
#[derive(Debug, Clone, Serialize)]
pub struct CampgroundAuthor {
    /// Unique identifier of the owning user
    pub id: Uuid,
    /// Display name of the owning user
    pub username: String,
}

/// A stored campground image: public URL plus the deletion handle.
///
/// The two fields are set or unset together; the type makes a half-set pair
/// unrepresentable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CampgroundImage {
    /// Durable, publicly reachable URL of the image
    pub url: String,
    /// Opaque handle used to delete the remote asset
    pub public_id: String,
}

impl From<StoredImage> for CampgroundImage {
    fn from(stored: StoredImage) -> Self {
        Self {
            url: stored.url,
            public_id: stored.public_id,
        }
    }
}

/// A campground listing.
#[derive(Debug, Clone, Serialize)]
pub struct Campground {
    /// Store-assigned identifier
    pub id: Uuid,
    /// Display name of the campground
    pub name: String,
    /// Nightly price, free-form text
    pub price: String,
    /// Description of the campground
    pub description: String,
    /// Canonical address produced by geocoding
    pub location: String,
    /// Latitude produced by geocoding
    pub lat: f64,
    /// Longitude produced by geocoding
    pub lng: f64,
    /// Uploaded image, absent only for never-enriched records
    pub image: Option<CampgroundImage>,
    /// When the campground was created
    pub created_at: DateTime<Utc>,
    /// Owner identity, immutable after creation
    pub author: CampgroundAuthor,
    /// Ids of comments attached to this campground
    pub comment_ids: Vec<Uuid>,
    /// Ids of reviews attached to this campground
    pub review_ids: Vec<Uuid>,
    /// Numeric ratings accumulated from reviews
    pub rating: Vec<f64>,
}

/// A comment attached to a campground (referenced child record).
#[derive(Debug, Clone, Serialize)]
pub struct Comment {
    /// Unique identifier for the comment
    pub id: Uuid,
    /// Body of the comment
    pub text: String,
    /// Display name of the comment author
    pub author_username: String,
    /// When the comment was created
    pub created_at: DateTime<Utc>,
}

/// A review attached to a campground (referenced child record).
#[derive(Debug, Clone, Serialize)]
pub struct Review {
    /// Unique identifier for the review
    pub id: Uuid,
    /// Numeric rating given by the reviewer
    pub rating: f64,
    /// Body of the review
    pub text: String,
    /// Display name of the reviewer
    pub author_username: String,
    /// When the review was created
    pub created_at: DateTime<Utc>,
}

/// A campground with its comment and review references expanded.
#[derive(Debug, Clone, Serialize)]
pub struct CampgroundDetail {
    /// The campground record itself
    #[serde(flatten)]
    pub campground: Campground,
    /// Expanded comments
    pub comments: Vec<Comment>,
    /// Expanded reviews, newest first
    pub reviews: Vec<Review>,
}

/// Client-writable campground fields, shared by create and update.
///
/// Rating and author are deliberately absent: whatever a client sends for
/// them is discarded at deserialization and can never reach the store.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CampgroundForm {
    /// Display name of the campground
    #[validate(length(min = 1, max = 255, message = "Name is required"))]
    pub name: String,

    /// Nightly price, free-form text
    #[validate(length(min = 1, message = "Price is required"))]
    pub price: String,

    /// Description of the campground
    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,

    /// Free-text address to geocode
    #[validate(length(min = 1, message = "Location is required"))]
    pub location: String,
}

/// A fully enriched record ready for insertion.
#[derive(Debug, Clone)]
pub struct NewCampgroundRecord {
    /// Display name
    pub name: String,
    /// Nightly price, free-form text
    pub price: String,
    /// Description
    pub description: String,
    /// Canonical address produced by geocoding
    pub location: String,
    /// Latitude produced by geocoding
    pub lat: f64,
    /// Longitude produced by geocoding
    pub lng: f64,
    /// Uploaded image
    pub image: CampgroundImage,
    /// Owner identity from the caller's session
    pub author: CampgroundAuthor,
}

/// The fields an update may change.
///
/// No rating or author here either: update can only touch the listing fields
/// and, optionally, replace the image.
#[derive(Debug, Clone)]
pub struct CampgroundUpdate {
    /// Display name
    pub name: String,
    /// Nightly price, free-form text
    pub price: String,
    /// Description
    pub description: String,
    /// Canonical address produced by geocoding
    pub location: String,
    /// Latitude produced by geocoding
    pub lat: f64,
    /// Longitude produced by geocoding
    pub lng: f64,
    /// Replacement image, if a new file was uploaded
    pub image: Option<CampgroundImage>,
}

/// Query parameters for the listing endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListQuery {
    /// Case-insensitive substring to match against campground names
    pub search: Option<String>,
    /// 1-based page number; ignored when `search` is present
    pub page: Option<i64>,
}

/// Pagination metadata for a listing page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageInfo {
    /// Current 1-based page number
    pub current: i64,
    /// Total number of pages
    pub pages: i64,
}

/// One page of campgrounds, or the full result set of a search.
#[derive(Debug, Clone, Serialize)]
pub struct CampgroundPage {
    /// The campgrounds on this page
    pub campgrounds: Vec<Campground>,
    /// Pagination metadata; absent in search mode
    pub pagination: Option<PageInfo>,
    /// Explicit no-match indicator for empty search results
    pub no_match: Option<String>,
}

/// Custom error type for campground lifecycle operations
#[derive(Debug, thiserror::Error)]
pub enum CampgroundError {
    /// The geocoder returned no usable result for the submitted address
    #[error("Invalid address")]
    InvalidAddress,

    /// The image storage service rejected or failed an upload or deletion
    #[error("{0}")]
    Upload(#[from] media_services::MediaError),

    /// No campground exists for the requested id
    #[error("Campground not found")]
    NotFound,

    /// The caller is not the owner of the campground
    #[error("You don't have permission to do that")]
    Forbidden,

    /// A store operation failed
    #[error("Database error: {0}")]
    Persistence(#[from] sqlx::Error),

    /// Inbound data failed validation
    #[error("Validation error: {0}")]
    Validation(String),
}

impl actix_web::ResponseError for CampgroundError {
    fn error_response(&self) -> actix_web::HttpResponse {
        use actix_web::HttpResponse;

        match self {
            CampgroundError::InvalidAddress => HttpResponse::BadRequest().json(serde_json::json!({
                "error": "invalid_address",
                "message": "Invalid address"
            })),
            CampgroundError::Upload(e) => HttpResponse::BadGateway().json(serde_json::json!({
                "error": "upload_failed",
                "message": e.to_string()
            })),
            CampgroundError::NotFound => HttpResponse::NotFound().json(serde_json::json!({
                "error": "not_found",
                "message": "Campground not found"
            })),
            CampgroundError::Forbidden => HttpResponse::Forbidden().json(serde_json::json!({
                "error": "forbidden",
                "message": "You don't have permission to do that"
            })),
            CampgroundError::Persistence(_) => {
                HttpResponse::InternalServerError().json(serde_json::json!({
                    "error": "database_error",
                    "message": "An internal error occurred"
                }))
            }
            CampgroundError::Validation(msg) => HttpResponse::BadRequest().json(serde_json::json!({
                "error": "validation_error",
                "message": msg
            })),
        }
    }
}
