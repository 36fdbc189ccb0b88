use actix_multipart::Multipart;
use actix_web::{HttpResponse, Result, web};
use validator::Validate;

use auth_services::middleware::AuthenticatedUser;
use campground_services::{CampgroundError, CampgroundService, ListQuery};

use crate::campground_form::read_campground_form;

/// Lists campgrounds, paginated, or searches them by name.
pub async fn list_campgrounds(
    service: web::Data<CampgroundService>,
    query: web::Query<ListQuery>,
) -> Result<HttpResponse, CampgroundError> {
    let page = service.list(&query).await?;
    Ok(HttpResponse::Ok().json(page))
}

/// Creates a campground for the authenticated user.
pub async fn create_campground(
    service: web::Data<CampgroundService>,
    user: AuthenticatedUser,
    payload: Multipart,
) -> Result<HttpResponse, CampgroundError> {
    let (form, image) = read_campground_form(payload).await?;

    // Validate the request
    form.validate()
        .map_err(|e| CampgroundError::Validation(format!("Validation error: {}", e)))?;

    let image = image.ok_or_else(|| {
        CampgroundError::Validation("An image file is required".to_string())
    })?;

    let campground = service.create(&user.0, form, image).await?;
    Ok(HttpResponse::Created().json(campground))
}

/// Shows a single campground with its comments and reviews expanded.
pub async fn show_campground(
    service: web::Data<CampgroundService>,
    path: web::Path<uuid::Uuid>,
) -> Result<HttpResponse, CampgroundError> {
    let detail = service.show(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(detail))
}

/// Updates a campground owned by the authenticated user.
pub async fn update_campground(
    service: web::Data<CampgroundService>,
    user: AuthenticatedUser,
    path: web::Path<uuid::Uuid>,
    payload: Multipart,
) -> Result<HttpResponse, CampgroundError> {
    let (form, image) = read_campground_form(payload).await?;

    // Validate the request
    form.validate()
        .map_err(|e| CampgroundError::Validation(format!("Validation error: {}", e)))?;

    let campground = service
        .update(path.into_inner(), &user.0, form, image)
        .await?;
    Ok(HttpResponse::Ok().json(campground))
}

/// Deletes a campground owned by the authenticated user, cascading to its
/// comments, reviews and stored image.
pub async fn delete_campground(
    service: web::Data<CampgroundService>,
    user: AuthenticatedUser,
    path: web::Path<uuid::Uuid>,
) -> Result<HttpResponse, CampgroundError> {
    service.delete(path.into_inner(), &user.0).await?;
    Ok(HttpResponse::NoContent().finish())
}
