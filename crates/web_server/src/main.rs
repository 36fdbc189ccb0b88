//! Main entry point for the Campground Directory backend server.
//! This crate wires the repository, geocoding and image storage adapters into
//! the campground lifecycle service and exposes it over REST.

use std::sync::Arc;

use actix_web::{App, HttpResponse, HttpServer, Result, middleware::Logger, web};

use auth_services::jwt::JwtService;
use auth_services::middleware::AuthMiddleware;
use campground_services::{CampgroundService, PgCampgroundRepository};
use geo_services::{GeocoderConfig, GoogleGeocoder};
use media_services::{CloudinaryStore, MediaConfig};
use postgres::database::*;
use web_handlers::*;

async fn api_health() -> Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Campground directory backend",
        "status": "running"
    })))
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize logger
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    log::info!("🚀 Starting campground directory server...");

    // Create database connection pool
    let pool = match create_connection_pool().await {
        Ok(pool) => {
            log::info!("🗃️ Database pool created successfully");

            if let Err(e) = test_connection(&pool).await {
                log::error!("❌ Database connection test failed: {}", e);
            }
            pool
        }
        Err(e) => {
            log::error!("❌ Failed to create database pool: {}", e);
            std::process::exit(1);
        }
    };

    // Build the external-service adapters from explicit configuration
    let geocoder = match GeocoderConfig::from_env().and_then(GoogleGeocoder::new) {
        Ok(geocoder) => geocoder,
        Err(e) => {
            log::error!("❌ Failed to initialize geocoder: {}", e);
            std::process::exit(1);
        }
    };

    let image_store = match MediaConfig::from_env().and_then(CloudinaryStore::new) {
        Ok(store) => store,
        Err(e) => {
            log::error!("❌ Failed to initialize image storage: {}", e);
            std::process::exit(1);
        }
    };

    let repository = PgCampgroundRepository::new(pool.clone());
    let campground_service = web::Data::new(CampgroundService::new(
        Arc::new(repository),
        Arc::new(geocoder),
        Arc::new(image_store),
    ));

    let jwt_service = JwtService::from_env();

    log::info!("🌐 Server will be available at: http://0.0.0.0:8080");

    HttpServer::new(move || {
        App::new()
            .app_data(campground_service.clone())
            .wrap(Logger::default())
            .service(
                web::scope("/api")
                    // Public routes
                    .route("/health", web::get().to(api_health))
                    .route("/campgrounds", web::get().to(list_campgrounds))
                    .route("/campgrounds/{id}", web::get().to(show_campground))
                    // Mutating routes (require authentication)
                    .service(
                        web::scope("/campgrounds")
                            .wrap(AuthMiddleware::new(jwt_service.clone()))
                            .route("", web::post().to(create_campground))
                            .route("/{id}", web::put().to(update_campground))
                            .route("/{id}", web::delete().to(delete_campground)),
                    ),
            )
    })
    .bind("0.0.0.0:8080")?
    .run()
    .await
}
