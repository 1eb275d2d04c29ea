use crate::presentation::error::ApiError;
use crate::presentation::handlers::{create_course, get_course, health_check, list_courses};
use crate::presentation::materials::{create_material, list_materials};
use crate::presentation::plans::{generate_plan, list_plan, update_task};
use actix_cors::Cors;
use actix_web::{http::header, web};

pub const ROUTES: &str = "GET /api/health, GET|POST /api/courses, GET /api/courses/{id}, \
GET|POST /api/materials, POST /api/plans/generate/{course_id}, GET /api/plans/{course_id}, \
PATCH /api/tasks/{id}";

/// Registers the `/api` scope with extractor error handlers that answer in the
/// API's error format.
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .app_data(web::JsonConfig::default().error_handler(|err, _req| {
                ApiError::validation("body", err.to_string()).into()
            }))
            .app_data(web::QueryConfig::default().error_handler(|err, _req| {
                ApiError::validation("query", err.to_string()).into()
            }))
            .app_data(web::PathConfig::default().error_handler(|err, req| {
                ApiError::NotFound(format!("{} ({})", req.path(), err)).into()
            }))
            .route("/health", web::get().to(health_check))
            .route("/courses", web::get().to(list_courses))
            .route("/courses", web::post().to(create_course))
            .route("/courses/{id}", web::get().to(get_course))
            .route("/materials", web::get().to(list_materials))
            .route("/materials", web::post().to(create_material))
            .route("/plans/generate/{course_id}", web::post().to(generate_plan))
            .route("/plans/{course_id}", web::get().to(list_plan))
            .route("/tasks/{id}", web::patch().to(update_task)),
    );
}

/// Allows a single browser origin, with credentials.
pub fn cors(origin: &str) -> Cors {
    Cors::default()
        .allowed_origin(origin)
        .allowed_methods(vec!["GET", "POST", "PATCH", "OPTIONS"])
        .allowed_headers(vec![header::CONTENT_TYPE, header::ACCEPT, header::AUTHORIZATION])
        .expose_headers(vec![
            header::HeaderName::from_static("x-request-id"),
            header::HeaderName::from_static("x-response-time"),
        ])
        .supports_credentials()
        .max_age(3600)
}
