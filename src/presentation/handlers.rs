use crate::application::course_service::CourseService;
use crate::application::material_service::MaterialService;
use crate::application::plan_service::PlanService;
use crate::application::user_service::UserService;
use crate::data::sqlite::SqliteStore;
use crate::domain::models::CreateCourse;
use crate::domain::user::{CurrentUser, SentinelIdentity};
use crate::presentation::error::ApiError;
use actix_web::{HttpResponse, web};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, instrument};

pub struct AppState {
    pub users: UserService<SqliteStore>,
    pub courses: CourseService<SqliteStore>,
    pub materials: MaterialService<SqliteStore>,
    pub plans: PlanService<SqliteStore>,
}

impl AppState {
    pub fn new(store: SqliteStore, identity: SentinelIdentity) -> Self {
        let store = Arc::new(store);
        Self {
            users: UserService::new(store.clone(), identity),
            courses: CourseService::new(store.clone()),
            materials: MaterialService::new(store.clone()),
            plans: PlanService::new(store),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreatedResponse {
    pub id: i64,
}

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    timestamp: String,
}

#[instrument]
pub async fn health_check() -> HttpResponse {
    info!("Health check requested");
    HttpResponse::Ok().json(HealthResponse {
        status: "ok".to_string(),
        timestamp: Utc::now().to_rfc3339(),
    })
}

#[instrument(skip(state, user), fields(user_id = user.id))]
pub async fn list_courses(
    state: web::Data<AppState>,
    user: CurrentUser,
) -> Result<HttpResponse, ApiError> {
    let courses = state.courses.list_courses(user.id).await.map_err(|e| {
        error!(error = %e, "Failed to list courses");
        e
    })?;
    info!(count = courses.len(), "Courses listed");
    Ok(HttpResponse::Ok().json(courses))
}

#[instrument(skip(state, user, req), fields(user_id = user.id, course_id))]
pub async fn create_course(
    state: web::Data<AppState>,
    user: CurrentUser,
    req: web::Json<CreateCourse>,
) -> Result<HttpResponse, ApiError> {
    let id = state.courses.create_course(user.id, req.into_inner()).await?;
    tracing::Span::current().record("course_id", id);
    info!(course_id = id, "Course created successfully");
    Ok(HttpResponse::Created().json(CreatedResponse { id }))
}

#[instrument(skip(state, user), fields(user_id = user.id, course_id = %*path))]
pub async fn get_course(
    state: web::Data<AppState>,
    user: CurrentUser,
    path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    let course = state.courses.get_course(user.id, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(course))
}
