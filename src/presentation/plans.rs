use crate::domain::models::{StudyTask, UpdateTask};
use crate::domain::user::CurrentUser;
use crate::presentation::error::ApiError;
use crate::presentation::handlers::AppState;
use actix_web::{HttpResponse, web};
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument};

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratePlanResponse {
    pub message: String,
    pub course_id: i64,
    pub tasks: Vec<StudyTask>,
}

#[instrument(skip(state, user), fields(user_id = user.id, course_id = %*path))]
pub async fn generate_plan(
    state: web::Data<AppState>,
    user: CurrentUser,
    path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    let course_id = path.into_inner();
    info!(course_id, "Generating plan");
    let tasks = state
        .plans
        .generate_plan(user.id, course_id)
        .await
        .map_err(|e| {
            error!(course_id, error = %e, "Failed to generate plan");
            e
        })?;
    Ok(HttpResponse::Ok().json(GeneratePlanResponse {
        message: format!("generated {} tasks for course {}", tasks.len(), course_id),
        course_id,
        tasks,
    }))
}

#[instrument(skip(state, user), fields(user_id = user.id, course_id = %*path))]
pub async fn list_plan(
    state: web::Data<AppState>,
    user: CurrentUser,
    path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    let tasks = state.plans.list_plan(user.id, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(tasks))
}

#[instrument(skip(state, user, req), fields(user_id = user.id, task_id = %*path))]
pub async fn update_task(
    state: web::Data<AppState>,
    user: CurrentUser,
    path: web::Path<i64>,
    req: web::Json<UpdateTask>,
) -> Result<HttpResponse, ApiError> {
    let task = state
        .plans
        .set_task_completed(user.id, path.into_inner(), req.completed)
        .await?;
    Ok(HttpResponse::Ok().json(task))
}
