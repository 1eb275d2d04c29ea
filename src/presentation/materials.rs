use crate::domain::models::CreateMaterial;
use crate::domain::user::CurrentUser;
use crate::presentation::error::ApiError;
use crate::presentation::handlers::{AppState, CreatedResponse};
use actix_web::{HttpResponse, web};
use serde::Deserialize;
use tracing::{info, instrument};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaterialQuery {
    pub course_id: i64,
}

#[instrument(skip(state, user, req), fields(user_id = user.id))]
pub async fn create_material(
    state: web::Data<AppState>,
    user: CurrentUser,
    req: web::Json<CreateMaterial>,
) -> Result<HttpResponse, ApiError> {
    let id = state
        .materials
        .create_material(user.id, req.into_inner())
        .await?;
    info!(material_id = id, "Material created successfully");
    Ok(HttpResponse::Created().json(CreatedResponse { id }))
}

#[instrument(skip(state, user), fields(user_id = user.id, course_id = query.course_id))]
pub async fn list_materials(
    state: web::Data<AppState>,
    user: CurrentUser,
    query: web::Query<MaterialQuery>,
) -> Result<HttpResponse, ApiError> {
    let materials = state
        .materials
        .list_materials(user.id, query.course_id)
        .await?;
    Ok(HttpResponse::Ok().json(materials))
}
