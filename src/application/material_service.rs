use crate::domain::error::DomainError;
use crate::domain::models::{CreateMaterial, Material};
use crate::domain::repository::{CourseRepository, MaterialRepository};
use anyhow::Result;
use std::sync::Arc;
use tracing::{info, instrument};

pub struct MaterialService<R: CourseRepository + MaterialRepository> {
    repository: Arc<R>,
}

impl<R: CourseRepository + MaterialRepository> MaterialService<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    async fn ensure_course_owned(&self, user_id: i64, course_id: i64) -> Result<()> {
        self.repository
            .find_course_for_user(course_id, user_id)
            .await?
            .map(|_| ())
            .ok_or_else(|| DomainError::course_not_found(course_id).into())
    }

    #[instrument(skip(self, req))]
    pub async fn create_material(&self, user_id: i64, req: CreateMaterial) -> Result<i64> {
        let material = req.validate()?;
        self.ensure_course_owned(user_id, material.course_id).await?;
        let id = self.repository.insert_material(&material).await?;
        info!(material_id = id, course_id = material.course_id, "Material created");
        Ok(id)
    }

    #[instrument(skip(self))]
    pub async fn list_materials(&self, user_id: i64, course_id: i64) -> Result<Vec<Material>> {
        self.ensure_course_owned(user_id, course_id).await?;
        self.repository.list_materials_for_course(course_id).await
    }
}
