use crate::application::planner::build_plan;
use crate::domain::error::DomainError;
use crate::domain::models::{Course, StudyTask};
use crate::domain::repository::{CourseRepository, MaterialRepository, StudyTaskRepository};
use anyhow::Result;
use std::sync::Arc;
use tracing::{info, instrument, warn};

pub struct PlanService<R>
where
    R: CourseRepository + MaterialRepository + StudyTaskRepository,
{
    repository: Arc<R>,
}

impl<R> PlanService<R>
where
    R: CourseRepository + MaterialRepository + StudyTaskRepository,
{
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    async fn owned_course(&self, user_id: i64, course_id: i64) -> Result<Course> {
        self.repository
            .find_course_for_user(course_id, user_id)
            .await?
            .ok_or_else(|| DomainError::course_not_found(course_id).into())
    }

    /// Replaces the course's plan with a freshly built one. Refuses once any
    /// task of the current plan has been completed.
    #[instrument(skip(self))]
    pub async fn generate_plan(&self, user_id: i64, course_id: i64) -> Result<Vec<StudyTask>> {
        let course = self.owned_course(user_id, course_id).await?;
        let materials = self.repository.list_materials_for_course(course_id).await?;
        let tasks = build_plan(&course, &materials)?;

        let saved = self
            .repository
            .replace_tasks_for_course(course_id, &tasks)
            .await
            .map_err(|e| {
                if let Some(DomainError::Conflict(_)) = e.downcast_ref::<DomainError>() {
                    warn!(course_id, "Plan has progress, refusing to regenerate");
                }
                e
            })?;
        info!(
            course_id,
            materials = materials.len(),
            tasks = saved.len(),
            "Plan generated"
        );
        Ok(saved)
    }

    #[instrument(skip(self))]
    pub async fn list_plan(&self, user_id: i64, course_id: i64) -> Result<Vec<StudyTask>> {
        self.owned_course(user_id, course_id).await?;
        self.repository.list_tasks_for_course(course_id).await
    }

    #[instrument(skip(self))]
    pub async fn set_task_completed(
        &self,
        user_id: i64,
        task_id: i64,
        completed: bool,
    ) -> Result<StudyTask> {
        let mut task = self
            .repository
            .find_task_for_user(task_id, user_id)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("Task {} not found", task_id)))?;
        self.repository.set_task_completed(task_id, completed).await?;
        task.completed = completed;
        info!(task_id, completed, "Task updated");
        Ok(task)
    }
}
