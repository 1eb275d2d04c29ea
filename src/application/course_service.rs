use crate::domain::error::DomainError;
use crate::domain::models::{CourseSummary, CreateCourse};
use crate::domain::repository::CourseRepository;
use anyhow::Result;
use std::sync::Arc;
use tracing::{info, instrument, warn};

pub struct CourseService<R: CourseRepository> {
    repository: Arc<R>,
}

impl<R: CourseRepository> CourseService<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    #[instrument(skip(self))]
    pub async fn list_courses(&self, user_id: i64) -> Result<Vec<CourseSummary>> {
        let courses = self.repository.list_courses_for_user(user_id).await?;
        Ok(courses.into_iter().map(CourseSummary::from).collect())
    }

    #[instrument(skip(self, req))]
    pub async fn create_course(&self, user_id: i64, req: CreateCourse) -> Result<i64> {
        let course = req.validate().map_err(|e| {
            warn!(error = %e, "Rejected course payload");
            e
        })?;
        let id = self.repository.insert_course(user_id, &course).await?;
        info!(course_id = id, name = %course.name, "Course created");
        Ok(id)
    }

    pub async fn get_course(&self, user_id: i64, course_id: i64) -> Result<CourseSummary> {
        self.repository
            .find_course_for_user(course_id, user_id)
            .await?
            .map(CourseSummary::from)
            .ok_or_else(|| DomainError::course_not_found(course_id).into())
    }
}
