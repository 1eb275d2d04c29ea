use crate::domain::models::{
    Course, Material, NewCourse, NewMaterial, NewStudyTask, StudyTask,
};
use crate::domain::user::User;
use anyhow::Result;
use async_trait::async_trait;

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Returns the user with `email`, inserting it first if absent.
    async fn get_or_create_user(&self, email: &str, name: &str) -> Result<User>;
}

#[async_trait]
pub trait CourseRepository: Send + Sync {
    async fn insert_course(&self, user_id: i64, course: &NewCourse) -> Result<i64>;
    async fn list_courses_for_user(&self, user_id: i64) -> Result<Vec<Course>>;
    async fn find_course_for_user(&self, course_id: i64, user_id: i64) -> Result<Option<Course>>;
}

#[async_trait]
pub trait MaterialRepository: Send + Sync {
    async fn insert_material(&self, material: &NewMaterial) -> Result<i64>;
    async fn list_materials_for_course(&self, course_id: i64) -> Result<Vec<Material>>;
}

#[async_trait]
pub trait StudyTaskRepository: Send + Sync {
    async fn list_tasks_for_course(&self, course_id: i64) -> Result<Vec<StudyTask>>;
    /// Atomically drops every task of the course and inserts `tasks`. Fails
    /// with `DomainError::Conflict`, leaving the plan untouched, when any task
    /// of the course is already completed.
    async fn replace_tasks_for_course(
        &self,
        course_id: i64,
        tasks: &[NewStudyTask],
    ) -> Result<Vec<StudyTask>>;
    async fn find_task_for_user(&self, task_id: i64, user_id: i64) -> Result<Option<StudyTask>>;
    async fn set_task_completed(&self, task_id: i64, completed: bool) -> Result<()>;
}
