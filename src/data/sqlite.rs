use crate::domain::error::DomainError;
use crate::domain::models::{
    Course, Material, MaterialRow, NewCourse, NewMaterial, NewStudyTask, StudyTask,
};
use crate::domain::repository::{
    CourseRepository, MaterialRepository, StudyTaskRepository, UserRepository,
};
use crate::domain::user::User;
use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::SqlitePool;
use tracing::{debug, instrument, trace};

const COURSE_COLUMNS: &str = "id, user_id, name, term_start, term_end, main_exam_date";
const TASK_COLUMNS: &str =
    "t.id, t.course_id, t.material_id, t.scheduled_date, t.title, t.description, t.completed";

#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for SqliteStore {
    #[instrument(skip(self, name))]
    async fn get_or_create_user(&self, email: &str, name: &str) -> Result<User> {
        let inserted = sqlx::query(
            "INSERT INTO users (email, name) VALUES (?, ?) ON CONFLICT(email) DO NOTHING",
        )
        .bind(email)
        .bind(name)
        .execute(&self.pool)
        .await?
        .rows_affected();
        if inserted > 0 {
            debug!(email = email, "Created user");
        }

        let user = sqlx::query_as::<_, User>("SELECT id, email, name FROM users WHERE email = ?")
            .bind(email)
            .fetch_one(&self.pool)
            .await?;
        trace!(user_id = user.id, "User resolved");
        Ok(user)
    }
}

#[async_trait]
impl CourseRepository for SqliteStore {
    #[instrument(skip(self, course), fields(name = %course.name))]
    async fn insert_course(&self, user_id: i64, course: &NewCourse) -> Result<i64> {
        let id = sqlx::query(
            "INSERT INTO courses (user_id, name, term_start, term_end, main_exam_date) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(user_id)
        .bind(&course.name)
        .bind(course.term_start)
        .bind(course.term_end)
        .bind(course.main_exam_date)
        .execute(&self.pool)
        .await?
        .last_insert_rowid();
        debug!(course_id = id, "Course inserted");
        Ok(id)
    }

    async fn list_courses_for_user(&self, user_id: i64) -> Result<Vec<Course>> {
        let sql = format!(
            "SELECT {} FROM courses WHERE user_id = ? ORDER BY id",
            COURSE_COLUMNS
        );
        let courses = sqlx::query_as::<_, Course>(&sql)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(courses)
    }

    async fn find_course_for_user(&self, course_id: i64, user_id: i64) -> Result<Option<Course>> {
        let sql = format!(
            "SELECT {} FROM courses WHERE id = ? AND user_id = ?",
            COURSE_COLUMNS
        );
        let course = sqlx::query_as::<_, Course>(&sql)
            .bind(course_id)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(course)
    }
}

#[async_trait]
impl MaterialRepository for SqliteStore {
    #[instrument(skip(self, material), fields(course_id = material.course_id))]
    async fn insert_material(&self, material: &NewMaterial) -> Result<i64> {
        let metadata_json = material
            .metadata
            .as_ref()
            .map(serde_json::to_string)
            .transpose()
            .context("Failed to encode material metadata")?;
        let id = sqlx::query(
            "INSERT INTO materials (course_id, title, file_path, raw_text, metadata_json) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(material.course_id)
        .bind(&material.title)
        .bind(&material.file_path)
        .bind(&material.raw_text)
        .bind(metadata_json)
        .execute(&self.pool)
        .await?
        .last_insert_rowid();
        debug!(material_id = id, "Material inserted");
        Ok(id)
    }

    async fn list_materials_for_course(&self, course_id: i64) -> Result<Vec<Material>> {
        let rows = sqlx::query_as::<_, MaterialRow>(
            "SELECT id, course_id, title, file_path, raw_text, metadata_json FROM materials WHERE course_id = ? ORDER BY id",
        )
        .bind(course_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|row| {
                let id = row.id;
                Material::try_from(row)
                    .with_context(|| format!("Material {} has unreadable metadata", id))
            })
            .collect()
    }
}

#[async_trait]
impl StudyTaskRepository for SqliteStore {
    async fn list_tasks_for_course(&self, course_id: i64) -> Result<Vec<StudyTask>> {
        let sql = format!(
            "SELECT {} FROM study_tasks t WHERE t.course_id = ? ORDER BY t.scheduled_date, t.id",
            TASK_COLUMNS
        );
        let tasks = sqlx::query_as::<_, StudyTask>(&sql)
            .bind(course_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(tasks)
    }

    #[instrument(skip(self, tasks), fields(task_count = tasks.len()))]
    async fn replace_tasks_for_course(
        &self,
        course_id: i64,
        tasks: &[NewStudyTask],
    ) -> Result<Vec<StudyTask>> {
        let mut tx = self.pool.begin().await?;

        let completed = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM study_tasks WHERE course_id = ? AND completed = 1",
        )
        .bind(course_id)
        .fetch_one(&mut *tx)
        .await?;
        if completed > 0 {
            tx.rollback().await?;
            return Err(DomainError::Conflict(format!(
                "Course {} already has {} completed task(s); the existing plan was kept",
                course_id, completed
            ))
            .into());
        }

        let removed = sqlx::query("DELETE FROM study_tasks WHERE course_id = ?")
            .bind(course_id)
            .execute(&mut *tx)
            .await?
            .rows_affected();
        trace!(removed, "Previous plan removed");

        for task in tasks {
            sqlx::query(
                "INSERT INTO study_tasks (course_id, material_id, scheduled_date, title, description, completed) VALUES (?, ?, ?, ?, ?, 0)",
            )
            .bind(course_id)
            .bind(task.material_id)
            .bind(task.scheduled_date)
            .bind(&task.title)
            .bind(&task.description)
            .execute(&mut *tx)
            .await?;
        }

        let sql = format!(
            "SELECT {} FROM study_tasks t WHERE t.course_id = ? ORDER BY t.scheduled_date, t.id",
            TASK_COLUMNS
        );
        let saved = sqlx::query_as::<_, StudyTask>(&sql)
            .bind(course_id)
            .fetch_all(&mut *tx)
            .await?;

        tx.commit().await?;
        debug!(course_id, saved = saved.len(), "Plan stored");
        Ok(saved)
    }

    async fn find_task_for_user(&self, task_id: i64, user_id: i64) -> Result<Option<StudyTask>> {
        let sql = format!(
            "SELECT {} FROM study_tasks t JOIN courses c ON c.id = t.course_id WHERE t.id = ? AND c.user_id = ?",
            TASK_COLUMNS
        );
        let task = sqlx::query_as::<_, StudyTask>(&sql)
            .bind(task_id)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(task)
    }

    async fn set_task_completed(&self, task_id: i64, completed: bool) -> Result<()> {
        sqlx::query("UPDATE study_tasks SET completed = ? WHERE id = ?")
            .bind(completed)
            .bind(task_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::database::connect_in_memory;
    use crate::domain::models::{MaterialMetadata, Topic};
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    async fn store() -> SqliteStore {
        SqliteStore::new(connect_in_memory().await.unwrap())
    }

    fn sample_course() -> NewCourse {
        NewCourse {
            name: "Databases".to_string(),
            term_start: date(2025, 2, 1),
            term_end: date(2025, 5, 31),
            main_exam_date: None,
        }
    }

    #[tokio::test]
    async fn test_get_or_create_user_is_idempotent() {
        let store = store().await;
        let first = store.get_or_create_user("a@example.com", "A").await.unwrap();
        let second = store.get_or_create_user("a@example.com", "Other").await.unwrap();
        assert_eq!(first.id, second.id);
        assert_eq!(second.name.as_deref(), Some("A"));
    }

    #[tokio::test]
    async fn test_courses_are_scoped_to_owner() {
        let store = store().await;
        let alice = store.get_or_create_user("alice@example.com", "Alice").await.unwrap();
        let bob = store.get_or_create_user("bob@example.com", "Bob").await.unwrap();

        let id = store.insert_course(alice.id, &sample_course()).await.unwrap();

        let found = store.find_course_for_user(id, alice.id).await.unwrap().unwrap();
        assert_eq!(found.name, "Databases");
        assert_eq!(found.term_start, date(2025, 2, 1));
        assert_eq!(found.main_exam_date, None);

        assert!(store.find_course_for_user(id, bob.id).await.unwrap().is_none());
        assert!(store.list_courses_for_user(bob.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_material_metadata_round_trips_through_json_column() {
        let store = store().await;
        let user = store.get_or_create_user("m@example.com", "M").await.unwrap();
        let course_id = store.insert_course(user.id, &sample_course()).await.unwrap();
        let metadata = MaterialMetadata::V1 {
            topics: vec![Topic {
                title: "Normal forms".to_string(),
                summary: None,
            }],
        };

        store
            .insert_material(&NewMaterial {
                course_id,
                title: "Lecture 3".to_string(),
                file_path: Some("uploads/l3.pdf".to_string()),
                raw_text: None,
                metadata: Some(metadata.clone()),
            })
            .await
            .unwrap();

        let materials = store.list_materials_for_course(course_id).await.unwrap();
        assert_eq!(materials.len(), 1);
        assert_eq!(materials[0].metadata, Some(metadata));
        assert_eq!(materials[0].file_path.as_deref(), Some("uploads/l3.pdf"));
    }

    #[tokio::test]
    async fn test_insert_material_for_missing_course_violates_foreign_key() {
        let store = store().await;
        let result = store
            .insert_material(&NewMaterial {
                course_id: 999,
                title: "Orphan".to_string(),
                file_path: None,
                raw_text: None,
                metadata: None,
            })
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_replace_tasks_swaps_whole_plan() {
        let store = store().await;
        let user = store.get_or_create_user("t@example.com", "T").await.unwrap();
        let course_id = store.insert_course(user.id, &sample_course()).await.unwrap();

        let task = |d: u32, title: &str| NewStudyTask {
            material_id: None,
            scheduled_date: date(2025, 3, d),
            title: title.to_string(),
            description: None,
        };

        store
            .replace_tasks_for_course(course_id, &[task(2, "old a"), task(1, "old b")])
            .await
            .unwrap();
        let saved = store
            .replace_tasks_for_course(course_id, &[task(5, "new")])
            .await
            .unwrap();

        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].title, "new");
        assert!(!saved[0].completed);
        assert_eq!(store.list_tasks_for_course(course_id).await.unwrap(), saved);
    }

    #[tokio::test]
    async fn test_task_completion_and_ownership() {
        let store = store().await;
        let owner = store.get_or_create_user("o@example.com", "O").await.unwrap();
        let stranger = store.get_or_create_user("s@example.com", "S").await.unwrap();
        let course_id = store.insert_course(owner.id, &sample_course()).await.unwrap();
        let saved = store
            .replace_tasks_for_course(
                course_id,
                &[NewStudyTask {
                    material_id: None,
                    scheduled_date: date(2025, 4, 1),
                    title: "Read chapter 1".to_string(),
                    description: Some("pages 1-30".to_string()),
                }],
            )
            .await
            .unwrap();
        let task_id = saved[0].id;

        assert!(store.find_task_for_user(task_id, stranger.id).await.unwrap().is_none());

        store.set_task_completed(task_id, true).await.unwrap();
        let task = store.find_task_for_user(task_id, owner.id).await.unwrap().unwrap();
        assert!(task.completed);
    }

    #[tokio::test]
    async fn test_replace_tasks_refuses_when_progress_exists() {
        let store = store().await;
        let user = store.get_or_create_user("p@example.com", "P").await.unwrap();
        let course_id = store.insert_course(user.id, &sample_course()).await.unwrap();
        let task = NewStudyTask {
            material_id: None,
            scheduled_date: date(2025, 4, 2),
            title: "Problem set 2".to_string(),
            description: None,
        };
        let saved = store
            .replace_tasks_for_course(course_id, &[task.clone()])
            .await
            .unwrap();
        store.set_task_completed(saved[0].id, true).await.unwrap();

        let err = store
            .replace_tasks_for_course(course_id, &[task])
            .await
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DomainError>(),
            Some(DomainError::Conflict(_))
        ));

        let remaining = store.list_tasks_for_course(course_id).await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].id, saved[0].id);
        assert!(remaining[0].completed);
    }

    #[tokio::test]
    async fn test_deleting_course_cascades_to_materials_and_tasks() {
        let store = store().await;
        let user = store.get_or_create_user("c@example.com", "C").await.unwrap();
        let course_id = store.insert_course(user.id, &sample_course()).await.unwrap();
        let material_id = store
            .insert_material(&NewMaterial {
                course_id,
                title: "Lecture 1".to_string(),
                file_path: None,
                raw_text: None,
                metadata: None,
            })
            .await
            .unwrap();
        store
            .replace_tasks_for_course(
                course_id,
                &[NewStudyTask {
                    material_id: Some(material_id),
                    scheduled_date: date(2025, 3, 3),
                    title: "Study: Lecture 1".to_string(),
                    description: None,
                }],
            )
            .await
            .unwrap();

        sqlx::query("DELETE FROM courses WHERE id = ?")
            .bind(course_id)
            .execute(&store.pool)
            .await
            .unwrap();

        let materials: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM materials")
            .fetch_one(&store.pool)
            .await
            .unwrap();
        let tasks: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM study_tasks")
            .fetch_one(&store.pool)
            .await
            .unwrap();
        assert_eq!(materials, 0);
        assert_eq!(tasks, 0);
    }

    #[tokio::test]
    async fn test_deleting_material_unlinks_its_tasks() {
        let store = store().await;
        let user = store.get_or_create_user("n@example.com", "N").await.unwrap();
        let course_id = store.insert_course(user.id, &sample_course()).await.unwrap();
        let material_id = store
            .insert_material(&NewMaterial {
                course_id,
                title: "Handout".to_string(),
                file_path: None,
                raw_text: None,
                metadata: None,
            })
            .await
            .unwrap();
        let saved = store
            .replace_tasks_for_course(
                course_id,
                &[NewStudyTask {
                    material_id: Some(material_id),
                    scheduled_date: date(2025, 3, 4),
                    title: "Study: Handout".to_string(),
                    description: None,
                }],
            )
            .await
            .unwrap();

        sqlx::query("DELETE FROM materials WHERE id = ?")
            .bind(material_id)
            .execute(&store.pool)
            .await
            .unwrap();

        let tasks = store.list_tasks_for_course(course_id).await.unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].id, saved[0].id);
        assert_eq!(tasks[0].material_id, None);
    }
}
