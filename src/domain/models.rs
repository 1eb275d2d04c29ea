use crate::domain::dates::{optional_date, require_date};
use crate::domain::error::DomainError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct Course {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub term_start: NaiveDate,
    pub term_end: NaiveDate,
    pub main_exam_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseSummary {
    pub id: i64,
    pub name: String,
    pub term_start: NaiveDate,
    pub term_end: NaiveDate,
    pub main_exam_date: Option<NaiveDate>,
}

impl From<Course> for CourseSummary {
    fn from(course: Course) -> Self {
        CourseSummary {
            id: course.id,
            name: course.name,
            term_start: course.term_start,
            term_end: course.term_end,
            main_exam_date: course.main_exam_date,
        }
    }
}

/// Course creation payload as sent by clients; dates are still strings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCourse {
    pub name: Option<String>,
    pub term_start: Option<String>,
    pub term_end: Option<String>,
    pub main_exam_date: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewCourse {
    pub name: String,
    pub term_start: NaiveDate,
    pub term_end: NaiveDate,
    pub main_exam_date: Option<NaiveDate>,
}

impl CreateCourse {
    pub fn validate(self) -> Result<NewCourse, DomainError> {
        let name = self
            .name
            .filter(|n| !n.trim().is_empty())
            .ok_or_else(|| DomainError::validation("name", "is required"))?;
        let term_start = require_date("termStart", self.term_start.as_deref())?;
        let term_end = require_date("termEnd", self.term_end.as_deref())?;
        let main_exam_date = optional_date("mainExamDate", self.main_exam_date.as_deref())?;

        if term_end < term_start {
            return Err(DomainError::validation(
                "termEnd",
                "must not be before termStart",
            ));
        }
        if let Some(exam) = main_exam_date {
            if exam < term_start {
                return Err(DomainError::validation(
                    "mainExamDate",
                    "must not be before termStart",
                ));
            }
        }

        Ok(NewCourse {
            name,
            term_start,
            term_end,
            main_exam_date,
        })
    }
}

/// Versioned material annotations. New versions get a new variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "version")]
pub enum MaterialMetadata {
    #[serde(rename = "1")]
    V1 {
        #[serde(default)]
        topics: Vec<Topic>,
    },
}

impl MaterialMetadata {
    pub fn topics(&self) -> &[Topic] {
        match self {
            MaterialMetadata::V1 { topics } => topics,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Topic {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Material {
    pub id: i64,
    pub course_id: i64,
    pub title: String,
    pub file_path: Option<String>,
    pub raw_text: Option<String>,
    pub metadata: Option<MaterialMetadata>,
}

impl Material {
    pub fn topics(&self) -> &[Topic] {
        self.metadata.as_ref().map(|m| m.topics()).unwrap_or(&[])
    }
}

/// Row shape of the `materials` table; metadata is still raw JSON text.
#[derive(Debug, Clone, FromRow)]
pub struct MaterialRow {
    pub id: i64,
    pub course_id: i64,
    pub title: String,
    pub file_path: Option<String>,
    pub raw_text: Option<String>,
    pub metadata_json: Option<String>,
}

impl TryFrom<MaterialRow> for Material {
    type Error = serde_json::Error;

    fn try_from(row: MaterialRow) -> Result<Self, Self::Error> {
        let metadata = row
            .metadata_json
            .as_deref()
            .map(serde_json::from_str)
            .transpose()?;
        Ok(Material {
            id: row.id,
            course_id: row.course_id,
            title: row.title,
            file_path: row.file_path,
            raw_text: row.raw_text,
            metadata,
        })
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMaterial {
    pub course_id: Option<i64>,
    pub title: Option<String>,
    pub file_path: Option<String>,
    pub raw_text: Option<String>,
    pub metadata: Option<MaterialMetadata>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewMaterial {
    pub course_id: i64,
    pub title: String,
    pub file_path: Option<String>,
    pub raw_text: Option<String>,
    pub metadata: Option<MaterialMetadata>,
}

impl CreateMaterial {
    pub fn validate(self) -> Result<NewMaterial, DomainError> {
        let course_id = self
            .course_id
            .ok_or_else(|| DomainError::validation("courseId", "is required"))?;
        let title = self
            .title
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .ok_or_else(|| DomainError::validation("title", "is required"))?;
        Ok(NewMaterial {
            course_id,
            title,
            file_path: self.file_path,
            raw_text: self.raw_text,
            metadata: self.metadata,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct StudyTask {
    pub id: i64,
    pub course_id: i64,
    pub material_id: Option<i64>,
    #[serde(rename = "date")]
    pub scheduled_date: NaiveDate,
    pub title: String,
    pub description: Option<String>,
    pub completed: bool,
}

/// A task produced by the planner, not yet persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct NewStudyTask {
    pub material_id: Option<i64>,
    pub scheduled_date: NaiveDate,
    pub title: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateTask {
    pub completed: bool,
}
