//! Deterministic study-plan construction.
//!
//! The planner only looks at the course and its materials, never at the clock,
//! so the same inputs always produce the same task list.

use crate::domain::error::DomainError;
use crate::domain::models::{Course, Material, NewStudyTask};
use chrono::{Days, NaiveDate};

pub const FINAL_REVIEW_TITLE: &str = "Final review";

/// One schedulable piece of work: a whole material, or one of its topics.
#[derive(Debug, Clone, PartialEq)]
struct StudyUnit {
    material_id: i64,
    title: String,
    description: Option<String>,
}

fn study_units(materials: &[Material]) -> Vec<StudyUnit> {
    let mut ordered: Vec<&Material> = materials.iter().collect();
    ordered.sort_by_key(|m| m.id);

    let mut units = Vec::new();
    for material in ordered {
        let topics = material.topics();
        if topics.is_empty() {
            units.push(StudyUnit {
                material_id: material.id,
                title: format!("Study: {}", material.title),
                description: None,
            });
            continue;
        }
        for (index, topic) in topics.iter().enumerate() {
            units.push(StudyUnit {
                material_id: material.id,
                title: format!("Study: {} - {}", material.title, topic.title),
                description: topic
                    .summary
                    .clone()
                    .or_else(|| Some(format!("Topic {} of {}", index + 1, topics.len()))),
            });
        }
    }
    units
}

/// Builds the plan for `course`, spreading study units from term start up to
/// the day before the exam and closing with a final review.
pub fn build_plan(course: &Course, materials: &[Material]) -> Result<Vec<NewStudyTask>, DomainError> {
    let exam = course.main_exam_date.ok_or_else(|| {
        DomainError::validation("mainExamDate", "course has no main exam date to plan towards")
    })?;
    if course.term_end < course.term_start {
        return Err(DomainError::validation(
            "termEnd",
            "term ends before it starts",
        ));
    }
    let window_start = course.term_start;
    let window_end = exam
        .pred_opt()
        .filter(|last| *last >= window_start)
        .ok_or_else(|| {
            DomainError::validation(
                "mainExamDate",
                "exam leaves no study days after term start",
            )
        })?;

    let units = study_units(materials);
    if units.is_empty() {
        return Err(DomainError::validation(
            "materials",
            "course has no materials to plan",
        ));
    }

    let days = (window_end - window_start).num_days() as u64 + 1;
    let unit_count = units.len() as u64;
    let spread_days = if days > unit_count { days - 1 } else { days };

    let mut tasks = Vec::with_capacity(units.len() + 1);
    for (index, unit) in units.into_iter().enumerate() {
        let offset = index as u64 * spread_days / unit_count;
        tasks.push(NewStudyTask {
            material_id: Some(unit.material_id),
            scheduled_date: add_days(window_start, offset)?,
            title: unit.title,
            description: unit.description,
        });
    }
    tasks.push(NewStudyTask {
        material_id: None,
        scheduled_date: window_end,
        title: FINAL_REVIEW_TITLE.to_string(),
        description: Some(format!("Review all materials before the exam on {}", exam)),
    });
    Ok(tasks)
}

fn add_days(date: NaiveDate, offset: u64) -> Result<NaiveDate, DomainError> {
    date.checked_add_days(Days::new(offset))
        .ok_or_else(|| DomainError::Internal(format!("date overflow adding {} days", offset)))
}
