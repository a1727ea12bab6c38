//! Templated sample lesson plans built from the active facet selections.
//! A quick-action convenience: no LLM call, deterministic apart from the date.

use chrono::Utc;

use crate::filters::{FilterContext, ALL_GRADES, ALL_SUBJECTS};
use crate::types::LessonPlan;

const DEFAULT_STATE: &str = "California";
const DEFAULT_GRADE: &str = "5th Grade";
const DEFAULT_SUBJECT: &str = "Mathematics";

/// Build a sample plan from the selected facets, falling back to defaults
/// for any facet left at its sentinel. Only the first selected state is used.
pub fn sample_lesson_plan(filters: &FilterContext) -> LessonPlan {
    let state = filters
        .states
        .first()
        .map(String::as_str)
        .unwrap_or(DEFAULT_STATE)
        .to_string();
    let grade = match filters.grade.as_deref() {
        Some(grade) if grade != ALL_GRADES => grade.to_string(),
        _ => DEFAULT_GRADE.to_string(),
    };
    let subject = match filters.subject.as_deref() {
        Some(subject) if subject != ALL_SUBJECTS => subject.to_string(),
        _ => DEFAULT_SUBJECT.to_string(),
    };
    let topic = subject.to_lowercase();

    LessonPlan {
        title: format!("{} Lesson Plan - {}", subject, grade),
        state,
        grade,
        subject,
        date: Utc::now().format("%Y-%m-%d").to_string(),
        objectives: vec![
            format!("Students will understand basic concepts in {}", topic),
            format!("Students will apply {} skills to solve problems", topic),
            format!("Students will demonstrate mastery of {} standards", topic),
        ],
        materials: vec![
            "Textbook or digital resources".into(),
            "Worksheets or activity sheets".into(),
            "Writing materials".into(),
            "Interactive whiteboard or projector".into(),
        ],
        activities: vec![
            "Introduction and warm-up activity (10 minutes)".into(),
            "Direct instruction with examples (20 minutes)".into(),
            "Guided practice with students (15 minutes)".into(),
            "Independent practice or group work (15 minutes)".into(),
            "Review and assessment (10 minutes)".into(),
        ],
        assessment: format!(
            "Students will complete a worksheet demonstrating their understanding of {} concepts",
            topic
        ),
        homework: format!(
            "Complete practice problems from textbook related to today's {} lesson",
            topic
        ),
    }
}
