//! Facet selections rendered as prompt context lines.

use serde::{Deserialize, Serialize};

/// Sentinel grade selection meaning "no grade facet".
pub const ALL_GRADES: &str = "All Grades";
/// Sentinel subject selection meaning "no subject facet".
pub const ALL_SUBJECTS: &str = "All Subjects";

/// State options offered by the UI.
pub const US_STATES: &[&str] = &[
    "Alabama", "Alaska", "Arizona", "Arkansas", "California", "Colorado",
    "Connecticut", "Delaware", "Florida", "Georgia", "Hawaii", "Idaho",
    "Illinois", "Indiana", "Iowa", "Kansas", "Kentucky", "Louisiana",
    "Maine", "Maryland", "Massachusetts", "Michigan", "Minnesota",
    "Mississippi", "Missouri", "Montana", "Nebraska", "Nevada",
    "New Hampshire", "New Jersey", "New Mexico", "New York",
    "North Carolina", "North Dakota", "Ohio", "Oklahoma", "Oregon",
    "Pennsylvania", "Rhode Island", "South Carolina", "South Dakota",
    "Tennessee", "Texas", "Utah", "Vermont", "Virginia", "Washington",
    "West Virginia", "Wisconsin", "Wyoming",
];

/// Grade-level options offered by the UI.
pub const GRADE_LEVELS: &[&str] = &[
    "Kindergarten", "1st Grade", "2nd Grade", "3rd Grade", "4th Grade",
    "5th Grade", "6th Grade", "7th Grade", "8th Grade", "9th Grade",
    "10th Grade", "11th Grade", "12th Grade",
];

/// Subject options offered by the UI.
pub const SUBJECTS: &[&str] = &["Asian American Studies"];

/// User-selected facets for one request. Built fresh per request; facets are
/// informational context for the prompt, never structured retrieval filters.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FilterContext {
    #[serde(default)]
    pub states: Vec<String>,
    #[serde(default)]
    pub grade: Option<String>,
    #[serde(default)]
    pub subject: Option<String>,
}

impl FilterContext {
    /// Render the selected facets as "Key: value" lines, in fixed order
    /// states, grade, subject. Default selections are omitted.
    pub fn context_lines(&self) -> Vec<String> {
        let mut lines = Vec::new();
        if !self.states.is_empty() {
            lines.push(format!("States: {}", self.states.join(", ")));
        }
        if let Some(grade) = &self.grade {
            if grade != ALL_GRADES {
                lines.push(format!("Grade Level: {}", grade));
            }
        }
        if let Some(subject) = &self.subject {
            if subject != ALL_SUBJECTS {
                lines.push(format!("Subject: {}", subject));
            }
        }
        lines
    }

    /// True when every facet is at its default.
    pub fn is_empty(&self) -> bool {
        self.context_lines().is_empty()
    }
}
