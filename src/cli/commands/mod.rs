//! CLI command handlers for `GradeLens`.
//!
//! This module provides handlers for various CLI subcommands.
//! Each command is implemented in its own submodule.

pub mod config;
pub mod history;
pub mod recalc;
pub mod solve;
pub mod target;

use grade_lens::core::models::CourseGrade;
use std::path::Path;

/// Load course grades from a JSON file holding either a single course object
/// or an array of them.
pub(crate) fn load_courses(path: &Path) -> Result<Vec<CourseGrade>, String> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("✗ Failed to read {}: {e}", path.display()))?;

    let value: serde_json::Value = serde_json::from_str(&content)
        .map_err(|e| format!("✗ Failed to parse {}: {e}", path.display()))?;

    let courses = if value.is_array() {
        serde_json::from_value::<Vec<CourseGrade>>(value)
    } else {
        serde_json::from_value::<CourseGrade>(value).map(|c| vec![c])
    }
    .map_err(|e| format!("✗ {} does not hold course grades: {e}", path.display()))?;

    if courses.is_empty() {
        return Err(format!("✗ {} holds no courses", path.display()));
    }
    Ok(courses)
}

/// Find a course by display name or full "course|name" key.
pub(crate) fn find_course<'a>(
    courses: &'a [CourseGrade],
    wanted: &str,
) -> Option<&'a CourseGrade> {
    courses
        .iter()
        .find(|c| c.name == wanted || c.key() == wanted)
}
