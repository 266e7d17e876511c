//! Course grade snapshot model

use super::score::grade_field;
use super::{AssignmentScore, Category};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One complete grade state for a course at one point in time.
///
/// Snapshots arrive from the grades API per completed term fetch; what-if
/// features operate on a cloned working copy and never touch snapshots
/// already recorded in history. Structural equality (derived `PartialEq`
/// over ordered maps) is what history deduplication relies on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseGrade {
    /// Course id as reported by the portal (e.g. "0122 - 1")
    pub course: String,

    /// Course display name
    pub name: String,

    /// Overall weighted average, `None` when the portal has no grade yet
    #[serde(default, with = "grade_field")]
    pub average: Option<f64>,

    /// Grading categories keyed by category name
    #[serde(default)]
    pub categories: BTreeMap<String, Category>,

    /// Assignment scores in portal order (newest first)
    #[serde(default)]
    pub scores: Vec<AssignmentScore>,
}

impl CourseGrade {
    /// Create an empty snapshot for a course.
    #[must_use]
    pub const fn new(course: String, name: String) -> Self {
        Self {
            course,
            name,
            average: None,
            categories: BTreeMap::new(),
            scores: Vec::new(),
        }
    }

    /// History-store key for this course within a term.
    ///
    /// # Returns
    /// A string in the format "course|name" (e.g. "0122 - 1|Algebra II")
    #[must_use]
    pub fn key(&self) -> String {
        format!("{}|{}", self.course, self.name)
    }

    /// Split a history-store course key back into its (course, name) parts.
    /// Returns `None` when the separator is missing.
    #[must_use]
    pub fn split_key(key: &str) -> Option<(&str, &str)> {
        key.split_once('|')
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_round_trips() {
        let course = CourseGrade::new("0122 - 1".to_string(), "Algebra II".to_string());
        let key = course.key();
        assert_eq!(key, "0122 - 1|Algebra II");
        assert_eq!(CourseGrade::split_key(&key), Some(("0122 - 1", "Algebra II")));
    }

    #[test]
    fn split_key_rejects_missing_separator() {
        assert_eq!(CourseGrade::split_key("no-separator"), None);
    }

    #[test]
    fn deserializes_portal_payload() {
        let json = r#"{
            "course": "0122 - 1",
            "name": "Algebra II",
            "average": "87.50",
            "categories": {
                "Major": {"categoryWeight": "70.00", "percent": "95.000"},
                "Minor": {"categoryWeight": "30.00", "percent": "70.000"}
            },
            "scores": [
                {"name": "Test 1", "category": "Major", "score": 95, "totalPoints": 100}
            ]
        }"#;

        let course: CourseGrade = serde_json::from_str(json).expect("parse course");
        assert_eq!(course.average, Some(87.5));
        assert_eq!(course.categories.len(), 2);
        assert_eq!(course.scores.len(), 1);
    }

    #[test]
    fn empty_average_deserializes_as_none() {
        let json = r#"{"course": "X", "name": "Y", "average": ""}"#;
        let course: CourseGrade = serde_json::from_str(json).expect("parse course");
        assert_eq!(course.average, None);
    }

    #[test]
    fn structural_equality_is_value_based() {
        let json = r#"{"course": "X", "name": "Y", "average": 90}"#;
        let a: CourseGrade = serde_json::from_str(json).expect("parse");
        let mut b = a.clone();
        assert_eq!(a, b);
        b.average = Some(90.5);
        assert_ne!(a, b);
    }
}
