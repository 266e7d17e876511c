//! What-if grade mutations
//!
//! Each operation takes a working snapshot, applies one hypothetical edit,
//! and returns a fresh snapshot with stats re-derived by the average
//! calculator. Nothing here performs I/O or touches recorded history; the
//! caller owns persistence and display.

use crate::core::average::recalculate_course;
use crate::core::models::{AssignmentScore, Category, CourseGrade};
use chrono::Local;
use std::fmt;

/// Name given to a category added without one.
pub const UNTITLED_CATEGORY: &str = "Untitled Category";

/// Invalid what-if input. Surfaced as a descriptive message; never silently
/// coerced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WhatIfError {
    /// Category weight was NaN or infinite
    NonFiniteWeight,
    /// Assignment percentage was NaN or infinite
    NonFinitePercentage,
    /// Named category does not exist on the course
    UnknownCategory(String),
    /// Assignment index past the end of the score list
    IndexOutOfRange {
        /// Requested index
        index: usize,
        /// Current score count
        len: usize,
    },
}

impl fmt::Display for WhatIfError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonFiniteWeight => write!(f, "Weight must be a number"),
            Self::NonFinitePercentage => write!(f, "Percentage must be a number"),
            Self::UnknownCategory(name) => write!(f, "No category named '{name}' in this course"),
            Self::IndexOutOfRange { index, len } => {
                write!(f, "No assignment at index {index} (course has {len})")
            }
        }
    }
}

impl std::error::Error for WhatIfError {}

/// Insert a new empty category into the working snapshot.
///
/// A blank name becomes [`UNTITLED_CATEGORY`].
///
/// # Errors
/// Returns [`WhatIfError::NonFiniteWeight`] when `weight` is not a finite
/// number.
pub fn add_category(
    course: &CourseGrade,
    name: &str,
    weight: f64,
) -> Result<CourseGrade, WhatIfError> {
    if !weight.is_finite() {
        return Err(WhatIfError::NonFiniteWeight);
    }

    let key = if name.trim().is_empty() {
        UNTITLED_CATEGORY.to_string()
    } else {
        name.trim().to_string()
    };

    let mut updated = course.clone();
    updated.categories.insert(key, Category::new(weight));
    Ok(recalculate_course(&updated))
}

/// Insert a hypothetical assignment at the front of the score list.
///
/// The assignment is worth `100 * weight` points with earned points derived
/// from `percentage`; a blank name becomes "Untitled {category}". Due date is
/// stamped with today's date, matching portal formatting.
///
/// # Errors
/// Returns [`WhatIfError::NonFinitePercentage`] for a non-finite percentage
/// or [`WhatIfError::UnknownCategory`] when the category does not exist.
pub fn add_manual_assignment(
    course: &CourseGrade,
    name: &str,
    percentage: f64,
    category: &str,
    weight: f64,
) -> Result<CourseGrade, WhatIfError> {
    if !percentage.is_finite() {
        return Err(WhatIfError::NonFinitePercentage);
    }
    if !course.categories.contains_key(category) {
        return Err(WhatIfError::UnknownCategory(category.to_string()));
    }

    // The portal treats a missing or zero weight as 1.
    let weight = if weight.is_finite() && weight != 0.0 {
        weight
    } else {
        1.0
    };

    let assignment_name = if name.trim().is_empty() {
        format!("Untitled {category}")
    } else {
        name.trim().to_string()
    };

    let total_points = 100.0 * weight;
    let earned = percentage / 100.0 * total_points;

    let new_score = AssignmentScore {
        name: assignment_name,
        category: category.to_string(),
        score: Some(earned),
        total_points: Some(total_points),
        percentage: Some(percentage),
        // The requested weight is already baked into the point values;
        // storing it as well would double-count under the weighted
        // calculator.
        weight: 1.0,
        excluded: false,
        date_due: Some(Local::now().format("%m/%d/%Y").to_string()),
        badges: Vec::new(),
    };

    let mut updated = course.clone();
    updated.scores.insert(0, new_score);
    Ok(recalculate_course(&updated))
}

/// Remove the assignment at `index` and re-derive stats.
///
/// # Errors
/// Returns [`WhatIfError::IndexOutOfRange`] when `index` is past the end.
pub fn remove_assignment(course: &CourseGrade, index: usize) -> Result<CourseGrade, WhatIfError> {
    check_index(course, index)?;

    let mut updated = course.clone();
    updated.scores.remove(index);
    Ok(recalculate_course(&updated))
}

/// Flip the `excluded` flag on the assignment at `index`.
///
/// # Errors
/// Returns [`WhatIfError::IndexOutOfRange`] when `index` is past the end.
pub fn toggle_excluded(course: &CourseGrade, index: usize) -> Result<CourseGrade, WhatIfError> {
    check_index(course, index)?;

    let mut updated = course.clone();
    updated.scores[index].excluded = !updated.scores[index].excluded;
    Ok(recalculate_course(&updated))
}

/// Rewrite an assignment's grade as a percentage of its possible points.
///
/// Falls back to the existing `total_points` (or 100 when absent) when
/// deriving the new earned points.
///
/// # Errors
/// Returns [`WhatIfError::NonFinitePercentage`] for a non-finite percentage
/// or [`WhatIfError::IndexOutOfRange`] when `index` is past the end.
pub fn edit_percentage(
    course: &CourseGrade,
    index: usize,
    new_percentage: f64,
) -> Result<CourseGrade, WhatIfError> {
    if !new_percentage.is_finite() {
        return Err(WhatIfError::NonFinitePercentage);
    }
    check_index(course, index)?;

    let mut updated = course.clone();
    let score = &mut updated.scores[index];
    let total_points = score.total_points.filter(|t| *t > 0.0).unwrap_or(100.0);
    score.score = Some(new_percentage / 100.0 * total_points);
    score.total_points = Some(total_points);
    score.percentage = Some(new_percentage);
    Ok(recalculate_course(&updated))
}

fn check_index(course: &CourseGrade, index: usize) -> Result<(), WhatIfError> {
    if index < course.scores.len() {
        Ok(())
    } else {
        Err(WhatIfError::IndexOutOfRange {
            index,
            len: course.scores.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn sample_course() -> CourseGrade {
        let mut categories = BTreeMap::new();
        categories.insert("Major".to_string(), Category::new(70.0));
        categories.insert("Minor".to_string(), Category::new(30.0));

        let scores = vec![
            AssignmentScore {
                name: "Test 1".to_string(),
                category: "Major".to_string(),
                score: Some(95.0),
                total_points: Some(100.0),
                percentage: None,
                weight: 1.0,
                excluded: false,
                date_due: None,
                badges: Vec::new(),
            },
            AssignmentScore {
                name: "Quiz 1".to_string(),
                category: "Minor".to_string(),
                score: Some(70.0),
                total_points: Some(100.0),
                percentage: None,
                weight: 1.0,
                excluded: false,
                date_due: None,
                badges: Vec::new(),
            },
        ];

        let mut course = CourseGrade::new("0122 - 1".to_string(), "Algebra II".to_string());
        course.categories = categories;
        course.scores = scores;
        recalculate_course(&course)
    }

    #[test]
    fn removing_the_only_minor_score_drops_the_category() {
        let course = sample_course();
        assert_eq!(course.average, Some(87.5));

        let updated = remove_assignment(&course, 1).expect("remove");
        assert!(updated.categories["Minor"].maximum_points.abs() < f64::EPSILON);
        // Minor no longer participates, so the average is pure Major.
        assert_eq!(updated.average, Some(95.0));
        // Original untouched.
        assert_eq!(course.scores.len(), 2);
    }

    #[test]
    fn remove_out_of_range_is_an_error() {
        let course = sample_course();
        assert_eq!(
            remove_assignment(&course, 5),
            Err(WhatIfError::IndexOutOfRange { index: 5, len: 2 })
        );
    }

    #[test]
    fn toggle_excluded_round_trips() {
        let course = sample_course();
        let excluded = toggle_excluded(&course, 1).expect("toggle");
        assert!(excluded.scores[1].excluded);
        assert_eq!(excluded.average, Some(95.0));

        let restored = toggle_excluded(&excluded, 1).expect("toggle back");
        assert!(!restored.scores[1].excluded);
        assert_eq!(restored.average, Some(87.5));
    }

    #[test]
    fn edit_percentage_rescales_earned_points() {
        let course = sample_course();
        let updated = edit_percentage(&course, 1, 90.0).expect("edit");
        assert_eq!(updated.scores[1].score, Some(90.0));
        assert_eq!(updated.scores[1].percentage, Some(90.0));
        // (95 * 70 + 90 * 30) / 100
        assert_eq!(updated.average, Some(93.5));
    }

    #[test]
    fn edit_percentage_defaults_missing_total_to_100() {
        let mut course = sample_course();
        course.scores[1].total_points = None;
        let updated = edit_percentage(&course, 1, 50.0).expect("edit");
        assert_eq!(updated.scores[1].total_points, Some(100.0));
        assert_eq!(updated.scores[1].score, Some(50.0));
    }

    #[test]
    fn add_category_defaults_blank_name() {
        let course = sample_course();
        let updated = add_category(&course, "  ", 10.0).expect("add");
        assert!(updated.categories.contains_key(UNTITLED_CATEGORY));
        // New category has no assignments, so the average is unchanged.
        assert_eq!(updated.average, course.average);
    }

    #[test]
    fn add_category_rejects_non_finite_weight() {
        let course = sample_course();
        assert_eq!(
            add_category(&course, "Projects", f64::NAN),
            Err(WhatIfError::NonFiniteWeight)
        );
    }

    #[test]
    fn manual_assignment_lands_at_the_front() {
        let course = sample_course();
        let updated =
            add_manual_assignment(&course, "Retake", 100.0, "Major", 1.0).expect("add");

        assert_eq!(updated.scores.len(), 3);
        assert_eq!(updated.scores[0].name, "Retake");
        assert_eq!(updated.scores[0].score, Some(100.0));
        assert_eq!(updated.scores[0].total_points, Some(100.0));
        assert!(updated.scores[0].date_due.is_some());
        // Major becomes (95 + 100) / 200 = 97.5
        assert!((updated.categories["Major"].percent - 97.5).abs() < 1e-9);
    }

    #[test]
    fn manual_assignment_weight_scales_points() {
        let course = sample_course();
        let updated =
            add_manual_assignment(&course, "Final", 80.0, "Major", 2.0).expect("add");
        assert_eq!(updated.scores[0].total_points, Some(200.0));
        assert_eq!(updated.scores[0].score, Some(160.0));
        // Weight lives in the point values, not the weight multiplier.
        assert!((updated.scores[0].weight - 1.0).abs() < f64::EPSILON);
        // Major becomes (95 + 160) / (100 + 200) = 85%.
        assert!((updated.categories["Major"].percent - 85.0).abs() < 1e-9);
    }

    #[test]
    fn manual_assignment_requires_known_category() {
        let course = sample_course();
        assert_eq!(
            add_manual_assignment(&course, "X", 90.0, "Labs", 1.0),
            Err(WhatIfError::UnknownCategory("Labs".to_string()))
        );
    }

    #[test]
    fn manual_assignment_blank_name_defaults() {
        let course = sample_course();
        let updated = add_manual_assignment(&course, "", 90.0, "Minor", 1.0).expect("add");
        assert_eq!(updated.scores[0].name, "Untitled Minor");
    }
}
