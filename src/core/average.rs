//! Weighted average recalculation
//!
//! The one place category stats and course averages are derived from raw
//! scores. Everything that mutates grade data (what-if edits, impact
//! analysis, target solving) funnels back through [`recalculate`].

use crate::core::models::{AssignmentScore, Category, CourseGrade};
use std::collections::BTreeMap;

/// Output of a recalculation pass: rebuilt category stats plus the overall
/// weighted average.
#[derive(Debug, Clone, PartialEq)]
pub struct Recalculated {
    /// Categories with `percent`, `students_points`, `maximum_points`, and
    /// `category_points` rebuilt from the scores
    pub categories: BTreeMap<String, Category>,
    /// Overall weighted average over categories that have assignments
    pub average: f64,
}

/// Round to a fixed number of decimal places.
///
/// Derived stats keep the fixed precisions the portal displays (3 decimal
/// places for percents) so recalculated snapshots compare equal to scraped
/// ones.
#[must_use]
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

/// Recalculate category stats and the overall average from raw scores.
///
/// For each category, countable scores (graded, not excluded, not dropped)
/// contribute `score * weight` earned points and `total_points * weight`
/// possible points. A score with absent or non-positive `total_points`
/// contributes earned points only (extra credit). The overall average weights
/// each category's percent by its `category_weight`, skipping categories with
/// no possible points; an all-empty course averages to 0.
///
/// Pure function: inputs are never mutated, so callers can diff the result
/// against the original state.
#[must_use]
pub fn recalculate(
    categories: &BTreeMap<String, Category>,
    scores: &[AssignmentScore],
) -> Recalculated {
    let mut updated = categories.clone();

    for (name, category) in &mut updated {
        let mut students_points = 0.0;
        let mut maximum_points = 0.0;

        for score in scores
            .iter()
            .filter(|s| s.category == *name && s.is_countable())
        {
            students_points += score.score.unwrap_or(0.0) * score.weight;
            maximum_points += score.total_points.filter(|t| *t > 0.0).unwrap_or(0.0) * score.weight;
        }

        category.percent = if maximum_points > 0.0 {
            round_to(students_points / maximum_points * 100.0, 3)
        } else {
            0.0
        };
        category.students_points = round_to(students_points, 4);
        category.maximum_points = round_to(maximum_points, 2);
        category.category_points = round_to(category.category_weight * category.percent / 100.0, 6);
    }

    let mut weighted_sum = 0.0;
    let mut total_weight = 0.0;

    for category in updated.values() {
        if category.has_assignments() {
            weighted_sum += category.percent * category.category_weight;
            total_weight += category.category_weight;
        }
    }

    // Guard the degenerate all-zero-weight case; 0 is defined semantics here,
    // not an error.
    let average = if total_weight > 0.0 {
        weighted_sum / total_weight
    } else {
        0.0
    };

    Recalculated {
        categories: updated,
        average,
    }
}

/// Rebuild a full course snapshot with freshly derived stats.
#[must_use]
pub fn recalculate_course(course: &CourseGrade) -> CourseGrade {
    let Recalculated {
        categories,
        average,
    } = recalculate(&course.categories, &course.scores);

    CourseGrade {
        course: course.course.clone(),
        name: course.name.clone(),
        average: Some(average),
        categories,
        scores: course.scores.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::Badge;

    fn score(name: &str, category: &str, earned: f64, possible: f64) -> AssignmentScore {
        AssignmentScore {
            name: name.to_string(),
            category: category.to_string(),
            score: Some(earned),
            total_points: Some(possible),
            percentage: None,
            weight: 1.0,
            excluded: false,
            date_due: None,
            badges: Vec::new(),
        }
    }

    fn two_category_setup() -> (BTreeMap<String, Category>, Vec<AssignmentScore>) {
        let mut categories = BTreeMap::new();
        categories.insert("Major".to_string(), Category::new(70.0));
        categories.insert("Minor".to_string(), Category::new(30.0));

        let scores = vec![
            score("Test 1", "Major", 95.0, 100.0),
            score("Quiz 1", "Minor", 70.0, 100.0),
        ];

        (categories, scores)
    }

    #[test]
    fn weighted_average_over_two_categories() {
        let (categories, scores) = two_category_setup();
        let result = recalculate(&categories, &scores);

        assert!((result.categories["Major"].percent - 95.0).abs() < 1e-9);
        assert!((result.categories["Minor"].percent - 70.0).abs() < 1e-9);
        // (95 * 70 + 70 * 30) / 100
        assert!((result.average - 87.5).abs() < 1e-9);
    }

    #[test]
    fn recalculation_is_idempotent() {
        let (categories, scores) = two_category_setup();
        let first = recalculate(&categories, &scores);
        let second = recalculate(&first.categories, &scores);
        assert_eq!(first, second);
    }

    #[test]
    fn inputs_are_not_mutated() {
        let (categories, scores) = two_category_setup();
        let before = categories.clone();
        let _ = recalculate(&categories, &scores);
        assert_eq!(categories, before);
    }

    #[test]
    fn excluded_scores_do_not_drag_the_category() {
        let mut categories = BTreeMap::new();
        categories.insert("Major".to_string(), Category::new(100.0));

        let mut zero = score("Dropped quiz", "Major", 0.0, 100.0);
        zero.excluded = true;
        let scores = vec![score("Test", "Major", 90.0, 100.0), zero];

        let result = recalculate(&categories, &scores);
        assert!((result.categories["Major"].percent - 90.0).abs() < 1e-9);
    }

    #[test]
    fn dropped_badge_excludes_like_the_flag() {
        let mut categories = BTreeMap::new();
        categories.insert("Major".to_string(), Category::new(100.0));

        let mut zero = score("Dropped quiz", "Major", 0.0, 100.0);
        zero.badges.push(Badge::Dropped);
        let scores = vec![score("Test", "Major", 90.0, 100.0), zero];

        let result = recalculate(&categories, &scores);
        assert!((result.categories["Major"].percent - 90.0).abs() < 1e-9);
    }

    #[test]
    fn empty_category_does_not_participate() {
        let (mut categories, scores) = two_category_setup();
        categories.insert("Projects".to_string(), Category::new(50.0));

        let result = recalculate(&categories, &scores);
        let projects = &result.categories["Projects"];
        assert!(projects.percent.abs() < f64::EPSILON);
        assert!(projects.maximum_points.abs() < f64::EPSILON);
        // Average unchanged by the empty category.
        assert!((result.average - 87.5).abs() < 1e-9);
    }

    #[test]
    fn no_countable_scores_yields_zero_average() {
        let mut categories = BTreeMap::new();
        categories.insert("Major".to_string(), Category::new(70.0));

        let result = recalculate(&categories, &[]);
        assert!(result.average.abs() < f64::EPSILON);
        assert!(result.average.is_finite());
    }

    #[test]
    fn all_zero_weight_categories_average_to_zero() {
        let mut categories = BTreeMap::new();
        categories.insert("Major".to_string(), Category::new(0.0));
        let scores = vec![score("Test", "Major", 90.0, 100.0)];

        let result = recalculate(&categories, &scores);
        assert!(result.average.abs() < f64::EPSILON);
        assert!(result.average.is_finite());
    }

    #[test]
    fn per_score_weight_multiplies_both_sides() {
        let mut categories = BTreeMap::new();
        categories.insert("Major".to_string(), Category::new(100.0));

        let mut double = score("Final", "Major", 80.0, 100.0);
        double.weight = 2.0;
        let scores = vec![score("Test", "Major", 100.0, 100.0), double];

        let result = recalculate(&categories, &scores);
        // (100 + 160) / (100 + 200) = 86.667
        assert!((result.categories["Major"].percent - 86.667).abs() < 1e-9);
    }

    #[test]
    fn extra_credit_counts_earned_points_only() {
        let mut categories = BTreeMap::new();
        categories.insert("Major".to_string(), Category::new(100.0));

        let scores = vec![
            score("Test", "Major", 80.0, 100.0),
            score("Bonus", "Major", 5.0, 0.0),
        ];

        let result = recalculate(&categories, &scores);
        assert!((result.categories["Major"].percent - 85.0).abs() < 1e-9);
    }

    #[test]
    fn recalculate_course_fills_average() {
        let (categories, scores) = two_category_setup();
        let mut course = CourseGrade::new("0122".to_string(), "Algebra II".to_string());
        course.categories = categories;
        course.scores = scores;

        let updated = recalculate_course(&course);
        assert_eq!(updated.average, Some(87.5));
        assert_eq!(course.average, None, "input snapshot untouched");
    }
}
