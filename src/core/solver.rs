//! Inverse grade solving
//!
//! Three solving modes, all algebraic rearrangements of the forward average
//! formulas:
//!
//! - [`solve_with_exam`] — semester average as term averages blended with a
//!   weighted final exam; solves whichever single input was left blank.
//! - [`solve_exempting`] — plain mean of term averages (exam exempted).
//! - [`required_assignment_percentage`] — the score needed on an upcoming
//!   assignment in one category to reach a target overall average.
//!
//! Solver outputs are advisory and unbounded: "you need a 130%" is a valid,
//! displayable answer meaning the target is unreachable under current
//! weights.

use crate::core::models::CourseGrade;
use std::fmt;

/// Which input the solver filled in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolvedField {
    /// The desired semester average
    Desired,
    /// The final exam grade
    FinalExam,
    /// The term average at this index
    TermAverage(usize),
}

/// A solved value together with the field it belongs to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Solution {
    /// Field that was blank
    pub field: SolvedField,
    /// Solved value (may fall outside 0..=100)
    pub value: f64,
}

/// Invalid solver input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SolveError {
    /// Every participating field was filled in
    NoBlankField,
    /// More than one participating field was blank
    MultipleBlankFields(Vec<String>),
    /// Final exam weight outside `[0, 100)`
    WeightOutOfRange,
    /// No term averages supplied at all
    NoTerms,
    /// Solving the final exam grade when its weight is zero
    ExamHasNoWeight,
    /// Named category does not exist on the course
    UnknownCategory(String),
    /// Target category carries no weight, so no score can move the average
    ZeroCategoryWeight(String),
    /// A supplied numeric input was NaN or infinite
    NonFiniteInput(&'static str),
}

impl fmt::Display for SolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoBlankField => write!(f, "Please leave one field blank to calculate it"),
            Self::MultipleBlankFields(labels) => write!(
                f,
                "Exactly one field must be blank (currently {} are blank: {})",
                labels.len(),
                labels.join(", ")
            ),
            Self::WeightOutOfRange => {
                write!(f, "Final exam weight must be between 0 and 100")
            }
            Self::NoTerms => write!(f, "At least one term average is required"),
            Self::ExamHasNoWeight => write!(
                f,
                "Final exam weight is 0, so the exam grade cannot affect the average"
            ),
            Self::UnknownCategory(name) => {
                write!(f, "No category named '{name}' in this course")
            }
            Self::ZeroCategoryWeight(name) => write!(
                f,
                "Category '{name}' has no weight; no score there can change the average"
            ),
            Self::NonFiniteInput(label) => write!(f, "{label} must be a number"),
        }
    }
}

impl std::error::Error for SolveError {}

fn mean(values: impl Iterator<Item = f64>) -> (f64, usize) {
    let mut sum = 0.0;
    let mut count = 0usize;
    for v in values {
        sum += v;
        count += 1;
    }
    if count == 0 {
        (0.0, 0)
    } else {
        (sum / count as f64, count)
    }
}

/// Locate the blank fields among the participating inputs.
///
/// Every blank term average counts as its own blank field; the solve is only
/// well-defined with exactly one unknown.
fn single_blank(
    term_averages: &[Option<f64>],
    extras: &[(SolvedField, &'static str, bool)],
) -> Result<SolvedField, SolveError> {
    let mut blanks: Vec<(SolvedField, String)> = Vec::new();

    for (i, avg) in term_averages.iter().enumerate() {
        if avg.is_none() {
            blanks.push((SolvedField::TermAverage(i), format!("term average {}", i + 1)));
        }
    }
    for (field, label, is_blank) in extras {
        if *is_blank {
            blanks.push((*field, (*label).to_string()));
        }
    }

    match blanks.len() {
        0 => Err(SolveError::NoBlankField),
        1 => Ok(blanks.remove(0).0),
        _ => Err(SolveError::MultipleBlankFields(
            blanks.into_iter().map(|(_, label)| label).collect(),
        )),
    }
}

fn check_finite(value: Option<f64>, label: &'static str) -> Result<(), SolveError> {
    match value {
        Some(v) if !v.is_finite() => Err(SolveError::NonFiniteInput(label)),
        _ => Ok(()),
    }
}

/// Solve the exam-weighted semester average for its single blank input.
///
/// With exam weight `w` (percent) and `other = 100 - w`, the forward formula
/// is `desired = (mean(terms) * other + final_exam * w) / 100`; this solves
/// that relation for whichever of desired, final exam, or one term average
/// was left blank.
///
/// # Errors
/// [`SolveError::NoTerms`] without term averages, [`SolveError::WeightOutOfRange`]
/// for a weight outside `[0, 100)`, [`SolveError::NoBlankField`] /
/// [`SolveError::MultipleBlankFields`] when the blank count is not exactly
/// one, and [`SolveError::ExamHasNoWeight`] when asked to solve the exam
/// grade at weight zero.
pub fn solve_with_exam(
    term_averages: &[Option<f64>],
    final_exam: Option<f64>,
    exam_weight: f64,
    desired: Option<f64>,
) -> Result<Solution, SolveError> {
    if term_averages.is_empty() {
        return Err(SolveError::NoTerms);
    }
    if !exam_weight.is_finite() || exam_weight < 0.0 || exam_weight >= 100.0 {
        return Err(SolveError::WeightOutOfRange);
    }
    for avg in term_averages {
        check_finite(*avg, "term average")?;
    }
    check_finite(final_exam, "final exam grade")?;
    check_finite(desired, "desired average")?;

    let field = single_blank(
        term_averages,
        &[
            (SolvedField::FinalExam, "final exam grade", final_exam.is_none()),
            (SolvedField::Desired, "desired average", desired.is_none()),
        ],
    )?;

    let other_weight = 100.0 - exam_weight;
    let known: Vec<f64> = term_averages.iter().copied().flatten().collect();
    let (term_mean, _) = mean(known.iter().copied());
    let sum_known: f64 = known.iter().sum();

    let value = match field {
        SolvedField::Desired => {
            let exam = final_exam.unwrap_or(0.0);
            (term_mean * other_weight + exam * exam_weight) / 100.0
        }
        SolvedField::FinalExam => {
            if exam_weight == 0.0 {
                return Err(SolveError::ExamHasNoWeight);
            }
            let desired = desired.unwrap_or(0.0);
            (desired * 100.0 - term_mean * other_weight) / exam_weight
        }
        SolvedField::TermAverage(_) => {
            let desired = desired.unwrap_or(0.0);
            let exam = final_exam.unwrap_or(0.0);
            let k = term_averages.len() as f64;
            (desired * 100.0 - exam * exam_weight) * k / other_weight - sum_known
        }
    };

    Ok(Solution { field, value })
}

/// Solve the exam-exempt semester average (plain mean of term averages) for
/// its single blank input.
///
/// # Errors
/// [`SolveError::NoTerms`] without term averages; [`SolveError::NoBlankField`]
/// / [`SolveError::MultipleBlankFields`] when the blank count is not exactly
/// one.
pub fn solve_exempting(
    term_averages: &[Option<f64>],
    desired: Option<f64>,
) -> Result<Solution, SolveError> {
    if term_averages.is_empty() {
        return Err(SolveError::NoTerms);
    }
    for avg in term_averages {
        check_finite(*avg, "term average")?;
    }
    check_finite(desired, "desired average")?;

    let field = single_blank(
        term_averages,
        &[(SolvedField::Desired, "desired average", desired.is_none())],
    )?;

    let known: Vec<f64> = term_averages.iter().copied().flatten().collect();
    let value = match field {
        SolvedField::Desired => mean(known.iter().copied()).0,
        SolvedField::TermAverage(_) => {
            let desired = desired.unwrap_or(0.0);
            let k = term_averages.len() as f64;
            desired * k - known.iter().sum::<f64>()
        }
        SolvedField::FinalExam => unreachable!("no exam field in exempting mode"),
    };

    Ok(Solution { field, value })
}

/// Percentage needed on an upcoming assignment to reach a target average.
///
/// The hypothetical assignment is worth `100 * assignment_weight` points in
/// `target_category`. Solving proceeds in two steps: first the category
/// percent required for the target overall average, then the assignment
/// score that lifts the category to that percent.
///
/// # Errors
/// [`SolveError::UnknownCategory`] when the category is missing,
/// [`SolveError::ZeroCategoryWeight`] when it carries no weight (no score
/// can move the average), and [`SolveError::NonFiniteInput`] for bad numeric
/// input.
pub fn required_assignment_percentage(
    course: &CourseGrade,
    target_category: &str,
    assignment_weight: f64,
    target_average: f64,
) -> Result<f64, SolveError> {
    if !target_average.is_finite() {
        return Err(SolveError::NonFiniteInput("target average"));
    }

    let category = course
        .categories
        .get(target_category)
        .ok_or_else(|| SolveError::UnknownCategory(target_category.to_string()))?;

    if category.category_weight == 0.0 {
        return Err(SolveError::ZeroCategoryWeight(target_category.to_string()));
    }

    let assignment_weight = if assignment_weight.is_finite() && assignment_weight != 0.0 {
        assignment_weight
    } else {
        1.0
    };

    let total_weight: f64 = course
        .categories
        .values()
        .map(|c| c.category_weight)
        .sum();
    let other_contribution: f64 = course
        .categories
        .iter()
        .filter(|(name, _)| name.as_str() != target_category)
        .map(|(_, c)| c.percent * c.category_weight)
        .sum();

    // Category percent needed for the target overall average.
    let required_percent =
        (target_average * total_weight - other_contribution) / category.category_weight;

    // Assignment score that lifts the category to that percent.
    let new_assignment_points = 100.0 * assignment_weight;
    let required_score = required_percent / 100.0
        * (category.maximum_points + new_assignment_points)
        - category.students_points;

    Ok(required_score / new_assignment_points * 100.0)
}

/// Apply a mode-C solution as an "Upcoming {category}" what-if assignment.
///
/// # Errors
/// Propagates [`crate::core::whatif::WhatIfError`] from the underlying
/// mutation.
pub fn add_target_assignment(
    course: &CourseGrade,
    target_category: &str,
    assignment_weight: f64,
    required_percentage: f64,
) -> Result<CourseGrade, crate::core::whatif::WhatIfError> {
    let name = format!("Upcoming {target_category}");
    crate::core::whatif::add_manual_assignment(
        course,
        &name,
        required_percentage,
        target_category,
        assignment_weight,
    )
}
