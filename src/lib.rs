//! Shared library for `GradeLens`
//! Grade recalculation, what-if projection, target solving, and grade
//! history for Home Access Center course data.

pub mod core;
pub mod logger;

pub use crate::core::models::{parse_grade, AssignmentScore, Badge, Category, CourseGrade};
