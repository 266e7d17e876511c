//! Data models for `GradeLens`

pub mod category;
pub mod course;
pub mod score;

pub use category::Category;
pub use course::CourseGrade;
pub use score::{parse_grade, AssignmentScore, Badge};
