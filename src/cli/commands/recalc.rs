//! Recalc command handler

use grade_lens::core::average::recalculate_course;
use grade_lens::core::models::CourseGrade;
use grade_lens::core::timeline::assignment_impacts;
use grade_lens::{error, info};
use std::path::Path;

/// Run the recalc command against a course-grades JSON file.
///
/// # Arguments
/// * `input_file` - Path to the JSON file (one course or an array)
/// * `course_filter` - Optional course name to restrict output to
/// * `impacts` - Whether to show per-assignment impact on the average
/// * `verbose` - Whether to show the category breakdown
pub fn run(input_file: &Path, course_filter: Option<&str>, impacts: bool, verbose: bool) {
    let courses = match super::load_courses(input_file) {
        Ok(courses) => courses,
        Err(e) => {
            error!("Recalc failed for {}: {e}", input_file.display());
            eprintln!("{e}");
            return;
        }
    };

    info!(
        "Loaded {} course(s) from {}",
        courses.len(),
        input_file.display()
    );

    let selected: Vec<&CourseGrade> = match course_filter {
        Some(wanted) => match super::find_course(&courses, wanted) {
            Some(course) => vec![course],
            None => {
                eprintln!("✗ No course named '{wanted}' in {}", input_file.display());
                return;
            }
        },
        None => courses.iter().collect(),
    };

    for course in selected {
        print_course(course, impacts, verbose);
    }
}

fn print_course(course: &CourseGrade, impacts: bool, verbose: bool) {
    let updated = recalculate_course(course);
    let average = updated.average.unwrap_or(0.0);
    println!("✓ {}: {average:.2}", updated.name);

    if verbose {
        for (name, category) in &updated.categories {
            println!(
                "    {name} (weight {:.0}): {:.3}% ({:.2} / {:.2})",
                category.category_weight,
                category.percent,
                category.students_points,
                category.maximum_points
            );
        }
    }

    if impacts {
        for entry in assignment_impacts(&updated) {
            println!(
                "    {:+.2}  {} ({})",
                entry.impact, entry.score.name, entry.score.category
            );
        }
    }
}
