//! Target command handler

use grade_lens::core::average::recalculate_course;
use grade_lens::core::solver::{add_target_assignment, required_assignment_percentage};
use grade_lens::{error, info};
use std::path::Path;

/// Run the target command: solve for the assignment score that reaches a
/// target course average, then show the course with that score applied.
pub fn run(
    input_file: &Path,
    course_name: &str,
    category: &str,
    target_average: f64,
    weight: f64,
    verbose: bool,
) {
    if let Err(e) = solve_target(
        input_file,
        course_name,
        category,
        target_average,
        weight,
        verbose,
    ) {
        error!("Target solve failed for {}: {e}", input_file.display());
        eprintln!("{e}");
    }
}

fn solve_target(
    input_file: &Path,
    course_name: &str,
    category: &str,
    target_average: f64,
    weight: f64,
    verbose: bool,
) -> Result<(), String> {
    let courses = super::load_courses(input_file)?;
    let course = super::find_course(&courses, course_name)
        .ok_or_else(|| format!("✗ No course named '{course_name}' in {}", input_file.display()))?;

    // Derived stats may be stale or absent in the file; solve from fresh ones.
    let course = recalculate_course(course);
    info!(
        "Solving {} toward {target_average:.2} via '{category}'",
        course.name
    );

    let required = required_assignment_percentage(&course, category, weight, target_average)
        .map_err(|e| format!("✗ {e}"))?;

    println!("✓ Needed on the next {category} assignment: {required:.2}%");
    if required > 100.0 {
        println!("  (above 100: the target is not reachable at these weights)");
    } else if required < 0.0 {
        println!("  (below 0: the target is already secured)");
    }

    let projected = add_target_assignment(&course, category, weight, required)
        .map_err(|e| format!("✗ {e}"))?;
    println!(
        "  Projected course average: {:.2}",
        projected.average.unwrap_or(0.0)
    );

    if verbose {
        for (name, cat) in &projected.categories {
            println!(
                "    {name} (weight {:.0}): {:.3}% ({:.2} / {:.2})",
                cat.category_weight, cat.percent, cat.students_points, cat.maximum_points
            );
        }
    }

    Ok(())
}
