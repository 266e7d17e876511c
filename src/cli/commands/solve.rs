//! Solve command handler

use grade_lens::core::solver::{self, SolvedField, Solution};
use grade_lens::error;

/// Run the solve command.
///
/// Inputs arrive as raw strings so "-" (or an empty string) can mark the one
/// field to solve for.
pub fn run(terms: &[String], final_exam: &str, exam_weight: f64, desired: &str, exempt: bool) {
    let parsed_terms: Result<Vec<Option<f64>>, String> = terms
        .iter()
        .enumerate()
        .map(|(i, raw)| parse_field(raw, &format!("term average {}", i + 1)))
        .collect();

    let result = parsed_terms
        .and_then(|terms| {
            let desired = parse_field(desired, "desired average")?;
            if exempt {
                solver::solve_exempting(&terms, desired).map_err(|e| e.to_string())
            } else {
                let final_exam = parse_field(final_exam, "final exam grade")?;
                solver::solve_with_exam(&terms, final_exam, exam_weight, desired)
                    .map_err(|e| e.to_string())
            }
        });

    match result {
        Ok(solution) => print_solution(&solution),
        Err(e) => {
            error!("Solve failed: {e}");
            eprintln!("✗ {e}");
        }
    }
}

fn parse_field(raw: &str, label: &str) -> Result<Option<f64>, String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "-" {
        return Ok(None);
    }
    trimmed
        .parse::<f64>()
        .map(Some)
        .map_err(|_| format!("Invalid value for {label}: '{raw}'"))
}

fn print_solution(solution: &Solution) {
    let label = match solution.field {
        SolvedField::Desired => "Course average".to_string(),
        SolvedField::FinalExam => "Final exam grade needed".to_string(),
        SolvedField::TermAverage(i) => format!("Term {} average needed", i + 1),
    };
    println!("✓ {label}: {:.2}", solution.value);

    // Out-of-range answers are real answers; flag them rather than clamping.
    if solution.value > 100.0 {
        println!("  (above 100: the target is not reachable at these weights)");
    } else if solution.value < 0.0 {
        println!("  (below 0: the target is already secured)");
    }
}
