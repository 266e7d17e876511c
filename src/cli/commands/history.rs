//! History command handler

use crate::args::HistorySubcommand;
use grade_lens::core::config::Config;
use grade_lens::core::history::HistoryStore;
use grade_lens::core::models::CourseGrade;
use grade_lens::core::repository::{HistoryRepository, JsonFileRepository};
use grade_lens::core::timeline::{timeline, TimelineEvent};
use grade_lens::{error, info};
use std::io::{self, Write};

/// Dispatch history subcommands
pub fn run(subcommand: HistorySubcommand, config: &Config, verbose: bool) {
    let repo = JsonFileRepository::new(config.history_file_path());

    let result = match subcommand {
        HistorySubcommand::Record { input_file, term } => {
            record(&repo, &input_file, &term)
        }
        HistorySubcommand::Show { term, course } => {
            show(&repo, &term, course.as_deref(), verbose)
        }
        HistorySubcommand::Clear => clear(&repo),
    };

    if let Err(e) = result {
        error!("History command failed: {e}");
        eprintln!("{e}");
    }
}

fn record(
    repo: &JsonFileRepository,
    input_file: &std::path::Path,
    term: &str,
) -> Result<(), String> {
    let courses = super::load_courses(input_file)?;

    let mut store = repo
        .load()?
        .unwrap_or_else(|| HistoryStore::new(term, vec![term.to_string()]));
    if !store.term_list.iter().any(|t| t == term) {
        store.term_list.push(term.to_string());
    }

    store.record_snapshot(term, &courses);
    repo.save(&store)?;

    info!("History saved to {}", repo.path().display());
    println!("✓ Recorded {} course(s) for term {term}", courses.len());
    Ok(())
}

fn show(
    repo: &JsonFileRepository,
    term: &str,
    course: Option<&str>,
    verbose: bool,
) -> Result<(), String> {
    let store = repo
        .load()?
        .ok_or_else(|| "✗ No history recorded yet".to_string())?;

    if !store.has_data(term) {
        return Err(format!("✗ No history recorded for term {term}"));
    }

    match course {
        Some(wanted) => {
            let key = resolve_key(&store, term, wanted)
                .ok_or_else(|| format!("✗ No course named '{wanted}' in term {term}"))?;
            let entries = store.course_history(term, &key);
            println!("=== Timeline for {key} (term {term}) ===");
            for event in timeline(entries) {
                print_event(&event, verbose);
            }
        }
        None => {
            let snapshot = store
                .latest_snapshot(term)
                .ok_or_else(|| format!("✗ No history recorded for term {term}"))?;
            println!(
                "=== Term {term} as of {} ===",
                snapshot.loaded_at.format("%Y-%m-%d %H:%M UTC")
            );
            for class in &snapshot.classes {
                let entries = store.course_history(term, &class.key());
                println!(
                    "  {}: {:.2} ({} recorded change{})",
                    class.name,
                    class.average.unwrap_or(0.0),
                    entries.len(),
                    if entries.len() == 1 { "" } else { "s" }
                );
            }
        }
    }
    Ok(())
}

fn clear(repo: &JsonFileRepository) -> Result<(), String> {
    if repo.load()?.is_none() {
        println!("✓ No history to clear");
        return Ok(());
    }

    // Ask for confirmation
    print!("Are you sure you want to delete all recorded history? (y/n): ");
    io::stdout().flush().ok();

    let mut response = String::new();
    io::stdin().read_line(&mut response).ok();

    if response.trim().eq_ignore_ascii_case("y") || response.trim().eq_ignore_ascii_case("yes") {
        repo.clear()?;
        println!("✓ History cleared");
    } else {
        println!("✗ Clear cancelled");
    }
    Ok(())
}

/// Accept either a full "course|name" key or a bare course name.
fn resolve_key(store: &HistoryStore, term: &str, wanted: &str) -> Option<String> {
    store
        .course_keys(term)
        .iter()
        .find(|key| {
            ***key == *wanted
                || CourseGrade::split_key(key).is_some_and(|(_, name)| name == wanted)
        })
        .map(ToString::to_string)
}

fn print_event(event: &TimelineEvent, verbose: bool) {
    let stamp = event.date.format("%Y-%m-%d %H:%M UTC");
    if event.initial {
        println!("  {stamp}  first recorded load");
    } else {
        println!("  {stamp}");
    }

    if let Some(delta) = &event.diff.average {
        println!(
            "    average {:.2} -> {:.2} ({:+.2})",
            delta.prev, delta.curr, delta.change
        );
    }
    for (name, delta) in &event.diff.categories {
        println!(
            "    {name} {:.3}% -> {:.3}% ({:+.3})",
            delta.prev, delta.curr, delta.change
        );
    }
    if verbose {
        for score in &event.diff.changed_assignments {
            println!("    graded: {} ({})", score.name, score.category);
        }
    } else if !event.diff.changed_assignments.is_empty() {
        println!(
            "    {} assignment(s) new or regraded",
            event.diff.changed_assignments.len()
        );
    }
}
