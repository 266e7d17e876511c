//! Command-line interface entry point for `GradeLens`

mod args;
mod commands;

use args::{Cli, Command};
use clap::Parser;
use grade_lens::core::config::Config;
use grade_lens::logger::{enable_debug, enable_verbose, set_level, Level};

fn main() {
    let args = Cli::parse();

    // Load configuration once at startup and apply CLI overrides to it
    let mut config = Config::load();
    config.apply_overrides(&args.to_config_overrides());

    // Effective runtime log level: CLI flag overrides config; otherwise use
    // config logging.level; fallback warn
    let effective_level = args
        .log_level
        .map(std::convert::Into::into)
        .or_else(|| parse_level(&config.logging.level))
        .unwrap_or(Level::Warn);

    let mut level = effective_level;
    if args.debug_flag || level == Level::Debug {
        level = Level::Debug;
        enable_debug();
    }

    // Verbose: enable if CLI flag OR config has verbose=true
    let verbose = args.verbose || config.logging.verbose;
    if verbose {
        enable_verbose();
    }
    set_level(level);

    // Handle subcommands
    match args.command {
        Command::Config { subcommand } => {
            commands::config::run(subcommand, &mut config);
        }
        Command::Recalc {
            input_file,
            course,
            impacts,
        } => {
            commands::recalc::run(&input_file, course.as_deref(), impacts, verbose);
        }
        Command::Solve {
            terms,
            final_exam,
            exam_weight,
            desired,
            exempt,
        } => {
            commands::solve::run(&terms, &final_exam, exam_weight, &desired, exempt);
        }
        Command::Target {
            input_file,
            course,
            category,
            average,
            weight,
        } => {
            commands::target::run(&input_file, &course, &category, average, weight, verbose);
        }
        Command::History { subcommand } => {
            commands::history::run(subcommand, &config, verbose);
        }
    }
}

fn parse_level(val: &str) -> Option<Level> {
    match val.to_ascii_lowercase().as_str() {
        "error" => Some(Level::Error),
        "warn" => Some(Level::Warn),
        "info" => Some(Level::Info),
        "debug" => Some(Level::Debug),
        _ => None,
    }
}
