//! CLI argument definitions for `GradeLens`

use clap::{builder::BoolishValueParser, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use grade_lens::core::config::ConfigOverrides;
use grade_lens::logger::Level;

/// CLI log level argument
///
/// Represents log levels that can be passed via CLI arguments. Converts to
/// lowercase strings for config storage and to `logger::Level` for runtime use.
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum LogLevelArg {
    /// Error-level logging
    Error,
    /// Warning-level logging
    Warn,
    /// Info-level logging
    Info,
    /// Debug-level logging
    Debug,
}

impl From<LogLevelArg> for Level {
    fn from(arg: LogLevelArg) -> Self {
        match arg {
            LogLevelArg::Error => Self::Error,
            LogLevelArg::Warn => Self::Warn,
            LogLevelArg::Info => Self::Info,
            LogLevelArg::Debug => Self::Debug,
        }
    }
}

impl std::fmt::Display for LogLevelArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let as_str = match self {
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
        };
        write!(f, "{as_str}")
    }
}

#[derive(Debug, Subcommand)]
pub enum ConfigSubcommand {
    /// Display configuration values.
    ///
    /// If a KEY is provided, displays only that configuration value.
    /// If no KEY is provided, displays all configuration values.
    Get {
        /// Optional configuration key to display (e.g., `level`, `profile`)
        #[arg(value_name = "KEY")]
        key: Option<String>,
    },
    /// Set a configuration value.
    Set {
        /// Configuration key to set
        #[arg(value_name = "KEY")]
        key: String,
        /// Value to set
        #[arg(value_name = "VALUE")]
        value: String,
    },
    /// Unset a configuration value.
    Unset {
        /// Configuration key to unset
        #[arg(value_name = "KEY")]
        key: String,
    },
    /// Reset configuration to defaults (requires confirmation).
    Reset,
}

#[derive(Debug, Subcommand)]
pub enum HistorySubcommand {
    /// Record a term snapshot from a course-grades JSON file.
    ///
    /// Re-recording unchanged grades refreshes the load timestamp instead of
    /// growing the history.
    Record {
        /// Path to a course-grades JSON file (one course object or an array)
        #[arg(value_name = "FILE")]
        input_file: PathBuf,

        /// Term the grades belong to
        #[arg(short, long, value_name = "TERM")]
        term: String,
    },
    /// Show recorded history for a term.
    ///
    /// Without --course, lists each recorded course with its latest average.
    /// With --course, prints that course's change timeline.
    Show {
        /// Term to inspect
        #[arg(short, long, value_name = "TERM")]
        term: String,

        /// Course name (or "course|name" key) to show a timeline for
        #[arg(short, long, value_name = "COURSE")]
        course: Option<String>,
    },
    /// Delete all recorded history for the profile (requires confirmation).
    Clear,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage configuration.
    ///
    /// If no subcommand is provided, displays all configuration values.
    Config {
        #[command(subcommand)]
        subcommand: Option<ConfigSubcommand>,
    },
    /// Recalculate category stats and course averages from raw scores.
    ///
    /// Loads course grades from a JSON file and re-derives every category
    /// percent and the overall weighted average.
    Recalc {
        /// Path to a course-grades JSON file (one course object or an array)
        #[arg(value_name = "FILE")]
        input_file: PathBuf,

        /// Only recalculate the named course
        #[arg(short, long, value_name = "COURSE")]
        course: Option<String>,

        /// Also show each assignment's impact on the course average
        #[arg(long)]
        impacts: bool,
    },
    /// Solve the course-grade equation for the one field left blank.
    ///
    /// Pass "-" for the blank field; exactly one of the term averages,
    /// --final-exam, and --desired must be blank.
    Solve {
        /// Term averages in order; "-" marks the blank field
        #[arg(long, value_name = "AVERAGES", num_args = 1.., required = true)]
        terms: Vec<String>,

        /// Final exam score; "-" marks it blank
        #[arg(long, value_name = "SCORE", default_value = "-")]
        final_exam: String,

        /// Final exam weight as a percentage (0-99)
        #[arg(long, value_name = "PERCENT", default_value_t = 25.0)]
        exam_weight: f64,

        /// Desired course grade; "-" marks it blank
        #[arg(long, value_name = "GRADE", default_value = "-")]
        desired: String,

        /// Solve as if exempt from the final exam
        #[arg(long)]
        exempt: bool,
    },
    /// Find the assignment score needed to reach a target course average.
    ///
    /// Prints the required percentage and the course state with the upcoming
    /// assignment applied.
    Target {
        /// Path to a course-grades JSON file (one course object or an array)
        #[arg(value_name = "FILE")]
        input_file: PathBuf,

        /// Course name to solve within
        #[arg(short, long, value_name = "COURSE")]
        course: String,

        /// Grading category the upcoming assignment falls under
        #[arg(long, value_name = "CATEGORY")]
        category: String,

        /// Target course average to reach
        #[arg(long, value_name = "GRADE")]
        average: f64,

        /// Weight of the upcoming assignment (default 1)
        #[arg(long, value_name = "WEIGHT", default_value_t = 1.0)]
        weight: f64,
    },
    /// Record and inspect grade history.
    History {
        #[command(subcommand)]
        subcommand: HistorySubcommand,
    },
}

#[derive(Parser, Debug)]
#[command(
    name = "gradelens",
    about = "GradeLens command-line interface",
    version = env!("CARGO_PKG_VERSION")
)]
pub struct Cli {
    /// Set the runtime log level (error|warn|info|debug). Falls back to config if omitted.
    #[arg(long, value_enum)]
    pub log_level: Option<LogLevelArg>,

    /// Enable verbose output (runtime only)
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,

    /// Enable debug-level logging and runtime debug flag (shorthand)
    #[arg(long = "debug")]
    pub debug_flag: bool,

    // --- Config overrides ---
    /// Override config logging level (runtime only)
    #[arg(long = "config-level", value_enum)]
    pub config_level: Option<LogLevelArg>,

    /// Override config verbose flag (true/false)
    #[arg(long = "config-verbose", value_parser = BoolishValueParser::new())]
    pub config_verbose: Option<bool>,

    /// Override the history profile for this run
    #[arg(long, value_name = "NAME")]
    pub profile: Option<String>,

    /// Override the history directory for this run
    #[arg(long = "history-dir", value_name = "DIR")]
    pub history_dir: Option<PathBuf>,

    /// Subcommand to execute.
    /// A subcommand is required to run the CLI.
    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Convert CLI flags into config overrides
    ///
    /// Overrides apply for this run only; the persistent config file is not
    /// modified. `None` fields mean no override.
    pub fn to_config_overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            level: self.config_level.map(|lvl| lvl.to_string()),
            verbose: self.config_verbose,
            profile: self.profile.clone(),
            history_dir: self
                .history_dir
                .as_ref()
                .map(|p| p.to_string_lossy().to_string()),
        }
    }
}
