//! Core module for grade math, what-if edits, solving, and history

pub mod average;
pub mod config;
pub mod history;
pub mod models;
pub mod repository;
pub mod solver;
pub mod timeline;
pub mod whatif;

/// Returns the current version of the `GradeLens` crate
#[must_use]
pub const fn get_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
