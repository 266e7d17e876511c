//! Append-only grade history store
//!
//! One store per logged-in profile. Snapshots are keyed by term and by
//! course key (`"course|name"`), ordered by load time, and deduplicated:
//! re-recording an unchanged course refreshes the last entry's timestamp
//! instead of growing the list. Lookups for absent terms or courses return
//! empty/`None` sentinels, never errors — the caller decides whether a miss
//! matters.

use crate::core::models::{AssignmentScore, Category, CourseGrade};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One recorded grade state of one course.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    /// When this state was (last) loaded from the portal
    pub loaded_at: DateTime<Utc>,
    /// Overall average at load time
    pub average: Option<f64>,
    /// Category stats at load time
    pub categories: BTreeMap<String, Category>,
    /// Assignment scores at load time
    pub scores: Vec<AssignmentScore>,
}

impl HistoryEntry {
    /// Capture a course's current grade state.
    #[must_use]
    pub fn from_course(course: &CourseGrade, loaded_at: DateTime<Utc>) -> Self {
        Self {
            loaded_at,
            average: course.average,
            categories: course.categories.clone(),
            scores: course.scores.clone(),
        }
    }

    /// Deep equality on the `(average, categories, scores)` triple — the
    /// deduplication test. Load time is deliberately not part of identity.
    #[must_use]
    pub fn same_state(&self, course: &CourseGrade) -> bool {
        self.average == course.average
            && self.categories == course.categories
            && self.scores == course.scores
    }

    /// Rebuild a full course snapshot from this entry and its store key.
    #[must_use]
    pub fn to_course(&self, course: String, name: String) -> CourseGrade {
        CourseGrade {
            course,
            name,
            average: self.average,
            categories: self.categories.clone(),
            scores: self.scores.clone(),
        }
    }
}

/// A reconstructed full-term snapshot: every course's latest recorded state.
#[derive(Debug, Clone, PartialEq)]
pub struct TermSnapshot {
    /// Most recent load time across the term's courses
    pub loaded_at: DateTime<Utc>,
    /// Latest recorded state of each course, in course-key order
    pub classes: Vec<CourseGrade>,
}

/// Per-profile grade history across terms.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryStore {
    /// Term the portal reported as current at first load
    pub initial_term: String,
    /// All terms the portal offers, in display order
    pub term_list: Vec<String>,
    history: BTreeMap<String, BTreeMap<String, Vec<HistoryEntry>>>,
}

impl HistoryStore {
    /// Create an empty store for a profile.
    #[must_use]
    pub fn new(initial_term: impl Into<String>, term_list: Vec<String>) -> Self {
        Self {
            initial_term: initial_term.into(),
            term_list,
            history: BTreeMap::new(),
        }
    }

    /// Record a completed term fetch.
    ///
    /// For each course: appends a new entry when its grade state differs from
    /// the last recorded one, otherwise just refreshes the last entry's load
    /// time. Calling this twice with identical data therefore never grows the
    /// store.
    pub fn record_snapshot(&mut self, term: &str, courses: &[CourseGrade]) {
        self.record_snapshot_at(term, courses, Utc::now());
    }

    /// [`Self::record_snapshot`] with an explicit load time, for callers that
    /// need deterministic timestamps.
    pub fn record_snapshot_at(
        &mut self,
        term: &str,
        courses: &[CourseGrade],
        loaded_at: DateTime<Utc>,
    ) {
        let term_map = self.history.entry(term.to_string()).or_default();

        for course in courses {
            let entries = term_map.entry(course.key()).or_default();
            match entries.last_mut() {
                Some(last) if last.same_state(course) => last.loaded_at = loaded_at,
                _ => entries.push(HistoryEntry::from_course(course, loaded_at)),
            }
        }
    }

    /// The most recent recorded state of every course in a term,
    /// reconstructed as a full course list. `None` when the term has no data.
    #[must_use]
    pub fn latest_snapshot(&self, term: &str) -> Option<TermSnapshot> {
        let term_map = self.history.get(term)?;

        let mut loaded_at: Option<DateTime<Utc>> = None;
        let mut classes = Vec::new();

        for (key, entries) in term_map {
            let Some(entry) = entries.last() else {
                continue;
            };
            let Some((course, name)) = CourseGrade::split_key(key) else {
                continue;
            };
            classes.push(entry.to_course(course.to_string(), name.to_string()));
            loaded_at = Some(loaded_at.map_or(entry.loaded_at, |t| t.max(entry.loaded_at)));
        }

        loaded_at.map(|loaded_at| TermSnapshot { loaded_at, classes })
    }

    /// Whether any course under this term has at least one entry.
    #[must_use]
    pub fn has_data(&self, term: &str) -> bool {
        self.history
            .get(term)
            .is_some_and(|m| m.values().any(|entries| !entries.is_empty()))
    }

    /// Full entry list for one course in one term, oldest first. Empty slice
    /// on any miss.
    #[must_use]
    pub fn course_history(&self, term: &str, course_key: &str) -> &[HistoryEntry] {
        self.history
            .get(term)
            .and_then(|m| m.get(course_key))
            .map_or(&[], Vec::as_slice)
    }

    /// Course keys recorded under a term, in key order.
    #[must_use]
    pub fn course_keys(&self, term: &str) -> Vec<&str> {
        self.history
            .get(term)
            .map(|m| m.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// Drop all recorded history (explicit user action only).
    pub fn clear(&mut self) {
        self.history.clear();
    }
}
