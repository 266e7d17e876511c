//! History reconciliation: snapshot diffing, timeline events, and
//! per-assignment impact analysis

use crate::core::average::recalculate;
use crate::core::history::HistoryEntry;
use crate::core::models::{AssignmentScore, CourseGrade};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

/// A before/after pair for one tracked value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Delta {
    /// Value in the earlier snapshot (0 for the initial baseline)
    pub prev: f64,
    /// Value in the later snapshot
    pub curr: f64,
    /// `curr - prev`
    pub change: f64,
}

impl Delta {
    const fn between(prev: f64, curr: f64) -> Self {
        Self {
            prev,
            curr,
            change: curr - prev,
        }
    }
}

/// Structured change-set between two consecutive snapshots of one course.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SnapshotDiff {
    /// Overall average movement, when it moved
    pub average: Option<Delta>,
    /// Percent movement per category whose percent changed
    pub categories: BTreeMap<String, Delta>,
    /// Assignments that are new or whose score/percentage changed, matched
    /// to the prior snapshot by name
    pub changed_assignments: Vec<AssignmentScore>,
}

impl SnapshotDiff {
    /// Whether nothing observable changed between the two snapshots.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.average.is_none() && self.categories.is_empty() && self.changed_assignments.is_empty()
    }
}

/// One entry in a course's grade timeline.
#[derive(Debug, Clone, PartialEq)]
pub struct TimelineEvent {
    /// When the change was observed
    pub date: DateTime<Utc>,
    /// True for the first recorded load (diffed against a zero baseline)
    pub initial: bool,
    /// What changed
    pub diff: SnapshotDiff,
}

/// Diff two consecutive history entries of the same course.
///
/// Averages and percents are compared after the missing-value fallback to 0,
/// matching how they are displayed. Assignments are identified by name: a
/// name with no match in `prev` is new, a matched name with a different
/// score or percentage is changed, and removals are not reported (the portal
/// never deletes rows, it re-grades them).
#[must_use]
pub fn diff_entries(prev: &HistoryEntry, curr: &HistoryEntry) -> SnapshotDiff {
    let mut diff = SnapshotDiff::default();

    let prev_avg = prev.average.unwrap_or(0.0);
    let curr_avg = curr.average.unwrap_or(0.0);
    if prev_avg != curr_avg {
        diff.average = Some(Delta::between(prev_avg, curr_avg));
    }

    for (name, category) in &curr.categories {
        let prev_percent = prev.categories.get(name).map_or(0.0, |c| c.percent);
        if prev_percent != category.percent {
            diff.categories
                .insert(name.clone(), Delta::between(prev_percent, category.percent));
        }
    }

    for score in &curr.scores {
        match prev.scores.iter().find(|s| s.name == score.name) {
            None => diff.changed_assignments.push(score.clone()),
            Some(prev_score)
                if prev_score.score != score.score
                    || prev_score.percentage != score.percentage =>
            {
                diff.changed_assignments.push(score.clone());
            }
            Some(_) => {}
        }
    }

    diff
}

/// Build the timeline narrative for one course's entry list (oldest first).
///
/// The first load is reported as an initial event diffed against a zero
/// baseline (every category "rose" from 0 and every score is new); later
/// entries contribute an event only when something actually changed.
#[must_use]
pub fn timeline(entries: &[HistoryEntry]) -> Vec<TimelineEvent> {
    let mut events = Vec::new();

    let Some(first) = entries.first() else {
        return events;
    };

    let mut initial = SnapshotDiff {
        average: Some(Delta::between(0.0, first.average.unwrap_or(0.0))),
        categories: BTreeMap::new(),
        changed_assignments: first.scores.clone(),
    };
    for (name, category) in &first.categories {
        initial
            .categories
            .insert(name.clone(), Delta::between(0.0, category.percent));
    }
    events.push(TimelineEvent {
        date: first.loaded_at,
        initial: true,
        diff: initial,
    });

    for window in entries.windows(2) {
        let diff = diff_entries(&window[0], &window[1]);
        if !diff.is_empty() {
            events.push(TimelineEvent {
                date: window[1].loaded_at,
                initial: false,
                diff,
            });
        }
    }

    events
}

/// One assignment's contribution to the course average.
#[derive(Debug, Clone, PartialEq)]
pub struct AssignmentImpact {
    /// The assignment in question
    pub score: AssignmentScore,
    /// How far the average falls when this assignment is removed
    /// (positive = the assignment props the grade up)
    pub impact: f64,
}

/// Per-assignment impact: re-run the calculator with each score removed and
/// report the average delta against the course's current average.
#[must_use]
pub fn assignment_impacts(course: &CourseGrade) -> Vec<AssignmentImpact> {
    let original_average = course.average.unwrap_or(0.0);

    course
        .scores
        .iter()
        .enumerate()
        .map(|(index, score)| {
            let remaining: Vec<AssignmentScore> = course
                .scores
                .iter()
                .enumerate()
                .filter(|(i, _)| *i != index)
                .map(|(_, s)| s.clone())
                .collect();

            let without = recalculate(&course.categories, &remaining);
            AssignmentImpact {
                score: score.clone(),
                impact: original_average - without.average,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::average::recalculate_course;
    use crate::core::models::Category;
    use chrono::TimeZone;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    fn score(name: &str, category: &str, earned: f64, possible: f64) -> AssignmentScore {
        AssignmentScore {
            name: name.to_string(),
            category: category.to_string(),
            score: Some(earned),
            total_points: Some(possible),
            percentage: None,
            weight: 1.0,
            excluded: false,
            date_due: None,
            badges: Vec::new(),
        }
    }

    fn sample_course() -> CourseGrade {
        let mut categories = BTreeMap::new();
        categories.insert("Major".to_string(), Category::new(70.0));
        categories.insert("Minor".to_string(), Category::new(30.0));

        let mut course = CourseGrade::new("0122 - 1".to_string(), "Algebra II".to_string());
        course.categories = categories;
        course.scores = vec![
            score("Test 1", "Major", 95.0, 100.0),
            score("Quiz 1", "Minor", 70.0, 100.0),
        ];
        recalculate_course(&course)
    }

    #[test]
    fn diff_reports_average_and_category_movement() {
        let course = sample_course();
        let prev = HistoryEntry::from_course(&course, at(100));

        let regraded = crate::core::whatif::edit_percentage(&course, 1, 90.0).expect("edit");
        let curr = HistoryEntry::from_course(&regraded, at(200));

        let diff = diff_entries(&prev, &curr);
        let avg = diff.average.expect("average delta");
        assert!((avg.prev - 87.5).abs() < 1e-9);
        assert!((avg.curr - 93.5).abs() < 1e-9);
        assert!((avg.change - 6.0).abs() < 1e-9);

        assert_eq!(diff.categories.len(), 1);
        let minor = &diff.categories["Minor"];
        assert!((minor.change - 20.0).abs() < 1e-9);

        assert_eq!(diff.changed_assignments.len(), 1);
        assert_eq!(diff.changed_assignments[0].name, "Quiz 1");
    }

    #[test]
    fn diff_reports_new_assignments() {
        let course = sample_course();
        let prev = HistoryEntry::from_course(&course, at(100));

        let with_new =
            crate::core::whatif::add_manual_assignment(&course, "Test 2", 88.0, "Major", 1.0)
                .expect("add");
        let curr = HistoryEntry::from_course(&with_new, at(200));

        let diff = diff_entries(&prev, &curr);
        assert_eq!(diff.changed_assignments.len(), 1);
        assert_eq!(diff.changed_assignments[0].name, "Test 2");
    }

    #[test]
    fn identical_entries_diff_empty() {
        let course = sample_course();
        let a = HistoryEntry::from_course(&course, at(100));
        let b = HistoryEntry::from_course(&course, at(200));
        assert!(diff_entries(&a, &b).is_empty());
    }

    #[test]
    fn timeline_starts_with_zero_baseline() {
        let course = sample_course();
        let entries = vec![HistoryEntry::from_course(&course, at(100))];

        let events = timeline(&entries);
        assert_eq!(events.len(), 1);
        assert!(events[0].initial);

        let avg = events[0].diff.average.expect("average");
        assert!(avg.prev.abs() < f64::EPSILON);
        assert!((avg.curr - 87.5).abs() < 1e-9);
        // Every score shows as new on the initial load.
        assert_eq!(events[0].diff.changed_assignments.len(), 2);
    }

    #[test]
    fn timeline_skips_no_op_entries() {
        let course = sample_course();
        let regraded = crate::core::whatif::edit_percentage(&course, 1, 90.0).expect("edit");

        let entries = vec![
            HistoryEntry::from_course(&course, at(100)),
            HistoryEntry::from_course(&course, at(150)),
            HistoryEntry::from_course(&regraded, at(200)),
        ];

        let events = timeline(&entries);
        assert_eq!(events.len(), 2);
        assert!(!events[1].initial);
        assert_eq!(events[1].date, at(200));
    }

    #[test]
    fn empty_history_yields_no_events() {
        assert!(timeline(&[]).is_empty());
    }

    #[test]
    fn impact_of_the_major_test() {
        let course = sample_course();
        let impacts = assignment_impacts(&course);
        assert_eq!(impacts.len(), 2);

        // Without the Major test, only Minor participates: average 70.
        assert!((impacts[0].impact - 17.5).abs() < 1e-9);
        // Without the Minor quiz, only Major participates: average 95.
        assert!((impacts[1].impact - (87.5 - 95.0)).abs() < 1e-9);
    }

    #[test]
    fn impacts_on_empty_course() {
        let course = CourseGrade::new("x".to_string(), "y".to_string());
        assert!(assignment_impacts(&course).is_empty());
    }
}
