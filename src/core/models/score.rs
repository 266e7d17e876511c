//! Assignment score model and the grade-value normalizer

use serde::{Deserialize, Serialize};

/// Placeholder the grade portal emits for a not-yet-graded assignment.
pub const NO_GRADE_MARKER: &str = "···";

/// Status badges the portal attaches to an assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Badge {
    /// Assignment was never turned in.
    Missing,
    /// Student is exempt; display-only, the score still aggregates normally.
    Exempt,
    /// Teacher dropped the grade; excluded from aggregation like `excluded`.
    Dropped,
}

/// Parse a raw grade value into a numeric grade.
///
/// The portal uses the empty string, the `"···"` placeholder, and assorted
/// non-numeric text to mean "no grade"; all of those (and non-finite numbers)
/// normalize to `None`. This is the single countability normalizer — every
/// component that asks "is this a real grade" goes through here.
#[must_use]
pub fn parse_grade(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == NO_GRADE_MARKER {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Serde helpers for grade-bearing payload fields.
///
/// The portal serializes the same field as a number, a numeric string, a
/// placeholder string, or `null` depending on the scraping path, so these
/// fields deserialize through [`parse_grade`].
pub(crate) mod grade_field {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawGrade {
        Number(f64),
        Text(String),
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<RawGrade>::deserialize(deserializer)?;
        Ok(match raw {
            None => None,
            Some(RawGrade::Number(n)) => Some(n).filter(|v| v.is_finite()),
            Some(RawGrade::Text(s)) => super::parse_grade(&s),
        })
    }

    pub fn serialize<S>(value: &Option<f64>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        value.serialize(serializer)
    }
}

/// Serde helper for the per-assignment weight, which the portal may omit or
/// send as a string. Anything unparseable falls back to the default weight 1.
pub(crate) mod weight_field {
    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawWeight {
        Number(f64),
        Text(String),
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<f64, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<RawWeight>::deserialize(deserializer)?;
        Ok(match raw {
            Some(RawWeight::Number(n)) if n.is_finite() => n,
            Some(RawWeight::Text(s)) => super::parse_grade(&s).unwrap_or(1.0),
            _ => 1.0,
        })
    }
}

pub(crate) const fn default_weight() -> f64 {
    1.0
}

/// One graded item within a course.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentScore {
    /// Assignment name (also the identity used by history diffing)
    pub name: String,

    /// Key of the category this score belongs to
    pub category: String,

    /// Points earned, `None` when not yet graded
    #[serde(default, with = "grade_field")]
    pub score: Option<f64>,

    /// Points possible
    #[serde(default, with = "grade_field")]
    pub total_points: Option<f64>,

    /// Optional percentage override; takes precedence over score/totalPoints
    /// for display
    #[serde(default, with = "grade_field")]
    pub percentage: Option<f64>,

    /// Multiplier applied to both earned and possible points within the
    /// category (defaults to 1)
    #[serde(default = "default_weight", deserialize_with = "weight_field::deserialize")]
    pub weight: f64,

    /// Student-toggled exclusion from aggregation (what-if views)
    #[serde(default)]
    pub excluded: bool,

    /// Due date as the portal displays it
    #[serde(default)]
    pub date_due: Option<String>,

    /// Status badges attached by the portal
    #[serde(default)]
    pub badges: Vec<Badge>,
}

impl AssignmentScore {
    /// Whether the teacher dropped this grade.
    #[must_use]
    pub fn is_dropped(&self) -> bool {
        self.badges.contains(&Badge::Dropped)
    }

    /// Whether this score participates in category aggregation.
    ///
    /// A score counts iff it has a numeric grade, is not excluded, and does
    /// not carry a `dropped` badge. `Exempt` and `Missing` are display-only.
    #[must_use]
    pub fn is_countable(&self) -> bool {
        self.score.is_some() && !self.excluded && !self.is_dropped()
    }

    /// The percentage shown for this item: an explicit `percentage` override
    /// wins; otherwise derived from earned/possible points.
    #[must_use]
    pub fn display_grade(&self) -> Option<f64> {
        if self.percentage.is_some() {
            return self.percentage;
        }
        match (self.score, self.total_points) {
            (Some(earned), Some(possible)) if possible > 0.0 => {
                Some(earned / possible * 100.0)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn score(earned: Option<f64>, possible: Option<f64>) -> AssignmentScore {
        AssignmentScore {
            name: "Quiz 1".to_string(),
            category: "Minor".to_string(),
            score: earned,
            total_points: possible,
            percentage: None,
            weight: 1.0,
            excluded: false,
            date_due: None,
            badges: Vec::new(),
        }
    }

    #[test]
    fn parse_grade_accepts_numbers() {
        assert_eq!(parse_grade("87.5"), Some(87.5));
        assert_eq!(parse_grade(" 100 "), Some(100.0));
        assert_eq!(parse_grade("-2"), Some(-2.0));
    }

    #[test]
    fn parse_grade_rejects_placeholders() {
        assert_eq!(parse_grade(""), None);
        assert_eq!(parse_grade("   "), None);
        assert_eq!(parse_grade(NO_GRADE_MARKER), None);
        assert_eq!(parse_grade("abc"), None);
        assert_eq!(parse_grade("NaN"), None);
        assert_eq!(parse_grade("inf"), None);
    }

    #[test]
    fn countable_requires_a_grade() {
        assert!(score(Some(90.0), Some(100.0)).is_countable());
        assert!(!score(None, Some(100.0)).is_countable());
    }

    #[test]
    fn excluded_and_dropped_are_not_countable() {
        let mut s = score(Some(90.0), Some(100.0));
        s.excluded = true;
        assert!(!s.is_countable());

        let mut s = score(Some(90.0), Some(100.0));
        s.badges.push(Badge::Dropped);
        assert!(!s.is_countable());
    }

    #[test]
    fn exempt_badge_still_counts() {
        let mut s = score(Some(90.0), Some(100.0));
        s.badges.push(Badge::Exempt);
        assert!(s.is_countable());
    }

    #[test]
    fn display_grade_prefers_percentage_override() {
        let mut s = score(Some(45.0), Some(50.0));
        assert_eq!(s.display_grade(), Some(90.0));
        s.percentage = Some(95.0);
        assert_eq!(s.display_grade(), Some(95.0));
    }

    #[test]
    fn deserializes_portal_string_fields() {
        let json = r#"{
            "name": "Test 2",
            "category": "Major",
            "score": "88",
            "totalPoints": "100",
            "weight": "2",
            "badges": ["exempt", "dropped"]
        }"#;

        let s: AssignmentScore = serde_json::from_str(json).expect("parse score");
        assert_eq!(s.score, Some(88.0));
        assert_eq!(s.total_points, Some(100.0));
        assert!((s.weight - 2.0).abs() < f64::EPSILON);
        assert!(s.is_dropped());
        assert!(s.badges.contains(&Badge::Exempt));
    }

    #[test]
    fn deserializes_no_grade_placeholder_as_none() {
        let json = r#"{"name": "HW 3", "category": "Minor", "score": "···", "totalPoints": 100}"#;
        let s: AssignmentScore = serde_json::from_str(json).expect("parse score");
        assert_eq!(s.score, None);
        assert!(!s.is_countable());
        assert!((s.weight - 1.0).abs() < f64::EPSILON);
    }
}
