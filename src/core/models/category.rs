//! Grading category model

use super::score::grade_field;
use serde::{Deserialize, Serialize};

/// Serde helper for category fields the portal sends as fixed-precision
/// strings (e.g. `"95.000"`). Missing or unparseable values become 0.
pub(crate) mod stat_field {
    use serde::{Deserializer, Serialize, Serializer};

    pub fn deserialize<'de, D>(deserializer: D) -> Result<f64, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(super::grade_field::deserialize(deserializer)?.unwrap_or(0.0))
    }

    pub fn serialize<S>(value: &f64, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        value.serialize(serializer)
    }
}

fn default_category_weight() -> f64 {
    1.0
}

/// A grading bucket (e.g. "Major", "Minor"). The category name is the key of
/// the course's category map; everything except `category_weight` is derived
/// and rebuilt by the average calculator on every mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    /// Relative weight of this category in the overall average
    #[serde(
        default = "default_category_weight",
        deserialize_with = "stat_field::deserialize"
    )]
    pub category_weight: f64,

    /// Derived: 100 * earned / possible over countable scores (0 when empty)
    #[serde(default, with = "stat_field")]
    pub percent: f64,

    /// Derived: sum of weighted earned points of countable scores
    #[serde(default, with = "stat_field")]
    pub students_points: f64,

    /// Derived: sum of weighted possible points of countable scores
    #[serde(default, with = "stat_field")]
    pub maximum_points: f64,

    /// Derived, informational: `category_weight * percent / 100`
    #[serde(default, with = "stat_field")]
    pub category_points: f64,
}

impl Category {
    /// Create an empty category with the given weight.
    #[must_use]
    pub const fn new(category_weight: f64) -> Self {
        Self {
            category_weight,
            percent: 0.0,
            students_points: 0.0,
            maximum_points: 0.0,
            category_points: 0.0,
        }
    }

    /// Whether any countable assignment contributed points to this category.
    ///
    /// Categories that fail this gate contribute neither numerator nor
    /// denominator to the overall average.
    #[must_use]
    pub fn has_assignments(&self) -> bool {
        self.maximum_points > 0.0
    }
}

impl Default for Category {
    fn default() -> Self {
        Self::new(default_category_weight())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_category_is_empty() {
        let cat = Category::new(30.0);
        assert!((cat.category_weight - 30.0).abs() < f64::EPSILON);
        assert!(!cat.has_assignments());
        assert!(cat.percent.abs() < f64::EPSILON);
    }

    #[test]
    fn deserializes_portal_fixed_precision_strings() {
        let json = r#"{
            "categoryWeight": "70.00",
            "percent": "95.000",
            "studentsPoints": "95.0000",
            "maximumPoints": "100.00",
            "categoryPoints": "66.500000"
        }"#;

        let cat: Category = serde_json::from_str(json).expect("parse category");
        assert!((cat.category_weight - 70.0).abs() < f64::EPSILON);
        assert!((cat.percent - 95.0).abs() < f64::EPSILON);
        assert!(cat.has_assignments());
    }

    #[test]
    fn missing_weight_defaults_to_one() {
        let cat: Category = serde_json::from_str(r#"{"percent": 80}"#).expect("parse category");
        assert!((cat.category_weight - 1.0).abs() < f64::EPSILON);
    }
}
