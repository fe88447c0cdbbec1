//! Risk categories and per-category probability maps

use std::collections::BTreeMap;
use std::fmt;

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

/// String-keyed probability map, used where sources may carry arbitrary keys
pub type ProbabilityMap = BTreeMap<String, f64>;

/// Adverse-weather categories, declared in canonical order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskCategory {
    VeryHot,
    VeryCold,
    VeryWindy,
    VeryWet,
    VeryUncomfortable,
}

impl RiskCategory {
    /// All categories in canonical order
    pub const ALL: [RiskCategory; 5] = [
        RiskCategory::VeryHot,
        RiskCategory::VeryCold,
        RiskCategory::VeryWindy,
        RiskCategory::VeryWet,
        RiskCategory::VeryUncomfortable,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            RiskCategory::VeryHot => "very_hot",
            RiskCategory::VeryCold => "very_cold",
            RiskCategory::VeryWindy => "very_windy",
            RiskCategory::VeryWet => "very_wet",
            RiskCategory::VeryUncomfortable => "very_uncomfortable",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for RiskCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One probability per risk category.
///
/// Every category is always present and every value is clamped to [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CategoryProbabilities {
    values: [f64; 5],
}

impl CategoryProbabilities {
    /// Build a map by evaluating `f` for each category in canonical order
    pub fn from_fn(mut f: impl FnMut(RiskCategory) -> f64) -> Self {
        let mut values = [0.0; 5];
        for category in RiskCategory::ALL {
            values[category.index()] = clamp_probability(f(category));
        }
        Self { values }
    }

    #[must_use]
    pub fn get(&self, category: RiskCategory) -> f64 {
        self.values[category.index()]
    }

    pub fn set(&mut self, category: RiskCategory, probability: f64) {
        self.values[category.index()] = clamp_probability(probability);
    }

    /// Iterate over `(category, probability)` pairs in canonical order
    pub fn iter(&self) -> impl Iterator<Item = (RiskCategory, f64)> + '_ {
        RiskCategory::ALL
            .into_iter()
            .map(|category| (category, self.get(category)))
    }

    /// Convert into a string-keyed map
    #[must_use]
    pub fn to_map(&self) -> ProbabilityMap {
        self.iter()
            .map(|(category, probability)| (category.as_str().to_string(), probability))
            .collect()
    }
}

impl Serialize for CategoryProbabilities {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(RiskCategory::ALL.len()))?;
        for (category, probability) in self.iter() {
            map.serialize_entry(category.as_str(), &probability)?;
        }
        map.end()
    }
}

fn clamp_probability(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_order() {
        let names: Vec<&str> = RiskCategory::ALL.iter().map(|c| c.as_str()).collect();
        assert_eq!(
            names,
            vec!["very_hot", "very_cold", "very_windy", "very_wet", "very_uncomfortable"]
        );
        assert!(RiskCategory::VeryHot < RiskCategory::VeryUncomfortable);
    }

    #[test]
    fn test_values_are_clamped() {
        let mut probabilities = CategoryProbabilities::from_fn(|category| match category {
            RiskCategory::VeryHot => 1.7,
            RiskCategory::VeryCold => -0.2,
            _ => 0.4,
        });
        assert_eq!(probabilities.get(RiskCategory::VeryHot), 1.0);
        assert_eq!(probabilities.get(RiskCategory::VeryCold), 0.0);

        probabilities.set(RiskCategory::VeryWet, f64::NAN);
        assert_eq!(probabilities.get(RiskCategory::VeryWet), 0.0);
    }

    #[test]
    fn test_serializes_all_categories() {
        let probabilities = CategoryProbabilities::from_fn(|_| 0.05);
        let value = serde_json::to_value(probabilities).unwrap();
        let object = value.as_object().unwrap();
        assert_eq!(object.len(), 5);
        assert_eq!(object["very_uncomfortable"], 0.05);
        assert_eq!(probabilities.to_map().len(), 5);
    }
}
