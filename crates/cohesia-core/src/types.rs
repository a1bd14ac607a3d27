use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::AnalysisError;

/// A method and the attribute names it references.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Method {
    pub name: String,
    #[serde(default)]
    pub accesses: BTreeSet<String>,
}

/// A class: declared attributes plus the methods that access them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Class {
    pub name: String,
    #[serde(default)]
    pub attributes: Vec<String>,
    #[serde(default)]
    pub methods: Vec<Method>,
}

impl Class {
    /// Per-method sets of accesses that resolve to this class's own
    /// declared attributes. References to anything else are external
    /// and never take part in scoring.
    pub fn own_incidence(&self) -> Vec<BTreeSet<&str>> {
        let declared: BTreeSet<&str> = self.attributes.iter().map(String::as_str).collect();
        self.methods
            .iter()
            .map(|m| {
                m.accesses
                    .iter()
                    .map(String::as_str)
                    .filter(|a| declared.contains(a))
                    .collect()
            })
            .collect()
    }
}

/// Structural description of a codebase, as produced by an extractor.
/// Class order is significant: every downstream artifact preserves it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Skeleton {
    pub classes: Vec<Class>,
}

impl Skeleton {
    /// Check the structural invariants the rest of the pipeline relies on.
    pub fn verify(&self) -> Result<(), AnalysisError> {
        let mut seen = BTreeSet::new();
        for class in &self.classes {
            if class.name.is_empty() {
                return Err(AnalysisError::StructuralInvariant {
                    detail: "class with an empty name".to_string(),
                });
            }
            if !seen.insert(class.name.as_str()) {
                return Err(AnalysisError::StructuralInvariant {
                    detail: format!("duplicate class name '{}'", class.name),
                });
            }
        }
        Ok(())
    }
}

/// Raw score of one class for one metric. Cohesion is undefined for a
/// class without methods or without attributes; such classes carry
/// `NotApplicable` and are excluded from population statistics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Applicable(f64),
    NotApplicable,
}

impl RawValue {
    pub fn applicable(&self) -> Option<f64> {
        match self {
            RawValue::Applicable(v) => Some(*v),
            RawValue::NotApplicable => None,
        }
    }

    pub fn is_applicable(&self) -> bool {
        matches!(self, RawValue::Applicable(_))
    }
}

impl fmt::Display for RawValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawValue::Applicable(v) => write!(f, "{v:.2}"),
            RawValue::NotApplicable => write!(f, "n/a"),
        }
    }
}

/// Score of one class for one metric. Immutable once computed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricScore {
    pub class: String,
    pub value: RawValue,
}

/// All scores of one metric, one entry per class in skeleton order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricScoreSet {
    pub metric: String,
    pub scores: Vec<MetricScore>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn method(name: &str, accesses: &[&str]) -> Method {
        Method {
            name: name.to_string(),
            accesses: accesses.iter().map(|a| a.to_string()).collect(),
        }
    }

    #[test]
    fn test_verify_accepts_unique_names() {
        let skeleton = Skeleton {
            classes: vec![
                Class {
                    name: "A".to_string(),
                    attributes: vec![],
                    methods: vec![],
                },
                Class {
                    name: "B".to_string(),
                    attributes: vec![],
                    methods: vec![],
                },
            ],
        };
        assert!(skeleton.verify().is_ok());
    }

    #[test]
    fn test_verify_rejects_duplicate_names() {
        let skeleton = Skeleton {
            classes: vec![
                Class {
                    name: "A".to_string(),
                    attributes: vec![],
                    methods: vec![],
                },
                Class {
                    name: "A".to_string(),
                    attributes: vec![],
                    methods: vec![],
                },
            ],
        };
        let err = skeleton.verify().unwrap_err();
        assert!(
            err.to_string().contains("duplicate class name 'A'"),
            "unexpected error: {err}"
        );
    }

    #[test]
    fn test_verify_rejects_empty_name() {
        let skeleton = Skeleton {
            classes: vec![Class {
                name: String::new(),
                attributes: vec![],
                methods: vec![],
            }],
        };
        assert!(skeleton.verify().is_err());
    }

    #[test]
    fn test_own_incidence_drops_external_references() {
        let class = Class {
            name: "A".to_string(),
            attributes: vec!["x".to_string()],
            methods: vec![method("m", &["x", "foreign"])],
        };
        let incidence = class.own_incidence();
        assert_eq!(incidence.len(), 1);
        assert!(incidence[0].contains("x"));
        assert!(
            !incidence[0].contains("foreign"),
            "dangling reference must not count"
        );
    }

    #[test]
    fn test_raw_value_serializes_as_number_or_null() {
        let applicable = serde_json::to_value(RawValue::Applicable(2.5)).unwrap();
        assert_eq!(applicable, serde_json::json!(2.5));

        let not_applicable = serde_json::to_value(RawValue::NotApplicable).unwrap();
        assert!(not_applicable.is_null());
    }

    #[test]
    fn test_raw_value_round_trips() {
        let v: RawValue = serde_json::from_str("1.5").unwrap();
        assert_eq!(v, RawValue::Applicable(1.5));

        let na: RawValue = serde_json::from_str("null").unwrap();
        assert_eq!(na, RawValue::NotApplicable);
    }

    #[test]
    fn test_raw_value_display() {
        assert_eq!(RawValue::Applicable(0.5).to_string(), "0.50");
        assert_eq!(RawValue::NotApplicable.to_string(), "n/a");
    }
}
