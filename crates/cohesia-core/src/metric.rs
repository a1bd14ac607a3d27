use std::fs;
use std::path::Path;

use serde::Serialize;

use crate::error::AnalysisError;
use crate::types::{Class, MetricScore, MetricScoreSet, RawValue, Skeleton};

/// A pure scoring strategy over one class. New metrics are added by
/// registering another function, not by inheritance.
pub type MetricFn = fn(&Class) -> RawValue;

/// Registry of named metrics.
pub fn registry() -> &'static [(&'static str, MetricFn)] {
    &[("LCOM", lcom), ("LCOM2", lcom2), ("LCOM3", lcom3)]
}

/// Look up a metric by name.
pub fn lookup(name: &str) -> Option<MetricFn> {
    registry()
        .iter()
        .find(|(known, _)| *known == name)
        .map(|(_, f)| *f)
}

/// Names of all registered metrics.
pub fn known_metrics() -> Vec<&'static str> {
    registry().iter().map(|(name, _)| *name).collect()
}

/// Score every class of the skeleton with the named metric and persist
/// one artifact per class under `out_dir/<metric>/`. Scores come back in
/// skeleton order. A single write failure aborts the whole job: the
/// aggregator assumes a complete, consistent set.
pub fn compute(
    skeleton: &Skeleton,
    metric: &str,
    out_dir: &Path,
) -> Result<MetricScoreSet, AnalysisError> {
    let score_fn = lookup(metric).ok_or_else(|| AnalysisError::UnknownMetric {
        metric: metric.to_string(),
    })?;
    skeleton.verify()?;

    let dir = out_dir.join(metric);
    fs::create_dir_all(&dir).map_err(|source| AnalysisError::Persistence {
        path: dir.clone(),
        source,
    })?;

    let mut scores = Vec::with_capacity(skeleton.classes.len());
    for class in &skeleton.classes {
        let score = MetricScore {
            class: class.name.clone(),
            value: score_fn(class),
        };
        persist_score(&dir, metric, &score)?;
        scores.push(score);
    }
    log::debug!("{metric}: scored {} classes", scores.len());

    Ok(MetricScoreSet {
        metric: metric.to_string(),
        scores,
    })
}

#[derive(Serialize)]
struct ClassArtifact<'a> {
    class: &'a str,
    metric: &'a str,
    value: RawValue,
}

fn persist_score(dir: &Path, metric: &str, score: &MetricScore) -> Result<(), AnalysisError> {
    let artifact = ClassArtifact {
        class: &score.class,
        metric,
        value: score.value,
    };
    let path = dir.join(format!("{}.json", sanitize(&score.class)));
    let json = serde_json::to_string_pretty(&artifact)
        .map_err(|e| AnalysisError::Persistence {
            path: path.clone(),
            source: std::io::Error::other(e),
        })?;
    fs::write(&path, json + "\n").map_err(|source| AnalysisError::Persistence { path, source })
}

/// Class names become file names; path separators are not welcome there.
fn sanitize(name: &str) -> String {
    name.replace(['/', '\\'], "_")
}

/// LCOM: method pairs sharing no attribute minus pairs sharing at least
/// one, floored at zero. Lower is more cohesive.
fn lcom(class: &Class) -> RawValue {
    if class.methods.is_empty() || class.attributes.is_empty() {
        return RawValue::NotApplicable;
    }
    let incidence = class.own_incidence();
    let mut disjoint = 0i64;
    let mut sharing = 0i64;
    for i in 0..incidence.len() {
        for j in (i + 1)..incidence.len() {
            if incidence[i].intersection(&incidence[j]).next().is_some() {
                sharing += 1;
            } else {
                disjoint += 1;
            }
        }
    }
    RawValue::Applicable((disjoint - sharing).max(0) as f64)
}

/// LCOM2: 1 - sum(mu(a)) / (m * a), where mu(a) is the number of methods
/// accessing attribute a. Ranges over [0, 1].
fn lcom2(class: &Class) -> RawValue {
    let m = class.methods.len();
    let a = class.attributes.len();
    if m == 0 || a == 0 {
        return RawValue::NotApplicable;
    }
    let sum = access_sum(class) as f64;
    RawValue::Applicable(1.0 - sum / (m as f64 * a as f64))
}

/// LCOM3: (m - sum(mu(a)) / a) / (m - 1). Ranges over [0, 2]; undefined
/// for classes with fewer than two methods.
fn lcom3(class: &Class) -> RawValue {
    let m = class.methods.len();
    let a = class.attributes.len();
    if m < 2 || a == 0 {
        return RawValue::NotApplicable;
    }
    let sum = access_sum(class) as f64;
    RawValue::Applicable((m as f64 - sum / a as f64) / (m as f64 - 1.0))
}

/// Total method-attribute incidence over the class's own attributes.
fn access_sum(class: &Class) -> usize {
    let incidence = class.own_incidence();
    class
        .attributes
        .iter()
        .map(|attr| {
            incidence
                .iter()
                .filter(|set| set.contains(attr.as_str()))
                .count()
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Method;

    fn class(name: &str, attributes: &[&str], methods: &[(&str, &[&str])]) -> Class {
        Class {
            name: name.to_string(),
            attributes: attributes.iter().map(|a| a.to_string()).collect(),
            methods: methods
                .iter()
                .map(|(m, accesses)| Method {
                    name: m.to_string(),
                    accesses: accesses.iter().map(|a| a.to_string()).collect(),
                })
                .collect(),
        }
    }

    /// Two methods sharing both attributes against two methods sharing
    /// none: the cohesive class must score strictly better (lower).
    #[test]
    fn test_lcom_orders_cohesive_before_incohesive() {
        let cohesive = class(
            "X",
            &["a", "b"],
            &[("m1", &["a", "b"]), ("m2", &["a", "b"])],
        );
        let incohesive = class("Y", &["a", "b"], &[("m1", &["a"]), ("m2", &["b"])]);

        let x = lcom(&cohesive).applicable().unwrap();
        let y = lcom(&incohesive).applicable().unwrap();
        assert!(x < y, "expected {x} < {y}");
        assert_eq!(x, 0.0);
        assert_eq!(y, 1.0);
    }

    #[test]
    fn test_lcom_floors_at_zero() {
        // Three methods all sharing one attribute: Q dominates P.
        let c = class(
            "C",
            &["a"],
            &[("m1", &["a"]), ("m2", &["a"]), ("m3", &["a"])],
        );
        assert_eq!(lcom(&c), RawValue::Applicable(0.0));
    }

    #[test]
    fn test_zero_methods_not_applicable() {
        let c = class("Constants", &["pi"], &[]);
        assert_eq!(lcom(&c), RawValue::NotApplicable);
        assert_eq!(lcom2(&c), RawValue::NotApplicable);
        assert_eq!(lcom3(&c), RawValue::NotApplicable);
    }

    #[test]
    fn test_zero_attributes_not_applicable() {
        let c = class("Stateless", &[], &[("run", &[])]);
        assert_eq!(lcom(&c), RawValue::NotApplicable);
        assert_eq!(lcom2(&c), RawValue::NotApplicable);
    }

    #[test]
    fn test_lcom2_values() {
        // Every method touches every attribute: fully cohesive.
        let full = class("F", &["a", "b"], &[("m1", &["a", "b"]), ("m2", &["a", "b"])]);
        assert_eq!(lcom2(&full), RawValue::Applicable(0.0));

        // Disjoint halves: sum = 2, m * a = 4.
        let half = class("H", &["a", "b"], &[("m1", &["a"]), ("m2", &["b"])]);
        assert_eq!(lcom2(&half), RawValue::Applicable(0.5));
    }

    #[test]
    fn test_lcom3_values() {
        let full = class("F", &["a", "b"], &[("m1", &["a", "b"]), ("m2", &["a", "b"])]);
        assert_eq!(lcom3(&full), RawValue::Applicable(0.0));

        let half = class("H", &["a", "b"], &[("m1", &["a"]), ("m2", &["b"])]);
        assert_eq!(lcom3(&half), RawValue::Applicable(1.0));
    }

    #[test]
    fn test_lcom3_single_method_not_applicable() {
        let c = class("Single", &["a"], &[("m", &["a"])]);
        assert_eq!(lcom3(&c), RawValue::NotApplicable);
    }

    #[test]
    fn test_external_references_do_not_score() {
        // Both methods "share" only a foreign attribute; for scoring they
        // share nothing.
        let c = class(
            "C",
            &["own"],
            &[("m1", &["other.x"]), ("m2", &["other.x"])],
        );
        assert_eq!(lcom(&c), RawValue::Applicable(1.0));
    }

    #[test]
    fn test_compute_preserves_skeleton_order_and_persists() {
        let tmp = tempfile::tempdir().unwrap();
        let skeleton = Skeleton {
            classes: vec![
                class("B", &["x"], &[("m", &["x"])]),
                class("A", &["y"], &[("m", &["y"])]),
            ],
        };

        let set = compute(&skeleton, "LCOM", tmp.path()).unwrap();
        assert_eq!(set.metric, "LCOM");
        let order: Vec<_> = set.scores.iter().map(|s| s.class.as_str()).collect();
        assert_eq!(order, vec!["B", "A"], "scores must follow skeleton order");

        assert!(tmp.path().join("LCOM/B.json").exists());
        assert!(tmp.path().join("LCOM/A.json").exists());

        let artifact: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(tmp.path().join("LCOM/B.json")).unwrap())
                .unwrap();
        assert_eq!(artifact["class"], "B");
        assert_eq!(artifact["metric"], "LCOM");
        assert_eq!(artifact["value"], 0.0);
    }

    #[test]
    fn test_compute_is_deterministic() {
        let tmp = tempfile::tempdir().unwrap();
        let skeleton = Skeleton {
            classes: vec![class(
                "C",
                &["a", "b", "c"],
                &[("m1", &["a", "b"]), ("m2", &["b", "c"]), ("m3", &["a"])],
            )],
        };

        let first = compute(&skeleton, "LCOM2", &tmp.path().join("one")).unwrap();
        let second = compute(&skeleton, "LCOM2", &tmp.path().join("two")).unwrap();
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[test]
    fn test_unknown_metric_fails() {
        let tmp = tempfile::tempdir().unwrap();
        let err = compute(&Skeleton::default(), "BOGUS", tmp.path()).unwrap_err();
        assert!(matches!(err, AnalysisError::UnknownMetric { .. }));
    }

    #[test]
    fn test_duplicate_class_names_fail() {
        let tmp = tempfile::tempdir().unwrap();
        let skeleton = Skeleton {
            classes: vec![
                class("A", &["x"], &[("m", &["x"])]),
                class("A", &["y"], &[]),
            ],
        };
        let err = compute(&skeleton, "LCOM", tmp.path()).unwrap_err();
        assert!(matches!(err, AnalysisError::StructuralInvariant { .. }));
    }

    #[test]
    fn test_write_failure_is_persistence_error() {
        let tmp = tempfile::tempdir().unwrap();
        // A file where the metric namespace directory should go.
        std::fs::write(tmp.path().join("LCOM"), "in the way").unwrap();

        let skeleton = Skeleton {
            classes: vec![class("A", &["x"], &[("m", &["x"])])],
        };
        let err = compute(&skeleton, "LCOM", tmp.path()).unwrap_err();
        assert!(matches!(err, AnalysisError::Persistence { .. }));
    }

    #[test]
    fn test_sanitize_strips_path_separators() {
        assert_eq!(sanitize("a/b\\c"), "a_b_c");
        assert_eq!(sanitize("org.example.Foo"), "org.example.Foo");
    }

    #[test]
    fn test_known_metrics() {
        assert_eq!(known_metrics(), vec!["LCOM", "LCOM2", "LCOM3"]);
    }
}
