use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::types::Skeleton;

/// One cross-class relation: methods of `row` access attributes declared
/// by `column`, `weight` many times. Weights are always at least one; a
/// pair with no relation simply has no cell.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatrixCell {
    pub row: String,
    pub column: String,
    pub weight: u64,
}

/// Cross-class attribute-usage table, built from the skeleton alone and
/// independent of any metric. Rows follow skeleton order; cells are
/// sorted by (row, column).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Matrix {
    pub rows: Vec<String>,
    pub cells: Vec<MatrixCell>,
}

impl Matrix {
    /// Weight of the (row, column) relation, if any.
    pub fn weight(&self, row: &str, column: &str) -> Option<u64> {
        self.cells
            .iter()
            .find(|c| c.row == row && c.column == column)
            .map(|c| c.weight)
    }
}

/// Build the matrix. An attribute reference from class `A` resolves to
/// `A`'s own declaration when one exists; otherwise every class declaring
/// that attribute name receives the edge. Unresolvable references are
/// external and carry no relation.
pub fn build(skeleton: &Skeleton) -> Matrix {
    let rows: Vec<String> = skeleton.classes.iter().map(|c| c.name.clone()).collect();

    let mut owners: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
    for class in &skeleton.classes {
        for attr in &class.attributes {
            owners.entry(attr.as_str()).or_default().push(&class.name);
        }
    }

    let mut weights: BTreeMap<(String, String), u64> = BTreeMap::new();
    for class in &skeleton.classes {
        let declared: BTreeSet<&str> = class.attributes.iter().map(String::as_str).collect();
        for method in &class.methods {
            for access in &method.accesses {
                if declared.contains(access.as_str()) {
                    *weights
                        .entry((class.name.clone(), class.name.clone()))
                        .or_insert(0) += 1;
                } else if let Some(owning) = owners.get(access.as_str()) {
                    for owner in owning {
                        *weights
                            .entry((class.name.clone(), owner.to_string()))
                            .or_insert(0) += 1;
                    }
                }
            }
        }
    }

    let cells = weights
        .into_iter()
        .map(|((row, column), weight)| MatrixCell {
            row,
            column,
            weight,
        })
        .collect();

    Matrix { rows, cells }
}
