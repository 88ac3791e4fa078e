//! Fixed-value analysis of a WHERE tree.
//!
//! A field is fixed when the predicate pins it to exactly one non-null value
//! in every satisfying row: an equality under a pure AND spine. Any field
//! mentioned anywhere inside an OR subtree is excluded, since the OR makes
//! its value conditional.

use std::collections::{HashMap, HashSet};

use crate::ast::{BinaryOp, Expr, Value};

/// Result of analyzing a predicate for fixed fields.
#[derive(Debug, Default, Clone)]
pub struct WhereAnalysis {
    fixed: HashMap<String, Value>,
    excluded: HashSet<String>,
}

impl WhereAnalysis {
    /// The fixed value for a field, if the analysis proved one.
    pub fn fixed_value(&self, field: &str) -> Option<&Value> {
        self.fixed.get(field)
    }

    pub fn is_empty(&self) -> bool {
        self.fixed.is_empty()
    }
}

/// Analyze an optional predicate. No predicate fixes nothing.
pub fn analyze(predicate: Option<&Expr>) -> WhereAnalysis {
    let mut analysis = WhereAnalysis::default();
    if let Some(expr) = predicate {
        walk(expr, &mut analysis);
    }
    analysis
}

fn walk(expr: &Expr, analysis: &mut WhereAnalysis) {
    match expr {
        Expr::Binary {
            op: BinaryOp::And,
            left,
            right,
        } => {
            walk(left, analysis);
            walk(right, analysis);
        }
        Expr::Binary {
            op: BinaryOp::Or,
            ..
        } => exclude_fields(expr, analysis),
        Expr::Binary {
            op: BinaryOp::Eq,
            left,
            right,
        } => {
            let pair = match (left.as_ref(), right.as_ref()) {
                (Expr::Field(field), Expr::Literal(value))
                | (Expr::Field(field), Expr::Captured { value, .. })
                | (Expr::Literal(value), Expr::Field(field))
                | (Expr::Captured { value, .. }, Expr::Field(field)) => Some((field, value)),
                _ => None,
            };
            if let Some((field, value)) = pair {
                if *value != Value::Null && !analysis.excluded.contains(field.as_str()) {
                    analysis.fixed.insert(field.clone(), value.clone());
                }
            }
        }
        Expr::Convert(inner) => walk(inner, analysis),
        // Negations, inequalities and method calls narrow rows but never pin
        // a field to a single value; they are inert here.
        _ => {}
    }
}

/// Remove every field mentioned in an OR subtree from the fixed set, and
/// keep it out for the rest of the walk.
fn exclude_fields(expr: &Expr, analysis: &mut WhereAnalysis) {
    match expr {
        Expr::Field(name) => {
            analysis.fixed.remove(name);
            analysis.excluded.insert(name.clone());
        }
        Expr::Binary { left, right, .. } => {
            exclude_fields(left, analysis);
            exclude_fields(right, analysis);
        }
        Expr::Method {
            target, argument, ..
        } => {
            exclude_fields(target, analysis);
            exclude_fields(argument, analysis);
        }
        Expr::Not(inner) | Expr::Convert(inner) => exclude_fields(inner, analysis),
        Expr::Captured { .. } | Expr::Literal(_) => {}
    }
}
