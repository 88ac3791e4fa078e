//! Projection planning: selector plus fixed-value analysis to a SELECT
//! clause and per-field materialization sources.

use serde::{Deserialize, Serialize};

use crate::ast::{FieldKind, Selector, Value};
use crate::compile::fixed::WhereAnalysis;
use crate::dialect::SqlGenerator;
use crate::entity::EntityDescriptor;

/// Where a target field's value comes from at read time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FieldSource {
    /// Read from this SELECT alias (or column, for scalar shapes).
    Column(String),
    /// Supplied verbatim from the predicate; never fetched.
    Fixed(Value),
}

/// One field of a projection plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionField {
    pub target: String,
    pub kind: FieldKind,
    pub source: FieldSource,
}

/// Construction style of the result shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlanShape {
    Scalar,
    Object,
    Positional,
}

/// A compiled projection: the SELECT clause and how to fill each target
/// field from a row. Serializable so it can key a statement cache.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionPlan {
    pub fields: Vec<ProjectionField>,
    pub select_clause: String,
    /// True when every field is fixed and the clause collapsed to `1`.
    pub all_fixed: bool,
    pub shape: PlanShape,
}

/// Plan a projection against a source entity and the WHERE analysis.
///
/// Fields whose TARGET name is proven fixed are elided from the SELECT list
/// and filled from the predicate value instead. When everything is fixed the
/// clause collapses to `1`; a shape with no fields at all selects `*`.
pub fn compile(
    selector: &Selector,
    source: &EntityDescriptor,
    analysis: &WhereAnalysis,
    generator: &dyn SqlGenerator,
) -> ProjectionPlan {
    let shape = match selector {
        Selector::SingleField(_) => PlanShape::Scalar,
        Selector::ObjectShape(_) => PlanShape::Object,
        Selector::PositionalShape(_) => PlanShape::Positional,
    };

    let mut fields = Vec::with_capacity(selector.fields().len());
    let mut items = Vec::new();
    for target in selector.fields() {
        match analysis.fixed_value(&target.name) {
            Some(value) => {
                fields.push(ProjectionField {
                    target: target.name.clone(),
                    kind: target.kind,
                    source: FieldSource::Fixed(value.clone()),
                });
            }
            None => {
                let column = source.resolve_column(target.source());
                let quoted = generator.quote_identifier(&column);
                match shape {
                    // Scalar reads back by column name; no alias needed.
                    PlanShape::Scalar => {
                        items.push(quoted);
                        fields.push(ProjectionField {
                            target: target.name.clone(),
                            kind: target.kind,
                            source: FieldSource::Column(column),
                        });
                    }
                    _ => {
                        items.push(format!(
                            "{} AS {}",
                            quoted,
                            generator.quote_identifier(&target.name)
                        ));
                        fields.push(ProjectionField {
                            target: target.name.clone(),
                            kind: target.kind,
                            source: FieldSource::Column(target.name.clone()),
                        });
                    }
                }
            }
        }
    }

    let all_fixed = !fields.is_empty()
        && fields
            .iter()
            .all(|f| matches!(f.source, FieldSource::Fixed(_)));
    let select_clause = if fields.is_empty() {
        "*".to_string()
    } else if all_fixed {
        "1".to_string()
    } else {
        items.join(", ")
    };

    ProjectionPlan {
        fields,
        select_clause,
        all_fixed,
        shape,
    }
}
