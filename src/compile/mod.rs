//! The query compiler: predicate translation, OR-to-IN rewriting,
//! fixed-value analysis, projection planning and value conversion.

pub mod convert;
pub mod fixed;
pub mod or_rewrite;
pub mod predicate;
pub mod projection;

pub use fixed::WhereAnalysis;
pub use predicate::{CompiledPredicate, ParamContext, ParameterBinding};
pub use projection::{FieldSource, PlanShape, ProjectionField, ProjectionPlan};

#[cfg(test)]
mod tests;
