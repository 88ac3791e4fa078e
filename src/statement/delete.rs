//! DELETE assembly.

use crate::ast::Expr;
use crate::compile::predicate;
use crate::dialect::SqlGenerator;
use crate::entity::EntityDescriptor;
use crate::error::{RelqError, RelqResult};

use super::trace::CallSite;
use super::Statement;

/// Assemble a DELETE. A predicate is mandatory; there is no unscoped form.
pub fn build_delete(
    entity: &EntityDescriptor,
    predicate_expr: Option<&Expr>,
    trace: Option<&CallSite>,
    generator: &dyn SqlGenerator,
) -> RelqResult<Statement> {
    let expr = predicate_expr.ok_or(RelqError::MissingPredicate { statement: "DELETE" })?;

    let compiled = predicate::compile(expr, entity, generator)?;

    let mut sql = String::new();
    if let Some(trace) = trace {
        sql.push_str(&trace.comment());
        sql.push(' ');
    }
    sql.push_str("DELETE FROM ");
    sql.push_str(&entity.qualified_table(generator));
    sql.push_str(" WHERE ");
    sql.push_str(&compiled.sql);

    Ok(Statement {
        sql,
        params: compiled.params,
    })
}
