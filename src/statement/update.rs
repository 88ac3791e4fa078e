//! UPDATE assembly.

use crate::ast::{Expr, Value};
use crate::compile::{predicate, ParamContext};
use crate::dialect::SqlGenerator;
use crate::entity::EntityDescriptor;
use crate::error::{RelqError, RelqResult};

use super::trace::CallSite;
use super::Statement;

/// Assemble an UPDATE. A predicate is mandatory; SET values bind first so
/// WHERE parameters continue the same numbering.
pub fn build_update(
    entity: &EntityDescriptor,
    values: &[Value],
    predicate_expr: Option<&Expr>,
    trace: Option<&CallSite>,
    generator: &dyn SqlGenerator,
) -> RelqResult<Statement> {
    let expr = predicate_expr.ok_or(RelqError::MissingPredicate { statement: "UPDATE" })?;

    let mut ctx = ParamContext::new();
    let mut assignments = Vec::new();
    for (column, value) in entity.columns.iter().zip(values) {
        if column.primary_key {
            continue;
        }
        let placeholder = ctx.bind(value.clone(), generator);
        assignments.push(format!(
            "{} = {}",
            generator.quote_identifier(&column.column),
            placeholder
        ));
    }
    let where_sql = predicate::compile_with(expr, entity, generator, &mut ctx)?;

    let mut sql = String::new();
    if let Some(trace) = trace {
        sql.push_str(&trace.comment());
        sql.push(' ');
    }
    sql.push_str("UPDATE ");
    sql.push_str(&entity.qualified_table(generator));
    sql.push_str(" SET ");
    sql.push_str(&assignments.join(", "));
    sql.push_str(" WHERE ");
    sql.push_str(&where_sql);

    Ok(Statement {
        sql,
        params: ctx.into_params(),
    })
}
