//! INSERT assembly.

use crate::ast::Value;
use crate::compile::ParamContext;
use crate::dialect::SqlGenerator;
use crate::entity::EntityDescriptor;

use super::trace::CallSite;
use super::Statement;

/// Assemble an INSERT with an explicit column list.
///
/// `values` parallels `entity.columns`. Identity columns are skipped on both
/// sides; when the primary key is an identity column a RETURNING clause asks
/// the server for the generated key.
pub fn build_insert(
    entity: &EntityDescriptor,
    values: &[Value],
    trace: Option<&CallSite>,
    generator: &dyn SqlGenerator,
) -> Statement {
    let mut ctx = ParamContext::new();
    let mut columns = Vec::new();
    let mut placeholders = Vec::new();
    for (column, value) in entity.columns.iter().zip(values) {
        if column.identity {
            continue;
        }
        columns.push(generator.quote_identifier(&column.column));
        placeholders.push(ctx.bind(value.clone(), generator));
    }

    let mut sql = String::new();
    if let Some(trace) = trace {
        sql.push_str(&trace.comment());
        sql.push(' ');
    }
    sql.push_str("INSERT INTO ");
    sql.push_str(&entity.qualified_table(generator));
    sql.push_str(" (");
    sql.push_str(&columns.join(", "));
    sql.push_str(") VALUES (");
    sql.push_str(&placeholders.join(", "));
    sql.push(')');
    if let Some(pk) = entity.primary_key_column() {
        if pk.identity {
            sql.push_str(&generator.returning(&pk.column));
        }
    }

    Statement {
        sql,
        params: ctx.into_params(),
    }
}
