//! SELECT assembly.

use crate::ast::SortOrder;
use crate::dialect::SqlGenerator;
use crate::entity::EntityDescriptor;

use super::trace::CallSite;

/// Compiled pieces a SELECT is assembled from.
#[derive(Debug, Default)]
pub struct SelectParts<'a> {
    pub where_sql: Option<&'a str>,
    /// Projection clause; when absent every entity column is listed.
    pub select_clause: Option<&'a str>,
    /// The single active sort key: entity field name and direction.
    pub order: Option<(&'a str, SortOrder)>,
    pub skip: Option<u64>,
    pub take: Option<u64>,
    pub trace: Option<&'a CallSite>,
}

/// Assemble a SELECT. Clause order is fixed: projection, FROM, WHERE,
/// ORDER BY, paging.
pub fn build_select(
    entity: &EntityDescriptor,
    parts: &SelectParts<'_>,
    generator: &dyn SqlGenerator,
) -> String {
    let mut sql = String::new();
    if let Some(trace) = parts.trace {
        sql.push_str(&trace.comment());
        sql.push(' ');
    }
    sql.push_str("SELECT ");
    match parts.select_clause {
        Some(clause) => sql.push_str(clause),
        None => {
            let columns: Vec<String> = entity
                .columns
                .iter()
                .map(|c| generator.quote_identifier(&c.column))
                .collect();
            sql.push_str(&columns.join(", "));
        }
    }
    sql.push_str(" FROM ");
    sql.push_str(&entity.qualified_table(generator));
    if let Some(where_sql) = parts.where_sql {
        sql.push_str(" WHERE ");
        sql.push_str(where_sql);
    }
    if let Some((field, order)) = parts.order {
        sql.push_str(" ORDER BY ");
        sql.push_str(&generator.quote_identifier(&entity.resolve_column(field)));
        sql.push(' ');
        sql.push_str(order.sql());
    }
    let paging = generator.limit_offset(parts.skip, parts.take);
    if !paging.is_empty() {
        sql.push(' ');
        sql.push_str(&paging);
    }
    sql
}

/// Assemble a COUNT over the same FROM/WHERE as a SELECT.
pub fn build_count(
    entity: &EntityDescriptor,
    where_sql: Option<&str>,
    trace: Option<&CallSite>,
    generator: &dyn SqlGenerator,
) -> String {
    let mut sql = String::new();
    if let Some(trace) = trace {
        sql.push_str(&trace.comment());
        sql.push(' ');
    }
    sql.push_str("SELECT COUNT(*) FROM ");
    sql.push_str(&entity.qualified_table(generator));
    if let Some(where_sql) = where_sql {
        sql.push_str(" WHERE ");
        sql.push_str(where_sql);
    }
    sql
}
