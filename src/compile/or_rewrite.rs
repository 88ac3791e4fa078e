//! OR-chain to IN-list rewrite.
//!
//! `a = 1 OR a = 2 OR a = 3` becomes `"a" IN (@p0, @p1, @p2)`. The rewrite
//! applies only when every leaf of the OR tree is an equality on the same
//! field; any other leaf vetoes the whole rewrite and the chain compiles as
//! nested ORs instead. Parameters come from the statement's shared context,
//! so numbering stays consistent with the rest of the predicate.

use crate::ast::{BinaryOp, Expr, Value};
use crate::dialect::SqlGenerator;
use crate::entity::EntityDescriptor;

use super::predicate::ParamContext;

/// Attempt the rewrite. Returns the IN-clause text (without outer parens)
/// when the whole tree qualifies, `None` otherwise. `None` leaves the
/// context untouched.
pub fn try_rewrite(
    expr: &Expr,
    entity: &EntityDescriptor,
    generator: &dyn SqlGenerator,
    ctx: &mut ParamContext,
) -> Option<String> {
    let mut leaves = Vec::new();
    if !collect(expr, &mut leaves) {
        return None;
    }
    if leaves.len() < 2 {
        return None;
    }
    let field = leaves[0].0;
    if !leaves.iter().all(|(f, _)| *f == field) {
        return None;
    }
    let column = generator.quote_identifier(&entity.resolve_column(field));
    let placeholders: Vec<String> = leaves
        .into_iter()
        .map(|(_, value)| ctx.bind(value.clone(), generator))
        .collect();
    Some(format!("{} IN ({})", column, placeholders.join(", ")))
}

/// Gather `(field, value)` equality leaves, left branch first. Returns false
/// as soon as any node fails to match, vetoing the rewrite.
fn collect<'a>(expr: &'a Expr, out: &mut Vec<(&'a str, &'a Value)>) -> bool {
    match expr {
        Expr::Binary {
            op: BinaryOp::Or,
            left,
            right,
        } => collect(left, out) && collect(right, out),
        Expr::Binary {
            op: BinaryOp::Eq,
            left,
            right,
        } => match (left.as_ref(), right.as_ref()) {
            (Expr::Field(field), Expr::Literal(value))
            | (Expr::Field(field), Expr::Captured { value, .. })
            | (Expr::Literal(value), Expr::Field(field))
            | (Expr::Captured { value, .. }, Expr::Field(field)) => {
                out.push((field, value));
                true
            }
            _ => false,
        },
        _ => false,
    }
}
