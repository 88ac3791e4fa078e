//! Predicate compilation: expression tree to parameterized WHERE text.

use serde::Serialize;

use crate::ast::{BinaryOp, Expr, Value};
use crate::dialect::SqlGenerator;
use crate::entity::EntityDescriptor;
use crate::error::{RelqError, RelqResult};

use super::or_rewrite;

/// One bound parameter: stable name, rendered placeholder, value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParameterBinding {
    pub name: String,
    pub placeholder: String,
    pub value: Value,
}

/// Parameter allocator for one statement.
///
/// Indices are allocated left to right in source order and never reused, so
/// recompiling the same tree yields the same names.
#[derive(Debug, Default)]
pub struct ParamContext {
    index: usize,
    params: Vec<ParameterBinding>,
}

impl ParamContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a value, returning the rendered placeholder for the SQL text.
    pub fn bind(&mut self, value: Value, generator: &dyn SqlGenerator) -> String {
        let name = format!("p{}", self.index);
        self.index += 1;
        let placeholder = generator.parameter(&name);
        self.params.push(ParameterBinding {
            name,
            placeholder: placeholder.clone(),
            value,
        });
        placeholder
    }

    pub fn into_params(self) -> Vec<ParameterBinding> {
        self.params
    }
}

/// A compiled predicate: WHERE text plus its bindings.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledPredicate {
    pub sql: String,
    pub params: Vec<ParameterBinding>,
}

/// Compile a predicate in a fresh parameter context.
pub fn compile(
    expr: &Expr,
    entity: &EntityDescriptor,
    generator: &dyn SqlGenerator,
) -> RelqResult<CompiledPredicate> {
    let mut ctx = ParamContext::new();
    let sql = compile_with(expr, entity, generator, &mut ctx)?;
    Ok(CompiledPredicate {
        sql,
        params: ctx.into_params(),
    })
}

/// Compile a predicate into an existing context, continuing its numbering.
/// UPDATE uses this so SET values and WHERE values share one sequence.
pub fn compile_with(
    expr: &Expr,
    entity: &EntityDescriptor,
    generator: &dyn SqlGenerator,
    ctx: &mut ParamContext,
) -> RelqResult<String> {
    match expr {
        Expr::Binary { op, left, right } => {
            if *op == BinaryOp::Or {
                if let Some(sql) = or_rewrite::try_rewrite(expr, entity, generator, ctx) {
                    return Ok(format!("({})", sql));
                }
            }
            let left_sql = compile_with(left, entity, generator, ctx)?;
            let right_sql = compile_with(right, entity, generator, ctx)?;
            Ok(format!("({} {} {})", left_sql, op.sql_symbol(), right_sql))
        }
        Expr::Field(name) => Ok(generator.quote_identifier(&entity.resolve_column(name))),
        Expr::Captured { value, .. } | Expr::Literal(value) => {
            Ok(ctx.bind(value.clone(), generator))
        }
        Expr::Method {
            method,
            target,
            argument,
        } => {
            let column = match target.as_ref() {
                Expr::Field(name) => generator.quote_identifier(&entity.resolve_column(name)),
                _ => {
                    return Err(RelqError::unsupported(format!(
                        "{}() requires a field target",
                        method.name()
                    )))
                }
            };
            let raw = match argument.as_ref() {
                Expr::Literal(value) | Expr::Captured { value, .. } => value.raw_text(),
                _ => {
                    return Err(RelqError::unsupported(format!(
                        "{}() requires a value argument",
                        method.name()
                    )))
                }
            };
            let pattern = method.wrap(&raw, generator.like_wildcard());
            let placeholder = ctx.bind(Value::String(pattern), generator);
            Ok(format!(
                "{} {} {}",
                column,
                generator.like_operator(),
                placeholder
            ))
        }
        Expr::Not(inner) => {
            let inner_sql = compile_with(inner, entity, generator, ctx)?;
            Ok(format!("NOT {}", inner_sql))
        }
        Expr::Convert(inner) => compile_with(inner, entity, generator, ctx),
    }
}
