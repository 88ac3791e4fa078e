//! Predicate expression tree and its builder DSL.

use serde::{Deserialize, Serialize};

use super::operators::{BinaryOp, StringMethod};
use super::values::Value;

/// A node in a predicate expression tree.
///
/// Field access on the row parameter is `Field`; a value captured from the
/// caller's scope is `Captured`, with the value already evaluated by the DSL
/// at construction time. Both `Captured` and `Literal` become parameter
/// bindings when compiled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expr {
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    /// Member access on the row parameter, by declared field name.
    Field(String),
    /// A value captured from the surrounding scope, already evaluated.
    Captured { name: String, value: Value },
    Literal(Value),
    /// String method call lowered to LIKE.
    Method {
        method: StringMethod,
        target: Box<Expr>,
        argument: Box<Expr>,
    },
    Not(Box<Expr>),
    /// Type conversion wrapper; transparent to compilation.
    Convert(Box<Expr>),
}

/// Row-parameter field access: `field("UserName")`.
pub fn field(name: &str) -> Expr {
    Expr::Field(name.to_string())
}

/// Literal value expression.
pub fn lit(value: impl Into<Value>) -> Expr {
    Expr::Literal(value.into())
}

/// A named value captured from the caller's scope.
pub fn captured(name: &str, value: impl Into<Value>) -> Expr {
    Expr::Captured {
        name: name.to_string(),
        value: value.into(),
    }
}

impl Expr {
    pub fn binary(op: BinaryOp, left: Expr, right: Expr) -> Expr {
        Expr::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Equality against a value (column = value).
    pub fn eq(self, value: impl Into<Value>) -> Expr {
        Expr::binary(BinaryOp::Eq, self, Expr::Literal(value.into()))
    }

    /// Inequality against a value (column != value).
    pub fn ne(self, value: impl Into<Value>) -> Expr {
        Expr::binary(BinaryOp::Ne, self, Expr::Literal(value.into()))
    }

    pub fn gt(self, value: impl Into<Value>) -> Expr {
        Expr::binary(BinaryOp::Gt, self, Expr::Literal(value.into()))
    }

    pub fn gte(self, value: impl Into<Value>) -> Expr {
        Expr::binary(BinaryOp::Gte, self, Expr::Literal(value.into()))
    }

    pub fn lt(self, value: impl Into<Value>) -> Expr {
        Expr::binary(BinaryOp::Lt, self, Expr::Literal(value.into()))
    }

    pub fn lte(self, value: impl Into<Value>) -> Expr {
        Expr::binary(BinaryOp::Lte, self, Expr::Literal(value.into()))
    }

    /// Equality against another expression, for field-to-expression shapes.
    pub fn eq_expr(self, other: Expr) -> Expr {
        Expr::binary(BinaryOp::Eq, self, other)
    }

    pub fn and(self, other: Expr) -> Expr {
        Expr::binary(BinaryOp::And, self, other)
    }

    pub fn or(self, other: Expr) -> Expr {
        Expr::binary(BinaryOp::Or, self, other)
    }

    /// Substring match, lowered to `LIKE` with `%value%` bound.
    pub fn contains(self, value: impl Into<Value>) -> Expr {
        self.method(StringMethod::Contains, value)
    }

    /// Prefix match, lowered to `LIKE` with `value%` bound.
    pub fn starts_with(self, value: impl Into<Value>) -> Expr {
        self.method(StringMethod::StartsWith, value)
    }

    /// Suffix match, lowered to `LIKE` with `%value` bound.
    pub fn ends_with(self, value: impl Into<Value>) -> Expr {
        self.method(StringMethod::EndsWith, value)
    }

    fn method(self, method: StringMethod, value: impl Into<Value>) -> Expr {
        Expr::Method {
            method,
            target: Box::new(self),
            argument: Box::new(Expr::Literal(value.into())),
        }
    }

    /// Logical negation (`NOT ...`).
    pub fn negate(self) -> Expr {
        Expr::Not(Box::new(self))
    }

    /// Wrap in a transparent conversion node.
    pub fn convert(self) -> Expr {
        Expr::Convert(Box::new(self))
    }
}
