use serde::{Deserialize, Serialize};

/// Binary operators the predicate compiler can translate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinaryOp {
    /// Equal (=)
    Eq,
    /// Not equal (!=)
    Ne,
    /// Greater than (>)
    Gt,
    /// Greater than or equal (>=)
    Gte,
    /// Less than (<)
    Lt,
    /// Less than or equal (<=)
    Lte,
    /// Logical AND
    And,
    /// Logical OR
    Or,
    /// Addition (+)
    Add,
    /// Subtraction (-)
    Sub,
    /// Multiplication (*)
    Mul,
    /// Division (/)
    Div,
}

impl BinaryOp {
    /// Returns the SQL token for this operator.
    pub fn sql_symbol(&self) -> &'static str {
        match self {
            BinaryOp::Eq => "=",
            BinaryOp::Ne => "!=",
            BinaryOp::Gt => ">",
            BinaryOp::Gte => ">=",
            BinaryOp::Lt => "<",
            BinaryOp::Lte => "<=",
            BinaryOp::And => "AND",
            BinaryOp::Or => "OR",
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
        }
    }

    /// Returns true for the comparison subset (emits a boolean result).
    pub fn is_comparison(&self) -> bool {
        matches!(
            self,
            BinaryOp::Eq | BinaryOp::Ne | BinaryOp::Gt | BinaryOp::Gte | BinaryOp::Lt | BinaryOp::Lte
        )
    }
}

/// String methods lowered to LIKE with a wildcard-wrapped bound value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StringMethod {
    /// Substring match: bound as `%value%`
    Contains,
    /// Prefix match: bound as `value%`
    StartsWith,
    /// Suffix match: bound as `%value`
    EndsWith,
}

impl StringMethod {
    pub fn name(&self) -> &'static str {
        match self {
            StringMethod::Contains => "Contains",
            StringMethod::StartsWith => "StartsWith",
            StringMethod::EndsWith => "EndsWith",
        }
    }

    /// Apply the wildcard wrapping at bind time. The SQL side stays a plain
    /// parameter placeholder; only the bound value carries wildcards.
    pub fn wrap(&self, raw: &str, wildcard: char) -> String {
        match self {
            StringMethod::Contains => format!("{}{}{}", wildcard, raw, wildcard),
            StringMethod::StartsWith => format!("{}{}", raw, wildcard),
            StringMethod::EndsWith => format!("{}{}", wildcard, raw),
        }
    }
}

/// Sort order direction for the single active sort key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn sql(&self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}
