//! SQL dialect abstraction.
//!
//! Everything provider-specific goes through [`SqlGenerator`]; the compiler
//! itself never hardcodes quoting, placeholder syntax, or paging clauses.

pub mod postgres;

pub use postgres::PostgresGenerator;

use serde::{Deserialize, Serialize};

/// Provider-specific SQL fragments.
pub trait SqlGenerator: Send + Sync {
    /// Quote an identifier for this provider.
    fn quote_identifier(&self, name: &str) -> String;

    /// Render a parameter placeholder for the given parameter name.
    fn parameter(&self, name: &str) -> String;

    /// Pattern-match operator.
    fn like_operator(&self) -> &'static str {
        "LIKE"
    }

    /// Wildcard character used in bound pattern values.
    fn like_wildcard(&self) -> char {
        '%'
    }

    /// Paging clause, without leading space. Empty when neither bound is set.
    fn limit_offset(&self, skip: Option<u64>, take: Option<u64>) -> String;

    /// Clause returning a generated key after INSERT, with leading space.
    fn returning(&self, column: &str) -> String;
}

/// Supported SQL dialects.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Dialect {
    #[default]
    Postgres,
}

impl Dialect {
    pub fn generator(&self) -> Box<dyn SqlGenerator> {
        match self {
            Dialect::Postgres => Box::new(PostgresGenerator),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Dialect::Postgres => "postgres",
        }
    }
}
