//! Typed expression AST consumed by the compiler.
//!
//! The AST is built by the calling DSL layer and read-only for the compiler.

pub mod expr;
pub mod operators;
pub mod selector;
pub mod values;

pub use expr::Expr;
pub use operators::{BinaryOp, SortOrder, StringMethod};
pub use selector::{ResultShape, Selector, TargetField};
pub use values::{FieldKind, Value};
