//! Typed predicate and projection compiler for a single-table relational mapper.
//!
//! Predicates and projections arrive as a typed AST and leave as
//! parameterized, dialect-correct SQL. No strings are parsed and no SQL is
//! concatenated from user values.
//!
//! ```ignore
//! use relq::prelude::*;
//! let stmt = session.query::<User>()?
//!     .filter(field("UserName").eq("admin"))
//!     .to_select()?;
//! ```

pub mod ast;
pub mod compile;
pub mod dialect;
pub mod entity;
pub mod error;
pub mod log;
pub mod query;
pub mod row;
pub mod statement;

pub use error::{RelqError, RelqResult};
pub use query::{Query, Session};

pub mod prelude {
    pub use crate::ast::expr::field;
    pub use crate::ast::*;
    pub use crate::call_site;
    pub use crate::dialect::Dialect;
    pub use crate::entity::{Entity, EntityMapping, EntityRegistry, FieldMapping};
    pub use crate::error::*;
    pub use crate::query::{Query, Session};
    pub use crate::row::{Materialize, Record, RowCursor};
    pub use crate::statement::Statement;
}
