//! Statement assembly: final SQL text plus ordered parameter bindings.

pub mod delete;
pub mod insert;
pub mod select;
pub mod trace;
pub mod update;

pub use delete::build_delete;
pub use insert::build_insert;
pub use select::{build_count, build_select, SelectParts};
pub use trace::CallSite;
pub use update::build_update;

use crate::compile::ParameterBinding;

/// A fully assembled statement, ready to hand to a provider.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub sql: String,
    /// Bindings in placeholder order.
    pub params: Vec<ParameterBinding>,
}
