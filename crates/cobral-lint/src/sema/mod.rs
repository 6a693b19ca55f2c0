//! Semantic analysis module
//!
//! Builds the scope tree and per-token side tables the rules and editor
//! queries read from.

mod analysis;
mod builder;
mod builtins;
mod query;
mod scope;
mod types;

pub use analysis::{Analysis, TokenRole};
pub use builder::{analyze, ScopeBuilder};
pub use builtins::{builtin, Builtin, BUILTINS};
pub use query::{completions, hover, Completion, CompletionKind, Hover};
pub use scope::{Function, Scope, ScopeId, ScopeKind, ScopeTree, Variable};
pub use types::ValueType;
