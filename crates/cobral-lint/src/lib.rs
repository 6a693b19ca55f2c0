//! Cobral Lint - static analysis for the Cobral teaching language
//!
//! This library reports diagnostics for Cobral source text without a full
//! parser: it re-walks a shared token buffer guided by a scope tree.
//!
//! ## Architecture
//!
//! The linter is organized into:
//! - **Lexer** (`lexer/`): Tokenization and the rewindable token cursor
//! - **Semantic analysis** (`sema/`): Scope tree, inferred types, hover and completion
//! - **Imports** (`imports/`): Standard modules and files merged into an imported scope
//! - **Rules** (`rules/`): Undefined, unused, comparison and import checks
//! - **Driver** (`driver/`): Runs the enabled rules and merges their diagnostics
//! - **Common** (`common/`): Shared infrastructure (errors, spans, diagnostics)

pub mod common;
pub mod lexer;
pub mod sema;
pub mod imports;
pub mod rules;
pub mod driver;

// Re-exports for convenience
pub use common::{Diagnostic, DiagnosticCode, DiagnosticReporter, LintError, LintResult, Position, Severity};
pub use driver::{Linter, LinterConfig};
pub use imports::{FileSystem, MemoryFileSystem, NativeFileSystem};
