//! Import resolution
//!
//! Handles `importe "<path>"` statements:
//! - `matematica` and `conversao` are standard modules with fixed symbols
//! - other paths are read through a [`FileSystem`], analyzed, and their
//!   global declarations merged into one imported scope
//!
//! Imported files are followed transitively, breadth-first, each file once.

mod fs;

use std::collections::HashSet;
use std::io;
use std::path::Path;

use futures::future::join_all;
use thiserror::Error;
use tracing::{debug, warn};

use crate::common::{Diagnostic, DiagnosticCode, LintError, Position};
use crate::lexer::{tokenize, Keyword, Token, TokenBuffer, TokenKind};
use crate::sema::{analyze, builtin, Function, Scope, ScopeKind, ValueType, Variable};

pub use fs::{FileSystem, MemoryFileSystem, NativeFileSystem};

/// Module names resolved without touching the file system
pub const STANDARD_MODULES: &[&str] = &["matematica", "conversao"];

/// One `importe "<path>"` statement
#[derive(Debug, Clone, Copy)]
pub struct ImportStatement<'t> {
    pub keyword: &'t Token,
    pub path: &'t Token,
}

impl ImportStatement<'_> {
    /// The imported path without quotes
    pub fn path(&self) -> &str {
        self.path.unquoted()
    }

    pub fn is_standard(&self) -> bool {
        STANDARD_MODULES.contains(&self.path())
    }

    /// Range of the path between its quotes
    pub fn path_range(&self) -> (Position, Position) {
        let start = self.path.start();
        let end = self.path.end();
        (
            Position::new(start.line, start.column + 1),
            Position::new(end.line, end.column.saturating_sub(1).max(start.column + 1)),
        )
    }

    pub fn error(&self) -> Diagnostic {
        let (start, end) = self.path_range();
        Diagnostic::error(
            DiagnosticCode::ImportError,
            format!(
                "Erro ao carregar o arquivo: \"{}\". Verifique o caminho ou as permissões.",
                self.path()
            ),
            start,
            end,
        )
    }
}

/// Every `importe` keyword directly followed by a string literal
pub fn find_imports(buffer: &TokenBuffer) -> Vec<ImportStatement<'_>> {
    let mut cursor = buffer.cursor();
    let mut statements = Vec::new();
    while let Some(token) = cursor.next_token() {
        if !token.is_keyword(Keyword::Importe) {
            continue;
        }
        if let Some(path) = cursor.peek().filter(|t| t.kind == TokenKind::String) {
            cursor.next_token();
            statements.push(ImportStatement {
                keyword: token,
                path,
            });
        }
    }
    statements
}

/// Symbols exported by a standard module
pub fn standard_module(name: &str) -> Option<Scope> {
    let (functions, constants): (&[&str], &[(&str, ValueType)]) = match name {
        "matematica" => (&["raiz", "potencia"], &[("pi", ValueType::Float)]),
        "conversao" => (&["int", "real"], &[]),
        _ => return None,
    };

    let mut scope = Scope::imported();
    for function in functions.iter().filter_map(|f| builtin(f)) {
        scope.define_function(function.name, Function::from(function));
    }
    for &(constant, ty) in constants {
        scope.define_variable(
            constant,
            Variable {
                ty,
                constant: true,
                declared_at: None,
            },
        );
    }
    Some(scope)
}

/// Why an imported file could not be analyzed
#[derive(Error, Debug)]
enum LoadFailure {
    #[error("file not found")]
    Missing,

    #[error("read failed: {0}")]
    Unreadable(#[from] io::Error),

    #[error(transparent)]
    Invalid(#[from] LintError),
}

/// A file waiting to be loaded
struct Pending {
    path: String,
    /// Named by the document itself rather than by an imported file
    direct: bool,
}

/// Merged imports of one document
#[derive(Debug)]
pub struct Resolution {
    pub scope: Scope,
    /// One per document statement naming a file that exists but could not
    /// be analyzed
    pub diagnostics: Vec<Diagnostic>,
}

/// Resolves the imports of a document against a file system
pub struct ImportResolver<'f, F: FileSystem> {
    fs: &'f F,
}

impl<'f, F: FileSystem> ImportResolver<'f, F> {
    pub fn new(fs: &'f F) -> Self {
        Self { fs }
    }

    async fn load(&self, path: &str) -> Result<TokenBuffer, LoadFailure> {
        let path = Path::new(path);
        if !self.fs.exists(path).await {
            return Err(LoadFailure::Missing);
        }
        let source = self.fs.read_text(path).await?;
        Ok(tokenize(&source)?)
    }

    pub async fn resolve(&self, buffer: &TokenBuffer) -> Resolution {
        let mut scope = Scope::imported();
        let statements = find_imports(buffer);
        let mut failed = HashSet::new();
        let mut visited = HashSet::new();
        let mut level: Vec<Pending> = statements
            .iter()
            .map(|statement| Pending {
                path: statement.path().to_string(),
                direct: true,
            })
            .collect();

        while !level.is_empty() {
            let mut files = Vec::new();
            for pending in level.drain(..) {
                if !visited.insert(pending.path.clone()) {
                    continue;
                }
                if let Some(module) = standard_module(&pending.path) {
                    merge(&mut scope, &module);
                    continue;
                }
                files.push(pending);
            }

            let loads = join_all(files.iter().map(|pending| self.load(&pending.path))).await;

            for (pending, load) in files.into_iter().zip(loads) {
                match load {
                    Ok(imported) => {
                        let analysis = analyze(&imported);
                        merge(&mut scope, analysis.tree().get(analysis.tree().root()));
                        level.extend(find_imports(&imported).into_iter().map(|nested| Pending {
                            path: nested.path().to_string(),
                            direct: false,
                        }));
                    }
                    Err(LoadFailure::Missing) if pending.direct => {}
                    Err(failure) if pending.direct => {
                        debug!(path = %pending.path, %failure, "import could not be analyzed");
                        failed.insert(pending.path);
                    }
                    Err(failure) => warn!(path = %pending.path, %failure, "skipping nested import"),
                }
            }
        }

        // Every statement naming a failed file is reported, repeats included
        let diagnostics = statements
            .iter()
            .filter(|statement| failed.contains(statement.path()))
            .map(ImportStatement::error)
            .collect();

        debug!(
            files = visited.len(),
            variables = scope.variables().count(),
            functions = scope.functions().count(),
            "resolved imports"
        );
        Resolution { scope, diagnostics }
    }
}

/// Copy the globals of `from` into `into`. Names already present are kept,
/// built-ins seeded into a file's global scope are not exported.
fn merge(into: &mut Scope, from: &Scope) {
    let exports_builtins = from.kind == ScopeKind::Imported;
    for (name, variable) in from.variables() {
        if into.variable(name).is_none() {
            into.define_variable(
                name,
                Variable {
                    declared_at: None,
                    ..variable.clone()
                },
            );
        }
    }
    for (name, function) in from.functions() {
        if into.function(name).is_none() && (exports_builtins || !function.builtin) {
            into.define_function(
                name,
                Function {
                    declared_at: None,
                    ..function.clone()
                },
            );
        }
    }
}
