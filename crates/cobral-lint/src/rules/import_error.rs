//! Import statements naming files that do not exist

use std::collections::HashMap;
use std::path::Path;

use futures::future::join_all;
use tracing::debug;

use crate::common::Diagnostic;
use crate::imports::{find_imports, FileSystem};
use crate::lexer::TokenBuffer;

/// Checks every non-standard import path for existence, one check per
/// distinct path
pub struct ImportError;

impl ImportError {
    pub fn name(&self) -> &'static str {
        "import-error"
    }

    pub async fn check<F: FileSystem>(&self, buffer: &TokenBuffer, fs: &F) -> Vec<Diagnostic> {
        let statements: Vec<_> = find_imports(buffer)
            .into_iter()
            .filter(|statement| !statement.is_standard())
            .collect();

        let mut paths: Vec<&str> = statements.iter().map(|s| s.path()).collect();
        paths.sort_unstable();
        paths.dedup();

        let found = join_all(paths.iter().map(|path| fs.exists(Path::new(path)))).await;
        let exists: HashMap<&str, bool> = paths.into_iter().zip(found).collect();
        debug!(checked = exists.len(), "checked import paths");

        statements
            .iter()
            .filter(|statement| !exists.get(statement.path()).copied().unwrap_or(false))
            .map(|statement| statement.error())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::{DiagnosticCode, Position};
    use crate::imports::MemoryFileSystem;
    use crate::lexer::tokenize;
    use pretty_assertions::assert_eq;

    async fn check(source: &str, fs: &MemoryFileSystem) -> Vec<Diagnostic> {
        let buffer = tokenize(source).unwrap();
        ImportError.check(&buffer, fs).await
    }

    #[tokio::test]
    async fn test_missing_file() {
        let diagnostics = check("importe \"naoexiste.cl\";", &MemoryFileSystem::new()).await;

        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].code, DiagnosticCode::ImportError);
        assert_eq!(
            diagnostics[0].message,
            "Erro ao carregar o arquivo: \"naoexiste.cl\". Verifique o caminho ou as permissões."
        );
        assert_eq!((diagnostics[0].start, diagnostics[0].end), (Position::new(1, 10), Position::new(1, 22)));
    }

    #[tokio::test]
    async fn test_standard_modules_and_existing_files() {
        let fs = MemoryFileSystem::new().with_file("lib.cl", "");
        let source = "importe \"matematica\";\nimporte \"conversao\";\nimporte \"lib.cl\";";

        assert!(check(source, &fs).await.is_empty());
    }

    #[tokio::test]
    async fn test_each_statement_reported() {
        let source = "importe \"a.cl\";\nimporte \"a.cl\";\nimporte \"b.cl\";";
        let diagnostics = check(source, &MemoryFileSystem::new().with_file("b.cl", "")).await;
        let lines: Vec<_> = diagnostics.iter().map(Diagnostic::start_line).collect();

        assert_eq!(lines, vec![1, 2]);
    }
}
