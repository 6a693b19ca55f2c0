//! Cobral Lint - static analysis for the Cobral teaching language
//!
//! Usage: cobral-lint [OPTIONS] <files>...

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser as ClapParser, ValueEnum};
use tracing_subscriber::EnvFilter;

use cobral_lint::common::DiagnosticReporter;
use cobral_lint::lexer::tokenize;
use cobral_lint::{Linter, LinterConfig, NativeFileSystem};

/// Diagnostic output format
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Default)]
enum Format {
    /// Source snippets with labels
    #[default]
    Human,
    /// One line per diagnostic
    Short,
}

#[derive(ClapParser, Debug)]
#[command(name = "cobral-lint")]
#[command(author = "Cobral Team")]
#[command(version)]
#[command(about = "Static analysis linter for the Cobral teaching language", long_about = None)]
struct Args {
    /// Cobral source files
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Base directory for import paths (defaults to each file's directory)
    #[arg(long)]
    root: Option<PathBuf>,

    /// Skip import checks
    #[arg(long)]
    no_imports: bool,

    /// Skip comparison checks
    #[arg(long)]
    no_types: bool,

    /// Skip unused declaration checks
    #[arg(long)]
    no_unused: bool,

    /// Skip undefined identifier checks
    #[arg(long)]
    no_undefined: bool,

    /// Dump tokens (for debugging)
    #[arg(long)]
    dump_tokens: bool,

    /// Dump the scope tree (for debugging)
    #[arg(long)]
    dump_scopes: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "human")]
    format: Format,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn config(&self) -> LinterConfig {
        LinterConfig {
            check_imports: !self.no_imports,
            check_types: !self.no_types,
            check_unused: !self.no_unused,
            check_undefined: !self.no_undefined,
        }
    }

    fn import_root(&self, file: &Path) -> PathBuf {
        self.root.clone().unwrap_or_else(|| {
            file.parent()
                .filter(|p| !p.as_os_str().is_empty())
                .map_or_else(|| PathBuf::from("."), Path::to_path_buf)
        })
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(&args).await {
        Ok(true) => ExitCode::FAILURE,
        Ok(false) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

/// Lint every input file; `Ok(true)` when any error diagnostic was found
async fn run(args: &Args) -> Result<bool> {
    let mut reporter = DiagnosticReporter::new();
    let mut found_errors = false;

    for file in &args.files {
        let source = tokio::fs::read_to_string(file)
            .await
            .with_context(|| format!("cannot read {}", file.display()))?;
        let filename = file.display().to_string();
        let file_id = reporter.add_file(&filename, &source);
        let linter = Linter::with_config(NativeFileSystem::new(args.import_root(file)), args.config());

        if args.dump_tokens || args.dump_scopes {
            dump(&linter, &source, args).await;
        }

        let diagnostics = linter.lint(&source).await;
        tracing::debug!(file = %filename, count = diagnostics.len(), "linted");

        for diagnostic in &diagnostics {
            match args.format {
                Format::Human => reporter.report(file_id, diagnostic),
                Format::Short => println!("{}", reporter.format_short(file_id, diagnostic)),
            }
        }
        found_errors |= diagnostics.iter().any(|d| d.is_error());
    }

    Ok(found_errors)
}

async fn dump(linter: &Linter<NativeFileSystem>, source: &str, args: &Args) {
    // Lexical errors are reported by the lint pass itself
    let Ok(buffer) = tokenize(source) else {
        return;
    };

    if args.dump_tokens {
        eprintln!("=== Tokens ===");
        for token in buffer.tokens() {
            eprintln!("{:>4}:{:<3} {:<14} {}", token.line, token.column, token.kind.to_string(), token.text);
        }
        eprintln!("=== End Tokens ===\n");
    }

    if args.dump_scopes {
        let (analysis, _) = linter.analyze(&buffer).await;
        eprintln!("=== Scopes ===");
        eprint!("{}", analysis.tree());
        eprintln!("=== End Scopes ===\n");
    }
}
