use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::rc::Rc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use clap::{Parser, Subcommand};
use lsp_types::{Position, Range};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use workflowlens::config::Config;
use workflowlens::document::tree::Snapshot;
use workflowlens::document::TextDocument;
use workflowlens::file::loader::load_workflow;
use workflowlens::language::{
    DiagnosticsProvider, RepositoryContext, RepositoryContextProvider, SyntaxLinter,
};
use workflowlens::runner::command_ranges;
use workflowlens::yamlpath::{self, Evaluator, KeyPath};

/// workflowlens - inspect GitHub Actions workflow files
#[derive(Parser)]
#[command(name = "workflowlens")]
#[command(version)]
#[command(about = "Key-path queries and command ranges for GitHub Actions workflows", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the key-path of the element at a position
    Locate {
        /// Workflow file (`-` for stdin)
        file: PathBuf,
        /// Line number, starting at 1
        line: u32,
        /// Column number, starting at 1
        column: u32,
    },
    /// Print every value whose key-path matches a pattern
    Collect {
        /// Workflow file (`-` for stdin)
        file: PathBuf,
        /// Key-path pattern (default: enable_path from the config)
        #[arg(short, long)]
        pattern: Option<String>,
    },
    /// Print the runnable command lines of matching values
    Ranges {
        /// Workflow file (`-` for stdin)
        file: PathBuf,
        /// Key-path pattern (default: enable_path from the config)
        #[arg(short, long)]
        pattern: Option<String>,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Report YAML syntax problems
    Check {
        /// Workflow file (`-` for stdin)
        file: PathBuf,
    },
}

/// Uses the enclosing repository, or the current directory outside one.
struct CliRepository;

#[async_trait(?Send)]
impl RepositoryContextProvider for CliRepository {
    async fn repository(&self, path: &Path) -> Option<RepositoryContext> {
        RepositoryContext::discover(path).or_else(|| {
            std::env::current_dir()
                .ok()
                .map(|dir| RepositoryContext::at(&dir))
        })
    }
}

#[derive(Serialize)]
struct RangeOutput {
    path: String,
    range: Range,
    command: String,
}

/// `RUST_LOG` when it is set and valid, otherwise info for this crate.
fn log_filter(rust_log: Option<&str>) -> EnvFilter {
    rust_log
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new("workflowlens=info"))
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(std::env::var("RUST_LOG").ok().as_deref()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Config::load();

    match cli.command {
        Command::Locate { file, line, column } => {
            let snapshot = snapshot_of(&load_workflow(&file)?)?;
            let position = Position::new(line.saturating_sub(1), column.saturating_sub(1));
            let offset = snapshot.offset_at(position);
            let located = snapshot
                .locate(offset)
                .context("Position is outside the document")?;
            let path = if located.path.is_empty() {
                "$".to_string()
            } else {
                located.path.to_string()
            };
            println!("{}\t{}", path, format_range(snapshot.range(located.element.span())));
        }
        Command::Collect { file, pattern } => {
            let pattern = pattern_or_default(pattern.as_deref(), &config)?;
            let snapshot = snapshot_of(&load_workflow(&file)?)?;
            for (path, pair) in Evaluator::new(snapshot.root()).collect_pairs(&pattern) {
                let text = snapshot.slice(pair.value.span());
                let first_line = text.lines().next().unwrap_or_default();
                println!(
                    "{}\t{}\t{}",
                    path,
                    format_range(snapshot.range(pair.value.span())),
                    first_line
                );
            }
        }
        Command::Ranges {
            file,
            pattern,
            json,
        } => {
            let pattern = pattern_or_default(pattern.as_deref(), &config)?;
            let snapshot = snapshot_of(&load_workflow(&file)?)?;
            let mut output = Vec::new();
            for (path, pair) in Evaluator::new(snapshot.root()).collect_pairs(&pattern) {
                for range in command_ranges(&snapshot, &pair.value) {
                    output.push(RangeOutput {
                        path: path.to_string(),
                        range: range.range,
                        command: snapshot.slice(range.span),
                    });
                }
            }

            if json {
                println!("{}", serde_json::to_string_pretty(&output)?);
            } else {
                for item in &output {
                    println!("{}\t{}", format_range(item.range), item.command);
                }
            }
        }
        Command::Check { file } => {
            let document = load_workflow(&file)?;
            let provider = DiagnosticsProvider::new(
                Rc::new(CliRepository),
                Rc::new(SyntaxLinter),
                config.diagnostics_source.clone(),
            );
            provider.on_change(&document).await;

            let diagnostics = provider.diagnostics(document.path());
            for diagnostic in &diagnostics {
                println!(
                    "{}:{}: error: {}",
                    document.path().display(),
                    diagnostic.range.start.line + 1,
                    diagnostic.message
                );
            }
            if !diagnostics.is_empty() {
                return Ok(ExitCode::FAILURE);
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn snapshot_of(document: &TextDocument) -> Result<Snapshot> {
    document
        .snapshot()
        .with_context(|| format!("Failed to parse {}", document.path().display()))
}

fn pattern_or_default(pattern: Option<&str>, config: &Config) -> Result<KeyPath> {
    match pattern {
        Some(p) => yamlpath::Parser::parse(p).context("Invalid key-path pattern"),
        None => config.enable_path().context("Invalid enable_path in config"),
    }
}

/// `line:col-line:col`, both 1-based.
fn format_range(range: Range) -> String {
    format!(
        "{}:{}-{}:{}",
        range.start.line + 1,
        range.start.character + 1,
        range.end.line + 1,
        range.end.character + 1
    )
}
