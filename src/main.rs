mod commands;
mod config;
mod engine;
mod error;
mod inflector;
mod io;
mod locator;
mod logging;
mod resolver;
mod scanner;
mod symbol;

#[cfg(test)]
mod test_utils;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use clap::{Args as ClapArgs, Parser, Subcommand};
use commands::{Commands, DefinitionView, EditorContext, OutputFormat, TerminalHost};
use config::EngineConfig;
use engine::Engine;
use io::RealFileSystem;
use logging::{LogConfig, init_logging};
use tracing::info;

/// Convention-based definition, reference and association lookup for Rails projects
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Rails project root (defaults to current directory)
    #[arg(long, value_name = "DIR", global = true)]
    root: Option<PathBuf>,

    /// Log level (overrides RUST_LOG env var)
    #[arg(long, value_name = "LEVEL", global = true)]
    log_level: Option<String>,

    /// Log file path (overrides RAILS_NAV_LOG_FILE env var)
    #[arg(long, value_name = "FILE", global = true)]
    log_file: Option<PathBuf>,

    /// Write logs as JSON lines
    #[arg(long, global = true)]
    json_logs: bool,

    /// Result output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text, global = true)]
    format: OutputFormat,

    /// Files per reference-search batch (overrides RAILS_NAV_BATCH_SIZE)
    #[arg(long, value_name = "N", global = true)]
    batch_size: Option<usize>,

    /// Largest file in bytes scanned for references (overrides RAILS_NAV_MAX_FILE_SIZE)
    #[arg(long, value_name = "BYTES", global = true)]
    max_file_size: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Go to the definition of an identifier
    Definition(Cursor),
    /// Show the definition of an identifier without navigating
    Peek(Cursor),
    /// Find references to an identifier
    References {
        #[command(flatten)]
        cursor: Cursor,
        /// Only search the current file
        #[arg(long)]
        in_file: bool,
    },
    /// Follow a model association to its target model
    Association(Cursor),
}

/// The active file and the identifier to look up
#[derive(ClapArgs, Debug)]
struct Cursor {
    /// File the identifier appears in
    #[arg(long, value_name = "FILE")]
    file: Option<PathBuf>,

    /// Identifier to look up; taken from --line/--column when omitted
    word: Option<String>,

    /// Cursor line (1-based)
    #[arg(long, requires = "column")]
    line: Option<usize>,

    /// Cursor column (1-based)
    #[arg(long, requires = "line")]
    column: Option<usize>,
}

/// Build the editor context for a command, reading the file for cursor lookups
fn editor_context(
    engine: &Engine<RealFileSystem>,
    cursor: &Cursor,
) -> Result<Option<EditorContext>, std::io::Error> {
    let Some(file) = &cursor.file else {
        return Ok(None);
    };
    let file = engine.absolute(file);

    if cursor.word.is_some() {
        return Ok(Some(EditorContext::new(file, cursor.word.clone())));
    }

    match (cursor.line, cursor.column) {
        (Some(line), Some(column)) => {
            let text = std::fs::read_to_string(&file)?;
            Ok(Some(EditorContext::from_cursor(
                file,
                &text,
                line.saturating_sub(1),
                column.saturating_sub(1),
            )))
        }
        _ => Ok(Some(EditorContext::new(file, None))),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let log_config = LogConfig::from_env().with_overrides(
        args.log_level.clone(),
        args.log_file.clone(),
        args.json_logs,
    );

    if let Err(e) = init_logging(log_config) {
        eprintln!("Failed to initialize logging: {e}");
        std::process::exit(1);
    }

    // Resolve project root directory
    let project_root = args.root.clone().unwrap_or_else(|| {
        std::env::current_dir().unwrap_or_else(|e| {
            eprintln!("Failed to get current directory: {e}");
            std::process::exit(1);
        })
    });

    let config = EngineConfig::from_env(project_root)
        .with_overrides(args.batch_size, args.max_file_size);
    info!(
        "Using Rails project root: {} (batch size {}, max file size {} bytes)",
        config.project_root.display(),
        config.references.batch_size,
        config.references.max_file_size
    );

    let engine = Arc::new(Engine::new(RealFileSystem, config));
    let commands = Commands::new(Arc::clone(&engine), TerminalHost::new(args.format));

    let cursor = match &args.command {
        Command::Definition(cursor)
        | Command::Peek(cursor)
        | Command::Association(cursor)
        | Command::References { cursor, .. } => cursor,
    };
    let context = match editor_context(&engine, cursor) {
        Ok(context) => context,
        Err(e) => {
            eprintln!("error: Failed to read file: {e}");
            std::process::exit(1);
        }
    };

    let started = Instant::now();
    let operation = match &args.command {
        Command::Definition(_) => "definition",
        Command::Peek(_) => "peek",
        Command::References { .. } => "references",
        Command::Association(_) => "association",
    };

    match &args.command {
        Command::Definition(_) => {
            commands
                .definition(context.as_ref(), DefinitionView::Navigate)
                .await
        }
        Command::Peek(_) => commands.definition(context.as_ref(), DefinitionView::Peek).await,
        Command::References { in_file, .. } => {
            commands.references(context.as_ref(), *in_file).await
        }
        Command::Association(_) => commands.association(context.as_ref()).await,
    }
    log_timing!(tracing::Level::INFO, operation, started.elapsed());

    Ok(())
}
