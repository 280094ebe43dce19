use std::io::{self, Write};

use async_trait::async_trait;
use serde::Serialize;

use crate::symbol::{DefinitionMatch, ReferenceMatch};

/// Failures while presenting a result
#[derive(Debug, thiserror::Error)]
pub enum HostError {
    #[error("Output failed: {0}")]
    Io(#[from] io::Error),

    #[error("Serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Presentation surface the commands drive
///
/// An editor integration opens files and shows pickers; the terminal host
/// prints. Navigation-style calls can fail; notifications cannot.
#[async_trait]
pub trait HostUi: Send + Sync {
    /// Jump to a definition
    async fn navigate(&self, target: &DefinitionMatch) -> Result<(), HostError>;

    /// Show a definition inline without leaving the current location
    async fn peek(&self, target: &DefinitionMatch) -> Result<(), HostError>;

    /// Present a list of references
    async fn show_references(
        &self,
        word: &str,
        references: &[ReferenceMatch],
    ) -> Result<(), HostError>;

    async fn info(&self, message: &str);

    async fn error(&self, message: &str);

    /// Short-lived status line message
    async fn status(&self, message: &str);
}

/// How the terminal host prints results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// `path:line` and `path:line:column` lines
    #[default]
    Text,
    /// One JSON object per result
    Json,
}

#[derive(Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
enum HostEvent<'a> {
    Navigate { target: &'a DefinitionMatch },
    Peek { target: &'a DefinitionMatch },
    References { word: &'a str, references: &'a [ReferenceMatch] },
}

/// Prints results to stdout and notifications to stderr
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalHost {
    format: OutputFormat,
}

impl TerminalHost {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    fn emit(&self, event: &HostEvent<'_>) -> Result<(), HostError> {
        let mut stdout = io::stdout().lock();
        match self.format {
            OutputFormat::Json => {
                serde_json::to_writer(&mut stdout, event)?;
                writeln!(stdout)?;
            }
            OutputFormat::Text => match event {
                HostEvent::Navigate { target } => writeln!(stdout, "{target}")?,
                HostEvent::Peek { target } => writeln!(stdout, "peek {target}")?,
                HostEvent::References { references, .. } => {
                    for reference in *references {
                        writeln!(stdout, "{}", reference.to_compact())?;
                    }
                }
            },
        }
        stdout.flush()?;
        Ok(())
    }
}

#[async_trait]
impl HostUi for TerminalHost {
    async fn navigate(&self, target: &DefinitionMatch) -> Result<(), HostError> {
        self.emit(&HostEvent::Navigate { target })
    }

    async fn peek(&self, target: &DefinitionMatch) -> Result<(), HostError> {
        self.emit(&HostEvent::Peek { target })
    }

    async fn show_references(
        &self,
        word: &str,
        references: &[ReferenceMatch],
    ) -> Result<(), HostError> {
        self.emit(&HostEvent::References { word, references })
    }

    async fn info(&self, message: &str) {
        eprintln!("{message}");
    }

    async fn error(&self, message: &str) {
        eprintln!("error: {message}");
    }

    async fn status(&self, message: &str) {
        eprintln!("{message}");
    }
}
