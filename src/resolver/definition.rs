use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::error::ResolverError;
use crate::io::FileSystemTrait;
use crate::locator::{CandidateLocator, ComponentKind, Strategy};
use crate::scanner::DefinitionKind;
use crate::symbol::DefinitionMatch;

/// Does `name` look like a class or module name?
///
/// True when the first character is its own uppercase form and differs from
/// its lowercase form. Everything else (including `_private` and digits) is
/// treated as a member name.
pub fn is_class_like(name: &str) -> bool {
    let Some(first) = name.chars().next() else {
        return false;
    };
    first.to_uppercase().eq([first]) && !first.to_lowercase().eq([first])
}

/// Strategies to launch for `name`, in priority order
pub fn plan_strategies(name: &str) -> Vec<Strategy> {
    if !is_class_like(name) {
        return vec![Strategy::Method];
    }

    let mut strategies = vec![Strategy::Class];

    let has_component_suffix = ComponentKind::ALL
        .iter()
        .any(|kind| name.ends_with(kind.suffix()));
    if !has_component_suffix {
        strategies.push(Strategy::Model);
        strategies.push(Strategy::Concern);
    }

    strategies.extend(
        ComponentKind::ALL
            .into_iter()
            .filter(|kind| kind.applies_to(name))
            .map(Strategy::Component),
    );
    strategies
}

/// Resolves an identifier to its most plausible definition
pub struct DefinitionResolver<F: FileSystemTrait> {
    locator: Arc<CandidateLocator<F>>,
}

impl<F: FileSystemTrait> DefinitionResolver<F> {
    pub fn new(locator: Arc<CandidateLocator<F>>) -> Self {
        Self { locator }
    }

    /// Find the definition of `name`, preferring the file it was found in
    ///
    /// Strategies run concurrently but the result is chosen by launch order,
    /// never by completion order. Never fails: problems are logged and
    /// reported as `None`.
    pub async fn resolve(&self, name: &str, current_file: Option<&Path>) -> Option<DefinitionMatch> {
        if name.is_empty() {
            warn!("Ignoring definition lookup for an empty name");
            return None;
        }

        if let Some(current) = current_file {
            match self.search_current_file(name, current).await {
                Ok(Some(found)) => {
                    info!("Found '{}' in current file at line {}", name, found.line + 1);
                    return Some(found);
                }
                Ok(None) => {}
                Err(e) => warn!("Current file search for '{}' failed: {}", name, e),
            }
        }

        let strategies = plan_strategies(name);
        debug!("Launching strategies for '{}': {:?}", name, strategies);

        let current: Option<PathBuf> = current_file.map(Path::to_path_buf);
        let handles: Vec<_> = strategies
            .iter()
            .map(|strategy| {
                let strategy = *strategy;
                let locator = Arc::clone(&self.locator);
                let name = name.to_string();
                let current = current.clone();
                let handle = tokio::task::spawn_blocking(move || {
                    locator.run(strategy, &name, current.as_deref())
                });
                (strategy, handle)
            })
            .collect();

        let mut winner: Option<DefinitionMatch> = None;
        for (strategy, handle) in handles {
            match handle.await {
                Ok(Some(found)) => {
                    debug!("{:?} search found '{}' in {}", strategy, name, found.file_path.display());
                    if winner.is_none() {
                        winner = Some(found);
                    }
                }
                Ok(None) => debug!("{:?} search found nothing for '{}'", strategy, name),
                Err(e) => warn!("{:?} search for '{}' failed: {}", strategy, name, e),
            }
        }

        if winner.is_none() {
            info!("No definition found for '{}'", name);
        }
        winner
    }

    /// Method, then attribute declaration, in the caller's own file
    async fn search_current_file(
        &self,
        name: &str,
        current: &Path,
    ) -> Result<Option<DefinitionMatch>, ResolverError> {
        let locator = Arc::clone(&self.locator);
        let name = name.to_string();
        let current = current.to_path_buf();

        let found = tokio::task::spawn_blocking(move || {
            let scanner = locator.scanner();
            let text = scanner.read(&current)?;
            scanner
                .scan_text(&current, &text, &name, DefinitionKind::Method)
                .or_else(|| scanner.scan_text(&current, &text, &name, DefinitionKind::Attr))
        })
        .await?;
        Ok(found)
    }
}
