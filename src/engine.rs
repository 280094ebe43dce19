//! One project session: shared locator, resolvers and caches

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::debug;

use crate::config::EngineConfig;
use crate::io::FileSystemTrait;
use crate::locator::CandidateLocator;
use crate::resolver::{AssociationResolver, DefinitionResolver, ReferenceFinder};
use crate::scanner::FileScanner;
use crate::symbol::{AssociationMatch, DefinitionMatch, ReferenceMatch};

/// Resolution engine bound to one project root
///
/// Caches live as long as the engine. Every operation is total: failures
/// surface as `None` or an empty list and are visible only in the logs.
pub struct Engine<F: FileSystemTrait> {
    root: PathBuf,
    definitions: DefinitionResolver<F>,
    associations: AssociationResolver<F>,
    references: ReferenceFinder<F>,
}

impl<F: FileSystemTrait> Engine<F> {
    pub fn new(filesystem: F, config: EngineConfig) -> Self {
        let root = config.project_root.clone();
        let locator = Arc::new(CandidateLocator::new(
            root.clone(),
            FileScanner::new(filesystem.clone()),
            config.references.exclude.clone(),
        ));

        Self {
            definitions: DefinitionResolver::new(Arc::clone(&locator)),
            associations: AssociationResolver::new(Arc::clone(&locator)),
            references: ReferenceFinder::new(filesystem, root.clone(), config.references),
            root,
        }
    }

    /// Make `path` absolute against the project root
    pub fn absolute(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }

    pub async fn resolve_definition(
        &self,
        name: &str,
        current_file: Option<&Path>,
    ) -> Option<DefinitionMatch> {
        self.definitions.resolve(name, current_file).await
    }

    pub async fn resolve_association(
        &self,
        model: &str,
        association: &str,
    ) -> Option<AssociationMatch> {
        self.associations.resolve(model, association).await
    }

    pub async fn find_references(
        &self,
        word: &str,
        current_file: Option<&Path>,
        current_file_only: bool,
    ) -> Vec<ReferenceMatch> {
        let references = self
            .references
            .find_references(word, current_file, current_file_only)
            .await;
        debug!(
            "Reference caches: {} files, {} searches",
            self.references.content_cache_len(),
            self.references.search_cache_len()
        );
        references
    }
}
