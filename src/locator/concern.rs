use std::path::PathBuf;

use tracing::debug;

use super::CandidateLocator;
use crate::inflector::camel_to_snake;
use crate::io::FileSystemTrait;
use crate::scanner::patterns::{self, ANY_CLASS_OR_MODULE};
use crate::symbol::DefinitionMatch;

/// Standard concern directories, in lookup order
const CONCERN_DIRS: [&str; 3] = [
    "app/controllers/concerns",
    "app/models/concerns",
    "app/helpers/concerns",
];

impl<F: FileSystemTrait> CandidateLocator<F> {
    /// Find a concern module
    pub fn find_concern(&self, name: &str) -> Option<DefinitionMatch> {
        debug!("Searching for concern '{}'", name);

        let file_name = format!("{}.rb", camel_to_snake(name));
        let exact = vec![
            patterns::declaration_pattern(&["module"], name),
            patterns::declaration_pattern(&["class"], name),
        ];

        let candidates: Vec<PathBuf> = CONCERN_DIRS
            .iter()
            .map(|dir| self.root.join(dir).join(&file_name))
            .collect();

        for path in &candidates {
            if let Some(found) = self.conventional_lookup(path, &exact, ANY_CLASS_OR_MODULE) {
                debug!("Found concern '{}' in {}", name, path.display());
                return Some(found);
            }
        }

        let pattern = patterns::declaration_pattern(&["module", "class"], name);
        self.tree_scan("app/**/*.rb", &pattern, &candidates, None)
    }
}
