use std::collections::HashSet;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::CandidateLocator;
use crate::inflector::{pluralize, singularize};
use crate::io::FileSystemTrait;
use crate::scanner::DefinitionKind;
use crate::symbol::DefinitionMatch;

/// Likely homes of a method, after the same-named model files
const METHOD_SEARCH_GLOBS: [&str; 6] = [
    "app/controllers/**/*_controller.rb",
    "app/helpers/**/*_helper.rb",
    "app/services/**/*.rb",
    "app/concerns/**/*.rb",
    "lib/**/*.rb",
    "**/*.rb",
];

impl<F: FileSystemTrait> CandidateLocator<F> {
    /// Ordered, de-duplicated files a method search visits after the current file
    pub fn method_candidates(&self, name: &str, current_file: Option<&Path>) -> Vec<PathBuf> {
        let models = self.root.join("app/models");
        let mut ordered = vec![
            models.join(format!("{}.rb", singularize(name))),
            models.join(format!("{}.rb", pluralize(name))),
        ];
        for glob in METHOD_SEARCH_GLOBS {
            ordered.extend(self.find_files(glob));
        }

        let mut seen: HashSet<PathBuf> = HashSet::new();
        if let Some(current) = current_file {
            seen.insert(current.to_path_buf());
        }
        ordered.retain(|path| seen.insert(path.clone()));
        ordered
    }

    /// Find a method, class method, attribute or scope named `name`
    ///
    /// The current file is checked first, then every candidate in order.
    /// Each file is tried with all member forms before moving on.
    pub fn find_method(&self, name: &str, current_file: Option<&Path>) -> Option<DefinitionMatch> {
        debug!("Searching for method '{}' in project", name);

        if let Some(current) = current_file
            && let Some(found) = self
                .scanner
                .scan_file_kinds(current, name, &DefinitionKind::MEMBER_FORMS)
        {
            debug!("Found method '{}' in current file", name);
            return Some(found);
        }

        for path in self.method_candidates(name, current_file) {
            if let Some(found) = self
                .scanner
                .scan_file_kinds(&path, name, &DefinitionKind::MEMBER_FORMS)
            {
                debug!("Found method '{}' in {}", name, path.display());
                return Some(found);
            }
        }

        debug!("Method '{}' not found", name);
        None
    }
}
