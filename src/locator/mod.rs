//! Convention-based candidate location
//!
//! Every Rails component kind has a conventional home derived purely from its
//! name (`UsersController` lives in `app/controllers/users_controller.rb`).
//! Each strategy checks that home first and falls back to scanning the tree
//! when the convention misses. Strategies are synchronous and self-contained
//! so the definition resolver can run them side by side on blocking threads.

mod class;
mod component;
mod concern;
mod method;
mod model;

pub use component::ComponentKind;

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::io::FileSystemTrait;
use crate::scanner::{DefinitionKind, FileScanner};
use crate::symbol::DefinitionMatch;

/// One candidate-location strategy, in the order the resolver launches them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    Class,
    Model,
    Concern,
    Component(ComponentKind),
    Method,
}

/// Locates definitions using Rails directory and naming conventions
pub struct CandidateLocator<F: FileSystemTrait> {
    root: PathBuf,
    scanner: FileScanner<F>,
    exclude: Vec<String>,
}

impl<F: FileSystemTrait> CandidateLocator<F> {
    /// Create a locator for the project at `root`
    ///
    /// `exclude` holds root-relative globs never visited by tree scans.
    pub fn new(root: PathBuf, scanner: FileScanner<F>, exclude: Vec<String>) -> Self {
        Self {
            root,
            scanner,
            exclude,
        }
    }

    pub fn scanner(&self) -> &FileScanner<F> {
        &self.scanner
    }

    /// Run one strategy for `name`
    pub fn run(
        &self,
        strategy: Strategy,
        name: &str,
        current_file: Option<&Path>,
    ) -> Option<DefinitionMatch> {
        match strategy {
            Strategy::Class => self.find_class(name),
            Strategy::Model => self.find_model(name),
            Strategy::Concern => self.find_concern(name),
            Strategy::Component(kind) => self.find_component(kind, name),
            Strategy::Method => self.find_method(name, current_file),
        }
    }

    /// Project files matching a root-relative glob, minus the exclusions
    fn find_files(&self, pattern: &str) -> Vec<PathBuf> {
        let exclude: Vec<&str> = self.exclude.iter().map(String::as_str).collect();
        match self.scanner.filesystem().find(&self.root, pattern, &exclude) {
            Ok(files) => files,
            Err(e) => {
                warn!("Failed to enumerate '{}': {}", pattern, e);
                Vec::new()
            }
        }
    }

    /// Check a conventional file location
    ///
    /// Tries each exact pattern, then `any_pattern`. A file that exists but
    /// matches neither still counts: the match points at its first line.
    /// Returns `None` only when the file is missing or unreadable.
    fn conventional_lookup(
        &self,
        path: &Path,
        exact_patterns: &[String],
        any_pattern: &str,
    ) -> Option<DefinitionMatch> {
        debug!("Checking conventional path: {}", path.display());
        let text = self.scanner.read(path)?;

        for pattern in exact_patterns {
            if let Some(found) = self
                .scanner
                .scan_text(path, &text, pattern, DefinitionKind::Custom)
            {
                debug!("Found exact declaration in {}", path.display());
                return Some(found);
            }
        }

        if let Some(found) = self
            .scanner
            .scan_text(path, &text, any_pattern, DefinitionKind::Custom)
        {
            debug!("Found declaration in {}", path.display());
            return Some(found);
        }

        debug!(
            "File exists but has no declaration, returning first line: {}",
            path.display()
        );
        Some(DefinitionMatch::file_start(path))
    }

    /// First file under `glob` whose text matches `pattern`
    ///
    /// Files in `skip` were already checked by the caller. When
    /// `required_text` is set, files not containing it literally are ignored.
    fn tree_scan(
        &self,
        glob: &str,
        pattern: &str,
        skip: &[PathBuf],
        required_text: Option<&str>,
    ) -> Option<DefinitionMatch> {
        for file in self.find_files(glob) {
            if skip.contains(&file) {
                continue;
            }

            let Some(text) = self.scanner.read(&file) else {
                continue;
            };

            if let Some(required) = required_text
                && !text.contains(required)
            {
                continue;
            }

            if let Some(found) = self
                .scanner
                .scan_text(&file, &text, pattern, DefinitionKind::Custom)
            {
                debug!("Found /{}/ in non-standard location {}", pattern, file.display());
                return Some(found);
            }
        }
        None
    }
}

/// Last `::` segment of a possibly namespaced name
fn bare_name(name: &str) -> &str {
    name.rsplit("::").next().unwrap_or(name)
}


#[cfg(test)]
mod tests {
    use super::testing::{path, project};
    use super::*;

    #[test]
    fn test_bare_name() {
        assert_eq!(bare_name("Admin::UsersController"), "UsersController");
        assert_eq!(bare_name("User"), "User");
    }

    #[test]
    fn test_conventional_lookup_fallback_chain() {
        let (locator, _) = project(&[
            ("app/models/user.rb", "# comment\nclass User\nend\n"),
            ("app/models/legacy.rb", "# comment\nclass Archive\nend\n"),
            ("app/models/empty.rb", "# nothing here\n"),
        ]);
        let exact = vec![crate::scanner::patterns::declaration_pattern(&["class"], "User")];
        let any = crate::scanner::patterns::ANY_CLASS;

        let found = locator
            .conventional_lookup(&path("app/models/user.rb"), &exact, any)
            .unwrap();
        assert_eq!(found.line, 1);

        let found = locator
            .conventional_lookup(&path("app/models/legacy.rb"), &exact, any)
            .unwrap();
        assert_eq!(found.line, 1);

        let found = locator
            .conventional_lookup(&path("app/models/empty.rb"), &exact, any)
            .unwrap();
        assert_eq!(found, DefinitionMatch::file_start(&path("app/models/empty.rb")));

        assert!(
            locator
                .conventional_lookup(&path("app/models/missing.rb"), &exact, any)
                .is_none()
        );
    }

    #[test]
    fn test_tree_scan_respects_skip_and_required_text() {
        let (locator, _) = project(&[
            ("app/a.rb", "class Target\nend\n"),
            ("app/b.rb", "module Admin\n  class Target\n  end\nend\n"),
        ]);
        let pattern = crate::scanner::patterns::declaration_pattern(&["class"], "Target");

        let found = locator.tree_scan("app/**/*.rb", &pattern, &[], None).unwrap();
        assert_eq!(found.file_path, path("app/a.rb"));

        let found = locator
            .tree_scan("app/**/*.rb", &pattern, &[path("app/a.rb")], None)
            .unwrap();
        assert_eq!(found.file_path, path("app/b.rb"));
        assert_eq!(found.line, 1);

        let found = locator
            .tree_scan("app/**/*.rb", &pattern, &[], Some("Admin"))
            .unwrap();
        assert_eq!(found.file_path, path("app/b.rb"));
    }
}
