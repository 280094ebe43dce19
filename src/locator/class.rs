use tracing::debug;

use super::{CandidateLocator, bare_name};
use crate::inflector::camel_to_snake;
use crate::io::FileSystemTrait;
use crate::scanner::DefinitionKind;
use crate::scanner::patterns;
use crate::symbol::DefinitionMatch;

/// Directories scanned for plain class and module declarations
const CLASS_SEARCH_GLOB: &str = "{app,lib,config,test}/**/*.rb";

/// Roots tried for a nested `Namespace::Name` file
const NESTED_CLASS_ROOTS: [&str; 2] = ["app/models", "lib"];

impl<F: FileSystemTrait> CandidateLocator<F> {
    /// Find a class or module declaration anywhere in the usual source roots
    pub fn find_class(&self, name: &str) -> Option<DefinitionMatch> {
        debug!("Searching for class '{}' in project", name);

        let files = self.find_files(CLASS_SEARCH_GLOB);

        for file in &files {
            let Some(text) = self.scanner.read(file) else {
                continue;
            };

            let found = self
                .scanner
                .scan_text(file, &text, name, DefinitionKind::Class)
                .or_else(|| self.scanner.scan_text(file, &text, name, DefinitionKind::Module));
            if found.is_some() {
                debug!("Found class or module '{}' in {}", name, file.display());
                return found;
            }
        }

        let (namespace, _) = name.rsplit_once("::")?;
        let bare = bare_name(name);
        let bare_pattern = patterns::declaration_pattern(&["class", "module"], bare);

        for root in NESTED_CLASS_ROOTS {
            let nested = self.root.join(root).join(format!("{}.rb", camel_to_snake(name)));
            if let Some(found) = self.scanner.scan_file(&nested, &bare_pattern, DefinitionKind::Custom) {
                debug!("Found namespaced class '{}' in {}", name, nested.display());
                return Some(found);
            }
        }

        let class_only = patterns::declaration_pattern(&["class"], bare);
        self.tree_scan(CLASS_SEARCH_GLOB, &class_only, &[], Some(namespace))
    }
}
