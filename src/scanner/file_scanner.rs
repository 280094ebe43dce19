//! Definition scanning over raw file text
//!
//! [`DefinitionScanner`] is the seam between "find a definition in this
//! text" and everything that decides which files to look at. The shipped
//! implementation is regex based; a real parser can replace it without the
//! locators noticing.

use std::path::Path;
use std::sync::Arc;

use regex::Regex;
use tracing::{debug, trace, warn};

use super::patterns::{self, DefinitionKind, ENCLOSING_DECLARATION};
use crate::error::ResolverError;
use crate::io::FileSystemTrait;
use crate::symbol::DefinitionMatch;

/// Finds the first definition of a term inside already-loaded text
pub trait DefinitionScanner: Send + Sync {
    fn scan_text(
        &self,
        file_path: &Path,
        text: &str,
        term: &str,
        kind: DefinitionKind,
    ) -> Result<Option<DefinitionMatch>, ResolverError>;
}

/// Regex-backed scanner
pub struct RegexScanner {
    enclosing_regex: Regex,
}

impl RegexScanner {
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            // class Product < ApplicationRecord / module Admin::Reports
            enclosing_regex: Regex::new(ENCLOSING_DECLARATION)?,
        })
    }

    /// Closest `class`/`module` declaration before `offset`
    fn enclosing_scope(&self, text: &str, offset: usize) -> Option<String> {
        let preceding = &text[..offset];
        let mut declarations: Vec<(usize, &str)> = self
            .enclosing_regex
            .captures_iter(preceding)
            .filter_map(|caps| {
                let whole = caps.get(0)?;
                let name = caps.get(1)?;
                Some((whole.start(), name.as_str()))
            })
            .collect();

        declarations.sort_by(|a, b| b.0.cmp(&a.0));
        declarations.first().map(|(_, name)| name.to_string())
    }
}

impl Default for RegexScanner {
    fn default() -> Self {
        Self::new().expect("Failed to compile regex patterns")
    }
}

/// Zero-based line of a byte offset
pub fn line_of_offset(text: &str, offset: usize) -> u32 {
    text.as_bytes()[..offset]
        .iter()
        .filter(|b| **b == b'\n')
        .count() as u32
}

impl DefinitionScanner for RegexScanner {
    fn scan_text(
        &self,
        file_path: &Path,
        text: &str,
        term: &str,
        kind: DefinitionKind,
    ) -> Result<Option<DefinitionMatch>, ResolverError> {
        let pattern = patterns::build_pattern(term, kind);
        let regex = patterns::compile(&pattern)?;
        trace!(
            "Scanning {} for {:?} '{}' with /{}/",
            file_path.display(),
            kind,
            term,
            pattern
        );

        let Some(found) = regex.find(text) else {
            return Ok(None);
        };

        let line = line_of_offset(text, found.start());
        let scope = if kind.is_member() {
            self.enclosing_scope(text, found.start())
        } else {
            None
        };

        if let Some(scope) = &scope {
            debug!("Found '{}' in scope {}", term, scope);
        }

        Ok(Some(DefinitionMatch::new(file_path, line, scope)))
    }
}

// ============================================================================
// File Scanner
// ============================================================================

/// Reads files through the filesystem capability and scans them
///
/// Every failure is logged and reported as "no match" so that one unreadable
/// candidate never aborts a wider search.
#[derive(Clone)]
pub struct FileScanner<F: FileSystemTrait> {
    filesystem: F,
    scanner: Arc<dyn DefinitionScanner>,
}

impl<F: FileSystemTrait> FileScanner<F> {
    pub fn new(filesystem: F) -> Self {
        Self::with_scanner(filesystem, Arc::new(RegexScanner::default()))
    }

    pub fn with_scanner(filesystem: F, scanner: Arc<dyn DefinitionScanner>) -> Self {
        Self {
            filesystem,
            scanner,
        }
    }

    pub fn filesystem(&self) -> &F {
        &self.filesystem
    }

    /// Read a file, or `None` if it is missing or unreadable
    pub fn read(&self, file_path: &Path) -> Option<String> {
        if !self.filesystem.exists(file_path) {
            return None;
        }
        match self.filesystem.read_to_string(file_path) {
            Ok(text) => Some(text),
            Err(e) => {
                warn!("Error reading {}: {}", file_path.display(), e);
                None
            }
        }
    }

    /// Scan already-loaded text, logging and swallowing errors
    pub fn scan_text(
        &self,
        file_path: &Path,
        text: &str,
        term: &str,
        kind: DefinitionKind,
    ) -> Option<DefinitionMatch> {
        match self.scanner.scan_text(file_path, text, term, kind) {
            Ok(found) => found,
            Err(e) => {
                warn!("Error searching in file {}: {}", file_path.display(), e);
                None
            }
        }
    }

    /// First definition of `term` in `file_path`
    pub fn scan_file(
        &self,
        file_path: &Path,
        term: &str,
        kind: DefinitionKind,
    ) -> Option<DefinitionMatch> {
        let text = self.read(file_path)?;
        self.scan_text(file_path, &text, term, kind)
    }

    /// Try several kinds against one read of the file, in order
    pub fn scan_file_kinds(
        &self,
        file_path: &Path,
        term: &str,
        kinds: &[DefinitionKind],
    ) -> Option<DefinitionMatch> {
        let text = self.read(file_path)?;
        kinds
            .iter()
            .find_map(|kind| self.scan_text(file_path, &text, term, *kind))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::TestFileSystem;
    use std::path::PathBuf;

    // Auto-initialize logging for all tests in this module
    #[cfg(feature = "test-logging")]
    #[ctor::ctor]
    fn init_test_logging() {
        crate::test_utils::logging::init();
    }

    const PRODUCT: &str = r##"class Product < ApplicationRecord
  has_many :orders

  # Regular scopes
  scope :active, -> { where(active: true) }

  # Scope with whitespace after colon
  scope : premium, -> { where(price: 100..Float::INFINITY) }

  # Scope with special character
  scope :discontinued?, -> { where(discontinued: true) }

  def full_name
    "#{name} - #{sku}"
  end

  def self.find_by_email(email)
    where(email: email).first
  end
end
"##;

    fn product_scanner() -> (FileScanner<TestFileSystem>, PathBuf) {
        let fs = TestFileSystem::new();
        let path = PathBuf::from("/project/app/models/product.rb");
        fs.add_file(&path, PRODUCT);
        (FileScanner::new(fs), path)
    }

    #[test]
    fn test_method_match_has_line_and_scope() {
        let (scanner, path) = product_scanner();

        let found = scanner
            .scan_file(&path, "full_name", DefinitionKind::Method)
            .unwrap();
        assert_eq!(found.file_path, path);
        assert_eq!(found.line, 12);
        assert_eq!(found.scope.as_deref(), Some("Product"));
    }

    #[test]
    fn test_class_method_match() {
        let (scanner, path) = product_scanner();

        let found = scanner
            .scan_file(&path, "find_by_email", DefinitionKind::ClassMethod)
            .unwrap();
        assert_eq!(found.line, 16);
        assert_eq!(found.scope.as_deref(), Some("Product"));
    }

    #[test]
    fn test_scope_matches() {
        let (scanner, path) = product_scanner();

        let active = scanner.scan_file(&path, "active", DefinitionKind::Scope).unwrap();
        assert_eq!(active.line, 4);
        assert_eq!(active.scope.as_deref(), Some("Product"));

        let premium = scanner.scan_file(&path, "premium", DefinitionKind::Scope).unwrap();
        assert_eq!(premium.line, 7);

        let discontinued = scanner
            .scan_file(&path, "discontinued?", DefinitionKind::Scope)
            .unwrap();
        assert_eq!(discontinued.line, 10);
        assert_eq!(discontinued.scope.as_deref(), Some("Product"));
    }

    #[test]
    fn test_class_match_has_no_scope() {
        let (scanner, path) = product_scanner();

        let found = scanner.scan_file(&path, "Product", DefinitionKind::Class).unwrap();
        assert_eq!(found.line, 0);
        assert_eq!(found.scope, None);
    }

    #[test]
    fn test_scope_is_closest_preceding_declaration() {
        let fs = TestFileSystem::new();
        let path = PathBuf::from("/project/lib/billing.rb");
        fs.add_file(
            &path,
            "module Billing\n  class Invoice\n    def total\n    end\n  end\n\n  def helper\n  end\nend\n",
        );
        let scanner = FileScanner::new(fs);

        let total = scanner.scan_file(&path, "total", DefinitionKind::Method).unwrap();
        assert_eq!(total.scope.as_deref(), Some("Invoice"));

        // Textual proximity, not real nesting
        let helper = scanner.scan_file(&path, "helper", DefinitionKind::Method).unwrap();
        assert_eq!(helper.scope.as_deref(), Some("Invoice"));
    }

    #[test]
    fn test_member_without_enclosing_declaration() {
        let fs = TestFileSystem::new();
        let path = PathBuf::from("/project/script.rb");
        fs.add_file(&path, "def run\nend\n");
        let scanner = FileScanner::new(fs);

        let found = scanner.scan_file(&path, "run", DefinitionKind::Method).unwrap();
        assert_eq!(found.line, 0);
        assert_eq!(found.scope, None);
    }

    #[test]
    fn test_missing_file_and_bad_pattern_are_not_found() {
        let (scanner, path) = product_scanner();

        assert!(
            scanner
                .scan_file(Path::new("/nope.rb"), "x", DefinitionKind::Method)
                .is_none()
        );
        assert!(scanner.scan_file(&path, "(", DefinitionKind::Custom).is_none());
        assert!(scanner.scan_file(&path, "missing", DefinitionKind::Method).is_none());
    }

    #[test]
    fn test_scan_file_kinds_reads_once_and_respects_order() {
        let (scanner, path) = product_scanner();

        let found = scanner
            .scan_file_kinds(&path, "find_by_email", &DefinitionKind::MEMBER_FORMS)
            .unwrap();
        assert_eq!(found.line, 16);
        assert_eq!(scanner.filesystem().read_count(), 1);
    }

    #[test]
    fn test_line_of_offset() {
        let text = "a\nb\nc";
        assert_eq!(line_of_offset(text, 0), 0);
        assert_eq!(line_of_offset(text, 2), 1);
        assert_eq!(line_of_offset(text, 4), 2);
    }
}
