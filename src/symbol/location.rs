use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

/// A definition site found by the scanner or a candidate locator
///
/// `line` is zero-based. `scope` is the closest preceding `class`/`module`
/// declaration by text offset and is only filled in for member matches
/// (methods, attributes, scopes).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DefinitionMatch {
    pub file_path: PathBuf,
    pub line: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
}

impl DefinitionMatch {
    pub fn new(file_path: impl Into<PathBuf>, line: u32, scope: Option<String>) -> Self {
        Self {
            file_path: file_path.into(),
            line,
            scope,
        }
    }

    /// Match at the first line of a file that exists but declares nothing usable
    pub fn file_start(file_path: &Path) -> Self {
        Self::new(file_path, 0, None)
    }

    /// Compact 1-based form: `/path/file.rb:12`
    pub fn to_compact(&self) -> String {
        format!("{}:{}", self.file_path.display(), self.line + 1)
    }
}

impl fmt::Display for DefinitionMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.scope {
            Some(scope) => write!(f, "{} ({})", self.to_compact(), scope),
            None => f.write_str(&self.to_compact()),
        }
    }
}

/// Relationship declarations understood by the association resolver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AssociationKind {
    BelongsTo,
    HasMany,
    HasOne,
    HasAndBelongsToMany,
}

impl AssociationKind {
    /// Search order used when a name is declared by more than one kind
    pub const ALL: [AssociationKind; 4] = [
        AssociationKind::BelongsTo,
        AssociationKind::HasMany,
        AssociationKind::HasOne,
        AssociationKind::HasAndBelongsToMany,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AssociationKind::BelongsTo => "belongs_to",
            AssociationKind::HasMany => "has_many",
            AssociationKind::HasOne => "has_one",
            AssociationKind::HasAndBelongsToMany => "has_and_belongs_to_many",
        }
    }
}

impl fmt::Display for AssociationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Target model of an association, tagged with the declaring relation kind
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssociationMatch {
    #[serde(flatten)]
    pub definition: DefinitionMatch,
    pub association_type: AssociationKind,
}

/// One textual occurrence of an identifier (zero-based line and column)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReferenceMatch {
    pub file_path: PathBuf,
    pub line: u32,
    pub column: u32,
}

impl ReferenceMatch {
    /// Compact 1-based form: `/path/file.rb:12:5`
    pub fn to_compact(&self) -> String {
        format!(
            "{}:{}:{}",
            self.file_path.display(),
            self.line + 1,
            self.column + 1
        )
    }
}
