//! Recognition patterns for Ruby definitions
//!
//! Each [`DefinitionKind`] maps to one regex template. Templates are filled
//! with an escaped name and compiled case-insensitively. Names ending in `?`
//! or `!` never get a trailing `\b`: there is no word boundary between a
//! punctuation character and a following space or end of input, so the
//! assertion would reject every real declaration. The leading anchor
//! (`def\s+`, `scope\s+:` and so on) is always kept.

use regex::{Regex, RegexBuilder};

use crate::error::ResolverError;

/// Any class declaration, capturing the (possibly namespaced) name
pub const ANY_CLASS: &str = r"\bclass\s+([A-Z][\w:]*)\b";

/// Any module declaration, capturing the (possibly namespaced) name
pub const ANY_MODULE: &str = r"\bmodule\s+([A-Z][\w:]*)\b";

/// Any class or module declaration
pub const ANY_CLASS_OR_MODULE: &str = r"\b(?:class|module)\s+([A-Z][\w:]*)\b";

/// Scope-extraction pattern; case-sensitive so `class << self` and
/// lowercase identifiers never count as an enclosing declaration
pub const ENCLOSING_DECLARATION: &str = r"\b(?:class|module)\s+([A-Z][\w:]*)";

/// The kind of definition a search is looking for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DefinitionKind {
    /// `class Name`
    Class,
    /// `module Name`
    Module,
    /// `def name`
    Method,
    /// `def self.name`
    ClassMethod,
    /// `attr_accessor :name` (and reader/writer)
    Attr,
    /// `scope :name, -> { ... }`
    Scope,
    /// The search term already is a regex fragment
    Custom,
}

impl DefinitionKind {
    /// Kinds whose matches carry the enclosing class/module as scope
    pub fn is_member(&self) -> bool {
        matches!(
            self,
            DefinitionKind::Method
                | DefinitionKind::ClassMethod
                | DefinitionKind::Attr
                | DefinitionKind::Scope
        )
    }

    /// Member forms tried, in order, for every candidate file of a method search
    pub const MEMBER_FORMS: [DefinitionKind; 4] = [
        DefinitionKind::Method,
        DefinitionKind::ClassMethod,
        DefinitionKind::Attr,
        DefinitionKind::Scope,
    ];
}

/// `\b` unless the name ends in a character a word boundary cannot follow
pub fn trailing_boundary(name: &str) -> &'static str {
    if name.ends_with('?') || name.ends_with('!') {
        ""
    } else {
        r"\b"
    }
}

/// Build the regex source for a search term of the given kind
///
/// Literal names are escaped; [`DefinitionKind::Custom`] terms are used as-is.
pub fn build_pattern(term: &str, kind: DefinitionKind) -> String {
    let name = regex::escape(term);
    let end = trailing_boundary(term);

    match kind {
        DefinitionKind::Class => format!(r"\bclass\s+{name}{end}"),
        DefinitionKind::Module => format!(r"\bmodule\s+{name}{end}"),
        DefinitionKind::Method => format!(r"\bdef\s+{name}{end}"),
        DefinitionKind::ClassMethod => format!(r"\bdef\s+self\s*\.\s*{name}{end}"),
        DefinitionKind::Attr => {
            format!(r"\battr_(?:accessor|reader|writer)\s+(?::[\w?!]+\s*,\s*)*:{name}{end}")
        }
        DefinitionKind::Scope => format!(r"\bscope\s+:\s*{name}{end}"),
        DefinitionKind::Custom => term.to_string(),
    }
}

/// Exact `class Name` / `module Name` declaration for any of `keywords`
pub fn declaration_pattern(keywords: &[&str], name: &str) -> String {
    format!(
        r"\b(?:{})\s+{}{}",
        keywords.join("|"),
        regex::escape(name),
        trailing_boundary(name)
    )
}

/// Compile a pattern case-insensitively
pub fn compile(pattern: &str) -> Result<Regex, ResolverError> {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .map_err(|source| ResolverError::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })
}
