//! Controllers, helpers, mailers and jobs
//!
//! These four kinds share one shape: a class-name suffix, a directory, a
//! file-name suffix and a catch-all `application_*` base file.

use std::path::{Path, PathBuf};

use tracing::debug;

use super::{CandidateLocator, bare_name};
use crate::inflector::camel_to_snake;
use crate::io::FileSystemTrait;
use crate::scanner::DefinitionKind;
use crate::scanner::patterns::{self, ANY_CLASS, ANY_MODULE};
use crate::symbol::DefinitionMatch;

/// Suffix-named Rails component kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentKind {
    Controller,
    Helper,
    Mailer,
    Job,
}

impl ComponentKind {
    pub const ALL: [ComponentKind; 4] = [
        ComponentKind::Controller,
        ComponentKind::Helper,
        ComponentKind::Mailer,
        ComponentKind::Job,
    ];

    /// Class-name suffix, e.g. `Controller`
    pub fn suffix(&self) -> &'static str {
        match self {
            ComponentKind::Controller => "Controller",
            ComponentKind::Helper => "Helper",
            ComponentKind::Mailer => "Mailer",
            ComponentKind::Job => "Job",
        }
    }

    /// Root-relative directory holding this kind
    pub fn directory(&self) -> &'static str {
        match self {
            ComponentKind::Controller => "app/controllers",
            ComponentKind::Helper => "app/helpers",
            ComponentKind::Mailer => "app/mailers",
            ComponentKind::Job => "app/jobs",
        }
    }

    /// Catch-all base file inside [`Self::directory`]
    pub fn base_file(&self) -> &'static str {
        match self {
            ComponentKind::Controller => "application_controller.rb",
            ComponentKind::Helper => "application_helper.rb",
            ComponentKind::Mailer => "application_mailer.rb",
            ComponentKind::Job => "application_job.rb",
        }
    }

    /// Declaration keyword: helpers are modules, everything else a class
    pub fn keyword(&self) -> &'static str {
        match self {
            ComponentKind::Helper => "module",
            _ => "class",
        }
    }

    fn any_declaration(&self) -> &'static str {
        match self {
            ComponentKind::Helper => ANY_MODULE,
            _ => ANY_CLASS,
        }
    }

    /// Ensure `name` carries this kind's suffix
    pub fn qualified_name(&self, name: &str) -> String {
        if name.ends_with(self.suffix()) {
            name.to_string()
        } else {
            format!("{name}{}", self.suffix())
        }
    }

    /// Root-relative conventional file, e.g. `app/controllers/admin/users_controller.rb`
    pub fn conventional_file(&self, name: &str) -> String {
        let qualified = self.qualified_name(name);
        let stem = qualified.strip_suffix(self.suffix()).unwrap_or(&qualified);
        format!(
            "{}/{}_{}.rb",
            self.directory(),
            camel_to_snake(stem),
            self.suffix().to_ascii_lowercase()
        )
    }

    /// Should a search for `name` try this kind at all?
    ///
    /// Yes if the name carries the suffix, or does not mention it anywhere.
    pub fn applies_to(&self, name: &str) -> bool {
        name.ends_with(self.suffix()) || !name.contains(self.suffix())
    }
}

impl<F: FileSystemTrait> CandidateLocator<F> {
    /// Find a controller, helper, mailer or job definition
    pub fn find_component(&self, kind: ComponentKind, name: &str) -> Option<DefinitionMatch> {
        debug!("Searching for {:?} '{}'", kind, name);

        let qualified = kind.qualified_name(name);
        let bare = bare_name(&qualified);
        let keyword = [kind.keyword()];

        let mut exact = vec![patterns::declaration_pattern(&keyword, &qualified)];
        if bare != qualified {
            exact.push(patterns::declaration_pattern(&keyword, bare));
        }

        let conventional = self.root.join(kind.conventional_file(name));
        if let Some(found) = self.conventional_lookup(&conventional, &exact, kind.any_declaration()) {
            return Some(found);
        }

        let base_file = self.root.join(kind.directory()).join(kind.base_file());
        if let Some(found) = self.search_base_file(kind, &base_file, &qualified) {
            return Some(found);
        }

        let skip: Vec<PathBuf> = vec![conventional, base_file];
        if kind == ComponentKind::Controller
            && let Some((namespace, _)) = qualified.rsplit_once("::")
        {
            let bare_pattern = patterns::declaration_pattern(&keyword, bare);
            if let Some(found) = self.tree_scan("app/**/*.rb", &bare_pattern, &skip, Some(namespace)) {
                debug!("Found namespaced controller '{}'", qualified);
                return Some(found);
            }
        }

        self.tree_scan("app/**/*.rb", &exact[0], &skip, None)
    }

    /// Look for the declaration, or a same-named method, in the catch-all file
    fn search_base_file(
        &self,
        kind: ComponentKind,
        base_file: &Path,
        qualified: &str,
    ) -> Option<DefinitionMatch> {
        let text = self.scanner.read(base_file)?;

        let declaration = patterns::declaration_pattern(&[kind.keyword()], qualified);
        if let Some(found) = self
            .scanner
            .scan_text(base_file, &text, &declaration, DefinitionKind::Custom)
        {
            debug!("Found '{}' in {}", qualified, kind.base_file());
            return Some(found);
        }

        let stem = bare_name(qualified);
        let stem = stem.strip_suffix(kind.suffix()).unwrap_or(stem);
        if stem.is_empty() {
            return None;
        }
        let method = camel_to_snake(stem);
        let found = self
            .scanner
            .scan_text(base_file, &text, &method, DefinitionKind::Method);
        if found.is_some() {
            debug!("Found method '{}' in {}", method, kind.base_file());
        }
        found
    }
}
