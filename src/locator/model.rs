use std::path::PathBuf;

use tracing::debug;

use super::CandidateLocator;
use crate::inflector::{camel_to_snake, pluralize, singularize};
use crate::io::FileSystemTrait;
use crate::scanner::patterns::{self, ANY_CLASS};
use crate::symbol::DefinitionMatch;

const MODELS_DIR: &str = "app/models";

impl<F: FileSystemTrait> CandidateLocator<F> {
    /// Conventional model files for `name`, most likely first
    ///
    /// Variants are the name itself, its lowercase form, its singular and its
    /// plural, each mapped to a snake_case file under `app/models`.
    pub fn model_file_candidates(&self, name: &str) -> Vec<PathBuf> {
        let variants = [
            name.to_string(),
            name.to_lowercase(),
            singularize(name),
            pluralize(name),
        ];

        let mut candidates: Vec<PathBuf> = Vec::with_capacity(variants.len());
        for variant in variants {
            let path = self
                .root
                .join(MODELS_DIR)
                .join(format!("{}.rb", camel_to_snake(&variant)));
            if !candidates.contains(&path) {
                candidates.push(path);
            }
        }
        candidates
    }

    /// First existing conventional model file for `name`
    pub fn locate_model_file(&self, name: &str) -> Option<PathBuf> {
        self.model_file_candidates(name).into_iter().find(|path| {
            debug!("Checking model path: {}", path.display());
            self.scanner.filesystem().exists(path)
        })
    }

    /// Find a model class
    pub fn find_model(&self, name: &str) -> Option<DefinitionMatch> {
        debug!("Searching for model '{}'", name);

        let exact = vec![patterns::declaration_pattern(&["class"], name)];
        let candidates = self.model_file_candidates(name);

        for path in &candidates {
            if let Some(found) = self.conventional_lookup(path, &exact, ANY_CLASS) {
                debug!("Found model '{}' in {}", name, path.display());
                return Some(found);
            }
        }

        debug!("Model not found in conventional location, searching all Ruby files");
        self.tree_scan("app/**/*.rb", &exact[0], &candidates, None)
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::{path, project};

    #[test]
    fn test_model_candidates_cover_inflections() {
        let (locator, _) = project(&[]);

        assert_eq!(
            locator.model_file_candidates("BlogPost"),
            vec![
                path("app/models/blog_post.rb"),
                path("app/models/blogpost.rb"),
                path("app/models/blog_posts.rb"),
            ]
        );
        assert_eq!(
            locator.model_file_candidates("people"),
            vec![
                path("app/models/people.rb"),
                path("app/models/person.rb"),
                path("app/models/peoples.rb"),
            ]
        );
    }

    #[test]
    fn test_model_by_exact_singular_and_plural_names() {
        let (locator, _) = project(&[(
            "app/models/user.rb",
            "class User < ApplicationRecord\n  has_many :posts\nend\n",
        )]);

        for name in ["User", "user", "Users"] {
            let found = locator.find_model(name).unwrap();
            assert_eq!(found.file_path, path("app/models/user.rb"), "lookup of {name}");
            assert_eq!(found.line, 0);
        }
    }

    #[test]
    fn test_model_file_without_class_points_at_first_line() {
        let (locator, _) = project(&[("app/models/setting.rb", "# TBD\n")]);

        let found = locator.find_model("Setting").unwrap();
        assert_eq!(found.file_path, path("app/models/setting.rb"));
        assert_eq!(found.line, 0);
    }

    #[test]
    fn test_unreadable_conventional_file_falls_through_to_tree_scan() {
        // A directory where the model file should be: it exists but cannot be read
        let (locator, fs) = project(&[
            ("app/models/user.rb/stray", "x"),
            ("app/models/legacy/account.rb", "class User < ApplicationRecord\nend\n"),
        ]);

        let found = locator.find_model("User").unwrap();
        assert_eq!(found.file_path, path("app/models/legacy/account.rb"));
        assert_eq!(found.line, 0);
        assert!(fs.read_count() >= 2);
    }

    #[test]
    fn test_model_outside_models_directory() {
        let (locator, _) = project(&[(
            "app/domain/ledger.rb",
            "module Accounting\n  class Ledger < ApplicationRecord\n  end\nend\n",
        )]);

        let found = locator.find_model("Ledger").unwrap();
        assert_eq!(found.file_path, path("app/domain/ledger.rb"));
        assert_eq!(found.line, 1);

        assert!(locator.find_model("Missing").is_none());
        assert_eq!(locator.locate_model_file("Ledger"), None);
    }
}
