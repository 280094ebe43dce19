use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::error::ResolverError;
use crate::inflector::{camelize, singularize};
use crate::io::FileSystemTrait;
use crate::locator::CandidateLocator;
use crate::scanner::file_scanner::line_of_offset;
use crate::scanner::patterns;
use crate::symbol::{AssociationKind, AssociationMatch};

/// A relationship declaration found in a model file
#[derive(Debug, Clone, PartialEq, Eq)]
struct Declaration {
    kind: AssociationKind,
    line: u32,
    target: String,
}

/// Find the declaration of `association` in a model's source text
///
/// Kinds are tried in a fixed order and the first kind that matches wins,
/// even when a later kind appears earlier in the file.
fn find_declaration(text: &str, association: &str) -> Result<Option<Declaration>, ResolverError> {
    let name = regex::escape(association);

    for kind in AssociationKind::ALL {
        let regex = patterns::compile(&format!(r"\b{}\s+:{}\b", kind.as_str(), name))?;
        let Some(found) = regex.find(text) else {
            continue;
        };

        let override_regex = patterns::compile(&format!(
            r#"\b{}\s+:{}\b[^\n]*class_name[\s:=>]*["']([^"']+)["']"#,
            kind.as_str(),
            name
        ))?;
        let target = match override_regex.captures(text).and_then(|caps| caps.get(1)) {
            Some(class_name) => {
                debug!("Association '{}' overrides class_name: {}", association, class_name.as_str());
                class_name.as_str().to_string()
            }
            None => camelize(&singularize(association)),
        };

        return Ok(Some(Declaration {
            kind,
            line: line_of_offset(text, found.start()),
            target,
        }));
    }

    Ok(None)
}

/// Follows `belongs_to`/`has_many`-style declarations to the target model
pub struct AssociationResolver<F: FileSystemTrait> {
    locator: Arc<CandidateLocator<F>>,
}

impl<F: FileSystemTrait> AssociationResolver<F> {
    pub fn new(locator: Arc<CandidateLocator<F>>) -> Self {
        Self { locator }
    }

    /// Resolve `association` declared on `model` to the target model definition
    ///
    /// Never fails: a missing model file, declaration or target model, and any
    /// internal error, all come back as `None`.
    pub async fn resolve(&self, model: &str, association: &str) -> Option<AssociationMatch> {
        if model.is_empty() || association.is_empty() {
            warn!("Ignoring association lookup with an empty name");
            return None;
        }

        let locator = Arc::clone(&self.locator);
        let model_name = model.to_string();
        let association_name = association.to_string();

        let result = tokio::task::spawn_blocking(move || {
            resolve_blocking(&locator, &model_name, &association_name)
        })
        .await
        .map_err(ResolverError::from)
        .and_then(|inner| inner);

        match result {
            Ok(found) => found,
            Err(e) => {
                warn!("Association lookup '{}.{}' failed: {}", model, association, e);
                None
            }
        }
    }
}

fn resolve_blocking<F: FileSystemTrait>(
    locator: &CandidateLocator<F>,
    model: &str,
    association: &str,
) -> Result<Option<AssociationMatch>, ResolverError> {
    let Some(model_file) = locator.locate_model_file(model) else {
        info!("Could not find model file for '{}'", model);
        return Ok(None);
    };

    let text = read_model(locator, &model_file)?;
    let Some(declaration) = find_declaration(&text, association)? else {
        info!("No association '{}' found in model '{}'", association, model);
        return Ok(None);
    };
    debug!(
        "Found {} :{} at line {} of {}",
        declaration.kind,
        association,
        declaration.line + 1,
        model_file.display()
    );

    let Some(target) = locator.find_model(&declaration.target) else {
        info!("Target model '{}' not found", declaration.target);
        return Ok(None);
    };

    Ok(Some(AssociationMatch {
        definition: target,
        association_type: declaration.kind,
    }))
}

fn read_model<F: FileSystemTrait>(
    locator: &CandidateLocator<F>,
    model_file: &Path,
) -> Result<String, ResolverError> {
    locator
        .scanner()
        .filesystem()
        .read_to_string(model_file)
        .map_err(|source| ResolverError::io(model_file, source))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::TestFileSystem;
    use crate::locator::testing::{path, project};

    #[cfg(feature = "test-logging")]
    #[ctor::ctor]
    fn init_test_logging() {
        crate::test_utils::logging::init();
    }

    const POST: &str = "class Post < ApplicationRecord\n  belongs_to :user\n  belongs_to :author, class_name: \"Organization\"\n  has_many :line_items, dependent: :destroy\n  has_and_belongs_to_many :tags\nend\n";
    const USER: &str = "class User < ApplicationRecord\n  has_many :posts\n  has_one :profile\nend\n";

    fn resolver() -> AssociationResolver<TestFileSystem> {
        let (locator, _) = project(&[
            ("app/models/post.rb", POST),
            ("app/models/user.rb", USER),
            ("app/models/organization.rb", "class Organization < ApplicationRecord\nend\n"),
            ("app/models/line_item.rb", "# items\nclass LineItem < ApplicationRecord\nend\n"),
            ("app/models/tag.rb", "class Tag < ApplicationRecord\nend\n"),
        ]);
        AssociationResolver::new(Arc::new(locator))
    }

    #[test]
    fn test_declaration_parsing() {
        let found = find_declaration(POST, "user").unwrap().unwrap();
        assert_eq!(found.kind, AssociationKind::BelongsTo);
        assert_eq!(found.line, 1);
        assert_eq!(found.target, "User");

        let found = find_declaration(POST, "author").unwrap().unwrap();
        assert_eq!(found.target, "Organization");

        let found = find_declaration(POST, "line_items").unwrap().unwrap();
        assert_eq!(found.kind, AssociationKind::HasMany);
        assert_eq!(found.target, "LineItem");

        assert!(find_declaration(POST, "use").unwrap().is_none());
    }

    #[test]
    fn test_kind_order_beats_file_order() {
        let text = "class Team\n  has_many :members\n  belongs_to :members\nend\n";
        let found = find_declaration(text, "members").unwrap().unwrap();
        assert_eq!(found.kind, AssociationKind::BelongsTo);
        assert_eq!(found.line, 2);
    }

    #[test]
    fn test_override_applies_only_to_its_own_declaration() {
        let text = "class Post\n  belongs_to :user\n  belongs_to :editor, class_name: 'Admin'\nend\n";
        let found = find_declaration(text, "user").unwrap().unwrap();
        assert_eq!(found.target, "User");
    }

    #[tokio::test]
    async fn test_belongs_to_resolves_to_target_model() {
        let found = resolver().resolve("Post", "user").await.unwrap();
        assert_eq!(found.association_type, AssociationKind::BelongsTo);
        assert_eq!(found.definition.file_path, path("app/models/user.rb"));
        assert_eq!(found.definition.line, 0);
    }

    #[tokio::test]
    async fn test_has_many_and_habtm() {
        let resolver = resolver();

        let found = resolver.resolve("User", "posts").await.unwrap();
        assert_eq!(found.association_type, AssociationKind::HasMany);
        assert_eq!(found.definition.file_path, path("app/models/post.rb"));

        let found = resolver.resolve("Post", "line_items").await.unwrap();
        assert_eq!(found.definition.file_path, path("app/models/line_item.rb"));
        assert_eq!(found.definition.line, 1);

        let found = resolver.resolve("posts", "tags").await.unwrap();
        assert_eq!(found.association_type, AssociationKind::HasAndBelongsToMany);
        assert_eq!(found.definition.file_path, path("app/models/tag.rb"));
    }

    #[tokio::test]
    async fn test_class_name_override() {
        let found = resolver().resolve("Post", "author").await.unwrap();
        assert_eq!(found.association_type, AssociationKind::BelongsTo);
        assert_eq!(found.definition.file_path, path("app/models/organization.rb"));
    }

    #[tokio::test]
    async fn test_not_found_cases() {
        let resolver = resolver();

        assert!(resolver.resolve("Comment", "post").await.is_none());
        assert!(resolver.resolve("User", "comments").await.is_none());
        // has_one :profile is declared but there is no Profile model
        assert!(resolver.resolve("User", "profile").await.is_none());
        assert!(resolver.resolve("User", "").await.is_none());
    }
}
