//! Editor-style commands over the resolution engine
//!
//! Each command takes the identifier under the caller's cursor plus the file
//! it came from, runs one engine operation and produces at most one
//! navigation or list side effect on the [`HostUi`]. Every "nothing to do"
//! outcome becomes an informational message instead.

mod cursor;
mod host;

pub use cursor::word_at;
pub use host::{HostUi, OutputFormat, TerminalHost};

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info};

use crate::engine::Engine;
use crate::io::FileSystemTrait;

/// The caller's editor state: the active file and the identifier at the cursor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorContext {
    pub file: PathBuf,
    pub word: Option<String>,
}

impl EditorContext {
    pub fn new(file: impl Into<PathBuf>, word: Option<String>) -> Self {
        Self {
            file: file.into(),
            word: word.filter(|w| !w.is_empty()),
        }
    }

    /// Context for a cursor position inside `text`, the content of `file`
    pub fn from_cursor(file: impl Into<PathBuf>, text: &str, line: usize, column: usize) -> Self {
        Self::new(file, word_at(text, line, column))
    }
}

/// Association navigation only makes sense from a model file
///
/// Anything under `/app/models/` qualifies, as does any other `.rb` file whose
/// name does not look like a controller, helper or job.
pub fn is_model_file(path: &Path) -> bool {
    let full = path.to_string_lossy().replace('\\', "/");
    if full.contains("/app/models/") {
        return true;
    }

    let Some(file_name) = path.file_name().map(|name| name.to_string_lossy()) else {
        return false;
    };
    file_name.ends_with(".rb")
        && !file_name.contains("_controller")
        && !file_name.contains("_helper")
        && !file_name.contains("_job")
}

/// How a resolved definition is shown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefinitionView {
    Navigate,
    Peek,
}

/// Runs editor commands against one engine and one host
pub struct Commands<F: FileSystemTrait, H: HostUi> {
    engine: Arc<Engine<F>>,
    host: H,
}

impl<F: FileSystemTrait, H: HostUi> Commands<F, H> {
    pub fn new(engine: Arc<Engine<F>>, host: H) -> Self {
        Self { engine, host }
    }

    #[cfg(test)]
    pub fn host(&self) -> &H {
        &self.host
    }

    /// Validate the editor context, reporting problems to the host
    async fn word<'a>(&self, context: Option<&'a EditorContext>) -> Option<(&'a Path, &'a str)> {
        let Some(context) = context else {
            self.host.info("No active editor").await;
            return None;
        };
        let Some(word) = context.word.as_deref() else {
            self.host.info("No word at cursor position").await;
            return None;
        };
        Some((context.file.as_path(), word))
    }

    /// Go to (or peek at) the definition of the word under the cursor
    pub async fn definition(&self, context: Option<&EditorContext>, view: DefinitionView) {
        let Some((file, word)) = self.word(context).await else {
            return;
        };
        info!("Searching for definition of: {}", word);

        let current = self.engine.absolute(file);
        let Some(definition) = self.engine.resolve_definition(word, Some(&current)).await else {
            self.host
                .info(&format!("Could not find definition for \"{word}\""))
                .await;
            return;
        };
        debug!("Definition found: {}", definition);

        if let Some(scope) = &definition.scope {
            self.host
                .status(&format!("Found '{word}' in {scope}"))
                .await;
        }

        let shown = match view {
            DefinitionView::Navigate => self.host.navigate(&definition).await,
            DefinitionView::Peek => self.host.peek(&definition).await,
        };
        if let Err(e) = shown {
            self.host
                .error(&format!("Error opening definition: {e}"))
                .await;
        }
    }

    /// List references to the word under the cursor, project-wide or in-file
    pub async fn references(&self, context: Option<&EditorContext>, current_file_only: bool) {
        if current_file_only
            && let Some(context) = context
            && context.file.extension().is_none_or(|ext| ext != "rb")
        {
            self.host.info("Not a Ruby file").await;
            return;
        }

        let Some((file, word)) = self.word(context).await else {
            return;
        };
        info!("Finding references to '{}'", word);

        let current = self.engine.absolute(file);
        let references = self
            .engine
            .find_references(word, Some(&current), current_file_only)
            .await;

        if references.is_empty() {
            let message = if current_file_only {
                format!("No references found for \"{word}\" in current file")
            } else {
                format!("No references found for \"{word}\"")
            };
            self.host.info(&message).await;
            return;
        }

        if let Err(e) = self.host.show_references(word, &references).await {
            self.host
                .error(&format!("Error finding references: {e}"))
                .await;
        }
    }

    /// Follow the association named under the cursor to its target model
    pub async fn association(&self, context: Option<&EditorContext>) {
        let Some((file, word)) = self.word(context).await else {
            return;
        };

        if !is_model_file(file) {
            self.host
                .info("Association navigation only works in model files")
                .await;
            return;
        }

        let Some(model) = file
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .filter(|stem| !stem.is_empty())
        else {
            self.host.info("Could not determine model name").await;
            return;
        };
        info!("Searching for association '{}' of model '{}'", word, model);

        let Some(association) = self.engine.resolve_association(&model, word).await else {
            self.host
                .info(&format!("No association found for \"{word}\""))
                .await;
            return;
        };

        match self.host.navigate(&association.definition).await {
            Ok(()) => {
                self.host
                    .info(&format!(
                        "Navigated to {} association: {word}",
                        association.association_type
                    ))
                    .await
            }
            Err(e) => {
                self.host
                    .error(&format!("Error opening associated model: {e}"))
                    .await
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::host::HostError;
    use super::*;
    use crate::config::EngineConfig;
    use crate::io::TestFileSystem;
    use crate::symbol::{DefinitionMatch, ReferenceMatch};
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[cfg(feature = "test-logging")]
    #[ctor::ctor]
    fn init_test_logging() {
        crate::test_utils::logging::init();
    }

    /// Records every host interaction as one line
    #[derive(Default)]
    struct RecordingHost {
        events: Mutex<Vec<String>>,
        fail_navigation: bool,
    }

    impl RecordingHost {
        fn record(&self, event: String) {
            self.events.lock().unwrap().push(event);
        }

        fn events(&self) -> Vec<String> {
            self.events.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl HostUi for RecordingHost {
        async fn navigate(&self, target: &DefinitionMatch) -> Result<(), HostError> {
            if self.fail_navigation {
                return Err(HostError::Io(std::io::Error::other("editor closed")));
            }
            self.record(format!("navigate {}", target.to_compact()));
            Ok(())
        }

        async fn peek(&self, target: &DefinitionMatch) -> Result<(), HostError> {
            self.record(format!("peek {}", target.to_compact()));
            Ok(())
        }

        async fn show_references(
            &self,
            word: &str,
            references: &[ReferenceMatch],
        ) -> Result<(), HostError> {
            let list: Vec<String> = references.iter().map(ReferenceMatch::to_compact).collect();
            self.record(format!("references {word}: {}", list.join(", ")));
            Ok(())
        }

        async fn info(&self, message: &str) {
            self.record(format!("info {message}"));
        }

        async fn error(&self, message: &str) {
            self.record(format!("error {message}"));
        }

        async fn status(&self, message: &str) {
            self.record(format!("status {message}"));
        }
    }

    const USER: &str = "class User < ApplicationRecord\n  has_many :posts\n\n  def full_name\n  end\nend\n";
    const POST: &str = "class Post < ApplicationRecord\n  belongs_to :user\nend\n";
    const CONTROLLER: &str = "class UsersController < ApplicationController\n  def show\n    @user.full_name\n  end\nend\n";

    fn commands_with(host: RecordingHost) -> Commands<TestFileSystem, RecordingHost> {
        let fs = TestFileSystem::new();
        fs.add_file("/project/app/models/user.rb", USER);
        fs.add_file("/project/app/models/post.rb", POST);
        fs.add_file("/project/app/controllers/users_controller.rb", CONTROLLER);
        let engine = Engine::new(fs, EngineConfig::new(PathBuf::from("/project")));
        Commands::new(Arc::new(engine), host)
    }

    fn commands() -> Commands<TestFileSystem, RecordingHost> {
        commands_with(RecordingHost::default())
    }

    fn at(file: &str, word: &str) -> EditorContext {
        EditorContext::new(file, Some(word.to_string()))
    }

    #[test]
    fn test_model_file_detection() {
        assert!(is_model_file(Path::new("/project/app/models/user.rb")));
        assert!(is_model_file(Path::new("/project/app/models/users_helper.rb")));
        assert!(is_model_file(Path::new("/project/lib/ledger.rb")));
        assert!(!is_model_file(Path::new("/project/app/controllers/users_controller.rb")));
        assert!(!is_model_file(Path::new("/project/app/jobs/cleanup_job.rb")));
        assert!(!is_model_file(Path::new("/project/README.md")));
    }

    #[test]
    fn test_context_from_cursor() {
        let context = EditorContext::from_cursor("/p/a.rb", "  @user.save", 0, 4);
        assert_eq!(context.word.as_deref(), Some("user"));

        let context = EditorContext::from_cursor("/p/a.rb", "   ", 0, 1);
        assert_eq!(context.word, None);
    }

    #[tokio::test]
    async fn test_go_to_definition_reports_scope() {
        let commands = commands();
        let context = at("app/controllers/users_controller.rb", "full_name");

        commands.definition(Some(&context), DefinitionView::Navigate).await;
        assert_eq!(
            commands.host().events(),
            vec![
                "status Found 'full_name' in User",
                "navigate /project/app/models/user.rb:4",
            ]
        );
    }

    #[tokio::test]
    async fn test_peek_definition_without_scope() {
        let commands = commands();
        let context = at("/project/app/models/post.rb", "User");

        commands.definition(Some(&context), DefinitionView::Peek).await;
        assert_eq!(commands.host().events(), vec!["peek /project/app/models/user.rb:1"]);
    }

    #[tokio::test]
    async fn test_missing_editor_word_and_definition() {
        let commands = commands();

        commands.definition(None, DefinitionView::Navigate).await;
        commands
            .definition(Some(&EditorContext::new("/project/a.rb", None)), DefinitionView::Navigate)
            .await;
        commands
            .definition(Some(&at("/project/a.rb", "Nowhere")), DefinitionView::Navigate)
            .await;

        assert_eq!(
            commands.host().events(),
            vec![
                "info No active editor",
                "info No word at cursor position",
                "info Could not find definition for \"Nowhere\"",
            ]
        );
    }

    #[tokio::test]
    async fn test_navigation_failure_is_reported() {
        let commands = commands_with(RecordingHost {
            fail_navigation: true,
            ..RecordingHost::default()
        });

        commands
            .definition(Some(&at("/project/app/models/post.rb", "User")), DefinitionView::Navigate)
            .await;
        assert_eq!(
            commands.host().events(),
            vec!["error Error opening definition: Output failed: editor closed"]
        );
    }

    #[tokio::test]
    async fn test_references_project_and_in_file() {
        let commands = commands();

        commands
            .references(Some(&at("/project/app/models/post.rb", "full_name")), false)
            .await;
        commands
            .references(Some(&at("/project/app/models/post.rb", "full_name")), true)
            .await;
        commands
            .references(Some(&at("/project/notes.txt", "full_name")), true)
            .await;

        assert_eq!(
            commands.host().events(),
            vec![
                "references full_name: /project/app/controllers/users_controller.rb:3:11, /project/app/models/user.rb:4:7",
                "info No references found for \"full_name\" in current file",
                "info Not a Ruby file",
            ]
        );
    }

    #[tokio::test]
    async fn test_go_to_association() {
        let commands = commands();

        commands
            .association(Some(&at("/project/app/models/post.rb", "user")))
            .await;
        commands
            .association(Some(&at("/project/app/models/user.rb", "comments")))
            .await;
        commands
            .association(Some(&at("/project/app/controllers/users_controller.rb", "user")))
            .await;

        assert_eq!(
            commands.host().events(),
            vec![
                "navigate /project/app/models/user.rb:1",
                "info Navigated to belongs_to association: user",
                "info No association found for \"comments\"",
                "info Association navigation only works in model files",
            ]
        );
    }
}
