//! Test utilities and global setup
//!
//! Provides centralized test logging configuration and an on-disk Rails
//! project builder for tests that exercise the real filesystem.

/// Test logging utilities
#[cfg(all(test, feature = "test-logging"))]
pub mod logging {
    use std::sync::Once;
    use tracing_subscriber::{EnvFilter, fmt};

    static INIT: Once = Once::new();

    /// Initialize test logging globally - safe to call multiple times
    ///
    /// Respects `RUST_LOG`, defaulting to debug for this crate. Use it from a
    /// test module like this:
    ///
    /// ```rust
    /// #[cfg(feature = "test-logging")]
    /// #[ctor::ctor]
    /// fn init_test_logging() {
    ///     crate::test_utils::logging::init();
    /// }
    /// ```
    ///
    /// ```bash
    /// RUST_LOG=rails_nav::resolver=trace cargo test --features test-logging
    /// ```
    pub fn init() {
        INIT.call_once(|| {
            let env_filter = EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("debug,tokio=info"));

            fmt()
                .with_env_filter(env_filter)
                .with_test_writer() // Ensures logs don't interfere with test output
                .with_target(true)
                .with_thread_ids(true)
                .compact()
                .try_init()
                .ok(); // Ignore errors if already initialized by another test
        });
    }
}

/// Rails project fixtures on disk
#[cfg(test)]
pub mod integration {
    use std::fs;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    /// Temporary Rails project, removed on drop
    pub struct TestRailsProject {
        _temp_dir: TempDir, // Underscore prefix keeps it alive until drop
        pub root: PathBuf,
    }

    impl TestRailsProject {
        pub fn new() -> Result<Self, std::io::Error> {
            let temp_dir = TempDir::new()?;
            let root = temp_dir.path().to_path_buf();
            Ok(Self {
                _temp_dir: temp_dir,
                root,
            })
        }

        /// Create a project with a small blog domain already in place
        pub fn blog() -> Result<Self, std::io::Error> {
            let project = Self::new()?;
            project.write(
                "app/models/user.rb",
                "class User < ApplicationRecord\n  has_many :posts\n\n  def full_name\n    \"#{first_name} #{last_name}\"\n  end\nend\n",
            )?;
            project.write(
                "app/models/post.rb",
                "class Post < ApplicationRecord\n  belongs_to :user\n  belongs_to :publisher, class_name: \"Organization\"\nend\n",
            )?;
            project.write(
                "app/models/organization.rb",
                "class Organization < ApplicationRecord\nend\n",
            )?;
            project.write(
                "app/controllers/users_controller.rb",
                "class UsersController < ApplicationController\n  def show\n    @user = User.find(params[:id])\n    @name = @user.full_name\n  end\nend\n",
            )?;
            project.write(
                "app/controllers/application_controller.rb",
                "class ApplicationController < ActionController::Base\nend\n",
            )?;
            project.write("vendor/bundle/user.rb", "class User\nend\n")?;
            Ok(project)
        }

        /// Write a file relative to the project root, creating directories
        pub fn write(&self, relative: &str, content: &str) -> Result<PathBuf, std::io::Error> {
            let path = self.root.join(relative);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&path, content)?;
            Ok(path)
        }

        pub fn path(&self, relative: &str) -> PathBuf {
            self.root.join(relative)
        }

        pub fn root(&self) -> &Path {
            &self.root
        }
    }
}
