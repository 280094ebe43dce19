//! Engine configuration
//!
//! Defaults reproduce the limits the resolver has always used; environment
//! variables and CLI flags can override the reference-search tunables.

use std::env;
use std::path::PathBuf;

use tracing::warn;

/// Tunables for project-wide reference search
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceSearchConfig {
    /// Files scanned concurrently per batch
    pub batch_size: usize,
    /// Files larger than this many bytes are skipped
    pub max_file_size: u64,
    /// Only file contents shorter than this many bytes are cached
    pub content_cache_ceiling: usize,
    /// File content cache size that triggers eviction
    pub content_cache_limit: usize,
    /// Oldest file content entries dropped per eviction
    pub content_cache_evict: usize,
    /// Search result cache size that triggers eviction
    pub search_cache_limit: usize,
    /// Oldest search result entries dropped per eviction
    pub search_cache_evict: usize,
    /// Glob selecting source files, relative to the project root
    pub source_pattern: String,
    /// Globs excluded from project-wide scans
    pub exclude: Vec<String>,
}

impl Default for ReferenceSearchConfig {
    fn default() -> Self {
        Self {
            batch_size: 50,
            max_file_size: 1024 * 1024,
            content_cache_ceiling: 500_000,
            content_cache_limit: 100,
            content_cache_evict: 30,
            search_cache_limit: 30,
            search_cache_evict: 10,
            source_pattern: "**/*.rb".to_string(),
            exclude: [
                "node_modules/**",
                "vendor/**",
                "tmp/**",
                "log/**",
                "coverage/**",
                "public/assets/**",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
        }
    }
}

/// Configuration for one project session
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Root of the Rails project
    pub project_root: PathBuf,
    pub references: ReferenceSearchConfig,
}

impl EngineConfig {
    pub fn new(project_root: PathBuf) -> Self {
        Self {
            project_root,
            references: ReferenceSearchConfig::default(),
        }
    }

    /// Create configuration with overrides from environment variables
    ///
    /// - `RAILS_NAV_BATCH_SIZE`: files per reference-search batch
    /// - `RAILS_NAV_MAX_FILE_SIZE`: largest file (bytes) scanned for references
    pub fn from_env(project_root: PathBuf) -> Self {
        let mut config = Self::new(project_root);

        if let Some(batch_size) = parse_env::<usize>("RAILS_NAV_BATCH_SIZE") {
            config.references.batch_size = batch_size;
        }
        if let Some(max_file_size) = parse_env::<u64>("RAILS_NAV_MAX_FILE_SIZE") {
            config.references.max_file_size = max_file_size;
        }

        config
    }

    /// Override values from CLI arguments
    pub fn with_overrides(mut self, batch_size: Option<usize>, max_file_size: Option<u64>) -> Self {
        if let Some(batch_size) = batch_size {
            self.references.batch_size = batch_size;
        }
        if let Some(max_file_size) = max_file_size {
            self.references.max_file_size = max_file_size;
        }
        // A zero batch size would never make progress
        self.references.batch_size = self.references.batch_size.max(1);
        self
    }
}

fn parse_env<T: std::str::FromStr>(name: &str) -> Option<T> {
    let raw = env::var(name).ok()?;
    match raw.parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!("Ignoring invalid value for {}: '{}'", name, raw);
            None
        }
    }
}
