//! Project-wide textual reference search
//!
//! Files are scanned in fixed-size batches on blocking threads. Within a
//! batch all files are in flight at once; between batches the search yields
//! back to the runtime. Two FIFO caches sit in front of the filesystem: one
//! for file contents and one for finished search results. Neither is ever
//! invalidated by file changes.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Instant;

use regex::Regex;
use tracing::{debug, info, trace, warn};

use super::cache::FifoCache;
use super::definition::is_class_like;
use crate::config::ReferenceSearchConfig;
use crate::error::ResolverError;
use crate::io::FileSystemTrait;
use crate::log_timing;
use crate::scanner::patterns::trailing_boundary;
use crate::symbol::ReferenceMatch;

/// Which files a reference search covers
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SearchScope {
    /// Every source file under the project root
    Project,
    /// Exactly one file
    File(PathBuf),
}

/// Search result cache key
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SearchKey {
    pub word: String,
    pub scope: SearchScope,
}

/// Identifier characters are ASCII only, matching the `(?-u:\b)` boundaries below
fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

// ============================================================================
// Matcher
// ============================================================================

const ASCII_BOUNDARY: &str = r"(?-u:\b)";

/// Token-boundary matcher for one identifier
///
/// Matching is case-sensitive. Member names (anything not class-like) skip
/// occurrences followed by optional whitespace and `=`, a rough filter for
/// assignment targets that also drops `==` comparisons.
#[derive(Debug, Clone)]
pub struct ReferenceMatcher {
    word: String,
    regex: Regex,
    skip_assignments: bool,
}

impl ReferenceMatcher {
    pub fn new(word: &str) -> Result<Self, ResolverError> {
        if word.is_empty() {
            return Err(ResolverError::invalid_input("empty search term"));
        }

        let leading = if word.chars().next().is_some_and(is_word_char) {
            ASCII_BOUNDARY
        } else {
            ""
        };
        let trailing = if trailing_boundary(word).is_empty() {
            ""
        } else {
            ASCII_BOUNDARY
        };
        let pattern = format!("{leading}{}{trailing}", regex::escape(word));
        let regex = Regex::new(&pattern).map_err(|source| ResolverError::InvalidPattern {
            pattern: pattern.clone(),
            source,
        })?;

        Ok(Self {
            word: word.to_string(),
            regex,
            skip_assignments: !is_class_like(word),
        })
    }

    /// Character columns of every accepted occurrence in one line
    pub fn find_in_line(&self, line: &str) -> Vec<u32> {
        self.regex
            .find_iter(line)
            .filter(|found| {
                let before = line[..found.start()].chars().next_back();
                let after = line[found.end()..].chars().next();
                let bounded = !before.is_some_and(is_word_char) && !after.is_some_and(is_word_char);

                bounded
                    && !(self.skip_assignments && line[found.end()..].trim_start().starts_with('='))
            })
            .map(|found| line[..found.start()].chars().count() as u32)
            .collect()
    }

    /// Every accepted occurrence in a file's text, in line then column order
    pub fn find_in_text(&self, file_path: &Path, text: &str) -> Vec<ReferenceMatch> {
        if !text.contains(&self.word) {
            return Vec::new();
        }

        text.split('\n')
            .enumerate()
            .flat_map(|(line, content)| {
                self.find_in_line(content)
                    .into_iter()
                    .map(move |column| ReferenceMatch {
                        file_path: file_path.to_path_buf(),
                        line: line as u32,
                        column,
                    })
            })
            .collect()
    }
}

// ============================================================================
// Finder
// ============================================================================

type ContentCache = Arc<Mutex<FifoCache<PathBuf, Arc<str>>>>;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    // Cache contents stay consistent even if a scan thread panicked mid-insert
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Finds textual references to an identifier across the project
pub struct ReferenceFinder<F: FileSystemTrait> {
    filesystem: F,
    root: PathBuf,
    config: ReferenceSearchConfig,
    content_cache: ContentCache,
    search_cache: Mutex<FifoCache<SearchKey, Vec<ReferenceMatch>>>,
}

impl<F: FileSystemTrait> ReferenceFinder<F> {
    pub fn new(filesystem: F, root: PathBuf, config: ReferenceSearchConfig) -> Self {
        Self {
            filesystem,
            root,
            config,
            content_cache: Arc::new(Mutex::new(FifoCache::new())),
            search_cache: Mutex::new(FifoCache::new()),
        }
    }

    pub fn content_cache_len(&self) -> usize {
        lock(&self.content_cache).len()
    }

    pub fn search_cache_len(&self) -> usize {
        lock(&self.search_cache).len()
    }

    /// Find references to `word`, project-wide or in `current_file` only
    ///
    /// Results are cached per word and scope. Never fails: errors are logged
    /// and produce an empty list.
    pub async fn find_references(
        &self,
        word: &str,
        current_file: Option<&Path>,
        current_file_only: bool,
    ) -> Vec<ReferenceMatch> {
        if word.is_empty() {
            warn!("Ignoring reference search for an empty word");
            return Vec::new();
        }

        let scope = match (current_file_only, current_file) {
            (false, _) => SearchScope::Project,
            (true, Some(file)) => SearchScope::File(file.to_path_buf()),
            (true, None) => {
                warn!("In-file reference search for '{}' without a current file", word);
                return Vec::new();
            }
        };
        let key = SearchKey {
            word: word.to_string(),
            scope,
        };

        let cached = lock(&self.search_cache).get(&key).cloned();
        if let Some(cached) = cached {
            debug!("Using cached references for '{}' ({} found)", word, cached.len());
            return cached;
        }

        let references = match self.search(&key).await {
            Ok(references) => references,
            Err(e) => {
                warn!("Reference search for '{}' failed: {}", word, e);
                return Vec::new();
            }
        };

        self.trim_caches();
        lock(&self.search_cache).insert(key, references.clone());
        references
    }

    async fn search(&self, key: &SearchKey) -> Result<Vec<ReferenceMatch>, ResolverError> {
        let started = Instant::now();
        let matcher = Arc::new(ReferenceMatcher::new(&key.word)?);
        let files = match &key.scope {
            SearchScope::File(file) => vec![file.clone()],
            SearchScope::Project => self.source_files().await?,
        };
        info!("Searching {} files for '{}'", files.len(), key.word);

        let mut references = Vec::new();
        let batch_size = self.config.batch_size.max(1);

        for (index, batch) in files.chunks(batch_size).enumerate() {
            trace!("Scanning batch {} ({} files)", index + 1, batch.len());

            let handles: Vec<_> = batch
                .iter()
                .map(|file| {
                    let file = file.clone();
                    let scan = FileScan {
                        filesystem: self.filesystem.clone(),
                        content_cache: Arc::clone(&self.content_cache),
                        matcher: Arc::clone(&matcher),
                        max_file_size: self.config.max_file_size,
                        content_cache_ceiling: self.config.content_cache_ceiling,
                    };
                    tokio::task::spawn_blocking(move || scan.run(&file))
                })
                .collect();

            for handle in handles {
                match handle.await {
                    Ok(found) => references.extend(found),
                    Err(e) => warn!("Reference scan task failed: {}", e),
                }
            }

            tokio::task::yield_now().await;
        }

        info!("Found {} references to '{}'", references.len(), key.word);
        log_timing!(tracing::Level::DEBUG, "reference_search", started.elapsed());
        Ok(references)
    }

    async fn source_files(&self) -> Result<Vec<PathBuf>, ResolverError> {
        let filesystem = self.filesystem.clone();
        let root = self.root.clone();
        let pattern = self.config.source_pattern.clone();
        let exclude = self.config.exclude.clone();

        tokio::task::spawn_blocking(move || {
            let exclude: Vec<&str> = exclude.iter().map(String::as_str).collect();
            filesystem.find(&root, &pattern, &exclude)
        })
        .await?
    }

    fn trim_caches(&self) {
        let evicted = lock(&self.content_cache).trim(
            self.config.content_cache_limit,
            self.config.content_cache_evict,
        );
        if evicted > 0 {
            debug!("Evicted {} file contents from cache", evicted);
        }

        let evicted = lock(&self.search_cache).trim(
            self.config.search_cache_limit,
            self.config.search_cache_evict,
        );
        if evicted > 0 {
            debug!("Evicted {} search results from cache", evicted);
        }
    }
}

/// Everything one blocking file scan needs
struct FileScan<F: FileSystemTrait> {
    filesystem: F,
    content_cache: ContentCache,
    matcher: Arc<ReferenceMatcher>,
    max_file_size: u64,
    content_cache_ceiling: usize,
}

impl<F: FileSystemTrait> FileScan<F> {
    fn run(&self, file: &Path) -> Vec<ReferenceMatch> {
        match self.content(file) {
            Ok(Some(text)) => self.matcher.find_in_text(file, &text),
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!("Error searching file {}: {}", file.display(), e);
                Vec::new()
            }
        }
    }

    /// File text, or `None` when the file is missing or too large
    fn content(&self, file: &Path) -> Result<Option<Arc<str>>, ResolverError> {
        if !self.filesystem.exists(file) {
            return Ok(None);
        }

        let metadata = self
            .filesystem
            .metadata(file)
            .map_err(|source| ResolverError::io(file, source))?;
        if metadata.size > self.max_file_size {
            info!(
                "Skipping large file: {} ({}KB)",
                file.display(),
                metadata.size / 1024
            );
            return Ok(None);
        }

        if let Some(cached) = lock(&self.content_cache).get(&file.to_path_buf()) {
            return Ok(Some(Arc::clone(cached)));
        }

        let text: Arc<str> = self
            .filesystem
            .read_to_string(file)
            .map_err(|source| ResolverError::io(file, source))?
            .into();
        if text.len() < self.content_cache_ceiling {
            lock(&self.content_cache).insert(file.to_path_buf(), Arc::clone(&text));
        }
        Ok(Some(text))
    }
}
