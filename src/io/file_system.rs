//! File system abstraction layer
//!
//! Provides the narrow filesystem capability the resolution engine depends on:
//! existence checks, text reads, size lookups and glob-filtered enumeration.
//! Keeping it behind a trait lets tests run the whole engine against an
//! in-memory tree and count how often files are touched.

use std::path::{Path, PathBuf};

use globset::{Glob, GlobBuilder, GlobMatcher, GlobSet, GlobSetBuilder};
use tracing::warn;
use walkdir::{DirEntry, WalkDir};

use crate::error::ResolverError;

// ============================================================================
// File Metadata
// ============================================================================

/// Simplified, testable alternative to `std::fs::Metadata`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileMetadata {
    /// File size in bytes
    pub size: u64,
}

impl FileMetadata {
    pub fn new(size: u64) -> Self {
        Self { size }
    }
}

// ============================================================================
// Path Filter
// ============================================================================

/// Glob filter over base-relative paths
///
/// A path is accepted when it matches `pattern` and none of the exclusion
/// globs. Paths are compared with forward slashes regardless of platform.
#[derive(Debug, Clone)]
pub struct PathFilter {
    include: GlobMatcher,
    exclude: GlobSet,
}

impl PathFilter {
    pub fn new(pattern: &str, exclude: &[&str]) -> Result<Self, ResolverError> {
        let include = GlobBuilder::new(pattern)
            .literal_separator(true)
            .build()
            .map_err(|source| ResolverError::InvalidGlob {
                pattern: pattern.to_string(),
                source,
            })?
            .compile_matcher();

        let mut builder = GlobSetBuilder::new();
        for exclusion in exclude {
            let glob = Glob::new(exclusion).map_err(|source| ResolverError::InvalidGlob {
                pattern: exclusion.to_string(),
                source,
            })?;
            builder.add(glob);
        }
        let exclude = builder.build().map_err(|source| ResolverError::InvalidGlob {
            pattern: exclude.join(","),
            source,
        })?;

        Ok(Self { include, exclude })
    }

    pub fn matches(&self, relative: &Path) -> bool {
        let normalized = relative.to_string_lossy().replace('\\', "/");
        self.include.is_match(&normalized) && !self.exclude.is_match(&normalized)
    }

    /// True when an exclusion covers everything under the directory `relative`
    pub fn prunes(&self, relative: &Path) -> bool {
        let normalized = relative.to_string_lossy().replace('\\', "/");
        !normalized.is_empty() && self.exclude.is_match(format!("{normalized}/"))
    }
}

// ============================================================================
// File System Trait
// ============================================================================

/// Filesystem capability consumed by the engine
///
/// Implementations must be cheap to clone: scans clone the filesystem into
/// blocking tasks.
pub trait FileSystemTrait: Clone + Send + Sync + 'static {
    /// Check if a file or directory exists
    fn exists(&self, path: &Path) -> bool;

    /// Read a whole file as UTF-8 text
    fn read_to_string(&self, path: &Path) -> Result<String, std::io::Error>;

    /// Get file metadata
    fn metadata(&self, path: &Path) -> Result<FileMetadata, std::io::Error>;

    /// Recursively enumerate files under `base` matching `pattern`
    ///
    /// `pattern` and `exclude` are globs relative to `base`. The result is
    /// sorted; a missing `base` yields an empty list.
    fn find(
        &self,
        base: &Path,
        pattern: &str,
        exclude: &[&str],
    ) -> Result<Vec<PathBuf>, ResolverError>;
}

// ============================================================================
// Real File System Implementation
// ============================================================================

/// Real file system implementation using std::fs and walkdir
#[derive(Debug, Clone, Copy, Default)]
pub struct RealFileSystem;

fn is_hidden(entry: &DirEntry) -> bool {
    entry.depth() > 0 && entry.file_name().to_string_lossy().starts_with('.')
}

impl FileSystemTrait for RealFileSystem {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn read_to_string(&self, path: &Path) -> Result<String, std::io::Error> {
        std::fs::read_to_string(path)
    }

    fn metadata(&self, path: &Path) -> Result<FileMetadata, std::io::Error> {
        let metadata = std::fs::metadata(path)?;
        Ok(FileMetadata::new(metadata.len()))
    }

    fn find(
        &self,
        base: &Path,
        pattern: &str,
        exclude: &[&str],
    ) -> Result<Vec<PathBuf>, ResolverError> {
        let filter = PathFilter::new(pattern, exclude)?;
        if !base.is_dir() {
            return Ok(Vec::new());
        }

        let mut files = Vec::new();
        for entry in WalkDir::new(base)
            .into_iter()
            .filter_entry(|entry| {
                if is_hidden(entry) {
                    return false;
                }
                !(entry.file_type().is_dir()
                    && entry
                        .path()
                        .strip_prefix(base)
                        .is_ok_and(|relative| filter.prunes(relative)))
            })
        {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Failed to access directory entry: {}", e);
                    continue;
                }
            };

            if !entry.file_type().is_file() {
                continue;
            }

            if let Ok(relative) = entry.path().strip_prefix(base)
                && filter.matches(relative)
            {
                files.push(entry.into_path());
            }
        }

        files.sort();
        Ok(files)
    }
}

// ============================================================================
// Test File System Implementation
// ============================================================================


#[cfg(test)]
pub use test_filesystem::TestFileSystem;

// ============================================================================
// Tests
// ============================================================================
