//! I/O layer - filesystem capability consumed by the resolution engine
//!
//! - **FileSystemTrait**: existence, read, size and glob enumeration
//! - **RealFileSystem**: `std::fs` + `walkdir` implementation
//! - **TestFileSystem**: in-memory implementation with access counters (tests only)

pub mod file_system;

pub use file_system::{FileSystemTrait, RealFileSystem};

#[cfg(test)]
pub use file_system::TestFileSystem;
