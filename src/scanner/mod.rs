//! Definition scanning
//!
//! - **patterns**: regex templates per definition kind
//! - **file_scanner**: first-match search over file text with scope extraction

pub mod file_scanner;
pub mod patterns;

pub use file_scanner::FileScanner;
pub use patterns::DefinitionKind;
