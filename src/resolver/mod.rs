//! Async resolution front-ends
//!
//! The locators and scanners underneath are synchronous. Resolvers move that
//! work onto blocking threads, combine results in a fixed order and turn
//! every internal failure into "not found".

mod association;
mod cache;
mod definition;
mod references;

pub use association::AssociationResolver;
pub use definition::DefinitionResolver;
pub use references::ReferenceFinder;
