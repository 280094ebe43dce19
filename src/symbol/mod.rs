//! Match types produced by the resolution engine
//!
//! Definition, association and reference results are plain values with
//! zero-based line/column positions; hosts convert them to whatever
//! navigation primitive they use.

mod location;

pub use location::{AssociationKind, AssociationMatch, DefinitionMatch, ReferenceMatch};
