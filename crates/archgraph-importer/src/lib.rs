//! Builds the class model from class-level records.
//!
//! Each record's generic signature runs through parse, then [`TypeGraphBuilder`], and the
//! result is attached to the record's node in a shared [`archgraph_types::ClassPool`].
//! Records are imported on a worker pool; a bad signature only degrades its own class.

#![forbid(unsafe_code)]

mod builder;
mod cache;
mod error;
mod importer;
mod record;

pub use crate::builder::{build_class_signature, BuiltSignature, TypeGraphBuilder};
pub use crate::cache::{ParamState, ReferenceCache};
pub use crate::error::{BuildError, Result, MALFORMED_SIGNATURE, UNRESOLVED_TYPE_VARIABLE};
pub use crate::importer::{import_record, ClassFileImporter, ImportOutcome, ImportSummary};
pub use crate::record::{ClassRecord, ClassResolver};
