//! Class model produced by the archgraph importer.
//!
//! Classes are interned into a [`ClassPool`] under their binary name and addressed by
//! [`ClassId`]. A class referenced before (or without) being imported is a *stub*: a name-only
//! node that is upgraded in place once its details are known. Generic type information is
//! modelled as [`TypeParameter`]s owned by their class and [`TypeUsage`] trees that refer to
//! classes and type parameters by id, so self-referential bounds need no recursive ownership.

#![forbid(unsafe_code)]

mod class;
mod classes;
mod pool;
mod usage;

use std::fmt;

pub use archgraph_signature::BaseType;

pub use crate::class::{binary_name, ClassDetails, ClassId, ClassKind, ClassNode};
pub use crate::classes::ImportedClasses;
pub use crate::pool::{ClassPool, UpgradeError, WellKnownClasses};
pub use crate::usage::{
    ParameterizedTypeUsage, TypeParamId, TypeParameter, TypeUsage, TypeVariableUsage,
    WildcardUsage,
};

/// Binary name of the top reference type.
pub const OBJECT: &str = "java.lang.Object";

/// A byte-span into a raw signature string.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn at(offset: usize) -> Self {
        Self::new(offset, offset)
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }
}

impl fmt::Debug for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Span({}..{})", self.start, self.end)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
    Info,
}

/// A problem found while importing one class. Attached to the class node it concerns.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub code: &'static str,
    pub message: String,
    pub span: Option<Span>,
}

impl Diagnostic {
    pub fn error(code: &'static str, message: impl Into<String>, span: Option<Span>) -> Self {
        Self {
            severity: Severity::Error,
            code,
            message: message.into(),
            span,
        }
    }

    pub fn warning(code: &'static str, message: impl Into<String>, span: Option<Span>) -> Self {
        Self {
            severity: Severity::Warning,
            code,
            message: message.into(),
            span,
        }
    }
}
