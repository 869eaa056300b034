use std::borrow::Cow;
use std::sync::OnceLock;

use crate::usage::{TypeParameter, TypeUsage};
use crate::Diagnostic;

const ACC_INTERFACE: u16 = 0x0200;
const ACC_ANNOTATION: u16 = 0x2000;
const ACC_ENUM: u16 = 0x4000;

/// Index of a class node inside the pool that created it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClassId(u32);

impl ClassId {
    pub(crate) fn from_index(index: usize) -> Self {
        debug_assert!(u32::try_from(index).is_ok(), "too many classes in one pool");
        Self(index as u32)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ClassKind {
    Class,
    Interface,
    Enum,
    Annotation,
    Record,
    /// `int`, `boolean`, ... and `void`.
    Primitive,
}

impl ClassKind {
    /// Derives the kind from the class-file access flags and the declared superclass.
    pub fn from_access_flags(access_flags: u16, super_class: Option<&str>) -> Self {
        if access_flags & ACC_ANNOTATION != 0 {
            ClassKind::Annotation
        } else if access_flags & ACC_INTERFACE != 0 {
            ClassKind::Interface
        } else if access_flags & ACC_ENUM != 0 {
            ClassKind::Enum
        } else if super_class.map(|s| binary_name(s)).as_deref() == Some("java.lang.Record") {
            ClassKind::Record
        } else {
            ClassKind::Class
        }
    }
}

/// Converts an internal name (`java/util/Map$Entry`) to a binary name (`java.util.Map$Entry`).
/// Binary names are returned unchanged.
pub fn binary_name(name: &str) -> Cow<'_, str> {
    if name.contains('/') {
        Cow::Owned(name.replace('/', "."))
    } else {
        Cow::Borrowed(name)
    }
}

/// Everything known about a class once it has been imported.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClassDetails {
    pub kind: ClassKind,
    pub access_flags: u16,
    pub super_class: Option<ClassId>,
    pub interfaces: Vec<ClassId>,
    /// The class this one is nested in. Its type parameters are in scope in this class's
    /// signature.
    pub enclosing_class: Option<ClassId>,
    /// Declared type parameters in declaration order. Empty for non-generic classes.
    pub type_parameters: Vec<TypeParameter>,
    pub generic_super_class: Option<TypeUsage>,
    pub generic_interfaces: Vec<TypeUsage>,
    pub diagnostics: Vec<Diagnostic>,
}

impl ClassDetails {
    pub fn new(kind: ClassKind) -> Self {
        Self {
            kind,
            access_flags: 0,
            super_class: None,
            interfaces: Vec::new(),
            enclosing_class: None,
            type_parameters: Vec::new(),
            generic_super_class: None,
            generic_interfaces: Vec::new(),
            diagnostics: Vec::new(),
        }
    }
}

/// A class in the model: either resolved (details attached) or a name-only stub.
///
/// The details are set at most once. Everybody holding the node's [`ClassId`] (or a shared
/// handle to the node) observes the upgrade from stub to resolved.
#[derive(Debug)]
pub struct ClassNode {
    id: ClassId,
    name: String,
    details: OnceLock<ClassDetails>,
}

impl ClassNode {
    pub(crate) fn stub(id: ClassId, name: String) -> Self {
        Self {
            id,
            name,
            details: OnceLock::new(),
        }
    }

    pub(crate) fn resolve(&self, details: ClassDetails) -> Result<(), ClassDetails> {
        self.details.set(details)
    }

    pub fn id(&self) -> ClassId {
        self.id
    }

    /// Binary name, e.g. `java.util.Map$Entry`.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn internal_name(&self) -> String {
        self.name.replace('.', "/")
    }

    pub fn simple_name(&self) -> &str {
        let tail = self
            .name
            .rsplit_once('.')
            .map(|(_, tail)| tail)
            .unwrap_or(&self.name);
        tail.rsplit_once('$').map(|(_, s)| s).unwrap_or(tail)
    }

    pub fn package_name(&self) -> &str {
        self.name.rsplit_once('.').map(|(p, _)| p).unwrap_or("")
    }

    pub fn is_stub(&self) -> bool {
        self.details.get().is_none()
    }

    pub fn details(&self) -> Option<&ClassDetails> {
        self.details.get()
    }

    pub fn kind(&self) -> Option<ClassKind> {
        self.details().map(|d| d.kind)
    }

    pub fn super_class(&self) -> Option<ClassId> {
        self.details().and_then(|d| d.super_class)
    }

    pub fn interfaces(&self) -> &[ClassId] {
        self.details().map(|d| d.interfaces.as_slice()).unwrap_or(&[])
    }

    pub fn enclosing_class(&self) -> Option<ClassId> {
        self.details().and_then(|d| d.enclosing_class)
    }

    pub fn type_parameters(&self) -> &[TypeParameter] {
        self.details()
            .map(|d| d.type_parameters.as_slice())
            .unwrap_or(&[])
    }

    pub fn type_parameter(&self, name: &str) -> Option<&TypeParameter> {
        self.type_parameters().iter().find(|p| p.name() == name)
    }

    pub fn generic_super_class(&self) -> Option<&TypeUsage> {
        self.details().and_then(|d| d.generic_super_class.as_ref())
    }

    pub fn generic_interfaces(&self) -> &[TypeUsage] {
        self.details()
            .map(|d| d.generic_interfaces.as_slice())
            .unwrap_or(&[])
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        self.details()
            .map(|d| d.diagnostics.as_slice())
            .unwrap_or(&[])
    }
}
