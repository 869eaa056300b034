use std::collections::HashMap;

use archgraph_types::{binary_name, OBJECT};

const ACC_PUBLIC: u16 = 0x0001;
const ACC_SUPER: u16 = 0x0020;
const ACC_INTERFACE: u16 = 0x0200;
const ACC_ABSTRACT: u16 = 0x0400;

/// The class-level attributes the importer needs from a class file.
///
/// Names may be given in internal (`java/util/List`) or binary (`java.util.List`) form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassRecord {
    pub name: String,
    pub access_flags: u16,
    pub super_class: Option<String>,
    pub interfaces: Vec<String>,
    /// Outer class from the `InnerClasses` attribute, for member classes.
    pub enclosing_class: Option<String>,
    /// Raw `Signature` attribute, if the class has one.
    pub signature: Option<String>,
}

impl ClassRecord {
    pub fn new(name: impl Into<String>, access_flags: u16) -> Self {
        Self {
            name: name.into(),
            access_flags,
            super_class: None,
            interfaces: Vec::new(),
            enclosing_class: None,
            signature: None,
        }
    }

    /// A public class extending `java.lang.Object` (no superclass for `Object` itself).
    pub fn class(name: impl Into<String>) -> Self {
        let mut record = Self::new(name, ACC_PUBLIC | ACC_SUPER);
        if binary_name(&record.name) != OBJECT {
            record.super_class = Some(OBJECT.to_string());
        }
        record
    }

    /// A public interface. Class files record `java.lang.Object` as its superclass.
    pub fn interface(name: impl Into<String>) -> Self {
        let mut record = Self::new(name, ACC_PUBLIC | ACC_INTERFACE | ACC_ABSTRACT);
        record.super_class = Some(OBJECT.to_string());
        record
    }

    pub fn extends(mut self, super_class: impl Into<String>) -> Self {
        self.super_class = Some(super_class.into());
        self
    }

    pub fn implements(mut self, interface: impl Into<String>) -> Self {
        self.interfaces.push(interface.into());
        self
    }

    pub fn with_signature(mut self, signature: impl Into<String>) -> Self {
        self.signature = Some(signature.into());
        self
    }

    pub fn nested_in(mut self, enclosing_class: impl Into<String>) -> Self {
        self.enclosing_class = Some(enclosing_class.into());
        self
    }

    /// Binary name of the enclosing class: the recorded one, else the name up to the last `$`.
    pub fn enclosing_name(&self) -> Option<String> {
        if let Some(enclosing) = &self.enclosing_class {
            return Some(binary_name(enclosing).into_owned());
        }
        let name = binary_name(&self.name);
        let (outer, inner) = name.rsplit_once('$')?;
        if outer.is_empty() || inner.is_empty() || outer.ends_with('.') {
            return None;
        }
        Some(outer.to_string())
    }
}

/// Supplies records for classes that were referenced but not imported.
pub trait ClassResolver: Send + Sync {
    /// Looks up a class by binary name.
    fn resolve(&self, binary_name: &str) -> Option<ClassRecord>;
}

impl<F> ClassResolver for F
where
    F: Fn(&str) -> Option<ClassRecord> + Send + Sync,
{
    fn resolve(&self, binary_name: &str) -> Option<ClassRecord> {
        self(binary_name)
    }
}

/// Records keyed by binary name.
impl ClassResolver for HashMap<String, ClassRecord> {
    fn resolve(&self, binary_name: &str) -> Option<ClassRecord> {
        self.get(binary_name).cloned()
    }
}
