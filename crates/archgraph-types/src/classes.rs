use std::collections::HashMap;
use std::sync::Arc;

use crate::class::{binary_name, ClassId, ClassNode};
use crate::pool::WellKnownClasses;
use crate::usage::{TypeParamId, TypeParameter};
use crate::Diagnostic;

/// The result of an import session: every class node the session created, resolved or stub.
///
/// Read-only and lock-free; cheap to share behind an `Arc`.
#[derive(Debug, Clone)]
pub struct ImportedClasses {
    classes: Vec<Arc<ClassNode>>,
    by_name: HashMap<String, ClassId>,
    well_known: WellKnownClasses,
}

impl ImportedClasses {
    pub(crate) fn new(
        classes: Vec<Arc<ClassNode>>,
        by_name: HashMap<String, ClassId>,
        well_known: WellKnownClasses,
    ) -> Self {
        Self {
            classes,
            by_name,
            well_known,
        }
    }

    pub fn well_known(&self) -> &WellKnownClasses {
        &self.well_known
    }

    /// Looks a node up by binary or internal name. Stubs are returned too.
    pub fn get(&self, name: &str) -> Option<&ClassNode> {
        self.lookup(name).and_then(|id| self.class(id))
    }

    pub fn lookup(&self, name: &str) -> Option<ClassId> {
        self.by_name.get(binary_name(name).as_ref()).copied()
    }

    pub fn class(&self, id: ClassId) -> Option<&ClassNode> {
        self.classes.get(id.index()).map(Arc::as_ref)
    }

    /// Whether `name` was resolved (imported or platform), as opposed to unknown or stubbed.
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some_and(|class| !class.is_stub())
    }

    pub fn type_parameter(&self, id: TypeParamId) -> Option<&TypeParameter> {
        self.class(id.owner)?
            .type_parameters()
            .get(usize::try_from(id.index).ok()?)
    }

    /// All nodes in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &ClassNode> {
        self.classes.iter().map(Arc::as_ref)
    }

    pub fn stubs(&self) -> impl Iterator<Item = &ClassNode> {
        self.iter().filter(|class| class.is_stub())
    }

    pub fn diagnostics(&self) -> impl Iterator<Item = (&ClassNode, &Diagnostic)> {
        self.iter()
            .flat_map(|class| class.diagnostics().iter().map(move |d| (class, d)))
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}
