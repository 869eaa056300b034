use std::collections::HashMap;
use std::sync::Arc;

use archgraph_signature::BaseType;
use parking_lot::RwLock;
use thiserror::Error;

use crate::class::{binary_name, ClassDetails, ClassId, ClassKind, ClassNode};
use crate::classes::ImportedClasses;
use crate::OBJECT;

/// Ids of classes every pool knows about from the start.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WellKnownClasses {
    /// `java.lang.Object`, the top reference type. A stub until imported.
    pub object: ClassId,
    /// `void`, used for method results.
    pub void: ClassId,
    primitives: [ClassId; 8],
}

impl WellKnownClasses {
    pub fn primitive(&self, base: BaseType) -> ClassId {
        let idx = BaseType::ALL
            .iter()
            .position(|b| *b == base)
            .unwrap_or_default();
        self.primitives[idx]
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum UpgradeError {
    #[error("class {name} is already resolved")]
    AlreadyResolved { name: String },
    #[error("unknown class id {0:?}")]
    UnknownClass(ClassId),
}

#[derive(Debug, Default)]
struct PoolInner {
    classes: Vec<Arc<ClassNode>>,
    by_name: HashMap<String, ClassId>,
}

/// Registry of class nodes for one import session (the resolution context).
///
/// Lookups by name never fail: an unknown name registers a stub. Registration and upgrade are
/// atomic per name, so the pool can be shared by parallel import workers.
#[derive(Debug)]
pub struct ClassPool {
    inner: RwLock<PoolInner>,
    well_known: WellKnownClasses,
}

impl Default for ClassPool {
    fn default() -> Self {
        Self::new()
    }
}

impl ClassPool {
    /// Creates a pool seeded with the primitive classes and `void` (resolved) and
    /// `java.lang.Object` (stub).
    pub fn new() -> Self {
        let mut inner = PoolInner::default();
        let mut platform = |name: &str, details: Option<ClassDetails>| {
            let id = ClassId::from_index(inner.classes.len());
            let node = ClassNode::stub(id, name.to_string());
            if let Some(details) = details {
                // Freshly created, cannot already be resolved.
                let _ = node.resolve(details);
            }
            inner.classes.push(Arc::new(node));
            inner.by_name.insert(name.to_string(), id);
            id
        };

        let object = platform(OBJECT, None);
        let void = platform("void", Some(ClassDetails::new(ClassKind::Primitive)));
        let primitives = BaseType::ALL
            .map(|base| platform(base.java_name(), Some(ClassDetails::new(ClassKind::Primitive))));

        Self {
            inner: RwLock::new(inner),
            well_known: WellKnownClasses {
                object,
                void,
                primitives,
            },
        }
    }

    pub fn well_known(&self) -> &WellKnownClasses {
        &self.well_known
    }

    /// Returns the node registered for `name`, registering a stub if there is none.
    ///
    /// Accepts binary (`java.lang.String`) and internal (`java/lang/String`) names.
    pub fn resolve(&self, name: &str) -> ClassId {
        let name = binary_name(name);
        if let Some(id) = self.inner.read().by_name.get(name.as_ref()) {
            return *id;
        }

        let mut inner = self.inner.write();
        // Another worker may have registered the name between the two locks.
        if let Some(id) = inner.by_name.get(name.as_ref()) {
            return *id;
        }
        let id = ClassId::from_index(inner.classes.len());
        inner
            .classes
            .push(Arc::new(ClassNode::stub(id, name.to_string())));
        inner.by_name.insert(name.to_string(), id);
        tracing::trace!(target: "archgraph.pool", class = %name, "registered stub class");
        id
    }

    pub fn lookup(&self, name: &str) -> Option<ClassId> {
        self.inner.read().by_name.get(binary_name(name).as_ref()).copied()
    }

    /// Shared handle to a node. The handle observes later upgrades of the node.
    pub fn node(&self, id: ClassId) -> Option<Arc<ClassNode>> {
        self.inner.read().classes.get(id.index()).cloned()
    }

    pub fn is_stub(&self, id: ClassId) -> bool {
        self.node(id).map(|node| node.is_stub()).unwrap_or(true)
    }

    /// Attaches `details` to a stub. Upgrades are monotonic: a resolved node is never
    /// overwritten and the rejected details are dropped.
    pub fn upgrade(&self, id: ClassId, details: ClassDetails) -> Result<(), UpgradeError> {
        let node = self.node(id).ok_or(UpgradeError::UnknownClass(id))?;
        node.resolve(details)
            .map_err(|_| UpgradeError::AlreadyResolved {
                name: node.name().to_string(),
            })?;
        tracing::trace!(target: "archgraph.pool", class = %node.name(), "resolved class");
        Ok(())
    }

    /// Ids of all nodes that are still stubs, in registration order.
    pub fn stubs(&self) -> Vec<ClassId> {
        self.inner
            .read()
            .classes
            .iter()
            .filter(|node| node.is_stub())
            .map(|node| node.id())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.inner.read().classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Ends the session and returns the immutable, lock-free view of all nodes.
    pub fn freeze(self) -> ImportedClasses {
        let inner = self.inner.into_inner();
        ImportedClasses::new(inner.classes, inner.by_name, self.well_known)
    }
}
