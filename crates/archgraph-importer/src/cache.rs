use std::collections::HashMap;

use archgraph_types::{ClassId, TypeParamId};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParamState {
    /// Declared; its bounds are being built. References to it resolve to the same id.
    BoundsPending,
    Complete,
}

#[derive(Clone, Copy, Debug)]
struct Entry {
    id: TypeParamId,
    state: ParamState,
}

/// Memoizes "type parameter `name` of class `owner`" for one signature build.
///
/// Every parameter of a declaration is entered before any bound is built, so a bound that
/// mentions its own parameter (or a later sibling) resolves to the declared id instead of
/// recursing.
#[derive(Debug, Default)]
pub struct ReferenceCache {
    entries: HashMap<(ClassId, String), Entry>,
}

impl ReferenceCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a parameter with pending bounds. Returns `None` if `owner` already declares
    /// `name`; the first declaration is kept.
    pub fn declare(&mut self, owner: ClassId, name: &str, index: u32) -> Option<TypeParamId> {
        let key = (owner, name.to_string());
        if self.entries.contains_key(&key) {
            return None;
        }
        let id = TypeParamId { owner, index };
        self.entries.insert(
            key,
            Entry {
                id,
                state: ParamState::BoundsPending,
            },
        );
        Some(id)
    }

    pub fn lookup(&self, owner: ClassId, name: &str) -> Option<TypeParamId> {
        self.entries
            .get(&(owner, name.to_string()))
            .map(|entry| entry.id)
    }

    pub fn complete(&mut self, owner: ClassId, name: &str) {
        if let Some(entry) = self.entries.get_mut(&(owner, name.to_string())) {
            entry.state = ParamState::Complete;
        }
    }

    pub fn state(&self, owner: ClassId, name: &str) -> Option<ParamState> {
        self.entries
            .get(&(owner, name.to_string()))
            .map(|entry| entry.state)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
