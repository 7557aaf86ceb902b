//! Reference Directory
//!
//! Bidirectional registry of stable id <-> canonical name for one namespace.
//! Append-only while data loads, read-only once the owning database is
//! published. Uses BTreeMap so enumeration is sorted by raw id without an
//! extra sort step.

use std::collections::BTreeMap;

use super::ids::{DataRef, Namespace};
use super::DataError;

/// Name reported for the reserved id `0`.
const INVALID_NAME: &str = "<invalid>";

/// Per-namespace id <-> name registry.
#[derive(Clone, Debug)]
pub struct ReferenceDirectory<T: DataRef> {
    /// id -> canonical name, ordered by raw id
    names: BTreeMap<T, String>,
    /// name -> id, only populated when reverse lookup is enabled
    ids: Option<BTreeMap<String, T>>,
}

impl<T: DataRef> ReferenceDirectory<T> {
    /// Create an empty directory.
    ///
    /// `reverse_lookup` enables [`id_by_name`](Self::id_by_name).
    pub fn new(reverse_lookup: bool) -> Self {
        Self {
            names: BTreeMap::new(),
            ids: reverse_lookup.then(BTreeMap::new),
        }
    }

    /// Namespace of this directory.
    #[inline]
    pub fn namespace(&self) -> Namespace {
        T::NAMESPACE
    }

    /// Whether reverse (name -> id) lookup is supported.
    #[inline]
    pub fn supports_reverse_lookup(&self) -> bool {
        self.ids.is_some()
    }

    /// Register a new entry.
    ///
    /// Fails with [`DataError::DuplicateId`] if the id is already present,
    /// even when the names match, or if the id is the reserved `0`. With
    /// reverse lookup enabled, a name already held by another id fails with
    /// [`DataError::DuplicateName`]. Nothing is inserted on failure.
    pub fn register(&mut self, id: T, name: impl Into<String>) -> Result<(), DataError> {
        let name = name.into();
        if id.raw() == 0 {
            return Err(DataError::DuplicateId {
                namespace: T::NAMESPACE,
                id: 0,
                existing: INVALID_NAME.to_string(),
                name,
            });
        }
        if let Some(existing) = self.names.get(&id) {
            return Err(DataError::DuplicateId {
                namespace: T::NAMESPACE,
                id: id.raw(),
                existing: existing.clone(),
                name,
            });
        }

        if let Some(ids) = &mut self.ids {
            if let Some(existing) = ids.get(&name) {
                return Err(DataError::DuplicateName {
                    namespace: T::NAMESPACE,
                    existing: existing.raw(),
                    id: id.raw(),
                    name,
                });
            }
            ids.insert(name.clone(), id);
        }
        self.names.insert(id, name);
        Ok(())
    }

    /// Look up the canonical name of an id.
    pub fn name_of(&self, id: T) -> Result<&str, DataError> {
        self.names
            .get(&id)
            .map(String::as_str)
            .ok_or(DataError::UnknownId {
                namespace: T::NAMESPACE,
                id: id.raw(),
            })
    }

    /// Look up an id by canonical name.
    ///
    /// Directories created without reverse lookup report every name as
    /// unknown.
    pub fn id_by_name(&self, name: &str) -> Result<T, DataError> {
        self.ids
            .as_ref()
            .and_then(|ids| ids.get(name))
            .copied()
            .ok_or_else(|| DataError::UnknownName {
                namespace: T::NAMESPACE,
                name: name.to_string(),
            })
    }

    /// Check whether an id is registered.
    #[inline]
    pub fn contains(&self, id: T) -> bool {
        self.names.contains_key(&id)
    }

    /// Iterate all registered ids in ascending raw order.
    ///
    /// The iterator is lazy and cheap to clone; each call starts over.
    pub fn enumerate(&self) -> impl Iterator<Item = T> + Clone + '_ {
        self.names.keys().copied()
    }

    /// Number of registered entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Check if the directory is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

// =============================================================================
// TESTS
// =============================================================================
