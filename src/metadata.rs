//! # Cell kinds
//!
//! The [`CellTypeRegistry`] maps the key of every known cell kind to a factory able to
//! build metadata for it inside a particular [`CellGrid`]. It is filled once, when the
//! crates providing cell kinds are set up, and only read afterwards.
//!
//! Registration is idempotent: registering a key twice keeps the first factory.

use crate::prelude::*;

use rustc_hash::FxHashMap;
use std::collections::BTreeSet;
use std::fmt;

/// builds the metadata of one cell kind for the grid that will own it
pub type Factory = Arc<dyn Fn(&CellGrid) -> Option<Box<dyn CellMetadata>> + Send + Sync>;

/// Process wide description of one cell kind.
#[derive(Clone)]
pub struct CellTypeDescriptor {
    key: TypeKey,
    ancestors: &'static [TypeKey],
    factory: Factory,
}

impl CellTypeDescriptor {
    pub fn key(&self) -> TypeKey {
        self.key
    }

    /// declared inheritance chain, most specific first
    pub fn ancestors(&self) -> &'static [TypeKey] {
        self.ancestors
    }
}

impl fmt::Debug for CellTypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CellTypeDescriptor")
            .field("key", &self.key)
            .field("ancestors", &self.ancestors)
            .finish_non_exhaustive()
    }
}

#[derive(Default, Debug)]
pub struct CellTypeRegistry {
    descriptors: FxHashMap<TypeKey, CellTypeDescriptor>,
}

impl CellTypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a factory for `key` if none is registered yet.
    ///
    /// Returns whether the insertion happened; `false` means the kind was already
    /// known (or the key is invalid), which is not an error.
    pub fn register_type<F>(
        &mut self,
        key: TypeKey,
        ancestors: &'static [TypeKey],
        factory: F,
    ) -> bool
    where
        F: Fn(&CellGrid) -> Option<Box<dyn CellMetadata>> + Send + Sync + 'static,
    {
        if !key.is_valid() {
            tracing::warn!("refusing to register a cell kind with an invalid key");
            return false;
        }

        if self.descriptors.contains_key(&key) {
            tracing::trace!(cell = %key, "cell kind already registered");
            return false;
        }

        tracing::debug!(cell = %key, "registered cell kind");

        self.descriptors.insert(
            key,
            CellTypeDescriptor {
                key,
                ancestors,
                factory: Arc::new(factory),
            },
        );

        true
    }

    /// register a statically named cell kind built with `Default`
    pub fn register<T>(&mut self) -> bool
    where
        T: Named + CellMetadata + Default,
    {
        self.register_type(T::KEY, T::ANCESTORS, |_| {
            Some(Box::new(T::default()) as Box<dyn CellMetadata>)
        })
    }

    /// Build the metadata for `key` and hand it to `owner`.
    ///
    /// When `owner` already holds this cell kind, the new instance is dropped and the
    /// existing one is returned. `None` if the kind is unknown, the factory declines, or
    /// the factory builds metadata whose key or ancestors differ from the registration.
    pub fn construct<'g>(
        &self,
        key: TypeKey,
        owner: &'g mut CellGrid,
    ) -> Option<&'g mut dyn CellMetadata> {
        let descriptor = self.descriptors.get(&key)?;

        if owner.contains(key) {
            tracing::debug!(cell = %key, "grid already holds this cell kind");
            return owner.get_mut(key);
        }

        let cell = (descriptor.factory)(owner)?;

        if cell.type_key() != key {
            tracing::warn!(
                cell = %key,
                built = %cell.type_key(),
                "factory built metadata for a different cell kind"
            );
            return None;
        }

        if cell.ancestor_keys() != descriptor.ancestors {
            tracing::warn!(
                cell = %key,
                "factory built metadata whose inheritance differs from the registered one"
            );
            return None;
        }

        owner.add_cell_metadata(cell);
        owner.get_mut(key)
    }

    pub fn contains(&self, key: TypeKey) -> bool {
        self.descriptors.contains_key(&key)
    }

    pub fn descriptor(&self, key: TypeKey) -> Option<&CellTypeDescriptor> {
        self.descriptors.get(&key)
    }

    /// The registered descriptor for a name only known at runtime.
    ///
    /// Hashed keys carry no name, this returns the descriptor whose key does.
    pub fn lookup(&self, name: &str) -> Option<&CellTypeDescriptor> {
        self.descriptors.get(&TypeKey::hashed(name))
    }

    pub fn inheritance(&self, key: TypeKey) -> Option<&'static [TypeKey]> {
        self.descriptors.get(&key).map(|d| d.ancestors)
    }

    pub fn all_registered_keys(&self) -> BTreeSet<TypeKey> {
        self.descriptors.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// drop every registration; meant for shutdown and test isolation
    pub fn clear(&mut self) {
        self.descriptors.clear()
    }
}
