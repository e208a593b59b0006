//! # Cell grids
//!
//! A [`CellGrid`] owns the metadata of every cell kind it holds (at most one instance
//! per key) along with the attributes defined over those cells. It is also the entry
//! point for running a [`Query`]: [`CellGrid::query`] drives the pass protocol and
//! dispatches every cell kind through a [`Responders`] registry.
//!
//! ## Visiting order
//!
//! Cell kinds are visited in the order of their keys. Queries should not rely on that
//! order; [`SampleQuery`](crate::query::SampleQuery) for instance keeps its offsets in
//! a map keyed by cell kind.

mod attribute;

pub use attribute::CellAttribute;

use crate::config::{FailurePolicy, NotApplicablePolicy, QueryConfig};
use crate::prelude::*;
use crate::query::{
    Cancelled, FailureKind, FinalizeFailed, InitializeFailed, MaxPasses, PassFailures,
};

use std::collections::BTreeMap;

#[derive(Debug, Default)]
pub struct CellGrid {
    cells: BTreeMap<TypeKey, Box<dyn CellMetadata>>,
    attributes: BTreeMap<String, CellAttribute>,
}

impl CellGrid {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take ownership of `cell`. Returns false, dropping `cell`, when the grid already
    /// holds metadata for the same key.
    pub fn add_cell_metadata(&mut self, cell: Box<dyn CellMetadata>) -> bool {
        let key = cell.type_key();

        if self.cells.contains_key(&key) {
            tracing::debug!(cell = %key, "grid already holds this cell kind");
            return false;
        }

        self.cells.insert(key, cell);
        true
    }

    pub fn remove_cell_metadata(&mut self, key: TypeKey) -> Option<Box<dyn CellMetadata>> {
        self.cells.remove(&key)
    }

    pub fn contains(&self, key: TypeKey) -> bool {
        self.cells.contains_key(&key)
    }

    pub fn get(&self, key: TypeKey) -> Option<&dyn CellMetadata> {
        self.cells.get(&key).map(|cell| cell.as_ref())
    }

    pub fn get_mut(&mut self, key: TypeKey) -> Option<&mut dyn CellMetadata> {
        match self.cells.get_mut(&key) {
            Some(cell) => Some(cell.as_mut()),
            None => None,
        }
    }

    /// the metadata of a statically named cell kind
    pub fn cell_type<T: CellMetadata + Named>(&self) -> Option<&T> {
        self.get(T::KEY)?.downcast_ref::<T>()
    }

    pub fn cell_type_mut<T: CellMetadata + Named>(&mut self) -> Option<&mut T> {
        self.get_mut(T::KEY)?.downcast_mut::<T>()
    }

    pub fn cell_types(&self) -> impl Iterator<Item = &dyn CellMetadata> {
        self.cells.values().map(|cell| cell.as_ref())
    }

    pub fn cell_type_keys(&self) -> impl Iterator<Item = TypeKey> + '_ {
        self.cells.keys().copied()
    }

    pub fn number_of_cell_types(&self) -> usize {
        self.cells.len()
    }

    /// total over every cell kind
    pub fn number_of_cells(&self) -> usize {
        self.cells.values().map(|cell| cell.number_of_cells()).sum()
    }

    /// Add an attribute, returning the one it replaced (attributes are keyed by name).
    pub fn add_attribute(&mut self, attribute: CellAttribute) -> Option<CellAttribute> {
        self.attributes.insert(attribute.name().to_string(), attribute)
    }

    pub fn attribute(&self, name: &str) -> Option<&CellAttribute> {
        self.attributes.get(name)
    }

    pub fn attribute_mut(&mut self, name: &str) -> Option<&mut CellAttribute> {
        self.attributes.get_mut(name)
    }

    pub fn remove_attribute(&mut self, name: &str) -> Option<CellAttribute> {
        self.attributes.remove(name)
    }

    pub fn attributes(&self) -> impl Iterator<Item = &CellAttribute> {
        self.attributes.values()
    }

    /// drop every cell kind and attribute
    pub fn clear(&mut self) {
        self.cells.clear();
        self.attributes.clear();
    }

    /// Run `query` over every cell kind of this grid with the default [`QueryConfig`].
    pub fn query(&self, query: &mut dyn Query, responders: &Responders) -> Result<(), QueryError> {
        self.query_with(query, responders, &QueryConfig::default())
    }

    /// Run `query` over every cell kind of this grid.
    ///
    /// The pass counter is reset and `initialize` called; a false return ends the
    /// query right away and `finalize` is not called. Each pass then advances the
    /// counter, calls `start_pass` and dispatches every cell kind. Passes repeat while
    /// `is_another_pass_required` holds, up to `config.max_passes` (at least one pass
    /// always runs). `finalize` runs once at the end unless the query was aborted.
    pub fn query_with(
        &self,
        query: &mut dyn Query,
        responders: &Responders,
        config: &QueryConfig,
    ) -> Result<(), QueryError> {
        let key = query.type_key();
        let span = tracing::debug_span!("query", query = %key);
        let _enter = span.enter();

        if !query.prepare() {
            tracing::warn!("query failed to initialize");
            return Err(InitializeFailed::new(key).into());
        }

        let mut failures = Vec::new();

        loop {
            if config.is_cancelled() {
                let next = (query.pass_counter().raw() + 1) as usize;
                return Err(Cancelled::new(key, next).into());
            }

            let pass = query.next_pass();
            tracing::debug!(pass, cell_types = self.cells.len(), "starting pass");

            let failures_before = failures.len();

            for cell in self.cells.values() {
                if config.is_cancelled() {
                    return Err(Cancelled::new(key, pass).into());
                }

                let cell = cell.as_ref();

                let failure = match responders.dispatch(query, cell, self) {
                    Dispatch::Responded(true) => None,
                    Dispatch::Responded(false) => Some(FailureKind::Responder),
                    Dispatch::NotApplicable => match config.not_applicable {
                        NotApplicablePolicy::Skip => None,
                        NotApplicablePolicy::Fail => Some(FailureKind::NotApplicable),
                    },
                    Dispatch::Invalid => Some(FailureKind::Invalid),
                };

                if let Some(kind) = failure {
                    let cell = cell.type_key();
                    tracing::warn!(pass, %cell, %kind, "cell kind did not respond");
                    failures.push((pass, cell, kind));

                    if config.failure_policy == FailurePolicy::AbortImmediately {
                        return Err(PassFailures::new(key, failures).into());
                    }
                }
            }

            if failures.len() > failures_before
                && config.failure_policy == FailurePolicy::AbortAfterPass
            {
                return Err(PassFailures::new(key, failures).into());
            }

            if !query.is_another_pass_required() {
                break;
            }

            if pass + 1 >= config.max_passes {
                tracing::warn!(max_passes = config.max_passes, "query exceeded the pass limit");
                return Err(MaxPasses::new(key, config.max_passes).into());
            }
        }

        if !query.finalize() {
            tracing::warn!("query failed to finalize");
            return Err(FinalizeFailed::new(key).into());
        }

        if !failures.is_empty() {
            return Err(PassFailures::new(key, failures).into());
        }

        Ok(())
    }
}
