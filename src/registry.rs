//! # Registry
//!
//! [`Registry`] bundles the cell kind factories and the responders. The intended
//! use is to build one during startup, register every cell kind, responder and
//! calculator, and then share it read-only with the code running queries:
//!
//! ```ignore
//! let mut registry = cellgrid::Registry::with_builtins();
//! registry.responders.register_query_responder::<MyCell, MyQuery, _>(MyResponder)?;
//!
//! let mut query = cellgrid::query::SampleQuery::new();
//! grid.query(&mut query, &registry.responders)?;
//! ```
//!
//! For code that cannot thread a registry through, [`global`] offers a lazily created
//! process wide instance behind a read-write lock. Registration should be finished
//! before queries start; the lock only protects against concurrent setup.

use crate::metadata::CellTypeRegistry;
use crate::prelude::*;

use parking_lot::RwLock;
use std::sync::OnceLock;

#[derive(Default, Debug)]
pub struct Registry {
    pub cell_types: CellTypeRegistry,
    pub responders: Responders,
}

impl Registry {
    /// an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// a registry with the DG cell kinds, their responders and calculators
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        if let Err(e) = crate::dg::register(&mut registry) {
            tracing::error!("failed to register the built-in cell kinds: {e}");
        }
        registry
    }

    /// drop every registration; meant for shutdown and test isolation
    pub fn clear(&mut self) {
        self.cell_types.clear();
        self.responders.clear();
    }
}

impl AsRef<Responders> for Registry {
    fn as_ref(&self) -> &Responders {
        &self.responders
    }
}

static GLOBAL: OnceLock<RwLock<Registry>> = OnceLock::new();

/// The process wide registry, created with the built-in cell kinds on first use.
pub fn global() -> &'static RwLock<Registry> {
    GLOBAL.get_or_init(|| {
        tracing::debug!("creating the global registry");
        RwLock::new(Registry::with_builtins())
    })
}

/// empty the process wide registry
pub fn clear_global() {
    global().write().clear()
}
