//! # Traits
//!
//! The two open axes of the dispatch engine are cell kinds ([`CellMetadata`]) and
//! queries ([`Query`]). Neither knows about the other. A [`Responder`] registered
//! for a (query, cell) pair of keys is what connects them, see
//! [`Responders`](crate::Responders).
//!
//! Every participant identifies itself through [`Typed`]. Types with a single fixed
//! name implement [`Named`] as well, which the `derive` feature can do for you:
//!
//! ```ignore
//! #[derive(cellgrid::Named)]
//! #[cellgrid(name = "vtkDGTet", ancestors("vtkDGCell", "vtkCellMetadata"))]
//! struct Tetrahedra {
//!     cells: usize,
//! }
//! ```

use crate::grid::CellGrid;
use crate::query::PassCounter;
use crate::responders::Responders;
use crate::TypeKey;

use std::any::Any;
use std::fmt;

/// name of the root of every cell kind's inheritance chain
pub const CELL_METADATA: TypeKey = TypeKey::from_name("vtkCellMetadata");

/// name of the root of every query's inheritance chain
pub const CELL_GRID_QUERY: TypeKey = TypeKey::from_name("vtkCellGridQuery");

/// Static naming information for a type.
///
/// `ANCESTORS` lists the keys this type falls back to when no responder is registered
/// for its own key, most specific first. It should not contain `KEY` itself.
///
/// This can also be implemented for trait objects (`impl Named for dyn MyCalculator`)
/// to name a calculator base.
pub trait Named {
    const NAME: &'static str;

    const ANCESTORS: &'static [TypeKey] = &[];

    const KEY: TypeKey = TypeKey::from_name(Self::NAME);
}

/// Object safe identity of a value taking part in dispatch.
///
/// The key may depend on the value: a single Rust type can stand in for several cell
/// kinds.
pub trait Typed: Any {
    fn type_key(&self) -> TypeKey;

    fn type_name(&self) -> &'static str;

    /// fallback keys, most specific first
    fn ancestor_keys(&self) -> &'static [TypeKey];

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// One cell kind as held by one [`CellGrid`].
///
/// The grid owns its metadata and holds at most one instance per type key.
pub trait CellMetadata: Typed + fmt::Debug + Send + Sync {
    fn number_of_cells(&self) -> usize;

    /// used when a grid is rebuilt from a document
    fn set_number_of_cells(&mut self, cells: usize);
}

/// The mutable state carried through a multi-pass traversal of a grid.
///
/// The driving loop owns the pass counter. [`CellGrid::query`] goes through
/// [`prepare`](Query::prepare), which resets the counter and calls `initialize`, and
/// [`next_pass`](Query::next_pass), which advances it and calls `start_pass`. Code
/// driving a query by hand must do the same. Implementors only expose where the
/// counter lives and override the hooks they need.
///
/// ```text
/// prepare ──false──▶ abort
///    │
///    ▼
/// next_pass ─▶ dispatch every cell kind ─▶ another pass required? ─yes─▶ next_pass
///                                                 │no
///                                                 ▼
///                                             finalize
/// ```
pub trait Query: Typed {
    fn pass_counter(&self) -> &PassCounter;

    fn pass_counter_mut(&mut self) -> &mut PassCounter;

    /// reset per-query state. Returning false aborts the query before any pass runs.
    fn initialize(&mut self) -> bool {
        true
    }

    /// called after the counter has been advanced; reset per-pass state here
    fn start_pass(&mut self) {}

    /// must not have side effects
    fn is_another_pass_required(&self) -> bool {
        false
    }

    /// runs once after the last pass
    fn finalize(&mut self) -> bool {
        true
    }

    /// index of the pass in progress, `None` before the first pass
    fn pass(&self) -> Option<usize> {
        self.pass_counter().current()
    }

    /// Reset the counter and call `initialize`.
    fn prepare(&mut self) -> bool {
        self.pass_counter_mut().reset();
        self.initialize()
    }

    /// Advance the counter and call `start_pass`, returning the new pass index.
    fn next_pass(&mut self) -> usize {
        let pass = self.pass_counter_mut().advance();
        self.start_pass();
        pass
    }
}

/// Performs one kind of query for one kind of cell.
///
/// The return value is the responder's verdict: `true` when it did its job (including
/// deciding there was nothing to do), `false` when it failed.
pub trait Responder: Send + Sync {
    fn evaluate(
        &self,
        query: &mut dyn Query,
        cell: &dyn CellMetadata,
        grid: &CellGrid,
        responders: &Responders,
    ) -> bool;
}

impl<F> Responder for F
where
    F: Fn(&mut dyn Query, &dyn CellMetadata, &CellGrid, &Responders) -> bool + Send + Sync,
{
    fn evaluate(
        &self,
        query: &mut dyn Query,
        cell: &dyn CellMetadata,
        grid: &CellGrid,
        responders: &Responders,
    ) -> bool {
        (self)(query, cell, grid, responders)
    }
}

impl<'a> dyn Query + 'a {
    pub fn is<T: Query>(&self) -> bool {
        self.as_any().is::<T>()
    }

    pub fn downcast_ref<T: Query>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    pub fn downcast_mut<T: Query>(&mut self) -> Option<&mut T> {
        self.as_any_mut().downcast_mut::<T>()
    }
}

impl<'a> dyn CellMetadata + 'a {
    pub fn is<T: CellMetadata>(&self) -> bool {
        self.as_any().is::<T>()
    }

    pub fn downcast_ref<T: CellMetadata>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    pub fn downcast_mut<T: CellMetadata>(&mut self) -> Option<&mut T> {
        self.as_any_mut().downcast_mut::<T>()
    }
}
