//! # Calculators
//!
//! A calculator is a responder-like object that evaluates an attribute on a single
//! cell. Calculators are registered per (calculator base, cell kind, tag set), see
//! [`Responders::register_calculator`](crate::Responders::register_calculator).
//!
//! A calculator base is a trait. It is named by implementing [`Named`] for its trait
//! object type, which is also what makes the registry able to hand back a typed
//! `Arc<dyn Base>`:
//!
//! ```ignore
//! pub trait Bounds: Send + Sync {
//!     fn bounds(&self, cell: &dyn CellMetadata, attribute: &CellAttribute) -> [f64; 6];
//! }
//!
//! impl cellgrid::Named for dyn Bounds {
//!     const NAME: &'static str = "vtkBoundsCalculator";
//! }
//! ```

use crate::prelude::*;

/// root of every calculator base's inheritance chain
pub const CELL_ATTRIBUTE_CALCULATOR: TypeKey = TypeKey::from_name("vtkCellAttributeCalculator");

/// Evaluate an attribute on one cell at a parametric point.
pub trait Interpolate: Send + Sync {
    /// Write the value of `attribute` on `cell_id` at `rst` into `out`, which holds
    /// `attribute.components()` values. Returns false when the point cannot be
    /// evaluated.
    fn interpolate(
        &self,
        cell: &dyn CellMetadata,
        attribute: &CellAttribute,
        cell_id: usize,
        rst: [f64; 3],
        out: &mut [f64],
    ) -> bool;
}

impl Named for dyn Interpolate {
    const NAME: &'static str = "vtkInterpolateCalculator";
    const ANCESTORS: &'static [TypeKey] = &[CELL_ATTRIBUTE_CALCULATOR];
}
