//! # Discontinuous Galerkin cells
//!
//! Built-in cell kinds, one per reference [`Shape`], all represented by [`DGCell`].
//! Every shape inherits from the abstract `vtkDGCell` kind, which is where the
//! responders of this module are registered:
//!
//! | query                  | registered at     | responder            |
//! |------------------------|-------------------|----------------------|
//! | `vtkCellGridSampleQuery` | `vtkDGCell`       | [`SampleResponder`]   |
//! | `vtkCellGridEvaluator`   | `vtkDGCell`       | [`EvaluateResponder`] |
//! | `vtkCellGridIOQuery`     | `vtkCellMetadata` | [`WriteResponder`]    |
//!
//! A crate adding a new shape only has to register its cell kind with `vtkDGCell` among
//! its ancestors to get all three.

mod responders;
mod shape;

pub use responders::{ConstantInterpolator, EvaluateResponder, SampleResponder, WriteResponder};
pub use shape::Shape;

use crate::prelude::*;
use crate::query::{EvaluateQuery, SampleQuery, WriteQuery};
use crate::traits::CELL_METADATA;

/// abstract parent of every DG shape
pub const DG_CELL: TypeKey = TypeKey::from_name("vtkDGCell");

pub const DG_ANCESTORS: &[TypeKey] = &[DG_CELL, CELL_METADATA];

/// Metadata of the cells of one DG shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DGCell {
    shape: Shape,
    cells: usize,
}

impl DGCell {
    pub fn new(shape: Shape, cells: usize) -> Self {
        Self { shape, cells }
    }

    pub fn shape(&self) -> Shape {
        self.shape
    }
}

impl Typed for DGCell {
    fn type_key(&self) -> TypeKey {
        self.shape.type_key()
    }

    fn type_name(&self) -> &'static str {
        self.shape.name()
    }

    fn ancestor_keys(&self) -> &'static [TypeKey] {
        DG_ANCESTORS
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

impl CellMetadata for DGCell {
    fn number_of_cells(&self) -> usize {
        self.cells
    }

    fn set_number_of_cells(&mut self, cells: usize) {
        self.cells = cells;
    }
}

/// Register every DG shape along with its responders and the constant calculator.
pub fn register(registry: &mut Registry) -> Result<(), RegistrationError> {
    for shape in Shape::ALL {
        registry
            .cell_types
            .register_type(shape.type_key(), DG_ANCESTORS, move |_| {
                Some(Box::new(DGCell::new(shape, 0)) as Box<dyn CellMetadata>)
            });
    }

    let responders = &mut registry.responders;
    responders.register_responder(SampleQuery::KEY, DG_CELL, Arc::new(SampleResponder))?;
    responders.register_responder(EvaluateQuery::KEY, DG_CELL, Arc::new(EvaluateResponder))?;
    responders.register_responder(WriteQuery::KEY, CELL_METADATA, Arc::new(WriteResponder))?;

    let constant: Arc<dyn Interpolate> = Arc::new(ConstantInterpolator);
    let tags = ConstantInterpolator::tags();
    responders.register_calculator_for::<dyn Interpolate>(DG_CELL, tags, constant)?;

    Ok(())
}
