#![allow(dead_code)]

use cellgrid::prelude::*;
use std::any::Any;

#[derive(Debug, Default, cellgrid::Named)]
#[cellgrid(name = "TypeX", ancestors("vtkCellMetadata"))]
pub struct TypeX {
    pub cells: usize,
}

#[derive(Debug, Default, cellgrid::Named)]
#[cellgrid(name = "TypeY", ancestors("vtkCellMetadata"))]
pub struct TypeY {
    pub cells: usize,
}

#[derive(Debug, Default, cellgrid::Named)]
#[cellgrid(name = "TypeZ", ancestors("vtkCellMetadata"))]
pub struct TypeZ {
    pub cells: usize,
}

/// a specialization of `TypeX`
#[derive(Debug, Default, cellgrid::Named)]
#[cellgrid(name = "ChildX", ancestors("TypeX", "vtkCellMetadata"))]
pub struct ChildX {
    pub cells: usize,
}

macro_rules! cell_metadata {
    ($($type:ty),*) => {
        $(
            impl CellMetadata for $type {
                fn number_of_cells(&self) -> usize {
                    self.cells
                }

                fn set_number_of_cells(&mut self, cells: usize) {
                    self.cells = cells;
                }
            }
        )*
    };
}

cell_metadata!(TypeX, TypeY, TypeZ, ChildX, Nameless);

/// a cell kind reporting the invalid key
#[derive(Debug, Default)]
pub struct Nameless {
    pub cells: usize,
}

impl Typed for Nameless {
    fn type_key(&self) -> TypeKey {
        TypeKey::INVALID
    }

    fn type_name(&self) -> &'static str {
        ""
    }

    fn ancestor_keys(&self) -> &'static [TypeKey] {
        &[]
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// records which responders ran, in order
#[derive(Debug, Default, cellgrid::Named)]
#[cellgrid(name = "QueryA", ancestors("vtkCellGridQuery"))]
pub struct QueryA {
    pub passes: PassCounter,
    pub log: Vec<(&'static str, TypeKey)>,
}

impl Query for QueryA {
    fn pass_counter(&self) -> &PassCounter {
        &self.passes
    }

    fn pass_counter_mut(&mut self) -> &mut PassCounter {
        &mut self.passes
    }
}

/// a query reporting the invalid key
#[derive(Debug, Default)]
pub struct NamelessQuery {
    pub passes: PassCounter,
}

impl Typed for NamelessQuery {
    fn type_key(&self) -> TypeKey {
        TypeKey::INVALID
    }

    fn type_name(&self) -> &'static str {
        ""
    }

    fn ancestor_keys(&self) -> &'static [TypeKey] {
        &[]
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

impl Query for NamelessQuery {
    fn pass_counter(&self) -> &PassCounter {
        &self.passes
    }

    fn pass_counter_mut(&mut self) -> &mut PassCounter {
        &mut self.passes
    }
}

/// A responder that appends `label` to the log of a [`QueryA`] and returns `verdict`.
pub fn logging(label: &'static str, verdict: bool) -> std::sync::Arc<dyn Responder> {
    cellgrid::responder_fn(move |query, cell, _grid, _responders| {
        match query.downcast_mut::<QueryA>() {
            Some(query) => {
                query.log.push((label, cell.type_key()));
                verdict
            }
            None => false,
        }
    })
}

/// a grid holding one instance of each of the given cell kinds
pub fn grid_with(cells: Vec<Box<dyn CellMetadata>>) -> CellGrid {
    let mut grid = CellGrid::new();
    for cell in cells {
        assert!(grid.add_cell_metadata(cell));
    }
    grid
}
