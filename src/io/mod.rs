//! # Reading and writing grids
//!
//! The [`WriteQuery`](crate::query::WriteQuery) turns a grid into a [`Document`], a
//! plain description of its cell kinds and attribute values. A document can be
//! written to xml with [`write_document`] and read back with [`read_document`]:
//!
//! ```text
//! <?xml version="1.0" encoding="UTF-8"?>
//! <CellGrid version="1.0">
//!     <Attribute Name="u" Tags="constant" NumberOfComponents="1"/>
//!     <CellType Name="vtkDGTet" NumberOfCells="3">
//!         <DataArray Attribute="u" NumberOfColumns="1" format="ascii">1 2 3 </DataArray>
//!     </CellType>
//! </CellGrid>
//! ```
//!
//! [`Document::into_grid`] rebuilds a [`CellGrid`] by constructing every cell kind
//! through the [`CellTypeRegistry`](crate::metadata::CellTypeRegistry), so only kinds
//! registered with the given [`Registry`] can be read.

mod error;
mod event_summary;
mod read;
mod write;

pub use error::{GridError, ReadError};
pub use read::{read_document, read_document_from_str};
pub use write::{write_document, Encoding};

use crate::prelude::*;

/// Declaration of one attribute of the grid.
#[derive(Debug, Clone, PartialEq, Constructor)]
pub struct AttributeRecord {
    pub name: String,
    pub tags: TagSet,
    pub components: usize,
}

/// The values of one attribute on one cell kind, one row per cell.
#[derive(Debug, Clone, PartialEq, Constructor)]
pub struct ArrayRecord {
    pub attribute: String,
    pub values: Array2<f64>,
}

/// One cell kind of the grid.
#[derive(Debug, Clone, PartialEq, Constructor)]
pub struct CellTypeRecord {
    pub name: String,
    pub cells: usize,
    pub arrays: Vec<ArrayRecord>,
}

/// Generic description of a grid, independent of the file format.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    pub attributes: Vec<AttributeRecord>,
    pub cell_types: Vec<CellTypeRecord>,
}

impl Document {
    /// add an attribute declaration unless one with the same name exists
    pub fn declare_attribute(&mut self, attribute: &CellAttribute) {
        if self.attribute(attribute.name()).is_none() {
            self.attributes.push(AttributeRecord::new(
                attribute.name().to_string(),
                attribute.tags().clone(),
                attribute.components(),
            ));
        }
    }

    pub fn attribute(&self, name: &str) -> Option<&AttributeRecord> {
        self.attributes.iter().find(|record| record.name == name)
    }

    pub fn cell_type(&self, name: &str) -> Option<&CellTypeRecord> {
        self.cell_types.iter().find(|record| record.name == name)
    }

    /// order attributes, cell kinds and arrays by name
    pub fn sort(&mut self) {
        self.attributes.sort_by(|a, b| a.name.cmp(&b.name));
        self.cell_types.sort_by(|a, b| a.name.cmp(&b.name));
        for record in &mut self.cell_types {
            record.arrays.sort_by(|a, b| a.attribute.cmp(&b.attribute));
        }
    }

    /// Rebuild a grid, constructing each cell kind through `registry`.
    pub fn into_grid(self, registry: &Registry) -> Result<CellGrid, GridError> {
        let mut grid = CellGrid::new();

        for attribute in self.attributes {
            grid.add_attribute(CellAttribute::new(
                attribute.name,
                attribute.tags,
                attribute.components,
            ));
        }

        for record in self.cell_types {
            let key = registry
                .cell_types
                .lookup(&record.name)
                .map(|descriptor| descriptor.key())
                .ok_or_else(|| error::UnknownCellType::new(record.name.clone()))?;

            // two records of one kind would merge into a single metadata instance
            if grid.contains(key) {
                return Err(error::DuplicateCellType::new(record.name).into());
            }

            let cell = registry
                .cell_types
                .construct(key, &mut grid)
                .ok_or_else(|| error::ConstructFailed::new(record.name.clone()))?;
            cell.set_number_of_cells(record.cells);

            for array in record.arrays {
                let attribute = grid.attribute_mut(&array.attribute).ok_or_else(|| {
                    error::UnknownAttribute::new(array.attribute.clone(), record.name.clone())
                })?;

                let rows = array.values.nrows();
                if rows != record.cells || !attribute.set_array(key, array.values) {
                    let (name, cells) = (record.name.clone(), record.cells);
                    return Err(error::ArrayShape::new(array.attribute, name, rows, cells).into());
                }
            }
        }

        Ok(grid)
    }
}
