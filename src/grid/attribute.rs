use crate::prelude::*;

use std::collections::BTreeMap;

/// A field defined over the cells of a grid.
///
/// Values are stored per cell kind as a 2D array with one row per cell. The columns
/// hold the coefficients of the attribute on that cell, `components()` values per
/// coefficient. How coefficients turn into values is up to the calculator selected by
/// the attribute's tags.
#[derive(Debug, Clone, PartialEq)]
pub struct CellAttribute {
    name: String,
    tags: TagSet,
    components: usize,
    arrays: BTreeMap<TypeKey, Array2<f64>>,
}

impl CellAttribute {
    pub fn new<T: Into<String>>(name: T, tags: TagSet, components: usize) -> Self {
        Self {
            name: name.into(),
            tags,
            components,
            arrays: BTreeMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn tags(&self) -> &TagSet {
        &self.tags
    }

    pub fn components(&self) -> usize {
        self.components
    }

    /// Set the coefficients for one cell kind, replacing any previous array.
    ///
    /// Returns false (and stores nothing) when the number of columns is not a
    /// non-zero multiple of the number of components.
    pub fn set_array(&mut self, cell: TypeKey, array: Array2<f64>) -> bool {
        let columns = array.ncols();

        if self.components == 0 || columns == 0 || columns % self.components != 0 {
            tracing::warn!(
                attribute = %self.name,
                cell = %cell,
                columns,
                components = self.components,
                "coefficient array does not match the attribute's components"
            );
            return false;
        }

        self.arrays.insert(cell, array);
        true
    }

    pub fn array(&self, cell: TypeKey) -> Option<&Array2<f64>> {
        self.arrays.get(&cell)
    }

    pub fn remove_array(&mut self, cell: TypeKey) -> Option<Array2<f64>> {
        self.arrays.remove(&cell)
    }

    /// coefficients per cell for one cell kind
    pub fn coefficients(&self, cell: TypeKey) -> Option<usize> {
        self.arrays.get(&cell).map(|array| array.ncols() / self.components)
    }

    pub fn arrays(&self) -> impl Iterator<Item = (TypeKey, &Array2<f64>)> {
        self.arrays.iter().map(|(key, array)| (*key, array))
    }
}
