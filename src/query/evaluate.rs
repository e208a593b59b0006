use crate::prelude::*;
use crate::traits::CELL_GRID_QUERY;

use std::collections::BTreeMap;

/// Evaluate one attribute on every cell at a single parametric point.
///
/// Responders pick the calculator for each cell kind through
/// [`Responders::find_calculator`]. Results are stored per cell kind as a
/// `cells x components` array.
#[derive(Debug)]
pub struct EvaluateQuery {
    passes: PassCounter,
    attribute: String,
    point: Option<[f64; 3]>,
    values: BTreeMap<TypeKey, Array2<f64>>,
}

impl EvaluateQuery {
    /// evaluate at the parametric center of every cell
    pub fn new<T: Into<String>>(attribute: T) -> Self {
        Self {
            passes: PassCounter::new(),
            attribute: attribute.into(),
            point: None,
            values: BTreeMap::new(),
        }
    }

    /// evaluate at the parametric point `rst` of every cell
    pub fn at<T: Into<String>>(attribute: T, rst: [f64; 3]) -> Self {
        Self {
            point: Some(rst),
            ..Self::new(attribute)
        }
    }

    pub fn attribute_name(&self) -> &str {
        &self.attribute
    }

    pub fn point(&self) -> Option<[f64; 3]> {
        self.point
    }

    pub fn insert_values(&mut self, cell: TypeKey, values: Array2<f64>) {
        self.values.insert(cell, values);
    }

    pub fn values(&self, cell: TypeKey) -> Option<&Array2<f64>> {
        self.values.get(&cell)
    }

    pub fn iter(&self) -> impl Iterator<Item = (TypeKey, &Array2<f64>)> {
        self.values.iter().map(|(key, values)| (*key, values))
    }
}

impl Named for EvaluateQuery {
    const NAME: &'static str = "vtkCellGridEvaluator";
    const ANCESTORS: &'static [TypeKey] = &[CELL_GRID_QUERY];
}

crate::impl_typed!(EvaluateQuery);

impl Query for EvaluateQuery {
    fn pass_counter(&self) -> &PassCounter {
        &self.passes
    }

    fn pass_counter_mut(&mut self) -> &mut PassCounter {
        &mut self.passes
    }

    fn initialize(&mut self) -> bool {
        self.values.clear();
        !self.attribute.is_empty()
    }
}
