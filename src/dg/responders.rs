use super::DGCell;
use crate::io::{ArrayRecord, CellTypeRecord};
use crate::prelude::*;
use crate::query::{EvaluateQuery, SamplePhase, SampleQuery, WriteQuery};

use ndarray::parallel::prelude::*;

/// Samples every DG cell at the corners of its reference shape.
///
/// Counts `cells * corners` rows during the count pass, then fills them in parallel.
#[derive(Debug, Clone, Copy, Default)]
pub struct SampleResponder;

impl Responder for SampleResponder {
    fn evaluate(
        &self,
        query: &mut dyn Query,
        cell: &dyn CellMetadata,
        _grid: &CellGrid,
        _responders: &Responders,
    ) -> bool {
        let found = (query.downcast_mut::<SampleQuery>(), cell.downcast_ref::<DGCell>());
        let (sample, dg) = match found {
            (Some(sample), Some(dg)) => (sample, dg),
            _ => {
                let cell = cell.type_key();
                tracing::warn!(cell = %cell, "sample responder called with the wrong types");
                return false;
            }
        };

        let corners = dg.shape().corners();
        let key = cell.type_key();

        match sample.phase() {
            SamplePhase::Count => {
                sample.report_count(key, dg.number_of_cells() * corners.len());
                true
            }
            SamplePhase::Fill => {
                let mut rows = match sample.rows_mut(key) {
                    Some(rows) => rows,
                    None => {
                        tracing::warn!(cell = %key, "no rows were reserved for this cell kind");
                        return false;
                    }
                };

                rows.axis_iter_mut(Axis(0))
                    .into_par_iter()
                    .enumerate()
                    .for_each(|(i, mut row)| {
                        let corner = corners[i % corners.len()];
                        row[0] = (i / corners.len()) as f64;
                        row[1] = corner[0];
                        row[2] = corner[1];
                        row[3] = corner[2];
                    });

                true
            }
        }
    }
}

/// Evaluates an attribute on every DG cell through the `vtkInterpolateCalculator`
/// registered for its shape.
///
/// Cell kinds on which the attribute has no values are skipped. A missing calculator
/// is a failure.
#[derive(Debug, Clone, Copy, Default)]
pub struct EvaluateResponder;

impl Responder for EvaluateResponder {
    fn evaluate(
        &self,
        query: &mut dyn Query,
        cell: &dyn CellMetadata,
        grid: &CellGrid,
        responders: &Responders,
    ) -> bool {
        let found = (query.downcast_mut::<EvaluateQuery>(), cell.downcast_ref::<DGCell>());
        let (evaluate, dg) = match found {
            (Some(evaluate), Some(dg)) => (evaluate, dg),
            _ => {
                let cell = cell.type_key();
                tracing::warn!(cell = %cell, "evaluate responder called with the wrong types");
                return false;
            }
        };

        let key = cell.type_key();

        let attribute = match grid.attribute(evaluate.attribute_name()) {
            Some(attribute) => attribute,
            None => {
                let attribute = evaluate.attribute_name();
                tracing::warn!(attribute, "no such attribute on the grid");
                return false;
            }
        };

        if attribute.array(key).is_none() {
            return true;
        }

        let calculator = match responders.find_calculator::<dyn Interpolate>(cell, attribute) {
            Some(calculator) => calculator,
            None => {
                tracing::warn!(
                    cell = %key,
                    attribute = attribute.name(),
                    tags = %attribute.tags(),
                    "no calculator"
                );
                return false;
            }
        };

        let rst = evaluate.point().unwrap_or_else(|| dg.shape().center());
        let mut values = Array2::zeros((dg.number_of_cells(), attribute.components()));

        let ok = values
            .axis_iter_mut(Axis(0))
            .into_par_iter()
            .enumerate()
            .all(|(cell_id, mut row)| match row.as_slice_mut() {
                Some(out) => calculator.interpolate(cell, attribute, cell_id, rst, out),
                None => false,
            });

        if !ok {
            tracing::warn!(cell = %key, attribute = attribute.name(), "calculator failed");
            return false;
        }

        evaluate.insert_values(key, values);
        true
    }
}

/// Appends any cell kind, with the values of every attribute defined on it, to the
/// document of a [`WriteQuery`].
#[derive(Debug, Clone, Copy, Default)]
pub struct WriteResponder;

impl Responder for WriteResponder {
    fn evaluate(
        &self,
        query: &mut dyn Query,
        cell: &dyn CellMetadata,
        grid: &CellGrid,
        _responders: &Responders,
    ) -> bool {
        let write = match query.downcast_mut::<WriteQuery>() {
            Some(write) => write,
            None => return false,
        };

        let key = cell.type_key();
        let document = write.document_mut();
        let mut arrays = Vec::new();

        for attribute in grid.attributes() {
            document.declare_attribute(attribute);

            if let Some(values) = attribute.array(key) {
                arrays.push(ArrayRecord::new(attribute.name().to_string(), values.clone()));
            }
        }

        document.cell_types.push(CellTypeRecord::new(
            cell.type_name().to_string(),
            cell.number_of_cells(),
            arrays,
        ));

        true
    }
}

/// Interpolator for attributes holding a single coefficient per cell: the value is the
/// same everywhere in the cell.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConstantInterpolator;

impl ConstantInterpolator {
    /// tags an attribute needs to be handled by this calculator
    pub fn tags() -> TagSet {
        TagSet::from(["constant"])
    }
}

impl Interpolate for ConstantInterpolator {
    fn interpolate(
        &self,
        cell: &dyn CellMetadata,
        attribute: &CellAttribute,
        cell_id: usize,
        _rst: [f64; 3],
        out: &mut [f64],
    ) -> bool {
        let components = attribute.components();

        let coefficients = match attribute.array(cell.type_key()) {
            Some(array) if cell_id < array.nrows() && out.len() == components => array.row(cell_id),
            _ => return false,
        };

        coefficients
            .iter()
            .take(components)
            .zip(out.iter_mut())
            .for_each(|(value, out)| *out = *value);

        true
    }
}
