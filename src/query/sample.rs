use crate::prelude::*;
use crate::traits::CELL_GRID_QUERY;

use std::collections::BTreeMap;

/// Which half of the count/fill protocol a [`SampleQuery`] is in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SamplePhase {
    /// pass 0: responders report how many rows they will write
    Count,
    /// pass 1: responders write their rows
    Fill,
}

/// Samples every cell at a set of parametric points chosen by its responder.
///
/// The output is a single `rows x 4` array of `[cell id, r, s, t]`. Each cell kind
/// owns a contiguous block of rows; blocks are laid out in key order, so the layout
/// does not depend on the order in which cell kinds were visited.
#[derive(Debug)]
pub struct SampleQuery {
    passes: PassCounter,
    counts: BTreeMap<TypeKey, usize>,
    offsets: BTreeMap<TypeKey, usize>,
    output: Array2<f64>,
}

impl SampleQuery {
    /// columns of the output: cell id followed by the parametric coordinates
    pub const COLUMNS: usize = 4;

    pub fn new() -> Self {
        Self {
            passes: PassCounter::new(),
            counts: BTreeMap::new(),
            offsets: BTreeMap::new(),
            output: Array2::zeros((0, Self::COLUMNS)),
        }
    }

    pub fn phase(&self) -> SamplePhase {
        match self.pass() {
            None | Some(0) => SamplePhase::Count,
            Some(_) => SamplePhase::Fill,
        }
    }

    /// Record how many rows `cell` will write. Only meaningful during the count pass;
    /// a second report for the same kind replaces the first.
    pub fn report_count(&mut self, cell: TypeKey, rows: usize) {
        if self.phase() != SamplePhase::Count {
            tracing::warn!(cell = %cell, "row count reported outside of the count pass");
            return;
        }
        self.counts.insert(cell, rows);
    }

    pub fn count(&self, cell: TypeKey) -> Option<usize> {
        self.counts.get(&cell).copied()
    }

    /// first output row of `cell`, available once the fill pass has started
    pub fn offset(&self, cell: TypeKey) -> Option<usize> {
        self.offsets.get(&cell).copied()
    }

    pub fn offsets(&self) -> &BTreeMap<TypeKey, usize> {
        &self.offsets
    }

    pub fn total_rows(&self) -> usize {
        self.counts.values().sum()
    }

    /// the block of rows owned by `cell`
    pub fn rows(&self, cell: TypeKey) -> Option<ArrayView2<'_, f64>> {
        let (start, count) = self.block(cell)?;
        Some(self.output.slice(s![start..start + count, ..]))
    }

    /// The block of rows `cell` has to fill. `None` outside of the fill pass or when
    /// the kind reported no count.
    pub fn rows_mut(&mut self, cell: TypeKey) -> Option<ArrayViewMut2<'_, f64>> {
        if self.phase() != SamplePhase::Fill {
            return None;
        }
        let (start, count) = self.block(cell)?;
        Some(self.output.slice_mut(s![start..start + count, ..]))
    }

    pub fn output(&self) -> &Array2<f64> {
        &self.output
    }

    pub fn into_output(self) -> Array2<f64> {
        self.output
    }

    fn block(&self, cell: TypeKey) -> Option<(usize, usize)> {
        let start = *self.offsets.get(&cell)?;
        let count = *self.counts.get(&cell)?;
        Some((start, count))
    }

    // prefix sum over the counts in key order
    fn assign_offsets(&mut self) {
        self.offsets.clear();

        let mut next = 0;
        for (cell, count) in &self.counts {
            self.offsets.insert(*cell, next);
            next += count;
        }

        self.output = Array2::zeros((next, Self::COLUMNS));
        tracing::debug!(rows = next, cell_types = self.counts.len(), "allocated sample output");
    }
}

impl Default for SampleQuery {
    fn default() -> Self {
        Self::new()
    }
}

impl Named for SampleQuery {
    const NAME: &'static str = "vtkCellGridSampleQuery";
    const ANCESTORS: &'static [TypeKey] = &[CELL_GRID_QUERY];
}

crate::impl_typed!(SampleQuery);

impl Query for SampleQuery {
    fn pass_counter(&self) -> &PassCounter {
        &self.passes
    }

    fn pass_counter_mut(&mut self) -> &mut PassCounter {
        &mut self.passes
    }

    fn initialize(&mut self) -> bool {
        self.counts.clear();
        self.offsets.clear();
        self.output = Array2::zeros((0, Self::COLUMNS));
        true
    }

    fn start_pass(&mut self) {
        if self.phase() == SamplePhase::Fill {
            self.assign_offsets();
        }
    }

    fn is_another_pass_required(&self) -> bool {
        self.phase() == SamplePhase::Count
    }
}
