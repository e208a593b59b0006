use crate::io::Document;
use crate::prelude::*;
use crate::traits::CELL_GRID_QUERY;

/// Collect a grid into a [`Document`].
///
/// Responders append one record per cell kind along with the declarations of the
/// attributes that have values on it. The document is sorted when the query
/// finalizes so its content does not depend on visiting order.
#[derive(Debug, Default)]
pub struct WriteQuery {
    passes: PassCounter,
    document: Document,
}

impl WriteQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    pub fn into_document(self) -> Document {
        self.document
    }
}

impl Named for WriteQuery {
    const NAME: &'static str = "vtkCellGridIOQuery";
    const ANCESTORS: &'static [TypeKey] = &[CELL_GRID_QUERY];
}

crate::impl_typed!(WriteQuery);

impl Query for WriteQuery {
    fn pass_counter(&self) -> &PassCounter {
        &self.passes
    }

    fn pass_counter_mut(&mut self) -> &mut PassCounter {
        &mut self.passes
    }

    fn initialize(&mut self) -> bool {
        self.document = Document::default();
        true
    }

    fn finalize(&mut self) -> bool {
        self.document.sort();
        true
    }
}
