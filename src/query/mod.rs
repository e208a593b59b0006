//! # Queries
//!
//! A query is run over a [`CellGrid`](crate::CellGrid) with
//! [`CellGrid::query`](crate::CellGrid::query). The grid drives the pass protocol
//! described on the [`Query`](crate::Query) trait and asks the
//! [`Responders`](crate::Responders) registry to find a responder for every cell kind
//! it holds.
//!
//! Three concrete queries ship with the crate:
//!
//! * [`SampleQuery`]: two passes. The first pass counts how many rows each cell kind
//!   will produce, the second fills a pre-sized output buffer.
//! * [`EvaluateQuery`]: evaluates an attribute through the calculator registry.
//! * [`WriteQuery`]: collects a [`Document`](crate::io::Document) that can be written
//!   to xml.

mod error;
mod evaluate;
mod sample;
mod write;

pub use error::{
    Cancelled, FailureKind, FinalizeFailed, InitializeFailed, MaxPasses, PassFailures, QueryError,
};
pub use evaluate::EvaluateQuery;
pub use sample::{SampleQuery, SamplePhase};
pub use write::WriteQuery;

/// Pass index of a query. Starts below zero so that the first advance yields pass `0`.
///
/// Whoever drives a query owns its counter: reset it before `initialize` and advance
/// it before every `start_pass`. [`Query::prepare`](crate::Query::prepare) and
/// [`Query::next_pass`](crate::Query::next_pass) do both.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PassCounter {
    pass: isize,
}

impl PassCounter {
    pub const NOT_STARTED: isize = -1;

    pub fn new() -> Self {
        Self {
            pass: Self::NOT_STARTED,
        }
    }

    pub fn reset(&mut self) {
        self.pass = Self::NOT_STARTED;
    }

    /// move to the next pass and return its index
    pub fn advance(&mut self) -> usize {
        self.pass += 1;
        self.pass as usize
    }

    /// the raw counter, `-1` before the first pass
    pub fn raw(&self) -> isize {
        self.pass
    }

    pub fn current(&self) -> Option<usize> {
        if self.pass < 0 {
            None
        } else {
            Some(self.pass as usize)
        }
    }
}

impl Default for PassCounter {
    fn default() -> Self {
        Self::new()
    }
}
