#![cfg(feature = "derive")]

mod common;

use cellgrid::config::{CancelToken, FailurePolicy, NotApplicablePolicy, QueryConfig};
use cellgrid::prelude::*;
use cellgrid::query::FailureKind;
use cellgrid::QueryError;
use cellgrid::CELL_METADATA;

use common::{TypeX, TypeY, TypeZ};

/// A query recording every hook the pass loop calls.
#[derive(Debug, cellgrid::Named)]
#[cellgrid(name = "Recorder", ancestors("vtkCellGridQuery"))]
struct Recorder {
    passes: PassCounter,
    /// number of passes to request, `None` for forever
    wanted: Option<usize>,
    initialize_ok: bool,
    finalize_ok: bool,
    /// raw counter seen by `initialize`, each `start_pass` and `finalize`
    initialized_at: Option<isize>,
    started: Vec<isize>,
    finalized_at: Option<isize>,
    visits: Vec<(usize, TypeKey)>,
}

impl Recorder {
    fn new(wanted: Option<usize>) -> Self {
        Self {
            passes: PassCounter::new(),
            wanted,
            initialize_ok: true,
            finalize_ok: true,
            initialized_at: None,
            started: Vec::new(),
            finalized_at: None,
            visits: Vec::new(),
        }
    }
}

impl Query for Recorder {
    fn pass_counter(&self) -> &PassCounter {
        &self.passes
    }

    fn pass_counter_mut(&mut self) -> &mut PassCounter {
        &mut self.passes
    }

    fn initialize(&mut self) -> bool {
        self.initialized_at = Some(self.passes.raw());
        self.initialize_ok
    }

    fn start_pass(&mut self) {
        self.started.push(self.passes.raw());
    }

    fn is_another_pass_required(&self) -> bool {
        match (self.wanted, self.pass()) {
            (None, _) => true,
            (Some(wanted), Some(pass)) => pass + 1 < wanted,
            (Some(_), None) => false,
        }
    }

    fn finalize(&mut self) -> bool {
        self.finalized_at = Some(self.passes.raw());
        self.finalize_ok
    }
}

/// Responds for every cell kind, failing for the kinds in `failing`.
fn registry(failing: Vec<TypeKey>) -> Responders {
    let mut responders = Responders::new();
    let responder = cellgrid::responder_fn(move |query, cell, _grid, _responders| {
        let recorder = match query.downcast_mut::<Recorder>() {
            Some(recorder) => recorder,
            None => return false,
        };
        let pass = recorder.pass().unwrap();
        recorder.visits.push((pass, cell.type_key()));
        !failing.contains(&cell.type_key())
    });
    responders
        .register_responder(Recorder::KEY, CELL_METADATA, responder)
        .unwrap();
    responders
}

fn grid() -> CellGrid {
    common::grid_with(vec![
        Box::new(TypeX { cells: 1 }),
        Box::new(TypeY { cells: 1 }),
        Box::new(TypeZ { cells: 1 }),
    ])
}

#[test]
fn counter_advances_by_one_per_pass() {
    let mut query = Recorder::new(Some(3));

    grid().query(&mut query, &registry(Vec::new())).unwrap();

    assert_eq!(query.initialized_at, Some(PassCounter::NOT_STARTED));
    assert_eq!(query.started, vec![0, 1, 2]);
    assert_eq!(query.finalized_at, Some(2));
    assert_eq!(query.pass(), Some(2));
    assert_eq!(query.visits.len(), 9);

    // running again starts from scratch
    query.started.clear();
    grid().query(&mut query, &registry(Vec::new())).unwrap();
    assert_eq!(query.started, vec![0, 1, 2]);
}

#[test]
fn endless_query_hits_the_pass_ceiling() {
    let mut query = Recorder::new(None);
    let config = QueryConfig::default();

    let err = grid().query_with(&mut query, &registry(Vec::new()), &config).unwrap_err();

    match err {
        QueryError::MaxPasses(max) => {
            assert_eq!(max.max_passes, QueryConfig::DEFAULT_MAX_PASSES);
            assert_eq!(max.query, Recorder::KEY);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(query.started.len(), QueryConfig::DEFAULT_MAX_PASSES);
    assert_eq!(query.finalized_at, None);
}

#[test]
fn at_least_one_pass_runs() {
    let mut query = Recorder::new(None);
    let config = QueryConfig::default().with_max_passes(0);

    let err = grid().query_with(&mut query, &registry(Vec::new()), &config).unwrap_err();
    assert!(matches!(err, QueryError::MaxPasses(_)));
    assert_eq!(query.started, vec![0]);
}

#[test]
fn initialize_failure_skips_everything() {
    let mut query = Recorder::new(Some(1));
    query.initialize_ok = false;

    let err = grid().query(&mut query, &registry(Vec::new())).unwrap_err();

    assert!(matches!(err, QueryError::Initialize(_)));
    assert!(query.started.is_empty());
    assert!(query.visits.is_empty());
    assert_eq!(query.finalized_at, None);
}

#[test]
fn finalize_failure_is_reported() {
    let mut query = Recorder::new(Some(1));
    query.finalize_ok = false;

    let err = grid().query(&mut query, &registry(Vec::new())).unwrap_err();

    assert!(matches!(err, QueryError::Finalize(_)));
    assert_eq!(query.visits.len(), 3);
}

#[test]
fn failure_aborts_after_the_pass_by_default() {
    let mut query = Recorder::new(Some(2));

    let err = grid().query(&mut query, &registry(vec![TypeX::KEY])).unwrap_err();

    let failures = match err {
        QueryError::Responders(failures) => failures,
        other => panic!("unexpected error: {other}"),
    };
    assert_eq!(failures.cell_types().collect::<Vec<_>>(), vec![TypeX::KEY]);
    assert_eq!(failures.failures[0].0, 0);
    assert_eq!(failures.failures[0].2, FailureKind::Responder);
    assert!(failures.to_string().contains("TypeX"));

    // every cell kind of the failing pass was still visited, and no further pass ran
    assert_eq!(query.visits.len(), 3);
    assert_eq!(query.started, vec![0]);
    assert_eq!(query.finalized_at, None);
}

#[test]
fn abort_immediately_stops_at_the_first_failure() {
    let config = QueryConfig::default().with_failure_policy(FailurePolicy::AbortImmediately);
    let grid = grid();
    let first = grid.cell_type_keys().next().unwrap();

    let mut query = Recorder::new(Some(2));
    let err = grid.query_with(&mut query, &registry(vec![first]), &config).unwrap_err();

    assert!(matches!(err, QueryError::Responders(_)));
    assert_eq!(query.visits, vec![(0, first)]);
}

#[test]
fn continue_runs_every_pass_and_reports_at_the_end() {
    let config = QueryConfig::default().with_failure_policy(FailurePolicy::Continue);

    let mut query = Recorder::new(Some(2));
    let err = grid()
        .query_with(&mut query, &registry(vec![TypeY::KEY]), &config)
        .unwrap_err();

    let failures = match err {
        QueryError::Responders(failures) => failures,
        other => panic!("unexpected error: {other}"),
    };
    assert_eq!(
        failures.failures.iter().map(|(pass, key, _)| (*pass, *key)).collect::<Vec<_>>(),
        vec![(0, TypeY::KEY), (1, TypeY::KEY)]
    );
    assert_eq!(query.visits.len(), 6);
    assert_eq!(query.finalized_at, Some(1));
}

#[test]
fn missing_responders_are_skipped_unless_strict() {
    // responds for TypeX only
    let mut responders = Responders::new();
    responders
        .register_responder(
            Recorder::KEY,
            TypeX::KEY,
            cellgrid::responder_fn(|_, _, _, _| true),
        )
        .unwrap();

    let mut query = Recorder::new(Some(1));
    grid().query(&mut query, &responders).unwrap();

    let strict = QueryConfig::default().with_not_applicable(NotApplicablePolicy::Fail);
    let err = grid()
        .query_with(&mut query, &responders, &strict)
        .unwrap_err();

    match err {
        QueryError::Responders(failures) => {
            assert_eq!(failures.failures.len(), 2);
            assert!(failures
                .failures
                .iter()
                .all(|(_, _, kind)| *kind == FailureKind::NotApplicable));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn cancelled_before_the_first_pass() {
    let token = CancelToken::new();
    let config = QueryConfig::default().with_cancel_token(token.clone());
    token.cancel();

    let mut query = Recorder::new(Some(1));
    let err = grid().query_with(&mut query, &registry(Vec::new()), &config).unwrap_err();

    match err {
        QueryError::Cancelled(cancelled) => assert_eq!(cancelled.pass, 0),
        other => panic!("unexpected error: {other}"),
    }
    assert!(query.started.is_empty());
}

#[test]
fn cancelled_from_a_responder() {
    let token = CancelToken::new();
    let config = QueryConfig::default().with_cancel_token(token.clone());

    let mut responders = Responders::new();
    let inner = token.clone();
    responders
        .register_responder(
            Recorder::KEY,
            CELL_METADATA,
            cellgrid::responder_fn(move |_, _, _, _| {
                inner.cancel();
                true
            }),
        )
        .unwrap();

    let mut query = Recorder::new(Some(3));
    let err = grid().query_with(&mut query, &responders, &config).unwrap_err();

    match err {
        QueryError::Cancelled(cancelled) => assert_eq!(cancelled.pass, 0),
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(query.started, vec![0]);
}
