#![cfg(feature = "derive")]

mod common;

use cellgrid::prelude::*;
use cellgrid::CELL_METADATA;
use cellgrid::CELL_GRID_QUERY;

use common::{logging, ChildX, Nameless, NamelessQuery, QueryA, TypeX, TypeY, TypeZ};

#[test]
fn dispatch_reaches_only_the_matching_cell_kind() {
    let mut responders = Responders::new();
    responders
        .register_responder(QueryA::KEY, TypeX::KEY, logging("x", true))
        .unwrap();
    responders
        .register_responder(QueryA::KEY, TypeY::KEY, logging("y", true))
        .unwrap();

    let grid = CellGrid::new();
    let mut query = QueryA::default();

    let result = responders.dispatch(&mut query, &TypeX::default(), &grid);
    assert_eq!(result, Dispatch::Responded(true));
    assert_eq!(query.log, vec![("x", TypeX::KEY)]);

    let result = responders.dispatch(&mut query, &TypeZ::default(), &grid);
    assert_eq!(result, Dispatch::NotApplicable);
    assert_eq!(query.log.len(), 1);
}

#[test]
fn last_registration_wins() {
    let mut responders = Responders::new();
    responders
        .register_responder(QueryA::KEY, TypeX::KEY, logging("first", false))
        .unwrap();
    responders
        .register_responder(QueryA::KEY, TypeX::KEY, logging("second", true))
        .unwrap();

    assert_eq!(responders.len(), 1);

    let grid = CellGrid::new();
    let mut query = QueryA::default();
    let result = responders.dispatch(&mut query, &TypeX::default(), &grid);

    assert_eq!(result, Dispatch::Responded(true));
    assert_eq!(query.log, vec![("second", TypeX::KEY)]);
}

#[test]
fn dispatch_is_repeatable() {
    let mut responders = Responders::new();
    responders
        .register_responder(QueryA::KEY, TypeX::KEY, logging("x", true))
        .unwrap();

    let grid = CellGrid::new();

    let mut first = QueryA::default();
    let mut second = QueryA::default();

    for cell in [&TypeX::default() as &dyn CellMetadata, &TypeY::default()] {
        let a = responders.dispatch(&mut first, cell, &grid);
        let b = responders.dispatch(&mut second, cell, &grid);
        assert_eq!(a, b);
    }

    assert_eq!(first.log, second.log);
}

#[test]
fn unknown_pair_leaves_the_query_alone() {
    let mut responders = Responders::new();
    responders
        .register_responder(QueryA::KEY, TypeX::KEY, logging("x", true))
        .unwrap();

    let grid = CellGrid::new();
    let mut query = QueryA::default();

    assert_eq!(
        responders.dispatch(&mut query, &TypeZ::default(), &grid),
        Dispatch::NotApplicable
    );
    assert_eq!(query.pass_counter().raw(), PassCounter::NOT_STARTED);
    assert!(query.log.is_empty());

    // an unregistered query on a registered cell kind
    let mut other = NamelessQuery::default();
    assert!(!responders
        .dispatch(&mut other, &TypeX::default(), &grid)
        .is_applicable());
}

#[test]
fn invalid_keys_invoke_nothing() {
    let mut responders = Responders::new();
    // would answer anything if the fallback search ran
    responders
        .register_responder(CELL_GRID_QUERY, CELL_METADATA, logging("root", true))
        .unwrap();

    let grid = CellGrid::new();

    let mut query = QueryA::default();
    assert_eq!(
        responders.dispatch(&mut query, &Nameless::default(), &grid),
        Dispatch::Invalid
    );
    assert!(query.log.is_empty());

    let mut nameless = NamelessQuery::default();
    assert_eq!(
        responders.dispatch(&mut nameless, &TypeX::default(), &grid),
        Dispatch::Invalid
    );

    // registration with the invalid key is refused outright
    assert!(responders
        .register_responder(TypeKey::INVALID, TypeX::KEY, logging("bad", true))
        .is_err());
    assert!(responders
        .register_responder(QueryA::KEY, TypeKey::INVALID, logging("bad", true))
        .is_err());
    assert_eq!(responders.len(), 1);
}

#[test]
fn falls_back_through_cell_ancestors() {
    let mut responders = Responders::new();
    responders
        .register_responder(QueryA::KEY, TypeX::KEY, logging("x", true))
        .unwrap();
    responders
        .register_responder(QueryA::KEY, CELL_METADATA, logging("root", true))
        .unwrap();

    let grid = CellGrid::new();
    let mut query = QueryA::default();

    // most specific ancestor first
    responders.dispatch(&mut query, &ChildX::default(), &grid);
    // only the root matches
    responders.dispatch(&mut query, &TypeZ::default(), &grid);

    assert_eq!(
        query.log,
        vec![("x", ChildX::KEY), ("root", TypeZ::KEY)]
    );
}

#[test]
fn query_key_is_exhausted_before_its_ancestors() {
    let mut responders = Responders::new();
    responders
        .register_responder(CELL_GRID_QUERY, TypeX::KEY, logging("generic query", true))
        .unwrap();
    responders
        .register_responder(QueryA::KEY, CELL_METADATA, logging("generic cell", true))
        .unwrap();

    let found = responders
        .find_responder(QueryA::KEY, QueryA::ANCESTORS, TypeX::KEY, TypeX::ANCESTORS)
        .map(|(pair, _)| pair);
    assert_eq!(found, Some((QueryA::KEY, CELL_METADATA)));

    // the generic query entry answers cell kinds that have nothing better
    let found = responders
        .find_responder(
            TypeKey::from_name("QueryB"),
            &[CELL_GRID_QUERY],
            TypeX::KEY,
            TypeX::ANCESTORS,
        )
        .map(|(pair, _)| pair);
    assert_eq!(found, Some((CELL_GRID_QUERY, TypeX::KEY)));
}

#[test]
fn grid_query_visits_every_cell_kind_in_key_order() {
    let mut responders = Responders::new();
    responders
        .register_responder(QueryA::KEY, CELL_METADATA, logging("root", true))
        .unwrap();

    let grid = common::grid_with(vec![
        Box::new(TypeZ { cells: 1 }),
        Box::new(TypeX { cells: 2 }),
        Box::new(TypeY { cells: 3 }),
    ]);
    assert_eq!(grid.number_of_cells(), 6);

    let mut query = QueryA::default();
    grid.query(&mut query, &responders).unwrap();

    let visited: Vec<TypeKey> = query.log.iter().map(|(_, key)| *key).collect();
    let mut expected = vec![TypeX::KEY, TypeY::KEY, TypeZ::KEY];
    expected.sort();
    assert_eq!(visited, expected);
}
