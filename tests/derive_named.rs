#![cfg(feature = "derive")]

use cellgrid::{Named, Typed, TypeKey, CELL_METADATA};

#[derive(cellgrid::Named)]
struct Plain;

#[derive(cellgrid::Named)]
#[cellgrid(name = "vtkDGTet", ancestors("vtkDGCell", "vtkCellMetadata"))]
struct Tetrahedra {
    _cells: usize,
}

#[derive(cellgrid::Named)]
#[cellgrid(name = "Wrapper")]
struct Wrapper<T: 'static> {
    _inner: T,
}

#[test]
fn name_defaults_to_the_identifier() {
    assert_eq!(Plain::NAME, "Plain");
    assert_eq!(Plain::KEY, TypeKey::from_name("Plain"));
    assert!(Plain::ANCESTORS.is_empty());
}

#[test]
fn explicit_name_and_ancestors() {
    assert_eq!(Tetrahedra::NAME, "vtkDGTet");
    assert_eq!(
        Tetrahedra::ANCESTORS,
        &[TypeKey::from_name("vtkDGCell"), CELL_METADATA]
    );
    assert_eq!(Tetrahedra::KEY, cellgrid::dg::Shape::Tetrahedron.type_key());
}

#[test]
fn typed_forwards_to_named() {
    let tet = Tetrahedra { _cells: 4 };
    let typed: &dyn Typed = &tet;

    assert_eq!(typed.type_key(), Tetrahedra::KEY);
    assert_eq!(typed.type_name(), "vtkDGTet");
    assert_eq!(typed.ancestor_keys(), Tetrahedra::ANCESTORS);
    assert!(typed.as_any().is::<Tetrahedra>());
}

#[test]
fn generic_types_share_one_name() {
    assert_eq!(Wrapper::<u8>::KEY, Wrapper::<f64>::KEY);
    assert_eq!(Wrapper { _inner: 1u8 }.type_name(), "Wrapper");
}
