#![doc = include_str!("../README.md")]

// lets the derive macro name `cellgrid::` from inside this crate as well
extern crate self as cellgrid;

pub mod calculator;
pub mod config;
pub mod dg;
pub mod grid;
pub mod io;
pub mod metadata;
pub mod prelude;
pub mod query;
pub mod registry;
mod responders;
mod tags;
mod token;
mod traits;
mod utils;

pub use traits::{CellMetadata, Named, Query, Responder, Typed};
pub use traits::{CELL_GRID_QUERY, CELL_METADATA};

pub use token::TypeKey;
pub use tags::TagSet;

pub use responders::{responder_fn, Dispatch, InvalidKey, RegistrationError, Responders};

pub use grid::{CellAttribute, CellGrid};
pub use query::QueryError;
pub use registry::Registry;

pub use io::{read_document, write_document, Encoding};

#[cfg(feature = "derive")]
pub use cellgrid_derive::Named;

pub use ndarray;

/// general purpose error enumeration for possible causes of failure.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("{0}")]
    Query(#[from] QueryError),
    #[error("{0}")]
    Registration(#[from] RegistrationError),
    #[error("Error while reading a cell grid document: `{0}`")]
    Read(#[from] io::ReadError),
    #[error("Could not rebuild the grid from a document: `{0}`")]
    Grid(#[from] io::GridError),
    #[error("An io error occured: `{0}`")]
    Io(#[from] std::io::Error),
    #[error("Could not write XML data to file: `{0}`")]
    XmlWrite(#[from] quick_xml::Error),
}

/// Implement [`Typed`] for a type that implements [`Named`].
///
/// ```ignore
/// impl cellgrid::Named for Tetrahedra {
///     const NAME: &'static str = "vtkDGTet";
/// }
///
/// cellgrid::impl_typed!(Tetrahedra);
/// ```
#[macro_export]
macro_rules! impl_typed {
    ($type:ty) => {
        impl $crate::Typed for $type {
            fn type_key(&self) -> $crate::TypeKey {
                <Self as $crate::Named>::KEY
            }

            fn type_name(&self) -> &'static str {
                <Self as $crate::Named>::NAME
            }

            fn ancestor_keys(&self) -> &'static [$crate::TypeKey] {
                <Self as $crate::Named>::ANCESTORS
            }

            fn as_any(&self) -> &dyn ::std::any::Any {
                self
            }

            fn as_any_mut(&mut self) -> &mut dyn ::std::any::Any {
                self
            }
        }
    };
}
