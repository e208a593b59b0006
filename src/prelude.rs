//! Common traits and types that are useful for working with `cellgrid`
#![allow(unused_imports)]

pub use crate::grid::{CellAttribute, CellGrid};
pub use crate::query::PassCounter;
pub use crate::registry::Registry;
pub use crate::traits::{CellMetadata, Named, Query, Responder, Typed};
pub use crate::{Dispatch, Responders, TagSet, TypeKey};

pub(crate) use crate::calculator::Interpolate;
pub(crate) use crate::{Error, QueryError, RegistrationError};
pub(crate) use std::any::Any;
pub(crate) use std::io::Write;
pub(crate) use std::sync::Arc;

pub(crate) use derive_more::{Constructor, Display, From, Into};

pub(crate) use ndarray::{s, Array2, ArrayView2, ArrayViewMut2, Axis};
