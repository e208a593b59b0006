mod named;
mod utils;

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

/// Implement `cellgrid::Named` and `cellgrid::Typed`.
///
/// The registration name defaults to the type's identifier:
///
/// ```ignore
/// #[derive(cellgrid::Named)]
/// #[cellgrid(name = "vtkDGTet", ancestors("vtkDGCell", "vtkCellMetadata"))]
/// struct Tetrahedra;
/// ```
#[proc_macro_derive(Named, attributes(cellgrid))]
pub fn derive_named(input: TokenStream) -> TokenStream {
    // Parse the input tokens into a syntax tree
    let input = parse_macro_input!(input as DeriveInput);

    named::derive(input)
        .map(Into::into)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}
