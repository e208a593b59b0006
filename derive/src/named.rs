use super::utils::Ancestors;

use darling::FromDeriveInput;
use proc_macro::TokenStream;
use quote::quote;

use syn::Result;

#[derive(FromDeriveInput)]
#[darling(attributes(cellgrid))]
struct NamedInput {
    ident: syn::Ident,
    generics: syn::Generics,
    #[darling(default)]
    name: Option<String>,
    #[darling(default)]
    ancestors: Ancestors,
}

pub fn derive(input: syn::DeriveInput) -> Result<TokenStream> {
    let input = match NamedInput::from_derive_input(&input) {
        Ok(input) => input,
        // darling already spans each of its errors
        Err(e) => return Ok(TokenStream::from(e.write_errors())),
    };

    let struct_type = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let name = input.name.unwrap_or_else(|| struct_type.to_string());

    if name.is_empty() {
        return Err(syn::Error::new(struct_type.span(), "the registration name cannot be empty"));
    }

    let name = syn::LitStr::new(&name, proc_macro2::Span::call_site());
    let ancestors = &input.ancestors.0;

    // declare both traits, `Typed` forwarding to the constants of `Named`
    let expanded = quote! {
        impl #impl_generics cellgrid::Named for #struct_type #ty_generics #where_clause {
            const NAME: &'static str = #name;
            const ANCESTORS: &'static [cellgrid::TypeKey] = &[
                #(cellgrid::TypeKey::from_name(#ancestors)),*
            ];
        }

        impl #impl_generics cellgrid::Typed for #struct_type #ty_generics #where_clause {
            fn type_key(&self) -> cellgrid::TypeKey {
                <Self as cellgrid::Named>::KEY
            }

            fn type_name(&self) -> &'static str {
                <Self as cellgrid::Named>::NAME
            }

            fn ancestor_keys(&self) -> &'static [cellgrid::TypeKey] {
                <Self as cellgrid::Named>::ANCESTORS
            }

            fn as_any(&self) -> &dyn ::std::any::Any {
                self
            }

            fn as_any_mut(&mut self) -> &mut dyn ::std::any::Any {
                self
            }
        }
    };

    // Hand the output tokens back to the compiler
    Ok(TokenStream::from(expanded))
}
