use darling::FromMeta;
use syn::{Lit, NestedMeta};

/// the string literals of `ancestors("a", "b", ...)`, most specific first
#[derive(Debug, Default)]
pub(crate) struct Ancestors(pub(crate) Vec<syn::LitStr>);

impl FromMeta for Ancestors {
    fn from_list(items: &[NestedMeta]) -> darling::Result<Self> {
        let mut names = Vec::with_capacity(items.len());

        // we dont use iterators here so that every bad item is reported
        let mut errors = Vec::new();

        for item in items {
            match item {
                NestedMeta::Lit(Lit::Str(name)) if name.value().is_empty() => {
                    let error = darling::Error::custom("ancestor names cannot be empty");
                    errors.push(error.with_span(item));
                }
                NestedMeta::Lit(Lit::Str(name)) => names.push(name.clone()),
                _ => {
                    let message = "expected the name of an ancestor as a string literal";
                    errors.push(darling::Error::custom(message).with_span(item));
                }
            }
        }

        if !errors.is_empty() {
            return Err(darling::Error::multiple(errors));
        }

        Ok(Ancestors(names))
    }
}
