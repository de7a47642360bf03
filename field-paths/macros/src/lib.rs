//! Derive macro for `field_paths::FieldPathIterable`.
extern crate proc_macro;
use proc_macro2::Span;
use quote::{ToTokens, TokenStreamExt};

mod iterable;

//--------------------------------------------------------------------------------------------------
struct CrateName;
const CRATE: CrateName = CrateName;

impl ToTokens for CrateName {
    fn to_tokens(&self, tokens: &mut proc_macro2::TokenStream) {
        tokens.append(syn::Ident::new("field_paths", Span::call_site()))
    }
}

//--------------------------------------------------------------------------------------------------

/// Generates the declared field path list of a struct: one path per field, in declaration order.
///
/// Paths are writable unless marked `readonly`. Recursive queries descend into a field when its type implements
/// `FieldPathIterable`. This is decided at the field's declared type, so a field whose type is a generic parameter
/// is a leaf unless marked `nested`.
///
/// # Field attributes
/// - `#[field_paths(nested)]`: the field type implements `FieldPathIterable`; recursive queries descend into it. The
///   bound is added to the generated impl.
/// - `#[field_paths(probe = some::function)]`: descend into the field value when
///   `fn(&FieldType) -> Option<&dyn DynIterable>` returns a value.
/// - `#[field_paths(readonly)]`: the path does not support writing.
///
/// # Struct attributes
/// - `#[field_paths(additional = some::function)]`: `fn() -> Vec<PartialFieldPath<Self>>` providing the additional
///   paths.
///
/// # Examples
///```ignore
/// #[derive(FieldPathIterable)]
/// struct Line {
///     a: Point,
///     #[field_paths(readonly)]
///     b: Point,
/// }
///
/// #[derive(FieldPathIterable)]
/// struct Labeled<T> {
///     #[field_paths(nested)]
///     value: T,
///     label: String,
/// }
///```
#[proc_macro_derive(FieldPathIterable, attributes(field_paths))]
pub fn derive_field_path_iterable(input: proc_macro::TokenStream) -> proc_macro::TokenStream {
    iterable::derive(input)
}
