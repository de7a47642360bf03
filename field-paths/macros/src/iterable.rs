//! Implementation of `#[derive(FieldPathIterable)]`.
use crate::CRATE;
use proc_macro2::TokenStream;
use quote::quote;
use syn::{ext::IdentExt, parse_quote, spanned::Spanned, Error, ExprPath};

const BASE_ATTR_PATH: &str = "field_paths";
const NESTED_ATTR_PATH: &str = "nested";
const PROBE_ATTR_PATH: &str = "probe";
const READONLY_ATTR_PATH: &str = "readonly";
const ADDITIONAL_ATTR_PATH: &str = "additional";

pub fn derive(input: proc_macro::TokenStream) -> proc_macro::TokenStream {
    let input = syn::parse_macro_input!(input as syn::DeriveInput);

    let result = match &input.data {
        syn::Data::Struct(s) => derive_struct(&input, s),
        syn::Data::Enum(e) => Err(Error::new(
            e.enum_token.span(),
            "`FieldPathIterable` cannot be derived for enums",
        )),
        syn::Data::Union(u) => Err(Error::new(
            u.union_token.span(),
            "`FieldPathIterable` cannot be derived for unions",
        )),
    };

    result.unwrap_or_else(|err| err.to_compile_error()).into()
}

/// How recursive queries treat the value of a field.
enum Descent {
    /// Descend if the field type implements `FieldPathIterable`, decided where the impl is generated.
    Detect,
    Nested,
    Probe(ExprPath),
}

struct Field {
    member: syn::Member,
    /// Name of the path segment.
    name: String,
    ty: syn::Type,
    descent: Descent,
    readonly: bool,
}

impl Field {
    fn parse_ast(field: &syn::Field, index: usize) -> Result<Field, Error> {
        let (member, name) = match &field.ident {
            Some(ident) => (syn::Member::Named(ident.clone()), ident.unraw().to_string()),
            None => (syn::Member::Unnamed(syn::Index::from(index)), index.to_string()),
        };

        let mut descent = Descent::Detect;
        let mut readonly = false;

        for attr in field.attrs.iter().filter(|attr| attr.path().is_ident(BASE_ATTR_PATH)) {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident(NESTED_ATTR_PATH) || meta.path.is_ident(PROBE_ATTR_PATH) {
                    if !matches!(descent, Descent::Detect) {
                        return Err(meta.error("only one of `nested` or `probe` can be specified"));
                    }
                    descent = if meta.path.is_ident(NESTED_ATTR_PATH) {
                        Descent::Nested
                    } else {
                        Descent::Probe(meta.value()?.parse()?)
                    };
                    Ok(())
                } else if meta.path.is_ident(READONLY_ATTR_PATH) {
                    if readonly {
                        return Err(meta.error("duplicate attribute"));
                    }
                    readonly = true;
                    Ok(())
                } else {
                    Err(meta.error("unknown field_paths attribute"))
                }
            })?;
        }

        Ok(Field {
            member,
            name,
            ty: field.ty.clone(),
            descent,
            readonly,
        })
    }

    /// The expression that builds the `PartialFieldPath<Self>` for this field.
    fn path_tokens(&self) -> TokenStream {
        let Field {
            member, name, ty, ..
        } = self;

        let mut path = quote! {
            ::#CRATE::FieldPath::<Self, #ty>::new(#name, |root: &Self| &root.#member)
        };
        if !self.readonly {
            path = quote! { #path.writable(|root: &mut Self| &mut root.#member) };
        }
        match &self.descent {
            Descent::Detect => {
                path = quote! {
                    #path.probe_with(|value: &#ty| {
                        use ::#CRATE::__private::{ViaIterable as _, ViaLeaf as _};
                        (&&::#CRATE::__private::FieldValue(value)).iterable()
                    })
                }
            }
            Descent::Nested => path = quote! { #path.nested() },
            Descent::Probe(probe) => path = quote! { #path.probe_with(#probe) },
        }
        quote! { #path.into_partial() }
    }
}

fn parse_struct_attrs(input: &syn::DeriveInput) -> Result<Option<ExprPath>, Error> {
    let mut additional = None;
    for attr in input.attrs.iter().filter(|attr| attr.path().is_ident(BASE_ATTR_PATH)) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident(ADDITIONAL_ATTR_PATH) {
                if additional.is_some() {
                    return Err(meta.error("duplicate attribute"));
                }
                additional = Some(meta.value()?.parse()?);
                Ok(())
            } else {
                Err(meta.error("unknown field_paths attribute"))
            }
        })?;
    }
    Ok(additional)
}

fn derive_struct(input: &syn::DeriveInput, s: &syn::DataStruct) -> Result<TokenStream, Error> {
    let ident = &input.ident;

    if let Some(lifetime) = input.generics.lifetimes().next() {
        return Err(Error::new(
            lifetime.span(),
            "`FieldPathIterable` cannot be derived for types with lifetime parameters",
        ));
    }

    let fields = match &s.fields {
        syn::Fields::Named(fields_named) => &fields_named.named,
        syn::Fields::Unnamed(fields_unnamed) => &fields_unnamed.unnamed,
        syn::Fields::Unit => {
            return Err(Error::new(
                ident.span(),
                "`FieldPathIterable` cannot be derived for unit structs",
            ))
        }
    };

    let fields = fields
        .iter()
        .enumerate()
        .map(|(i, field)| Field::parse_ast(field, i))
        .collect::<Result<Vec<_>, _>>()?;
    let paths = fields.iter().map(Field::path_tokens);

    let additional = parse_struct_attrs(input)?.map(|additional| {
        quote! {
            fn additional_paths() -> ::std::vec::Vec<::#CRATE::PartialFieldPath<Self>> {
                #additional()
            }
        }
    });

    // field paths need `'static` roots and targets
    let mut generics = input.generics.clone();
    for param in generics.type_params_mut() {
        param.bounds.push(parse_quote!('static));
    }
    // nested fields must be iterable
    let where_clause = generics.make_where_clause();
    for field in fields.iter().filter(|field| matches!(field.descent, Descent::Nested)) {
        let ty = &field.ty;
        where_clause
            .predicates
            .push(parse_quote!(#ty: ::#CRATE::FieldPathIterable));
    }
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    Ok(quote! {
        impl #impl_generics ::#CRATE::FieldPathIterable for #ident #ty_generics #where_clause {
            fn declared_paths() -> ::std::vec::Vec<::#CRATE::PartialFieldPath<Self>> {
                ::std::vec![#(#paths),*]
            }

            #additional
        }
    })
}
