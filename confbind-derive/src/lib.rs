//! `#[derive(Fields)]` and `#[derive(Conf)]` for confbind.
//!
//! Generates, per struct, a static field table (`FieldMeta` per field, in
//! declaration order) plus the `Fields` impl the walker and binder work from.
//! `Conf` additionally generates the redacted-copy impl. Use them through the
//! `confbind` crate, which re-exports both; the generated code refers to
//! `::confbind` paths.

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{Data, DeriveInput, Fields, FieldsNamed, LitStr, Visibility, parse_macro_input};

/// Derive `confbind::Fields` for a struct with named fields.
///
/// Enough for flag and env binding. Field types need no extra traits, so
/// structs holding function pointers, channels and the like can derive it.
/// Takes the same `#[conf(...)]` attributes as `Conf`; `redact` is recorded
/// but has no effect without `Conf`.
#[proc_macro_derive(Fields, attributes(conf))]
pub fn derive_fields(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    expand(&input, Derive::Fields)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

/// Derive `confbind::Fields` and `confbind::Conf` for a struct with named
/// fields.
///
/// Field attributes, all under `#[conf(...)]`:
///
/// - `name = "..."`: flag name override; `"-"` drops the field (and its
///   subtree) from flags and env vars, `""` means no override.
/// - `skip`: shorthand for `name = "-"`.
/// - `usage = "..."`: help text for the generated flag.
/// - `redact` / `redact = "..."`: boolean literal; truthy fields are reset to
///   `Default::default()` by `Conf::redacted`.
/// - `nested`: the field is itself a `Conf` struct. Public fields whose type
///   derives `Conf` are recognized without it; private ones need it.
///
/// Every field type must implement `Default`. Public fields must also be
/// `Conf` or `Clone`.
#[proc_macro_derive(Conf, attributes(conf))]
pub fn derive_conf(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    expand(&input, Derive::Conf)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

#[derive(Clone, Copy, PartialEq)]
enum Derive {
    Fields,
    Conf,
}

impl Derive {
    fn name(self) -> &'static str {
        match self {
            Derive::Fields => "Fields",
            Derive::Conf => "Conf",
        }
    }
}

#[derive(Default)]
struct FieldAttrs {
    name: Option<String>,
    usage: Option<String>,
    redact: Option<String>,
    nested: bool,
}

fn parse_attrs(field: &syn::Field) -> syn::Result<FieldAttrs> {
    let mut attrs = FieldAttrs::default();
    for attr in field.attrs.iter().filter(|a| a.path().is_ident("conf")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("name") {
                let lit: LitStr = meta.value()?.parse()?;
                attrs.name = Some(lit.value()).filter(|name| !name.is_empty());
            } else if meta.path.is_ident("skip") {
                attrs.name = Some("-".to_string());
            } else if meta.path.is_ident("usage") {
                let lit: LitStr = meta.value()?.parse()?;
                attrs.usage = Some(lit.value());
            } else if meta.path.is_ident("redact") {
                if meta.input.peek(syn::Token![=]) {
                    let lit: LitStr = meta.value()?.parse()?;
                    attrs.redact = Some(lit.value());
                } else {
                    attrs.redact = Some("true".to_string());
                }
            } else if meta.path.is_ident("nested") {
                attrs.nested = true;
            } else {
                return Err(meta.error("unsupported conf attribute"));
            }
            Ok(())
        })?;
    }
    Ok(attrs)
}

fn opt_str(value: &Option<String>) -> TokenStream2 {
    match value {
        Some(s) => quote!(::core::option::Option::Some(#s)),
        None => quote!(::core::option::Option::None),
    }
}

fn named_fields(input: &DeriveInput, derive: Derive) -> syn::Result<&FieldsNamed> {
    let found = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => Ok(named),
            Fields::Unnamed(_) => Err("tuple struct"),
            Fields::Unit => Err("unit struct"),
        },
        Data::Enum(_) => Err("enum"),
        Data::Union(_) => Err("union"),
    };
    found.map_err(|kind| {
        syn::Error::new_spanned(
            &input.ident,
            format!(
                "{} can only be derived for structs with named fields, found {kind}",
                derive.name()
            ),
        )
    })
}

fn expand(input: &DeriveInput, derive: Derive) -> syn::Result<TokenStream2> {
    let named = named_fields(input, derive)?;

    let ident = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let mut metas = Vec::new();
    let mut targets_mut = Vec::new();
    let mut targets_ref = Vec::new();
    let mut redacted = Vec::new();

    for (index, field) in named.named.iter().enumerate() {
        let attrs = parse_attrs(field)?;
        let Some(member) = field.ident.as_ref() else {
            continue;
        };
        let field_name = member.to_string();
        let exported = !matches!(field.vis, Visibility::Inherited);
        let nested = attrs.nested;
        let name = opt_str(&attrs.name);
        let usage = opt_str(&attrs.usage);
        let redact = opt_str(&attrs.redact);

        metas.push(quote! {
            ::confbind::FieldMeta {
                ident: #field_name,
                name: #name,
                usage: #usage,
                redact: #redact,
                exported: #exported,
                nested: #nested,
            }
        });

        if nested {
            targets_mut.push(quote!(::confbind::walk::Target::Nested(&mut self.#member)));
            targets_ref.push(quote!(::confbind::walk::TargetRef::Nested(&self.#member)));
        } else if exported {
            targets_mut.push(quote! {
                (&&&::confbind::walk::probe::TargetProbe::new(&mut self.#member)).target()
            });
            targets_ref.push(quote! {
                (&&&::confbind::walk::probe::TargetRefProbe::new(&self.#member)).target()
            });
        } else {
            targets_mut.push(quote!(::confbind::walk::Target::Leaf(::core::option::Option::None)));
            targets_ref.push(quote!(::confbind::walk::TargetRef::Leaf(::core::option::Option::None)));
        }

        let copy = if !exported {
            quote!(::core::default::Default::default())
        } else if nested {
            quote!(::confbind::Conf::redacted(&self.#member)?)
        } else {
            quote!((&::confbind::walk::probe::CopyProbe::new(&self.#member)).redacted_copy()?)
        };
        redacted.push(quote! {
            #member: if ::confbind::redact::retain(&meta[#index])? {
                #copy
            } else {
                ::core::default::Default::default()
            }
        });
    }

    let fields_impl = quote! {
        impl #impl_generics ::confbind::Fields for #ident #ty_generics #where_clause {
            fn meta(&self) -> &'static [::confbind::FieldMeta] {
                const META: &[::confbind::FieldMeta] = &[#(#metas),*];
                META
            }

            #[allow(unused_imports)]
            fn targets_mut(&mut self) -> ::std::vec::Vec<::confbind::walk::Target<'_>> {
                use ::confbind::walk::probe::{LeafTarget as _, NestedTarget as _, OpaqueTarget as _};
                ::std::vec![#(#targets_mut),*]
            }

            #[allow(unused_imports)]
            fn targets(&self) -> ::std::vec::Vec<::confbind::walk::TargetRef<'_>> {
                use ::confbind::walk::probe::{
                    LeafTargetRef as _, NestedTargetRef as _, OpaqueTargetRef as _,
                };
                ::std::vec![#(#targets_ref),*]
            }
        }
    };

    if derive == Derive::Fields {
        return Ok(fields_impl);
    }

    Ok(quote! {
        #fields_impl

        impl #impl_generics ::confbind::Conf for #ident #ty_generics #where_clause {
            #[allow(unused_variables, unused_imports)]
            fn redacted(&self) -> ::core::result::Result<Self, ::confbind::ConfError> {
                use ::confbind::walk::probe::{NestedCopy as _, PlainCopy as _};
                let meta = ::confbind::Fields::meta(self);
                ::core::result::Result::Ok(Self {
                    #(#redacted),*
                })
            }
        }
    })
}
