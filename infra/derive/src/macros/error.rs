use fxhash::FxHashSet;
use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::{Attribute, Data, DeriveInput, Field, Fields, Ident, LitInt, Type, Variant};

/// What the macro needs to know about one enum variant.
struct ErrorVariant<'a> {
    ident: &'a Ident,
    /// `(field name, type)` of the wrapped error, if any.
    source: Option<(&'a Ident, &'a Type)>,
    has_context: bool,
    status: Option<u16>,
    /// `#[cfg]` attributes repeated on every generated item touching the variant.
    cfg: Vec<Attribute>,
}

impl ErrorVariant<'_> {
    fn is_internal(&self) -> bool {
        self.ident == "Internal"
    }
}

pub fn expand_derive(input: DeriveInput) -> TokenStream {
    let Data::Enum(data) = &input.data else {
        return quote! { compile_error!("pdl_error can only be applied to enums"); };
    };

    let variants = match data.variants.iter().map(read_variant).collect::<syn::Result<Vec<_>>>() {
        Ok(variants) => variants,
        Err(err) => return err.to_compile_error(),
    };
    if let Some(missing) = variants.iter().find(|v| v.source.is_some() && !v.has_context) {
        return syn::Error::new_spanned(
            missing.ident,
            "pdl_error requires `context: Option<Cow<'static, str>>` next to a source",
        )
        .to_compile_error();
    }

    let name = &input.ident;
    let ext = format_ident!("{name}Ext");

    let derives = missing_derives(&input.attrs);
    let context_ext = context_ext(name, &ext, &variants);
    let source_impls = variants.iter().filter(|v| !v.is_internal()).filter_map(|v| source_impl(name, &ext, v));
    let message_impls = variants.iter().find(|v| v.is_internal()).map(|v| message_impls(name, v));
    let status = status_impl(name, &variants);

    let mut item = input.clone();
    if let Data::Enum(data) = &mut item.data {
        for variant in &mut data.variants {
            variant.attrs.retain(|attr| !attr.path().is_ident("status"));
        }
    }

    quote! {
        #[allow(non_shorthand_field_patterns)]
        #derives
        #item

        #context_ext
        #(#source_impls)*
        #message_impls
        #status

        #[allow(dead_code)]
        fn format_context(context: &Option<::std::borrow::Cow<'static, str>>) -> String {
            context.as_ref().map(|c| format!(" ({c})")).unwrap_or_default()
        }
    }
}

fn read_variant(variant: &Variant) -> syn::Result<ErrorVariant<'_>> {
    let Fields::Named(fields) = &variant.fields else {
        return Err(syn::Error::new_spanned(variant, "pdl_error variants must use named fields"));
    };

    let mut source = None;
    let mut has_context = false;
    for field in &fields.named {
        let Some(ident) = &field.ident else { continue };
        if ident == "context" {
            if !is_optional_cow(&field.ty) {
                return Err(syn::Error::new_spanned(
                    &field.ty,
                    "context field must be Option<Cow<'static, str>>",
                ));
            }
            has_context = true;
        } else if source.is_none() && is_source(ident, field) {
            source = Some((ident, &field.ty));
        }
    }

    Ok(ErrorVariant {
        ident: &variant.ident,
        source,
        has_context,
        status: read_status(&variant.attrs)?,
        cfg: variant.attrs.iter().filter(|attr| attr.path().is_ident("cfg")).cloned().collect(),
    })
}

fn is_source(ident: &Ident, field: &Field) -> bool {
    ident == "source"
        || field.attrs.iter().any(|attr| attr.path().is_ident("source") || attr.path().is_ident("from"))
}

fn read_status(attrs: &[Attribute]) -> syn::Result<Option<u16>> {
    let Some(attr) = attrs.iter().find(|attr| attr.path().is_ident("status")) else {
        return Ok(None);
    };
    let lit: LitInt = attr.parse_args()?;
    let code: u16 = lit.base10_parse()?;
    if !(100..=599).contains(&code) {
        return Err(syn::Error::new_spanned(lit, "status must be an HTTP status code (100-599)"));
    }
    Ok(Some(code))
}

/// `Option<Cow<'static, str>>`, compared on the normalized token text.
fn is_optional_cow(ty: &Type) -> bool {
    let text: String = quote!(#ty).to_string().split_whitespace().collect();
    matches!(
        text.as_str(),
        "Option<Cow<'static,str>>"
            | "Option<std::borrow::Cow<'static,str>>"
            | "Option<::std::borrow::Cow<'static,str>>"
    )
}

fn missing_derives(attrs: &[Attribute]) -> TokenStream {
    let mut present = FxHashSet::default();
    for attr in attrs.iter().filter(|attr| attr.path().is_ident("derive")) {
        let _ = attr.parse_nested_meta(|meta| {
            if let Some(segment) = meta.path.segments.last() {
                present.insert(segment.ident.to_string());
            }
            Ok(())
        });
    }

    let mut derives = Vec::new();
    if !present.contains("Debug") {
        derives.push(quote!(Debug));
    }
    if !present.contains("Error") {
        derives.push(quote!(::thiserror::Error));
    }
    if derives.is_empty() { quote!() } else { quote!(#[derive(#(#derives),*)]) }
}

/// `XExt::context` on `Result<T, X>`: overwrites the context of variants that carry one.
fn context_ext(name: &Ident, ext: &Ident, variants: &[ErrorVariant<'_>]) -> TokenStream {
    let arms = variants.iter().filter(|v| v.has_context).map(|v| {
        let (cfg, ident) = (&v.cfg, v.ident);
        quote! { #(#cfg)* #name::#ident { context: slot, .. } => *slot = Some(context.into()), }
    });

    quote! {
        pub trait #ext<T> {
            fn context(self, context: impl Into<::std::borrow::Cow<'static, str>>) -> ::std::result::Result<T, #name>;
        }

        #[automatically_derived]
        impl<T> #ext<T> for ::std::result::Result<T, #name> {
            #[inline]
            fn context(self, context: impl Into<::std::borrow::Cow<'static, str>>) -> Self {
                self.map_err(|mut err| {
                    #[allow(clippy::match_single_binding)]
                    match &mut err {
                        #(#arms)*
                        _ => {}
                    }
                    err
                })
            }
        }
    }
}

/// `From<Source>` plus `XExt::context` on `Result<T, Source>`.
fn source_impl(name: &Ident, ext: &Ident, variant: &ErrorVariant<'_>) -> Option<TokenStream> {
    let (field, ty) = variant.source?;
    let (cfg, ident) = (&variant.cfg, variant.ident);

    Some(quote! {
        #(#cfg)*
        #[automatically_derived]
        impl From<#ty> for #name {
            #[inline]
            fn from(#field: #ty) -> Self {
                Self::#ident { #field, context: None }
            }
        }

        #(#cfg)*
        #[automatically_derived]
        impl<T> #ext<T> for ::std::result::Result<T, #ty> {
            #[inline]
            fn context(self, context: impl Into<::std::borrow::Cow<'static, str>>) -> ::std::result::Result<T, #name> {
                self.map_err(|#field| #name::#ident { #field, context: Some(context.into()) })
            }
        }
    })
}

/// Plain messages become `Internal` errors.
fn message_impls(name: &Ident, internal: &ErrorVariant<'_>) -> TokenStream {
    let cfg = &internal.cfg;
    quote! {
        #(#cfg)*
        impl From<&'static str> for #name {
            #[inline]
            fn from(message: &'static str) -> Self {
                Self::Internal { message: ::std::borrow::Cow::Borrowed(message), context: None }
            }
        }

        #(#cfg)*
        impl From<String> for #name {
            #[inline]
            fn from(message: String) -> Self {
                Self::Internal { message: ::std::borrow::Cow::Owned(message), context: None }
            }
        }
    }
}

fn status_impl(name: &Ident, variants: &[ErrorVariant<'_>]) -> TokenStream {
    let arms: Vec<TokenStream> = variants
        .iter()
        .filter_map(|v| {
            let (cfg, ident, code) = (&v.cfg, v.ident, v.status?);
            Some(quote! { #(#cfg)* Self::#ident { .. } => #code, })
        })
        .collect();
    if arms.is_empty() {
        return quote!();
    }

    quote! {
        #[automatically_derived]
        impl #name {
            /// HTTP status for this error; variants without `#[status]` answer 500.
            #[must_use]
            #[allow(unreachable_patterns)]
            pub const fn status_code(&self) -> u16 {
                match self {
                    #(#arms)*
                    _ => 500,
                }
            }
        }
    }
}
