use fxhash::FxHashSet;
use proc_macro2::{Span, TokenStream};
use quote::quote;
use syn::parse::Parser;
use syn::punctuated::Punctuated;
use syn::{Attribute, Expr, ItemFn, ItemStruct, Lit, LitStr, Meta, MetaNameValue, Token, Type};

/// Expands `#[api_model]`.
///
/// Adds the common derives (`Serialize`, `Deserialize`, `ToSchema`), snake_case naming,
/// strict field checking and, on request, omission of `None` fields.
pub fn expand_api_model(args: TokenStream, input: ItemStruct) -> TokenStream {
    model(args, input).unwrap_or_else(|err| err.to_compile_error())
}

/// Expands `#[api_handler]`: the handler stays as written and gains a
/// `utoipa::path` attribute behind the `server` feature.
pub fn expand_api_handler(args: TokenStream, input: ItemFn) -> TokenStream {
    let ItemFn { attrs, vis, sig, block } = input;

    quote! {
        #(#attrs)*
        #[allow(clippy::unused_async)]
        #[cfg_attr(feature = "server", ::utoipa::path(#args))]
        #vis #sig #block
    }
}

#[derive(Default)]
struct ModelArgs {
    rename_all: Option<LitStr>,
    deny_unknown_fields: Option<bool>,
    skip_none: Option<bool>,
}

/// Serde container attributes already written on the struct.
#[derive(Default)]
struct ExistingSerde {
    rename_all: Option<LitStr>,
    deny_unknown_fields: bool,
}

fn model(args: TokenStream, mut input: ItemStruct) -> syn::Result<TokenStream> {
    let args = read_args(args)?;
    let existing = existing_serde(&input.attrs)?;
    let derived = derived_traits(&input.attrs);

    if args.skip_none.unwrap_or(false) {
        for field in &mut input.fields {
            if is_option(&field.ty) && !has_skip_rule(&field.attrs) {
                field.attrs.push(syn::parse_quote! { #[serde(skip_serializing_if = "Option::is_none")] });
            }
        }
    }

    let mut derives = Vec::new();
    if !derived.contains("Debug") {
        derives.push(quote!(Debug));
    }
    if !derived.contains("Serialize") {
        derives.push(quote!(::serde::Serialize));
    }
    if !derived.contains("Deserialize") {
        derives.push(quote!(::serde::Deserialize));
    }
    let derive_attr = if derives.is_empty() { quote!() } else { quote!(#[derive(#(#derives),*)]) };

    let schema_attr = if derived.contains("ToSchema") {
        quote!()
    } else {
        quote!(#[cfg_attr(feature = "server", derive(::utoipa::ToSchema))])
    };

    let casing = args.rename_all.unwrap_or_else(|| LitStr::new("snake_case", Span::call_site()));
    let rename_attr = match &existing.rename_all {
        Some(written) if written.value() != casing.value() => {
            return Err(syn::Error::new_spanned(
                written,
                "Conflicting serde rename_all; remove it or set api_model(rename_all = \"...\") to match",
            ));
        },
        Some(_) => quote!(),
        None => quote!(#[serde(rename_all = #casing)]),
    };

    let deny = args.deny_unknown_fields.unwrap_or(true);
    let deny_attr = match (existing.deny_unknown_fields, deny) {
        (true, false) => {
            return Err(syn::Error::new_spanned(
                &input.ident,
                "deny_unknown_fields is already set via serde; remove it before disabling",
            ));
        },
        (false, true) => quote!(#[serde(deny_unknown_fields)]),
        _ => quote!(),
    };

    Ok(quote! {
        #derive_attr
        #schema_attr
        #rename_attr
        #deny_attr
        #input
    })
}

fn read_args(args: TokenStream) -> syn::Result<ModelArgs> {
    let metas = Punctuated::<Meta, Token![,]>::parse_terminated.parse2(args)?;
    let mut parsed = ModelArgs::default();

    for meta in metas {
        let Meta::NameValue(pair) = meta else {
            return Err(syn::Error::new_spanned(
                meta,
                "Expected name-value arguments like `rename_all = \"...\"`",
            ));
        };

        if pair.path.is_ident("rename_all") {
            let Lit::Str(value) = literal(&pair)? else {
                return Err(syn::Error::new_spanned(&pair.value, "rename_all must be a string literal"));
            };
            set_once(&mut parsed.rename_all, &pair, value)?;
        } else if pair.path.is_ident("deny_unknown_fields") {
            set_once(&mut parsed.deny_unknown_fields, &pair, bool_literal(&pair)?)?;
        } else if pair.path.is_ident("skip_none") {
            set_once(&mut parsed.skip_none, &pair, bool_literal(&pair)?)?;
        } else {
            return Err(syn::Error::new_spanned(
                pair.path,
                "Unsupported argument; expected rename_all, deny_unknown_fields or skip_none",
            ));
        }
    }

    Ok(parsed)
}

fn literal(pair: &MetaNameValue) -> syn::Result<Lit> {
    match &pair.value {
        Expr::Lit(expr) => Ok(expr.lit.clone()),
        other => Err(syn::Error::new_spanned(other, "Expected a literal")),
    }
}

fn bool_literal(pair: &MetaNameValue) -> syn::Result<bool> {
    match literal(pair)? {
        Lit::Bool(value) => Ok(value.value),
        _ => Err(syn::Error::new_spanned(&pair.value, "Expected a boolean literal")),
    }
}

fn set_once<T>(slot: &mut Option<T>, pair: &MetaNameValue, value: T) -> syn::Result<()> {
    if slot.is_some() {
        return Err(syn::Error::new_spanned(pair, "Duplicate argument"));
    }
    *slot = Some(value);
    Ok(())
}

fn existing_serde(attrs: &[Attribute]) -> syn::Result<ExistingSerde> {
    let mut existing = ExistingSerde::default();
    for attr in attrs.iter().filter(|attr| attr.path().is_ident("serde")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("rename_all") {
                existing.rename_all = Some(meta.value()?.parse()?);
            } else if meta.path.is_ident("deny_unknown_fields") {
                existing.deny_unknown_fields = true;
            } else if meta.input.peek(Token![=]) {
                let _: Expr = meta.value()?.parse()?;
            }
            Ok(())
        })?;
    }
    Ok(existing)
}

fn derived_traits(attrs: &[Attribute]) -> FxHashSet<String> {
    let mut traits = FxHashSet::default();
    for attr in attrs.iter().filter(|attr| attr.path().is_ident("derive")) {
        let _ = attr.parse_nested_meta(|meta| {
            if let Some(segment) = meta.path.segments.last() {
                traits.insert(segment.ident.to_string());
            }
            Ok(())
        });
    }
    traits
}

fn is_option(ty: &Type) -> bool {
    matches!(ty, Type::Path(path) if path.path.segments.last().is_some_and(|seg| seg.ident == "Option"))
}

/// Whether a field already says when it is skipped.
fn has_skip_rule(attrs: &[Attribute]) -> bool {
    let mut found = false;
    for attr in attrs.iter().filter(|attr| attr.path().is_ident("serde")) {
        let _ = attr.parse_nested_meta(|meta| {
            found |= meta.path.is_ident("skip_serializing_if") || meta.path.is_ident("skip");
            if meta.input.peek(Token![=]) {
                let _: Expr = meta.value()?.parse()?;
            }
            Ok(())
        });
    }
    found
}
