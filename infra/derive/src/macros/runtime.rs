use proc_macro2::TokenStream;
use quote::quote;
use syn::parse::Parser;
use syn::punctuated::Punctuated;
use syn::{Error, Expr, ExprLit, ItemFn, Lit, Meta, ReturnType, Token, Type};

/// Expands `#[pdl_runtime::main]` into a sync `main` driving the body on a profiled runtime.
#[must_use]
pub fn expand_main(args: TokenStream, input: ItemFn) -> TokenStream {
    match check_signature(&input).and_then(|()| runtime_config(args)) {
        Ok(config) => {
            let ItemFn { attrs, vis, sig, block } = input;
            let (name, output) = (&sig.ident, &sig.output);
            quote! {
                #(#attrs)*
                #vis fn #name() #output {
                    let runtime = #config.build()?;
                    runtime.block_on(async #block)
                }
            }
        },
        Err(err) => err.to_compile_error(),
    }
}

fn check_signature(input: &ItemFn) -> syn::Result<()> {
    if input.sig.asyncness.is_none() {
        return Err(Error::new_spanned(&input.sig.ident, "#[pdl_runtime::main] needs an async fn"));
    }
    let returns_result = match &input.sig.output {
        ReturnType::Type(_, ty) => matches!(
            &**ty,
            Type::Path(path) if path.path.segments.last().is_some_and(|seg| seg.ident == "Result")
        ),
        ReturnType::Default => false,
    };
    if !returns_result {
        return Err(Error::new_spanned(&input.sig.output, "#[pdl_runtime::main] needs a Result return type"));
    }
    Ok(())
}

/// An optional profile name, then an optional `thread_name = "..."`.
fn runtime_config(args: TokenStream) -> syn::Result<TokenStream> {
    let mut profile = quote!(Default);
    let mut thread_name = None;

    for meta in Punctuated::<Meta, Token![,]>::parse_terminated.parse2(args)? {
        match meta {
            Meta::Path(path) => {
                let variant = match path.get_ident().map(ToString::to_string).as_deref() {
                    Some("high_performance") => quote!(HighPerformance),
                    Some("memory_efficient") => quote!(MemoryEfficient),
                    Some("default") => quote!(Default),
                    _ => {
                        return Err(Error::new_spanned(
                            path,
                            "Unknown runtime profile. Use: high_performance, memory_efficient, or default",
                        ));
                    },
                };
                profile = variant;
            },
            Meta::NameValue(pair) if pair.path.is_ident("thread_name") => {
                let Expr::Lit(ExprLit { lit: Lit::Str(name), .. }) = pair.value else {
                    return Err(Error::new_spanned(pair.value, "thread_name must be a string literal"));
                };
                thread_name = Some(name);
            },
            other => {
                return Err(Error::new_spanned(
                    other,
                    "Unsupported argument; expected a profile or thread_name = \"...\"",
                ));
            },
        }
    }

    let config = quote!(::pdl_runtime::Profile::#profile.config());
    Ok(match thread_name {
        Some(name) => quote!(#config.with_thread_name(#name)),
        None => config,
    })
}
