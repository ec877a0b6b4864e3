use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::{ItemStruct, LitStr};

/// `struct X { .. }` becomes `XInner { .. }` plus an `Arc` handle `X` registered as a slice.
pub fn expand_slice(input: ItemStruct) -> TokenStream {
    let ItemStruct { attrs, vis, ident: handle, fields, .. } = input;
    let inner = format_ident!("{handle}Inner");
    let label = LitStr::new(&handle.to_string(), handle.span());

    quote! {
        #(#attrs)*
        #[derive(Debug, Clone)]
        #vis struct #inner #fields

        #[derive(Debug, Clone)]
        #vis struct #handle(::std::sync::Arc<#inner>);

        impl #handle {
            pub fn new(inner: #inner) -> Self {
                Self(::std::sync::Arc::new(inner))
            }
        }

        impl ::std::ops::Deref for #handle {
            type Target = #inner;

            fn deref(&self) -> &#inner {
                &self.0
            }
        }

        impl ::pdl_kernel::domain::registry::FeatureSlice for #handle {
            fn name(&self) -> &'static str {
                #label
            }

            fn as_any(&self) -> &dyn ::std::any::Any {
                self
            }
        }
    }
}
