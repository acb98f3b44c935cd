use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::ItemStruct;

pub fn expand(input: ItemStruct) -> TokenStream {
    let handle = &input.ident;
    let vis = &input.vis;
    let fields = &input.fields;
    let attrs = &input.attrs;
    let semi = input.semi_token;

    let inner = format_ident!("{handle}Inner");

    quote! {
        #(#attrs)*
        #[derive(Debug)]
        #vis struct #inner #fields #semi

        #[derive(Debug, Clone)]
        #vis struct #handle {
            inner: std::sync::Arc<#inner>,
        }

        impl #handle {
            #vis fn new(inner: #inner) -> Self {
                Self { inner: std::sync::Arc::new(inner) }
            }

            /// Returns `true` when both handles point at the same state.
            #[must_use]
            #vis fn shares_state_with(&self, other: &Self) -> bool {
                std::sync::Arc::ptr_eq(&self.inner, &other.inner)
            }
        }

        impl std::ops::Deref for #handle {
            type Target = #inner;

            fn deref(&self) -> &Self::Target {
                &self.inner
            }
        }
    }
}
