//! Attribute macro backing `#[unravel_testhelpers::test]`.

use proc_macro::TokenStream;
use quote::quote;
use syn::{ItemFn, parse_macro_input};

/// Test attribute macro that sets up tracing before running the test.
///
/// Basic usage (expands to `#[test]`):
/// ```ignore
/// #[unravel_testhelpers::test]
/// fn decodes_something() {
///     // tracing is set up automatically
/// }
/// ```
///
/// Any argument is used as the test attribute instead, e.g.
/// `#[unravel_testhelpers::test(tokio::test)]`.
#[proc_macro_attribute]
pub fn test(attr: TokenStream, item: TokenStream) -> TokenStream {
    let ItemFn {
        attrs,
        vis,
        sig,
        block,
    } = parse_macro_input!(item as ItemFn);

    let test_attr = if attr.is_empty() {
        quote! { #[::core::prelude::rust_2024::test] }
    } else {
        let attr = proc_macro2::TokenStream::from(attr);
        quote! { #[#attr] }
    };

    let stmts = &block.stmts;

    quote! {
        #test_attr
        #(#attrs)*
        #vis #sig {
            ::unravel_testhelpers::setup();

            #(#stmts)*
        }
    }
    .into()
}
