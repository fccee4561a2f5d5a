use proc_macro::TokenStream;
use quote::quote_spanned;
use syn::{parse_macro_input, spanned::Spanned, ItemImpl};

/// Turns an inherent `impl` block into a handler set for `variant::apply_visitor`.
///
/// Every method taking `&self`/`&mut self` and one argument of type `X` becomes
/// an `impl Visit<X>`. The method taking only the receiver, if any, becomes
/// `Visitor::empty`. All handlers must return the same type.
#[proc_macro_attribute]
pub fn visitor(attr: TokenStream, item: TokenStream) -> TokenStream {
    if !attr.is_empty() {
        let attr = proc_macro2::TokenStream::from(attr);
        return quote_spanned! {attr.span() => compile_error!("`visitor` takes no arguments");}
            .into();
    }
    let input = parse_macro_input!(item as ItemImpl);

    if let Some((_, path, _)) = &input.trait_ {
        return quote_spanned! {path.span() => compile_error!("`visitor` goes on an inherent impl");}
            .into();
    }

    handlers::derive_visitor(&input)
}

mod handlers;
