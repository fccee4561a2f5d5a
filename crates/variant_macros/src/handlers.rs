use proc_macro::TokenStream;
use proc_macro2::Span;
use quote::{quote, quote_spanned, ToTokens};
use syn::{
    spanned::Spanned,
    visit_mut::{self, VisitMut},
    FnArg, GenericParam, Generics, ImplItem, ImplItemFn, ItemImpl, Lifetime, LifetimeParam,
    ReturnType, Type, TypeBareFn, TypeReference,
};

type Error = proc_macro2::TokenStream;

/// Gives a name to every elided lifetime of an argument type
struct FillElided {
    lifetime: Lifetime,
    filled: bool,
}

impl VisitMut for FillElided {
    fn visit_type_reference_mut(&mut self, reference: &mut TypeReference) {
        if reference.lifetime.is_none() {
            reference.lifetime = Some(self.lifetime.clone());
            self.filled = true;
        }
        visit_mut::visit_type_reference_mut(self, reference)
    }

    fn visit_lifetime_mut(&mut self, lifetime: &mut Lifetime) {
        if lifetime.ident == "_" {
            *lifetime = self.lifetime.clone();
            self.filled = true;
        }
    }

    // `fn(&T)` binds its own lifetimes
    fn visit_type_bare_fn_mut(&mut self, _: &mut TypeBareFn) {}
}

enum Handler<'a> {
    Empty(&'a ImplItemFn),
    Alternative(&'a ImplItemFn, &'a Type),
}

impl<'a> Handler<'a> {
    fn method(&self) -> &'a ImplItemFn {
        match self {
            Handler::Empty(m) | Handler::Alternative(m, _) => m,
        }
    }

    fn output(&self) -> proc_macro2::TokenStream {
        match &self.method().sig.output {
            ReturnType::Default => quote! {()},
            ReturnType::Type(_, ty) => ty.to_token_stream(),
        }
    }
}

fn classify(method: &ImplItemFn) -> Result<Handler<'_>, Error> {
    let sig = &method.sig;
    if !sig.generics.params.is_empty() {
        return Err(quote_spanned! {
            sig.generics.span() => compile_error!("handlers cannot be generic, implement `Visit` by hand");
        });
    }

    let mut inputs = sig.inputs.iter();
    match inputs.next() {
        // `&self` and `self: &Self` alike carry a reference type
        Some(FnArg::Receiver(receiver)) if matches!(*receiver.ty, Type::Reference(_)) => {}
        _ => {
            return Err(quote_spanned! {
                sig.span() => compile_error!("handlers take `&self` or `&mut self`");
            })
        }
    }

    match (inputs.next(), inputs.next()) {
        (None, _) => Ok(Handler::Empty(method)),
        (Some(FnArg::Typed(arg)), None) => Ok(Handler::Alternative(method, &arg.ty)),
        (_, Some(extra)) => Err(quote_spanned! {
            extra.span() => compile_error!("handlers take at most one argument");
        }),
        (Some(arg), None) => Err(quote_spanned! {
            arg.span() => compile_error!("unexpected receiver");
        }),
    }
}

fn collect(input: &ItemImpl) -> Result<Vec<Handler<'_>>, Error> {
    let handlers = input
        .items
        .iter()
        .filter_map(|item| match item {
            ImplItem::Fn(method) => Some(classify(method)),
            _ => None,
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mut empties = handlers.iter().filter(|h| matches!(h, Handler::Empty(_)));
    empties.next();
    if let Some(h) = empties.next() {
        return Err(quote_spanned! {
          h.method().sig.ident.span() =>
            compile_error!("only one empty handler is allowed");
        });
    }

    let Some(first) = handlers.first() else {
        return Err(quote_spanned! {
            input.self_ty.span() => compile_error!("no handler found");
        });
    };
    let expected = first.output().to_string();
    if let Some(h) = handlers.iter().find(|h| h.output().to_string() != expected) {
        return Err(quote_spanned! {
          h.method().sig.output.span() =>
            compile_error!("all handlers must return the same type");
        });
    }

    Ok(handlers)
}

fn with_lifetime(generics: &Generics, lifetime: &Lifetime) -> Generics {
    let mut generics = generics.clone();
    generics
        .params
        .insert(0, GenericParam::Lifetime(LifetimeParam::new(lifetime.clone())));
    generics
}

pub fn derive_visitor(input: &ItemImpl) -> TokenStream {
    let handlers = match collect(input) {
        Ok(x) => x,
        Err(x) => return x.into(),
    };

    let self_ty = &input.self_ty;
    let output = handlers[0].output();
    let (impl_generics, _, where_clause) = input.generics.split_for_impl();

    let empty = handlers.iter().find_map(|h| match h {
        Handler::Empty(m) => {
            let name = &m.sig.ident;
            Some(quote! {
              fn empty(&mut self) -> Self::Output {
                <#self_ty>::#name(self)
              }
            })
        }
        Handler::Alternative(..) => None,
    });

    let lifetime = Lifetime::new("'__visit", Span::call_site());
    let alternatives = handlers.iter().filter_map(|h| {
        let Handler::Alternative(m, ty) = h else {
            return None;
        };
        let name = &m.sig.ident;
        let mut ty = (*ty).clone();
        let mut filler = FillElided {
            lifetime: lifetime.clone(),
            filled: false,
        };
        filler.visit_type_mut(&mut ty);

        let generics = if filler.filled {
            with_lifetime(&input.generics, &lifetime)
        } else {
            input.generics.clone()
        };
        let (impl_generics, _, where_clause) = generics.split_for_impl();

        Some(quote! {
          impl #impl_generics ::variant::Visit<#ty> for #self_ty #where_clause {
            fn visit(&mut self, value: #ty) -> Self::Output {
              <#self_ty>::#name(self, value)
            }
          }
        })
    });

    quote! {
      #input

      impl #impl_generics ::variant::Visitor for #self_ty #where_clause {
        type Output = #output;
        #empty
      }

      #(#alternatives)*
    }
    .into()
}
