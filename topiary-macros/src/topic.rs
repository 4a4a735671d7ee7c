//! The `#[topic]` attribute.

use proc_macro::TokenStream;
use quote::quote;
use syn::{
    FnArg, Ident, ItemFn, LitStr, Token,
    parse::{Parse, ParseStream},
    parse_macro_input,
};

/// Arguments for the `#[topic]` macro.
pub(crate) struct TopicArgs {
    /// Topic path to subscribe to.
    pub path: LitStr,
    /// Optional name for log events. Defaults to the function name.
    pub name: Option<LitStr>,
}

impl Parse for TopicArgs {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        if input.is_empty() {
            return Err(input.error("expected a topic path, e.g. #[topic(\"orders:created\")]"));
        }

        let path: LitStr = input.parse()?;
        let mut name = None;

        while !input.is_empty() {
            input.parse::<Token![,]>()?;
            if input.is_empty() {
                break;
            }

            let ident: Ident = input.parse()?;
            input.parse::<Token![=]>()?;

            match ident.to_string().as_str() {
                "name" => name = Some(input.parse()?),
                other => {
                    return Err(syn::Error::new(
                        ident.span(),
                        format!("unknown attribute: {}", other),
                    ));
                }
            }
        }

        Ok(TopicArgs { path, name })
    }
}

pub fn topic_impl(attr: TokenStream, item: TokenStream) -> TokenStream {
    let args = parse_macro_input!(attr as TopicArgs);
    let input = parse_macro_input!(item as ItemFn);
    let fn_name = &input.sig.ident;
    let fn_vis = &input.vis;

    if input.sig.asyncness.is_some() {
        return syn::Error::new_spanned(&input.sig.asyncness, "topic handlers cannot be async")
            .to_compile_error()
            .into();
    }

    if input.sig.inputs.len() != 1 {
        return syn::Error::new_spanned(
            &input.sig.inputs,
            "topic handler must take exactly one argument: fn(delivery: &Delivery<'_>)",
        )
        .to_compile_error()
        .into();
    }

    if let Some(FnArg::Receiver(receiver)) = input.sig.inputs.first() {
        return syn::Error::new_spanned(receiver, "topic handler cannot have a self parameter")
            .to_compile_error()
            .into();
    }

    let path = &args.path;
    let name = args
        .name
        .unwrap_or_else(|| LitStr::new(&fn_name.to_string(), fn_name.span()));

    let mut inner = input.clone();
    inner.sig.ident = Ident::new("__inner", fn_name.span());
    inner.vis = syn::Visibility::Inherited;

    let static_name = Ident::new(
        &format!("__TOPIC_HANDLER_{}", fn_name).to_uppercase(),
        fn_name.span(),
    );

    let expanded = quote! {
        #[allow(non_camel_case_types)]
        #[derive(Clone, Copy, Debug, Default)]
        #[doc = concat!("Handler generated by `#[topiary::topic]` on `", stringify!(#fn_name), "`")]
        #fn_vis struct #fn_name;

        impl ::topiary::Handler for #fn_name {
            fn call(&self, __delivery: &::topiary::Delivery<'_>) -> ::topiary::Outcome {
                #inner
                ::topiary::IntoOutcome::into_outcome(__inner(__delivery))
            }
        }

        #[allow(non_upper_case_globals)]
        static #static_name: #fn_name = #fn_name;

        ::topiary::inventory::submit! {
            ::topiary::registration::TopicRegistration::new(#path, &#static_name, #name)
        }
    };

    TokenStream::from(expanded)
}
