//! Procedural macros for Dovetail.
//!
//! `#[derive(Injectable)]` turns a struct definition into a type
//! descriptor: one constructor parameter per field, in declaration order,
//! and a build function that takes the resolved arguments back in the
//! same order. The descriptor is also submitted for discovery, so
//! `Container::new()` knows the type without further registration.
//!
//! ```rust,ignore
//! #[derive(Injectable)]
//! struct Engine {
//!     wheel: Wheel,
//!     #[inject(id = "Logger")]
//!     logger: Arc<dyn Logger>,
//! }
//! ```

use darling::ast::{Data, Style};
use darling::util::Ignored;
use darling::{FromDeriveInput, FromField};
use dovetail_support::is_builtin;
use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::{ToTokens, quote};
use syn::{DeriveInput, PathArguments, Type, TypePath, parse_macro_input, parse_quote};

#[derive(FromDeriveInput)]
#[darling(attributes(injectable), supports(struct_any))]
struct InjectableInput {
    ident: syn::Ident,
    generics: syn::Generics,
    data: Data<Ignored, InjectField>,
    /// Identifier override; defaults to the struct name.
    #[darling(default)]
    id: Option<String>,
    /// Path to the facade crate; defaults to `::dovetail`.
    #[darling(default, rename = "crate")]
    krate: Option<syn::Path>,
}

#[derive(FromField)]
#[darling(attributes(inject))]
struct InjectField {
    ident: Option<syn::Ident>,
    ty: Type,
    /// Resolve this field through the given identifier.
    #[darling(default)]
    id: Option<String>,
}

#[proc_macro_derive(Injectable, attributes(injectable, inject))]
pub fn derive_injectable(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match expand(&input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.write_errors().into(),
    }
}

fn expand(input: &DeriveInput) -> darling::Result<TokenStream2> {
    let parsed = InjectableInput::from_derive_input(input)?;

    if !parsed.generics.params.is_empty() {
        return Err(
            darling::Error::custom("Injectable cannot be derived for generic types")
                .with_span(&parsed.generics),
        );
    }

    let krate: syn::Path = parsed.krate.clone().unwrap_or_else(|| parse_quote!(::dovetail));
    let ident = &parsed.ident;
    let id = parsed.id.clone().unwrap_or_else(|| ident.to_string());

    let fields = match &parsed.data {
        Data::Struct(fields) => fields,
        Data::Enum(_) => return Err(darling::Error::unsupported_shape("enum")),
    };

    let mut errors = darling::Error::accumulator();
    let mut parameters = Vec::with_capacity(fields.fields.len());
    for (index, field) in fields.fields.iter().enumerate() {
        let name = field
            .ident
            .as_ref()
            .map_or_else(|| index.to_string(), ToString::to_string);
        if let Some(ty) = errors.handle(parameter_type(field, &krate)) {
            parameters.push(quote!(#krate::Parameter::new(#name, #ty)));
        }
    }
    errors.finish()?;

    let constructor = match fields.style {
        Style::Unit => quote!(),
        Style::Tuple | Style::Struct => quote!(.with_constructor(::std::vec![#(#parameters),*])),
    };

    let construct = match fields.style {
        Style::Unit => quote!(#ident),
        Style::Tuple => {
            let takes = fields.fields.iter().map(|_| quote!(args.take()?));
            quote!(#ident(#(#takes),*))
        }
        Style::Struct => {
            let names = fields.fields.iter().filter_map(|field| field.ident.as_ref());
            quote!(#ident { #(#names: args.take()?),* })
        }
    };

    // Empty field lists never touch `args`.
    let build = if fields.fields.is_empty() {
        quote!(|_: #krate::Arguments| ::core::result::Result::Ok(#construct))
    } else {
        quote!(|mut args: #krate::Arguments| ::core::result::Result::Ok(#construct))
    };

    Ok(quote! {
        impl #krate::Injectable for #ident {
            const IDENTIFIER: &'static str = #id;

            fn descriptor() -> #krate::TypeDescriptor {
                #krate::TypeDescriptor::concrete(
                    <Self as #krate::Injectable>::IDENTIFIER,
                    #build,
                )
                #constructor
            }
        }

        #krate::__private::inventory::submit! {
            #krate::Discovered::new(<#ident as #krate::Injectable>::descriptor)
        }
    })
}

/// Classifies a field type into the descriptor's parameter type.
fn parameter_type(field: &InjectField, krate: &syn::Path) -> darling::Result<TokenStream2> {
    if let Some(id) = &field.id {
        return Ok(quote!(#krate::ParameterType::Named(::std::borrow::Cow::Borrowed(#id))));
    }

    match &field.ty {
        Type::Path(TypePath { qself: None, path }) => {
            let last = path
                .segments
                .last()
                .ok_or_else(|| darling::Error::custom("empty type path").with_span(&field.ty))?;
            let name = last.ident.to_string();

            if is_builtin(&name) {
                Ok(quote!(#krate::ParameterType::builtin(#name)))
            } else if matches!(last.arguments, PathArguments::None) {
                Ok(quote!(#krate::ParameterType::Named(::std::borrow::Cow::Borrowed(#name))))
            } else {
                Err(darling::Error::custom(
                    "generic field types need an identifier: #[inject(id = \"...\")]",
                )
                .with_span(&field.ty))
            }
        }
        other => {
            let name = other.to_token_stream().to_string();
            Ok(quote!(#krate::ParameterType::builtin(#name)))
        }
    }
}
