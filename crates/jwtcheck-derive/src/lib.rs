//! jwtcheck Macros
//!
//! This crate provides the `#[claims]` attribute macro.

use proc_macro::TokenStream;
use quote::quote;
use syn::{DeriveInput, parse_macro_input};

/// Generates registered JWT claim fields and implements `jwtcheck::Claims`.
///
/// Fields included:
/// - Issuer (`iss`) as `issuer`
/// - Subject (`sub`) as `subject`
/// - Audience (`aud`) as `audience`
/// - Expiration Time (`exp`) as `expires_at`
/// - Not Before (`nbf`) as `not_before`
/// - Issued At (`iat`) as `issued_at`
/// - JWT ID (`jti`) as `id`
///
/// The struct always derives `Debug`, `Clone`, `Serialize` and `Deserialize`.
/// Other attributes on the struct are kept.
///
/// `#[claims(validate_with = path)]` calls `path(&self)` from
/// `Claims::validate_custom`; the function returns
/// `Result<(), jwtcheck::BoxError>`.
#[proc_macro_attribute]
pub fn claims(args: TokenStream, input: TokenStream) -> TokenStream {
    let mut validate_with: Option<syn::Path> = None;
    let args_parser = syn::meta::parser(|meta| {
        if meta.path.is_ident("validate_with") {
            validate_with = Some(meta.value()?.parse()?);
            Ok(())
        } else {
            Err(meta.error("unsupported #[claims] argument, expected `validate_with`"))
        }
    });
    parse_macro_input!(args with args_parser);

    let input = parse_macro_input!(input as DeriveInput);

    let struct_name = &input.ident;
    let vis = &input.vis;
    let attrs = &input.attrs;
    let generics = &input.generics;
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    // Extract existing fields if it's a struct
    let existing_fields = if let syn::Data::Struct(syn::DataStruct {
        fields: syn::Fields::Named(fields),
        ..
    }) = &input.data
    {
        &fields.named
    } else {
        return syn::Error::new_spanned(
            struct_name,
            "#[claims] can only be applied to structs with named fields",
        )
        .to_compile_error()
        .into();
    };

    let custom_validation = validate_with.map(|path| {
        quote! {
            fn validate_custom(&self) -> ::core::result::Result<(), jwtcheck::BoxError> {
                #path(self)
            }
        }
    });

    let expanded = quote! {
        #[derive(
            ::core::fmt::Debug,
            ::core::clone::Clone,
            jwtcheck::__private::serde::Serialize,
            jwtcheck::__private::serde::Deserialize
        )]
        #[serde(crate = "jwtcheck::__private::serde")]
        #(#attrs)*
        #vis struct #struct_name #generics #where_clause {
            #[serde(rename = "iss", default, skip_serializing_if = "::core::option::Option::is_none")]
            pub issuer: ::core::option::Option<::std::string::String>,
            #[serde(rename = "sub", default, skip_serializing_if = "::core::option::Option::is_none")]
            pub subject: ::core::option::Option<::std::string::String>,
            #[serde(rename = "aud", default, skip_serializing_if = "jwtcheck::ClaimStrings::is_empty")]
            pub audience: jwtcheck::ClaimStrings,
            #[serde(rename = "exp", default, skip_serializing_if = "::core::option::Option::is_none")]
            pub expires_at: ::core::option::Option<jwtcheck::NumericDate>,
            #[serde(rename = "nbf", default, skip_serializing_if = "::core::option::Option::is_none")]
            pub not_before: ::core::option::Option<jwtcheck::NumericDate>,
            #[serde(rename = "iat", default, skip_serializing_if = "::core::option::Option::is_none")]
            pub issued_at: ::core::option::Option<jwtcheck::NumericDate>,
            #[serde(rename = "jti", default, skip_serializing_if = "::core::option::Option::is_none")]
            pub id: ::core::option::Option<::std::string::String>,

            #existing_fields
        }

        impl #impl_generics jwtcheck::Claims for #struct_name #ty_generics #where_clause {
            fn expiration_time(&self) -> jwtcheck::Result<::core::option::Option<jwtcheck::NumericDate>> {
                ::core::result::Result::Ok(self.expires_at)
            }

            fn issued_at(&self) -> jwtcheck::Result<::core::option::Option<jwtcheck::NumericDate>> {
                ::core::result::Result::Ok(self.issued_at)
            }

            fn not_before(&self) -> jwtcheck::Result<::core::option::Option<jwtcheck::NumericDate>> {
                ::core::result::Result::Ok(self.not_before)
            }

            fn issuer(&self) -> jwtcheck::Result<::core::option::Option<&str>> {
                ::core::result::Result::Ok(self.issuer.as_deref())
            }

            fn subject(&self) -> jwtcheck::Result<::core::option::Option<&str>> {
                ::core::result::Result::Ok(self.subject.as_deref())
            }

            fn audience(&self) -> jwtcheck::Result<::std::vec::Vec<&str>> {
                ::core::result::Result::Ok(self.audience.iter().collect())
            }

            #custom_validation
        }
    };

    TokenStream::from(expanded)
}
