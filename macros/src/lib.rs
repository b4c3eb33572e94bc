//! Derive macros for nested-todo
//!
//! This crate provides procedural macros to reduce boilerplate around action
//! enums.
//!
//! # Available Macros
//!
//! - `#[derive(Action)]` - Generates the wire name of every action variant
//!
//! # Example
//!
//! ```ignore
//! use nested_todo_macros::Action;
//!
//! #[derive(Action, Clone, Debug)]
//! enum TodoAction {
//!     Create { text: String },
//!     ToggleCompleteAll,
//! }
//!
//! // Generated methods:
//! assert_eq!(TodoAction::ToggleCompleteAll.action_type(), "TOGGLE_COMPLETE_ALL");
//! assert_eq!(TodoAction::ACTION_TYPES, &["CREATE", "TOGGLE_COMPLETE_ALL"]);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

use proc_macro::TokenStream;
use quote::quote;
use syn::{Attribute, Data, DeriveInput, Expr, ExprLit, Fields, Lit, Meta, parse_macro_input};

/// Derive macro for Action enums
///
/// Generates, on the enum itself:
/// - `ACTION_TYPES` - every wire name, in declaration order
/// - `action_type()` - the wire name of this variant
///
/// The wire name defaults to the variant name in `SCREAMING_SNAKE_CASE`
/// (`UndoComplete` becomes `UNDO_COMPLETE`).
///
/// # Attributes
///
/// - `#[action_type = "NAME"]` - Override the wire name of a variant
///
/// # Panics
///
/// This macro will produce a compile error (not a runtime panic) if:
/// - Applied to a non-enum type
/// - `#[action_type]` is not a string literal
/// - Two variants end up with the same wire name
///
/// # Example
///
/// ```ignore
/// #[derive(Action, Clone, Debug)]
/// enum FilterAction {
///     #[action_type = "SET_STATUS_FILTER"]
///     SetFilter { filter: String },
///     ClearFilter,
/// }
///
/// assert_eq!(FilterAction::ClearFilter.action_type(), "CLEAR_FILTER");
/// ```
#[proc_macro_derive(Action, attributes(action_type))]
pub fn derive_action(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let name = &input.ident;

    let Data::Enum(data_enum) = &input.data else {
        return syn::Error::new_spanned(input, "#[derive(Action)] can only be used on enums")
            .to_compile_error()
            .into();
    };

    let mut names: Vec<String> = Vec::with_capacity(data_enum.variants.len());
    let mut arms = Vec::with_capacity(data_enum.variants.len());

    for variant in &data_enum.variants {
        let variant_name = &variant.ident;

        let wire_name = match wire_name_override(&variant.attrs) {
            Ok(Some(explicit)) => explicit,
            Ok(None) => screaming_snake_case(&variant_name.to_string()),
            Err(error) => return error.to_compile_error().into(),
        };

        if names.contains(&wire_name) {
            return syn::Error::new_spanned(
                variant,
                format!("Duplicate action type \"{wire_name}\""),
            )
            .to_compile_error()
            .into();
        }

        arms.push(match &variant.fields {
            Fields::Named(_) => quote! { Self::#variant_name { .. } => #wire_name, },
            Fields::Unnamed(_) => quote! { Self::#variant_name(..) => #wire_name, },
            Fields::Unit => quote! { Self::#variant_name => #wire_name, },
        });
        names.push(wire_name);
    }

    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let expanded = quote! {
        impl #impl_generics #name #ty_generics #where_clause {
            /// Wire names of every action variant, in declaration order
            pub const ACTION_TYPES: &'static [&'static str] = &[#(#names),*];

            /// Returns the wire name of this action
            #[must_use]
            pub const fn action_type(&self) -> &'static str {
                match *self {
                    #(#arms)*
                }
            }
        }
    };

    TokenStream::from(expanded)
}

/// Read `#[action_type = "NAME"]` if present
fn wire_name_override(attrs: &[Attribute]) -> syn::Result<Option<String>> {
    let Some(attr) = attrs.iter().find(|attr| attr.path().is_ident("action_type")) else {
        return Ok(None);
    };

    match &attr.meta {
        Meta::NameValue(pair) => match &pair.value {
            Expr::Lit(ExprLit {
                lit: Lit::Str(value),
                ..
            }) if !value.value().is_empty() => Ok(Some(value.value())),
            other => Err(syn::Error::new_spanned(
                other,
                "#[action_type] expects a non-empty string literal",
            )),
        },
        other => Err(syn::Error::new_spanned(
            other,
            "expected #[action_type = \"NAME\"]",
        )),
    }
}

/// `UndoComplete` -> `UNDO_COMPLETE`, `HTTPRequest` -> `HTTP_REQUEST`
fn screaming_snake_case(ident: &str) -> String {
    let chars: Vec<char> = ident.chars().collect();
    let mut out = String::with_capacity(ident.len() + 4);

    for (i, &c) in chars.iter().enumerate() {
        if c.is_uppercase() && i > 0 {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            if prev.is_lowercase() || prev.is_ascii_digit() || (prev.is_uppercase() && next_is_lower)
            {
                out.push('_');
            }
        }
        out.extend(c.to_uppercase());
    }

    out
}
