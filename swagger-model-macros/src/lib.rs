//! # swagger-model-macros
//!
//! Procedural macros describing Rust types to the `swagger-model` builder.
//!
//! This crate provides the `#[derive(Describe)]` macro that implements
//! `Describe` (and `DescribeComposite` for structs) from a type definition.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use swagger_model::Describe;
//!
//! #[derive(Describe)]
//! #[model(namespace = "swagger")]
//! struct X {
//!     A: String,
//!     #[model(skip)]
//!     B: String,
//!     #[model(string)]
//!     C: i32,
//!     #[serde(skip_serializing_if = "Option::is_none")]
//!     D: Option<i32>,
//! }
//! ```
//!
//! ## Attributes
//!
//! ### Container Attributes (on struct/enum)
//!
//! - `#[model(rename = "pkg.Name")]` - Use this exact model id
//! - `#[model(namespace = "pkg")]` - Model id becomes `pkg.TypeName`
//! - `#[model(anonymous)]` - No canonical id; nested uses get `Parent.member`
//! - `#[model(rename_all = "camelCase")]` - Rename all fields (camelCase, snake_case, PascalCase, etc.)
//!
//! ### Field Attributes
//!
//! - `#[model(rename = "name")]` - Rename this field
//! - `#[model(skip)]` - Skip this field
//! - `#[model(omit_empty)]` - Never list this field as required
//! - `#[model(string)]` - Value encoded as a string
//! - `#[model(flatten)]` - Promote the member's fields into this model
//! - `#[model(description = "...")]` - Property description (doc comments are used otherwise)

use proc_macro::TokenStream;
use syn::{Data, DeriveInput};

mod codegen;
mod error;
mod ir;
mod parser;

use codegen::ImplBlockGenerator;
use parser::enum_parser::EnumParser;
use parser::struct_parser::StructParser;

/// Derive macro implementing `Describe` for structs and unit-only enums.
///
/// # Example
///
/// ```rust,ignore
/// use swagger_model::Describe;
///
/// #[derive(Describe)]
/// struct File {
///     history: Vec<File>,
/// }
/// ```
#[proc_macro_derive(Describe, attributes(model, serde))]
pub fn derive_describe(input: TokenStream) -> TokenStream {
    let input = syn::parse_macro_input!(input as DeriveInput);

    match derive_describe_impl(&input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.into_compile_error().into(),
    }
}

/// Route to the parser for the input kind and generate the impl blocks.
fn derive_describe_impl(input: &DeriveInput) -> Result<proc_macro2::TokenStream, syn::Error> {
    let model = match &input.data {
        Data::Struct(_) => StructParser::parse(input),
        Data::Enum(_) => EnumParser::parse(input),
        Data::Union(_) => {
            return Err(syn::Error::new_spanned(
                &input.ident,
                "Describe cannot be derived for unions",
            ));
        }
    }
    .map_err(|e| e.into_syn_error(input))?;

    Ok(ImplBlockGenerator::new().generate(&model))
}
