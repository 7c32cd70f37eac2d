//! Serde attribute compatibility.
//!
//! This module handles parsing serde attributes when the `serde-compat` feature
//! is enabled, so a type's model follows its existing serde configuration.
//! `#[model(...)]` attributes take precedence when both are present.

use syn::meta::ParseNestedMeta;
use syn::{Attribute, Token};

use super::attributes::RenameRule;

/// Serde container attributes extracted from `#[serde(...)]`.
#[derive(Debug, Clone, Default)]
pub struct SerdeContainerAttrs {
    /// Rename all fields using a case convention
    pub rename_all: Option<RenameRule>,
}

impl SerdeContainerAttrs {
    /// Parse serde attributes from a list of attributes.
    pub fn from_attrs(attrs: &[Attribute]) -> Self {
        let mut result = Self::default();

        for attr in serde_attrs(attrs) {
            let _ = attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("rename_all") {
                    // `rename_all(serialize = "...")` is not a single rule
                    if meta.input.peek(Token![=]) {
                        let value = parse_string_value(&meta)?;
                        result.rename_all = RenameRule::from_name(&value);
                        return Ok(());
                    }
                }
                skip_value(&meta)
            });
        }

        result
    }
}

/// Serde field attributes extracted from `#[serde(...)]`.
#[derive(Debug, Clone, Default)]
pub struct SerdeFieldAttrs {
    /// Rename this field
    pub rename: Option<String>,

    /// Skip this field
    pub skip: bool,

    /// Skip serializing this field
    pub skip_serializing: bool,

    /// Field is left out of the output when the predicate holds
    pub skip_serializing_if: bool,

    /// Flatten nested object
    pub flatten: bool,
}

impl SerdeFieldAttrs {
    /// Parse serde attributes from a list of attributes.
    pub fn from_attrs(attrs: &[Attribute]) -> Self {
        let mut result = Self::default();

        for attr in serde_attrs(attrs) {
            let _ = attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("rename") && meta.input.peek(Token![=]) {
                    result.rename = Some(parse_string_value(&meta)?);
                } else if meta.path.is_ident("skip") {
                    result.skip = true;
                } else if meta.path.is_ident("skip_serializing") {
                    result.skip_serializing = true;
                } else if meta.path.is_ident("skip_serializing_if") {
                    result.skip_serializing_if = true;
                    return skip_value(&meta);
                } else if meta.path.is_ident("flatten") {
                    result.flatten = true;
                } else {
                    return skip_value(&meta);
                }
                Ok(())
            });
        }

        result
    }

    /// Check if this field is left out of the serialized form.
    /// `skip_deserializing` alone keeps the field in the model.
    pub fn should_skip(&self) -> bool {
        self.skip || self.skip_serializing
    }
}

fn serde_attrs(attrs: &[Attribute]) -> impl Iterator<Item = &Attribute> {
    attrs.iter().filter(|attr| attr.path().is_ident("serde"))
}

/// Parse a string value from a meta item like `rename = "value"`.
fn parse_string_value(meta: &ParseNestedMeta) -> syn::Result<String> {
    let value: syn::LitStr = meta.value()?.parse()?;
    Ok(value.value())
}

/// Consume the value of a meta item this parser does not interpret, so the
/// items after it are still visited.
fn skip_value(meta: &ParseNestedMeta) -> syn::Result<()> {
    if meta.input.peek(Token![=]) {
        let _: syn::Expr = meta.value()?.parse()?;
    } else if meta.input.peek(syn::token::Paren) {
        let content;
        syn::parenthesized!(content in meta.input);
        let _: proc_macro2::TokenStream = content.parse()?;
    }
    Ok(())
}
