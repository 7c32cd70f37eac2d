//! Error types for the macro crate.

use syn::{DeriveInput, Ident};

/// Error that occurred while parsing a derive input.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ParseError {
    #[error("Invalid container attributes: {0}")]
    ContainerAttrs(String),

    #[error("Invalid field attributes: {0}")]
    FieldAttrs(String),

    #[error("Field at index {0} has no identifier")]
    MissingFieldIdent(usize),

    #[error("Variant `{0}` carries data; Describe can only be derived for enums with unit variants")]
    DataVariant(Ident),

    #[error("Expected {expected}, found {found}")]
    UnexpectedData {
        expected: &'static str,
        found: &'static str,
    },
}

impl ParseError {
    /// Convert to a syn::Error spanned at the offending tokens.
    pub fn into_syn_error(self, input: &DeriveInput) -> syn::Error {
        match &self {
            Self::DataVariant(variant) => syn::Error::new_spanned(variant, self.to_string()),
            _ => syn::Error::new_spanned(&input.ident, self.to_string()),
        }
    }
}
