//! Enum parsing logic.
//!
//! Enums whose variants carry no data serialize as strings, so they are
//! described as a string primitive. Data-carrying variants have no model
//! representation and are rejected.

use syn::{Data, DeriveInput, Fields};

use crate::error::ParseError;
use crate::ir::{ModelIR, ModelKind};
use crate::parser::struct_parser::parse_container_attrs;

/// Parses Rust enum definitions into ModelIR.
pub struct EnumParser;

impl EnumParser {
    /// Parse a DeriveInput into a ModelIR.
    pub fn parse(input: &DeriveInput) -> Result<ModelIR, ParseError> {
        let container_attrs = parse_container_attrs(input)?;

        let data_enum = match &input.data {
            Data::Enum(e) => e,
            Data::Struct(_) => return Err(unexpected("struct")),
            Data::Union(_) => return Err(unexpected("union")),
        };

        if let Some(variant) = data_enum
            .variants
            .iter()
            .find(|variant| !matches!(variant.fields, Fields::Unit))
        {
            return Err(ParseError::DataVariant(variant.ident.clone()));
        }

        Ok(ModelIR::new(container_attrs.ident.to_string(), ModelKind::UnitEnum)
            .with_generics(input.generics.clone()))
    }
}

fn unexpected(found: &'static str) -> ParseError {
    ParseError::UnexpectedData {
        expected: "enum",
        found,
    }
}
