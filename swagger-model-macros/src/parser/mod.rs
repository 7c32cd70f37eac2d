//! Parser module for extracting type information from Rust AST.
//!
//! This module contains parsers for:
//! - Struct definitions
//! - Enum definitions
//! - Attributes

pub mod attributes;
pub mod enum_parser;
pub mod serde_compat;
pub mod struct_parser;
