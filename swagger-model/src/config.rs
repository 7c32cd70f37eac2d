//! Configuration for the model builder.
//!
//! This module provides [`BuilderConfig`] for the two compatibility switches of
//! the builder. The defaults reproduce the established model documents exactly.
//!
//! # Example
//! ```rust
//! use swagger_model::BuilderConfig;
//!
//! let config = BuilderConfig::new()
//!     .with_anonymous_value_required(true)
//!     .with_placeholder_pointer_sequences(false);
//! assert!(config.anonymous_value_required);
//! ```

use serde::{Deserialize, Serialize};

/// Builder configuration.
///
/// # Fields
///
/// * `anonymous_value_required` - List a member holding an anonymous composite
///   by value in `required`. Default: false (the member is left out of
///   `required`, as in the established documents).
///
/// * `placeholder_pointer_sequences` - Register a sequence of optional
///   references as an empty placeholder model `Parent.Member` instead of
///   resolving the element type. Default: true.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuilderConfig {
    pub anonymous_value_required: bool,
    pub placeholder_pointer_sequences: bool,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self {
            anonymous_value_required: false,
            placeholder_pointer_sequences: true,
        }
    }
}

impl BuilderConfig {
    /// Create a configuration with the default values.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_anonymous_value_required(mut self, required: bool) -> Self {
        self.anonymous_value_required = required;
        self
    }

    pub fn with_placeholder_pointer_sequences(mut self, placeholder: bool) -> Self {
        self.placeholder_pointer_sequences = placeholder;
        self
    }
}
