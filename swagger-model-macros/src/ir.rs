//! Intermediate representation of a described type.
//!
//! The parsers turn a `DeriveInput` into a [`ModelIR`]; the code generator
//! turns a [`ModelIR`] into the `Describe` impls.

use syn::{Generics, Type};

/// A parsed type definition.
#[derive(Debug, Clone)]
pub struct ModelIR {
    /// Original Rust type name
    pub rust_name: String,

    /// How the model id is derived
    pub identity: ModelIdentity,

    pub kind: ModelKind,

    /// Generic parameters of the type
    pub generics: Generics,
}

impl ModelIR {
    /// Create a new ModelIR with the default identity.
    pub fn new(rust_name: impl Into<String>, kind: ModelKind) -> Self {
        Self {
            rust_name: rust_name.into(),
            identity: ModelIdentity::ModulePath,
            kind,
            generics: Generics::default(),
        }
    }

    pub fn with_identity(mut self, identity: ModelIdentity) -> Self {
        self.identity = identity;
        self
    }

    pub fn with_generics(mut self, generics: Generics) -> Self {
        self.generics = generics;
        self
    }
}

/// Source of a model id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelIdentity {
    /// Last module path segment and type name, resolved at expansion site
    ModulePath,

    /// Exact id from `#[model(rename = "...")]`
    Explicit(String),

    /// No canonical id
    Anonymous,
}

/// Kind of type definition.
#[derive(Debug, Clone)]
pub enum ModelKind {
    /// Struct with named fields
    Struct(Vec<MemberIR>),

    /// Single-field tuple struct, described as its inner type
    Newtype(Type),

    /// Unit struct or tuple struct with several fields
    Opaque,

    /// Enum whose variants carry no data, described as a string
    UnitEnum,
}

/// A parsed struct member.
#[derive(Debug, Clone)]
pub struct MemberIR {
    /// Original Rust field name
    pub rust_name: String,

    /// Explicit or rule-derived property name, if it differs from the field name
    pub rename: Option<String>,

    pub ty: Type,

    /// Promote the member's fields into the parent
    pub flatten: bool,

    /// Never list as required
    pub omit_empty: bool,

    /// Primitive encoded as a string
    pub as_string: bool,

    pub description: Option<String>,
}

impl MemberIR {
    pub fn new(rust_name: impl Into<String>, ty: Type) -> Self {
        Self {
            rust_name: rust_name.into(),
            rename: None,
            ty,
            flatten: false,
            omit_empty: false,
            as_string: false,
            description: None,
        }
    }

    /// Set the property name; a name equal to the field name is dropped.
    pub fn with_property_name(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        self.rename = (name != self.rust_name).then_some(name);
        self
    }

    pub fn with_flatten(mut self, flatten: bool) -> Self {
        self.flatten = flatten;
        self
    }

    pub fn with_omit_empty(mut self, omit_empty: bool) -> Self {
        self.omit_empty = omit_empty;
        self
    }

    pub fn with_as_string(mut self, as_string: bool) -> Self {
        self.as_string = as_string;
        self
    }

    pub fn with_description(mut self, description: Option<String>) -> Self {
        self.description = description;
        self
    }

    /// Name the member appears under in a model.
    #[cfg(test)]
    pub fn property_name(&self) -> &str {
        self.rename.as_deref().unwrap_or(&self.rust_name)
    }

    /// Whether any directive differs from the default.
    pub fn has_directives(&self) -> bool {
        self.rename.is_some() || self.omit_empty || self.as_string || self.description.is_some()
    }
}
