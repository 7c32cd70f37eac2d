//! Attribute parsing using darling for ergonomic derive macro attributes.
//!
//! This module defines the attribute structures for `#[model(...)]` attributes
//! on containers (structs/enums) and fields.

use darling::{FromDeriveInput, FromField, FromMeta};
use syn::Ident;

/// Container-level attributes for structs and enums.
/// Parsed from `#[model(...)]` on the type definition.
#[derive(Debug, Clone, FromDeriveInput)]
#[darling(attributes(model), supports(struct_any, enum_any))]
pub struct ContainerAttrs {
    /// The identifier of the type
    pub ident: Ident,

    /// Exact model id
    #[darling(default)]
    pub rename: Option<String>,

    /// Prefix replacing the module path segment of the model id
    #[darling(default)]
    pub namespace: Option<String>,

    /// No canonical id; nested uses get a synthetic one
    #[darling(default)]
    pub anonymous: bool,

    /// Rename all fields using a case convention
    #[darling(default)]
    pub rename_all: Option<RenameRule>,
}

impl ContainerAttrs {
    /// Check that at most one way of naming the model is used.
    pub fn validate(&self) -> Result<(), String> {
        let naming = [self.rename.is_some(), self.namespace.is_some(), self.anonymous];
        if naming.iter().filter(|set| **set).count() > 1 {
            return Err("`rename`, `namespace` and `anonymous` are mutually exclusive".to_string());
        }
        Ok(())
    }
}

/// Field-level attributes parsed from `#[model(...)]` on struct fields.
#[derive(Debug, Clone, FromField)]
#[darling(attributes(model))]
pub struct FieldAttrs {
    /// Field identifier (None for tuple struct fields)
    pub ident: Option<Ident>,

    /// Rename this field
    #[darling(default)]
    pub rename: Option<String>,

    /// Leave this field out of the model
    #[darling(default)]
    pub skip: bool,

    /// Never list this field as required
    #[darling(default)]
    pub omit_empty: bool,

    /// Value encoded as a string
    #[darling(default)]
    pub string: bool,

    /// Promote the fields of this member into the parent model
    #[darling(default)]
    pub flatten: bool,

    /// Property description
    #[darling(default)]
    pub description: Option<String>,
}

impl FieldAttrs {
    /// Get the property name for this field (renamed or original).
    pub fn property_name(&self, rename_rule: Option<RenameRule>) -> String {
        if let Some(ref name) = self.rename {
            return name.clone();
        }

        match (&self.ident, rename_rule) {
            (Some(ident), Some(rule)) => rule.apply(&ident.to_string()),
            (Some(ident), None) => ident.to_string(),
            (None, _) => String::new(),
        }
    }
}

/// Rename rule for field name transformation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromMeta)]
pub enum RenameRule {
    /// camelCase
    #[darling(rename = "camelCase")]
    CamelCase,

    /// snake_case
    #[darling(rename = "snake_case")]
    SnakeCase,

    /// PascalCase
    #[darling(rename = "PascalCase")]
    PascalCase,

    /// SCREAMING_SNAKE_CASE
    #[darling(rename = "SCREAMING_SNAKE_CASE")]
    ScreamingSnakeCase,

    /// kebab-case
    #[darling(rename = "kebab-case")]
    KebabCase,

    /// lowercase
    #[darling(rename = "lowercase")]
    Lowercase,
}

impl RenameRule {
    /// Parse a serde-style rule name.
    #[allow(unused)]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "camelCase" => Some(Self::CamelCase),
            "snake_case" => Some(Self::SnakeCase),
            "PascalCase" => Some(Self::PascalCase),
            "SCREAMING_SNAKE_CASE" => Some(Self::ScreamingSnakeCase),
            "kebab-case" => Some(Self::KebabCase),
            "lowercase" => Some(Self::Lowercase),
            _ => None,
        }
    }

    /// Apply the rename rule to a string.
    pub fn apply(&self, name: &str) -> String {
        use convert_case::{Case, Casing};

        match self {
            RenameRule::CamelCase => name.to_case(Case::Camel),
            RenameRule::SnakeCase => name.to_case(Case::Snake),
            RenameRule::PascalCase => name.to_case(Case::Pascal),
            RenameRule::ScreamingSnakeCase => name.to_case(Case::UpperSnake),
            RenameRule::KebabCase => name.to_case(Case::Kebab),
            RenameRule::Lowercase => name.to_lowercase(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use syn::{parse_quote, DeriveInput};

    #[test]
    fn test_rename_rule_camel_case() {
        assert_eq!(RenameRule::CamelCase.apply("user_name"), "userName");
        assert_eq!(RenameRule::CamelCase.apply("UserName"), "userName");
    }

    #[test]
    fn test_rename_rule_pascal_case() {
        assert_eq!(RenameRule::PascalCase.apply("user_name"), "UserName");
        assert_eq!(RenameRule::PascalCase.apply("history_ptrs"), "HistoryPtrs");
    }

    #[test]
    fn test_rename_rule_other_cases() {
        assert_eq!(RenameRule::SnakeCase.apply("userName"), "user_name");
        assert_eq!(RenameRule::ScreamingSnakeCase.apply("user_name"), "USER_NAME");
        assert_eq!(RenameRule::KebabCase.apply("user_name"), "user-name");
        assert_eq!(RenameRule::Lowercase.apply("user_name"), "user_name");
    }

    #[test]
    fn test_rename_rule_from_name() {
        assert_eq!(RenameRule::from_name("camelCase"), Some(RenameRule::CamelCase));
        assert_eq!(RenameRule::from_name("kebab-case"), Some(RenameRule::KebabCase));
        assert_eq!(RenameRule::from_name("unknown"), None);
    }

    #[test]
    fn test_container_attrs_parse() {
        let input: DeriveInput = parse_quote! {
            #[model(namespace = "swagger", rename_all = "PascalCase")]
            struct File {
                history: Vec<File>,
            }
        };

        let attrs = ContainerAttrs::from_derive_input(&input).unwrap();
        assert_eq!(attrs.namespace.as_deref(), Some("swagger"));
        assert_eq!(attrs.rename_all, Some(RenameRule::PascalCase));
        assert!(!attrs.anonymous);
        assert!(attrs.validate().is_ok());
    }

    #[test]
    fn test_container_attrs_conflict() {
        let input: DeriveInput = parse_quote! {
            #[model(rename = "a.B", anonymous)]
            struct B {
                b: i32,
            }
        };

        let attrs = ContainerAttrs::from_derive_input(&input).unwrap();
        assert!(attrs.validate().is_err());
    }

    #[test]
    fn test_unknown_container_attr_is_rejected() {
        let input: DeriveInput = parse_quote! {
            #[model(strict)]
            struct B {
                b: i32,
            }
        };

        assert!(ContainerAttrs::from_derive_input(&input).is_err());
    }

    #[test]
    fn test_field_attrs_property_name() {
        let field: syn::Field = parse_quote! {
            #[model(string, omit_empty)]
            count: i32
        };

        let attrs = FieldAttrs::from_field(&field).unwrap();
        assert!(attrs.string);
        assert!(attrs.omit_empty);
        assert_eq!(attrs.property_name(None), "count");
        assert_eq!(attrs.property_name(Some(RenameRule::PascalCase)), "Count");

        let renamed: syn::Field = parse_quote! {
            #[model(rename = "C")]
            count: i32
        };
        let attrs = FieldAttrs::from_field(&renamed).unwrap();
        assert_eq!(attrs.property_name(Some(RenameRule::CamelCase)), "C");
    }
}

#[cfg(test)]
mod proptest_tests {
    use super::*;
    use proptest::prelude::*;

    fn arb_identifier() -> impl Strategy<Value = String> {
        proptest::collection::vec("[a-z]{1,10}", 1..=3).prop_map(|words| words.join("_"))
    }

    fn arb_rename_rule() -> impl Strategy<Value = RenameRule> {
        prop_oneof![
            Just(RenameRule::CamelCase),
            Just(RenameRule::SnakeCase),
            Just(RenameRule::PascalCase),
            Just(RenameRule::ScreamingSnakeCase),
            Just(RenameRule::KebabCase),
            Just(RenameRule::Lowercase),
        ]
    }

    proptest! {
        /// Renaming never yields an empty property name and is deterministic.
        #[test]
        fn prop_rename_produces_stable_output(
            name in arb_identifier(),
            rule in arb_rename_rule()
        ) {
            let first = rule.apply(&name);
            prop_assert!(!first.is_empty());
            prop_assert_eq!(first, rule.apply(&name));
        }
    }
}
