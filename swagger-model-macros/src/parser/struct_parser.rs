//! Struct parsing logic.
//!
//! This module handles parsing Rust struct definitions into IR.
//! It supports:
//! - Named structs with fields
//! - Newtype structs, described as their inner type
//! - Unit and multi-field tuple structs, described as opaque
//! - Doc comment extraction
//! - Container and field attributes

use darling::{FromDeriveInput, FromField};
use syn::{Attribute, Data, DeriveInput, Fields, Lit, Meta};

use crate::error::ParseError;
use crate::ir::{MemberIR, ModelIR, ModelIdentity, ModelKind};
use crate::parser::attributes::{ContainerAttrs, FieldAttrs, RenameRule};
use crate::parser::serde_compat::{SerdeContainerAttrs, SerdeFieldAttrs};

/// Parses Rust struct definitions into ModelIR.
pub struct StructParser;

impl StructParser {
    /// Parse a DeriveInput into a ModelIR.
    pub fn parse(input: &DeriveInput) -> Result<ModelIR, ParseError> {
        let container_attrs = parse_container_attrs(input)?;

        let data_struct = match &input.data {
            Data::Struct(s) => s,
            Data::Enum(_) => return Err(unexpected("enum")),
            Data::Union(_) => return Err(unexpected("union")),
        };

        let kind = match &data_struct.fields {
            Fields::Named(fields) => {
                let rename_all = effective_rename_all(&container_attrs, input);
                ModelKind::Struct(Self::parse_named_fields(fields, rename_all)?)
            }
            Fields::Unnamed(fields) if fields.unnamed.len() == 1 => {
                ModelKind::Newtype(fields.unnamed[0].ty.clone())
            }
            Fields::Unnamed(_) | Fields::Unit => ModelKind::Opaque,
        };

        Ok(ModelIR::new(container_attrs.ident.to_string(), kind)
            .with_identity(model_identity(&container_attrs))
            .with_generics(input.generics.clone()))
    }

    /// Parse named struct fields into MemberIR.
    fn parse_named_fields(
        fields: &syn::FieldsNamed,
        rename_all: Option<RenameRule>,
    ) -> Result<Vec<MemberIR>, ParseError> {
        let mut members = Vec::with_capacity(fields.named.len());

        for (index, field) in fields.named.iter().enumerate() {
            let field_attrs = FieldAttrs::from_field(field)
                .map_err(|e| ParseError::FieldAttrs(e.to_string()))?;

            #[cfg(feature = "serde-compat")]
            let serde_field_attrs = SerdeFieldAttrs::from_attrs(&field.attrs);

            #[cfg(not(feature = "serde-compat"))]
            let serde_field_attrs = SerdeFieldAttrs::default();

            if field_attrs.skip || serde_field_attrs.should_skip() {
                continue;
            }

            let rust_name = field
                .ident
                .as_ref()
                .ok_or(ParseError::MissingFieldIdent(index))?
                .to_string();

            let flatten = field_attrs.flatten || serde_field_attrs.flatten;

            // Priority: model rename > serde rename > rename_all rule > field name
            let explicit_rename = field_attrs
                .rename
                .clone()
                .or_else(|| serde_field_attrs.rename.clone());

            // Attribute description overrides doc comments
            let description = field_attrs
                .description
                .clone()
                .or_else(|| extract_doc_comments(&field.attrs));

            let mut member = MemberIR::new(&rust_name, field.ty.clone())
                .with_flatten(flatten)
                .with_omit_empty(field_attrs.omit_empty || serde_field_attrs.skip_serializing_if)
                .with_as_string(field_attrs.string)
                .with_description(description);

            // An explicit name turns a flattened member into a named reference,
            // so rename rules never apply to it.
            member = match explicit_rename {
                Some(name) if flatten => {
                    member.rename = Some(name);
                    member
                }
                Some(name) => member.with_property_name(name),
                None if flatten => member,
                None => member.with_property_name(field_attrs.property_name(rename_all)),
            };

            members.push(member);
        }

        Ok(members)
    }
}

/// Parse and validate `#[model(...)]` on the container.
pub(crate) fn parse_container_attrs(input: &DeriveInput) -> Result<ContainerAttrs, ParseError> {
    let container_attrs = ContainerAttrs::from_derive_input(input)
        .map_err(|e| ParseError::ContainerAttrs(e.to_string()))?;
    container_attrs
        .validate()
        .map_err(ParseError::ContainerAttrs)?;
    Ok(container_attrs)
}

/// Merge rename_all: model takes precedence over serde.
fn effective_rename_all(container_attrs: &ContainerAttrs, input: &DeriveInput) -> Option<RenameRule> {
    #[cfg(feature = "serde-compat")]
    let serde_rename_all = SerdeContainerAttrs::from_attrs(&input.attrs).rename_all;

    #[cfg(not(feature = "serde-compat"))]
    let serde_rename_all = {
        let _ = input;
        SerdeContainerAttrs::default().rename_all
    };

    container_attrs.rename_all.or(serde_rename_all)
}

fn model_identity(container_attrs: &ContainerAttrs) -> ModelIdentity {
    if container_attrs.anonymous {
        return ModelIdentity::Anonymous;
    }
    if let Some(rename) = &container_attrs.rename {
        return ModelIdentity::Explicit(rename.clone());
    }
    match &container_attrs.namespace {
        Some(namespace) => {
            ModelIdentity::Explicit(format!("{}.{}", namespace, container_attrs.ident))
        }
        None => ModelIdentity::ModulePath,
    }
}

fn unexpected(found: &'static str) -> ParseError {
    ParseError::UnexpectedData {
        expected: "struct",
        found,
    }
}

/// Extract doc comments from attributes.
///
/// Doc comments in Rust are represented as `#[doc = "..."]` attributes.
/// This function extracts and concatenates them into a single description string.
pub fn extract_doc_comments(attrs: &[Attribute]) -> Option<String> {
    let doc_lines: Vec<String> = attrs
        .iter()
        .filter_map(|attr| {
            if !attr.path().is_ident("doc") {
                return None;
            }

            if let Meta::NameValue(meta) = &attr.meta {
                if let syn::Expr::Lit(expr_lit) = &meta.value {
                    if let Lit::Str(lit_str) = &expr_lit.lit {
                        return Some(lit_str.value());
                    }
                }
            }
            None
        })
        .collect();

    let description = doc_lines
        .iter()
        .map(|line| line.trim())
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string();

    if description.is_empty() {
        None
    } else {
        Some(description)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use syn::parse_quote;

    fn members(schema: &ModelIR) -> &[MemberIR] {
        match &schema.kind {
            ModelKind::Struct(members) => members,
            other => panic!("Expected Struct kind, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_simple_struct() {
        let input: DeriveInput = parse_quote! {
            struct X {
                A: String,
                D: i32,
            }
        };

        let schema = StructParser::parse(&input).unwrap();
        assert_eq!(schema.rust_name, "X");
        assert_eq!(schema.identity, ModelIdentity::ModulePath);

        let members = members(&schema);
        assert_eq!(members.len(), 2);
        assert_eq!(members[0].property_name(), "A");
        assert!(!members[0].has_directives());
        assert_eq!(members[1].rust_name, "D");
    }

    #[test]
    fn test_parse_identity() {
        let renamed: DeriveInput = parse_quote! {
            #[model(rename = "swagger.File")]
            struct File {}
        };
        assert_eq!(
            StructParser::parse(&renamed).unwrap().identity,
            ModelIdentity::Explicit("swagger.File".to_string())
        );

        let namespaced: DeriveInput = parse_quote! {
            #[model(namespace = "api")]
            struct User {}
        };
        assert_eq!(
            StructParser::parse(&namespaced).unwrap().identity,
            ModelIdentity::Explicit("api.User".to_string())
        );

        let anonymous: DeriveInput = parse_quote! {
            #[model(anonymous)]
            struct Inner {}
        };
        assert_eq!(
            StructParser::parse(&anonymous).unwrap().identity,
            ModelIdentity::Anonymous
        );
    }

    #[test]
    fn test_parse_conflicting_identity() {
        let input: DeriveInput = parse_quote! {
            #[model(namespace = "api", anonymous)]
            struct User {}
        };
        assert!(matches!(
            StructParser::parse(&input),
            Err(ParseError::ContainerAttrs(_))
        ));
    }

    #[test]
    fn test_parse_directives() {
        let input: DeriveInput = parse_quote! {
            struct X {
                #[model(skip)]
                B: String,
                #[model(string)]
                C: i32,
                #[model(omit_empty, rename = "E")]
                D: i32,
                /// Display name
                name: String,
            }
        };

        let schema = StructParser::parse(&input).unwrap();
        let members = members(&schema);
        assert_eq!(members.len(), 3);
        assert!(members[0].as_string);
        assert!(members[1].omit_empty);
        assert_eq!(members[1].property_name(), "E");
        assert_eq!(members[2].description.as_deref(), Some("Display name"));
    }

    #[test]
    fn test_parse_rename_all() {
        let input: DeriveInput = parse_quote! {
            #[model(rename_all = "PascalCase")]
            struct File {
                history: Vec<File>,
                history_ptrs: Vec<Option<Box<File>>>,
            }
        };

        let schema = StructParser::parse(&input).unwrap();
        let names: Vec<_> = members(&schema).iter().map(MemberIR::property_name).collect();
        assert_eq!(names, vec!["History", "HistoryPtrs"]);
    }

    #[test]
    fn test_flatten_ignores_rename_rule() {
        let input: DeriveInput = parse_quote! {
            #[model(rename_all = "camelCase")]
            struct X {
                #[model(flatten)]
                base_info: Base,
                #[model(flatten, rename = "b")]
                extra: Extra,
            }
        };

        let schema = StructParser::parse(&input).unwrap();
        let members = members(&schema);
        assert!(members[0].flatten);
        assert_eq!(members[0].rename, None);
        assert!(members[1].flatten);
        assert_eq!(members[1].rename.as_deref(), Some("b"));
    }

    #[test]
    fn test_parse_tuple_and_unit_structs() {
        let newtype: DeriveInput = parse_quote!(struct Id(u64););
        assert!(matches!(
            StructParser::parse(&newtype).unwrap().kind,
            ModelKind::Newtype(_)
        ));

        let pair: DeriveInput = parse_quote!(struct Pair(u64, u64););
        assert!(matches!(
            StructParser::parse(&pair).unwrap().kind,
            ModelKind::Opaque
        ));

        let unit: DeriveInput = parse_quote!(struct Marker;);
        assert!(matches!(
            StructParser::parse(&unit).unwrap().kind,
            ModelKind::Opaque
        ));
    }

    #[test]
    fn test_parse_unknown_field_attr() {
        let input: DeriveInput = parse_quote! {
            struct X {
                #[model(nullable)]
                a: i32,
            }
        };
        assert!(matches!(
            StructParser::parse(&input),
            Err(ParseError::FieldAttrs(_))
        ));
    }

    #[test]
    fn test_extract_doc_comments() {
        let attrs: Vec<Attribute> = vec![
            parse_quote!(#[doc = " First line"]),
            parse_quote!(#[doc = " Second line"]),
        ];
        assert_eq!(
            extract_doc_comments(&attrs).as_deref(),
            Some("First line\nSecond line")
        );
        assert_eq!(extract_doc_comments(&[]), None);
    }

    #[cfg(feature = "serde-compat")]
    #[test]
    fn test_serde_attributes() {
        let input: DeriveInput = parse_quote! {
            #[serde(rename_all = "camelCase")]
            struct User {
                user_name: String,
                #[serde(rename = "id")]
                user_id: u64,
                #[serde(skip)]
                internal: String,
                #[serde(skip_serializing_if = "Option::is_none")]
                nick_name: Option<String>,
                #[serde(flatten)]
                audit: Audit,
            }
        };

        let schema = StructParser::parse(&input).unwrap();
        let members = members(&schema);
        let names: Vec<_> = members.iter().map(MemberIR::property_name).collect();
        assert_eq!(names, vec!["userName", "id", "nickName", "audit"]);
        assert!(members[2].omit_empty);
        assert!(members[3].flatten);
    }

    #[cfg(feature = "serde-compat")]
    #[test]
    fn test_model_rename_all_overrides_serde() {
        let input: DeriveInput = parse_quote! {
            #[serde(rename_all = "camelCase")]
            #[model(rename_all = "PascalCase")]
            struct User {
                user_name: String,
            }
        };

        let schema = StructParser::parse(&input).unwrap();
        assert_eq!(members(&schema)[0].property_name(), "UserName");
    }
}
