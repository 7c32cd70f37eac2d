//! Impl block generation for the Describe traits.
//!
//! This module generates the `impl Describe for Type` (and, for structs,
//! `impl DescribeComposite for Type`) blocks emitted by the derive macro.

use proc_macro2::TokenStream;
use quote::quote;
use syn::{parse_quote, GenericParam, Generics};

use crate::ir::{MemberIR, ModelIR, ModelIdentity, ModelKind};

/// Generates the impl blocks for a parsed model.
#[derive(Debug, Default)]
pub struct ImplBlockGenerator;

impl ImplBlockGenerator {
    pub fn new() -> Self {
        Self
    }

    /// Generate the complete impl blocks for a model.
    pub fn generate(&self, model: &ModelIR) -> TokenStream {
        let name = syn::Ident::new(&model.rust_name, proc_macro2::Span::call_site());
        let generics = self.bounded_generics(&model.generics);
        let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

        let shape = match &model.kind {
            ModelKind::Struct(_) => quote! {
                ::swagger_model::TypeShape::Composite(::swagger_model::CompositeRef::of::<Self>())
            },
            ModelKind::Newtype(inner) => quote! {
                <#inner as ::swagger_model::Describe>::shape()
            },
            ModelKind::Opaque => quote! { ::swagger_model::TypeShape::Opaque },
            ModelKind::UnitEnum => quote! {
                ::swagger_model::TypeShape::Primitive(::swagger_model::Primitive::String)
            },
        };

        let composite_impl = match &model.kind {
            ModelKind::Struct(members) => {
                let composite = self.generate_composite(model, members);
                quote! {
                    impl #impl_generics ::swagger_model::DescribeComposite for #name #ty_generics #where_clause {
                        fn composite() -> ::swagger_model::CompositeType {
                            #composite
                        }
                    }
                }
            }
            _ => quote! {},
        };

        quote! {
            impl #impl_generics ::swagger_model::Describe for #name #ty_generics #where_clause {
                fn shape() -> ::swagger_model::TypeShape {
                    #shape
                }
            }

            #composite_impl
        }
    }

    /// Generate the expression building the composite descriptor.
    fn generate_composite(&self, model: &ModelIR, members: &[MemberIR]) -> TokenStream {
        let rust_name = &model.rust_name;
        let id = match &model.identity {
            ModelIdentity::ModulePath => Some(quote! {
                ::swagger_model::descriptor::model_id(::core::module_path!(), #rust_name)
            }),
            ModelIdentity::Explicit(id) => Some(quote! { #id }),
            ModelIdentity::Anonymous => None,
        };
        let head = match id {
            Some(id) => {
                let id = self.instantiated_id(&model.generics, id);
                quote! {
                    ::swagger_model::CompositeType::named(#id)
                        .with_key(::core::any::type_name::<Self>())
                }
            }
            None => quote! {
                ::swagger_model::CompositeType::anonymous(::core::any::type_name::<Self>())
            },
        };

        let members = members.iter().map(|member| self.generate_member(member));

        quote! {
            #head
            #(.member(#members))*
        }
    }

    fn generate_member(&self, member: &MemberIR) -> TokenStream {
        let name = &member.rust_name;
        let ty = &member.ty;
        let constructor = if member.flatten {
            quote! { embedded }
        } else {
            quote! { new }
        };

        let mut tokens = quote! {
            ::swagger_model::Member::#constructor(#name, <#ty as ::swagger_model::Describe>::shape())
        };

        if member.has_directives() {
            let rename = member.rename.as_ref().map(|n| quote! { .with_rename(#n) });
            let omit_empty = member.omit_empty.then(|| quote! { .with_omit_empty(true) });
            let as_string = member.as_string.then(|| quote! { .with_as_string(true) });
            let description = member
                .description
                .as_ref()
                .map(|d| quote! { .with_description(#d) });

            tokens = quote! {
                #tokens.with_directives(
                    ::swagger_model::Directives::new()
                        #rename
                        #omit_empty
                        #as_string
                        #description
                )
            };
        }

        tokens
    }

    /// Append the type arguments to the id of a generic type, so each
    /// instantiation gets its own model.
    fn instantiated_id(&self, generics: &Generics, id: TokenStream) -> TokenStream {
        let params: Vec<_> = generics.type_params().map(|param| &param.ident).collect();
        if params.is_empty() {
            return id;
        }
        quote! {
            ::swagger_model::descriptor::generic_model_id(
                &#id,
                &[#(<#params as ::swagger_model::Describe>::shape()),*],
            )
        }
    }

    /// Add a `Describe` bound to every type parameter.
    fn bounded_generics(&self, generics: &Generics) -> Generics {
        let mut generics = generics.clone();
        for param in &mut generics.params {
            if let GenericParam::Type(type_param) = param {
                type_param.bounds.push(parse_quote!(::swagger_model::Describe));
            }
        }
        generics
    }
}
