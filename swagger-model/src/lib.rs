//! # swagger-model
//!
//! Swagger-style model documents built from Rust type descriptors.
//!
//! Given a root type, the [`ModelBuilder`] walks every composite type reachable
//! from it and registers one flat [`Model`] per distinct type in a
//! [`ModelRegistry`]. Nested types are referenced by id, never inlined, so
//! recursive and mutually recursive types produce a finite document set.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use swagger_model::{build_models, Describe};
//!
//! #[derive(Describe)]
//! struct File {
//!     history: Vec<File>,
//!     history_ptrs: Vec<Option<Box<File>>>,
//! }
//!
//! let registry = build_models::<File>();
//! println!("{}", registry.to_json_pretty()?);
//! ```
//!
//! ## Features
//!
//! | Feature | Description | Default |
//! |---------|-------------|---------|
//! | `derive` | `#[derive(Describe)]` for structs and unit enums | ✅ |
//!
//! ## Container Attributes
//!
//! | Attribute | Description |
//! |-----------|-------------|
//! | `#[model(rename = "pkg.Name")]` | Use this model id |
//! | `#[model(namespace = "pkg")]` | Id becomes `pkg.TypeName` |
//! | `#[model(anonymous)]` | No canonical id; nested uses get `Parent.member` |
//! | `#[model(rename_all = "camelCase")]` | Rename all members |
//!
//! Without attributes a type's id is the last segment of its module path
//! followed by the type name, e.g. `api.User` for `crate::api::User`.
//!
//! ## Field Attributes
//!
//! | Attribute | Description |
//! |-----------|-------------|
//! | `#[model(rename = "name")]` | Property name |
//! | `#[model(skip)]` | Leave the member out |
//! | `#[model(omit_empty)]` | Never list the member as required |
//! | `#[model(string)]` | Value encoded as a string |
//! | `#[model(flatten)]` | Promote the member's fields into this model |
//! | `#[model(description = "...")]` | Property description |
//!
//! `#[serde(rename, rename_all, skip, skip_serializing, flatten,
//! skip_serializing_if)]` are honored as well; `skip_serializing_if` counts
//! as `omit_empty`. A flattened `Option` contributes no required members.
//!
//! Generic types get one model per instantiation, e.g. `api.Page[api.User]`.
//!
//! ## Type Mappings
//!
//! | Rust Type | Property |
//! |-----------|----------|
//! | `String`, `&str`, `char` | `string` |
//! | `bool` | `boolean` |
//! | integers | `integer` |
//! | `f32`, `f64` | `number` |
//! | `Option<T>` | `T`, always required |
//! | `Vec<T>`, sets, slices, arrays | `array` with `items` |
//! | `HashMap<K, V>`, `BTreeMap<K, V>` | `object` |
//! | `Box<T>`, `Arc<T>`, `Rc<T>` | `T` (unwrapped) |
//! | `()`, `serde_json::Value` | omitted |
//!
//! ## Content Negotiation
//!
//! The [`entity`] module maps media types to JSON and XML readers and writers.

pub mod builder;
pub mod cache;
pub mod config;
pub mod descriptor;
pub mod entity;
pub mod error;
pub mod model;
pub mod registry;

pub use builder::{build_models, build_models_for, build_models_with, ModelBuilder};
pub use cache::ModelCache;
pub use config::BuilderConfig;
pub use descriptor::{
    CompositeRef, CompositeType, Describe, DescribeComposite, Directives, Member, Primitive,
    TypeShape,
};
pub use error::{EntityError, EntityResult};
pub use model::{Items, Model, ModelProperty};
pub use registry::ModelRegistry;

// Re-export derive macro when available
#[cfg(feature = "derive")]
pub use swagger_model_macros::Describe;
