//! Type descriptors consumed by the model builder.
//!
//! This module defines the [`Describe`] trait, which is the introspection
//! interface between Rust types and the [`ModelBuilder`](crate::ModelBuilder).
//!
//! ## Overview
//!
//! A descriptor tells the builder three things about a type:
//! - its [`TypeShape`] (primitive, composite, optional, sequence, map, opaque)
//! - for composites, the ordered list of [`Member`]s with their [`Directives`]
//! - whether a member is embedded (its fields are promoted into the parent)
//!
//! Composite shapes are resolved lazily through [`CompositeRef`], so a type that
//! contains a sequence of itself is still described by a finite value.
//!
//! ## Deriving vs Manual Implementation
//!
//! Most users will derive the trait:
//!
//! ```rust,ignore
//! use swagger_model::Describe;
//!
//! #[derive(Describe)]
//! struct File {
//!     history: Vec<File>,
//! }
//! ```
//!
//! Descriptors can also be built by hand, which is what the derive expands to:
//!
//! ```rust
//! use swagger_model::{CompositeRef, CompositeType, Member, Primitive, TypeShape};
//!
//! fn point() -> CompositeType {
//!     CompositeType::named("geo.Point")
//!         .member(Member::new("x", TypeShape::Primitive(Primitive::F64)))
//!         .member(Member::new("y", TypeShape::Primitive(Primitive::F64)))
//! }
//!
//! let shape = TypeShape::Composite(CompositeRef::new(point));
//! assert!(shape.is_composite());
//! ```
//!
//! ## Blanket Implementations
//!
//! - **Primitives**: `String`, `str`, `bool`, `char`, integers, floats
//! - **Optional**: `Option<T>`
//! - **Sequences**: `Vec<T>`, `[T]`, `[T; N]`, `VecDeque<T>`, `LinkedList<T>`, `HashSet<T>`, `BTreeSet<T>`
//! - **Maps**: `HashMap<K, V>`, `BTreeMap<K, V>`
//! - **Unwrapped**: `Box<T>`, `Rc<T>`, `Arc<T>`, `&T`
//! - **Opaque**: `()`, `serde_json::Value`, `PhantomData<T>`

use std::borrow::Cow;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, LinkedList, VecDeque};
use std::fmt;
use std::marker::PhantomData;
use std::rc::Rc;
use std::sync::Arc;

/// Trait for types that can describe their shape to the model builder.
///
/// Implemented for the standard primitives and containers, and derived for
/// structs with `#[derive(Describe)]`.
pub trait Describe {
    /// Returns the shape of this type.
    fn shape() -> TypeShape;
}

/// Trait for record-like types that expose their members.
///
/// The derive macro implements this alongside [`Describe`] for every struct.
pub trait DescribeComposite: Describe {
    /// Returns the composite descriptor of this type.
    fn composite() -> CompositeType;
}

/// Primitive kinds a member can have.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Primitive {
    String,
    Char,
    Bool,
    I8,
    I16,
    I32,
    I64,
    I128,
    Isize,
    U8,
    U16,
    U32,
    U64,
    U128,
    Usize,
    F32,
    F64,
}

impl Primitive {
    /// Returns the schema type tag for this primitive.
    pub fn schema_type(self) -> &'static str {
        match self {
            Self::String | Self::Char => "string",
            Self::Bool => "boolean",
            Self::F32 | Self::F64 => "number",
            _ => "integer",
        }
    }

    /// Returns the Rust name of this primitive, used in coercion annotations.
    pub fn type_name(self) -> &'static str {
        match self {
            Self::String => "String",
            Self::Char => "char",
            Self::Bool => "bool",
            Self::I8 => "i8",
            Self::I16 => "i16",
            Self::I32 => "i32",
            Self::I64 => "i64",
            Self::I128 => "i128",
            Self::Isize => "isize",
            Self::U8 => "u8",
            Self::U16 => "u16",
            Self::U32 => "u32",
            Self::U64 => "u64",
            Self::U128 => "u128",
            Self::Usize => "usize",
            Self::F32 => "f32",
            Self::F64 => "f64",
        }
    }
}

impl fmt::Display for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

/// Lazily resolved reference to a composite descriptor.
///
/// Resolution is deferred until the builder descends into the member, which
/// keeps descriptors of recursive types finite.
#[derive(Clone)]
pub struct CompositeRef(Arc<dyn Fn() -> CompositeType + Send + Sync>);

impl CompositeRef {
    /// Create a reference from a describing function or closure.
    pub fn new<F>(describe: F) -> Self
    where
        F: Fn() -> CompositeType + Send + Sync + 'static,
    {
        Self(Arc::new(describe))
    }

    /// Create a reference to a type implementing [`DescribeComposite`].
    pub fn of<T: DescribeComposite + ?Sized>() -> Self {
        let describe: fn() -> CompositeType = T::composite;
        Self::new(describe)
    }

    /// Resolve the referenced descriptor.
    pub fn resolve(&self) -> CompositeType {
        (self.0)()
    }
}

impl fmt::Debug for CompositeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CompositeRef(..)")
    }
}

/// Shape of a type as seen by the model builder.
#[derive(Debug, Clone)]
pub enum TypeShape {
    /// Text, integer-like, floating-point or boolean value.
    Primitive(Primitive),

    /// Record-like type with named members.
    Composite(CompositeRef),

    /// Nullable indirection (`Option<T>`).
    Optional(Box<TypeShape>),

    /// Array or list of values.
    Sequence(Box<TypeShape>),

    /// Key/value map; only the value shape is kept.
    Map(Box<TypeShape>),

    /// Anything the builder cannot represent. Members of this shape are omitted.
    Opaque,
}

impl TypeShape {
    /// Shorthand for an optional shape.
    pub fn optional(inner: TypeShape) -> Self {
        Self::Optional(Box::new(inner))
    }

    /// Shorthand for a sequence shape.
    pub fn sequence(element: TypeShape) -> Self {
        Self::Sequence(Box::new(element))
    }

    /// Shorthand for a map shape.
    pub fn map(value: TypeShape) -> Self {
        Self::Map(Box::new(value))
    }

    /// Shorthand for a lazily described composite.
    pub fn composite<F>(describe: F) -> Self
    where
        F: Fn() -> CompositeType + Send + Sync + 'static,
    {
        Self::Composite(CompositeRef::new(describe))
    }

    pub fn is_composite(&self) -> bool {
        matches!(self, Self::Composite(_))
    }

    pub fn is_primitive(&self) -> bool {
        matches!(self, Self::Primitive(_))
    }

    /// Name of this shape as a type argument of a generic model id.
    pub fn type_id(&self) -> String {
        match self {
            Self::Primitive(primitive) => primitive.type_name().to_string(),
            Self::Composite(reference) => {
                let composite = reference.resolve();
                composite.name().unwrap_or(composite.key()).to_string()
            }
            Self::Optional(inner) => format!("Option<{}>", inner.type_id()),
            Self::Sequence(element) => format!("Vec<{}>", element.type_id()),
            Self::Map(value) => format!("Map<{}>", value.type_id()),
            Self::Opaque => "_".to_string(),
        }
    }
}

/// Per-member serialization directives.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Directives {
    /// Omit the member entirely.
    pub skip: bool,

    /// Property name to use instead of the declared name.
    pub rename: Option<String>,

    /// Member may be left out when empty, so it is never required.
    pub omit_empty: bool,

    /// Member is serialized as a string.
    pub as_string: bool,

    /// Explicit property description.
    pub description: Option<String>,
}

impl Directives {
    /// Create empty directives.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_skip(mut self, skip: bool) -> Self {
        self.skip = skip;
        self
    }

    pub fn with_rename(mut self, name: impl Into<String>) -> Self {
        self.rename = Some(name.into());
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

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// A declared member of a composite type.
#[derive(Debug, Clone)]
pub struct Member {
    /// Declared member name.
    pub name: String,

    /// Shape of the member's type.
    pub shape: TypeShape,

    /// Serialization directives attached to the member.
    pub directives: Directives,

    /// Whether the member is embedded (declared without its own field name).
    pub embedded: bool,
}

impl Member {
    /// Create a named member with no directives.
    pub fn new(name: impl Into<String>, shape: TypeShape) -> Self {
        Self {
            name: name.into(),
            shape,
            directives: Directives::default(),
            embedded: false,
        }
    }

    /// Create an embedded member.
    pub fn embedded(name: impl Into<String>, shape: TypeShape) -> Self {
        Self {
            embedded: true,
            ..Self::new(name, shape)
        }
    }

    /// Replace the member's directives.
    pub fn with_directives(mut self, directives: Directives) -> Self {
        self.directives = directives;
        self
    }

    /// Name under which the member appears in a model.
    pub fn property_name(&self) -> &str {
        self.directives.rename.as_deref().unwrap_or(&self.name)
    }
}

/// Descriptor of a record-like type.
#[derive(Debug, Clone)]
pub struct CompositeType {
    key: Cow<'static, str>,
    name: Option<String>,
    members: Vec<Member>,
}

impl CompositeType {
    /// Create a descriptor for a type with a canonical name.
    ///
    /// The name doubles as the identity key unless [`with_key`](Self::with_key)
    /// sets another one.
    pub fn named(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            key: Cow::Owned(name.clone()),
            name: Some(name),
            members: Vec::new(),
        }
    }

    /// Create a descriptor for a type without an independent name.
    pub fn anonymous(key: impl Into<Cow<'static, str>>) -> Self {
        Self {
            key: key.into(),
            name: None,
            members: Vec::new(),
        }
    }

    /// Set the identity key.
    pub fn with_key(mut self, key: impl Into<Cow<'static, str>>) -> Self {
        self.key = key.into();
        self
    }

    /// Append a member.
    pub fn member(mut self, member: Member) -> Self {
        self.members.push(member);
        self
    }

    /// Append several members.
    pub fn with_members(mut self, members: impl IntoIterator<Item = Member>) -> Self {
        self.members.extend(members);
        self
    }

    /// Identity of the described type.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Canonical name, `None` for anonymous types.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn is_anonymous(&self) -> bool {
        self.name.is_none()
    }

    /// Members in declaration order.
    pub fn members(&self) -> &[Member] {
        &self.members
    }
}

// =============================================================================
// Primitive implementations
// =============================================================================

macro_rules! impl_describe_for_primitive {
    ($($ty:ty => $kind:ident),* $(,)?) => {
        $(
            impl Describe for $ty {
                fn shape() -> TypeShape {
                    TypeShape::Primitive(Primitive::$kind)
                }
            }
        )*
    };
}

impl_describe_for_primitive!(
    String => String,
    str => String,
    char => Char,
    bool => Bool,
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    i128 => I128,
    isize => Isize,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    u128 => U128,
    usize => Usize,
    f32 => F32,
    f64 => F64,
);

// =============================================================================
// Compound implementations
// =============================================================================

impl<T: Describe> Describe for Option<T> {
    fn shape() -> TypeShape {
        TypeShape::optional(T::shape())
    }
}

macro_rules! impl_describe_for_sequence {
    ($($ty:ident),* $(,)?) => {
        $(
            impl<T: Describe> Describe for $ty<T> {
                fn shape() -> TypeShape {
                    TypeShape::sequence(T::shape())
                }
            }
        )*
    };
}

impl_describe_for_sequence!(Vec, VecDeque, LinkedList, HashSet, BTreeSet);

impl<T: Describe> Describe for [T] {
    fn shape() -> TypeShape {
        TypeShape::sequence(T::shape())
    }
}

impl<T: Describe, const N: usize> Describe for [T; N] {
    fn shape() -> TypeShape {
        TypeShape::sequence(T::shape())
    }
}

impl<K, V: Describe> Describe for HashMap<K, V> {
    fn shape() -> TypeShape {
        TypeShape::map(V::shape())
    }
}

impl<K, V: Describe> Describe for BTreeMap<K, V> {
    fn shape() -> TypeShape {
        TypeShape::map(V::shape())
    }
}

macro_rules! impl_describe_for_pointer {
    ($($ty:ident),* $(,)?) => {
        $(
            impl<T: Describe + ?Sized> Describe for $ty<T> {
                fn shape() -> TypeShape {
                    T::shape()
                }
            }
        )*
    };
}

impl_describe_for_pointer!(Box, Rc, Arc);

impl<T: Describe + ?Sized> Describe for &T {
    fn shape() -> TypeShape {
        T::shape()
    }
}

impl Describe for () {
    fn shape() -> TypeShape {
        TypeShape::Opaque
    }
}

impl Describe for serde_json::Value {
    fn shape() -> TypeShape {
        TypeShape::Opaque
    }
}

impl<T: ?Sized> Describe for PhantomData<T> {
    fn shape() -> TypeShape {
        TypeShape::Opaque
    }
}

/// Default model id of a type: the last segment of its module path, a dot,
/// and the type name.
///
/// ```rust
/// use swagger_model::descriptor::model_id;
///
/// assert_eq!(model_id("app::api::swagger", "File"), "swagger.File");
/// assert_eq!(model_id("swagger", "File"), "swagger.File");
/// ```
pub fn model_id(module_path: &str, type_name: &str) -> String {
    let module = module_path.rsplit("::").next().unwrap_or(module_path);
    format!("{}.{}", module, type_name)
}

/// Model id of a generic type instantiation: the id of the generic type
/// followed by the ids of its type arguments in brackets.
///
/// ```rust
/// use swagger_model::descriptor::generic_model_id;
/// use swagger_model::Describe;
///
/// assert_eq!(generic_model_id("api.Page", &[]), "api.Page");
/// assert_eq!(
///     generic_model_id("api.Page", &[u32::shape(), <Vec<String>>::shape()]),
///     "api.Page[u32,Vec<String>]"
/// );
/// ```
pub fn generic_model_id(base: &str, arguments: &[TypeShape]) -> String {
    if arguments.is_empty() {
        return base.to_string();
    }
    let arguments: Vec<String> = arguments.iter().map(TypeShape::type_id).collect();
    format!("{}[{}]", base, arguments.join(","))
}
