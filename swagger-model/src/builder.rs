//! Recursive model builder.
//!
//! The builder walks a [`TypeShape`] and registers one [`Model`] per distinct
//! composite type it reaches. Member handling, in declaration order:
//!
//! | Member | Property | Required |
//! |--------|----------|----------|
//! | `skip` directive | omitted | no |
//! | primitive | primitive tag | yes |
//! | `as_string` member | `string`, described `(<kind> as string)` | yes |
//! | embedded composite | members flattened in place | per member |
//! | embedded `Option` of composite | members flattened in place | no |
//! | anonymous composite by value | inline type `Parent.Member` | no |
//! | named composite by value | inline type `<id>` | yes |
//! | `Option` of composite | inline type | yes |
//! | sequence of composites | `array`, `items.$ref` | yes |
//! | sequence of `Option` composites | `array`, `items.$ref` to empty `Parent.Member` | yes |
//! | map | `object` | yes |
//! | opaque | omitted | no |
//!
//! `omit_empty` removes any member from `required`.
//!
//! Ids are reserved in the registry before descending, so every walk
//! terminates after visiting each distinct identity once.

use tracing::{debug, trace};

use crate::config::BuilderConfig;
use crate::descriptor::{CompositeRef, CompositeType, Describe, Member, Primitive, TypeShape};
use crate::model::{Items, Model, ModelProperty, OBJECT_TYPE};
use crate::registry::ModelRegistry;

/// Build the models reachable from `T` into a fresh registry.
///
/// ```rust
/// use swagger_model::{build_models, CompositeType, Describe, DescribeComposite, Member, TypeShape};
///
/// struct Tag;
///
/// impl Describe for Tag {
///     fn shape() -> TypeShape {
///         TypeShape::Composite(swagger_model::CompositeRef::of::<Tag>())
///     }
/// }
///
/// impl DescribeComposite for Tag {
///     fn composite() -> CompositeType {
///         CompositeType::named("api.Tag").member(Member::new("name", String::shape()))
///     }
/// }
///
/// let registry = build_models::<Tag>();
/// assert_eq!(registry.get("api.Tag").unwrap().required, vec!["name".to_string()]);
/// ```
pub fn build_models<T: Describe + ?Sized>() -> ModelRegistry {
    build_models_for(&T::shape())
}

/// Build the models reachable from `shape` into a fresh registry.
pub fn build_models_for(shape: &TypeShape) -> ModelRegistry {
    build_models_with(shape, BuilderConfig::default())
}

/// Build the models reachable from `shape` with a custom configuration.
pub fn build_models_with(shape: &TypeShape, config: BuilderConfig) -> ModelRegistry {
    let mut registry = ModelRegistry::new();
    ModelBuilder::with_config(&mut registry, config).build(shape);
    registry
}

/// Walks type descriptors into a [`ModelRegistry`].
pub struct ModelBuilder<'r> {
    registry: &'r mut ModelRegistry,
    config: BuilderConfig,
    /// Anonymous composites on the current walk path, as `(key, id)`.
    walking: Vec<(String, String)>,
    /// Keys of the composite being walked and of everything embedded into it.
    embedding: Vec<String>,
    /// Optional embeddings enclosing the members being added.
    optional_embeds: usize,
}

impl<'r> ModelBuilder<'r> {
    /// Create a builder with the default configuration.
    pub fn new(registry: &'r mut ModelRegistry) -> Self {
        Self::with_config(registry, BuilderConfig::default())
    }

    /// Create a builder with a custom configuration.
    pub fn with_config(registry: &'r mut ModelRegistry, config: BuilderConfig) -> Self {
        Self {
            registry,
            config,
            walking: Vec::new(),
            embedding: Vec::new(),
            optional_embeds: 0,
        }
    }

    pub fn config(&self) -> &BuilderConfig {
        &self.config
    }

    /// Build the models reachable from a root shape.
    ///
    /// Returns the id of the root model, or `None` when the shape needs no
    /// model (primitives, opaque types).
    pub fn build(&mut self, shape: &TypeShape) -> Option<String> {
        self.add_model(shape, None)
    }

    /// Register the model for `shape` under `id_override`, or under its
    /// canonical name when no override is given.
    ///
    /// Optional, sequence and map shapes are unwrapped to their element.
    /// An anonymous root without override is registered under its key.
    pub fn add_model(&mut self, shape: &TypeShape, id_override: Option<&str>) -> Option<String> {
        match shape {
            TypeShape::Composite(reference) => {
                let composite = reference.resolve();
                let id = id_override
                    .or(composite.name())
                    .unwrap_or(composite.key())
                    .to_string();
                self.add_composite(&composite, &id);
                Some(id)
            }
            TypeShape::Optional(inner) | TypeShape::Sequence(inner) | TypeShape::Map(inner) => {
                self.add_model(inner, id_override)
            }
            TypeShape::Primitive(_) | TypeShape::Opaque => {
                trace!("no model needed for non-composite root");
                None
            }
        }
    }

    fn add_composite(&mut self, composite: &CompositeType, id: &str) {
        if !self.registry.reserve(id) {
            trace!(id, "model already registered");
            return;
        }
        debug!(id, members = composite.members().len(), "registering model");

        let anonymous = composite.is_anonymous();
        if anonymous {
            self.walking
                .push((composite.key().to_string(), id.to_string()));
        }
        let outer_embedding =
            std::mem::replace(&mut self.embedding, vec![composite.key().to_string()]);
        let outer_optional_embeds = std::mem::take(&mut self.optional_embeds);

        let mut model = Model::new(id);
        for member in composite.members() {
            self.add_member(member, id, &mut model);
        }

        self.embedding = outer_embedding;
        self.optional_embeds = outer_optional_embeds;
        if anonymous {
            self.walking.pop();
        }
        self.registry.populate(model);
    }

    fn add_member(&mut self, member: &Member, owner: &str, model: &mut Model) {
        let directives = &member.directives;
        if directives.skip {
            trace!(member = %member.name, "member excluded");
            return;
        }

        if member.embedded && directives.rename.is_none() {
            if let Some((reference, optional)) = embedded_composite(&member.shape) {
                self.embed(&reference.resolve(), owner, model, optional);
                return;
            }
        }

        let name = member.property_name();
        let built = if directives.as_string {
            Some((coerced_property(&member.shape), true))
        } else {
            self.build_property(&member.shape, owner, name)
        };
        let Some((mut property, required)) = built else {
            debug!(member = %member.name, "member has no schema representation, skipped");
            return;
        };

        if let Some(description) = &directives.description {
            property.description = description.clone();
        }
        let required = required && !directives.omit_empty && self.optional_embeds == 0;
        model.add_property(name, property, required);
    }

    /// Flatten the members of `composite` into `model`. Members reached
    /// through an optional embedding are never required.
    fn embed(&mut self, composite: &CompositeType, owner: &str, model: &mut Model, optional: bool) {
        if self.embedding.iter().any(|key| key == composite.key()) {
            debug!(key = composite.key(), "embedding cycle, member skipped");
            return;
        }
        trace!(key = composite.key(), into = %model.id, "flattening embedded members");

        let prefix = composite.name().unwrap_or(owner).to_string();
        self.embedding.push(composite.key().to_string());
        if optional {
            self.optional_embeds += 1;
        }
        for member in composite.members() {
            self.add_member(member, &prefix, model);
        }
        if optional {
            self.optional_embeds -= 1;
        }
        self.embedding.pop();
    }

    /// Register a nested composite and return the id to reference it by.
    fn nested_model(&mut self, composite: &CompositeType, owner: &str, property: &str) -> String {
        if let Some(name) = composite.name() {
            self.add_composite(composite, name);
            return name.to_string();
        }
        if let Some((_, id)) = self
            .walking
            .iter()
            .rev()
            .find(|(key, _)| key == composite.key())
        {
            trace!(id = %id, "anonymous type recurs on the walk path");
            return id.clone();
        }

        let id = format!("{owner}.{property}");
        self.add_composite(composite, &id);
        id
    }

    fn build_property(
        &mut self,
        shape: &TypeShape,
        owner: &str,
        name: &str,
    ) -> Option<(ModelProperty, bool)> {
        match shape {
            TypeShape::Primitive(primitive) => {
                Some((ModelProperty::new(primitive.schema_type()), true))
            }
            TypeShape::Composite(reference) => {
                let composite = reference.resolve();
                let required = !composite.is_anonymous() || self.config.anonymous_value_required;
                let id = self.nested_model(&composite, owner, name);
                Some((ModelProperty::new(id), required))
            }
            TypeShape::Optional(inner) => self
                .build_property(inner, owner, name)
                .map(|(property, _)| (property, true)),
            TypeShape::Sequence(element) => self
                .build_sequence(element, owner, name)
                .map(|property| (property, true)),
            TypeShape::Map(_) => Some((ModelProperty::new(OBJECT_TYPE), true)),
            TypeShape::Opaque => None,
        }
    }

    fn build_sequence(
        &mut self,
        element: &TypeShape,
        owner: &str,
        name: &str,
    ) -> Option<ModelProperty> {
        match element {
            TypeShape::Primitive(primitive) => {
                Some(ModelProperty::array(Items::primitive(primitive.schema_type())))
            }
            TypeShape::Composite(reference) => {
                let id = self.nested_model(&reference.resolve(), owner, name);
                Some(ModelProperty::array(Items::reference(id)))
            }
            TypeShape::Optional(inner)
                if self.config.placeholder_pointer_sequences && refers_to_composite(inner) =>
            {
                let id = format!("{owner}.{name}");
                if self.registry.reserve(&id) {
                    debug!(id = %id, "registering placeholder model");
                }
                Some(ModelProperty::array(Items::reference(id)))
            }
            TypeShape::Optional(inner) | TypeShape::Sequence(inner) => {
                self.build_sequence(inner, owner, name)
            }
            TypeShape::Map(_) => Some(ModelProperty::array(Items::primitive(OBJECT_TYPE))),
            TypeShape::Opaque => None,
        }
    }
}

fn refers_to_composite(shape: &TypeShape) -> bool {
    match shape {
        TypeShape::Composite(_) => true,
        TypeShape::Optional(inner) => refers_to_composite(inner),
        _ => false,
    }
}

/// The composite an embedded member flattens, and whether it sits behind
/// an `Option`.
fn embedded_composite(shape: &TypeShape) -> Option<(&CompositeRef, bool)> {
    match shape {
        TypeShape::Composite(reference) => Some((reference, false)),
        TypeShape::Optional(inner) => {
            embedded_composite(inner).map(|(reference, _)| (reference, true))
        }
        _ => None,
    }
}

fn coerced_property(shape: &TypeShape) -> ModelProperty {
    ModelProperty::new(Primitive::String.schema_type())
        .with_description(format!("({} as string)", coerced_kind(shape)))
}

fn coerced_kind(shape: &TypeShape) -> &'static str {
    match shape {
        TypeShape::Primitive(primitive) => primitive.type_name(),
        TypeShape::Optional(inner) => coerced_kind(inner),
        TypeShape::Composite(_) => "struct",
        TypeShape::Sequence(_) => "sequence",
        TypeShape::Map(_) => "map",
        TypeShape::Opaque => "value",
    }
}
