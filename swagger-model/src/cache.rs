//! Long-lived cache of built registries.
//!
//! A [`ModelRegistry`] belongs to one build. Services that describe the same
//! root types over and over share a [`ModelCache`] instead: every miss builds
//! into a fresh registry and stores it, every hit hands out the stored one.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, trace};

use crate::builder::build_models_with;
use crate::config::BuilderConfig;
use crate::descriptor::{Describe, TypeShape};
use crate::registry::ModelRegistry;

/// Thread-safe map from root model id to its built registry.
///
/// Roots without a canonical name (anonymous composites, primitives) are
/// built on every call and never cached.
#[derive(Debug, Default)]
pub struct ModelCache {
    config: BuilderConfig,
    registries: RwLock<HashMap<String, Arc<ModelRegistry>>>,
}

impl ModelCache {
    /// Create an empty cache with the default builder configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty cache that builds with `config`.
    pub fn with_config(config: BuilderConfig) -> Self {
        Self {
            config,
            registries: RwLock::new(HashMap::new()),
        }
    }

    pub fn config(&self) -> &BuilderConfig {
        &self.config
    }

    /// Registry for `T`, built on first use.
    pub fn models_for<T: Describe + ?Sized>(&self) -> Arc<ModelRegistry> {
        self.models_for_shape(&T::shape())
    }

    /// Registry for a root shape, built on first use.
    pub fn models_for_shape(&self, shape: &TypeShape) -> Arc<ModelRegistry> {
        let Some(root) = root_id(shape) else {
            trace!("uncacheable root, building");
            return Arc::new(build_models_with(shape, self.config.clone()));
        };

        if let Some(registry) = self.registries.read().get(&root) {
            trace!(root = %root, "model cache hit");
            return Arc::clone(registry);
        }

        let built = Arc::new(build_models_with(shape, self.config.clone()));
        debug!(root = %root, models = built.len(), "caching built models");
        let mut registries = self.registries.write();
        Arc::clone(registries.entry(root).or_insert(built))
    }

    /// Cached registry for a root id, without building.
    pub fn get(&self, root: &str) -> Option<Arc<ModelRegistry>> {
        self.registries.read().get(root).cloned()
    }

    /// Number of cached roots.
    pub fn len(&self) -> usize {
        self.registries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.registries.read().is_empty()
    }

    /// Drop every cached registry.
    pub fn clear(&self) {
        self.registries.write().clear();
    }
}

/// Canonical id of the composite a root shape resolves to.
fn root_id(shape: &TypeShape) -> Option<String> {
    match shape {
        TypeShape::Composite(reference) => reference.resolve().name().map(str::to_string),
        TypeShape::Optional(inner) | TypeShape::Sequence(inner) | TypeShape::Map(inner) => {
            root_id(inner)
        }
        TypeShape::Primitive(_) | TypeShape::Opaque => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::{CompositeType, Member, Primitive};
    use std::thread;

    fn user() -> CompositeType {
        CompositeType::named("api.User")
            .member(Member::new("name", TypeShape::Primitive(Primitive::String)))
            .member(Member::new("address", TypeShape::composite(address)))
    }

    fn address() -> CompositeType {
        CompositeType::anonymous("api::Address")
            .member(Member::new("city", TypeShape::Primitive(Primitive::String)))
    }

    #[test]
    fn test_hit_returns_same_registry() {
        let cache = ModelCache::new();
        let first = cache.models_for_shape(&TypeShape::composite(user));
        let second = cache.models_for_shape(&TypeShape::sequence(TypeShape::composite(user)));
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 1);
        assert_eq!(first.len(), 2);
        assert!(cache.get("api.User").is_some());
    }

    #[test]
    fn test_anonymous_root_is_not_cached() {
        let cache = ModelCache::new();
        let registry = cache.models_for_shape(&TypeShape::composite(address));
        assert!(registry.contains("api::Address"));
        assert!(cache.is_empty());
    }

    #[test]
    fn test_config_is_applied() {
        let cache = ModelCache::with_config(BuilderConfig::new().with_anonymous_value_required(true));
        let registry = cache.models_for_shape(&TypeShape::composite(user));
        assert!(registry.get("api.User").unwrap().is_required("address"));
    }

    #[test]
    fn test_concurrent_builds_share_one_entry() {
        let cache = Arc::new(ModelCache::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let cache = Arc::clone(&cache);
                thread::spawn(move || cache.models_for_shape(&TypeShape::composite(user)))
            })
            .collect();

        let registries: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert_eq!(cache.len(), 1);
        let cached = cache.get("api.User").unwrap();
        for registry in &registries {
            assert_eq!(**registry, *cached);
        }

        cache.clear();
        assert!(cache.is_empty());
    }
}
