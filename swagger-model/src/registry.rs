//! Model registry for collecting the models of one build.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::entity::to_pretty_json;
use crate::model::Model;

/// A registry mapping model ids to models.
///
/// The registry is append-only: an id is reserved before the builder descends
/// into the type, which is what lets recursive type graphs terminate. A
/// reserved model may be referenced right away and is populated once its own
/// walk has finished.
///
/// Serializes as a JSON object keyed by model id, in ascending id order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModelRegistry {
    models: BTreeMap<String, Model>,
}

impl ModelRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve `id` with an empty model.
    ///
    /// Returns `false` if the id is already taken, in which case nothing changes.
    pub fn reserve(&mut self, id: &str) -> bool {
        if self.models.contains_key(id) {
            return false;
        }
        self.models.insert(id.to_string(), Model::new(id));
        true
    }

    /// Register a complete model.
    ///
    /// Returns `false` and leaves the registry untouched if the id is taken.
    pub fn insert(&mut self, model: Model) -> bool {
        if self.models.contains_key(&model.id) {
            return false;
        }
        self.models.insert(model.id.clone(), model);
        true
    }

    /// Fill a reserved model with its walked content.
    pub(crate) fn populate(&mut self, model: Model) {
        self.models.insert(model.id.clone(), model);
    }

    /// Get a model by id.
    pub fn get(&self, id: &str) -> Option<&Model> {
        self.models.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.models.contains_key(id)
    }

    /// Get the number of registered models.
    pub fn len(&self) -> usize {
        self.models.len()
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    /// Registered ids in ascending order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.models.keys().map(String::as_str)
    }

    /// Registered models in ascending id order.
    pub fn models(&self) -> impl Iterator<Item = &Model> {
        self.models.values()
    }

    /// Consume the registry, returning the underlying map.
    pub fn into_models(self) -> BTreeMap<String, Model> {
        self.models
    }

    /// Render the registry as pretty-printed JSON, in the layout the JSON
    /// entity writer uses for pretty responses.
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        let output = to_pretty_json(self)?;
        // serde_json only emits UTF-8
        Ok(String::from_utf8_lossy(&output).into_owned())
    }

    /// References that do not resolve to a registered model.
    ///
    /// Each entry is `(model id, referenced id)`. Empty for every registry the
    /// builder produces.
    pub fn unresolved_references(&self) -> Vec<(String, String)> {
        self.models
            .values()
            .flat_map(|model| {
                model
                    .references()
                    .filter(|reference| !self.models.contains_key(*reference))
                    .map(|reference| (model.id.clone(), reference.to_string()))
            })
            .collect()
    }

    /// Ids reachable from `id` through property references, excluding `id`
    /// itself unless it is part of a cycle. Ascending order.
    pub fn dependencies_of(&self, id: &str) -> Vec<String> {
        let mut visited = HashSet::new();
        let mut stack: Vec<&str> = self
            .models
            .get(id)
            .map(|model| model.references().collect())
            .unwrap_or_default();

        while let Some(name) = stack.pop() {
            if !visited.insert(name.to_string()) {
                continue;
            }
            if let Some(model) = self.models.get(name) {
                stack.extend(model.references());
            }
        }

        let mut dependencies: Vec<String> = visited.into_iter().collect();
        dependencies.sort_unstable();
        dependencies
    }

    /// Detect a reference cycle and return its path if found.
    ///
    /// Self-referential types produce cycles legitimately; this is a query,
    /// not a validity check.
    pub fn detect_cycles(&self) -> Option<Vec<String>> {
        let mut visited = HashSet::new();
        let mut path = Vec::new();

        for name in self.models.keys() {
            if !visited.contains(name.as_str()) {
                if let Some(cycle) = self.find_cycle(name, &mut visited, &mut path) {
                    return Some(cycle);
                }
            }
        }

        None
    }

    fn find_cycle(
        &self,
        name: &str,
        visited: &mut HashSet<String>,
        path: &mut Vec<String>,
    ) -> Option<Vec<String>> {
        if let Some(start) = path.iter().position(|n| n == name) {
            let mut cycle: Vec<String> = path[start..].to_vec();
            cycle.push(name.to_string());
            return Some(cycle);
        }

        if visited.contains(name) {
            return None;
        }

        path.push(name.to_string());

        if let Some(model) = self.models.get(name) {
            for dep in model.references() {
                if let Some(cycle) = self.find_cycle(dep, visited, path) {
                    return Some(cycle);
                }
            }
        }

        path.pop();
        visited.insert(name.to_string());
        None
    }
}

impl IntoIterator for ModelRegistry {
    type Item = (String, Model);
    type IntoIter = std::collections::btree_map::IntoIter<String, Model>;

    fn into_iter(self) -> Self::IntoIter {
        self.models.into_iter()
    }
}
