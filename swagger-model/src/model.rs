//! Model documents and their serialized shape.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A named schema document describing one composite type.
///
/// Serializes as `{"id": ..., "required": [...], "properties": {...}}`, with
/// `required` left out when empty and properties ordered by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Model {
    /// Canonical or synthetic identity of the model.
    pub id: String,

    /// Required property names in declaration order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,

    /// Properties keyed by their (renamed) field name.
    #[serde(default)]
    pub properties: BTreeMap<String, ModelProperty>,
}

impl Model {
    /// Create an empty model.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            required: Vec::new(),
            properties: BTreeMap::new(),
        }
    }

    /// Add a property, marking it required when asked to.
    pub fn with_property(
        mut self,
        name: impl Into<String>,
        property: ModelProperty,
        required: bool,
    ) -> Self {
        self.add_property(name, property, required);
        self
    }

    /// Add a property in place.
    ///
    /// A name that is already present keeps its first position in `required`.
    pub fn add_property(&mut self, name: impl Into<String>, property: ModelProperty, required: bool) {
        let name = name.into();
        if required && !self.required.contains(&name) {
            self.required.push(name.clone());
        }
        self.properties.insert(name, property);
    }

    /// Whether `name` is listed as required.
    pub fn is_required(&self, name: &str) -> bool {
        self.required.iter().any(|each| each == name)
    }

    /// Get a property by name.
    pub fn property(&self, name: &str) -> Option<&ModelProperty> {
        self.properties.get(name)
    }

    /// Model ids this model points at, through inline types or `$ref`s.
    pub fn references(&self) -> impl Iterator<Item = &str> {
        self.properties.values().filter_map(ModelProperty::reference)
    }
}

/// Schema of a single model property.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelProperty {
    /// Primitive tag, `array`, `object`, or the id of a nested model.
    #[serde(rename = "type")]
    pub type_name: String,

    /// Free text, empty unless annotated.
    #[serde(default)]
    pub description: String,

    /// Element reference, only for arrays.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Items>,
}

impl ModelProperty {
    /// Create a property of the given type with an empty description.
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            description: String::new(),
            items: None,
        }
    }

    /// Create an array property.
    pub fn array(items: Items) -> Self {
        Self {
            items: Some(items),
            ..Self::new(ARRAY_TYPE)
        }
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn is_array(&self) -> bool {
        self.type_name == ARRAY_TYPE
    }

    /// Model id this property points at, if any.
    ///
    /// Primitive tags, `array` and `object` are not references.
    pub fn reference(&self) -> Option<&str> {
        if let Some(items) = &self.items {
            return items.reference.as_deref();
        }
        match self.type_name.as_str() {
            "string" | "integer" | "number" | "boolean" | ARRAY_TYPE | OBJECT_TYPE => None,
            other => Some(other),
        }
    }
}

/// Element type of an array property.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Items {
    /// Id of the element model.
    #[serde(rename = "$ref", default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,

    /// Primitive tag of the elements.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub type_name: Option<String>,
}

impl Items {
    /// Items referencing a model.
    pub fn reference(id: impl Into<String>) -> Self {
        Self {
            reference: Some(id.into()),
            type_name: None,
        }
    }

    /// Items of a primitive type.
    pub fn primitive(type_name: impl Into<String>) -> Self {
        Self {
            reference: None,
            type_name: Some(type_name.into()),
        }
    }
}

pub(crate) const ARRAY_TYPE: &str = "array";
pub(crate) const OBJECT_TYPE: &str = "object";

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_required_is_omitted() {
        let model = Model::new("swagger.Empty");
        assert_eq!(
            serde_json::to_value(&model).unwrap(),
            json!({ "id": "swagger.Empty", "properties": {} })
        );
    }

    #[test]
    fn test_property_order_and_items() {
        let model = Model::new("swagger.X")
            .with_property("b", ModelProperty::new("integer"), true)
            .with_property("a", ModelProperty::array(Items::reference("swagger.Y")), true);

        let rendered = serde_json::to_string(&model).unwrap();
        assert_eq!(
            rendered,
            r#"{"id":"swagger.X","required":["b","a"],"properties":{"a":{"type":"array","description":"","items":{"$ref":"swagger.Y"}},"b":{"type":"integer","description":""}}}"#
        );
    }

    #[test]
    fn test_primitive_items() {
        let property = ModelProperty::array(Items::primitive("string"));
        assert_eq!(
            serde_json::to_value(&property).unwrap(),
            json!({ "type": "array", "description": "", "items": { "type": "string" } })
        );
        assert_eq!(property.reference(), None);
    }

    #[test]
    fn test_references() {
        let model = Model::new("swagger.X")
            .with_property("a", ModelProperty::new("swagger.X.A"), false)
            .with_property("b", ModelProperty::new("string"), true)
            .with_property("c", ModelProperty::array(Items::reference("swagger.C")), true)
            .with_property("d", ModelProperty::new("object"), true);

        let mut refs: Vec<_> = model.references().collect();
        refs.sort_unstable();
        assert_eq!(refs, vec!["swagger.C", "swagger.X.A"]);
    }

    #[test]
    fn test_required_is_not_duplicated() {
        let mut model = Model::new("swagger.X");
        model.add_property("a", ModelProperty::new("string"), true);
        model.add_property("a", ModelProperty::new("string"), true);
        assert_eq!(model.required, vec!["a".to_string()]);
        assert!(model.is_required("a"));
        assert!(!model.is_required("b"));
    }

    #[test]
    fn test_round_trip_from_document() {
        let document = json!({
            "id": "swagger.File.HistoryPtrs",
            "properties": {}
        });
        let model: Model = serde_json::from_value(document).unwrap();
        assert_eq!(model, Model::new("swagger.File.HistoryPtrs"));
    }
}
