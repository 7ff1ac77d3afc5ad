//! Feature: Identität, freie Properties und Geometrie.

use super::{Geometry, GeometryType};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::fmt;

/// Stabile Identität eines Features im Store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureId(String);

impl FeatureId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Erzeugt eine frische, zufällige ID (UUID v4).
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FeatureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FeatureId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for FeatureId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Ein editierbares Feature.
#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    pub id: FeatureId,
    pub properties: Map<String, Value>,
    pub geometry: Geometry,
}

impl Feature {
    /// Erstellt ein Feature ohne Properties.
    pub fn new(id: impl Into<FeatureId>, geometry: Geometry) -> Self {
        Self {
            id: id.into(),
            properties: Map::new(),
            geometry,
        }
    }

    pub fn with_properties(mut self, properties: Map<String, Value>) -> Self {
        self.properties = properties;
        self
    }

    pub fn geometry_type(&self) -> GeometryType {
        self.geometry.geometry_type()
    }

    pub fn is_point(&self) -> bool {
        self.geometry_type() == GeometryType::Point
    }

    /// Zerlegt ein Multi-Feature in Einzel-Features mit frischen IDs.
    ///
    /// Properties werden auf jedes Teil kopiert.
    pub fn split(&self) -> Vec<Feature> {
        self.geometry
            .parts()
            .into_iter()
            .map(|part| Feature::new(FeatureId::generate(), part).with_properties(self.properties.clone()))
            .collect()
    }

    /// GeoJSON-Feature-Objekt.
    pub fn to_geojson(&self) -> Value {
        json!({
            "id": self.id.as_str(),
            "type": "Feature",
            "properties": Value::Object(self.properties.clone()),
            "geometry": self.geometry.to_geojson(),
        })
    }

    /// Liest ein GeoJSON-Feature; ohne `id` wird eine frische ID vergeben.
    pub fn from_geojson(value: &Value) -> Option<Feature> {
        let geometry = Geometry::from_geojson(value.get("geometry")?)?;
        let id = match value.get("id") {
            Some(Value::String(s)) => FeatureId::new(s.clone()),
            Some(Value::Number(n)) => FeatureId::new(n.to_string()),
            _ => FeatureId::generate(),
        };
        let properties = value
            .get("properties")
            .and_then(Value::as_object)
            .cloned()
            .unwrap_or_default();
        Some(Feature::new(id, geometry).with_properties(properties))
    }
}
