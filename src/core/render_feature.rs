//! Render-Features: was Modi zeichnen lassen und was der Host bei Abfragen zurückgibt.
//!
//! Neben den eigentlichen Feature-Körpern gibt es Hilfsgeometrie (Vertex- und
//! Midpoint-Marker). Die Zuordnung läuft über die Properties `meta`, `active`,
//! `id`, `parent` und `coord_path`.

use super::{CoordPath, Feature, FeatureId, Geometry};
use glam::DVec2;
use serde_json::{json, Map, Value};

/// Property-Schlüssel der Meta-Geometrie.
pub mod keys {
    pub const META: &str = "meta";
    pub const ACTIVE: &str = "active";
    pub const ID: &str = "id";
    pub const PARENT: &str = "parent";
    pub const COORD_PATH: &str = "coord_path";
}

/// Art einer Meta-Geometrie.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetaKind {
    Feature,
    Vertex,
    Midpoint,
}

impl MetaKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Feature => "feature",
            Self::Vertex => "vertex",
            Self::Midpoint => "midpoint",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "feature" => Some(Self::Feature),
            "vertex" => Some(Self::Vertex),
            "midpoint" => Some(Self::Midpoint),
            _ => None,
        }
    }

    /// Rang beim Hit-Test: kleiner gewinnt (Vertex vor Midpoint vor Feature).
    pub fn hit_rank(self) -> u8 {
        match self {
            Self::Vertex => 0,
            Self::Midpoint => 1,
            Self::Feature => 2,
        }
    }
}

/// Rohes Abfrageergebnis des Hosts.
#[derive(Debug, Clone, PartialEq)]
pub struct QueriedFeature {
    pub properties: Map<String, Value>,
    pub geometry: Geometry,
}

/// Identität eines Treffers für die Deduplizierung.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum HitKey {
    Feature(FeatureId),
    Marker(MetaKind, FeatureId, CoordPath),
}

/// Ein gezeichnetes Feature oder ein Marker.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderFeature {
    pub meta: MetaKind,
    pub active: bool,
    /// ID des Features (nur bei `MetaKind::Feature`).
    pub id: Option<FeatureId>,
    /// Eltern-Feature eines Markers.
    pub parent: Option<FeatureId>,
    pub coord_path: Option<CoordPath>,
    pub geometry: Geometry,
}

impl RenderFeature {
    /// Inaktiver Feature-Körper.
    pub fn body(feature: &Feature) -> Self {
        Self {
            meta: MetaKind::Feature,
            active: false,
            id: Some(feature.id.clone()),
            parent: None,
            coord_path: None,
            geometry: feature.geometry.clone(),
        }
    }

    pub fn vertex(parent: &FeatureId, coord_path: CoordPath, position: DVec2, active: bool) -> Self {
        Self {
            meta: MetaKind::Vertex,
            active,
            id: None,
            parent: Some(parent.clone()),
            coord_path: Some(coord_path),
            geometry: Geometry::Point(position),
        }
    }

    pub fn midpoint(parent: &FeatureId, coord_path: CoordPath, position: DVec2) -> Self {
        Self {
            meta: MetaKind::Midpoint,
            active: false,
            id: None,
            parent: Some(parent.clone()),
            coord_path: Some(coord_path),
            geometry: Geometry::Point(position),
        }
    }

    /// Position eines Markers (Punktgeometrie).
    pub fn position(&self) -> Option<DVec2> {
        match self.geometry {
            Geometry::Point(p) => Some(p),
            _ => None,
        }
    }

    /// Identität für die Deduplizierung; `None` bei unvollständigen Properties.
    pub fn identity(&self) -> Option<HitKey> {
        match self.meta {
            MetaKind::Feature => self.id.clone().map(HitKey::Feature),
            meta => Some(HitKey::Marker(
                meta,
                self.parent.clone()?,
                self.coord_path.clone()?,
            )),
        }
    }

    /// Properties im Format der Overlay-Layer.
    pub fn properties(&self) -> Map<String, Value> {
        let mut props = Map::new();
        props.insert(keys::META.into(), json!(self.meta.as_str()));
        props.insert(
            keys::ACTIVE.into(),
            json!(if self.active { "true" } else { "false" }),
        );
        if let Some(id) = &self.id {
            props.insert(keys::ID.into(), json!(id.as_str()));
        }
        if let Some(parent) = &self.parent {
            props.insert(keys::PARENT.into(), json!(parent.as_str()));
        }
        if let Some(path) = &self.coord_path {
            props.insert(keys::COORD_PATH.into(), json!(path.to_string()));
        }
        props
    }

    pub fn to_geojson(&self) -> Value {
        json!({
            "type": "Feature",
            "properties": Value::Object(self.properties()),
            "geometry": self.geometry.to_geojson(),
        })
    }

    pub fn to_queried(&self) -> QueriedFeature {
        QueriedFeature {
            properties: self.properties(),
            geometry: self.geometry.clone(),
        }
    }

    /// Liest ein Abfrageergebnis des Hosts. `None` für Nicht-Meta-Geometrie.
    pub fn from_queried(queried: &QueriedFeature) -> Option<Self> {
        let props = &queried.properties;
        let meta = MetaKind::parse(props.get(keys::META)?.as_str()?)?;
        let active = match props.get(keys::ACTIVE) {
            Some(Value::Bool(b)) => *b,
            Some(Value::String(s)) => s == "true",
            _ => false,
        };
        let id_of = |key: &str| match props.get(key) {
            Some(Value::String(s)) => Some(FeatureId::new(s.clone())),
            Some(Value::Number(n)) => Some(FeatureId::new(n.to_string())),
            _ => None,
        };
        let coord_path = props
            .get(keys::COORD_PATH)
            .and_then(Value::as_str)
            .and_then(|s| s.parse().ok());
        Some(Self {
            meta,
            active,
            id: id_of(keys::ID),
            parent: id_of(keys::PARENT),
            coord_path,
            geometry: queried.geometry.clone(),
        })
    }
}
