//! GeoJSON-artige Geometrien über Längen-/Breitengrad-Positionen.
//!
//! Positionen sind `DVec2` mit `x` = Länge, `y` = Breite. Polygon-Ringe werden
//! offen gespeichert (ohne schließende Position) und erst beim GeoJSON-Export
//! wieder geschlossen.

use super::CoordPath;
use glam::DVec2;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Mindestanzahl Positionen eines LineStrings.
pub const MIN_LINE_POSITIONS: usize = 2;
/// Mindestanzahl Positionen eines (offenen) Polygon-Rings.
pub const MIN_RING_POSITIONS: usize = 3;

/// Geometrie-Typen nach GeoJSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GeometryType {
    Point,
    LineString,
    Polygon,
    MultiPoint,
    MultiLineString,
    MultiPolygon,
}

impl GeometryType {
    /// GeoJSON-Typname.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Point => "Point",
            Self::LineString => "LineString",
            Self::Polygon => "Polygon",
            Self::MultiPoint => "MultiPoint",
            Self::MultiLineString => "MultiLineString",
            Self::MultiPolygon => "MultiPolygon",
        }
    }

    pub fn is_multi(self) -> bool {
        matches!(
            self,
            Self::MultiPoint | Self::MultiLineString | Self::MultiPolygon
        )
    }

    /// Einfacher Grundtyp (`MultiPolygon` → `Polygon`).
    pub fn base(self) -> Self {
        match self {
            Self::MultiPoint => Self::Point,
            Self::MultiLineString => Self::LineString,
            Self::MultiPolygon => Self::Polygon,
            other => other,
        }
    }
}

/// Geometrie eines Features.
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Point(DVec2),
    LineString(Vec<DVec2>),
    /// Ringe, jeweils offen gespeichert; Ring 0 ist der Außenring.
    Polygon(Vec<Vec<DVec2>>),
    MultiPoint(Vec<DVec2>),
    MultiLineString(Vec<Vec<DVec2>>),
    MultiPolygon(Vec<Vec<Vec<DVec2>>>),
}

impl Geometry {
    pub fn geometry_type(&self) -> GeometryType {
        match self {
            Self::Point(_) => GeometryType::Point,
            Self::LineString(_) => GeometryType::LineString,
            Self::Polygon(_) => GeometryType::Polygon,
            Self::MultiPoint(_) => GeometryType::MultiPoint,
            Self::MultiLineString(_) => GeometryType::MultiLineString,
            Self::MultiPolygon(_) => GeometryType::MultiPolygon,
        }
    }

    /// Position unter `path`, `None` bei ungültigem Pfad.
    pub fn get_coordinate(&self, path: &CoordPath) -> Option<DVec2> {
        match (self, path.indices()) {
            (Self::Point(p), []) => Some(*p),
            (Self::LineString(coords), [i]) | (Self::MultiPoint(coords), [i]) => {
                coords.get(*i).copied()
            }
            (Self::Polygon(rings), [r, i]) | (Self::MultiLineString(rings), [r, i]) => {
                rings.get(*r)?.get(*i).copied()
            }
            (Self::MultiPolygon(polygons), [p, r, i]) => polygons.get(*p)?.get(*r)?.get(*i).copied(),
            _ => None,
        }
    }

    fn coordinate_mut(&mut self, path: &CoordPath) -> Option<&mut DVec2> {
        match (self, path.indices()) {
            (Self::Point(p), []) => Some(p),
            (Self::LineString(coords), [i]) | (Self::MultiPoint(coords), [i]) => coords.get_mut(*i),
            (Self::Polygon(rings), [r, i]) | (Self::MultiLineString(rings), [r, i]) => {
                rings.get_mut(*r)?.get_mut(*i)
            }
            (Self::MultiPolygon(polygons), [p, r, i]) => {
                polygons.get_mut(*p)?.get_mut(*r)?.get_mut(*i)
            }
            _ => None,
        }
    }

    /// Setzt die Position unter `path`. Gibt `false` bei ungültigem Pfad zurück.
    pub fn update_coordinate(&mut self, path: &CoordPath, position: DVec2) -> bool {
        match self.coordinate_mut(path) {
            Some(slot) => {
                *slot = position;
                true
            }
            None => false,
        }
    }

    /// Fügt eine Position so ein, dass sie danach unter `path` liegt.
    ///
    /// Der letzte Index darf der Länge der Liste entsprechen (Anhängen).
    pub fn add_coordinate(&mut self, path: &CoordPath, position: DVec2) -> bool {
        match (self, path.indices()) {
            (Self::LineString(coords), [i]) | (Self::MultiPoint(coords), [i]) => {
                insert_at(coords, *i, position)
            }
            (Self::Polygon(rings), [r, i]) | (Self::MultiLineString(rings), [r, i]) => rings
                .get_mut(*r)
                .is_some_and(|ring| insert_at(ring, *i, position)),
            (Self::MultiPolygon(polygons), [p, r, i]) => polygons
                .get_mut(*p)
                .and_then(|rings| rings.get_mut(*r))
                .is_some_and(|ring| insert_at(ring, *i, position)),
            _ => false,
        }
    }

    /// Entfernt die Position unter `path`.
    ///
    /// Fällt ein Polygon-Ring dabei unter drei Positionen, wird der ganze Ring entfernt.
    /// Die Geometrie kann danach ungültig sein (siehe [`Geometry::is_valid`]).
    pub fn remove_coordinate(&mut self, path: &CoordPath) -> bool {
        match (self, path.indices()) {
            (Self::LineString(coords), [i]) | (Self::MultiPoint(coords), [i]) => {
                remove_at(coords, *i)
            }
            (Self::MultiLineString(lines), [l, i]) => {
                lines.get_mut(*l).is_some_and(|line| remove_at(line, *i))
            }
            (Self::Polygon(rings), [r, i]) => remove_ring_position(rings, *r, *i),
            (Self::MultiPolygon(polygons), [p, r, i]) => polygons
                .get_mut(*p)
                .is_some_and(|rings| remove_ring_position(rings, *r, *i)),
            _ => false,
        }
    }

    /// Alle Positionen mit ihrem Koordinatenpfad, in Speicherreihenfolge.
    pub fn positions(&self) -> Vec<(CoordPath, DVec2)> {
        let mut out = Vec::new();
        match self {
            Self::Point(p) => out.push((CoordPath::default(), *p)),
            Self::LineString(coords) | Self::MultiPoint(coords) => {
                collect_list(coords, &CoordPath::default(), &mut out)
            }
            Self::Polygon(rings) | Self::MultiLineString(rings) => {
                for (r, ring) in rings.iter().enumerate() {
                    collect_list(ring, &CoordPath::new(vec![r]), &mut out);
                }
            }
            Self::MultiPolygon(polygons) => {
                for (p, rings) in polygons.iter().enumerate() {
                    for (r, ring) in rings.iter().enumerate() {
                        collect_list(ring, &CoordPath::new(vec![p, r]), &mut out);
                    }
                }
            }
        }
        out
    }

    fn for_each_position_mut(&mut self, mut f: impl FnMut(&mut DVec2)) {
        match self {
            Self::Point(p) => f(p),
            Self::LineString(coords) | Self::MultiPoint(coords) => coords.iter_mut().for_each(f),
            Self::Polygon(rings) | Self::MultiLineString(rings) => {
                rings.iter_mut().flatten().for_each(f)
            }
            Self::MultiPolygon(polygons) => polygons.iter_mut().flatten().flatten().for_each(f),
        }
    }

    /// Verschiebt alle Positionen um `delta` (Länge, Breite).
    pub fn translate(&mut self, delta: DVec2) {
        self.for_each_position_mut(|p| *p += delta);
    }

    /// Strukturelle Gültigkeit (Mindestanzahl Positionen je Linie / Ring).
    pub fn is_valid(&self) -> bool {
        match self {
            Self::Point(_) => true,
            Self::LineString(coords) => line_is_valid(coords),
            Self::Polygon(rings) => polygon_is_valid(rings),
            Self::MultiPoint(points) => !points.is_empty(),
            Self::MultiLineString(lines) => {
                !lines.is_empty() && lines.iter().all(|l| line_is_valid(l))
            }
            Self::MultiPolygon(polygons) => {
                !polygons.is_empty() && polygons.iter().all(|p| polygon_is_valid(p))
            }
        }
    }

    /// Planare Fläche (Shoelace auf Länge/Breite). Nicht-Flächen haben Fläche 0.
    pub fn area(&self) -> f64 {
        match self {
            Self::Polygon(rings) => polygon_area(rings),
            Self::MultiPolygon(polygons) => polygons.iter().map(|p| polygon_area(p)).sum(),
            _ => 0.0,
        }
    }

    /// Umschließendes Rechteck `(min, max)` aller Positionen.
    pub fn extent(&self) -> Option<(DVec2, DVec2)> {
        let positions = self.positions();
        let (_, first) = positions.first()?;
        let init = (*first, *first);
        Some(
            positions
                .iter()
                .fold(init, |(min, max), (_, p)| (min.min(*p), max.max(*p))),
        )
    }

    /// Zerlegt Multi-Geometrien in ihre Einzelteile; einfache Geometrien liefern sich selbst.
    pub fn parts(&self) -> Vec<Geometry> {
        match self {
            Self::MultiPoint(points) => points.iter().copied().map(Self::Point).collect(),
            Self::MultiLineString(lines) => lines.iter().cloned().map(Self::LineString).collect(),
            Self::MultiPolygon(polygons) => polygons.iter().cloned().map(Self::Polygon).collect(),
            other => vec![other.clone()],
        }
    }

    /// Fasst Geometrien gleichen Grundtyps zu einer Multi-Geometrie zusammen.
    ///
    /// Multi-Geometrien tragen all ihre Teile bei. `None`, wenn die Eingabe leer ist
    /// oder die Grundtypen nicht übereinstimmen.
    pub fn combine<'a>(geometries: impl IntoIterator<Item = &'a Geometry>) -> Option<Geometry> {
        let geometries: Vec<&Geometry> = geometries.into_iter().collect();
        let base = geometries.first()?.geometry_type().base();
        if geometries
            .iter()
            .any(|g| g.geometry_type().base() != base)
        {
            return None;
        }

        let parts = geometries.iter().flat_map(|g| g.parts());
        let combined = match base {
            GeometryType::Point => Self::MultiPoint(
                parts
                    .filter_map(|g| match g {
                        Self::Point(p) => Some(p),
                        _ => None,
                    })
                    .collect(),
            ),
            GeometryType::LineString => Self::MultiLineString(
                parts
                    .filter_map(|g| match g {
                        Self::LineString(coords) => Some(coords),
                        _ => None,
                    })
                    .collect(),
            ),
            GeometryType::Polygon => Self::MultiPolygon(
                parts
                    .filter_map(|g| match g {
                        Self::Polygon(rings) => Some(rings),
                        _ => None,
                    })
                    .collect(),
            ),
            _ => return None,
        };
        Some(combined)
    }

    /// GeoJSON-Geometrieobjekt; Polygon-Ringe werden geschlossen.
    pub fn to_geojson(&self) -> Value {
        let coordinates = match self {
            Self::Point(p) => position_json(*p),
            Self::LineString(coords) | Self::MultiPoint(coords) => list_json(coords),
            Self::Polygon(rings) => rings_json(rings),
            Self::MultiLineString(lines) => {
                Value::Array(lines.iter().map(|l| list_json(l)).collect())
            }
            Self::MultiPolygon(polygons) => {
                Value::Array(polygons.iter().map(|p| rings_json(p)).collect())
            }
        };
        json!({
            "type": self.geometry_type().as_str(),
            "coordinates": coordinates,
        })
    }

    /// Liest ein GeoJSON-Geometrieobjekt. Schließende Ring-Positionen werden entfernt.
    pub fn from_geojson(value: &Value) -> Option<Geometry> {
        let coordinates = value.get("coordinates")?;
        let geometry = match value.get("type")?.as_str()? {
            "Point" => Self::Point(parse_position(coordinates)?),
            "LineString" => Self::LineString(parse_list(coordinates)?),
            "Polygon" => Self::Polygon(parse_rings(coordinates)?),
            "MultiPoint" => Self::MultiPoint(parse_list(coordinates)?),
            "MultiLineString" => Self::MultiLineString(
                coordinates
                    .as_array()?
                    .iter()
                    .map(parse_list)
                    .collect::<Option<_>>()?,
            ),
            "MultiPolygon" => Self::MultiPolygon(
                coordinates
                    .as_array()?
                    .iter()
                    .map(parse_rings)
                    .collect::<Option<_>>()?,
            ),
            _ => return None,
        };
        Some(geometry)
    }
}

// ── Hilfsfunktionen ─────────────────────────────────────────────────

fn insert_at(list: &mut Vec<DVec2>, index: usize, position: DVec2) -> bool {
    if index > list.len() {
        return false;
    }
    list.insert(index, position);
    true
}

fn remove_at(list: &mut Vec<DVec2>, index: usize) -> bool {
    if index >= list.len() {
        return false;
    }
    list.remove(index);
    true
}

fn remove_ring_position(rings: &mut Vec<Vec<DVec2>>, ring: usize, index: usize) -> bool {
    let Some(positions) = rings.get_mut(ring) else {
        return false;
    };
    if !remove_at(positions, index) {
        return false;
    }
    if positions.len() < MIN_RING_POSITIONS {
        rings.remove(ring);
    }
    true
}

fn collect_list(list: &[DVec2], prefix: &CoordPath, out: &mut Vec<(CoordPath, DVec2)>) {
    out.extend(
        list.iter()
            .enumerate()
            .map(|(i, p)| (prefix.child(i), *p)),
    );
}

fn line_is_valid(coords: &[DVec2]) -> bool {
    coords.len() >= MIN_LINE_POSITIONS
}

fn polygon_is_valid(rings: &[Vec<DVec2>]) -> bool {
    !rings.is_empty() && rings.iter().all(|r| r.len() >= MIN_RING_POSITIONS)
}

fn ring_area(ring: &[DVec2]) -> f64 {
    if ring.len() < MIN_RING_POSITIONS {
        return 0.0;
    }
    let twice: f64 = ring
        .iter()
        .zip(ring.iter().cycle().skip(1))
        .map(|(a, b)| a.x * b.y - b.x * a.y)
        .sum();
    (twice * 0.5).abs()
}

fn polygon_area(rings: &[Vec<DVec2>]) -> f64 {
    let Some((outer, holes)) = rings.split_first() else {
        return 0.0;
    };
    let holes: f64 = holes.iter().map(|h| ring_area(h)).sum();
    (ring_area(outer) - holes).max(0.0)
}

fn position_json(p: DVec2) -> Value {
    json!([p.x, p.y])
}

fn list_json(list: &[DVec2]) -> Value {
    Value::Array(list.iter().map(|p| position_json(*p)).collect())
}

fn rings_json(rings: &[Vec<DVec2>]) -> Value {
    Value::Array(
        rings
            .iter()
            .map(|ring| {
                let mut closed: Vec<Value> = ring.iter().map(|p| position_json(*p)).collect();
                if let Some(first) = ring.first() {
                    closed.push(position_json(*first));
                }
                Value::Array(closed)
            })
            .collect(),
    )
}

fn parse_position(value: &Value) -> Option<DVec2> {
    let arr = value.as_array()?;
    Some(DVec2::new(arr.first()?.as_f64()?, arr.get(1)?.as_f64()?))
}

fn parse_list(value: &Value) -> Option<Vec<DVec2>> {
    value.as_array()?.iter().map(parse_position).collect()
}

fn parse_rings(value: &Value) -> Option<Vec<Vec<DVec2>>> {
    value
        .as_array()?
        .iter()
        .map(|ring| {
            let mut positions = parse_list(ring)?;
            if positions.len() > 1 && positions.first() == positions.last() {
                positions.pop();
            }
            Some(positions)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn path(s: &str) -> CoordPath {
        s.parse().expect("Pfad muss parsebar sein")
    }

    fn square() -> Geometry {
        Geometry::Polygon(vec![vec![
            DVec2::new(0.0, 0.0),
            DVec2::new(2.0, 0.0),
            DVec2::new(2.0, 2.0),
            DVec2::new(0.0, 2.0),
        ]])
    }

    #[test]
    fn get_and_update_coordinate_by_path() {
        let mut g = square();
        assert_eq!(g.get_coordinate(&path("0.2")), Some(DVec2::new(2.0, 2.0)));
        assert!(g.update_coordinate(&path("0.2"), DVec2::new(3.0, 3.0)));
        assert_eq!(g.get_coordinate(&path("0.2")), Some(DVec2::new(3.0, 3.0)));
        assert_eq!(g.get_coordinate(&path("0.9")), None);
        assert_eq!(g.get_coordinate(&path("2")), None);
    }

    #[test]
    fn add_coordinate_inserts_before_index_and_allows_append() {
        let mut g = Geometry::LineString(vec![DVec2::ZERO, DVec2::new(2.0, 0.0)]);
        assert!(g.add_coordinate(&path("1"), DVec2::new(1.0, 0.0)));
        assert!(g.add_coordinate(&path("3"), DVec2::new(3.0, 0.0)));
        assert!(!g.add_coordinate(&path("9"), DVec2::ZERO));
        let xs: Vec<f64> = g.positions().iter().map(|(_, p)| p.x).collect();
        assert_eq!(xs, vec![0.0, 1.0, 2.0, 3.0]);
    }

    #[test]
    fn removing_ring_vertex_below_three_drops_ring() {
        let mut g = Geometry::Polygon(vec![vec![
            DVec2::new(0.0, 0.0),
            DVec2::new(1.0, 0.0),
            DVec2::new(0.0, 1.0),
        ]]);
        assert!(g.remove_coordinate(&path("0.1")));
        assert_eq!(g, Geometry::Polygon(vec![]));
        assert!(!g.is_valid());
    }

    #[test]
    fn line_with_one_position_is_invalid() {
        let mut g = Geometry::LineString(vec![DVec2::ZERO, DVec2::ONE]);
        assert!(g.is_valid());
        assert!(g.remove_coordinate(&path("0")));
        assert!(!g.is_valid());
    }

    #[test]
    fn area_is_planar_and_subtracts_holes() {
        assert_relative_eq!(square().area(), 4.0);
        let with_hole = Geometry::Polygon(vec![
            vec![
                DVec2::new(0.0, 0.0),
                DVec2::new(4.0, 0.0),
                DVec2::new(4.0, 4.0),
                DVec2::new(0.0, 4.0),
            ],
            vec![
                DVec2::new(1.0, 1.0),
                DVec2::new(2.0, 1.0),
                DVec2::new(2.0, 2.0),
                DVec2::new(1.0, 2.0),
            ],
        ]);
        assert_relative_eq!(with_hole.area(), 15.0);
        assert_relative_eq!(Geometry::LineString(vec![DVec2::ZERO, DVec2::ONE]).area(), 0.0);
    }

    #[test]
    fn combine_rejects_mixed_base_types() {
        let line = Geometry::LineString(vec![DVec2::ZERO, DVec2::ONE]);
        assert!(Geometry::combine([&line, &square()]).is_none());
        assert!(Geometry::combine(std::iter::empty()).is_none());
    }

    #[test]
    fn combine_flattens_multi_parts_and_parts_restores_them() {
        let a = Geometry::LineString(vec![DVec2::ZERO, DVec2::ONE]);
        let b = Geometry::MultiLineString(vec![
            vec![DVec2::new(5.0, 5.0), DVec2::new(6.0, 6.0)],
            vec![DVec2::new(7.0, 7.0), DVec2::new(8.0, 8.0)],
        ]);
        let combined = Geometry::combine([&a, &b]).expect("gleicher Grundtyp");
        assert_eq!(combined.geometry_type(), GeometryType::MultiLineString);
        let parts = combined.parts();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], a);
    }

    #[test]
    fn geojson_closes_rings_and_reads_them_back_open() {
        let json = square().to_geojson();
        let ring = json["coordinates"][0].as_array().expect("Ring-Array");
        assert_eq!(ring.len(), 5);
        assert_eq!(ring.first(), ring.last());
        assert_eq!(Geometry::from_geojson(&json), Some(square()));
    }

    #[test]
    fn translate_and_extent() {
        let mut g = square();
        g.translate(DVec2::new(1.0, -1.0));
        let (min, max) = g.extent().expect("nicht leer");
        assert_eq!(min, DVec2::new(1.0, -1.0));
        assert_eq!(max, DVec2::new(3.0, 1.0));
    }
}
