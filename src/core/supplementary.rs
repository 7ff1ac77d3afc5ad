//! Hilfsgeometrie für die Bearbeitung: Vertex- und Midpoint-Marker.

use super::{CoordPath, FeatureId, Geometry, RenderFeature};
use glam::DVec2;

/// Steuert, welche Marker erzeugt werden.
#[derive(Debug, Clone, Copy, Default)]
pub struct SupplementaryOptions<'a> {
    /// Midpoints zwischen aufeinanderfolgenden Positionen erzeugen.
    pub midpoints: bool,
    /// Pfade, deren Vertex als aktiv markiert wird.
    pub selected_paths: &'a [CoordPath],
}

/// Erzeugt Vertex- (und optional Midpoint-) Marker für die Geometrie eines Features.
///
/// Der `coord_path` eines Midpoints ist der Einfügeindex des Vertex, der beim
/// Ziehen an ihm entsteht. Bei Polygon-Ringen gibt es zusätzlich den Midpoint
/// auf dem schließenden Segment. Punkte erzeugen keine Marker.
pub fn supplementary_points(
    parent: &FeatureId,
    geometry: &Geometry,
    options: SupplementaryOptions<'_>,
) -> Vec<RenderFeature> {
    let mut out = Vec::new();
    let root = CoordPath::default();
    match geometry {
        Geometry::Point(_) => {}
        Geometry::MultiPoint(points) => {
            for (i, p) in points.iter().enumerate() {
                let path = root.child(i);
                let active = options.selected_paths.contains(&path);
                out.push(RenderFeature::vertex(parent, path, *p, active));
            }
        }
        Geometry::LineString(coords) => process_line(parent, coords, &root, false, options, &mut out),
        Geometry::MultiLineString(lines) => {
            for (l, line) in lines.iter().enumerate() {
                process_line(parent, line, &root.child(l), false, options, &mut out);
            }
        }
        Geometry::Polygon(rings) => {
            for (r, ring) in rings.iter().enumerate() {
                process_line(parent, ring, &root.child(r), true, options, &mut out);
            }
        }
        Geometry::MultiPolygon(polygons) => {
            for (p, rings) in polygons.iter().enumerate() {
                for (r, ring) in rings.iter().enumerate() {
                    let prefix = CoordPath::new(vec![p, r]);
                    process_line(parent, ring, &prefix, true, options, &mut out);
                }
            }
        }
    }
    out
}

fn process_line(
    parent: &FeatureId,
    positions: &[DVec2],
    prefix: &CoordPath,
    closed: bool,
    options: SupplementaryOptions<'_>,
    out: &mut Vec<RenderFeature>,
) {
    for (i, position) in positions.iter().enumerate() {
        if options.midpoints && i > 0 {
            let mid = midpoint(positions[i - 1], *position);
            out.push(RenderFeature::midpoint(parent, prefix.child(i), mid));
        }
        let path = prefix.child(i);
        let active = options.selected_paths.contains(&path);
        out.push(RenderFeature::vertex(parent, path, *position, active));
    }

    if closed && options.midpoints && positions.len() > 1 {
        if let (Some(first), Some(last)) = (positions.first(), positions.last()) {
            let mid = midpoint(*last, *first);
            out.push(RenderFeature::midpoint(parent, prefix.child(positions.len()), mid));
        }
    }
}

fn midpoint(a: DVec2, b: DVec2) -> DVec2 {
    (a + b) * 0.5
}
