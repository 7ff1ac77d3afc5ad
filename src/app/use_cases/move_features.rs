//! Use-Case: Verschieben ganzer Features und einzelner Vertices.

use crate::core::{CoordPath, FeatureId, FeatureStore, Geometry, MovementConstraint};
use glam::DVec2;

/// Verschiebt die angegebenen Features gemeinsam um das beschränkte Delta.
///
/// Gibt das tatsächlich angewendete Delta zurück.
pub fn move_features(
    store: &mut FeatureStore,
    ids: &[FeatureId],
    delta: DVec2,
    constraint: &dyn MovementConstraint,
) -> DVec2 {
    if ids.is_empty() || delta == DVec2::ZERO {
        return DVec2::ZERO;
    }

    let constrained = {
        let geometries: Vec<&Geometry> = ids
            .iter()
            .filter_map(|id| store.get(id))
            .map(|f| &f.geometry)
            .collect();
        constraint.constrain(&geometries, delta)
    };

    for id in ids {
        if let Some(feature) = store.get_mut(id) {
            feature.geometry.translate(constrained);
        }
    }
    constrained
}

/// Verschiebt ausgewählte Positionen eines Features.
///
/// Jede Position geht als Punktgeometrie in die Beschränkung ein; alle erhalten
/// dasselbe Delta. Ungültige Pfade werden übersprungen.
pub fn move_coordinates(
    store: &mut FeatureStore,
    feature_id: &FeatureId,
    paths: &[CoordPath],
    delta: DVec2,
    constraint: &dyn MovementConstraint,
) -> DVec2 {
    let Some(feature) = store.get(feature_id) else {
        return DVec2::ZERO;
    };
    let positions: Vec<(CoordPath, DVec2)> = paths
        .iter()
        .filter_map(|path| Some((path.clone(), feature.geometry.get_coordinate(path)?)))
        .collect();
    if positions.is_empty() {
        return DVec2::ZERO;
    }

    let points: Vec<Geometry> = positions.iter().map(|(_, p)| Geometry::Point(*p)).collect();
    let point_refs: Vec<&Geometry> = points.iter().collect();
    let constrained = constraint.constrain(&point_refs, delta);

    if let Some(feature) = store.get_mut(feature_id) {
        for (path, position) in &positions {
            feature.geometry.update_coordinate(path, *position + constrained);
        }
    }
    constrained
}
