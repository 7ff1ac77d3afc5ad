//! Render-Pass: projiziert den Store über den aktiven Modus in Overlay-Daten.
//!
//! Der Pass liest die seit dem letzten Durchlauf gesammelten Store-Änderungen,
//! meldet Selektions- und Löschänderungen und setzt die Änderungsverfolgung zurück.
//!
//! Gezeichnet wird in zwei Quellen: geänderte Features landen in `hot`, alle
//! anderen in `cold`. Ein Drag-Frame zeichnet so nur das bewegte Feature neu;
//! `cold` wird nur gesendet, wenn sich sein Inhalt geändert hat. Ein Dirty-Store
//! (Moduswechsel, Löschung) zeichnet alles neu nach `cold`.

use super::host::OverlaySource;
use super::modes::{ModeContext, ModeHandle};
use super::notifications::Notification;
use crate::core::{Feature, FeatureId, Geometry, RenderFeature};
use serde_json::{json, Value};

/// Zuletzt gesendeter Inhalt beider Overlay-Quellen.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OverlaySources {
    pub hot: Vec<RenderFeature>,
    pub cold: Vec<RenderFeature>,
}

impl OverlaySources {
    /// IDs der Feature-Körper in `hot` (Marker zählen über ihr Eltern-Feature mit).
    fn hot_body_ids(&self) -> impl Iterator<Item = &FeatureId> {
        self.hot.iter().filter_map(|f| f.id.as_ref())
    }
}

/// Feature, zu dem ein Render-Feature gehört (Körper oder Eltern eines Markers).
fn owner(feature: &RenderFeature) -> Option<&FeatureId> {
    feature.id.as_ref().or(feature.parent.as_ref())
}

/// Führt einen Render-Pass für den aktiven Modus aus.
pub fn render_pass(mode: &dyn ModeHandle, ctx: &mut ModeContext<'_>) {
    if !ctx.host.is_attached() {
        ctx.store_mut().clear_changes();
        return;
    }

    ctx.state.map_classes.queue_mode(mode.name());

    let mut sources = std::mem::take(&mut ctx.state.overlay);
    let dirty = ctx.store().is_dirty();

    let (hot_ids, cold_ids): (Vec<FeatureId>, Vec<FeatureId>) = if dirty {
        (Vec::new(), ctx.store().ids())
    } else {
        let store = ctx.store();
        let hot: Vec<FeatureId> = store
            .changed_ids()
            .into_iter()
            .filter(|id| store.contains(id))
            .collect();
        let cooled = sources
            .hot_body_ids()
            .filter(|id| !hot.contains(id) && store.contains(id))
            .cloned()
            .collect();
        (hot, cooled)
    };

    sources.hot.clear();
    let last_cold_len = sources.cold.len();
    if dirty {
        sources.cold.clear();
    } else {
        sources
            .cold
            .retain(|f| owner(f).map_or(true, |id| !hot_ids.contains(id)));
    }
    let cold_changed = last_cold_len != sources.cold.len() || !cold_ids.is_empty();

    render_into(mode, ctx, &hot_ids, &mut sources.hot);
    render_into(mode, ctx, &cold_ids, &mut sources.cold);

    if cold_changed {
        ctx.host
            .set_overlay_data(OverlaySource::Cold, &sources.cold);
    }
    ctx.host.set_overlay_data(OverlaySource::Hot, &sources.hot);
    log::debug!(
        "Render-Pass: {} hot, {} cold{}",
        sources.hot.len(),
        sources.cold.len(),
        if cold_changed { " (neu gesendet)" } else { "" }
    );
    ctx.state.overlay = sources;

    if ctx.store_mut().take_selection_changed() {
        let features = ctx
            .store()
            .selected_features()
            .into_iter()
            .map(Feature::to_geojson)
            .collect();
        let points = ctx
            .store()
            .selected_coordinate_positions()
            .into_iter()
            .map(point_feature)
            .collect();
        ctx.notify(Notification::SelectionChange { features, points });
    }

    let deleted = ctx.store_mut().take_deleted();
    if !deleted.is_empty() {
        ctx.notify(Notification::Delete {
            features: deleted.iter().map(Feature::to_geojson).collect(),
        });
    }

    ctx.notify(Notification::Render);
    ctx.store_mut().clear_changes();
}

fn render_into(
    mode: &dyn ModeHandle,
    ctx: &mut ModeContext<'_>,
    ids: &[FeatureId],
    target: &mut Vec<RenderFeature>,
) {
    for id in ids {
        let Some(body) = ctx.store().get(id).map(RenderFeature::body) else {
            continue;
        };
        mode.render(ctx, body, &mut |f| target.push(f));
    }
}

/// Selektierte Koordinate als GeoJSON-Punkt-Feature ohne Properties.
fn point_feature(position: glam::DVec2) -> Value {
    json!({
        "type": "Feature",
        "properties": {},
        "geometry": Geometry::Point(position).to_geojson(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::CoordPath;
    use glam::DVec2;

    #[test]
    fn owner_covers_bodies_and_markers() {
        let feature = Feature::new("a", Geometry::LineString(vec![DVec2::ZERO, DVec2::ONE]));
        let body = RenderFeature::body(&feature);
        let vertex = RenderFeature::vertex(&"b".into(), CoordPath::new(vec![0]), DVec2::ZERO, false);
        assert_eq!(owner(&body), Some(&FeatureId::from("a")));
        assert_eq!(owner(&vertex), Some(&FeatureId::from("b")));
    }
}
