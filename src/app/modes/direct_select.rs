//! Direct Select: Vertex- und Midpoint-Bearbeitung eines einzelnen Features.

use super::bindings::{selectors, Bindings, Flow};
use super::{InteractionMode, ModeContext, ModeError, ModeName, ModeOptions};
use crate::app::notifications::{ActionState, Notification, UpdateAction};
use crate::app::ui::Cursor;
use crate::core::{
    supplementary_points, CoordPath, DeleteMode, FeatureId, FeatureStore, RenderFeature,
    SelectedCoordinate, SupplementaryOptions,
};
use crate::input::{ClassifiedEvent, EventKind};
use glam::DVec2;

/// Aktivierungszustand von Direct Select.
#[derive(Debug)]
pub struct DirectSelectMode {
    feature_id: FeatureId,
    selected_paths: Vec<CoordPath>,
    drag_move_location: Option<DVec2>,
    drag_moving: bool,
    can_drag_move: bool,
}

impl DirectSelectMode {
    /// Prüft die Startoptionen gegen den Store.
    ///
    /// Fehlende `feature_id`, ein unbekanntes Feature und Punkt-Features sind
    /// Verdrahtungsfehler des Aufrufers.
    pub fn new(store: &FeatureStore, options: &ModeOptions) -> Result<Self, ModeError> {
        let feature_id = options
            .feature_id
            .clone()
            .ok_or(ModeError::MissingOption {
                mode: ModeName::DirectSelect,
                option: "feature_id",
            })?;
        let feature = store
            .get(&feature_id)
            .ok_or_else(|| ModeError::FeatureNotFound(feature_id.clone()))?;
        if feature.is_point() {
            return Err(ModeError::PointNotSupported(feature_id));
        }

        Ok(Self {
            feature_id,
            selected_paths: options.coord_path.iter().cloned().collect(),
            drag_move_location: None,
            drag_moving: false,
            can_drag_move: false,
        })
    }

    pub fn feature_id(&self) -> &FeatureId {
        &self.feature_id
    }

    pub fn selected_paths(&self) -> &[CoordPath] {
        &self.selected_paths
    }

    fn sync_selected_coordinates(&self, ctx: &mut ModeContext<'_>) {
        let coordinates = self
            .selected_paths
            .iter()
            .map(|path| SelectedCoordinate {
                feature_id: self.feature_id.clone(),
                coord_path: path.clone(),
            })
            .collect();
        ctx.store_mut().set_selected_coordinates(coordinates);
    }

    fn fire_update(&self, ctx: &mut ModeContext<'_>) {
        let Some(feature) = ctx.store().get(&self.feature_id) else {
            return;
        };
        let features = vec![feature.to_geojson()];
        ctx.notify(Notification::Update {
            action: UpdateAction::ChangeCoordinates,
            features,
        });
    }

    fn fire_actionable(&self, ctx: &mut ModeContext<'_>) {
        ctx.set_actionable(ActionState {
            trash: !self.selected_paths.is_empty(),
            ..ActionState::none()
        });
    }

    fn start_dragging(&mut self, ctx: &mut ModeContext<'_>, event: &ClassifiedEvent) {
        ctx.set_drag_pan(false);
        self.can_drag_move = true;
        self.drag_move_location = Some(event.lng_lat);
    }

    /// Beendet die Drag-Session und gibt das Karten-Pan wieder frei.
    fn stop_dragging(&mut self, ctx: &mut ModeContext<'_>) {
        ctx.set_drag_pan(true);
        self.drag_moving = false;
        self.can_drag_move = false;
        self.drag_move_location = None;
    }

    // ── Prädikate ───────────────────────────────────────────────────

    fn is_drag_moving_pred(&self, _ctx: &ModeContext<'_>, _event: &ClassifiedEvent) -> bool {
        self.drag_moving
    }

    fn can_drag_move_pred(&self, _ctx: &ModeContext<'_>, _event: &ClassifiedEvent) -> bool {
        self.can_drag_move
    }

    // ── Handler ─────────────────────────────────────────────────────

    fn on_mouse_move(&mut self, ctx: &mut ModeContext<'_>, event: &ClassifiedEvent) -> Flow {
        let no_coords = self.selected_paths.is_empty();
        let cursor = if selectors::is_active_feature(&*self, &*ctx, event) && no_coords {
            Cursor::Move
        } else if selectors::is_vertex(&*self, &*ctx, event) && !no_coords {
            Cursor::Move
        } else {
            Cursor::None
        };
        ctx.queue_cursor(cursor);
        self.stop_dragging(ctx);
        Flow::Continue
    }

    fn on_mouse_out(&mut self, ctx: &mut ModeContext<'_>, _event: &ClassifiedEvent) -> Flow {
        self.fire_update(ctx);
        Flow::Continue
    }

    fn on_press_vertex(&mut self, ctx: &mut ModeContext<'_>, event: &ClassifiedEvent) -> Flow {
        self.start_dragging(ctx, event);
        let Some(path) = event.feature_target.as_ref().and_then(|t| t.coord_path.clone()) else {
            return Flow::Continue;
        };
        if !self.selected_paths.contains(&path) {
            if event.shift_key() {
                self.selected_paths.push(path);
            } else {
                self.selected_paths = vec![path];
            }
        }
        self.sync_selected_coordinates(ctx);
        ctx.store_mut().feature_changed(&self.feature_id);
        Flow::Continue
    }

    fn on_press_feature(&mut self, ctx: &mut ModeContext<'_>, event: &ClassifiedEvent) -> Flow {
        if self.selected_paths.is_empty() {
            self.start_dragging(ctx, event);
        } else {
            self.stop_dragging(ctx);
        }
        Flow::Continue
    }

    fn on_press_midpoint(&mut self, ctx: &mut ModeContext<'_>, event: &ClassifiedEvent) -> Flow {
        self.start_dragging(ctx, event);
        let Some(target) = &event.feature_target else {
            return Flow::Continue;
        };
        let (Some(path), Some(position)) = (target.coord_path.clone(), target.position()) else {
            return Flow::Continue;
        };

        let inserted = ctx
            .store_mut()
            .get_mut(&self.feature_id)
            .is_some_and(|f| f.geometry.add_coordinate(&path, position));
        if !inserted {
            log::debug!("Midpoint {} konnte nicht eingefügt werden", path);
            return Flow::Continue;
        }

        self.fire_update(ctx);
        self.selected_paths = vec![path];
        self.sync_selected_coordinates(ctx);
        Flow::Continue
    }

    fn on_drag(&mut self, ctx: &mut ModeContext<'_>, event: &ClassifiedEvent) -> Flow {
        self.drag_moving = true;
        ctx.stop_propagation();
        if let Some(anchor) = self.drag_move_location {
            let delta = event.lng_lat - anchor;
            if self.selected_paths.is_empty() {
                ctx.move_features(std::slice::from_ref(&self.feature_id), delta);
            } else {
                ctx.move_coordinates(&self.feature_id, &self.selected_paths, delta);
            }
        }
        self.drag_move_location = Some(event.lng_lat);
        Flow::Continue
    }

    fn on_click_stop(&mut self, ctx: &mut ModeContext<'_>, _event: &ClassifiedEvent) -> Flow {
        self.stop_dragging(ctx);
        Flow::Continue
    }

    fn on_release(&mut self, ctx: &mut ModeContext<'_>, _event: &ClassifiedEvent) -> Flow {
        if self.drag_moving {
            self.fire_update(ctx);
        }
        self.stop_dragging(ctx);
        Flow::Continue
    }

    fn on_click_outside(&mut self, ctx: &mut ModeContext<'_>, _event: &ClassifiedEvent) -> Flow {
        ctx.change_mode(ModeName::SimpleSelect, ModeOptions::default());
        Flow::Continue
    }

    fn on_click_active_feature(&mut self, ctx: &mut ModeContext<'_>, _event: &ClassifiedEvent) -> Flow {
        self.selected_paths.clear();
        ctx.store_mut().clear_selected_coordinates();
        ctx.store_mut().feature_changed(&self.feature_id);
        Flow::Continue
    }
}

impl InteractionMode for DirectSelectMode {
    fn name(&self) -> ModeName {
        ModeName::DirectSelect
    }

    fn start(&mut self, ctx: &mut ModeContext<'_>, bindings: &mut Bindings<Self>) {
        ctx.store_mut()
            .set_selected(std::slice::from_ref(&self.feature_id));
        ctx.set_double_click_zoom(false);
        self.sync_selected_coordinates(ctx);
        self.fire_actionable(ctx);

        bindings
            .on(EventKind::MouseMove, selectors::always, Self::on_mouse_move)
            .on(EventKind::MouseOut, Self::is_drag_moving_pred, Self::on_mouse_out);
        for kind in [EventKind::MouseDown, EventKind::TouchStart] {
            bindings
                .on(kind, selectors::is_vertex, Self::on_press_vertex)
                .on(kind, selectors::is_active_feature, Self::on_press_feature)
                .on(kind, selectors::is_midpoint, Self::on_press_midpoint);
        }
        bindings
            .on(EventKind::Drag, Self::can_drag_move_pred, Self::on_drag)
            .on(EventKind::MouseUp, selectors::always, Self::on_release)
            .on(EventKind::TouchEnd, selectors::always, Self::on_release);
        for kind in [EventKind::Click, EventKind::Tap] {
            bindings
                .on(kind, selectors::always, Self::on_click_stop)
                .on(kind, selectors::no_target, Self::on_click_outside)
                .on(kind, selectors::is_inactive_feature, Self::on_click_outside)
                .on(kind, selectors::is_active_feature, Self::on_click_active_feature);
        }
    }

    fn stop(&mut self, ctx: &mut ModeContext<'_>) {
        self.stop_dragging(ctx);
        ctx.set_double_click_zoom(true);
        ctx.store_mut().clear_selected_coordinates();
    }

    fn render(
        &self,
        ctx: &mut ModeContext<'_>,
        mut feature: RenderFeature,
        emit: &mut dyn FnMut(RenderFeature),
    ) {
        let is_target = feature.id.as_ref() == Some(&self.feature_id);
        feature.active = is_target;
        let markers = if is_target {
            supplementary_points(
                &self.feature_id,
                &feature.geometry,
                SupplementaryOptions {
                    midpoints: true,
                    selected_paths: &self.selected_paths,
                },
            )
        } else {
            Vec::new()
        };

        emit(feature);
        for marker in markers {
            emit(marker);
        }
        self.fire_actionable(ctx);
    }

    fn trash(&mut self, ctx: &mut ModeContext<'_>) {
        if self.selected_paths.is_empty() {
            return;
        }
        let mut paths = std::mem::take(&mut self.selected_paths);
        paths.sort_unstable_by(|a, b| b.cmp(a));
        paths.dedup();

        let Some(feature) = ctx.store_mut().get_mut(&self.feature_id) else {
            return;
        };
        for path in &paths {
            feature.geometry.remove_coordinate(path);
        }
        let still_valid = feature.geometry.is_valid();

        self.fire_update(ctx);
        ctx.store_mut().clear_selected_coordinates();
        self.fire_actionable(ctx);

        if !still_valid {
            log::info!(
                "Feature {} nach Entfernen von {} Vertices ungültig, wird gelöscht",
                self.feature_id,
                paths.len()
            );
            ctx.store_mut()
                .delete(std::slice::from_ref(&self.feature_id), DeleteMode::Notify);
            ctx.change_mode(ModeName::SimpleSelect, ModeOptions::default());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Feature, Geometry};

    fn store() -> FeatureStore {
        let mut store = FeatureStore::new();
        store.add(Feature::new(
            "line",
            Geometry::LineString(vec![DVec2::ZERO, DVec2::ONE]),
        ));
        store.add(Feature::new("point", Geometry::Point(DVec2::ZERO)));
        store
    }

    #[test]
    fn construction_validates_target() {
        let store = store();
        assert_eq!(
            DirectSelectMode::new(&store, &ModeOptions::direct("nope".into())).err(),
            Some(ModeError::FeatureNotFound("nope".into()))
        );
        assert_eq!(
            DirectSelectMode::new(&store, &ModeOptions::direct("point".into())).err(),
            Some(ModeError::PointNotSupported("point".into()))
        );
    }

    #[test]
    fn construction_seeds_coord_path_without_drag_session() {
        let store = store();
        let options = ModeOptions::direct("line".into()).with_coord_path(CoordPath::new(vec![1]));
        let mode = DirectSelectMode::new(&store, &options).expect("gültige Optionen");
        assert_eq!(mode.feature_id(), &FeatureId::from("line"));
        assert_eq!(mode.selected_paths(), &[CoordPath::new(vec![1])]);
        assert_eq!(mode.drag_move_location, None);
        assert!(!mode.can_drag_move);
    }
}
