//! Simple Select: Features selektieren, verschieben, per Rechteck auswählen,
//! löschen, zusammenfassen und aufteilen.
//!
//! Zustände einer Aktivierung: ruhend, Drag-Move (selektierte Features folgen dem
//! Zeiger) und Box-Select (Shift+Drag auf leerer Fläche zieht ein Rechteck auf).

use super::bindings::{selectors, Bindings, Flow};
use super::{InteractionMode, ModeContext, ModeName, ModeOptions};
use crate::app::host::ScreenBox;
use crate::app::notifications::{ActionState, Notification, UpdateAction};
use crate::app::ui::Cursor;
use crate::app::use_cases;
use crate::core::{
    supplementary_points, DeleteMode, Feature, FeatureId, Geometry, MetaKind, RenderFeature,
    SupplementaryOptions,
};
use crate::input::{ClassifiedEvent, EventKind};
use glam::{DVec2, Vec2};

/// Aktivierungszustand von Simple Select.
#[derive(Debug, Default)]
pub struct SimpleSelectMode {
    initial_ids: Vec<FeatureId>,
    drag_move_location: Option<DVec2>,
    box_select_start: Option<Vec2>,
    box_select_overlay: Option<ScreenBox>,
    box_selecting: bool,
    can_box_select: bool,
    drag_moving: bool,
    can_drag_move: bool,
}

impl SimpleSelectMode {
    pub fn new(options: &ModeOptions) -> Self {
        Self {
            initial_ids: options.feature_ids.clone(),
            ..Self::default()
        }
    }

    /// Aktuelles Auswahlrechteck in Screen-Pixeln (zum Zeichnen durch den Host).
    pub fn box_select_overlay(&self) -> Option<ScreenBox> {
        self.box_select_overlay
    }

    pub fn is_drag_moving(&self) -> bool {
        self.drag_moving
    }

    pub fn is_box_selecting(&self) -> bool {
        self.box_selecting
    }

    /// Beendet Drag-Move und Box-Select und gibt das Karten-Pan wieder frei.
    fn stop_extended_interactions(&mut self, ctx: &mut ModeContext<'_>) {
        self.box_select_overlay = None;
        self.box_select_start = None;
        ctx.set_drag_pan(true);
        self.box_selecting = false;
        self.can_box_select = false;
        self.drag_moving = false;
        self.can_drag_move = false;
    }

    fn fire_update(ctx: &mut ModeContext<'_>) {
        let features = ctx
            .store()
            .selected_features()
            .into_iter()
            .map(Feature::to_geojson)
            .collect();
        ctx.notify(Notification::Update {
            action: UpdateAction::Move,
            features,
        });
    }

    fn fire_actionable(ctx: &mut ModeContext<'_>) {
        let actions = {
            let selected = ctx.store().selected_features();
            let combinable = selected.len() > 1
                && selected.iter().all(|f| {
                    f.geometry_type().base() == selected[0].geometry_type().base()
                });
            ActionState {
                trash: !selected.is_empty(),
                combine_features: combinable,
                uncombine_features: selected.iter().any(|f| f.geometry_type().is_multi()),
            }
        };
        ctx.set_actionable(actions);
    }

    // ── Prädikate ───────────────────────────────────────────────────

    fn is_drag_moving_pred(&self, _ctx: &ModeContext<'_>, _event: &ClassifiedEvent) -> bool {
        self.drag_moving
    }

    fn can_drag_move_pred(&self, _ctx: &ModeContext<'_>, _event: &ClassifiedEvent) -> bool {
        self.can_drag_move
    }

    fn can_box_select_pred(&self, _ctx: &ModeContext<'_>, _event: &ClassifiedEvent) -> bool {
        self.can_box_select
    }

    /// Aktiver Feature-Körper, der kein Punkt ist.
    fn is_movable_target(&self, ctx: &ModeContext<'_>, event: &ClassifiedEvent) -> bool {
        selectors::is_active_feature(self, ctx, event)
            && event
                .feature_target
                .as_ref()
                .and_then(|t| t.id.as_ref())
                .and_then(|id| ctx.store().get(id))
                .is_some_and(|f| !f.is_point())
    }

    fn is_box_start(&self, ctx: &ModeContext<'_>, event: &ClassifiedEvent) -> bool {
        selectors::is_shift_mousedown(self, ctx, event) && selectors::no_target(self, ctx, event)
    }

    // ── Handler ─────────────────────────────────────────────────────

    fn on_mouse_move(&mut self, ctx: &mut ModeContext<'_>, _event: &ClassifiedEvent) -> Flow {
        self.stop_extended_interactions(ctx);
        Flow::Continue
    }

    fn on_mouse_out(&mut self, ctx: &mut ModeContext<'_>, _event: &ClassifiedEvent) -> Flow {
        Self::fire_update(ctx);
        Flow::Continue
    }

    fn on_press_movable(&mut self, ctx: &mut ModeContext<'_>, event: &ClassifiedEvent) -> Flow {
        self.stop_extended_interactions(ctx);
        ctx.set_drag_pan(false);
        if let Some(id) = event.feature_target.as_ref().and_then(|t| t.id.as_ref()) {
            ctx.store_mut().feature_changed(id);
        }
        self.can_drag_move = true;
        self.drag_move_location = Some(event.lng_lat);
        Flow::Continue
    }

    fn on_press_box_start(&mut self, ctx: &mut ModeContext<'_>, event: &ClassifiedEvent) -> Flow {
        self.stop_extended_interactions(ctx);
        ctx.set_drag_pan(false);
        self.box_select_start = Some(event.point);
        self.can_box_select = true;
        Flow::Continue
    }

    fn on_drag_move(&mut self, ctx: &mut ModeContext<'_>, event: &ClassifiedEvent) -> Flow {
        self.drag_moving = true;
        ctx.stop_propagation();
        if let Some(anchor) = self.drag_move_location {
            let ids = ctx.store().selected_ids();
            ctx.move_features(&ids, event.lng_lat - anchor);
        }
        self.drag_move_location = Some(event.lng_lat);
        Flow::Continue
    }

    fn on_drag_box(&mut self, ctx: &mut ModeContext<'_>, event: &ClassifiedEvent) -> Flow {
        self.box_selecting = true;
        ctx.queue_cursor(Cursor::Add);
        if let Some(start) = self.box_select_start {
            self.box_select_overlay = Some(ScreenBox::from_corners(start, event.point));
        }
        Flow::Continue
    }

    fn on_release(&mut self, ctx: &mut ModeContext<'_>, event: &ClassifiedEvent) -> Flow {
        if self.drag_moving {
            Self::fire_update(ctx);
        } else if self.box_selecting {
            if let Some(start) = self.box_select_start {
                let ids: Vec<FeatureId> = ctx
                    .features_in_box(start, event.point)
                    .into_iter()
                    .filter(|f| f.meta == MetaKind::Feature)
                    .filter_map(|f| f.id)
                    .filter(|id| !ctx.store().is_selected(id))
                    .collect();
                if !ids.is_empty() {
                    log::debug!("Box-Select: {} Features hinzugefügt", ids.len());
                    ctx.store_mut().select(&ids);
                    ctx.queue_cursor(Cursor::Move);
                }
            }
        }
        self.stop_extended_interactions(ctx);
        Flow::Continue
    }

    fn on_click_empty(&mut self, ctx: &mut ModeContext<'_>, _event: &ClassifiedEvent) -> Flow {
        ctx.store_mut().clear_selected();
        ctx.set_double_click_zoom(true);
        self.stop_extended_interactions(ctx);
        Flow::Continue
    }

    fn on_click_marker(&mut self, ctx: &mut ModeContext<'_>, event: &ClassifiedEvent) -> Flow {
        let Some(target) = &event.feature_target else {
            return Flow::Continue;
        };
        let (Some(parent), Some(path)) = (&target.parent, &target.coord_path) else {
            return Flow::Continue;
        };
        ctx.change_mode(
            ModeName::DirectSelect,
            ModeOptions::direct(parent.clone()).with_coord_path(path.clone()),
        );
        ctx.queue_cursor(Cursor::Move);
        Flow::Continue
    }

    fn on_click_feature(&mut self, ctx: &mut ModeContext<'_>, event: &ClassifiedEvent) -> Flow {
        ctx.set_double_click_zoom(false);
        self.stop_extended_interactions(ctx);

        let Some(id) = event.feature_target.as_ref().and_then(|t| t.id.clone()) else {
            return Flow::Continue;
        };
        let Some(is_point) = ctx.store().get(&id).map(Feature::is_point) else {
            return Flow::Continue;
        };
        let shift = event.shift_key();
        let selected_count = ctx.store().selected_ids().len();
        let is_selected = ctx.store().is_selected(&id);

        if !shift && is_selected && !is_point {
            ctx.change_mode(ModeName::DirectSelect, ModeOptions::direct(id));
            return Flow::Continue;
        }

        match (is_selected, shift) {
            (true, true) => {
                ctx.store_mut().deselect(&id);
                ctx.queue_cursor(Cursor::Pointer);
                if selected_count == 1 {
                    ctx.set_double_click_zoom(true);
                }
            }
            (false, true) => {
                ctx.store_mut().select(std::slice::from_ref(&id));
                ctx.queue_cursor(Cursor::Move);
            }
            (false, false) => {
                ctx.store_mut().set_selected(std::slice::from_ref(&id));
                ctx.queue_cursor(Cursor::Move);
            }
            (true, false) => {}
        }
        ctx.store_mut().feature_changed(&id);
        Flow::Continue
    }
}

impl InteractionMode for SimpleSelectMode {
    fn name(&self) -> ModeName {
        ModeName::SimpleSelect
    }

    fn start(&mut self, ctx: &mut ModeContext<'_>, bindings: &mut Bindings<Self>) {
        let initial: Vec<FeatureId> = self
            .initial_ids
            .iter()
            .filter(|id| ctx.store().contains(id))
            .cloned()
            .collect();
        ctx.store_mut().set_selected(&initial);
        Self::fire_actionable(ctx);

        bindings
            .on(EventKind::MouseMove, selectors::always, Self::on_mouse_move)
            .on(EventKind::MouseOut, Self::is_drag_moving_pred, Self::on_mouse_out)
            .on(EventKind::MouseDown, Self::is_movable_target, Self::on_press_movable)
            .on(EventKind::TouchStart, Self::is_movable_target, Self::on_press_movable);
        if ctx.options().box_select {
            bindings.on(EventKind::MouseDown, Self::is_box_start, Self::on_press_box_start);
        }
        bindings
            .on(EventKind::Drag, Self::can_drag_move_pred, Self::on_drag_move)
            .on(EventKind::Drag, Self::can_box_select_pred, Self::on_drag_box)
            .on(EventKind::MouseUp, selectors::always, Self::on_release)
            .on(EventKind::TouchEnd, selectors::always, Self::on_release);
        for kind in [EventKind::Click, EventKind::Tap] {
            bindings
                .on(kind, selectors::no_target, Self::on_click_empty)
                .on(kind, selectors::is_of_meta_marker, Self::on_click_marker)
                .on(kind, selectors::is_feature, Self::on_click_feature);
        }
    }

    fn stop(&mut self, ctx: &mut ModeContext<'_>) {
        self.stop_extended_interactions(ctx);
        ctx.set_double_click_zoom(true);
    }

    fn render(
        &self,
        ctx: &mut ModeContext<'_>,
        mut feature: RenderFeature,
        emit: &mut dyn FnMut(RenderFeature),
    ) {
        feature.active = feature
            .id
            .as_ref()
            .is_some_and(|id| ctx.store().is_selected(id));

        let markers = match &feature.id {
            Some(id) if feature.active && !matches!(feature.geometry, Geometry::Point(_)) => {
                supplementary_points(id, &feature.geometry, SupplementaryOptions::default())
            }
            _ => Vec::new(),
        };

        emit(feature);
        Self::fire_actionable(ctx);
        for marker in markers {
            emit(marker);
        }
    }

    fn trash(&mut self, ctx: &mut ModeContext<'_>) {
        let ids = ctx.store().selected_ids();
        if ids.is_empty() {
            return;
        }
        ctx.store_mut().delete(&ids, DeleteMode::Notify);
        Self::fire_actionable(ctx);
    }

    fn combine_features(&mut self, ctx: &mut ModeContext<'_>) {
        let Some(outcome) = use_cases::combine_selected(ctx.store_mut()) else {
            return;
        };
        ctx.notify(Notification::Combine {
            created_features: outcome.created,
            deleted_features: outcome.deleted,
        });
        Self::fire_actionable(ctx);
    }

    fn uncombine_features(&mut self, ctx: &mut ModeContext<'_>) {
        let outcome = use_cases::uncombine_selected(ctx.store_mut());
        if outcome.created.len() > 1 {
            ctx.notify(Notification::Uncombine {
                created_features: outcome.created,
                deleted_features: outcome.deleted,
            });
        }
        Self::fire_actionable(ctx);
    }
}
