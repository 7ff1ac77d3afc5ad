//! Kontext eines Handler-Aufrufs: Editor-State und Host, explizit durchgereicht.

use super::{ModeName, ModeOptions};
use crate::app::hit_test::{self, HitQuery};
use crate::app::host::MapHost;
use crate::app::notifications::{ActionState, Notification};
use crate::app::state::{DeferredHostCall, EditorState, ModeRequest};
use crate::app::ui::Cursor;
use crate::app::use_cases;
use crate::core::{CoordPath, FeatureId, FeatureStore, Geometry, RenderFeature};
use crate::shared::DrawOptions;
use glam::{DVec2, Vec2};

/// Zugriff eines Modus auf Store, Optionen, Notifications und Host.
pub struct ModeContext<'a> {
    pub(crate) state: &'a mut EditorState,
    pub(crate) host: &'a mut dyn MapHost,
}

impl<'a> ModeContext<'a> {
    pub(crate) fn new(state: &'a mut EditorState, host: &'a mut dyn MapHost) -> Self {
        Self { state, host }
    }

    pub fn store(&self) -> &FeatureStore {
        &self.state.store
    }

    pub fn store_mut(&mut self) -> &mut FeatureStore {
        &mut self.state.store
    }

    pub fn options(&self) -> &DrawOptions {
        &self.state.options
    }

    pub fn current_mode(&self) -> ModeName {
        self.state.current_mode()
    }

    // ── Modus-Steuerung ─────────────────────────────────────────────

    /// Fordert einen Moduswechsel an; er wird nach dem laufenden Handler ausgeführt.
    pub fn change_mode(&mut self, name: ModeName, options: ModeOptions) {
        log::debug!("Moduswechsel angefordert: {}", name);
        self.state.pending_mode = Some(ModeRequest { name, options });
    }

    pub fn has_pending_mode_change(&self) -> bool {
        self.state.pending_mode.is_some()
    }

    // ── Notifications ───────────────────────────────────────────────

    pub fn notify(&mut self, notification: Notification) {
        self.state.notifications.record(notification);
    }

    /// Veröffentlicht die Aktions-Verfügbarkeit (nur bei Änderung).
    pub fn set_actionable(&mut self, actions: ActionState) {
        self.state.set_actionable(actions);
    }

    // ── Host ────────────────────────────────────────────────────────

    /// Schaltet Karten-Pan sofort um.
    pub fn set_drag_pan(&mut self, enabled: bool) {
        if self.state.update_drag_pan(enabled) {
            self.host.set_drag_pan(enabled);
        }
    }

    /// Doppelklick-Zoom wird erst im nächsten Tick umgeschaltet.
    pub fn set_double_click_zoom(&mut self, enabled: bool) {
        self.state
            .deferred
            .push(DeferredHostCall::DoubleClickZoom(enabled));
    }

    pub fn queue_cursor(&mut self, cursor: Cursor) {
        self.state.map_classes.queue_mouse(cursor);
    }

    /// Der Host soll das auslösende Event nicht an die Karte weitergeben.
    pub fn stop_propagation(&mut self) {
        self.state.outcome.stop_propagation = true;
    }

    /// Hit-Test für ein Rechteck aus zwei Screen-Ecken.
    pub fn features_in_box(&self, a: Vec2, b: Vec2) -> Vec<RenderFeature> {
        hit_test::features_at_click(HitQuery::Box(a, b), &*self.host, &self.state.options)
    }

    // ── Bewegung ────────────────────────────────────────────────────

    /// Beschränkt ein Delta für die gegebenen Geometrien.
    pub fn constrain(&self, geometries: &[&Geometry], delta: DVec2) -> DVec2 {
        self.state.constraint.constrain(geometries, delta)
    }

    /// Verschiebt Features um das beschränkte Delta. Gibt das angewendete Delta zurück.
    pub fn move_features(&mut self, ids: &[FeatureId], delta: DVec2) -> DVec2 {
        let state = &mut *self.state;
        use_cases::move_features(&mut state.store, ids, delta, state.constraint.as_ref())
    }

    /// Verschiebt einzelne Positionen eines Features. Gibt das angewendete Delta zurück.
    pub fn move_coordinates(&mut self, feature_id: &FeatureId, paths: &[CoordPath], delta: DVec2) -> DVec2 {
        let state = &mut *self.state;
        use_cases::move_coordinates(
            &mut state.store,
            feature_id,
            paths,
            delta,
            state.constraint.as_ref(),
        )
    }
}
