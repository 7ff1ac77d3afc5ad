//! Editor-State: zentrale Datenhaltung zwischen Dispatcher, Modi und Render-Pass.

use super::modes::{ModeName, ModeOptions};
use super::notifications::{ActionState, Notification, NotificationLog};
use super::render::OverlaySources;
use super::ui::MapClasses;
use crate::core::{FeatureStore, GeographicBounds, MovementConstraint};
use crate::shared::DrawOptions;

/// Ergebnis eines Dispatch-Aufrufs für den Host.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchOutcome {
    /// Der Host soll das Event nicht an die Karte weiterreichen (z.B. kein Pan).
    pub stop_propagation: bool,
    /// Der Host soll die Browser-/System-Standardaktion unterdrücken.
    pub prevent_default: bool,
}

/// Während eines Handlers angeforderter Moduswechsel.
#[derive(Debug, Clone)]
pub struct ModeRequest {
    pub name: ModeName,
    pub options: ModeOptions,
}

/// Host-Aufrufe, die erst im nächsten Tick angewendet werden.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeferredHostCall {
    DoubleClickZoom(bool),
}

/// Hauptzustand des Overlays
pub struct EditorState {
    /// Alle Features samt Selektion
    pub store: FeatureStore,
    /// Laufzeit-Optionen
    pub options: DrawOptions,
    /// Noch nicht abgeholte Notifications
    pub notifications: NotificationLog,
    /// Vorgemerkte Container-Klassen
    pub map_classes: MapClasses,
    /// Zuletzt gesendete Overlay-Quellen
    pub overlay: OverlaySources,
    pub(crate) constraint: Box<dyn MovementConstraint>,
    pub(crate) deferred: Vec<DeferredHostCall>,
    pub(crate) pending_mode: Option<ModeRequest>,
    pub(crate) outcome: DispatchOutcome,
    actions: ActionState,
    current_mode: ModeName,
    drag_pan_enabled: bool,
}

impl EditorState {
    /// Erstellt einen leeren State mit den gegebenen Optionen.
    pub fn new(options: DrawOptions) -> Self {
        Self {
            store: FeatureStore::new(),
            current_mode: options.default_mode,
            options,
            notifications: NotificationLog::new(),
            map_classes: MapClasses::new(),
            overlay: OverlaySources::default(),
            constraint: Box::new(GeographicBounds),
            deferred: Vec::new(),
            pending_mode: None,
            outcome: DispatchOutcome::default(),
            actions: ActionState::none(),
            drag_pan_enabled: true,
        }
    }

    /// Name des aktiven Modus.
    pub fn current_mode(&self) -> ModeName {
        self.current_mode
    }

    pub(crate) fn set_current_mode(&mut self, mode: ModeName) {
        self.current_mode = mode;
    }

    /// Zuletzt veröffentlichte Aktions-Verfügbarkeit.
    pub fn actions(&self) -> ActionState {
        self.actions
    }

    /// Übernimmt neue Aktions-Flags; meldet nur bei Änderung.
    pub fn set_actionable(&mut self, actions: ActionState) {
        if self.actions != actions {
            self.actions = actions;
            self.notifications
                .record(Notification::Actionable { actions });
        }
    }

    pub fn drag_pan_enabled(&self) -> bool {
        self.drag_pan_enabled
    }

    /// Merkt den Pan-Zustand; `true`, wenn sich etwas geändert hat.
    pub(crate) fn update_drag_pan(&mut self, enabled: bool) -> bool {
        std::mem::replace(&mut self.drag_pan_enabled, enabled) != enabled
    }

    pub(crate) fn take_mode_request(&mut self) -> Option<ModeRequest> {
        self.pending_mode.take()
    }
}
