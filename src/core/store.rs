//! Feature-Store: Features, Selektion, selektierte Koordinaten und Änderungsverfolgung.
//!
//! Der Store ist der einzige geteilte, veränderliche Zustand. Modi lesen und
//! verändern ihn über den `ModeContext`; der Render-Pass liest die gesammelten
//! Änderungen aus und setzt sie danach zurück.

use super::{CoordPath, Feature, FeatureId};
use glam::DVec2;
use indexmap::{IndexMap, IndexSet};

/// Eine selektierte Koordinate (Direct Select).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SelectedCoordinate {
    pub feature_id: FeatureId,
    pub coord_path: CoordPath,
}

/// Steuert, ob gelöschte Features im nächsten Render-Pass gemeldet werden.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteMode {
    /// Löschung wird als `Delete`-Notification gemeldet.
    Notify,
    /// Stille Löschung (z.B. beim Combine, das eigene Notifications sendet).
    Silent,
}

/// In-Memory-Speicher aller editierbaren Features (Einfügereihenfolge bleibt erhalten).
#[derive(Debug, Default)]
pub struct FeatureStore {
    features: IndexMap<FeatureId, Feature>,
    selected: IndexSet<FeatureId>,
    selected_coordinates: Vec<SelectedCoordinate>,
    changed: IndexSet<FeatureId>,
    deleted: Vec<Feature>,
    dirty: bool,
    selection_changed: bool,
}

impl FeatureStore {
    /// Erstellt einen leeren Store.
    pub fn new() -> Self {
        Self::default()
    }

    // ── Features ────────────────────────────────────────────────────

    /// Fügt ein Feature hinzu (ersetzt ein vorhandenes mit gleicher ID).
    pub fn add(&mut self, feature: Feature) -> FeatureId {
        let id = feature.id.clone();
        self.features.insert(id.clone(), feature);
        self.changed.insert(id.clone());
        id
    }

    pub fn get(&self, id: &FeatureId) -> Option<&Feature> {
        self.features.get(id)
    }

    /// Mutabler Zugriff; das Feature gilt danach als geändert.
    pub fn get_mut(&mut self, id: &FeatureId) -> Option<&mut Feature> {
        let feature = self.features.get_mut(id)?;
        self.changed.insert(id.clone());
        Some(feature)
    }

    pub fn contains(&self, id: &FeatureId) -> bool {
        self.features.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Alle IDs in Einfügereihenfolge.
    pub fn ids(&self) -> Vec<FeatureId> {
        self.features.keys().cloned().collect()
    }

    pub fn features(&self) -> impl Iterator<Item = &Feature> {
        self.features.values()
    }

    /// Löscht Features samt ihrer Selektion. Gibt die entfernten Features zurück.
    pub fn delete(&mut self, ids: &[FeatureId], mode: DeleteMode) -> Vec<Feature> {
        let mut removed = Vec::new();
        for id in ids {
            let Some(feature) = self.features.shift_remove(id) else {
                continue;
            };
            if self.selected.shift_remove(id) {
                self.selection_changed = true;
            }
            let before = self.selected_coordinates.len();
            self.selected_coordinates.retain(|c| &c.feature_id != id);
            if self.selected_coordinates.len() != before {
                self.selection_changed = true;
            }
            self.changed.shift_remove(id);
            removed.push(feature);
        }

        if !removed.is_empty() {
            self.dirty = true;
            log::info!("{} Feature(s) gelöscht", removed.len());
            if mode == DeleteMode::Notify {
                self.deleted.extend(removed.iter().cloned());
            }
        }
        removed
    }

    // ── Selektion ───────────────────────────────────────────────────

    /// Selektierte IDs in Selektionsreihenfolge.
    pub fn selected_ids(&self) -> Vec<FeatureId> {
        self.selected.iter().cloned().collect()
    }

    pub fn selected_features(&self) -> Vec<&Feature> {
        self.selected
            .iter()
            .filter_map(|id| self.features.get(id))
            .collect()
    }

    pub fn is_selected(&self, id: &FeatureId) -> bool {
        self.selected.contains(id)
    }

    /// Fügt existierende Features zur Selektion hinzu.
    pub fn select(&mut self, ids: &[FeatureId]) {
        for id in ids {
            if self.features.contains_key(id) && self.selected.insert(id.clone()) {
                self.changed.insert(id.clone());
                self.selection_changed = true;
            }
        }
    }

    pub fn deselect(&mut self, id: &FeatureId) {
        if self.selected.shift_remove(id) {
            self.changed.insert(id.clone());
            self.selection_changed = true;
        }
    }

    /// Ersetzt die Selektion vollständig.
    pub fn set_selected(&mut self, ids: &[FeatureId]) {
        let stale: Vec<FeatureId> = self
            .selected
            .iter()
            .filter(|id| !ids.contains(*id))
            .cloned()
            .collect();
        for id in &stale {
            self.deselect(id);
        }
        self.select(ids);
    }

    pub fn clear_selected(&mut self) {
        let ids = self.selected_ids();
        for id in &ids {
            self.deselect(id);
        }
    }

    // ── Selektierte Koordinaten ─────────────────────────────────────

    pub fn selected_coordinates(&self) -> &[SelectedCoordinate] {
        &self.selected_coordinates
    }

    /// Positionen aller selektierten Koordinaten (ungültige Pfade werden übersprungen).
    pub fn selected_coordinate_positions(&self) -> Vec<DVec2> {
        self.selected_coordinates
            .iter()
            .filter_map(|c| {
                self.features
                    .get(&c.feature_id)?
                    .geometry
                    .get_coordinate(&c.coord_path)
            })
            .collect()
    }

    pub fn set_selected_coordinates(&mut self, coordinates: Vec<SelectedCoordinate>) {
        if self.selected_coordinates != coordinates {
            self.selected_coordinates = coordinates;
            self.selection_changed = true;
        }
    }

    pub fn clear_selected_coordinates(&mut self) {
        self.set_selected_coordinates(Vec::new());
    }

    // ── Änderungsverfolgung ─────────────────────────────────────────

    /// Markiert ein Feature als geändert (erzwingt Neuzeichnen im nächsten Pass).
    pub fn feature_changed(&mut self, id: &FeatureId) {
        if self.features.contains_key(id) {
            self.changed.insert(id.clone());
        }
    }

    pub fn set_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn changed_ids(&self) -> Vec<FeatureId> {
        self.changed.iter().cloned().collect()
    }

    /// `true`, wenn seit dem letzten Render-Pass etwas zu zeichnen oder zu melden ist.
    pub fn needs_render(&self) -> bool {
        self.dirty || !self.changed.is_empty() || self.selection_changed || !self.deleted.is_empty()
    }

    /// Liest und quittiert die Selektionsänderung seit dem letzten Pass.
    pub fn take_selection_changed(&mut self) -> bool {
        std::mem::take(&mut self.selection_changed)
    }

    /// Liest und quittiert die zu meldenden Löschungen.
    pub fn take_deleted(&mut self) -> Vec<Feature> {
        std::mem::take(&mut self.deleted)
    }

    /// Setzt Dirty-Flag und Änderungsmenge nach einem Render-Pass zurück.
    pub fn clear_changes(&mut self) {
        self.dirty = false;
        self.changed.clear();
    }
}
