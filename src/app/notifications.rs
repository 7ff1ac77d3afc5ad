//! Notifications an den Host und begrenztes Notification-Log.

use crate::app::modes::ModeName;
use serde::Serialize;
use serde_json::Value;

/// Verfügbarkeit der Bedien-Aktionen (Trash, Combine, Uncombine).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ActionState {
    pub trash: bool,
    pub combine_features: bool,
    pub uncombine_features: bool,
}

impl ActionState {
    /// Alle Aktionen deaktiviert.
    pub fn none() -> Self {
        Self::default()
    }
}

/// Art einer Geometrie-Aktualisierung.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdateAction {
    /// Ganze Features wurden verschoben.
    Move,
    /// Einzelne Koordinaten wurden geändert, eingefügt oder entfernt.
    ChangeCoordinates,
}

/// Ereignisse, die der Kern nach außen meldet. Payloads sind GeoJSON.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Notification {
    ModeChange {
        mode: ModeName,
    },
    SelectionChange {
        features: Vec<Value>,
        points: Vec<Value>,
    },
    Update {
        action: UpdateAction,
        features: Vec<Value>,
    },
    Combine {
        created_features: Vec<Value>,
        deleted_features: Vec<Value>,
    },
    Uncombine {
        created_features: Vec<Value>,
        deleted_features: Vec<Value>,
    },
    Delete {
        features: Vec<Value>,
    },
    Actionable {
        actions: ActionState,
    },
    Render,
}

impl Notification {
    /// Eventname im Namensraum des Overlays (`draw.*`).
    pub fn event_name(&self) -> &'static str {
        match self {
            Self::ModeChange { .. } => "draw.modechange",
            Self::SelectionChange { .. } => "draw.selectionchange",
            Self::Update { .. } => "draw.update",
            Self::Combine { .. } => "draw.combine",
            Self::Uncombine { .. } => "draw.uncombine",
            Self::Delete { .. } => "draw.delete",
            Self::Actionable { .. } => "draw.actionable",
            Self::Render => "draw.render",
        }
    }
}

/// Speichert Notifications in Reihenfolge, bis der Host sie abholt.
#[derive(Debug, Default)]
pub struct NotificationLog {
    entries: Vec<Notification>,
}

impl NotificationLog {
    const MAX_ENTRIES: usize = 1000;
}

impl NotificationLog {
    /// Erstellt ein leeres Log.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Fügt eine Notification hinzu.
    /// Begrenzt auf MAX_ENTRIES, ältere Einträge werden verworfen.
    pub fn record(&mut self, notification: Notification) {
        if self.entries.len() >= Self::MAX_ENTRIES {
            log::warn!(
                "Notification-Log voll, verwerfe {} alte Einträge",
                Self::MAX_ENTRIES / 2
            );
            self.entries.drain(..Self::MAX_ENTRIES / 2);
        }
        log::debug!("Notification: {}", notification.event_name());
        self.entries.push(notification);
    }

    /// Anzahl der gespeicherten Einträge.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Gibt `true` zurück, wenn keine Einträge vorhanden sind.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Liefert alle gespeicherten Einträge.
    pub fn entries(&self) -> &[Notification] {
        &self.entries
    }

    /// Entnimmt alle Einträge; das Log ist danach leer.
    pub fn drain(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_and_drain() {
        let mut log = NotificationLog::new();
        assert!(log.is_empty());

        log.record(Notification::Render);
        log.record(Notification::ModeChange {
            mode: ModeName::Static,
        });

        assert_eq!(log.len(), 2);
        assert_eq!(log.drain().len(), 2);
        assert!(log.is_empty());
    }

    #[test]
    fn test_log_is_bounded() {
        let mut log = NotificationLog::new();
        for _ in 0..(NotificationLog::MAX_ENTRIES + 1) {
            log.record(Notification::Render);
        }
        assert_eq!(log.len(), NotificationLog::MAX_ENTRIES / 2 + 1);
    }

    #[test]
    fn serializes_with_type_tag() {
        let json = serde_json::to_value(Notification::Update {
            action: UpdateAction::ChangeCoordinates,
            features: vec![],
        })
        .expect("serialisierbar");
        assert_eq!(json["type"], "update");
        assert_eq!(json["action"], "change_coordinates");

        let json = serde_json::to_value(Notification::Actionable {
            actions: ActionState {
                trash: true,
                ..ActionState::none()
            },
        })
        .expect("serialisierbar");
        assert_eq!(json["actions"]["trash"], true);
    }
}
