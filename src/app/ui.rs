//! Karten-Klassen (Modus, Feature unter dem Cursor, Cursor-Form).
//!
//! Klassen werden während der Event-Verarbeitung nur vorgemerkt und nach jedem
//! Dispatch als Diff (entfernen / hinzufügen) an den Host übergeben.

use crate::app::modes::ModeName;
use crate::core::MetaKind;

/// Cursor-Formen des Overlays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cursor {
    Drag,
    Move,
    Pointer,
    Add,
    None,
}

impl Cursor {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Drag => "drag",
            Self::Move => "move",
            Self::Pointer => "pointer",
            Self::Add => "add",
            Self::None => "none",
        }
    }
}

/// Änderung der Container-Klassen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassChange {
    pub remove: Vec<String>,
    pub add: Vec<String>,
}

impl ClassChange {
    pub fn is_empty(&self) -> bool {
        self.remove.is_empty() && self.add.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct ClassSet {
    mode: Option<String>,
    feature: Option<String>,
    mouse: Option<String>,
}

/// Vorgemerkte und aktuell angewendete Klassen.
#[derive(Debug, Clone, Default)]
pub struct MapClasses {
    current: ClassSet,
    next: ClassSet,
}

impl MapClasses {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn queue_mode(&mut self, mode: ModeName) {
        self.next.mode = Some(mode.as_str().to_string());
    }

    /// Meta-Art des Features unter dem Cursor, `None` über leerer Fläche.
    pub fn queue_feature(&mut self, meta: Option<MetaKind>) {
        self.next.feature = meta.map(|m| m.as_str().to_string());
    }

    pub fn queue_mouse(&mut self, cursor: Cursor) {
        self.next.mouse = Some(cursor.as_str().to_string());
    }

    /// Aktuell angewendete Cursor-Klasse.
    pub fn current_mouse(&self) -> Option<&str> {
        self.current.mouse.as_deref()
    }

    /// Berechnet den Diff zwischen angewendeten und vorgemerkten Klassen und übernimmt
    /// die vorgemerkten als neuen Stand. `None`, wenn sich nichts geändert hat.
    pub fn update(&mut self) -> Option<ClassChange> {
        let mut change = ClassChange::default();
        for (kind, current, next) in [
            ("mode", &self.current.mode, &self.next.mode),
            ("feature", &self.current.feature, &self.next.feature),
            ("mouse", &self.current.mouse, &self.next.mouse),
        ] {
            if current == next {
                continue;
            }
            if let Some(old) = current {
                change.remove.push(format!("{kind}-{old}"));
            }
            if let Some(new) = next {
                change.add.push(format!("{kind}-{new}"));
            }
        }
        self.current = self.next.clone();
        (!change.is_empty()).then_some(change)
    }
}
