//! Binding-Tabelle eines Modus: geordnete (Event-Art, Prädikat, Handler)-Einträge.
//!
//! Für ein Event werden alle Einträge der passenden Art in Registrierungsreihenfolge
//! geprüft; jeder Eintrag mit erfülltem Prädikat feuert. Ein Handler beendet den
//! Durchlauf mit `Flow::Halt`, ein angeforderter Moduswechsel ebenso.

use super::context::ModeContext;
use crate::core::MetaKind;
use crate::input::{ClassifiedEvent, EventKind};

/// Steuerung des Binding-Durchlaufs nach einem Handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Halt,
}

pub type Predicate<M> = fn(&M, &ModeContext<'_>, &ClassifiedEvent) -> bool;
pub type Handler<M> = fn(&mut M, &mut ModeContext<'_>, &ClassifiedEvent) -> Flow;

/// Ein Eintrag der Binding-Tabelle.
pub struct Binding<M> {
    pub kind: EventKind,
    pub predicate: Predicate<M>,
    pub handler: Handler<M>,
}

impl<M> Clone for Binding<M> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<M> Copy for Binding<M> {}

/// Geordnete Binding-Tabelle, aufgebaut in `start()` und verworfen in `stop()`.
pub struct Bindings<M> {
    entries: Vec<Binding<M>>,
}

impl<M> Default for Bindings<M> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<M> Bindings<M> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registriert einen Eintrag am Ende der Tabelle.
    pub fn on(&mut self, kind: EventKind, predicate: Predicate<M>, handler: Handler<M>) -> &mut Self {
        self.entries.push(Binding {
            kind,
            predicate,
            handler,
        });
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Führt alle passenden Einträge aus. Gibt die Anzahl gefeuerter Handler zurück.
    pub fn dispatch(
        &self,
        kind: EventKind,
        mode: &mut M,
        ctx: &mut ModeContext<'_>,
        event: &ClassifiedEvent,
    ) -> usize {
        let mut fired = 0;
        for binding in self.entries.iter().filter(|b| b.kind == kind) {
            if !(binding.predicate)(mode, ctx, event) {
                continue;
            }
            fired += 1;
            let flow = (binding.handler)(mode, ctx, event);
            if flow == Flow::Halt || ctx.has_pending_mode_change() {
                break;
            }
        }
        fired
    }
}

/// Wiederverwendbare Prädikate über klassifizierte Events.
pub mod selectors {
    use super::*;

    pub fn always<M>(_mode: &M, _ctx: &ModeContext<'_>, _event: &ClassifiedEvent) -> bool {
        true
    }

    /// Kein Hit-Test-Ziel (leere Fläche).
    pub fn no_target<M>(_mode: &M, _ctx: &ModeContext<'_>, event: &ClassifiedEvent) -> bool {
        event.feature_target.is_none()
    }

    fn target_meta(event: &ClassifiedEvent) -> Option<MetaKind> {
        event.feature_target.as_ref().map(|t| t.meta)
    }

    pub fn is_vertex<M>(_mode: &M, _ctx: &ModeContext<'_>, event: &ClassifiedEvent) -> bool {
        target_meta(event) == Some(MetaKind::Vertex)
    }

    pub fn is_midpoint<M>(_mode: &M, _ctx: &ModeContext<'_>, event: &ClassifiedEvent) -> bool {
        target_meta(event) == Some(MetaKind::Midpoint)
    }

    /// Vertex oder Midpoint.
    pub fn is_of_meta_marker<M>(mode: &M, ctx: &ModeContext<'_>, event: &ClassifiedEvent) -> bool {
        is_vertex(mode, ctx, event) || is_midpoint(mode, ctx, event)
    }

    /// Beliebiger Feature-Körper.
    pub fn is_feature<M>(_mode: &M, _ctx: &ModeContext<'_>, event: &ClassifiedEvent) -> bool {
        target_meta(event) == Some(MetaKind::Feature)
    }

    /// Aktiver (selektierter) Feature-Körper.
    pub fn is_active_feature<M>(_mode: &M, _ctx: &ModeContext<'_>, event: &ClassifiedEvent) -> bool {
        event
            .feature_target
            .as_ref()
            .is_some_and(|t| t.meta == MetaKind::Feature && t.active)
    }

    /// Inaktiver Feature-Körper.
    pub fn is_inactive_feature<M>(_mode: &M, _ctx: &ModeContext<'_>, event: &ClassifiedEvent) -> bool {
        event
            .feature_target
            .as_ref()
            .is_some_and(|t| t.meta == MetaKind::Feature && !t.active)
    }

    /// Shift + primäre Taste beim Drücken.
    pub fn is_shift_mousedown<M>(_mode: &M, _ctx: &ModeContext<'_>, event: &ClassifiedEvent) -> bool {
        event.shift_key() && event.button() == Some(0)
    }
}
