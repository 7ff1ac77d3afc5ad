//! Roh-Events des Hosts und ihre klassifizierte Form für die Modi.

use crate::core::RenderFeature;
use glam::{DVec2, Vec2};

/// Tastencodes, die der Dispatcher selbst auswertet.
pub mod key_codes {
    pub const BACKSPACE: u32 = 8;
    pub const ENTER: u32 = 13;
    pub const ESCAPE: u32 = 27;
    pub const DELETE: u32 = 46;
    pub const DIGIT_0: u32 = 48;
    pub const DIGIT_1: u32 = 49;
    pub const DIGIT_2: u32 = 50;
    pub const DIGIT_3: u32 = 51;
    pub const DIGIT_9: u32 = 57;
}

/// Bitmaske der primären Maustaste in `PointerEvent::buttons`.
pub const PRIMARY_BUTTON_MASK: u16 = 1;

/// Maus- oder Touch-Event in Screen-Pixeln.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PointerEvent {
    pub point: Vec2,
    /// Kartenkoordinate, falls der Host sie mitliefert; sonst per `MapHost::unproject`.
    pub lng_lat: Option<DVec2>,
    /// Gedrückte Tasten als Bitmaske (1 = primär).
    pub buttons: u16,
    /// Auslösende Taste (0 = primär).
    pub button: u16,
    pub shift_key: bool,
    /// Zeitstempel in Millisekunden.
    pub time_ms: f64,
}

impl PointerEvent {
    pub fn at(point: Vec2, time_ms: f64) -> Self {
        Self {
            point,
            time_ms,
            ..Self::default()
        }
    }

    pub fn with_lng_lat(mut self, lng_lat: DVec2) -> Self {
        self.lng_lat = Some(lng_lat);
        self
    }

    pub fn with_buttons(mut self, buttons: u16) -> Self {
        self.buttons = buttons;
        self
    }

    pub fn with_shift(mut self, shift: bool) -> Self {
        self.shift_key = shift;
        self
    }

    /// Nur die primäre Taste ist gedrückt (Drag-Kandidat).
    pub fn is_primary_held(&self) -> bool {
        self.buttons == PRIMARY_BUTTON_MASK
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyEvent {
    pub key_code: u32,
    pub shift_key: bool,
}

impl KeyEvent {
    pub fn new(key_code: u32) -> Self {
        Self {
            key_code,
            shift_key: false,
        }
    }
}

/// Eingang des Dispatchers: ein Roh-Event mit seinem Host-Eventnamen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    MouseMove(PointerEvent),
    MouseDown(PointerEvent),
    MouseUp(PointerEvent),
    MouseOut(PointerEvent),
    TouchStart(PointerEvent),
    TouchMove(PointerEvent),
    TouchEnd(PointerEvent),
    KeyDown(KeyEvent),
    KeyUp(KeyEvent),
}

/// Ursprüngliches Roh-Event in einem klassifizierten Event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RawEvent {
    Pointer(PointerEvent),
    Key(KeyEvent),
}

/// Event-Arten, an die Modi Handler binden können.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    MouseMove,
    MouseDown,
    MouseUp,
    MouseOut,
    Click,
    Drag,
    TouchStart,
    TouchMove,
    TouchEnd,
    Tap,
    KeyDown,
    KeyUp,
}

/// Event mit Hit-Test-Ziel und Kartenkoordinate, wie es die Modi sehen.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifiedEvent {
    pub kind: EventKind,
    /// Bestes Hit-Test-Ergebnis, `None` über leerer Fläche.
    pub feature_target: Option<RenderFeature>,
    pub original: RawEvent,
    pub point: Vec2,
    pub lng_lat: DVec2,
}

impl ClassifiedEvent {
    pub fn pointer(
        kind: EventKind,
        event: PointerEvent,
        lng_lat: DVec2,
        feature_target: Option<RenderFeature>,
    ) -> Self {
        Self {
            kind,
            feature_target,
            original: RawEvent::Pointer(event),
            point: event.point,
            lng_lat,
        }
    }

    pub fn key(kind: EventKind, event: KeyEvent) -> Self {
        Self {
            kind,
            feature_target: None,
            original: RawEvent::Key(event),
            point: Vec2::ZERO,
            lng_lat: DVec2::ZERO,
        }
    }

    pub fn shift_key(&self) -> bool {
        match self.original {
            RawEvent::Pointer(e) => e.shift_key,
            RawEvent::Key(e) => e.shift_key,
        }
    }

    /// Auslösende Maustaste, `None` bei Tastatur-Events.
    pub fn button(&self) -> Option<u16> {
        match self.original {
            RawEvent::Pointer(e) => Some(e.button),
            RawEvent::Key(_) => None,
        }
    }

    pub fn key_code(&self) -> Option<u32> {
        match self.original {
            RawEvent::Key(e) => Some(e.key_code),
            RawEvent::Pointer(_) => None,
        }
    }
}
