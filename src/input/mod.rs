//! Eingabe-Schicht: Roh-Events, klassifizierte Events und Gesten-Erkennung.

pub mod event;
pub mod gesture;

pub use event::{
    key_codes, ClassifiedEvent, EventKind, InputEvent, KeyEvent, PointerEvent, RawEvent,
    PRIMARY_BUTTON_MASK,
};
pub use gesture::{is_click, is_tap, ClickTolerance, GestureSample, PressInfo, TapTolerance};
