//! Geteilte Typen für schichtübergreifende Verträge.
//!
//! Enthält die Konfiguration, die von `app` (Dispatcher, Modi, Hit-Test)
//! und vom Host gemeinsam genutzt wird.
pub mod options;

pub use options::{
    default_overlay_layers, ControlOverrides, Controls, DrawOptions, CLICK_BUFFER_PX,
    TOUCH_BUFFER_PX,
};
