//! Application-Layer: Dispatcher, Modi, State, Hit-Test, Render-Pass und Use-Cases.

pub mod dispatcher;
pub mod host;
pub mod modes;
pub mod notifications;
pub mod render;
/// Editor-State
///
/// Zentrale Datenhaltung (Store, Optionen, Notifications, Klassen) zwischen den Modi.
pub mod state;
pub mod ui;
pub mod use_cases;

pub use dispatcher::ModeDispatcher;
pub use hit_test::{features_at, features_at_click, features_at_touch, sort_features, HitQuery};
pub use host::{MapHost, OverlaySource, ScreenBox};
pub use modes::{
    ActiveMode, DirectSelectMode, InteractionMode, ModeContext, ModeError, ModeHandle, ModeName,
    ModeOptions, SimpleSelectMode, StaticMode,
};
pub use render::OverlaySources;
pub use notifications::{ActionState, Notification, NotificationLog, UpdateAction};
pub use state::{DispatchOutcome, EditorState};
pub use ui::{ClassChange, Cursor, MapClasses};
