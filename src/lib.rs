//! Map Draw Core Library.
//! Interaktionskern eines Karten-Editier-Overlays als Library für Hosts und Tests.

pub mod app;
pub mod core;
pub mod input;
pub mod shared;

pub use app::{
    ActionState, DispatchOutcome, MapHost, ModeDispatcher, ModeError, ModeName, ModeOptions,
    Notification, OverlaySource, ScreenBox,
};
pub use core::{
    CoordPath, Feature, FeatureId, FeatureStore, GeographicBounds, Geometry, GeometryType,
    MetaKind, MovementConstraint, QueriedFeature, RenderFeature,
};
pub use input::{InputEvent, KeyEvent, PointerEvent};
pub use shared::DrawOptions;
