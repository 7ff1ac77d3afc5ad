//! Core-Domänentypen: Features, Geometrien, Koordinatenpfade, Store und Hilfsgeometrie.

pub mod constrain;
pub mod coord_path;
pub mod feature;
pub mod geometry;
pub mod render_feature;
pub mod store;
pub mod supplementary;

pub use constrain::{GeographicBounds, MovementConstraint, Unconstrained};
pub use coord_path::{CoordPath, ParseCoordPathError};
pub use feature::{Feature, FeatureId};
pub use geometry::{Geometry, GeometryType};
pub use render_feature::{HitKey, MetaKind, QueriedFeature, RenderFeature};
pub use store::{DeleteMode, FeatureStore, SelectedCoordinate};
pub use supplementary::{supplementary_points, SupplementaryOptions};
