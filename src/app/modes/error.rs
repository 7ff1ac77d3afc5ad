//! Fehler beim Auflösen und Starten von Modi.

use super::ModeName;
use crate::core::FeatureId;

/// Verdrahtungsfehler: unbekannter Modus, fehlende Option, falscher Geometrietyp.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModeError {
    #[error("Unbekannter Modus: '{0}'")]
    UnknownMode(String),
    #[error("Modus {mode} benötigt die Option `{option}`")]
    MissingOption {
        mode: ModeName,
        option: &'static str,
    },
    #[error("Feature {0} existiert nicht")]
    FeatureNotFound(FeatureId),
    #[error("direct_select unterstützt keine Punkt-Features ({0})")]
    PointNotSupported(FeatureId),
}
