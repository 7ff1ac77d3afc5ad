//! Schnittstelle zum Karten-Viewer (Host).
//!
//! Der Host übernimmt Projektion, Rendering und Kartennavigation. Der Kern
//! fragt ihn nach gezeichneten Features in einem Pixel-Rechteck ab und schaltet
//! Pan / Doppelklick-Zoom während Editier-Gesten.

use crate::app::ui::ClassChange;
use crate::core::{QueriedFeature, RenderFeature};
use glam::{DVec2, Vec2};

/// Achsenparalleles Rechteck in Screen-Pixeln.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenBox {
    pub min: Vec2,
    pub max: Vec2,
}

impl ScreenBox {
    /// Rechteck aus zwei beliebigen Ecken.
    pub fn from_corners(a: Vec2, b: Vec2) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Quadrat um `center` mit halber Kantenlänge `buffer`.
    pub fn around(center: Vec2, buffer: f32) -> Self {
        let half = Vec2::splat(buffer);
        Self {
            min: center - half,
            max: center + half,
        }
    }

    pub fn contains(&self, point: Vec2) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }

    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }
}

/// Ziel-Quelle der Overlay-Daten.
///
/// `Hot` enthält nur die im letzten Pass geänderten Features (z.B. das gerade
/// gezogene), `Cold` den ruhenden Rest. Der Host zeichnet beide übereinander.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OverlaySource {
    Cold,
    Hot,
}

impl OverlaySource {
    /// Suffix der zugehörigen Layer-IDs.
    pub fn suffix(self) -> &'static str {
        match self {
            Self::Cold => "cold",
            Self::Hot => "hot",
        }
    }
}

/// Karten-Viewer, in dessen Overlay editiert wird.
pub trait MapHost {
    /// `false`, solange der Viewer nicht bereit ist; Hit-Tests liefern dann nichts.
    fn is_attached(&self) -> bool {
        true
    }

    /// Gezeichnete Features im Rechteck, beschränkt auf `layers`.
    fn query_rendered_features(&self, bbox: ScreenBox, layers: &[String]) -> Vec<QueriedFeature>;

    /// Kartenkoordinate eines Screen-Punkts.
    fn unproject(&self, point: Vec2) -> DVec2;

    fn set_drag_pan(&mut self, enabled: bool);

    fn set_double_click_zoom(&mut self, enabled: bool);

    /// Ersetzt den Inhalt einer Overlay-Quelle. `Cold` wird nur bei Änderung gesendet.
    fn set_overlay_data(&mut self, _source: OverlaySource, _features: &[RenderFeature]) {}

    /// CSS-artige Klassen des Karten-Containers (Modus, Feature, Cursor).
    fn apply_map_classes(&mut self, _change: &ClassChange) {}
}
