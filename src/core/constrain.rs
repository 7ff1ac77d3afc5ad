//! Bewegungsbeschränkung für Verschiebungen von Features und Vertices.

use super::Geometry;
use glam::DVec2;

/// Maximaler Betrag der Breite.
pub const LAT_LIMIT: f64 = 90.0;
/// Maximaler Betrag der Länge (erlaubt Verschiebungen über die Datumsgrenze hinaus).
pub const LNG_LIMIT: f64 = 270.0;

/// Begrenzt ein gewünschtes Delta, bevor es auf Geometrien angewendet wird.
pub trait MovementConstraint {
    /// Liefert das tatsächlich anzuwendende Delta für alle `geometries` gemeinsam.
    fn constrain(&self, geometries: &[&Geometry], delta: DVec2) -> DVec2;
}

/// Hält alle Positionen innerhalb gültiger geographischer Grenzen.
#[derive(Debug, Clone, Copy, Default)]
pub struct GeographicBounds;

impl MovementConstraint for GeographicBounds {
    fn constrain(&self, geometries: &[&Geometry], delta: DVec2) -> DVec2 {
        let Some((min, max)) = geometries
            .iter()
            .filter_map(|g| g.extent())
            .reduce(|(amin, amax), (bmin, bmax)| (amin.min(bmin), amax.max(bmax)))
        else {
            return delta;
        };

        DVec2::new(
            clamp_axis(min.x, max.x, delta.x, LNG_LIMIT),
            clamp_axis(min.y, max.y, delta.y, LAT_LIMIT),
        )
    }
}

/// Keine Beschränkung.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unconstrained;

impl MovementConstraint for Unconstrained {
    fn constrain(&self, _geometries: &[&Geometry], delta: DVec2) -> DVec2 {
        delta
    }
}

impl<F> MovementConstraint for F
where
    F: Fn(&[&Geometry], DVec2) -> DVec2,
{
    fn constrain(&self, geometries: &[&Geometry], delta: DVec2) -> DVec2 {
        self(geometries, delta)
    }
}

fn clamp_axis(min: f64, max: f64, delta: f64, limit: f64) -> f64 {
    if max + delta > limit {
        limit - max
    } else if min + delta < -limit {
        -limit - min
    } else {
        delta
    }
}
