//! Gesten-Klassifikation: Klick vs. Drag, Tap vs. Wischen.
//!
//! Alle Grenzen sind strikt (`<`): ein Abstand von genau 4px ist kein feiner Klick mehr.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Feine Klick-Toleranz in Pixeln (unabhängig von der Zeit).
pub const CLICK_FINE_TOLERANCE_PX: f32 = 4.0;
/// Grobe Klick-Toleranz in Pixeln (nur innerhalb des Intervalls).
pub const CLICK_GROSS_TOLERANCE_PX: f32 = 12.0;
/// Zeitfenster für die grobe Klick-Toleranz.
pub const CLICK_INTERVAL_MS: f64 = 500.0;
/// Tap-Toleranz in Pixeln.
pub const TAP_TOLERANCE_PX: f32 = 25.0;
/// Zeitfenster eines Taps.
pub const TAP_INTERVAL_MS: f64 = 250.0;

/// Zustand beim Drücken (Mouse-Down / Touch-Start).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PressInfo {
    pub point: Option<Vec2>,
    pub time_ms: Option<f64>,
}

impl PressInfo {
    pub fn new(point: Vec2, time_ms: f64) -> Self {
        Self {
            point: Some(point),
            time_ms: Some(time_ms),
        }
    }
}

/// Zustand beim Loslassen bzw. aktuellen Bewegen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureSample {
    pub point: Vec2,
    pub time_ms: f64,
}

impl GestureSample {
    pub fn new(point: Vec2, time_ms: f64) -> Self {
        Self { point, time_ms }
    }
}

/// Klick-Toleranzen.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClickTolerance {
    #[serde(default = "default_click_fine")]
    pub fine: f32,
    #[serde(default = "default_click_gross")]
    pub gross: f32,
    #[serde(default = "default_click_interval")]
    pub interval_ms: f64,
}

impl Default for ClickTolerance {
    fn default() -> Self {
        Self {
            fine: CLICK_FINE_TOLERANCE_PX,
            gross: CLICK_GROSS_TOLERANCE_PX,
            interval_ms: CLICK_INTERVAL_MS,
        }
    }
}

/// Tap-Toleranzen.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TapTolerance {
    #[serde(default = "default_tap_tolerance")]
    pub tolerance: f32,
    #[serde(default = "default_tap_interval")]
    pub interval_ms: f64,
}

impl Default for TapTolerance {
    fn default() -> Self {
        Self {
            tolerance: TAP_TOLERANCE_PX,
            interval_ms: TAP_INTERVAL_MS,
        }
    }
}

fn default_click_fine() -> f32 {
    CLICK_FINE_TOLERANCE_PX
}

fn default_click_gross() -> f32 {
    CLICK_GROSS_TOLERANCE_PX
}

fn default_click_interval() -> f64 {
    CLICK_INTERVAL_MS
}

fn default_tap_tolerance() -> f32 {
    TAP_TOLERANCE_PX
}

fn default_tap_interval() -> f64 {
    TAP_INTERVAL_MS
}

/// Fehlende Werte des Start-Records werden vom End-Record übernommen.
fn distance_and_elapsed(start: &PressInfo, end: GestureSample) -> (f32, f64) {
    let start_point = start.point.unwrap_or(end.point);
    let start_time = start.time_ms.unwrap_or(end.time_ms);
    (
        start_point.distance(end.point),
        end.time_ms - start_time,
    )
}

/// Klassifiziert eine Maus-Geste als Klick.
pub fn is_click(start: &PressInfo, end: GestureSample, tolerance: &ClickTolerance) -> bool {
    let (distance, elapsed) = distance_and_elapsed(start, end);
    distance < tolerance.fine || (distance < tolerance.gross && elapsed < tolerance.interval_ms)
}

/// Klassifiziert eine Touch-Geste als Tap.
pub fn is_tap(start: &PressInfo, end: GestureSample, tolerance: &TapTolerance) -> bool {
    let (distance, elapsed) = distance_and_elapsed(start, end);
    distance < tolerance.tolerance && elapsed < tolerance.interval_ms
}
