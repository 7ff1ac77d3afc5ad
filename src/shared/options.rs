//! Zentrale Konfiguration des Editier-Overlays.
//!
//! `DrawOptions` enthält alle zur Laufzeit änderbaren Werte.
//! Die `const`-Werte bleiben als Fallback/Default erhalten.

use crate::app::host::OverlaySource;
use crate::app::modes::ModeName;
use crate::input::{ClickTolerance, TapTolerance};
use serde::{Deserialize, Serialize};

// ── Hit-Test ────────────────────────────────────────────────────────

/// Puffer um einen Mausklick in Screen-Pixeln.
pub const CLICK_BUFFER_PX: f32 = 2.0;
/// Puffer um eine Touch-Berührung in Screen-Pixeln.
pub const TOUCH_BUFFER_PX: f32 = 25.0;

/// Basis-IDs der Overlay-Layer; jede existiert als `.cold`- und `.hot`-Variante.
pub const OVERLAY_LAYER_BASE_IDS: &[&str] = &[
    "gl-draw-polygon-fill-inactive",
    "gl-draw-polygon-fill-active",
    "gl-draw-polygon-midpoint",
    "gl-draw-polygon-stroke-inactive",
    "gl-draw-polygon-stroke-active",
    "gl-draw-line-inactive",
    "gl-draw-line-active",
    "gl-draw-polygon-and-line-vertex-stroke-inactive",
    "gl-draw-polygon-and-line-vertex-inactive",
    "gl-draw-point-point-stroke-inactive",
    "gl-draw-point-inactive",
    "gl-draw-point-stroke-active",
    "gl-draw-point-active",
];

// ── Controls ────────────────────────────────────────────────────────

/// Aufgelöste Schalter der Bedien-Controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Controls {
    pub point: bool,
    pub line_string: bool,
    pub polygon: bool,
    pub trash: bool,
    pub combine_features: bool,
    pub uncombine_features: bool,
}

impl Controls {
    /// Alle Controls auf denselben Wert.
    pub fn all(enabled: bool) -> Self {
        Self {
            point: enabled,
            line_string: enabled,
            polygon: enabled,
            trash: enabled,
            combine_features: enabled,
            uncombine_features: enabled,
        }
    }
}

/// Einzeln überschriebene Controls; nicht gesetzte Werte folgen
/// `DrawOptions::display_controls_default`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlOverrides {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub point: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_string: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub polygon: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trash: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub combine_features: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uncombine_features: Option<bool>,
}

impl ControlOverrides {
    fn resolve(&self, default: bool) -> Controls {
        Controls {
            point: self.point.unwrap_or(default),
            line_string: self.line_string.unwrap_or(default),
            polygon: self.polygon.unwrap_or(default),
            trash: self.trash.unwrap_or(default),
            combine_features: self.combine_features.unwrap_or(default),
            uncombine_features: self.uncombine_features.unwrap_or(default),
        }
    }
}

// ── Laufzeit-Optionen (serialisierbar) ─────────────────────────────

/// Alle zur Laufzeit änderbaren Optionen des Overlays.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrawOptions {
    // ── Modi ────────────────────────────────────────────────────
    /// Modus nach dem Start
    #[serde(default = "default_mode")]
    pub default_mode: ModeName,

    // ── Eingabe ─────────────────────────────────────────────────
    /// Tastaturkürzel (Entf/Backspace, 1/2/3) auswerten
    #[serde(default = "default_true")]
    pub keybindings: bool,
    /// Touch-Events auswerten
    #[serde(default = "default_true")]
    pub touch_enabled: bool,
    /// Shift+Drag zieht ein Auswahlrechteck auf
    #[serde(default = "default_true")]
    pub box_select: bool,

    // ── Hit-Test ────────────────────────────────────────────────
    /// Puffer um Mausklicks in Screen-Pixeln
    #[serde(default = "default_click_buffer")]
    pub click_buffer: f32,
    /// Puffer um Touch-Berührungen in Screen-Pixeln
    #[serde(default = "default_touch_buffer")]
    pub touch_buffer: f32,
    /// Layer, auf die sich Hit-Tests beschränken
    #[serde(default = "default_overlay_layers")]
    pub overlay_layers: Vec<String>,

    // ── Controls ────────────────────────────────────────────────
    /// Standardwert für nicht explizit gesetzte Controls
    #[serde(default = "default_true")]
    pub display_controls_default: bool,
    #[serde(default)]
    pub controls: ControlOverrides,

    // ── Gesten ──────────────────────────────────────────────────
    /// Toleranzen für die Klick-Erkennung
    #[serde(default)]
    pub click_tolerance: ClickTolerance,
    /// Toleranzen für die Tap-Erkennung
    #[serde(default)]
    pub tap_tolerance: TapTolerance,
}

impl Default for DrawOptions {
    fn default() -> Self {
        Self {
            default_mode: ModeName::SimpleSelect,
            keybindings: true,
            touch_enabled: true,
            box_select: true,
            click_buffer: CLICK_BUFFER_PX,
            touch_buffer: TOUCH_BUFFER_PX,
            overlay_layers: default_overlay_layers(),
            display_controls_default: true,
            controls: ControlOverrides::default(),
            click_tolerance: ClickTolerance::default(),
            tap_tolerance: TapTolerance::default(),
        }
    }
}

fn default_mode() -> ModeName {
    ModeName::SimpleSelect
}

fn default_true() -> bool {
    true
}

fn default_click_buffer() -> f32 {
    CLICK_BUFFER_PX
}

fn default_touch_buffer() -> f32 {
    TOUCH_BUFFER_PX
}

/// Alle Overlay-Layer-IDs (`.cold` und `.hot` je Basis-ID).
pub fn default_overlay_layers() -> Vec<String> {
    OVERLAY_LAYER_BASE_IDS
        .iter()
        .flat_map(|base| {
            [OverlaySource::Cold, OverlaySource::Hot].map(|source| format!("{base}.{}", source.suffix()))
        })
        .collect()
}

impl DrawOptions {
    /// Aufgelöste Controls unter Berücksichtigung von `display_controls_default`.
    pub fn controls(&self) -> Controls {
        self.controls.resolve(self.display_controls_default)
    }

    /// Parst Optionen aus einem TOML-String.
    pub fn from_toml_str(content: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Lädt Optionen aus einer TOML-Datei. Fällt bei Fehler auf Defaults zurück.
    pub fn load_from_file(path: &std::path::Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => match Self::from_toml_str(&content) {
                Ok(opts) => {
                    log::info!("Optionen geladen aus: {}", path.display());
                    opts
                }
                Err(e) => {
                    log::warn!("Optionen-Datei fehlerhaft, verwende Standardwerte: {}", e);
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("Keine Optionen-Datei gefunden, verwende Standardwerte");
                Self::default()
            }
        }
    }

    /// Speichert Optionen als TOML-Datei.
    pub fn save_to_file(&self, path: &std::path::Path) -> anyhow::Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        log::info!("Optionen gespeichert nach: {}", path.display());
        Ok(())
    }
}
