//! Interaktionsmodi: Zustandsautomat aus sich gegenseitig ausschließenden Modi.
//!
//! Jeder Modus besitzt seinen Aktivierungszustand (`Self`) und baut in `start()`
//! seine Binding-Tabelle auf. Der Dispatcher hält genau einen aktiven Modus als
//! [`ActiveMode`]; vom Host registrierte Modi laufen über [`ModeHandle`].

pub mod bindings;
pub mod context;
pub mod direct_select;
pub mod error;
pub mod simple_select;
pub mod static_mode;

pub use bindings::{selectors, Binding, Bindings, Flow};
pub use context::ModeContext;
pub use direct_select::DirectSelectMode;
pub use error::ModeError;
pub use simple_select::SimpleSelectMode;
pub use static_mode::StaticMode;

use crate::core::{CoordPath, FeatureId, FeatureStore, RenderFeature};
use crate::input::ClassifiedEvent;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Namen aller bekannten Modi.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModeName {
    SimpleSelect,
    DirectSelect,
    Static,
    DrawPoint,
    DrawLineString,
    DrawPolygon,
}

impl ModeName {
    pub const ALL: [ModeName; 6] = [
        Self::SimpleSelect,
        Self::DirectSelect,
        Self::Static,
        Self::DrawPoint,
        Self::DrawLineString,
        Self::DrawPolygon,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::SimpleSelect => "simple_select",
            Self::DirectSelect => "direct_select",
            Self::Static => "static",
            Self::DrawPoint => "draw_point",
            Self::DrawLineString => "draw_line_string",
            Self::DrawPolygon => "draw_polygon",
        }
    }

    /// Eingebaute Modi; Zeichenmodi müssen vom Host registriert werden.
    pub fn is_builtin(self) -> bool {
        matches!(self, Self::SimpleSelect | Self::DirectSelect | Self::Static)
    }
}

impl fmt::Display for ModeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModeName {
    type Err = ModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| ModeError::UnknownMode(s.to_string()))
    }
}

/// Startoptionen eines Modus.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModeOptions {
    /// Vorselektierte Features (Simple Select).
    pub feature_ids: Vec<FeatureId>,
    /// Zu bearbeitendes Feature (Direct Select).
    pub feature_id: Option<FeatureId>,
    /// Vorselektierter Vertex (Direct Select).
    pub coord_path: Option<CoordPath>,
}

impl ModeOptions {
    /// Simple Select mit Vorselektion.
    pub fn select(ids: impl IntoIterator<Item = FeatureId>) -> Self {
        Self {
            feature_ids: ids.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Direct Select auf ein Feature.
    pub fn direct(feature_id: FeatureId) -> Self {
        Self {
            feature_id: Some(feature_id),
            ..Self::default()
        }
    }

    pub fn with_coord_path(mut self, path: CoordPath) -> Self {
        self.coord_path = Some(path);
        self
    }
}

/// Verhalten eines Modus. Der Aktivierungszustand lebt in `Self`.
pub trait InteractionMode: Sized + 'static {
    fn name(&self) -> ModeName;

    /// Initialisiert den Modus und registriert seine Bindings.
    fn start(&mut self, ctx: &mut ModeContext<'_>, bindings: &mut Bindings<Self>);

    /// Räumt auf (Pan wieder freigeben, Selektionen lösen). Bindings verwirft der Aufrufer.
    fn stop(&mut self, _ctx: &mut ModeContext<'_>) {}

    /// Projiziert ein Feature in Render-Features (Körper und ggf. Marker).
    fn render(
        &self,
        ctx: &mut ModeContext<'_>,
        feature: RenderFeature,
        emit: &mut dyn FnMut(RenderFeature),
    );

    fn trash(&mut self, _ctx: &mut ModeContext<'_>) {}

    fn combine_features(&mut self, _ctx: &mut ModeContext<'_>) {}

    fn uncombine_features(&mut self, _ctx: &mut ModeContext<'_>) {}
}

/// Objekt-sichere Sicht auf einen laufenden Modus.
pub trait ModeHandle {
    fn name(&self) -> ModeName;
    fn start(&mut self, ctx: &mut ModeContext<'_>);
    fn stop(&mut self, ctx: &mut ModeContext<'_>);
    /// Leitet ein Event an die Bindings weiter; gibt die Anzahl gefeuerter Handler zurück.
    fn handle(&mut self, ctx: &mut ModeContext<'_>, event: &ClassifiedEvent) -> usize;
    fn render(
        &self,
        ctx: &mut ModeContext<'_>,
        feature: RenderFeature,
        emit: &mut dyn FnMut(RenderFeature),
    );
    fn trash(&mut self, ctx: &mut ModeContext<'_>);
    fn combine_features(&mut self, ctx: &mut ModeContext<'_>);
    fn uncombine_features(&mut self, ctx: &mut ModeContext<'_>);
}

/// Modus samt seiner aktuellen Binding-Tabelle.
pub struct ModeRuntime<M> {
    pub mode: M,
    bindings: Bindings<M>,
}

impl<M: InteractionMode> ModeRuntime<M> {
    pub fn new(mode: M) -> Self {
        Self {
            mode,
            bindings: Bindings::new(),
        }
    }
}

impl<M: InteractionMode> ModeHandle for ModeRuntime<M> {
    fn name(&self) -> ModeName {
        self.mode.name()
    }

    fn start(&mut self, ctx: &mut ModeContext<'_>) {
        let mut bindings = Bindings::new();
        self.mode.start(ctx, &mut bindings);
        log::debug!("Modus {} gestartet ({} Bindings)", self.mode.name(), bindings.len());
        self.bindings = bindings;
    }

    fn stop(&mut self, ctx: &mut ModeContext<'_>) {
        self.mode.stop(ctx);
        self.bindings.clear();
    }

    fn handle(&mut self, ctx: &mut ModeContext<'_>, event: &ClassifiedEvent) -> usize {
        self.bindings.dispatch(event.kind, &mut self.mode, ctx, event)
    }

    fn render(
        &self,
        ctx: &mut ModeContext<'_>,
        feature: RenderFeature,
        emit: &mut dyn FnMut(RenderFeature),
    ) {
        self.mode.render(ctx, feature, emit);
    }

    fn trash(&mut self, ctx: &mut ModeContext<'_>) {
        self.mode.trash(ctx);
    }

    fn combine_features(&mut self, ctx: &mut ModeContext<'_>) {
        self.mode.combine_features(ctx);
    }

    fn uncombine_features(&mut self, ctx: &mut ModeContext<'_>) {
        self.mode.uncombine_features(ctx);
    }
}

/// Konstruktor für vom Host registrierte Modi.
pub type ModeFactory = Box<dyn Fn(&FeatureStore, &ModeOptions) -> Result<Box<dyn ModeHandle>, ModeError>>;

/// Der aktive Modus.
pub enum ActiveMode {
    SimpleSelect(ModeRuntime<SimpleSelectMode>),
    DirectSelect(ModeRuntime<DirectSelectMode>),
    Static(ModeRuntime<StaticMode>),
    Registered(Box<dyn ModeHandle>),
}

impl ActiveMode {
    /// Baut einen eingebauten Modus. `None` für Modi, die registriert werden müssen.
    pub fn builtin(
        name: ModeName,
        store: &FeatureStore,
        options: &ModeOptions,
    ) -> Option<Result<Self, ModeError>> {
        let mode = match name {
            ModeName::SimpleSelect => Ok(Self::SimpleSelect(ModeRuntime::new(
                SimpleSelectMode::new(options),
            ))),
            ModeName::DirectSelect => DirectSelectMode::new(store, options)
                .map(|m| Self::DirectSelect(ModeRuntime::new(m))),
            ModeName::Static => Ok(Self::Static(ModeRuntime::new(StaticMode))),
            _ => return None,
        };
        Some(mode)
    }

    pub fn name(&self) -> ModeName {
        self.as_handle().name()
    }

    pub fn as_handle(&self) -> &dyn ModeHandle {
        match self {
            Self::SimpleSelect(rt) => rt,
            Self::DirectSelect(rt) => rt,
            Self::Static(rt) => rt,
            Self::Registered(handle) => &**handle,
        }
    }

    pub fn as_handle_mut(&mut self) -> &mut dyn ModeHandle {
        match self {
            Self::SimpleSelect(rt) => rt,
            Self::DirectSelect(rt) => rt,
            Self::Static(rt) => rt,
            Self::Registered(handle) => &mut **handle,
        }
    }

    pub fn as_simple_select(&self) -> Option<&SimpleSelectMode> {
        match self {
            Self::SimpleSelect(rt) => Some(&rt.mode),
            _ => None,
        }
    }

    pub fn as_direct_select(&self) -> Option<&DirectSelectMode> {
        match self {
            Self::DirectSelect(rt) => Some(&rt.mode),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_names_roundtrip_through_strings() {
        for mode in ModeName::ALL {
            assert_eq!(mode.as_str().parse::<ModeName>(), Ok(mode));
        }
        assert_eq!(
            "draw_circle".parse::<ModeName>(),
            Err(ModeError::UnknownMode("draw_circle".into()))
        );
    }

    #[test]
    fn draw_modes_are_not_builtin() {
        let store = FeatureStore::new();
        assert!(ActiveMode::builtin(ModeName::DrawPolygon, &store, &ModeOptions::default()).is_none());
        let simple = ActiveMode::builtin(ModeName::SimpleSelect, &store, &ModeOptions::default())
            .expect("eingebaut")
            .expect("ohne Optionen konstruierbar");
        assert_eq!(simple.name(), ModeName::SimpleSelect);
    }

    #[test]
    fn direct_select_requires_feature_id() {
        let store = FeatureStore::new();
        let result = ActiveMode::builtin(ModeName::DirectSelect, &store, &ModeOptions::default())
            .expect("eingebaut");
        assert!(matches!(
            result,
            Err(ModeError::MissingOption {
                option: "feature_id",
                ..
            })
        ));
    }
}
