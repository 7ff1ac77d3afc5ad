//! Mode-Dispatcher: einziger Einstiegspunkt des Hosts.
//!
//! Normalisiert Roh-Events (Hit-Test-Ziel, Drag- vs. Klick-Erkennung), leitet sie
//! an den aktiven Modus weiter, führt angeforderte Moduswechsel aus und stößt
//! danach den Render-Pass an.

use super::hit_test::{self, HitQuery};
use super::host::{MapHost, ScreenBox};
use super::modes::{
    ActiveMode, InteractionMode, ModeContext, ModeError, ModeFactory, ModeHandle, ModeName,
    ModeOptions, ModeRuntime, StaticMode,
};
use super::notifications::{ActionState, Notification};
use super::render;
use super::state::{DeferredHostCall, DispatchOutcome, EditorState};
use super::ui::Cursor;
use crate::core::{FeatureStore, MovementConstraint, RenderFeature};
use crate::input::{
    is_click, is_tap, key_codes, ClassifiedEvent, EventKind, GestureSample, InputEvent, KeyEvent,
    PointerEvent, PressInfo,
};
use crate::shared::DrawOptions;
use glam::DVec2;
use indexmap::IndexMap;

/// Obergrenze verketteter Moduswechsel pro Zyklus (Schutz vor Start-Schleifen).
const MAX_CHAINED_MODE_CHANGES: usize = 16;

/// Besitzt Host, Editor-State und den aktiven Modus.
pub struct ModeDispatcher<H: MapHost> {
    host: H,
    state: EditorState,
    mode: ActiveMode,
    registry: IndexMap<ModeName, ModeFactory>,
    mouse_down: PressInfo,
    touch_start: PressInfo,
}

impl<H: MapHost> ModeDispatcher<H> {
    /// Erstellt den Dispatcher und startet den Standardmodus (still).
    pub fn new(host: H, options: DrawOptions) -> anyhow::Result<Self> {
        let default_mode = options.default_mode;
        let mut dispatcher = Self {
            host,
            state: EditorState::new(options),
            mode: ActiveMode::Static(ModeRuntime::new(StaticMode)),
            registry: IndexMap::new(),
            mouse_down: PressInfo::default(),
            touch_start: PressInfo::default(),
        };
        dispatcher.change_mode(default_mode, ModeOptions::default(), true)?;
        Ok(dispatcher)
    }

    // ── Zugriff ─────────────────────────────────────────────────────

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn store(&self) -> &FeatureStore {
        &self.state.store
    }

    /// Direkter Store-Zugriff; Änderungen werden beim nächsten Zyklus gerendert.
    pub fn store_mut(&mut self) -> &mut FeatureStore {
        &mut self.state.store
    }

    pub fn state(&self) -> &EditorState {
        &self.state
    }

    pub fn mode(&self) -> &ActiveMode {
        &self.mode
    }

    pub fn current_mode_name(&self) -> ModeName {
        self.state.current_mode()
    }

    pub fn actions(&self) -> ActionState {
        self.state.actions()
    }

    /// Ersetzt die Bewegungsbeschränkung für Drag-Operationen.
    pub fn set_constraint(&mut self, constraint: impl MovementConstraint + 'static) {
        self.state.constraint = Box::new(constraint);
    }

    /// Aktuelles Box-Select-Rechteck (nur in Simple Select während eines Box-Drags).
    pub fn box_select_overlay(&self) -> Option<ScreenBox> {
        self.mode
            .as_simple_select()
            .and_then(|mode| mode.box_select_overlay())
    }

    // ── Modi ────────────────────────────────────────────────────────

    /// Registriert einen vom Host bereitgestellten Modus (z.B. Zeichenmodi).
    pub fn register_mode(
        &mut self,
        name: ModeName,
        factory: impl Fn(&FeatureStore, &ModeOptions) -> Result<Box<dyn ModeHandle>, ModeError>
            + 'static,
    ) {
        log::debug!("Modus {} registriert", name);
        self.registry.insert(name, Box::new(factory));
    }

    /// Registriert einen Modus, der [`InteractionMode`] implementiert.
    pub fn register_interaction_mode<M, F>(&mut self, name: ModeName, build: F)
    where
        M: InteractionMode,
        F: Fn(&FeatureStore, &ModeOptions) -> Result<M, ModeError> + 'static,
    {
        self.register_mode(name, move |store, options| {
            let mode = build(store, options)?;
            Ok(Box::new(ModeRuntime::new(mode)) as Box<dyn ModeHandle>)
        });
    }

    /// Wechselt den Modus: neuen Modus bauen, alten stoppen, neuen starten.
    ///
    /// Schlägt die Konstruktion fehl, bleibt der bisherige Modus aktiv und der
    /// Fehler ([`ModeError`]) wird an den Aufrufer gegeben.
    pub fn change_mode(
        &mut self,
        name: ModeName,
        options: ModeOptions,
        silent: bool,
    ) -> anyhow::Result<()> {
        self.switch_mode(name, options, silent)?;
        self.finish_cycle()
    }

    /// Wie [`Self::change_mode`], mit Modusname als String.
    pub fn change_mode_by_name(
        &mut self,
        name: &str,
        options: ModeOptions,
        silent: bool,
    ) -> anyhow::Result<()> {
        let name: ModeName = name.parse()?;
        self.change_mode(name, options, silent)
    }

    fn construct_mode(&self, name: ModeName, options: &ModeOptions) -> Result<ActiveMode, ModeError> {
        if let Some(factory) = self.registry.get(&name) {
            return factory(&self.state.store, options).map(ActiveMode::Registered);
        }
        ActiveMode::builtin(name, &self.state.store, options)
            .unwrap_or_else(|| Err(ModeError::UnknownMode(name.to_string())))
    }

    fn switch_mode(
        &mut self,
        name: ModeName,
        options: ModeOptions,
        silent: bool,
    ) -> Result<(), ModeError> {
        let next = self.construct_mode(name, &options)?;

        self.with_mode(|mode, ctx| mode.stop(ctx));
        self.mode = next;
        self.state.set_current_mode(name);
        self.with_mode(|mode, ctx| mode.start(ctx));

        if !silent {
            self.state
                .notifications
                .record(Notification::ModeChange { mode: name });
        }
        self.state.store.set_dirty();
        log::info!("Modus gewechselt: {}", name);
        Ok(())
    }

    fn with_mode<R>(&mut self, f: impl FnOnce(&mut dyn ModeHandle, &mut ModeContext<'_>) -> R) -> R {
        let mut ctx = ModeContext::new(&mut self.state, &mut self.host);
        f(self.mode.as_handle_mut(), &mut ctx)
    }

    /// Abschluss jedes Dispatch- und API-Aufrufs: Moduswechsel, Render-Pass, Klassen.
    fn finish_cycle(&mut self) -> anyhow::Result<()> {
        let mut chained = 0;
        while let Some(request) = self.state.take_mode_request() {
            chained += 1;
            if chained > MAX_CHAINED_MODE_CHANGES {
                anyhow::bail!(
                    "Mehr als {} verkettete Moduswechsel, letzter: {}",
                    MAX_CHAINED_MODE_CHANGES,
                    request.name
                );
            }
            self.switch_mode(request.name, request.options, false)?;
        }

        if self.state.store.needs_render() {
            let mut ctx = ModeContext::new(&mut self.state, &mut self.host);
            render::render_pass(self.mode.as_handle(), &mut ctx);
        }

        if let Some(change) = self.state.map_classes.update() {
            self.host.apply_map_classes(&change);
        }
        Ok(())
    }

    // ── Öffentliche Aktionen ────────────────────────────────────────

    /// Löscht die Selektion des aktiven Modus (Features bzw. Vertices).
    pub fn trash(&mut self) -> anyhow::Result<()> {
        self.with_mode(|mode, ctx| mode.trash(ctx));
        self.finish_cycle()
    }

    pub fn combine_features(&mut self) -> anyhow::Result<()> {
        self.with_mode(|mode, ctx| mode.combine_features(ctx));
        self.finish_cycle()
    }

    pub fn uncombine_features(&mut self) -> anyhow::Result<()> {
        self.with_mode(|mode, ctx| mode.uncombine_features(ctx));
        self.finish_cycle()
    }

    /// Erzwingt einen Render-Pass.
    pub fn render(&mut self) -> anyhow::Result<()> {
        self.state.store.set_dirty();
        self.finish_cycle()
    }

    /// Wendet verzögerte Host-Aufrufe an (Doppelklick-Zoom).
    pub fn tick(&mut self) {
        for call in std::mem::take(&mut self.state.deferred) {
            match call {
                DeferredHostCall::DoubleClickZoom(enabled) => {
                    self.host.set_double_click_zoom(enabled)
                }
            }
        }
    }

    /// Holt alle aufgelaufenen Notifications ab.
    pub fn take_notifications(&mut self) -> Vec<Notification> {
        self.state.notifications.drain()
    }

    pub fn notifications(&self) -> &[Notification] {
        self.state.notifications.entries()
    }

    // ── Event-Eingang ───────────────────────────────────────────────

    /// Verarbeitet ein Roh-Event des Hosts.
    pub fn dispatch(&mut self, event: InputEvent) -> anyhow::Result<DispatchOutcome> {
        self.state.outcome = DispatchOutcome::default();
        match event {
            InputEvent::MouseMove(ev) => self.on_mouse_move(ev),
            InputEvent::MouseDown(ev) => self.on_mouse_down(ev),
            InputEvent::MouseUp(ev) => self.on_mouse_up(ev),
            InputEvent::MouseOut(ev) => {
                let lng_lat = self.lng_lat(&ev);
                self.forward(ClassifiedEvent::pointer(EventKind::MouseOut, ev, lng_lat, None));
            }
            InputEvent::TouchStart(ev) => self.on_touch(EventKind::TouchStart, ev),
            InputEvent::TouchMove(ev) => self.on_touch(EventKind::TouchMove, ev),
            InputEvent::TouchEnd(ev) => self.on_touch(EventKind::TouchEnd, ev),
            InputEvent::KeyDown(ev) => self.on_key_down(ev)?,
            InputEvent::KeyUp(ev) => self.on_key_up(ev),
        }
        self.finish_cycle()?;
        Ok(std::mem::take(&mut self.state.outcome))
    }

    fn forward(&mut self, event: ClassifiedEvent) -> usize {
        self.with_mode(|mode, ctx| mode.handle(ctx, &event))
    }

    fn lng_lat(&self, ev: &PointerEvent) -> DVec2 {
        ev.lng_lat.unwrap_or_else(|| self.host.unproject(ev.point))
    }

    /// Maus-Hit-Test; merkt dabei Feature- und Cursor-Klasse vor.
    fn mouse_target(&mut self, ev: &PointerEvent) -> Option<RenderFeature> {
        let target = hit_test::features_at_click(HitQuery::Point(ev.point), &self.host, &self.state.options)
            .into_iter()
            .next();

        let drawing = matches!(
            self.state.current_mode(),
            ModeName::DrawPoint | ModeName::DrawLineString | ModeName::DrawPolygon
        );
        let cursor = match &target {
            _ if drawing => Cursor::Add,
            Some(t) if t.active => Cursor::Move,
            Some(_) => Cursor::Pointer,
            None => Cursor::None,
        };
        let classes = &mut self.state.map_classes;
        classes.queue_feature(target.as_ref().map(|t| t.meta));
        classes.queue_mouse(cursor);
        target
    }

    fn touch_target(&self, ev: &PointerEvent) -> Option<RenderFeature> {
        hit_test::features_at_touch(HitQuery::Point(ev.point), &self.host, &self.state.options)
            .into_iter()
            .next()
    }

    fn on_mouse_move(&mut self, ev: PointerEvent) {
        if ev.is_primary_held() {
            let lng_lat = self.lng_lat(&ev);
            let end = GestureSample::new(ev.point, ev.time_ms);
            let is_drag = !is_click(&self.mouse_down, end, &self.state.options.click_tolerance);
            self.on_drag(ev, lng_lat, is_drag);
            return;
        }
        let target = self.mouse_target(&ev);
        let lng_lat = self.lng_lat(&ev);
        self.forward(ClassifiedEvent::pointer(EventKind::MouseMove, ev, lng_lat, target));
    }

    /// Drag-Klassen-Event: nur echte Drags erreichen den Modus.
    fn on_drag(&mut self, ev: PointerEvent, lng_lat: DVec2, is_drag: bool) {
        if is_drag {
            self.state.map_classes.queue_mouse(Cursor::Drag);
            self.forward(ClassifiedEvent::pointer(EventKind::Drag, ev, lng_lat, None));
        } else {
            self.state.outcome.stop_propagation = true;
        }
    }

    fn on_mouse_down(&mut self, ev: PointerEvent) {
        self.mouse_down = PressInfo::new(ev.point, ev.time_ms);
        let target = self.mouse_target(&ev);
        let lng_lat = self.lng_lat(&ev);
        self.forward(ClassifiedEvent::pointer(EventKind::MouseDown, ev, lng_lat, target));
    }

    fn on_mouse_up(&mut self, ev: PointerEvent) {
        let target = self.mouse_target(&ev);
        let lng_lat = self.lng_lat(&ev);
        let end = GestureSample::new(ev.point, ev.time_ms);
        let kind = if is_click(&self.mouse_down, end, &self.state.options.click_tolerance) {
            EventKind::Click
        } else {
            EventKind::MouseUp
        };
        log::debug!("Maus losgelassen: {:?}", kind);
        self.forward(ClassifiedEvent::pointer(kind, ev, lng_lat, target));
    }

    fn on_touch(&mut self, kind: EventKind, ev: PointerEvent) {
        self.state.outcome.prevent_default = true;
        if !self.state.options.touch_enabled {
            return;
        }
        let lng_lat = self.lng_lat(&ev);
        match kind {
            EventKind::TouchStart => {
                self.touch_start = PressInfo::new(ev.point, ev.time_ms);
                let target = self.touch_target(&ev);
                self.forward(ClassifiedEvent::pointer(kind, ev, lng_lat, target));
            }
            EventKind::TouchMove => {
                self.forward(ClassifiedEvent::pointer(kind, ev, lng_lat, None));
                let end = GestureSample::new(ev.point, ev.time_ms);
                let is_drag = !is_tap(&self.touch_start, end, &self.state.options.tap_tolerance);
                self.on_drag(ev, lng_lat, is_drag);
            }
            _ => {
                let target = self.touch_target(&ev);
                let end = GestureSample::new(ev.point, ev.time_ms);
                let kind = if is_tap(&self.touch_start, end, &self.state.options.tap_tolerance) {
                    EventKind::Tap
                } else {
                    EventKind::TouchEnd
                };
                self.forward(ClassifiedEvent::pointer(kind, ev, lng_lat, target));
            }
        }
    }

    fn on_key_down(&mut self, ev: KeyEvent) -> Result<(), ModeError> {
        if !self.state.options.keybindings {
            return Ok(());
        }
        let controls = self.state.options.controls();
        let draw_mode = match ev.key_code {
            key_codes::BACKSPACE | key_codes::DELETE => {
                if controls.trash {
                    self.state.outcome.prevent_default = true;
                    self.with_mode(|mode, ctx| mode.trash(ctx));
                }
                return Ok(());
            }
            key_codes::DIGIT_1 if controls.point => ModeName::DrawPoint,
            key_codes::DIGIT_2 if controls.line_string => ModeName::DrawLineString,
            key_codes::DIGIT_3 if controls.polygon => ModeName::DrawPolygon,
            code if is_reserved_key(code) => return Ok(()),
            _ => {
                self.forward(ClassifiedEvent::key(EventKind::KeyDown, ev));
                return Ok(());
            }
        };
        if !self.is_available(draw_mode) {
            log::debug!("Taste {} ignoriert: Modus {} nicht registriert", ev.key_code, draw_mode);
            return Ok(());
        }
        self.switch_mode(draw_mode, ModeOptions::default(), false)
    }

    /// Eingebaut oder vom Host registriert.
    fn is_available(&self, name: ModeName) -> bool {
        name.is_builtin() || self.registry.contains_key(&name)
    }

    fn on_key_up(&mut self, ev: KeyEvent) {
        if self.state.options.keybindings && !is_reserved_key(ev.key_code) {
            self.forward(ClassifiedEvent::key(EventKind::KeyUp, ev));
        }
    }
}

/// Lösch- und Zifferntasten erreichen die Modi nie.
fn is_reserved_key(code: u32) -> bool {
    matches!(code, key_codes::BACKSPACE | key_codes::DELETE)
        || (key_codes::DIGIT_0..=key_codes::DIGIT_9).contains(&code)
}
