//! Gemeinsame Test-Helfer: In-Memory-Host mit einfacher Projektion und Event-Builder.

#![allow(dead_code)]

use glam::{DVec2, Vec2};
use map_draw_core::app::{ClassChange, ModeDispatcher};
use map_draw_core::{
    DrawOptions, Feature, Geometry, InputEvent, KeyEvent, MapHost, OverlaySource, PointerEvent,
    QueriedFeature, RenderFeature, ScreenBox,
};

/// Pixel pro Grad; y wächst nach unten, Breite nach oben.
pub const SCALE: f64 = 1000.0;

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn to_screen(lng_lat: DVec2) -> Vec2 {
    Vec2::new((lng_lat.x * SCALE) as f32, (-lng_lat.y * SCALE) as f32)
}

/// Host, der die zuletzt gelieferten Overlay-Quellen im Screen-Raum abfragt.
pub struct TestHost {
    pub attached: bool,
    pub cold: Vec<RenderFeature>,
    pub hot: Vec<RenderFeature>,
    /// Zusätzliche Nicht-Meta-Features, die jede Abfrage mitliefert.
    pub foreign: Vec<QueriedFeature>,
    pub drag_pan: bool,
    pub drag_pan_calls: Vec<bool>,
    pub double_click_zoom: bool,
    pub class_changes: Vec<ClassChange>,
    pub cold_updates: usize,
    pub hot_updates: usize,
}

impl TestHost {
    /// Gesamtes Overlay wie gezeichnet: `cold` unter `hot`.
    pub fn overlay(&self) -> Vec<RenderFeature> {
        self.cold.iter().chain(&self.hot).cloned().collect()
    }
}

impl Default for TestHost {
    fn default() -> Self {
        Self {
            attached: true,
            cold: Vec::new(),
            hot: Vec::new(),
            foreign: Vec::new(),
            drag_pan: true,
            drag_pan_calls: Vec::new(),
            double_click_zoom: true,
            class_changes: Vec::new(),
            cold_updates: 0,
            hot_updates: 0,
        }
    }
}

impl MapHost for TestHost {
    fn is_attached(&self) -> bool {
        self.attached
    }

    fn query_rendered_features(&self, bbox: ScreenBox, _layers: &[String]) -> Vec<QueriedFeature> {
        self.cold
            .iter()
            .chain(&self.hot)
            .filter(|f| geometry_hits_box(&f.geometry, &bbox))
            .map(RenderFeature::to_queried)
            .chain(self.foreign.iter().cloned())
            .collect()
    }

    fn unproject(&self, point: Vec2) -> DVec2 {
        DVec2::new(point.x as f64 / SCALE, -(point.y as f64) / SCALE)
    }

    fn set_drag_pan(&mut self, enabled: bool) {
        self.drag_pan = enabled;
        self.drag_pan_calls.push(enabled);
    }

    fn set_double_click_zoom(&mut self, enabled: bool) {
        self.double_click_zoom = enabled;
    }

    fn set_overlay_data(&mut self, source: OverlaySource, features: &[RenderFeature]) {
        match source {
            OverlaySource::Cold => {
                self.cold = features.to_vec();
                self.cold_updates += 1;
            }
            OverlaySource::Hot => {
                self.hot = features.to_vec();
                self.hot_updates += 1;
            }
        }
    }

    fn apply_map_classes(&mut self, change: &ClassChange) {
        self.class_changes.push(change.clone());
    }
}

// ── Geometrie im Screen-Raum ────────────────────────────────────────

fn geometry_hits_box(geometry: &Geometry, bbox: &ScreenBox) -> bool {
    match geometry {
        Geometry::Point(p) => bbox.contains(to_screen(*p)),
        Geometry::MultiPoint(points) => points.iter().any(|p| bbox.contains(to_screen(*p))),
        Geometry::LineString(line) => line_hits_box(line, false, bbox),
        Geometry::MultiLineString(lines) => lines.iter().any(|l| line_hits_box(l, false, bbox)),
        Geometry::Polygon(rings) => polygon_hits_box(rings, bbox),
        Geometry::MultiPolygon(polygons) => polygons.iter().any(|p| polygon_hits_box(p, bbox)),
    }
}

fn polygon_hits_box(rings: &[Vec<DVec2>], bbox: &ScreenBox) -> bool {
    let Some(outer) = rings.first() else {
        return false;
    };
    rings.iter().any(|ring| line_hits_box(ring, true, bbox))
        || point_in_ring(bbox.center(), outer)
}

fn line_hits_box(coords: &[DVec2], closed: bool, bbox: &ScreenBox) -> bool {
    let points: Vec<Vec2> = coords.iter().map(|p| to_screen(*p)).collect();
    if points.iter().any(|p| bbox.contains(*p)) {
        return true;
    }
    let mut segments: Vec<(Vec2, Vec2)> = points.windows(2).map(|w| (w[0], w[1])).collect();
    if closed && points.len() > 2 {
        segments.push((points[points.len() - 1], points[0]));
    }
    let corners = [
        bbox.min,
        Vec2::new(bbox.max.x, bbox.min.y),
        bbox.max,
        Vec2::new(bbox.min.x, bbox.max.y),
    ];
    segments.iter().any(|&(a, b)| {
        (0..4).any(|i| segments_intersect(a, b, corners[i], corners[(i + 1) % 4]))
    })
}

fn cross(o: Vec2, a: Vec2, b: Vec2) -> f32 {
    (a - o).perp_dot(b - o)
}

fn segments_intersect(p1: Vec2, p2: Vec2, q1: Vec2, q2: Vec2) -> bool {
    let d1 = cross(q1, q2, p1);
    let d2 = cross(q1, q2, p2);
    let d3 = cross(p1, p2, q1);
    let d4 = cross(p1, p2, q2);
    ((d1 > 0.0 && d2 < 0.0) || (d1 < 0.0 && d2 > 0.0))
        && ((d3 > 0.0 && d4 < 0.0) || (d3 < 0.0 && d4 > 0.0))
}

fn point_in_ring(point: Vec2, ring: &[DVec2]) -> bool {
    let pts: Vec<Vec2> = ring.iter().map(|p| to_screen(*p)).collect();
    let mut inside = false;
    let mut j = pts.len().wrapping_sub(1);
    for i in 0..pts.len() {
        let (a, b) = (pts[i], pts[j]);
        if (a.y > point.y) != (b.y > point.y)
            && point.x < (b.x - a.x) * (point.y - a.y) / (b.y - a.y) + a.x
        {
            inside = !inside;
        }
        j = i;
    }
    inside
}

// ── Event-Builder ───────────────────────────────────────────────────

fn pointer(lng: f64, lat: f64, time_ms: f64) -> PointerEvent {
    let lng_lat = DVec2::new(lng, lat);
    PointerEvent::at(to_screen(lng_lat), time_ms).with_lng_lat(lng_lat)
}

pub fn mouse_down(lng: f64, lat: f64, time_ms: f64) -> InputEvent {
    InputEvent::MouseDown(pointer(lng, lat, time_ms).with_buttons(1))
}

pub fn shift_mouse_down(lng: f64, lat: f64, time_ms: f64) -> InputEvent {
    InputEvent::MouseDown(pointer(lng, lat, time_ms).with_buttons(1).with_shift(true))
}

/// Mausbewegung mit gedrückter Primärtaste.
pub fn mouse_drag(lng: f64, lat: f64, time_ms: f64) -> InputEvent {
    InputEvent::MouseMove(pointer(lng, lat, time_ms).with_buttons(1))
}

pub fn mouse_move(lng: f64, lat: f64, time_ms: f64) -> InputEvent {
    InputEvent::MouseMove(pointer(lng, lat, time_ms))
}

pub fn mouse_up(lng: f64, lat: f64, time_ms: f64) -> InputEvent {
    InputEvent::MouseUp(pointer(lng, lat, time_ms))
}

pub fn shift_mouse_up(lng: f64, lat: f64, time_ms: f64) -> InputEvent {
    InputEvent::MouseUp(pointer(lng, lat, time_ms).with_shift(true))
}

pub fn touch_start(lng: f64, lat: f64, time_ms: f64) -> InputEvent {
    InputEvent::TouchStart(pointer(lng, lat, time_ms))
}

pub fn touch_end(lng: f64, lat: f64, time_ms: f64) -> InputEvent {
    InputEvent::TouchEnd(pointer(lng, lat, time_ms))
}

pub fn key_down(key_code: u32) -> InputEvent {
    InputEvent::KeyDown(KeyEvent::new(key_code))
}

/// Vollständiger Klick (Down + Up an derselben Stelle).
pub fn click(dispatcher: &mut ModeDispatcher<TestHost>, lng: f64, lat: f64, time_ms: f64) {
    dispatcher
        .dispatch(mouse_down(lng, lat, time_ms))
        .expect("MouseDown sollte verarbeitet werden");
    dispatcher
        .dispatch(mouse_up(lng, lat, time_ms + 50.0))
        .expect("MouseUp sollte verarbeitet werden");
}

pub fn shift_click(dispatcher: &mut ModeDispatcher<TestHost>, lng: f64, lat: f64, time_ms: f64) {
    dispatcher
        .dispatch(shift_mouse_down(lng, lat, time_ms))
        .expect("MouseDown sollte verarbeitet werden");
    dispatcher
        .dispatch(shift_mouse_up(lng, lat, time_ms + 50.0))
        .expect("MouseUp sollte verarbeitet werden");
}

// ── Fixtures ────────────────────────────────────────────────────────

pub fn line(id: &str, coords: &[(f64, f64)]) -> Feature {
    Feature::new(
        id,
        Geometry::LineString(coords.iter().map(|&(x, y)| DVec2::new(x, y)).collect()),
    )
}

pub fn polygon(id: &str, ring: &[(f64, f64)]) -> Feature {
    Feature::new(
        id,
        Geometry::Polygon(vec![ring.iter().map(|&(x, y)| DVec2::new(x, y)).collect()]),
    )
}

pub fn point(id: &str, x: f64, y: f64) -> Feature {
    Feature::new(id, Geometry::Point(DVec2::new(x, y)))
}

/// Dispatcher mit Standardoptionen, gefülltem Store und erstem Render-Pass.
pub fn dispatcher_with(features: Vec<Feature>) -> ModeDispatcher<TestHost> {
    dispatcher_with_options(features, DrawOptions::default())
}

pub fn dispatcher_with_options(
    features: Vec<Feature>,
    options: DrawOptions,
) -> ModeDispatcher<TestHost> {
    init_logging();
    let mut dispatcher =
        ModeDispatcher::new(TestHost::default(), options).expect("Standardmodus sollte starten");
    for feature in features {
        dispatcher.store_mut().add(feature);
    }
    dispatcher.render().expect("Render-Pass sollte durchlaufen");
    dispatcher.take_notifications();
    dispatcher
}
