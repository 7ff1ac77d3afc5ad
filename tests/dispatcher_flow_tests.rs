mod common;

use common::*;
use map_draw_core::app::modes::{selectors, Bindings, Flow, InteractionMode, ModeContext};
use map_draw_core::app::ModeDispatcher;
use map_draw_core::input::{key_codes, ClassifiedEvent, EventKind};
use map_draw_core::shared::ControlOverrides;
use map_draw_core::{
    DrawOptions, FeatureId, Geometry, GeometryType, ModeError, ModeName, ModeOptions,
    Notification, QueriedFeature, RenderFeature,
};
use std::cell::RefCell;
use std::rc::Rc;

type Log = Rc<RefCell<Vec<String>>>;

/// Zeichenmodus-Attrappe, die Lebenszyklus und Tasten protokolliert.
struct RecordingMode {
    name: ModeName,
    log: Log,
}

impl RecordingMode {
    fn on_key(&mut self, _ctx: &mut ModeContext<'_>, event: &ClassifiedEvent) -> Flow {
        let code = event.key_code().unwrap_or_default();
        self.log.borrow_mut().push(format!("{}:key:{code}", self.name));
        Flow::Continue
    }
}

impl InteractionMode for RecordingMode {
    fn name(&self) -> ModeName {
        self.name
    }

    fn start(&mut self, _ctx: &mut ModeContext<'_>, bindings: &mut Bindings<Self>) {
        self.log.borrow_mut().push(format!("{}:start", self.name));
        bindings.on(EventKind::KeyDown, selectors::always, Self::on_key);
    }

    fn stop(&mut self, _ctx: &mut ModeContext<'_>) {
        self.log.borrow_mut().push(format!("{}:stop", self.name));
    }

    fn render(
        &self,
        _ctx: &mut ModeContext<'_>,
        feature: RenderFeature,
        emit: &mut dyn FnMut(RenderFeature),
    ) {
        emit(feature);
    }
}

fn register_recording(dispatcher: &mut ModeDispatcher<TestHost>, name: ModeName, log: &Log) {
    let log = Rc::clone(log);
    dispatcher.register_interaction_mode(name, move |_store, _options| {
        Ok(RecordingMode {
            name,
            log: Rc::clone(&log),
        })
    });
}

fn two_lines() -> Vec<map_draw_core::Feature> {
    vec![
        line("L1", &[(0.0, 0.0), (0.1, 0.0)]),
        line("L2", &[(0.0, 0.2), (0.1, 0.2)]),
    ]
}

#[test]
fn test_mode_change_stops_old_mode_before_starting_new() {
    let mut dispatcher = dispatcher_with(Vec::new());
    let log: Log = Rc::default();
    register_recording(&mut dispatcher, ModeName::DrawPoint, &log);
    register_recording(&mut dispatcher, ModeName::DrawLineString, &log);

    dispatcher
        .change_mode(ModeName::DrawPoint, ModeOptions::default(), false)
        .expect("registrierter Modus");
    dispatcher
        .change_mode(ModeName::DrawLineString, ModeOptions::default(), false)
        .expect("registrierter Modus");

    assert_eq!(
        *log.borrow(),
        vec![
            "draw_point:start",
            "draw_point:stop",
            "draw_line_string:start"
        ]
    );
    assert_eq!(dispatcher.current_mode_name(), ModeName::DrawLineString);
    let changes: Vec<_> = dispatcher
        .take_notifications()
        .into_iter()
        .filter(|n| matches!(n, Notification::ModeChange { .. }))
        .collect();
    assert_eq!(changes.len(), 2);
}

#[test]
fn test_silent_mode_change_emits_no_notification() {
    let mut dispatcher = dispatcher_with(Vec::new());

    dispatcher
        .change_mode(ModeName::Static, ModeOptions::default(), true)
        .expect("Static ist eingebaut");

    assert_eq!(dispatcher.current_mode_name(), ModeName::Static);
    assert!(dispatcher
        .take_notifications()
        .iter()
        .all(|n| !matches!(n, Notification::ModeChange { .. })));
}

#[test]
fn test_unknown_mode_is_fatal_and_keeps_current_mode() {
    let mut dispatcher = dispatcher_with(Vec::new());

    let err = dispatcher
        .change_mode(ModeName::DrawPolygon, ModeOptions::default(), false)
        .expect_err("draw_polygon ist nicht registriert");
    assert_eq!(
        err.downcast_ref::<ModeError>(),
        Some(&ModeError::UnknownMode("draw_polygon".into()))
    );
    assert_eq!(dispatcher.current_mode_name(), ModeName::SimpleSelect);

    let err = dispatcher
        .change_mode_by_name("draw_circle", ModeOptions::default(), false)
        .expect_err("unbekannter Name");
    assert_eq!(
        err.downcast_ref::<ModeError>(),
        Some(&ModeError::UnknownMode("draw_circle".into()))
    );
}

#[test]
fn test_digit_keys_switch_to_draw_modes() {
    let mut dispatcher = dispatcher_with(Vec::new());
    let log: Log = Rc::default();
    register_recording(&mut dispatcher, ModeName::DrawPoint, &log);

    dispatcher
        .dispatch(key_down(key_codes::DIGIT_1))
        .expect("Taste 1");
    assert_eq!(dispatcher.current_mode_name(), ModeName::DrawPoint);

    dispatcher
        .dispatch(key_down(key_codes::DIGIT_3))
        .expect("nicht registrierter Modus wird ignoriert");
    assert_eq!(dispatcher.current_mode_name(), ModeName::DrawPoint);
}

#[test]
fn test_digit_keys_without_registered_draw_modes_are_ignored() {
    let mut dispatcher = dispatcher_with(two_lines());

    for code in [key_codes::DIGIT_1, key_codes::DIGIT_2, key_codes::DIGIT_3] {
        dispatcher
            .dispatch(key_down(code))
            .expect("Standardkonfiguration darf keinen Fehler liefern");
    }

    assert_eq!(dispatcher.current_mode_name(), ModeName::SimpleSelect);
    assert!(dispatcher
        .take_notifications()
        .iter()
        .all(|n| !matches!(n, Notification::ModeChange { .. })));
}

#[test]
fn test_non_digit_keys_are_forwarded_and_digits_reserved() {
    let mut dispatcher = dispatcher_with(Vec::new());
    let log: Log = Rc::default();
    register_recording(&mut dispatcher, ModeName::DrawPoint, &log);
    dispatcher
        .change_mode(ModeName::DrawPoint, ModeOptions::default(), false)
        .expect("registrierter Modus");
    log.borrow_mut().clear();

    for code in [key_codes::ESCAPE, key_codes::DIGIT_0, 52, key_codes::DIGIT_9, key_codes::DELETE] {
        dispatcher.dispatch(key_down(code)).expect("Taste");
    }

    assert_eq!(*log.borrow(), vec!["draw_point:key:27"]);
}

#[test]
fn test_delete_key_trashes_selection_when_control_enabled() {
    let mut dispatcher = dispatcher_with(two_lines());
    dispatcher
        .change_mode(
            ModeName::SimpleSelect,
            ModeOptions::select([FeatureId::from("L1")]),
            false,
        )
        .expect("Simple Select");

    let outcome = dispatcher
        .dispatch(key_down(key_codes::DELETE))
        .expect("Entf");

    assert!(outcome.prevent_default);
    assert_eq!(dispatcher.store().ids(), vec![FeatureId::from("L2")]);
}

#[test]
fn test_delete_key_ignored_when_trash_control_disabled() {
    let options = DrawOptions {
        controls: ControlOverrides {
            trash: Some(false),
            ..Default::default()
        },
        ..Default::default()
    };
    let mut dispatcher = dispatcher_with_options(two_lines(), options);
    dispatcher
        .change_mode(
            ModeName::SimpleSelect,
            ModeOptions::select([FeatureId::from("L1")]),
            false,
        )
        .expect("Simple Select");

    let outcome = dispatcher
        .dispatch(key_down(key_codes::BACKSPACE))
        .expect("Backspace");

    assert!(!outcome.prevent_default);
    assert_eq!(dispatcher.store().len(), 2);
}

#[test]
fn test_keybindings_disabled_ignores_keys() {
    let options = DrawOptions {
        keybindings: false,
        ..Default::default()
    };
    let mut dispatcher = dispatcher_with_options(two_lines(), options);
    dispatcher
        .change_mode(
            ModeName::SimpleSelect,
            ModeOptions::select([FeatureId::from("L1")]),
            false,
        )
        .expect("Simple Select");

    dispatcher.dispatch(key_down(key_codes::DELETE)).expect("Entf");
    dispatcher.dispatch(key_down(key_codes::DIGIT_3)).expect("Taste 3");

    assert_eq!(dispatcher.store().len(), 2);
    assert_eq!(dispatcher.current_mode_name(), ModeName::SimpleSelect);
}

#[test]
fn test_trash_with_empty_selection_is_noop() {
    let mut dispatcher = dispatcher_with(two_lines());

    dispatcher.trash().expect("Trash");

    assert!(dispatcher.take_notifications().is_empty());
    assert_eq!(dispatcher.store().len(), 2);
}

#[test]
fn test_combine_then_uncombine_restores_geometries() {
    let mut dispatcher = dispatcher_with(two_lines());
    let originals: Vec<Geometry> = dispatcher
        .store()
        .features()
        .map(|f| f.geometry.clone())
        .collect();
    dispatcher
        .change_mode(
            ModeName::SimpleSelect,
            ModeOptions::select([FeatureId::from("L1"), FeatureId::from("L2")]),
            false,
        )
        .expect("Simple Select");
    assert!(dispatcher.actions().combine_features);
    dispatcher.take_notifications();

    dispatcher.combine_features().expect("Combine");

    assert_eq!(dispatcher.store().len(), 1);
    let combined = dispatcher.store().selected_features()[0].clone();
    assert_eq!(combined.geometry_type(), GeometryType::MultiLineString);
    assert!(dispatcher.actions().uncombine_features);
    assert!(dispatcher.take_notifications().iter().any(|n| matches!(
        n,
        Notification::Combine {
            created_features,
            deleted_features,
        } if created_features.len() == 1 && deleted_features.len() == 2
    )));

    dispatcher.uncombine_features().expect("Uncombine");

    let parts: Vec<_> = dispatcher.store().features().cloned().collect();
    assert_eq!(parts.len(), 2);
    assert_eq!(
        parts.iter().map(|f| f.geometry.clone()).collect::<Vec<_>>(),
        originals
    );
    assert!(parts
        .iter()
        .all(|f| f.id != combined.id && f.id.as_str() != "L1" && f.id.as_str() != "L2"));
    assert_ne!(parts[0].id, parts[1].id);
    assert_eq!(dispatcher.store().selected_ids().len(), 2);
    assert!(dispatcher
        .take_notifications()
        .iter()
        .any(|n| matches!(n, Notification::Uncombine { .. })));
}

#[test]
fn test_touch_disabled_only_prevents_default() {
    let options = DrawOptions {
        touch_enabled: false,
        ..Default::default()
    };
    let mut dispatcher = dispatcher_with_options(two_lines(), options);

    let start = dispatcher.dispatch(touch_start(0.05, 0.0, 0.0)).expect("TouchStart");
    let end = dispatcher.dispatch(touch_end(0.05, 0.0, 100.0)).expect("TouchEnd");

    assert!(start.prevent_default && end.prevent_default);
    assert!(dispatcher.store().selected_ids().is_empty());
}

#[test]
fn test_tap_selects_feature() {
    let mut dispatcher = dispatcher_with(two_lines());

    let outcome = dispatcher.dispatch(touch_start(0.05, 0.01, 0.0)).expect("TouchStart");
    dispatcher.dispatch(touch_end(0.05, 0.01, 100.0)).expect("TouchEnd");

    assert!(outcome.prevent_default);
    assert_eq!(dispatcher.store().selected_ids(), vec![FeatureId::from("L1")]);
}

#[test]
fn test_double_click_zoom_toggle_is_deferred_until_tick() {
    let mut dispatcher = dispatcher_with(two_lines());

    click(&mut dispatcher, 0.05, 0.0, 0.0);
    assert!(dispatcher.host().double_click_zoom, "noch nicht angewendet");

    dispatcher.tick();
    assert!(!dispatcher.host().double_click_zoom);
}

#[test]
fn test_detached_host_yields_no_targets() {
    let mut dispatcher = dispatcher_with(two_lines());
    dispatcher.host_mut().attached = false;
    let updates = (dispatcher.host().cold_updates, dispatcher.host().hot_updates);

    click(&mut dispatcher, 0.05, 0.0, 0.0);
    dispatcher.render().expect("Render");

    assert!(dispatcher.store().selected_ids().is_empty());
    assert_eq!(
        (dispatcher.host().cold_updates, dispatcher.host().hot_updates),
        updates
    );
}

#[test]
fn test_non_meta_features_are_ignored_by_hit_test() {
    let mut dispatcher = dispatcher_with(two_lines());
    dispatcher.host_mut().foreign.push(QueriedFeature {
        properties: serde_json::json!({ "name": "Straße" })
            .as_object()
            .cloned()
            .unwrap_or_default(),
        geometry: Geometry::Point(glam::DVec2::new(0.5, 0.5)),
    });
    dispatcher
        .change_mode(
            ModeName::SimpleSelect,
            ModeOptions::select([FeatureId::from("L1")]),
            false,
        )
        .expect("Simple Select");

    click(&mut dispatcher, 0.5, 0.5, 0.0);

    assert!(dispatcher.store().selected_ids().is_empty());
}

#[test]
fn test_hover_queues_feature_and_cursor_classes() {
    let mut dispatcher = dispatcher_with(two_lines());

    dispatcher.dispatch(mouse_move(0.05, 0.0, 0.0)).expect("Move");

    let last = dispatcher
        .host()
        .class_changes
        .last()
        .expect("Klassen sollten angewendet werden");
    assert!(last.add.contains(&"feature-feature".to_string()));
    assert!(last.add.contains(&"mouse-pointer".to_string()));

    dispatcher.dispatch(mouse_move(0.5, 0.5, 10.0)).expect("Move");
    let last = dispatcher.host().class_changes.last().expect("Diff");
    assert!(last.remove.contains(&"feature-feature".to_string()));
    assert!(last.add.contains(&"mouse-none".to_string()));
}
