use bbox_core::{Bounds, HostArgs, HostResult, Point, RectRecord};
use bbox_editor::input::{InputEvent, Modifiers};
use bbox_editor::{Annotator, HostBridge};
use pretty_assertions::assert_eq;

#[derive(Default)]
struct Recorder {
    values: Vec<HostResult>,
    heights: Vec<f64>,
}

impl HostBridge for Recorder {
    fn set_component_value(&mut self, value: &HostResult) {
        self.values.push(value.clone());
    }

    fn set_frame_height(&mut self, height: f64) {
        self.heights.push(height);
    }
}

fn rect(left: f64, top: f64, width: f64, height: f64, label: &str) -> RectRecord {
    RectRecord {
        top,
        left,
        width,
        height,
        label: label.into(),
    }
}

fn four_boxes() -> Vec<RectRecord> {
    vec![
        rect(10.0, 10.0, 50.0, 50.0, "a"),
        rect(100.0, 10.0, 50.0, 50.0, "b"),
        rect(200.0, 10.0, 50.0, 50.0, "c"),
        rect(300.0, 10.0, 50.0, 50.0, "d"),
    ]
}

fn mount(rects: Vec<RectRecord>) -> Annotator<Recorder> {
    Annotator::new(HostArgs::new(1000, 800, rects), Recorder::default()).unwrap()
}

fn labels(a: &Annotator<Recorder>) -> Vec<String> {
    a.boxes().iter().map(|b| b.label.clone()).collect()
}

fn last(a: &Annotator<Recorder>) -> &HostResult {
    a.host().values.last().unwrap()
}

#[test]
fn initial_emit_round_trips_rects() {
    let rects = vec![
        rect(12.5, 7.25, 100.0, 33.3, "dog"),
        rect(0.0, 0.0, 1.0, 1.0, ""),
    ];
    let a = mount(rects.clone());
    assert_eq!(a.host().values.len(), 1);
    assert_eq!(last(&a).rects, rects);
    assert_eq!(a.host().heights, vec![848.0]);
}

#[test]
fn empty_rects_are_valid() {
    let a = mount(Vec::new());
    assert_eq!(last(&a).rects, Vec::<RectRecord>::new());
}

#[test]
fn malformed_args_fail_fast() {
    let err = HostArgs::from_json(r#"{"canvasWidth": 10, "canvasHeight": 10}"#);
    assert!(err.is_err());
    let bad = HostArgs::new(10, 10, vec![rect(0.0, 0.0, -1.0, 1.0, "")]);
    assert!(Annotator::new(bad, Recorder::default()).is_err());
}

#[test]
fn remove_selected_is_simultaneous() {
    let mut a = mount(four_boxes());
    a.select(&[3, 1]);
    assert_eq!(a.selection(), &[1, 3]);
    assert!(a.remove_selected());
    assert_eq!(labels(&a), vec!["a", "c"]);
    assert_eq!(last(&a).rects.len(), 2);
    assert!(a.selection().is_empty());
    assert!(!a.remove_selected());
}

#[test]
fn quick_add_offsets_each_click() {
    let mut a = mount(Vec::new());
    a.quick_add();
    a.quick_add();
    let boxes: Vec<Bounds> = a.boxes().iter().map(|b| b.bounds).collect();
    assert_eq!(
        boxes,
        vec![
            Bounds::new(150.0, 120.0, 200.0, 160.0),
            Bounds::new(153.0, 123.0, 200.0, 160.0),
        ]
    );
    assert_eq!(a.host().values.len(), 3);
}

#[test]
fn clear_all_restarts_quick_add_placement() {
    let mut a = mount(four_boxes());
    a.quick_add();
    a.quick_add();
    a.clear_all();
    assert!(a.boxes().is_empty());
    assert_eq!(a.quick_add_clicks(), 0);
    a.quick_add();
    assert_eq!(a.boxes()[0].bounds, Bounds::new(150.0, 120.0, 200.0, 160.0));
}

#[test]
fn bulk_relabel_touches_only_selection() {
    let mut a = mount(four_boxes());
    a.select(&[0, 2]);
    assert_eq!(a.label_field().value, "a");
    a.set_label_text("cat");
    assert_eq!(labels(&a), vec!["cat", "b", "cat", "d"]);
    assert_eq!(a.surface().shapes()[2].label.text, "cat");
    assert_eq!(last(&a).rects[1].label, "b");
}

#[test]
fn reset_restores_initial_rects() {
    let mut a = mount(four_boxes());
    a.select(&[1]);
    a.set_label_text("renamed");
    a.remove_selected();
    a.quick_add();
    a.reset();
    assert_eq!(last(&a).rects, four_boxes());
    // reset keeps the quick-add counter
    assert_eq!(a.quick_add_clicks(), 1);
}

#[test]
fn emitted_length_tracks_store_size() {
    let mut a = mount(four_boxes());
    a.quick_add();
    assert_eq!(last(&a).rects.len(), a.boxes().len());
    a.select(&[0, 4]);
    a.remove_selected();
    assert_eq!(last(&a).rects.len(), a.boxes().len());
    a.select(&[1]);
    a.set_label_text("x");
    assert_eq!(last(&a).rects.len(), a.boxes().len());
    a.clear_all();
    assert_eq!(last(&a).rects.len(), 0);
}

#[test]
fn draw_commits_selected_box() {
    let mut a = mount(Vec::new());
    assert!(a.start_drawing());
    assert!(!a.start_drawing());
    a.pointer_down(Point::new(100.0, 100.0), Modifiers::NONE);
    a.pointer_move(Point::new(50.0, 60.0));
    assert_eq!(
        a.surface().provisional().map(|s| s.bounds()),
        Some(Bounds::new(50.0, 60.0, 50.0, 40.0))
    );
    a.pointer_up(Point::new(40.0, 30.0));

    assert!(!a.pointer_capture());
    assert!(a.surface().provisional().is_none());
    assert_eq!(a.boxes().len(), 1);
    assert_eq!(a.boxes()[0].bounds, Bounds::new(40.0, 30.0, 60.0, 70.0));
    assert_eq!(a.boxes()[0].label, "");
    assert_eq!(a.selection(), &[0]);
    assert_eq!(last(&a).rects.len(), 1);
}

#[test]
fn zero_area_draw_is_committed() {
    let mut a = mount(Vec::new());
    a.start_drawing();
    a.pointer_down(Point::new(5.0, 5.0), Modifiers::NONE);
    a.pointer_up(Point::new(5.0, 5.0));
    assert_eq!(a.boxes()[0].bounds, Bounds::new(5.0, 5.0, 0.0, 0.0));
}

#[test]
fn drag_pushes_geometry_back() {
    let mut a = mount(four_boxes());
    a.pointer_down(Point::new(30.0, 30.0), Modifiers::NONE);
    assert_eq!(a.selection(), &[0]);
    a.pointer_move(Point::new(35.0, 40.0));
    a.pointer_up(Point::new(40.0, 45.0));
    assert_eq!(a.boxes()[0].bounds, Bounds::new(20.0, 25.0, 50.0, 50.0));
    assert_eq!(last(&a).rects[0], rect(20.0, 25.0, 50.0, 50.0, "a"));
}

#[test]
fn deferred_label_flushes_before_selection_change() {
    let mut args = HostArgs::new(1000, 800, four_boxes());
    args.config.label_commit = bbox_core::LabelCommit::Deferred;
    let mut a = Annotator::new(args, Recorder::default()).unwrap();
    a.select(&[0]);
    a.set_label_text("dog");
    assert_eq!(a.emitted(), 1);
    assert_eq!(labels(&a)[0], "a");

    // Clicking empty space clears the selection, but the edit lands first
    a.pointer_down(Point::new(900.0, 700.0), Modifiers::NONE);
    assert_eq!(labels(&a)[0], "dog");
    assert_eq!(a.emitted(), 2);
    assert!(a.selection().is_empty());
    assert!(!a.label_field().enabled);
}

#[test]
fn keyboard_shortcuts_dispatch() {
    let mut a = mount(four_boxes());
    assert!(a.key("a", Modifiers::NONE));
    assert_eq!(a.boxes().len(), 5);
    let ctrl = Modifiers {
        ctrl: true,
        ..Modifiers::NONE
    };
    assert!(!a.key("c", ctrl));
    assert_eq!(a.boxes().len(), 5);
    a.select(&[4]);
    assert!(a.key("Delete", Modifiers::NONE));
    assert_eq!(a.boxes().len(), 4);
    assert!(a.key("d", Modifiers::NONE));
    assert!(a.pointer_capture());
    assert!(a.key("C", Modifiers::SHIFT));
    assert!(a.boxes().is_empty());
}

#[test]
fn arming_mid_drag_lets_the_drag_finish() {
    let mut a = mount(four_boxes());
    a.pointer_down(Point::new(30.0, 30.0), Modifiers::NONE);
    a.pointer_move(Point::new(80.0, 80.0));
    assert!(a.key("d", Modifiers::NONE));
    a.pointer_up(Point::new(80.0, 80.0));

    assert_eq!(a.boxes()[0].bounds, Bounds::new(60.0, 60.0, 50.0, 50.0));
    assert_eq!(last(&a).rects[0], rect(60.0, 60.0, 50.0, 50.0, "a"));
    assert!(a.surface().provisional().is_none());
    // Still armed; the next press starts a draft
    assert!(a.pointer_capture());

    a.pointer_move(Point::new(120.0, 120.0));
    assert_eq!(a.surface().shape_bounds(0), Some(Bounds::new(60.0, 60.0, 50.0, 50.0)));
    a.pointer_down(Point::new(500.0, 500.0), Modifiers::NONE);
    a.pointer_up(Point::new(520.0, 530.0));
    assert_eq!(a.boxes().len(), 5);
    assert_eq!(a.boxes()[4].bounds, Bounds::new(500.0, 500.0, 20.0, 30.0));
    assert_eq!(a.boxes()[0].bounds, Bounds::new(60.0, 60.0, 50.0, 50.0));
    assert!(!a.pointer_capture());
}

#[test]
fn handle_resize_syncs_geometry() {
    let mut a = mount(four_boxes());
    a.pointer_down(Point::new(30.0, 30.0), Modifiers::NONE);
    a.pointer_up(Point::new(30.0, 30.0));
    assert_eq!(a.selection(), &[0]);
    let before = a.emitted();

    // Grab the bottom-right handle at (60, 60)
    a.pointer_down(Point::new(61.0, 59.0), Modifiers::NONE);
    a.pointer_move(Point::new(80.0, 70.0));
    a.pointer_up(Point::new(90.0, 90.0));

    assert_eq!(a.boxes()[0].bounds, Bounds::new(10.0, 10.0, 80.0, 80.0));
    assert_eq!(last(&a).rects[0], rect(10.0, 10.0, 80.0, 80.0, "a"));
    assert_eq!(last(&a).rects[1], rect(100.0, 10.0, 50.0, 50.0, "b"));
    assert_eq!(a.emitted(), before + 1);
    assert_eq!(a.selection(), &[0]);
}

#[test]
fn reset_clears_selection() {
    let mut a = mount(four_boxes());
    a.select(&[0, 2]);
    assert!(a.label_field().enabled);
    a.reset();
    assert!(a.selection().is_empty());
    assert!(a.surface().active().is_empty());
    assert!(!a.label_field().enabled);
    assert!(!a.remove_selected());
    assert_eq!(a.boxes().len(), 4);
}

#[test]
fn clear_all_clears_selection() {
    let mut a = mount(four_boxes());
    a.select(&[1]);
    assert!(a.label_field().enabled);
    a.clear_all();
    assert!(a.selection().is_empty());
    assert!(a.surface().active().is_empty());
    assert!(!a.label_field().enabled);
    a.quick_add();
    a.set_label_text("stray");
    assert_eq!(labels(&a), vec![""]);
}

#[test]
fn normalized_input_events_drive_drawing() {
    let mut a = mount(Vec::new());
    a.start_drawing();
    a.handle_input(InputEvent::PointerDown {
        x: 10.0,
        y: 20.0,
        modifiers: Modifiers::NONE,
    });
    a.handle_input(InputEvent::PointerMove {
        x: 40.0,
        y: 25.0,
        modifiers: Modifiers::NONE,
    });
    a.handle_input(InputEvent::PointerUp {
        x: 50.0,
        y: 60.0,
        modifiers: Modifiers::NONE,
    });
    assert_eq!(a.boxes()[0].bounds, Bounds::new(10.0, 20.0, 40.0, 40.0));

    // Shift on a down event extends the surface selection
    a.quick_add();
    a.handle_input(InputEvent::PointerDown {
        x: 30.0,
        y: 30.0,
        modifiers: Modifiers::NONE,
    });
    a.handle_input(InputEvent::PointerUp {
        x: 30.0,
        y: 30.0,
        modifiers: Modifiers::NONE,
    });
    a.handle_input(InputEvent::PointerDown {
        x: 250.0,
        y: 200.0,
        modifiers: Modifiers::SHIFT,
    });
    a.handle_input(InputEvent::PointerUp {
        x: 250.0,
        y: 200.0,
        modifiers: Modifiers::SHIFT,
    });
    assert_eq!(a.selection(), &[0, 1]);
}

#[test]
fn unmount_mid_draw_cleans_up() {
    let mut a = mount(four_boxes());
    a.start_drawing();
    a.pointer_down(Point::new(1.0, 1.0), Modifiers::NONE);
    a.pointer_move(Point::new(9.0, 9.0));
    a.unmount();
    assert!(!a.pointer_capture());
    assert!(a.surface().provisional().is_none());
    assert!(a.surface().is_disposed());

    let before = a.emitted();
    a.quick_add();
    assert!(!a.key("c", Modifiers::NONE));
    assert_eq!(a.emitted(), before);
    a.unmount();
}

#[test]
fn rebuild_reannounces_and_rejects_bad_args() {
    let mut a = mount(four_boxes());
    a.select(&[0]);
    assert!(a.rebuild(HostArgs::new(0, 0, Vec::new())).is_err());
    assert_eq!(a.boxes().len(), 4);

    a.rebuild(HostArgs::new(640, 480, vec![rect(1.0, 2.0, 3.0, 4.0, "z")]))
        .unwrap();
    assert_eq!(a.surface().generation(), 2);
    assert!(a.selection().is_empty());
    assert_eq!(a.host().heights, vec![848.0, 528.0]);
    assert_eq!(last(&a).rects, vec![rect(1.0, 2.0, 3.0, 4.0, "z")]);
    a.reset();
    assert_eq!(last(&a).rects, vec![rect(1.0, 2.0, 3.0, 4.0, "z")]);
}
