//! End-to-end loop behaviour against the headless host.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use frameloop_engine::platform::{HeadlessPlatform, RawEventKind};
use frameloop_engine::render::HeadlessSurface;
use frameloop_engine::scene::{Camera, NodeRef, PerspectiveCamera, SceneObject};
use frameloop_engine::time::ManualTime;
use frameloop_engine::{AppEvent, Application, EventKind};

type App = Application<HeadlessSurface>;

fn setup(width: u32, height: u32) -> (Rc<HeadlessPlatform>, ManualTime, App) {
    setup_with(width, height, None)
}

fn setup_with(
    width: u32,
    height: u32,
    max_delta: Option<Duration>,
) -> (Rc<HeadlessPlatform>, ManualTime, App) {
    let platform = Rc::new(HeadlessPlatform::new(width, height));
    let time = ManualTime::new();
    let mut builder = Application::builder(platform.clone(), HeadlessSurface::new())
        .add_shader_chunk(false)
        .time_source(time.clone());
    if let Some(max_delta) = max_delta {
        builder = builder.max_delta(max_delta);
    }
    (platform, time, builder.build().unwrap())
}

fn record(app: &App, kind: EventKind) -> Rc<RefCell<Vec<AppEvent>>> {
    let log = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&log);
    app.add_event_listener(kind, move |event| sink.borrow_mut().push(*event));
    log
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-5
}

struct Prop;

impl SceneObject for Prop {}

// ── lifecycle ─────────────────────────────────────────────────────────────

#[test]
fn start_and_stop_are_idempotent() {
    let (platform, _, app) = setup(800, 600);
    let starts = record(&app, EventKind::Start);
    let stops = record(&app, EventKind::Stop);

    app.start();
    app.start();
    assert!(app.is_running());
    assert_eq!(starts.borrow().len(), 1);
    assert_eq!(platform.pending_frames(), 1);

    app.stop();
    app.stop();
    assert!(!app.is_running());
    assert_eq!(stops.borrow().len(), 1);
    assert_eq!(platform.pending_frames(), 0);
    assert_eq!(platform.subscriber_count(RawEventKind::Resize), 0);
    assert_eq!(platform.subscriber_count(RawEventKind::PointerMove), 0);
}

#[test]
fn start_emits_resize_before_start() {
    let (_, _, app) = setup(640, 480);
    let order = Rc::new(RefCell::new(Vec::new()));

    for kind in [EventKind::Resize, EventKind::Start] {
        let sink = Rc::clone(&order);
        app.add_event_listener(kind, move |event| sink.borrow_mut().push(event.name()));
    }

    app.start();
    assert_eq!(*order.borrow(), ["resize", "start"]);
    assert_eq!((app.width(), app.height()), (640, 480));
}

#[test]
fn every_frame_emits_one_update_and_renders() {
    let (platform, time, app) = setup(800, 600);
    let updates = record(&app, EventKind::Update);

    app.start();
    for _ in 0..5 {
        time.advance_secs(0.01);
        assert_eq!(platform.run_frame(), 1);
    }

    assert_eq!(updates.borrow().len(), 5);
    assert_eq!(app.renderer().render_count(), 5);
    assert_eq!(platform.pending_frames(), 1);
}

// ── coalescing ────────────────────────────────────────────────────────────

#[test]
fn resize_burst_coalesces_into_one_event_with_latest_size() {
    let (platform, _, app) = setup(800, 600);
    app.start();
    let resizes = record(&app, EventKind::Resize);

    platform.resize_window(1024, 768);
    platform.resize_window(300, 200);
    platform.resize_window(1280, 720);
    assert!(resizes.borrow().is_empty());

    platform.run_frame();

    assert_eq!(
        *resizes.borrow(),
        [AppEvent::Resize { width: 1280, height: 720 }]
    );
    assert_eq!((app.width(), app.height()), (1280, 720));
    assert_eq!(app.uniforms().screen, [1280.0, 720.0]);

    platform.run_frame();
    assert_eq!(resizes.borrow().len(), 1);
}

#[test]
fn pointer_moves_are_normalized_once_per_frame() {
    let (platform, _, app) = setup(800, 600);
    app.start();
    let moves = record(&app, EventKind::MouseMove);

    let mut seen = Vec::new();
    for (x, y, expected) in [
        (0.0, 0.0, (-1.0, 1.0)),
        (800.0, 600.0, (1.0, -1.0)),
        (400.0, 300.0, (0.0, 0.0)),
    ] {
        platform.move_pointer(123.0, 45.0);
        platform.move_pointer(x, y);
        platform.run_frame();

        let pointer = app.pointer();
        assert!(close(pointer.x as f64, expected.0), "x for ({x}, {y})");
        assert!(close(pointer.y as f64, expected.1), "y for ({x}, {y})");
        assert_eq!(app.uniforms().pointer, pointer.to_array());
        seen.push(pointer);
    }

    let moves = moves.borrow();
    assert_eq!(moves.len(), 3);
    assert_eq!(moves[2], AppEvent::MouseMove { pointer: seen[2] });
}

#[test]
fn samples_taken_while_stopped_are_ignored() {
    let (platform, _, app) = setup(800, 600);
    let resizes = record(&app, EventKind::Resize);

    platform.resize_window(100, 100);
    platform.move_pointer(10.0, 10.0);
    app.render();

    assert!(resizes.borrow().is_empty());
    assert_eq!(app.pointer().x, 0.0);
}

// ── camera ────────────────────────────────────────────────────────────────

#[test]
fn non_camera_in_camera_slot_falls_back_to_default() {
    let (_, _, app) = setup(800, 600);
    let prop: NodeRef = Rc::new(RefCell::new(Prop));
    app.scene().camera = Some(prop);
    assert!(!app.uses_default_camera());

    app.render();

    assert!(app.uses_default_camera());
    assert_eq!(app.renderer().render_count(), 1);
}

#[test]
fn empty_camera_slot_falls_back_to_default() {
    let (_, _, app) = setup(800, 600);
    app.scene().camera = None;

    app.render();

    assert!(app.uses_default_camera());
    assert_eq!(app.renderer().render_count(), 1);
}

#[test]
fn resize_updates_only_the_default_camera() {
    let (platform, _, app) = setup(800, 600);
    app.start();

    let default_aspect = app.camera().borrow().aspect();
    assert!(close(default_aspect as f64, 800.0 / 600.0));

    let custom = Rc::new(RefCell::new(PerspectiveCamera::new(60.0, 1.0, 0.1, 100.0)));
    let node: NodeRef = custom.clone();
    app.scene().camera = Some(node);

    platform.resize_window(1000, 500);
    platform.run_frame();

    assert_eq!(custom.borrow().aspect(), 1.0);
    assert_eq!(app.camera().borrow().aspect(), default_aspect);
    assert_eq!(app.renderer().last_camera_aspect(), Some(1.0));
    assert_eq!((app.width(), app.height()), (1000, 500));
}

// ── timing ────────────────────────────────────────────────────────────────

#[test]
fn delta_is_clamped_and_restart_rebases_the_clock() {
    let (platform, time, app) = setup_with(800, 600, Some(Duration::from_millis(250)));
    let updates = record(&app, EventKind::Update);

    app.start();
    time.advance_secs(0.016);
    platform.run_frame();
    time.advance_secs(1.0);
    platform.run_frame();

    app.stop();
    time.advance_secs(5.0);
    app.start();
    time.advance_secs(0.02);
    platform.run_frame();

    let updates = updates.borrow();
    let pairs: Vec<(f64, f64)> = updates
        .iter()
        .map(|event| match *event {
            AppEvent::Update { delta, elapsed_time } => (delta as f64, elapsed_time),
            _ => unreachable!(),
        })
        .collect();

    assert!(close(pairs[0].0, 0.016) && close(pairs[0].1, 0.016));
    assert!(close(pairs[1].0, 0.25), "delta clamped: {}", pairs[1].0);
    assert!(close(pairs[1].1, 1.016));
    assert!(close(pairs[2].0, 0.02) && close(pairs[2].1, 0.02));
    assert!(close(app.time(), 0.02));
}

#[test]
fn unclamped_deltas_sum_to_elapsed_time() {
    let (platform, time, app) = setup(800, 600);
    let updates = record(&app, EventKind::Update);

    app.start();
    for step in [0.016, 1.0, 0.02] {
        time.advance_secs(step);
        platform.run_frame();
    }

    let sum: f64 = updates
        .borrow()
        .iter()
        .map(|event| match *event {
            AppEvent::Update { delta, .. } => delta as f64,
            _ => unreachable!(),
        })
        .sum();

    assert!(close(sum, 1.036), "sum of deltas: {sum}");
    assert!(close(app.time(), 1.036));
}

// ── re-entrancy ───────────────────────────────────────────────────────────

#[test]
fn stop_inside_resize_during_start_suppresses_start() {
    let (platform, _, app) = setup(800, 600);
    let order = Rc::new(RefCell::new(Vec::new()));

    for kind in [EventKind::Resize, EventKind::Stop, EventKind::Start] {
        let sink = Rc::clone(&order);
        app.add_event_listener(kind, move |event| sink.borrow_mut().push(event.name()));
    }
    let weak = app.downgrade();
    app.add_event_listener(EventKind::Resize, move |_| {
        if let Some(app) = weak.upgrade() {
            app.stop();
        }
    });

    app.start();

    assert_eq!(*order.borrow(), ["resize", "stop"]);
    assert!(!app.is_running());
    assert_eq!(platform.pending_frames(), 0);
}

#[test]
fn stop_inside_update_prevents_reschedule() {
    let (platform, _, app) = setup(800, 600);
    let weak = app.downgrade();
    app.add_event_listener(EventKind::Update, move |_| {
        if let Some(app) = weak.upgrade() {
            app.stop();
        }
    });
    let stops = record(&app, EventKind::Stop);

    app.start();
    platform.run_frame();

    assert!(!app.is_running());
    assert_eq!(platform.pending_frames(), 0);
    assert_eq!(stops.borrow().len(), 1);
    assert_eq!(platform.run_frame(), 0);
}

#[test]
fn restart_inside_update_leaves_a_single_pending_frame() {
    let (platform, _, app) = setup(800, 600);
    let weak = app.downgrade();
    let restarted = Rc::new(RefCell::new(false));
    let flag = Rc::clone(&restarted);

    app.add_event_listener(EventKind::Update, move |_| {
        if flag.replace(true) {
            return;
        }
        if let Some(app) = weak.upgrade() {
            app.stop();
            app.start();
        }
    });
    let updates = record(&app, EventKind::Update);

    app.start();
    platform.run_frame();
    assert!(*restarted.borrow());
    assert!(app.is_running());
    assert_eq!(platform.pending_frames(), 1);

    platform.run_frame();
    assert_eq!(updates.borrow().len(), 2);
    assert_eq!(platform.pending_frames(), 1);
}

#[test]
fn listener_removed_mid_dispatch_is_not_called() {
    let (platform, _, app) = setup(800, 600);
    let calls = Rc::new(RefCell::new(Vec::new()));

    let victim = Rc::new(RefCell::new(None));
    let victim_slot = Rc::clone(&victim);
    let weak = app.downgrade();
    let sink = Rc::clone(&calls);
    app.add_event_listener(EventKind::Update, move |_| {
        sink.borrow_mut().push("first");
        if let (Some(app), Some(handle)) = (weak.upgrade(), victim_slot.borrow_mut().take()) {
            app.remove_event_listener(handle);
        }
    });

    let sink = Rc::clone(&calls);
    let handle = app.add_event_listener(EventKind::Update, move |_| {
        sink.borrow_mut().push("second");
    });
    *victim.borrow_mut() = Some(handle);

    app.start();
    platform.run_frame();
    platform.run_frame();

    assert_eq!(*calls.borrow(), ["first", "first"]);
    assert!(app.has_event_listener("update"));
}

// ── rendering ─────────────────────────────────────────────────────────────

#[test]
fn render_while_stopped_does_not_schedule() {
    let (platform, _, app) = setup(800, 600);

    app.render();
    app.render();

    assert_eq!(app.renderer().render_count(), 2);
    assert!(!app.is_running());
    assert_eq!(platform.pending_frames(), 0);
}

#[test]
fn uniforms_reach_the_surface_each_render() {
    let (platform, time, app) = setup_with(800, 600, Some(Duration::from_millis(250)));
    app.start();
    time.advance_secs(0.5);
    platform.move_pointer(800.0, 0.0);
    platform.run_frame();

    let uniforms = app.renderer().last_uniforms().unwrap();
    assert_eq!(uniforms.screen, [800.0, 600.0]);
    assert_eq!(uniforms.pointer, [1.0, 1.0]);
    assert!(close(uniforms.time as f64, 0.5));
    assert!(close(uniforms.dt as f64, 0.25));
}
