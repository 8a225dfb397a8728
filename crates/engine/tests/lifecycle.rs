//! Lifecycle tests driven through a manual frame host.
//!
//! The host is a spy on the scheduling primitive: every test checks how many
//! frames the engine asked for, not just what it painted.

use std::time::Duration;

use glam::Vec2;
use ripple_common::{GridDims, Viewport};
use ripple_engine::{
    Engine, EngineConfig, Environment, ManualHost, Phase, StartAbort, Tick,
};
use ripple_input::InputEvent;

const VIEWPORT: Viewport = Viewport {
    width: 160,
    height: 96,
};

fn ms(v: u64) -> Duration {
    Duration::from_millis(v)
}

fn engine_with(env: Environment) -> Engine<ManualHost> {
    Engine::new(EngineConfig::default(), env, ManualHost::new())
}

fn mounted() -> Engine<ManualHost> {
    let mut engine = engine_with(Environment::default());
    engine.mount(VIEWPORT, ms(0)).unwrap();
    engine
}

/// Fire the host's pending frame, if any, into the engine at `t` ms.
fn pump(engine: &mut Engine<ManualHost>, t: u64) -> Option<Tick> {
    engine.host_mut().fire()?;
    engine.on_frame(ms(t))
}

#[test]
fn reduced_motion_allocates_and_schedules_nothing() {
    let mut engine = engine_with(Environment {
        reduced_motion: true,
        ..Environment::default()
    });
    assert_eq!(
        engine.mount(VIEWPORT, ms(0)),
        Err(StartAbort::ReducedMotion)
    );
    assert_eq!(engine.phase(), Phase::Uninitialized);
    assert!(engine.field().is_none());
    assert_eq!(engine.host().requests(), 0);

    engine.handle(InputEvent::PointerMove(Vec2::new(40.0, 40.0)), ms(10));
    engine.wake(ms(20));
    assert_eq!(engine.on_frame(ms(30)), None);
    assert_eq!(engine.host().requests(), 0);
    assert!(engine.buffer_lens().is_none());
}

#[test]
fn missing_surface_aborts_quietly() {
    let mut engine = engine_with(Environment {
        surface_available: false,
        ..Environment::default()
    });
    assert_eq!(
        engine.mount(VIEWPORT, ms(0)),
        Err(StartAbort::SurfaceUnavailable)
    );
    assert!(engine.field().is_none());
    assert_eq!(engine.host().requests(), 0);
}

#[test]
fn goes_idle_then_wakes_with_exactly_one_request() {
    let mut engine = mounted();

    let mut stopped_at = None;
    for t in (0..=6000).step_by(16) {
        if let Some(Tick::Stop) = pump(&mut engine, t) {
            stopped_at = Some(t);
        }
    }
    let stopped_at = stopped_at.expect("loop never went idle");
    assert!(stopped_at >= 4000 && stopped_at < 4000 + 16);
    assert_eq!(engine.phase(), Phase::Idle);
    assert!(engine.host().pending().is_none());
    assert_eq!(engine.stats().idle_stops, 1);

    let requests = engine.host().requests();
    for t in (6000..8000).step_by(16) {
        assert_eq!(pump(&mut engine, t), None);
    }
    assert_eq!(engine.host().requests(), requests);

    engine.handle(InputEvent::PointerMove(Vec2::new(80.0, 48.0)), ms(8000));
    engine.handle(InputEvent::PointerMove(Vec2::new(81.0, 48.0)), ms(8001));
    engine.handle(InputEvent::Scroll(30.0), ms(8002));
    assert_eq!(engine.host().requests(), requests + 1);
    assert_eq!(engine.phase(), Phase::Running);
    assert_eq!(engine.stats().wakes, 1);

    assert_eq!(pump(&mut engine, 8010), Some(Tick::Stepped));
}

#[test]
fn pointer_leave_does_not_wake() {
    let mut engine = mounted();
    pump(&mut engine, 5000);
    assert_eq!(engine.phase(), Phase::Idle);
    let requests = engine.host().requests();

    engine.handle(InputEvent::PointerLeave, ms(5100));
    engine.handle(InputEvent::TouchEnd, ms(5200));
    assert_eq!(engine.host().requests(), requests);
    assert_eq!(engine.phase(), Phase::Idle);
}

#[test]
fn hidden_frames_do_no_work_but_keep_the_loop_alive() {
    let mut engine = mounted();
    engine.handle(InputEvent::Visibility(false), ms(0));

    for t in (0..500).step_by(50) {
        assert_eq!(pump(&mut engine, t), Some(Tick::Hidden));
        assert!(engine.host().pending().is_some());
    }
    assert_eq!(engine.stats().steps, 0);
    assert_eq!(engine.stats().hidden, 10);
    assert!(engine.frame().is_none());

    let requests = engine.host().requests();
    engine.handle(InputEvent::Visibility(true), ms(500));
    assert_eq!(engine.host().requests(), requests);
    assert_eq!(pump(&mut engine, 510), Some(Tick::Stepped));
}

#[test]
fn callbacks_faster_than_the_cap_are_throttled() {
    let mut engine = mounted();
    let interval = engine.config().frame_interval();

    let mut stepped = Vec::new();
    for t in (0..=1000).step_by(10) {
        if pump(&mut engine, t) == Some(Tick::Stepped) {
            stepped.push(ms(t));
        }
    }

    let limit = (1000 / interval.as_millis() + 1) as usize;
    assert!(stepped.len() <= limit, "{} steps", stepped.len());
    assert!(stepped.len() >= limit / 2);
    for pair in stepped.windows(2) {
        assert!(pair[1] - pair[0] >= interval);
    }
    assert_eq!(engine.stats().steps as usize, stepped.len());
    assert!(engine.stats().throttled > 0);
    assert_eq!(engine.timer().count(), stepped.len());
}

#[test]
fn destroy_cancels_the_pending_frame() {
    let mut engine = mounted();
    pump(&mut engine, 0);
    assert!(engine.host().pending().is_some());

    engine.destroy();
    assert_eq!(engine.phase(), Phase::Destroyed);
    assert_eq!(engine.host().cancellations(), 1);
    assert!(engine.host().pending().is_none());
    assert!(engine.field().is_none());

    let requests = engine.host().requests();
    engine.handle(InputEvent::PointerMove(Vec2::new(10.0, 10.0)), ms(100));
    engine.handle(InputEvent::Visibility(true), ms(110));
    engine.wake(ms(120));
    assert_eq!(engine.on_frame(ms(130)), None);
    assert_eq!(engine.host().requests(), requests);

    engine.destroy();
    assert_eq!(engine.host().cancellations(), 1);
}

#[test]
fn resize_reallocates_field_and_frame_together() {
    let mut engine = mounted();
    pump(&mut engine, 0);
    engine.handle(InputEvent::Resize(Viewport::new(333, 101)), ms(10));

    let dims = GridDims::new(42, 13);
    assert_eq!(engine.field().unwrap().dims(), dims);
    assert_eq!(engine.buffer_lens(), Some((dims.len(), dims.len(), dims.len())));
    assert_eq!(engine.stats().resizes, 1);

    engine.handle(InputEvent::PointerMove(Vec2::new(300.0, 50.0)), ms(20));
    pump(&mut engine, 40);
    let frame = engine.frame().unwrap();
    assert_eq!(frame.dims(), dims);
    assert_eq!(frame.as_bytes().len(), dims.len() * 4);
}

#[test]
fn touch_devices_use_the_coarser_grid_without_caustics() {
    let mut touch = engine_with(Environment {
        touch_capable: true,
        ..Environment::default()
    });
    touch.mount(VIEWPORT, ms(0)).unwrap();
    assert_eq!(touch.field().unwrap().dims(), GridDims::new(14, 8));

    pump(&mut touch, 0);
    let frame = touch.frame().unwrap();
    assert!(frame.pixels().iter().all(|p| p.a == 0));

    let mut desktop = mounted();
    pump(&mut desktop, 0);
    assert_eq!(desktop.field().unwrap().dims(), GridDims::new(20, 12));
    assert!(desktop.frame().unwrap().pixels().iter().any(|p| p.a > 0));
}

#[test]
fn ambient_drops_keep_an_untouched_field_moving() {
    let mut engine = mounted();
    for t in (0..=1200).step_by(40) {
        pump(&mut engine, t);
    }
    assert!(engine.field().unwrap().energy() > 0.0);
}

#[test]
fn engines_are_independent() {
    let mut a = mounted();
    let mut b = engine_with(Environment::default());
    b.mount(Viewport::new(64, 64), ms(0)).unwrap();

    a.handle(InputEvent::PointerMove(Vec2::new(80.0, 48.0)), ms(1));
    pump(&mut a, 1);
    pump(&mut b, 1);
    assert!(a.field().unwrap().energy() > 0.0);
    assert_eq!(b.field().unwrap().energy(), 0.0);

    a.destroy();
    assert_eq!(pump(&mut b, 50), Some(Tick::Stepped));
    assert_eq!(b.phase(), Phase::Running);
    assert_eq!(b.host().cancellations(), 0);
}
