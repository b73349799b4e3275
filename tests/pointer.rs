use ink_bloom::software::SoftwareBackend;
use ink_bloom::{BloomConfig, BloomState, FrameLoop, InputEvent, Viewport};

fn running(viewport: Viewport) -> (BloomState, FrameLoop<SoftwareBackend>) {
    let config = BloomConfig {
        demo_bloom: None,
        ..BloomConfig::default()
    };
    let mut state = BloomState::new(&config, viewport, 9);
    let mut frame = FrameLoop::new(SoftwareBackend::new(config.decay), &state, 10);
    frame.tick(&mut state, 0.0);
    (state, frame)
}

#[test]
fn initial_pointer_matches_config() {
    let config = BloomConfig::default();
    let state = BloomState::new(&config, Viewport::new(10, 10), 0);
    assert_eq!((state.pointer.x, state.pointer.y), (0.66, 0.3));
    assert!(state.pointer.clicked());
    assert!(!state.pointer.vanish);
}

#[test]
fn click_is_normalized_against_viewport() {
    let (mut state, mut frame) = running(Viewport::new(800, 400));
    state.post(InputEvent::Click { px: 200.0, py: 100.0 });
    assert_eq!(state.pending(), 1);
    frame.tick(&mut state, 16.0);
    assert_eq!(state.pending(), 0);
    assert_eq!((state.pointer.x, state.pointer.y), (0.25, 0.25));
}

#[test]
fn touch_uses_same_mapping_and_suppresses_later_clicks() {
    let (mut state, mut frame) = running(Viewport::new(100, 200));
    state.post(InputEvent::Touch { px: 50.0, py: 50.0 });
    frame.tick(&mut state, 16.0);
    assert_eq!((state.pointer.x, state.pointer.y), (0.5, 0.25));
    assert_eq!(frame.blooms(), 2);

    state.post(InputEvent::Click { px: 10.0, py: 10.0 });
    frame.tick(&mut state, 32.0);
    assert_eq!((state.pointer.x, state.pointer.y), (0.5, 0.25));
    assert_eq!(frame.blooms(), 2);
}

#[test]
fn clicks_on_empty_viewport_are_dropped() {
    let (mut state, mut frame) = running(Viewport::new(0, 0));
    state.post(InputEvent::Click { px: 5.0, py: 5.0 });
    frame.tick(&mut state, 16.0);
    assert!(!state.pointer.clicked());
    assert_eq!(frame.blooms(), 1);
}

#[test]
fn out_of_range_bloom_is_clamped() {
    let (mut state, mut frame) = running(Viewport::new(10, 10));
    state.post(InputEvent::Bloom { x: 1.4, y: -3.0 });
    frame.tick(&mut state, 16.0);
    assert_eq!(frame.uniforms().cursor, [1.0, 1.0]);
}

#[test]
fn only_one_bloom_per_tick() {
    let (mut state, mut frame) = running(Viewport::new(10, 10));
    state.post(InputEvent::Bloom { x: 0.1, y: 0.1 });
    state.post(InputEvent::Bloom { x: 0.9, y: 0.9 });
    frame.tick(&mut state, 16.0);
    assert_eq!(frame.blooms(), 2);
    let [cx, cy] = frame.uniforms().cursor;
    assert!((cx - 0.9).abs() < 1e-6 && (cy - 0.1).abs() < 1e-6);
}
