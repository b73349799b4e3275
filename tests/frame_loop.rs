use ink_bloom::software::{SoftwareBackend, SoftwareSurface};
use ink_bloom::surfaces::Surface;
use ink_bloom::{
    BloomConfig, BloomState, EffectUniforms, FrameLoop, FrameOutcome, InputEvent, RenderBackend,
    Result, SkipReason, Theme, Viewport,
};

fn quiet_config() -> BloomConfig {
    BloomConfig {
        demo_bloom: None,
        ..BloomConfig::default()
    }
}

fn setup(viewport: Viewport) -> (BloomState, FrameLoop<SoftwareBackend>) {
    let config = quiet_config();
    let state = BloomState::new(&config, viewport, 7);
    let frame = FrameLoop::new(SoftwareBackend::new(config.decay), &state, 11);
    (state, frame)
}

#[test]
fn first_tick_plants_initial_bloom() {
    let (mut state, mut frame) = setup(Viewport::new(16, 16));
    assert!(state.pointer.clicked());
    frame.tick(&mut state, 0.0);
    assert!(!state.pointer.clicked());
    assert_eq!(frame.blooms(), 1);
    assert_eq!(frame.uniforms().elapsed, 0.0);
}

#[test]
fn elapsed_accumulates_between_clicks() {
    let (mut state, mut frame) = setup(Viewport::new(16, 16));
    frame.tick(&mut state, 0.0);
    for i in 1..=20 {
        let before = frame.uniforms().elapsed;
        frame.tick(&mut state, i as f64 * 16.0);
        let after = frame.uniforms().elapsed;
        assert!((after - before - 0.016).abs() < 1e-5, "tick {i}: {before} -> {after}");
    }
}

#[test]
fn click_resets_elapsed_and_clears_flag() {
    let (mut state, mut frame) = setup(Viewport::new(100, 100));
    frame.tick(&mut state, 0.0);
    frame.tick(&mut state, 500.0);
    assert!(frame.uniforms().elapsed > 0.4);
    let old_seed = frame.uniforms().seed;

    state.post(InputEvent::Click { px: 10.0, py: 20.0 });
    frame.tick(&mut state, 516.0);

    assert_eq!(frame.uniforms().elapsed, 0.0);
    assert!(!state.pointer.clicked());
    assert_ne!(frame.uniforms().seed, old_seed);
    assert_eq!(frame.blooms(), 2);
}

#[test]
fn click_maps_to_flipped_cursor() {
    let (mut state, mut frame) = setup(Viewport::new(1000, 1000));
    frame.tick(&mut state, 0.0);
    frame.tick(&mut state, 16.0);

    state.post(InputEvent::Click { px: 660.0, py: 300.0 });
    frame.tick(&mut state, 32.0);

    let [cx, cy] = frame.uniforms().cursor;
    assert!((cx - 0.66).abs() < 1e-6);
    assert!((cy - 0.7).abs() < 1e-6);
    assert_eq!(frame.uniforms().elapsed, 0.0);
}

#[test]
fn surface_roles_alternate() {
    let (mut state, mut frame) = setup(Viewport::new(8, 8));
    let mut previous_source = None;
    for i in 0..10 {
        let outcome = frame.tick(&mut state, i as f64 * 16.0);
        let FrameOutcome::Rendered { source, target } = outcome else {
            panic!("tick {i} skipped: {outcome:?}");
        };
        assert_ne!(source, target);
        if let Some(prev) = previous_source {
            assert_ne!(source, prev);
        }
        previous_source = Some(source);
        // The surface just written is now the read-source.
        assert_eq!(frame.surfaces().unwrap().front_index(), target);
    }
    assert_eq!(frame.backend().frames(), 10);
}

#[test]
fn composite_shows_the_surface_just_written() {
    let (mut state, mut frame) = setup(Viewport::new(64, 64));
    frame.tick(&mut state, 0.0);
    frame.tick(&mut state, 400.0);

    let latest = frame.surfaces().unwrap().front();
    let presented = frame.backend().presented();
    assert_eq!(presented.len(), latest.pixels().len());
    for (shown, pixel) in presented.iter().zip(latest.pixels()) {
        assert_eq!(shown[3], pixel[3]);
    }
    assert!(presented.iter().any(|p| p[3] > 0.0));
}

#[test]
fn theme_event_updates_uniform() {
    let (mut state, mut frame) = setup(Viewport::new(8, 8));
    frame.tick(&mut state, 0.0);
    assert_eq!(frame.uniforms().theme, 0.0);
    state.post(InputEvent::Theme(Theme::Dark));
    frame.tick(&mut state, 16.0);
    assert_eq!(frame.uniforms().theme, 1.0);
}

#[test]
fn empty_viewport_skips_passes() {
    let (mut state, mut frame) = setup(Viewport::new(0, 600));
    let outcome = frame.tick(&mut state, 0.0);
    assert_eq!(outcome, FrameOutcome::Skipped(SkipReason::EmptyViewport));
    assert!(frame.surfaces().is_none());
    assert_eq!(frame.backend().frames(), 0);

    state.post(InputEvent::Resize { width: 4, height: 4 });
    assert!(matches!(frame.tick(&mut state, 16.0), FrameOutcome::Rendered { .. }));
}

#[test]
fn allocation_failure_skips_and_retries() {
    let config = quiet_config();
    let mut state = BloomState::new(&config, Viewport::new(32, 32), 1);
    let backend = SoftwareBackend::new(config.decay).with_max_dimension(16);
    let mut frame = FrameLoop::new(backend, &state, 2);

    assert_eq!(
        frame.tick(&mut state, 0.0),
        FrameOutcome::Skipped(SkipReason::SurfaceUnavailable)
    );
    assert_eq!(
        frame.tick(&mut state, 16.0),
        FrameOutcome::Skipped(SkipReason::SurfaceUnavailable)
    );

    frame.backend_mut().set_max_dimension(64);
    assert!(matches!(frame.tick(&mut state, 32.0), FrameOutcome::Rendered { .. }));
}

#[test]
fn pixel_ratio_scales_surfaces_not_aspect() {
    let (mut state, mut frame) = setup(Viewport::new(30, 20));
    state.pixel_ratio = 2.0;
    frame.tick(&mut state, 0.0);
    for surface in frame.surfaces().unwrap().iter() {
        assert_eq!(surface.viewport(), Viewport::new(60, 40));
    }
    assert_eq!(frame.uniforms().aspect_ratio, 1.5);
}

/// Wraps the software backend and records what each effect pass saw.
struct Recorder {
    inner: SoftwareBackend,
    passes: Vec<(Viewport, Viewport, f32)>,
}

impl RenderBackend for Recorder {
    type Surface = SoftwareSurface;

    fn allocate(&mut self, viewport: Viewport) -> Result<SoftwareSurface> {
        self.inner.allocate(viewport)
    }

    fn effect_pass(
        &mut self,
        source: &SoftwareSurface,
        target: &mut SoftwareSurface,
        uniforms: &EffectUniforms,
    ) {
        self.passes
            .push((source.viewport(), target.viewport(), uniforms.aspect_ratio));
        self.inner.effect_pass(source, target, uniforms);
    }

    fn composite_pass(&mut self, latest: &SoftwareSurface) {
        self.inner.composite_pass(latest);
    }
}

#[test]
fn resize_reallocates_before_next_pass() {
    let config = quiet_config();
    let mut state = BloomState::new(&config, Viewport::new(10, 10), 3);
    let recorder = Recorder {
        inner: SoftwareBackend::new(config.decay),
        passes: Vec::new(),
    };
    let mut frame = FrameLoop::new(recorder, &state, 4);
    frame.tick(&mut state, 0.0);

    state.post(InputEvent::Resize { width: 40, height: 10 });
    frame.tick(&mut state, 16.0);

    let passes = &frame.backend().passes;
    assert_eq!(passes[0], (Viewport::new(10, 10), Viewport::new(10, 10), 1.0));
    assert_eq!(passes[1], (Viewport::new(40, 10), Viewport::new(40, 10), 4.0));
    for surface in frame.surfaces().unwrap().iter() {
        assert_eq!(surface.viewport(), Viewport::new(40, 10));
    }
}

#[test]
fn clean_blanks_next_frame_then_expires() {
    let (mut state, mut frame) = setup(Viewport::new(64, 64));
    frame.tick(&mut state, 0.0);
    frame.tick(&mut state, 400.0);
    assert!(!frame.surfaces().unwrap().front().is_blank());

    state.post(InputEvent::Clean);
    frame.tick(&mut state, 416.0);
    assert_eq!(frame.uniforms().cleared, 1.0);
    assert!(frame.surfaces().unwrap().front().is_blank());
    assert!(frame.backend().presented().iter().all(|p| p[3] == 0.0));

    // Still inside the vanish window.
    frame.tick(&mut state, 432.0);
    assert!(state.pointer.vanish);

    frame.tick(&mut state, 470.0);
    assert!(!state.pointer.vanish);
    assert_eq!(frame.uniforms().cleared, 0.0);
}

#[test]
fn resize_also_cleans() {
    let (mut state, mut frame) = setup(Viewport::new(16, 16));
    frame.tick(&mut state, 0.0);
    state.post(InputEvent::Resize { width: 32, height: 16 });
    frame.tick(&mut state, 16.0);
    assert_eq!(frame.uniforms().cleared, 1.0);
}
