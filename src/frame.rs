//! Input-side state and the per-refresh tick that drives both passes.

use log::{debug, info, warn};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::backend::RenderBackend;
use crate::config::BloomConfig;
use crate::error::Result;
use crate::input::{InputEvent, InputQueue};
use crate::pointer::PointerState;
use crate::schedule::{AutoBloom, OneShot, VanishTimer};
use crate::surfaces::{PingPong, Surface, Viewport};
use crate::uniforms::{EffectUniforms, Theme};

/// Everything input handlers mutate between ticks.
#[derive(Debug)]
pub struct BloomState {
    pub pointer: PointerState,
    /// Logical (CSS pixel) viewport; clicks are normalized against it.
    pub viewport: Viewport,
    pub pixel_ratio: f32,
    pub theme: Theme,
    queue: InputQueue,
    auto_bloom: AutoBloom,
    vanish: VanishTimer,
    demo: Option<(OneShot, f32, f32)>,
    touch_seen: bool,
    rng: SmallRng,
}

impl BloomState {
    pub fn new(config: &BloomConfig, viewport: Viewport, seed: u64) -> Self {
        let (x, y) = config.initial_pointer;
        Self {
            pointer: PointerState::armed(x, y),
            viewport,
            pixel_ratio: 1.0,
            theme: config.theme,
            queue: InputQueue::default(),
            auto_bloom: AutoBloom::new(config.auto_bloom_period_ms),
            vanish: VanishTimer::new(config.vanish_ms),
            demo: config
                .demo_bloom
                .map(|demo| (OneShot::new(demo.delay_ms), demo.x, demo.y)),
            touch_seen: false,
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    pub fn post(&mut self, event: InputEvent) {
        self.queue.push(event);
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    pub fn auto_bloom_running(&self) -> bool {
        self.auto_bloom.is_running()
    }

    /// Returns whether auto-bloom is running after the toggle.
    pub fn toggle_auto_bloom(&mut self, now: f64) -> bool {
        let running = self.auto_bloom.toggle(now);
        info!("auto-bloom {}", if running { "started" } else { "stopped" });
        running
    }

    pub fn set_auto_bloom(&mut self, enabled: bool, now: f64) {
        if enabled {
            self.auto_bloom.start(now);
        } else {
            self.auto_bloom.cancel();
        }
    }

    fn poll_timers(&mut self, now: f64) {
        if self.vanish.expired(now) {
            self.pointer.vanish = false;
        }
        if let Some((timer, x, y)) = self.demo.as_mut() {
            if timer.poll(now) {
                let bloom = InputEvent::Bloom { x: *x, y: *y };
                self.demo = None;
                self.queue.push(bloom);
            }
        }
        if self.auto_bloom.poll(now) {
            let (x, y) = (self.rng.gen::<f32>(), self.rng.gen::<f32>());
            self.queue.push(InputEvent::Bloom { x, y });
        }
    }

    fn apply_events(&mut self, now: f64) {
        while let Some(event) = self.queue.pop() {
            self.apply(event, now);
        }
    }

    fn apply(&mut self, event: InputEvent, now: f64) {
        match event {
            InputEvent::Click { px, py } => {
                // Touch devices follow a touch-start with a synthetic click.
                if self.touch_seen {
                    return;
                }
                if let Some((x, y)) = self.viewport.normalize(px, py) {
                    self.pointer.press(x, y);
                }
            }
            InputEvent::Touch { px, py } => {
                self.touch_seen = true;
                if let Some((x, y)) = self.viewport.normalize(px, py) {
                    self.pointer.press(x, y);
                }
            }
            InputEvent::Bloom { x, y } => self.pointer.press(x, y),
            InputEvent::Clean => self.clean(now),
            InputEvent::Resize { width, height } => {
                self.viewport = Viewport::new(width, height);
                self.clean(now);
            }
            InputEvent::Theme(theme) => self.theme = theme,
        }
    }

    fn clean(&mut self, now: f64) {
        self.pointer.vanish = true;
        self.vanish.arm(now);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    EmptyViewport,
    SurfaceUnavailable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    /// Indices into the surface pair read and written by the effect pass.
    Rendered { source: usize, target: usize },
    Skipped(SkipReason),
}

/// Owns the backend, the surface pair, and the effect uniforms.
pub struct FrameLoop<B: RenderBackend> {
    backend: B,
    surfaces: Option<PingPong<B::Surface>>,
    uniforms: EffectUniforms,
    rng: SmallRng,
    last_tick: Option<f64>,
    blooms: u64,
    allocation_failed: bool,
}

impl<B: RenderBackend> FrameLoop<B> {
    pub fn new(backend: B, state: &BloomState, seed: u64) -> Self {
        Self {
            backend,
            surfaces: None,
            uniforms: EffectUniforms::new(state.viewport, state.theme),
            rng: SmallRng::seed_from_u64(seed),
            last_tick: None,
            blooms: 0,
            allocation_failed: false,
        }
    }

    pub fn uniforms(&self) -> &EffectUniforms {
        &self.uniforms
    }

    pub fn surfaces(&self) -> Option<&PingPong<B::Surface>> {
        self.surfaces.as_ref()
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// Number of blooms planted so far.
    pub fn blooms(&self) -> u64 {
        self.blooms
    }

    /// Runs one frame at `now` (milliseconds).
    pub fn tick(&mut self, state: &mut BloomState, now: f64) -> FrameOutcome {
        let dt = match self.last_tick.replace(now) {
            Some(prev) => ((now - prev) / 1000.0).max(0.0) as f32,
            None => 0.0,
        };

        state.poll_timers(now);
        state.apply_events(now);
        self.sync_viewport(state);

        match state.pointer.take_click() {
            Some((x, y)) => {
                let seed = [self.rng.gen::<f32>(), self.rng.gen::<f32>()];
                self.uniforms.plant(x, y, seed);
                self.blooms += 1;
                debug!("bloom at ({x:.3}, {y:.3})");
            }
            None => self.uniforms.advance(dt),
        }
        self.uniforms.cleared = if state.pointer.vanish { 1.0 } else { 0.0 };
        self.uniforms.theme = state.theme.as_uniform();

        if state.viewport.is_empty() {
            return FrameOutcome::Skipped(SkipReason::EmptyViewport);
        }
        let Some(surfaces) = self.surfaces.as_mut() else {
            return FrameOutcome::Skipped(SkipReason::SurfaceUnavailable);
        };

        let source = surfaces.front_index();
        let target = surfaces.back_index();
        {
            let (read, write) = surfaces.split();
            self.backend.effect_pass(read, write, &self.uniforms);
        }
        self.backend.composite_pass(surfaces.back());
        surfaces.swap();
        FrameOutcome::Rendered { source, target }
    }

    /// Reallocates both surfaces when the physical size changed, or retries
    /// after an earlier failure.
    fn sync_viewport(&mut self, state: &BloomState) {
        self.uniforms.aspect_ratio = state.viewport.aspect_ratio();
        let size = state.viewport.scaled(state.pixel_ratio);

        let current = self.surfaces.as_ref().map(|pair| pair.front().viewport());
        if current == Some(size) {
            return;
        }
        if let Some(pair) = self.surfaces.take() {
            let [a, b] = pair.into_inner();
            self.backend.release(a);
            self.backend.release(b);
        }
        if size.is_empty() {
            return;
        }

        match self.allocate_pair(size) {
            Ok(pair) => {
                info!("allocated {}x{} surfaces", size.width, size.height);
                self.surfaces = Some(pair);
                self.allocation_failed = false;
            }
            Err(err) => {
                if !self.allocation_failed {
                    warn!("skipping frames until surfaces can be allocated: {err}");
                }
                self.allocation_failed = true;
            }
        }
    }

    fn allocate_pair(&mut self, size: Viewport) -> Result<PingPong<B::Surface>> {
        let first = self.backend.allocate(size)?;
        match self.backend.allocate(size) {
            Ok(second) => Ok(PingPong::new(first, second)),
            Err(err) => {
                self.backend.release(first);
                Err(err)
            }
        }
    }
}
