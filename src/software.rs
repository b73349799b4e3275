//! CPU reference renderer with the same per-pixel rules as the shaders.

use std::f32::consts::TAU;

use crate::backend::RenderBackend;
use crate::error::{BloomError, Result};
use crate::surfaces::{Surface, Viewport};
use crate::uniforms::EffectUniforms;

pub const GROW_SECONDS: f32 = 1.2;
pub const MAX_RADIUS: f32 = 0.12;
/// One 8-bit alpha step, so faded trails reach zero on RGBA8 targets.
pub const FADE_STEP: f32 = 1.0 / 255.0;

const LIGHT_CORE: [f32; 3] = [0.10, 0.12, 0.35];
const LIGHT_EDGE: [f32; 3] = [0.85, 0.25, 0.45];
const DARK_CORE: [f32; 3] = [0.95, 0.80, 0.55];
const DARK_EDGE: [f32; 3] = [0.35, 0.75, 0.95];

pub type Rgba = [f32; 4];

/// Straight-alpha RGBA pixels, row 0 at the bottom.
#[derive(Debug, Clone, PartialEq)]
pub struct SoftwareSurface {
    viewport: Viewport,
    pixels: Vec<Rgba>,
}

impl SoftwareSurface {
    pub fn new(viewport: Viewport) -> Self {
        let len = viewport.width as usize * viewport.height as usize;
        Self {
            viewport,
            pixels: vec![[0.0; 4]; len],
        }
    }

    pub fn pixels(&self) -> &[Rgba] {
        &self.pixels
    }

    pub fn fill(&mut self, rgba: Rgba) {
        self.pixels.fill(rgba);
    }

    pub fn get(&self, x: u32, y: u32) -> Rgba {
        self.pixels[self.index(x, y)]
    }

    pub fn set(&mut self, x: u32, y: u32, rgba: Rgba) {
        let idx = self.index(x, y);
        self.pixels[idx] = rgba;
    }

    pub fn is_blank(&self) -> bool {
        self.pixels.iter().all(|p| p.iter().all(|c| *c == 0.0))
    }

    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.viewport.width as usize + x as usize
    }

    /// Nearest-texel lookup, clamped to the edge.
    fn sample(&self, u: f32, v: f32) -> Rgba {
        if self.pixels.is_empty() {
            return [0.0; 4];
        }
        let w = self.viewport.width;
        let h = self.viewport.height;
        let x = ((u * w as f32) as i64).clamp(0, w as i64 - 1) as u32;
        let y = ((v * h as f32) as i64).clamp(0, h as i64 - 1) as u32;
        self.get(x, y)
    }
}

impl Surface for SoftwareSurface {
    fn viewport(&self) -> Viewport {
        self.viewport
    }
}

#[derive(Debug, Clone)]
pub struct SoftwareBackend {
    decay: f32,
    max_dimension: u32,
    presented: Vec<Rgba>,
    presented_size: Viewport,
    frames: u64,
}

impl SoftwareBackend {
    pub fn new(decay: f32) -> Self {
        Self {
            decay,
            max_dimension: 4096,
            presented: Vec::new(),
            presented_size: Viewport::default(),
            frames: 0,
        }
    }

    /// Surfaces wider or taller than this fail to allocate.
    pub fn with_max_dimension(mut self, max_dimension: u32) -> Self {
        self.max_dimension = max_dimension;
        self
    }

    pub fn set_max_dimension(&mut self, max_dimension: u32) {
        self.max_dimension = max_dimension;
    }

    /// Premultiplied pixels shown by the last composite pass.
    pub fn presented(&self) -> &[Rgba] {
        &self.presented
    }

    pub fn presented_size(&self) -> Viewport {
        self.presented_size
    }

    /// Composite passes run so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }
}

impl RenderBackend for SoftwareBackend {
    type Surface = SoftwareSurface;

    fn allocate(&mut self, viewport: Viewport) -> Result<SoftwareSurface> {
        let reason = if viewport.is_empty() {
            Some("empty viewport".to_string())
        } else if viewport.width > self.max_dimension || viewport.height > self.max_dimension {
            Some(format!("limit is {0}x{0}", self.max_dimension))
        } else {
            None
        };
        if let Some(reason) = reason {
            return Err(BloomError::SurfaceAllocation { viewport, reason });
        }
        Ok(SoftwareSurface::new(viewport))
    }

    fn effect_pass(
        &mut self,
        source: &SoftwareSurface,
        target: &mut SoftwareSurface,
        uniforms: &EffectUniforms,
    ) {
        let Viewport { width, height } = target.viewport;
        for y in 0..height {
            for x in 0..width {
                let u = (x as f32 + 0.5) / width as f32;
                let v = (y as f32 + 0.5) / height as f32;
                let prev = source.sample(u, v);
                let out = shade([u, v], prev, uniforms, self.decay);
                target.set(x, y, out);
            }
        }
    }

    fn composite_pass(&mut self, latest: &SoftwareSurface) {
        self.presented.clear();
        self.presented.extend(
            latest
                .pixels
                .iter()
                .map(|[r, g, b, a]| [r * a, g * a, b * a, *a]),
        );
        self.presented_size = latest.viewport;
        self.frames += 1;
    }
}

/// One pixel of the effect pass.
pub fn shade(uv: [f32; 2], prev: Rgba, uniforms: &EffectUniforms, decay: f32) -> Rgba {
    if uniforms.is_cleared() {
        return [0.0; 4];
    }
    let faded_alpha = (prev[3] * decay - FADE_STEP).max(0.0);

    let dx = (uv[0] - uniforms.cursor[0]) * uniforms.aspect_ratio;
    let dy = uv[1] - uniforms.cursor[1];
    let ink = bloom_ink(dx, dy, uniforms);

    let t = ((dx * dx + dy * dy).sqrt() / MAX_RADIUS).clamp(0.0, 1.0);
    let core = mix3(LIGHT_CORE, DARK_CORE, uniforms.theme);
    let edge = mix3(LIGHT_EDGE, DARK_EDGE, uniforms.theme);
    let color = mix3([prev[0], prev[1], prev[2]], mix3(core, edge, t), ink);
    [color[0], color[1], color[2], faded_alpha.max(ink)]
}

/// Ink coverage of the growing bloom at an aspect-corrected offset.
pub fn bloom_ink(dx: f32, dy: f32, uniforms: &EffectUniforms) -> f32 {
    let elapsed = uniforms.elapsed;
    if elapsed >= GROW_SECONDS {
        return 0.0;
    }
    let [sx, sy] = uniforms.seed;
    let dist = (dx * dx + dy * dy).sqrt();
    let angle = dy.atan2(dx);
    let petals = 5.0 + (sy * 4.0).floor();
    let wobble = 1.0
        + 0.3 * (angle * petals + sx * TAU).sin()
        + 0.1 * (angle * (2.0 * petals + 1.0) + sy * TAU).sin();
    let radius = MAX_RADIUS * wobble * (elapsed.max(0.0) / GROW_SECONDS).sqrt();
    if radius <= 0.0 {
        return 0.0;
    }
    1.0 - smoothstep(radius * 0.6, radius, dist)
}

fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    if edge1 <= edge0 {
        return if x < edge0 { 0.0 } else { 1.0 };
    }
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

fn mix3(a: [f32; 3], b: [f32; 3], t: f32) -> [f32; 3] {
    [
        a[0] + (b[0] - a[0]) * t,
        a[1] + (b[1] - a[1]) * t,
        a[2] + (b[2] - a[2]) * t,
    ]
}
