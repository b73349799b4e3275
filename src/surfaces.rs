//! Viewport sizing and the ping-pong surface arena.

/// A pixel size. Zero in either dimension means nothing can be drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Width over height, or 1.0 for an empty viewport.
    pub fn aspect_ratio(&self) -> f32 {
        if self.is_empty() {
            1.0
        } else {
            self.width as f32 / self.height as f32
        }
    }

    /// Physical size for a device pixel ratio.
    pub fn scaled(&self, pixel_ratio: f32) -> Viewport {
        let ratio = if pixel_ratio.is_finite() && pixel_ratio > 0.0 {
            pixel_ratio
        } else {
            1.0
        };
        Viewport {
            width: (self.width as f32 * ratio).round() as u32,
            height: (self.height as f32 * ratio).round() as u32,
        }
    }

    /// Maps a pixel position to screen fractions (origin top-left).
    pub fn normalize(&self, px: f32, py: f32) -> Option<(f32, f32)> {
        if self.is_empty() {
            return None;
        }
        Some((px / self.width as f32, py / self.height as f32))
    }
}

/// Anything the frame loop can hold in the arena.
pub trait Surface {
    fn viewport(&self) -> Viewport;
}

/// Two surfaces used alternately as read-source and write-target.
///
/// `front` is the surface the next effect pass reads; the other one is
/// written. [`PingPong::swap`] only toggles the index.
#[derive(Debug)]
pub struct PingPong<S> {
    surfaces: [S; 2],
    front: usize,
}

impl<S> PingPong<S> {
    pub fn new(first: S, second: S) -> Self {
        Self {
            surfaces: [first, second],
            front: 0,
        }
    }

    pub fn front_index(&self) -> usize {
        self.front
    }

    pub fn back_index(&self) -> usize {
        1 - self.front
    }

    pub fn front(&self) -> &S {
        &self.surfaces[self.front]
    }

    pub fn back(&self) -> &S {
        &self.surfaces[self.back_index()]
    }

    /// Borrow the read-source and the write-target at once.
    pub fn split(&mut self) -> (&S, &mut S) {
        let (first, second) = self.surfaces.split_at_mut(1);
        if self.front == 0 {
            (&first[0], &mut second[0])
        } else {
            (&second[0], &mut first[0])
        }
    }

    pub fn swap(&mut self) {
        self.front = self.back_index();
    }

    pub fn iter(&self) -> impl Iterator<Item = &S> {
        self.surfaces.iter()
    }

    pub fn into_inner(self) -> [S; 2] {
        self.surfaces
    }
}
