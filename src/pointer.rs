/// Normalized cursor plus the two one-shot flags the frame loop reads.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerState {
    pub x: f32,
    pub y: f32,
    clicked: bool,
    pub vanish: bool,
}

impl PointerState {
    /// A pointer at `(x, y)` with a pending click, so the first frame plants a bloom.
    pub fn armed(x: f32, y: f32) -> Self {
        let mut pointer = Self {
            x: 0.0,
            y: 0.0,
            clicked: false,
            vanish: false,
        };
        pointer.press(x, y);
        pointer
    }

    /// Moves the pointer and raises `clicked`. Coordinates are clamped to `[0, 1]`.
    pub fn press(&mut self, x: f32, y: f32) {
        self.x = clamp_unit(x);
        self.y = clamp_unit(y);
        self.clicked = true;
    }

    pub fn clicked(&self) -> bool {
        self.clicked
    }

    /// Consumes a pending click. Only the frame loop calls this.
    pub(crate) fn take_click(&mut self) -> Option<(f32, f32)> {
        if std::mem::take(&mut self.clicked) {
            Some((self.x, self.y))
        } else {
            None
        }
    }
}

fn clamp_unit(v: f32) -> f32 {
    if v.is_nan() {
        0.5
    } else {
        v.clamp(0.0, 1.0)
    }
}
