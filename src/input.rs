use std::collections::VecDeque;

use crate::uniforms::Theme;

/// Everything the outside world can tell the bloom core.
///
/// Real listeners and the auto-bloom timer post into the same queue, so a
/// synthetic bloom takes exactly the path a click does.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Mouse click at a viewport pixel position.
    Click { px: f32, py: f32 },
    /// First touch point of a touch-start, in viewport pixels.
    Touch { px: f32, py: f32 },
    /// Bloom at screen fractions, already normalized.
    Bloom { x: f32, y: f32 },
    Clean,
    Resize { width: u32, height: u32 },
    Theme(Theme),
}

#[derive(Debug, Default)]
pub struct InputQueue {
    events: VecDeque<InputEvent>,
}

impl InputQueue {
    pub fn push(&mut self, event: InputEvent) {
        self.events.push_back(event);
    }

    pub fn pop(&mut self) -> Option<InputEvent> {
        self.events.pop_front()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
