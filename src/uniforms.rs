use serde::{Deserialize, Serialize};

use crate::surfaces::Viewport;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn from_dark(dark: bool) -> Self {
        if dark {
            Theme::Dark
        } else {
            Theme::Light
        }
    }

    pub fn as_uniform(self) -> f32 {
        match self {
            Theme::Light => 0.0,
            Theme::Dark => 1.0,
        }
    }
}

/// Values handed to the effect pass, constant across every pixel of one pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EffectUniforms {
    /// Seconds since the last bloom was planted.
    pub elapsed: f32,
    pub seed: [f32; 2],
    /// Bloom centre in shading coordinates (origin bottom-left).
    pub cursor: [f32; 2],
    pub aspect_ratio: f32,
    /// 1.0 blanks the output.
    pub cleared: f32,
    pub theme: f32,
}

impl EffectUniforms {
    pub fn new(viewport: Viewport, theme: Theme) -> Self {
        Self {
            elapsed: 0.0,
            seed: [0.0, 0.0],
            cursor: [0.5, 0.5],
            aspect_ratio: viewport.aspect_ratio(),
            cleared: 0.0,
            theme: theme.as_uniform(),
        }
    }

    /// Starts a new bloom at a screen-fraction position.
    pub fn plant(&mut self, x: f32, y: f32, seed: [f32; 2]) {
        self.cursor = [x, 1.0 - y];
        self.seed = seed;
        self.elapsed = 0.0;
    }

    pub fn advance(&mut self, dt: f32) {
        if dt.is_finite() && dt > 0.0 {
            self.elapsed += dt;
        }
    }

    pub fn is_cleared(&self) -> bool {
        self.cleared >= 0.5
    }
}
