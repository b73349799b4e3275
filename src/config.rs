use serde::{Deserialize, Serialize};

use crate::error::{BloomError, Result};
use crate::uniforms::Theme;

/// A bloom planted once, a fixed delay after the first frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DemoBloom {
    pub delay_ms: f64,
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BloomConfig {
    pub canvas_id: String,
    pub auto_bloom_period_ms: f64,
    pub vanish_ms: f64,
    pub max_pixel_ratio: f32,
    pub initial_pointer: (f32, f32),
    #[serde(skip_serializing_if = "Option::is_none")]
    pub demo_bloom: Option<DemoBloom>,
    pub theme: Theme,
    /// Alpha kept per frame by the effect pass.
    pub decay: f32,
}

impl Default for BloomConfig {
    fn default() -> Self {
        Self {
            canvas_id: "canvas".to_string(),
            auto_bloom_period_ms: 400.0,
            vanish_ms: 50.0,
            max_pixel_ratio: 2.0,
            initial_pointer: (0.66, 0.3),
            demo_bloom: Some(DemoBloom {
                delay_ms: 700.0,
                x: 0.75,
                y: 0.5,
            }),
            theme: Theme::Light,
            decay: 0.985,
        }
    }
}

impl BloomConfig {
    pub fn validate(&self) -> Result<()> {
        if self.canvas_id.is_empty() {
            return Err(invalid("canvasId must not be empty"));
        }
        if !(self.auto_bloom_period_ms.is_finite() && self.auto_bloom_period_ms > 0.0) {
            return Err(invalid("autoBloomPeriodMs must be a positive number"));
        }
        if !(self.vanish_ms.is_finite() && self.vanish_ms >= 0.0) {
            return Err(invalid("vanishMs must be non-negative"));
        }
        if !(self.max_pixel_ratio.is_finite() && self.max_pixel_ratio > 0.0) {
            return Err(invalid("maxPixelRatio must be a positive number"));
        }
        if !(self.decay > 0.0 && self.decay <= 1.0) {
            return Err(invalid("decay must be in (0, 1]"));
        }
        if let Some(demo) = &self.demo_bloom {
            if !(demo.delay_ms.is_finite() && demo.delay_ms >= 0.0) {
                return Err(invalid("demoBloom.delayMs must be non-negative"));
            }
        }
        Ok(())
    }

    /// Device pixel ratio clamped to the configured ceiling.
    pub fn pixel_ratio(&self, device_pixel_ratio: f64) -> f32 {
        let dpr = device_pixel_ratio as f32;
        if dpr.is_finite() && dpr > 0.0 {
            dpr.min(self.max_pixel_ratio)
        } else {
            1.0
        }
    }
}

fn invalid(msg: &str) -> BloomError {
    BloomError::InvalidConfig(msg.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        BloomConfig::default().validate().unwrap();
    }

    #[test]
    fn pixel_ratio_is_capped() {
        let config = BloomConfig::default();
        assert_eq!(config.pixel_ratio(3.0), 2.0);
        assert_eq!(config.pixel_ratio(1.5), 1.5);
        assert_eq!(config.pixel_ratio(f64::NAN), 1.0);
    }
}
