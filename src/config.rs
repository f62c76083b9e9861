use std::time::Duration;

use crate::driver::{AnimationDriver, FrameTimer, TICK_INTERVAL};
use crate::error::ConfigError;
use crate::render::compositor::{ColorPalette, ColorPick, Compositor};
use crate::render::glyph::GlyphPalette;
use crate::render::{Canvas, Renderer, REFERENCE_HEIGHT, REFERENCE_WIDTH};
use crate::rotation::{DELTA_A, DELTA_B};

/// Everything fixed at construction time.
#[derive(Debug, Clone, PartialEq)]
pub struct DonutConfig {
    pub width: usize,
    pub height: usize,
    pub interval: Duration,
    pub delta_a: f32,
    pub delta_b: f32,
    pub glyphs: String,
    pub colors: String,
    pub random_colors: bool,
    pub seed: Option<u64>,
}

impl Default for DonutConfig {
    fn default() -> Self {
        Self {
            width: REFERENCE_WIDTH,
            height: REFERENCE_HEIGHT,
            interval: TICK_INTERVAL,
            delta_a: DELTA_A,
            delta_b: DELTA_B,
            glyphs: "531".to_string(),
            colors: "white".to_string(),
            random_colors: false,
            seed: None,
        }
    }
}

impl DonutConfig {
    pub fn canvas(&self) -> Result<Canvas, ConfigError> {
        Canvas::new(self.width, self.height)
    }

    /// Validates every setting and assembles a stopped driver.
    pub fn build_driver(&self) -> Result<AnimationDriver, ConfigError> {
        let canvas = self.canvas()?;
        let glyphs = GlyphPalette::named(&self.glyphs)?;
        let palette = ColorPalette::named(&self.colors)?;
        let compositor = if self.random_colors {
            Compositor::new(palette, ColorPick::random(self.seed))
        } else {
            Compositor::first(palette)
        };
        let timer = FrameTimer::new(self.interval)?;

        tracing::debug!(
            width = canvas.width(),
            height = canvas.height(),
            interval_ms = self.interval.as_millis() as u64,
            delta_a = self.delta_a,
            delta_b = self.delta_b,
            glyphs = %self.glyphs,
            colors = %self.colors,
            random_colors = self.random_colors,
            "configuration accepted"
        );

        let renderer = Renderer::new(canvas, glyphs, compositor);
        AnimationDriver::new(renderer, timer).with_increments(self.delta_a, self.delta_b)
    }
}
