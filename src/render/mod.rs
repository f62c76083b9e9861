pub mod compositor;
pub mod frame;
pub mod glyph;
pub mod hud;
pub mod pipeline;
pub mod rasterizer;

use std::time::Instant;

use crate::driver::AnimationDriver;
use crate::error::ConfigError;
use crate::rotation::Rotation;
use crate::torus::Torus;
use compositor::{Compositor, Frame};
use crossterm::style::Color;
use glyph::GlyphPalette;
use pipeline::Projection;

pub const REFERENCE_WIDTH: usize = 80;
pub const REFERENCE_HEIGHT: usize = 22;
/// Largest accepted canvas, in cells. Far beyond any real terminal.
pub const MAX_CANVAS_CELLS: usize = 1 << 22;

/// Depth-buffer value meaning "nothing drawn here yet". Inverse depth is
/// always positive for the torus, so any real sample beats it.
pub const DEPTH_FAR: f32 = 0.0;
pub const BLANK: char = ' ';
/// Upper bound on how long the host loop sleeps, so input stays responsive.
pub const MAX_IDLE: std::time::Duration = std::time::Duration::from_millis(10);

pub fn rgb_to_ansi256(r: u8, g: u8, b: u8) -> u8 {
    if r == g && g == b {
        if r < 8 {
            return 16;
        }
        if r > 248 {
            return 231;
        }
        return 232 + ((r as f32 - 8.0) / 247.0 * 24.0) as u8;
    }
    let ri = (r as f32 / 255.0 * 5.0 + 0.5) as u8;
    let gi = (g as f32 / 255.0 * 5.0 + 0.5) as u8;
    let bi = (b as f32 / 255.0 * 5.0 + 0.5) as u8;
    16 + 36 * ri + 6 * gi + bi
}

pub fn make_color(rgb: [u8; 3], use_truecolor: bool) -> Color {
    let [r, g, b] = rgb;
    if use_truecolor {
        Color::Rgb { r, g, b }
    } else {
        Color::AnsiValue(rgb_to_ansi256(r, g, b))
    }
}

// --- Canvas ---

/// Fixed character grid the torus is drawn onto.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Canvas {
    width: usize,
    height: usize,
}

impl Canvas {
    pub fn new(width: usize, height: usize) -> Result<Self, ConfigError> {
        if width == 0 || height == 0 {
            return Err(ConfigError::EmptyCanvas { width, height });
        }
        match width.checked_mul(height) {
            Some(cells) if cells <= MAX_CANVAS_CELLS => Ok(Self { width, height }),
            _ => Err(ConfigError::CanvasTooLarge {
                width,
                height,
                max: MAX_CANVAS_CELLS,
            }),
        }
    }

    #[cfg(test)]
    pub fn reference() -> Self {
        Self {
            width: REFERENCE_WIDTH,
            height: REFERENCE_HEIGHT,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn len(&self) -> usize {
        self.width * self.height
    }

    /// Row-major cell index, or `None` when `(x, y)` lies off the canvas.
    pub fn cell_index(&self, x: i32, y: i32) -> Option<usize> {
        let x = usize::try_from(x).ok()?;
        let y = usize::try_from(y).ok()?;
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(y * self.width + x)
    }
}

// --- Frame-scoped buffers ---

#[derive(Debug, Clone, PartialEq)]
pub struct RenderState {
    pub canvas: Canvas,
    pub depth_buffer: Vec<f32>,
    pub glyphs: Vec<char>,
}

impl RenderState {
    pub fn new(canvas: Canvas) -> Self {
        Self {
            canvas,
            depth_buffer: vec![DEPTH_FAR; canvas.len()],
            glyphs: vec![BLANK; canvas.len()],
        }
    }
}

// --- Render pass ---

/// One full sampler -> projector -> resolver -> mapper -> compositor pass.
#[derive(Debug)]
pub struct Renderer {
    canvas: Canvas,
    torus: Torus,
    projection: Projection,
    glyphs: GlyphPalette,
    compositor: Compositor,
}

impl Renderer {
    pub fn new(canvas: Canvas, glyphs: GlyphPalette, compositor: Compositor) -> Self {
        Self {
            canvas,
            torus: Torus::default(),
            projection: Projection::for_canvas(canvas),
            glyphs,
            compositor,
        }
    }

    #[cfg(test)]
    pub fn with_projection(mut self, projection: Projection) -> Self {
        self.projection = projection;
        self
    }

    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    #[cfg(test)]
    pub fn projection(&self) -> &Projection {
        &self.projection
    }

    pub fn torus(&self) -> &Torus {
        &self.torus
    }

    /// Fills fresh depth and character buffers for `rotation`.
    pub fn rasterize(&self, rotation: Rotation) -> RenderState {
        let mut state = RenderState::new(self.canvas);
        rasterizer::rasterize_torus(
            pipeline::project_samples(&self.torus, rotation, &self.projection),
            &mut state,
            &self.glyphs,
        );
        state
    }

    pub fn render(&mut self, rotation: Rotation) -> Frame {
        let state = self.rasterize(rotation);
        self.compositor.compose(state)
    }
}

// --- Host state ---

#[derive(Debug)]
pub struct AppState {
    pub driver: AnimationDriver,
    pub last_frame: Option<Frame>,
    pub input_state: crate::input::InputState,
    pub hud_string_buf: String,
    pub show_hud: bool,
    pub use_color: bool,
    pub use_truecolor: bool,
    pub needs_clear: bool,
    pub max_frames: Option<u64>,
    pub last_frame_time: Instant,
    pub fps: f32,
}

impl AppState {
    pub fn new(driver: AnimationDriver) -> Self {
        Self {
            driver,
            last_frame: None,
            input_state: crate::input::InputState::default(),
            hud_string_buf: String::with_capacity(256),
            show_hud: false,
            use_color: true,
            use_truecolor: false,
            needs_clear: true,
            max_frames: None,
            last_frame_time: Instant::now(),
            fps: 0.0,
        }
    }

    /// True once the configured frame budget has been rendered.
    pub fn frame_budget_spent(&self) -> bool {
        self.max_frames
            .is_some_and(|max| self.driver.frames_rendered() >= max)
    }
}
