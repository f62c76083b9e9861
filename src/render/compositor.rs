use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::{Canvas, RenderState, BLANK};
use crate::error::ConfigError;

// --- Color palettes ---

pub const COLOR_PALETTE_NAMES: &str = "white, ember, ice, neon";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorPalette {
    colors: Vec<[u8; 3]>,
}

impl ColorPalette {
    pub fn new(colors: Vec<[u8; 3]>) -> Result<Self, ConfigError> {
        if colors.is_empty() {
            return Err(ConfigError::EmptyPalette { kind: "color" });
        }
        Ok(Self { colors })
    }

    /// Single white entry.
    pub fn reference() -> Self {
        Self {
            colors: vec![[255, 255, 255]],
        }
    }

    pub fn named(name: &str) -> Result<Self, ConfigError> {
        let colors = match name.to_ascii_lowercase().as_str() {
            "white" | "reference" => return Ok(Self::reference()),
            "ember" => vec![[255, 120, 80], [255, 170, 60], [255, 220, 90]],
            "ice" => vec![[100, 210, 255], [160, 230, 255], [220, 245, 255]],
            "neon" => vec![[255, 60, 200], [80, 255, 160], [100, 140, 255]],
            _ => {
                return Err(ConfigError::UnknownPalette {
                    kind: "color",
                    name: name.to_string(),
                    expected: COLOR_PALETTE_NAMES,
                })
            }
        };
        Self::new(colors)
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn get(&self, idx: usize) -> [u8; 3] {
        self.colors[idx % self.colors.len()]
    }
}

/// How each drawn glyph picks its color.
#[derive(Debug)]
pub enum ColorPick {
    First,
    Random(StdRng),
}

impl ColorPick {
    pub fn random(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::Random(StdRng::seed_from_u64(seed)),
            None => Self::Random(StdRng::from_os_rng()),
        }
    }

    fn pick(&mut self, palette_len: usize) -> usize {
        match self {
            Self::First => 0,
            Self::Random(rng) => rng.random_range(0..palette_len),
        }
    }
}

// --- Frame compositor ---

/// A composed frame: one glyph per cell and, for drawn cells, a color.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    canvas: Canvas,
    glyphs: Vec<char>,
    colors: Vec<Option<[u8; 3]>>,
}

impl Frame {
    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    #[cfg(test)]
    pub fn glyphs(&self) -> &[char] {
        &self.glyphs
    }

    #[cfg(test)]
    pub fn colors(&self) -> &[Option<[u8; 3]>] {
        &self.colors
    }

    pub fn rows(&self) -> impl Iterator<Item = &[char]> + '_ {
        self.glyphs.chunks(self.canvas.width())
    }

    pub fn color_rows(&self) -> impl Iterator<Item = &[Option<[u8; 3]>]> + '_ {
        self.colors.chunks(self.canvas.width())
    }

    /// Row-major text lines, top to bottom.
    pub fn lines(&self) -> Vec<String> {
        self.rows().map(|row| row.iter().collect()).collect()
    }

    pub fn drawn_cells(&self) -> usize {
        self.glyphs.iter().filter(|&&c| c != BLANK).count()
    }
}

#[derive(Debug)]
pub struct Compositor {
    palette: ColorPalette,
    pick: ColorPick,
}

impl Compositor {
    pub fn new(palette: ColorPalette, pick: ColorPick) -> Self {
        Self { palette, pick }
    }

    pub fn first(palette: ColorPalette) -> Self {
        Self::new(palette, ColorPick::First)
    }

    pub fn compose(&mut self, render_state: RenderState) -> Frame {
        let RenderState { canvas, glyphs, .. } = render_state;
        let palette_len = self.palette.len();
        let colors = glyphs
            .iter()
            .map(|&ch| {
                if ch == BLANK {
                    None
                } else {
                    Some(self.palette.get(self.pick.pick(palette_len)))
                }
            })
            .collect();
        Frame {
            canvas,
            glyphs,
            colors,
        }
    }
}
