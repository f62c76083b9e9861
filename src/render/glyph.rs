use crate::error::ConfigError;
use crate::math::Vec3;

// --- Luminance to glyph ---

/// Implicit light: from behind the viewer, above the torus.
const LIGHT_DIRECTION: Vec3 = Vec3::new(0.0, -1.0, -1.0);
/// Spreads the brightness range (at most sqrt(2)) over about a dozen glyphs.
const BRIGHTNESS_SCALE: f32 = 8.0;

pub const REFERENCE_GLYPHS: &str = ".,-~:;=!*531";
pub const CLASSIC_GLYPHS: &str = ".,-~:;=!*#$@";
pub const BLOCK_GLYPHS: &str = "\u{2591}\u{2592}\u{2593}\u{2588}";

pub const GLYPH_PALETTE_NAMES: &str = "531, classic, blocks";

/// Brightness proxy for a rotated surface normal. Negative when the surface
/// faces away from the light.
pub fn brightness(normal: Vec3) -> f32 {
    normal.dot(LIGHT_DIRECTION)
}

/// Scales and floors `brightness`, clamps negatives to the dimmest glyph and
/// wraps anything past the brightest one.
pub fn glyph_index(brightness: f32, palette_len: usize) -> usize {
    let scaled = (brightness * BRIGHTNESS_SCALE).floor().max(0.0) as usize;
    scaled % palette_len.max(1)
}

/// Glyphs ordered dimmest to brightest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlyphPalette {
    glyphs: Vec<char>,
}

impl GlyphPalette {
    pub fn new(glyphs: &str) -> Result<Self, ConfigError> {
        let glyphs: Vec<char> = glyphs.chars().collect();
        if glyphs.is_empty() {
            return Err(ConfigError::EmptyPalette { kind: "glyph" });
        }
        Ok(Self { glyphs })
    }

    pub fn reference() -> Self {
        Self {
            glyphs: REFERENCE_GLYPHS.chars().collect(),
        }
    }

    pub fn named(name: &str) -> Result<Self, ConfigError> {
        let glyphs = match name.to_ascii_lowercase().as_str() {
            "531" | "reference" => return Ok(Self::reference()),
            "classic" => CLASSIC_GLYPHS,
            "blocks" => BLOCK_GLYPHS,
            _ => {
                return Err(ConfigError::UnknownPalette {
                    kind: "glyph",
                    name: name.to_string(),
                    expected: GLYPH_PALETTE_NAMES,
                })
            }
        };
        Self::new(glyphs)
    }

    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    #[cfg(test)]
    pub fn glyphs(&self) -> &[char] {
        &self.glyphs
    }

    pub fn glyph_for(&self, brightness: f32) -> char {
        self.glyphs[glyph_index(brightness, self.glyphs.len())]
    }

    pub fn shade(&self, normal: Vec3) -> char {
        self.glyph_for(brightness(normal))
    }
}
