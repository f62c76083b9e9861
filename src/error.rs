use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("canvas must be at least 1x1 (got {width}x{height})")]
    EmptyCanvas { width: usize, height: usize },

    #[error("canvas {width}x{height} exceeds {max} cells")]
    CanvasTooLarge {
        width: usize,
        height: usize,
        max: usize,
    },

    #[error("frame interval must be non-zero")]
    ZeroInterval,

    #[error("rotation increment `{name}` must be finite (got {value})")]
    NonFiniteIncrement { name: &'static str, value: f32 },

    #[error("{kind} palette must contain at least one entry")]
    EmptyPalette { kind: &'static str },

    #[error("unknown {kind} palette '{name}' (expected one of: {expected})")]
    UnknownPalette {
        kind: &'static str,
        name: String,
        expected: &'static str,
    },
}

pub type AppResult<T> = Result<T, Box<dyn std::error::Error>>;
