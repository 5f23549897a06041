use thiserror::Error;

/// Rejections raised while building a world, tilemap or tuning set.
///
/// Nothing in the per-tick path returns these; a running simulation only clamps.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("tile size must be positive and finite, got {0}")]
    InvalidTileSize(f32),

    #[error("tilemap must be at least 1x1, got {width}x{height}")]
    EmptyTilemap { width: u32, height: u32 },

    #[error("tilemap row {row} has {found} cells, expected {expected}")]
    RaggedRow { row: usize, expected: usize, found: usize },

    #[error("tilemap expects {expected} cells, got {found}")]
    CellCount { expected: usize, found: usize },

    #[error("`{field}` must be positive and finite, got {value}")]
    NonPositive { field: &'static str, value: f32 },

    #[error("`{field}` must be within {min}..={max}, got {value}")]
    OutOfRange { field: &'static str, value: f32, min: f32, max: f32 },

    #[error("`{field}` must be at least {min}, got {value}")]
    TooSmall { field: &'static str, value: u32, min: u32 },

    #[error("malformed json: {0}")]
    Json(#[from] serde_json::Error),
}

pub(crate) fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { field, value })
    }
}

pub(crate) fn within(field: &'static str, value: f32, min: f32, max: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= min && value <= max {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange { field, value, min, max })
    }
}
