use thiserror::Error;

#[derive(Error, Debug)]
pub enum SimError {
    #[error("Invalid turn interval: {ms} ms (must be a positive, finite number)")]
    InvalidInterval { ms: f64 },

    #[error("Grid cell ({row}, {col}) is not on the board perimeter")]
    NotOnPerimeter { row: usize, col: usize },

    #[error("Space {index} is outside the board (0-39)")]
    SpaceOutOfRange { index: usize },

    #[error("Die face {face} is outside 1-6")]
    InvalidDieFace { face: u8 },

    #[error("Invalid board cell size: {size} px")]
    InvalidCellSize { size: f32 },

    #[error("Settings error: {0}")]
    Settings(#[from] serde_json::Error),
}

pub type SimResult<T> = Result<T, SimError>;
