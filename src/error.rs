use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum FluidError {
    #[error("cell ({x}, {y}) is outside the writable range of an N={n} grid")]
    OutOfRange { x: i64, y: i64, n: usize },

    #[error("field shape mismatch: expected N={expected}, found N={found}")]
    ShapeMismatch { expected: usize, found: usize },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}
