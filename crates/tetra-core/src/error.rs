use thiserror::Error;

/// Errors produced by tensor construction and arithmetic.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TetraError {
    #[error("Axis {axis} of shape {shape:?} has size 0")]
    ZeroDim { axis: usize, shape: Vec<usize> },

    #[error("Shape {shape:?} has more elements than fit in usize")]
    Overflow { shape: Vec<usize> },

    #[error("Source buffer too short: shape requires {expected} elements, got {got}")]
    BufferTooShort { expected: usize, got: usize },

    #[error("Length mismatch: shape requires {expected} elements, got {got}")]
    LengthMismatch { expected: usize, got: usize },

    #[error("Expected a rank-4 shape, got rank {got}")]
    InvalidRank { got: usize },

    #[error("Cannot broadcast {other:?} into {this:?}: axis {axis} is neither equal nor 1")]
    BroadcastError {
        this: Vec<usize>,
        other: Vec<usize>,
        axis: usize,
    },

    #[error("Tensor buffer has been transferred out")]
    Empty,
}
