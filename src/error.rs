use thiserror::Error;

/// Errors reported by the motion estimation core.
///
/// All of them are deterministic consequences of the inputs or the
/// configuration, so nothing is ever retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MotionError {
    /// A requested region is not fully contained in its plane.
    #[error(
        "region {width}x{height} at ({x}, {y}) is outside of the {plane_width}x{plane_height} plane"
    )]
    OutOfBounds {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
        plane_width: usize,
        plane_height: usize,
    },

    /// Two compared regions do not have the same dimensions.
    #[error("shape mismatch: {left_width}x{left_height} compared to {right_width}x{right_height}")]
    ShapeMismatch {
        left_width: usize,
        left_height: usize,
        right_width: usize,
        right_height: usize,
    },

    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// No displacement in the search window keeps the referenced block inside
    /// the reference frame.
    #[error("search window of the block at ({block_x}, {block_y}) has no in-bounds candidate")]
    EmptyWindow { block_x: usize, block_y: usize },
}

pub type Result<T> = std::result::Result<T, MotionError>;
