use std::ops::Add;

use crate::params::Subpel;

/// Displacement from a block of the current frame to its match in a
/// reference frame, in units of `1 / pel` pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct MotionVector {
    pub dx: isize,
    pub dy: isize,
}

impl MotionVector {
    #[must_use]
    pub const fn new(dx: isize, dy: isize) -> Self {
        MotionVector { dx, dy }
    }

    #[must_use]
    pub const fn zero() -> Self {
        MotionVector { dx: 0, dy: 0 }
    }

    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.dx == 0 && self.dy == 0
    }

    #[must_use]
    pub const fn scaled(self, factor: isize) -> Self {
        MotionVector {
            dx: self.dx * factor,
            dy: self.dy * factor,
        }
    }

    /// Converts the vector to pixel units for the given precision.
    #[must_use]
    pub fn as_pixels(self, pel: Subpel) -> (f64, f64) {
        let scale = usize::from(pel) as f64;
        (self.dx as f64 / scale, self.dy as f64 / scale)
    }
}

impl Add for MotionVector {
    type Output = MotionVector;

    fn add(self, rhs: MotionVector) -> Self::Output {
        MotionVector::new(self.dx + rhs.dx, self.dy + rhs.dy)
    }
}
