
mod bilinear;

use std::num::NonZeroUsize;

use bilinear::{refine_diagonal_bilinear, refine_horizontal_bilinear, refine_vertical_bilinear};

use crate::{
    plane::{Plane, PlaneBuf},
    util::Pixel,
};

pub type RefineFn<T> = fn(&mut [T], &[T], NonZeroUsize, NonZeroUsize, NonZeroUsize);

/// Half-sample planes of one reference frame.
///
/// Sample `(x, y)` of `horizontal` sits at `(x + 0.5, y)` of the source,
/// `vertical` at `(x, y + 0.5)` and `diagonal` at `(x + 0.5, y + 0.5)`.
/// All three have the dimensions of the source plane.
#[derive(Debug, Clone)]
pub struct HalfpelPlanes<T: Pixel> {
    horizontal: PlaneBuf<T>,
    vertical: PlaneBuf<T>,
    diagonal: PlaneBuf<T>,
}

fn refine_plane<T: Pixel>(src: &Plane<'_, T>, refine: RefineFn<T>) -> PlaneBuf<T> {
    let (width, height) = (src.width(), src.height());
    let mut data = vec![T::default(); width.get() * height.get()];
    refine(&mut data, src.data(), src.stride(), width, height);
    PlaneBuf::from_packed(data, width, height)
}

impl<T: Pixel> HalfpelPlanes<T> {
    /// Interpolates the three half-sample planes of `src` bilinearly.
    #[must_use]
    pub fn new(src: &Plane<'_, T>) -> Self {
        HalfpelPlanes {
            horizontal: refine_plane(src, refine_horizontal_bilinear::<T>),
            vertical: refine_plane(src, refine_vertical_bilinear::<T>),
            diagonal: refine_plane(src, refine_diagonal_bilinear::<T>),
        }
    }

    #[must_use]
    pub fn horizontal(&self) -> &PlaneBuf<T> {
        &self.horizontal
    }

    #[must_use]
    pub fn vertical(&self) -> &PlaneBuf<T> {
        &self.vertical
    }

    #[must_use]
    pub fn diagonal(&self) -> &PlaneBuf<T> {
        &self.diagonal
    }

    /// Picks the plane holding the samples at fractional offset
    /// `(frac_x / 2, frac_y / 2)`. `full` is returned for the integer grid.
    #[must_use]
    pub fn select<'s>(&'s self, full: Plane<'s, T>, frac_x: usize, frac_y: usize) -> Plane<'s, T> {
        match (frac_x & 1, frac_y & 1) {
            (0, 0) => full,
            (1, 0) => self.horizontal.as_plane(),
            (0, _) => self.vertical.as_plane(),
            _ => self.diagonal.as_plane(),
        }
    }
}
