#[cfg(target_arch = "x86_64")]
mod avx2;
mod rust;


use cfg_if::cfg_if;

use crate::{
    error::{MotionError, Result},
    params::DistortionMetric,
    plane::BlockView,
    util::Pixel,
};

type RowCostFn<T> = fn(&[T], &[T]) -> u64;

fn check_shape<T: Pixel>(a: &BlockView<'_, T>, b: &BlockView<'_, T>) -> Result<()> {
    if a.same_shape(b) {
        Ok(())
    } else {
        Err(MotionError::ShapeMismatch {
            left_width: a.width().get(),
            left_height: a.height().get(),
            right_width: b.width().get(),
            right_height: b.height().get(),
        })
    }
}

/// Sum of absolute differences of two rows of equal length.
#[must_use]
pub fn sad_row<T: Pixel>(a: &[T], b: &[T]) -> u64 {
    debug_assert_eq!(a.len(), b.len());

    cfg_if! {
        if #[cfg(all(target_arch = "x86_64", not(feature = "no_simd")))] {
            if size_of::<T>() == 1 && crate::util::has_avx2() {
                // SAFETY: We check for AVX2 first, and `T` is one byte wide
                return unsafe { avx2::sad_row_u8(a.as_ptr().cast(), b.as_ptr().cast(), a.len()) };
            }
        }
    }

    rust::sad_row(a, b)
}

/// Sum of squared differences of two rows of equal length.
#[must_use]
pub fn ssd_row<T: Pixel>(a: &[T], b: &[T]) -> u64 {
    debug_assert_eq!(a.len(), b.len());
    rust::ssd_row(a, b)
}

impl DistortionMetric {
    fn row_fn<T: Pixel>(self) -> RowCostFn<T> {
        match self {
            DistortionMetric::Sad => sad_row::<T>,
            DistortionMetric::Ssd => ssd_row::<T>,
        }
    }

    /// Cost of matching `a` against `b`.
    ///
    /// Fails with [`MotionError::ShapeMismatch`] if the views differ in size.
    pub fn cost<T: Pixel>(self, a: &BlockView<'_, T>, b: &BlockView<'_, T>) -> Result<u64> {
        check_shape(a, b)?;
        let row_cost = self.row_fn::<T>();
        Ok(a.rows()
            .zip(b.rows())
            .map(|(row_a, row_b)| row_cost(row_a, row_b))
            .sum())
    }

    /// Like [`cost`](Self::cost), but gives up with `None` once the running
    /// sum reaches `limit`. The sum is checked after every row.
    ///
    /// Any result below `limit` is identical to the full cost.
    pub fn cost_bounded<T: Pixel>(
        self,
        a: &BlockView<'_, T>,
        b: &BlockView<'_, T>,
        limit: u64,
    ) -> Result<Option<u64>> {
        check_shape(a, b)?;
        let row_cost = self.row_fn::<T>();
        let mut sum = 0u64;
        for (row_a, row_b) in a.rows().zip(b.rows()) {
            sum += row_cost(row_a, row_b);
            if sum >= limit {
                return Ok(None);
            }
        }
        Ok(Some(sum))
    }
}
