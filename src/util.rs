
use std::{fmt::Debug, num::NonZeroUsize};

use num_traits::{FromPrimitive, ToPrimitive};

#[cfg(target_arch = "x86_64")]
cpufeatures::new!(cpuid_avx2, "avx2");

#[cfg(target_arch = "x86_64")]
pub use cpuid_avx2::get as has_avx2;

/// An integer sample type that can be stored in a frame plane.
///
/// Implemented for `u8` and `u16`, which covers 8 to 16 bit video.
pub trait Pixel:
    Clone
    + Copy
    + Debug
    + Default
    + Ord
    + Eq
    + Send
    + Sync
    + Into<u32>
    + Into<u64>
    + From<u8>
    + ToPrimitive
    + FromPrimitive
    + MaxValue
    + 'static
{
    #[must_use]
    fn from_u32_or_max_value(value: u32) -> Self;
}

impl<T> Pixel for T
where
    T: Clone
        + Copy
        + Debug
        + Default
        + Ord
        + Eq
        + Send
        + Sync
        + Into<u32>
        + Into<u64>
        + From<u8>
        + ToPrimitive
        + FromPrimitive
        + MaxValue
        + 'static,
{
    fn from_u32_or_max_value(value: u32) -> Self {
        T::from_u32(value).unwrap_or_else(T::max_value)
    }
}

pub trait MaxValue {
    #[must_use]
    fn max_value() -> Self;
}

impl MaxValue for u8 {
    fn max_value() -> Self {
        u8::MAX
    }
}

impl MaxValue for u16 {
    fn max_value() -> Self {
        u16::MAX
    }
}

/// Copies a `row_size` x `height` rectangle between two strided buffers.
///
/// Both slices must start at the first sample of the rectangle.
/// When both strides equal the row size the copy is done in one go.
pub fn bitblt<T: Pixel>(
    dest: &mut [T],
    dest_stride: NonZeroUsize,
    src: &[T],
    src_stride: NonZeroUsize,
    row_size: NonZeroUsize,
    height: NonZeroUsize,
) {
    let height = height.get();
    let row_size = row_size.get();
    let src_stride = src_stride.get();
    let dest_stride = dest_stride.get();

    if src_stride == dest_stride && src_stride == row_size {
        dest[..row_size * height].copy_from_slice(&src[..row_size * height]);
    } else {
        for i in 0..height {
            let src_start = i * src_stride;
            let dest_start = i * dest_stride;
            dest[dest_start..dest_start + row_size]
                .copy_from_slice(&src[src_start..src_start + row_size]);
        }
    }
}
