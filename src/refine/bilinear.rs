use std::num::NonZeroUsize;

use crate::util::Pixel;

/// Averages every sample with its right neighbour, producing the samples
/// halfway between two columns.
///
/// The last column has no right neighbour and is copied from the source.
///
/// # Parameters
/// - `dest`: Tightly packed destination buffer of `width * height` samples
/// - `src`: Source image buffer
/// - `src_pitch`: Number of samples per row in `src`
/// - `width`: Width of the image in pixels
/// - `height`: Height of the image in pixels
pub(super) fn refine_horizontal_bilinear<T: Pixel>(
    dest: &mut [T],
    src: &[T],
    src_pitch: NonZeroUsize,
    width: NonZeroUsize,
    height: NonZeroUsize,
) {
    let width = width.get();
    for (src_row, dest_row) in src
        .chunks(src_pitch.get())
        .zip(dest.chunks_exact_mut(width))
        .take(height.get())
    {
        for i in 0..width - 1 {
            let a: u32 = src_row[i].into();
            let b: u32 = src_row[i + 1].into();
            dest_row[i] = T::from_u32_or_max_value((a + b + 1) / 2);
        }
        // last column
        dest_row[width - 1] = src_row[width - 1];
    }
}

/// Averages every sample with the one below it.
///
/// The last row is copied from the source.
pub(super) fn refine_vertical_bilinear<T: Pixel>(
    dest: &mut [T],
    src: &[T],
    src_pitch: NonZeroUsize,
    width: NonZeroUsize,
    height: NonZeroUsize,
) {
    let (width, height, pitch) = (width.get(), height.get(), src_pitch.get());
    let mut src_offset = 0;
    let mut dest_offset = 0;
    for _j in 0..height - 1 {
        for i in 0..width {
            let a: u32 = src[src_offset + i].into();
            let b: u32 = src[src_offset + i + pitch].into();
            dest[dest_offset + i] = T::from_u32_or_max_value((a + b + 1) / 2);
        }
        src_offset += pitch;
        dest_offset += width;
    }

    // last row
    dest[dest_offset..dest_offset + width].copy_from_slice(&src[src_offset..src_offset + width]);
}

/// Averages every 2x2 neighbourhood, producing the samples at the center of
/// four pixels.
///
/// The last column falls back to a vertical average, the last row to a
/// horizontal one, and the bottom-right sample is copied.
pub(super) fn refine_diagonal_bilinear<T: Pixel>(
    dest: &mut [T],
    src: &[T],
    src_pitch: NonZeroUsize,
    width: NonZeroUsize,
    height: NonZeroUsize,
) {
    let (width, height, pitch) = (width.get(), height.get(), src_pitch.get());
    let mut src_offset = 0;
    let mut dest_offset = 0;

    for _j in 0..height - 1 {
        for i in 0..width - 1 {
            let a: u32 = src[src_offset + i].into();
            let b: u32 = src[src_offset + i + 1].into();
            let c: u32 = src[src_offset + i + pitch].into();
            let d: u32 = src[src_offset + i + pitch + 1].into();
            dest[dest_offset + i] = T::from_u32_or_max_value((a + b + c + d + 2) / 4);
        }
        // last column
        let a: u32 = src[src_offset + width - 1].into();
        let b: u32 = src[src_offset + width - 1 + pitch].into();
        dest[dest_offset + width - 1] = T::from_u32_or_max_value((a + b + 1) / 2);

        src_offset += pitch;
        dest_offset += width;
    }

    // last row
    for i in 0..width - 1 {
        let a: u32 = src[src_offset + i].into();
        let b: u32 = src[src_offset + i + 1].into();
        dest[dest_offset + i] = T::from_u32_or_max_value((a + b + 1) / 2);
    }
    dest[dest_offset + width - 1] = src[src_offset + width - 1];
}
