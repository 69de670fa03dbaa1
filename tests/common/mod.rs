#![allow(dead_code)]

use anyhow::{Result, ensure};
use blockmatch::{BlockView, DistortionMetric, MotionVector, Pixel, Plane, SearchWindow};
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro128StarStar;

/// Deterministic 8-bit noise.
pub fn noise_frame(width: usize, height: usize, seed: u8) -> Vec<u8> {
    let mut rng = Xoshiro128StarStar::from_seed([seed; 16]);
    (0..width * height).map(|_| rng.random()).collect()
}

/// A copy of `src` whose sample `(x, y)` is `src(x - dx, y - dy)`, zero where
/// that falls outside the frame.
pub fn shift_frame<T: Pixel>(src: &[T], width: usize, height: usize, dx: isize, dy: isize) -> Vec<T> {
    let mut dest = vec![T::default(); width * height];
    for y in 0..height {
        for x in 0..width {
            let sx = x as isize - dx;
            let sy = y as isize - dy;
            if (0..width as isize).contains(&sx) && (0..height as isize).contains(&sy) {
                dest[y * width + x] = src[sy as usize * width + sx as usize];
            }
        }
    }
    dest
}

/// Lowest cost of any in-bounds candidate of `window`, found by enumeration.
pub fn brute_force_cost<T: Pixel>(
    block: &BlockView<'_, T>,
    block_x: usize,
    block_y: usize,
    reference: &Plane<'_, T>,
    window: SearchWindow,
    metric: DistortionMetric,
) -> Result<(MotionVector, u64)> {
    let r = window.radius as isize;
    let mut best: Option<(MotionVector, u64)> = None;
    for dy in window.center.dy - r..=window.center.dy + r {
        for dx in window.center.dx - r..=window.center.dx + r {
            let (Some(x), Some(y)) = (block_x.checked_add_signed(dx), block_y.checked_add_signed(dy))
            else {
                continue;
            };
            let Ok(candidate) =
                reference.view(x, y, block.width().get(), block.height().get())
            else {
                continue;
            };
            let cost = metric.cost(block, &candidate)?;
            if best.is_none_or(|(_, best_cost)| cost < best_cost) {
                best = Some((MotionVector::new(dx, dy), cost));
            }
        }
    }
    best.ok_or_else(|| anyhow::anyhow!("no in-bounds candidate for block ({block_x}, {block_y})"))
}

/// Fails unless both buffers hold the same samples.
pub fn assert_frames_match<T: Pixel>(expected: &[T], actual: &[T], width: usize) -> Result<()> {
    ensure!(expected.len() == actual.len(), "frame sizes differ");
    if let Some(index) = expected.iter().zip(actual).position(|(e, a)| e != a) {
        anyhow::bail!(
            "frames differ at ({}, {}): expected {:?}, got {:?}",
            index % width,
            index / width,
            expected[index],
            actual[index]
        );
    }
    Ok(())
}
