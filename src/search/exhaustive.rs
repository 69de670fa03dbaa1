use super::Candidates;
use crate::{error::Result, mv::MotionVector, util::Pixel};

/// Visits every candidate of the range, rows top to bottom and each row
/// left to right.
pub(super) fn search<T: Pixel>(candidates: &mut Candidates<'_, '_, '_, T>) -> Result<()> {
    let range = candidates.range;
    for dy in range.min_y..=range.max_y {
        for dx in range.min_x..=range.max_x {
            candidates.try_candidate(MotionVector::new(dx, dy))?;
        }
    }
    Ok(())
}
