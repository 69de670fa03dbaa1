use super::{Candidates, SMALL_DIAMOND};
use crate::{error::Result, util::Pixel};

const LARGE_DIAMOND: [(isize, isize); 8] = [
    (0, -2),
    (-1, -1),
    (1, -1),
    (-2, 0),
    (2, 0),
    (-1, 1),
    (1, 1),
    (0, 2),
];

pub(super) fn search<T: Pixel>(candidates: &mut Candidates<'_, '_, '_, T>) -> Result<()> {
    candidates.try_candidate(candidates.start())?;
    candidates.repeat_pattern(&LARGE_DIAMOND)?;

    let center = candidates.best();
    candidates.pattern_pass(center, &SMALL_DIAMOND, 1)
}
