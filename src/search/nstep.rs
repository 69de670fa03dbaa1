use super::{Candidates, NEIGHBOURS};
use crate::{error::Result, util::Pixel};

/// Step search. The eight neighbours at distance `step` are tried around the
/// best candidate. The step is kept while the best keeps moving and halved
/// once it stops.
pub(super) fn search<T: Pixel>(candidates: &mut Candidates<'_, '_, '_, T>) -> Result<()> {
    candidates.try_candidate(candidates.start())?;

    let mut step = (candidates.radius() + 1).next_power_of_two() / 2;
    while step > 0 {
        let center = candidates.best();
        candidates.pattern_pass(center, &NEIGHBOURS, step as isize)?;
        if candidates.best() == center {
            step /= 2;
        }
    }
    Ok(())
}
