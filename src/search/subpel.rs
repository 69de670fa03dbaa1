use super::{BlockSearch, NEIGHBOURS, SearchResult};
use crate::{
    error::Result,
    mv::MotionVector,
    plane::{BlockView, Plane},
    refine::HalfpelPlanes,
    util::Pixel,
};

/// Splits a half-pel coordinate into its full-pel part and the half-sample
/// remainder, rounding towards negative infinity.
#[must_use]
pub fn split_halfpel(value: isize) -> (isize, usize) {
    (value.div_euclid(2), value.rem_euclid(2) as usize)
}

/// Origin of a displaced block and its half-sample fractions, if every
/// integer sample the interpolation reads lies inside the reference frame.
fn halfpel_origin(
    block_x: usize,
    block_y: usize,
    (width, height): (usize, usize),
    (plane_width, plane_height): (usize, usize),
    mv: MotionVector,
) -> Option<(usize, usize, usize, usize)> {
    let (ix, frac_x) = split_halfpel(mv.dx);
    let (iy, frac_y) = split_halfpel(mv.dy);
    let x = block_x.checked_add_signed(ix)?;
    let y = block_y.checked_add_signed(iy)?;
    let fits_x = x + frac_x + width <= plane_width;
    let fits_y = y + frac_y + height <= plane_height;
    (fits_x && fits_y).then_some((x, y, frac_x, frac_y))
}

/// The `width` x `height` block at `(block_x, block_y)` of `reference`,
/// displaced by a half-pel `mv`. `None` if the interpolation would read
/// outside the reference frame.
pub fn halfpel_view<'p, T: Pixel>(
    reference: Plane<'p, T>,
    planes: &'p HalfpelPlanes<T>,
    block_x: usize,
    block_y: usize,
    (width, height): (usize, usize),
    mv: MotionVector,
) -> Result<Option<BlockView<'p, T>>> {
    let plane_size = (reference.width().get(), reference.height().get());
    let Some((x, y, frac_x, frac_y)) =
        halfpel_origin(block_x, block_y, (width, height), plane_size, mv)
    else {
        return Ok(None);
    };
    planes
        .select(reference, frac_x, frac_y)
        .view(x, y, width, height)
        .map(Some)
}

fn within_window<T: Pixel>(request: &BlockSearch<'_, '_, T>, mv: MotionVector) -> bool {
    let range = request.window.range();
    let twice = |v: isize| v.saturating_mul(2);
    (twice(range.min_x)..=twice(range.max_x)).contains(&mv.dx)
        && (twice(range.min_y)..=twice(range.max_y)).contains(&mv.dy)
}

/// Tries the eight half-pel neighbours of a full-pel result, in the same
/// order as the step search. `planes` must be interpolated from
/// `request.reference`.
///
/// The returned vector is in half-pel units. It only moves off the
/// full-pel result for a strictly lower cost.
pub fn refine_halfpel<T: Pixel>(
    request: &BlockSearch<'_, '_, T>,
    planes: &HalfpelPlanes<T>,
    found: SearchResult,
) -> Result<SearchResult> {
    let center = found.vector.scaled(2);
    let mut best = SearchResult {
        vector: center,
        ..found
    };

    for (dx, dy) in NEIGHBOURS {
        let mv = center + MotionVector::new(dx, dy);
        if !within_window(request, mv) {
            continue;
        }
        let Some(candidate) = halfpel_view(
            request.reference,
            planes,
            request.block_x,
            request.block_y,
            (request.block.width().get(), request.block.height().get()),
            mv,
        )?
        else {
            continue;
        };
        best.evaluated += 1;
        if let Some(cost) = request.evaluate(&candidate, best.cost)? {
            best.vector = mv;
            best.cost = cost;
        }
    }
    Ok(best)
}
