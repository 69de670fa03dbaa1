
mod diamond;
mod exhaustive;
mod hexagon;
mod nstep;
pub mod subpel;

use crate::{
    error::{MotionError, Result},
    mv::MotionVector,
    params::{DistortionMetric, SearchType},
    plane::{BlockView, Plane},
    util::Pixel,
};

/// The eight neighbours of a point, in raster order.
const NEIGHBOURS: [(isize, isize); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

const SMALL_DIAMOND: [(isize, isize); 4] = [(0, -1), (-1, 0), (1, 0), (0, 1)];

/// Full-pel displacements within `radius` of `center` on both axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchWindow {
    pub center: MotionVector,
    pub radius: usize,
}

impl SearchWindow {
    #[must_use]
    pub const fn new(center: MotionVector, radius: usize) -> Self {
        SearchWindow { center, radius }
    }

    #[must_use]
    pub fn range(&self) -> DisplacementRange {
        let r = isize::try_from(self.radius).unwrap_or(isize::MAX);
        DisplacementRange {
            min_x: self.center.dx.saturating_sub(r),
            max_x: self.center.dx.saturating_add(r),
            min_y: self.center.dy.saturating_sub(r),
            max_y: self.center.dy.saturating_add(r),
        }
    }
}

/// An inclusive, non-empty rectangle of full-pel displacements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplacementRange {
    pub min_x: isize,
    pub max_x: isize,
    pub min_y: isize,
    pub max_y: isize,
}

impl DisplacementRange {
    /// The displacements that keep a `width` x `height` block at
    /// `(block_x, block_y)` fully inside a `plane_width` x `plane_height`
    /// plane. `None` if the block does not fit at all.
    #[must_use]
    pub fn in_bounds(
        block_x: usize,
        block_y: usize,
        width: usize,
        height: usize,
        plane_width: usize,
        plane_height: usize,
    ) -> Option<Self> {
        let max_x = plane_width.checked_sub(width)? as isize - block_x as isize;
        let max_y = plane_height.checked_sub(height)? as isize - block_y as isize;
        let range = DisplacementRange {
            min_x: -(block_x as isize),
            max_x,
            min_y: -(block_y as isize),
            max_y,
        };
        range.is_valid().then_some(range)
    }

    fn is_valid(&self) -> bool {
        self.min_x <= self.max_x && self.min_y <= self.max_y
    }

    #[must_use]
    pub fn intersect(&self, other: &DisplacementRange) -> Option<Self> {
        let range = DisplacementRange {
            min_x: self.min_x.max(other.min_x),
            max_x: self.max_x.min(other.max_x),
            min_y: self.min_y.max(other.min_y),
            max_y: self.max_y.min(other.max_y),
        };
        range.is_valid().then_some(range)
    }

    #[must_use]
    pub fn contains(&self, mv: MotionVector) -> bool {
        (self.min_x..=self.max_x).contains(&mv.dx) && (self.min_y..=self.max_y).contains(&mv.dy)
    }

    /// Moves `mv` to the nearest displacement inside the range.
    #[must_use]
    pub fn clamp(&self, mv: MotionVector) -> MotionVector {
        MotionVector::new(
            mv.dx.clamp(self.min_x, self.max_x),
            mv.dy.clamp(self.min_y, self.max_y),
        )
    }

    /// Number of displacements in the range.
    #[must_use]
    pub fn count(&self) -> usize {
        (self.max_x - self.min_x + 1) as usize * (self.max_y - self.min_y + 1) as usize
    }
}

/// Everything needed to search one block against one reference frame.
#[derive(Debug, Clone, Copy)]
pub struct BlockSearch<'c, 'r, T: Pixel> {
    /// The block of the current frame.
    pub block: BlockView<'c, T>,
    /// Position of the block in the current frame.
    pub block_x: usize,
    pub block_y: usize,
    pub reference: Plane<'r, T>,
    pub window: SearchWindow,
    pub metric: DistortionMetric,
    pub early_termination: bool,
}

impl<'c, 'r, T: Pixel> BlockSearch<'c, 'r, T> {
    /// The candidates of the window whose referenced block lies inside the
    /// reference frame.
    pub fn candidates(&self) -> Result<DisplacementRange> {
        DisplacementRange::in_bounds(
            self.block_x,
            self.block_y,
            self.block.width().get(),
            self.block.height().get(),
            self.reference.width().get(),
            self.reference.height().get(),
        )
        .and_then(|bounds| bounds.intersect(&self.window.range()))
        .ok_or(MotionError::EmptyWindow {
            block_x: self.block_x,
            block_y: self.block_y,
        })
    }

    /// The reference block displaced by a full-pel `mv`.
    pub fn reference_block(&self, mv: MotionVector) -> Result<BlockView<'r, T>> {
        let (x, y) = displace(self.block_x, self.block_y, mv).ok_or(MotionError::OutOfBounds {
            x: self.block_x,
            y: self.block_y,
            width: self.block.width().get(),
            height: self.block.height().get(),
            plane_width: self.reference.width().get(),
            plane_height: self.reference.height().get(),
        })?;
        self.reference.view(
            x,
            y,
            self.block.width().get(),
            self.block.height().get(),
        )
    }

    /// Cost of `candidate`, or `None` if it cannot beat `best`.
    fn evaluate(&self, candidate: &BlockView<'_, T>, best: u64) -> Result<Option<u64>> {
        if self.early_termination {
            self.metric.cost_bounded(&self.block, candidate, best)
        } else {
            let cost = self.metric.cost(&self.block, candidate)?;
            Ok((cost < best).then_some(cost))
        }
    }
}

/// Position of a block at `(x, y)` after a full-pel displacement, if it does
/// not leave the positive quadrant.
pub(crate) fn displace(x: usize, y: usize, mv: MotionVector) -> Option<(usize, usize)> {
    Some((x.checked_add_signed(mv.dx)?, y.checked_add_signed(mv.dy)?))
}

/// Best match found for one block against one reference frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchResult {
    /// In units of `1 / pel` pixels.
    pub vector: MotionVector,
    pub cost: u64,
    /// Number of candidates the metric was run on.
    pub evaluated: usize,
}

/// Tracks the best full-pel candidate of one search.
struct Candidates<'s, 'c, 'r, T: Pixel> {
    search: &'s BlockSearch<'c, 'r, T>,
    range: DisplacementRange,
    best: MotionVector,
    best_cost: u64,
    evaluated: usize,
}

impl<'s, 'c, 'r, T: Pixel> Candidates<'s, 'c, 'r, T> {
    fn new(search: &'s BlockSearch<'c, 'r, T>) -> Result<Self> {
        let range = search.candidates()?;
        Ok(Candidates {
            search,
            range,
            best: range.clamp(search.window.center),
            best_cost: u64::MAX,
            evaluated: 0,
        })
    }

    /// The window center, moved inside the candidate range.
    fn start(&self) -> MotionVector {
        self.range.clamp(self.search.window.center)
    }

    fn radius(&self) -> usize {
        self.search.window.radius
    }

    fn best(&self) -> MotionVector {
        self.best
    }

    /// Evaluates `mv` unless it is outside the candidate range. Returns
    /// whether it became the new best, which needs a strictly lower cost.
    fn try_candidate(&mut self, mv: MotionVector) -> Result<bool> {
        if !self.range.contains(mv) {
            return Ok(false);
        }
        let candidate = self.search.reference_block(mv)?;
        self.evaluated += 1;
        match self.search.evaluate(&candidate, self.best_cost)? {
            Some(cost) if cost < self.best_cost => {
                self.best = mv;
                self.best_cost = cost;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    /// Evaluates `pattern` around the best candidate until the best stops
    /// moving.
    fn repeat_pattern(&mut self, pattern: &[(isize, isize)]) -> Result<()> {
        loop {
            let center = self.best;
            self.pattern_pass(center, pattern, 1)?;
            if self.best == center {
                return Ok(());
            }
        }
    }

    fn pattern_pass(
        &mut self,
        center: MotionVector,
        pattern: &[(isize, isize)],
        step: isize,
    ) -> Result<()> {
        for &(dx, dy) in pattern {
            self.try_candidate(center + MotionVector::new(dx, dy).scaled(step))?;
        }
        Ok(())
    }

    fn finish(self) -> SearchResult {
        SearchResult {
            vector: self.best,
            cost: self.best_cost,
            evaluated: self.evaluated,
        }
    }
}

impl SearchType {
    /// Finds the full-pel displacement with the lowest cost for one block.
    ///
    /// Only candidates whose referenced block lies completely inside the
    /// reference frame are evaluated. Among equal costs the candidate that
    /// was evaluated first wins.
    ///
    /// Fails with [`MotionError::EmptyWindow`] if the window holds no such
    /// candidate.
    pub fn search<T: Pixel>(self, request: &BlockSearch<'_, '_, T>) -> Result<SearchResult> {
        let mut candidates = Candidates::new(request)?;
        match self {
            SearchType::Exhaustive => exhaustive::search(&mut candidates)?,
            SearchType::Nstep => nstep::search(&mut candidates)?,
            SearchType::Diamond => diamond::search(&mut candidates)?,
            SearchType::Hexagon => hexagon::search(&mut candidates)?,
        }
        Ok(candidates.finish())
    }
}
