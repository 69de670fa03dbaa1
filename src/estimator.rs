#[cfg(test)]
mod tests;

use rayon::prelude::*;
use smallvec::SmallVec;
use tracing::{debug, trace};

use crate::{
    error::{MotionError, Result},
    field::{BlockMotion, MotionField},
    params::{BlockFlags, EdgePolicy, EstimatorParams, Subpel},
    plane::{BlockView, Plane, PlaneBuf},
    refine::HalfpelPlanes,
    search::{
        BlockSearch, DisplacementRange, SearchResult, SearchWindow, displace,
        subpel::{halfpel_view, refine_halfpel},
    },
    util::Pixel,
};

/// One configured reference frame, with its half-sample planes when the
/// estimator works at half-pel precision.
#[derive(Debug)]
struct Reference<'r, T: Pixel> {
    plane: Plane<'r, T>,
    halfpel: Option<HalfpelPlanes<T>>,
}

/// Partition of a frame into blocks, in raster order.
#[derive(Debug, Clone, Copy)]
struct BlockGrid {
    width: usize,
    height: usize,
    block_size: usize,
    blocks_x: usize,
    blocks_y: usize,
}

impl BlockGrid {
    fn new(width: usize, height: usize, block_size: usize, edge_policy: EdgePolicy) -> Self {
        let (blocks_x, blocks_y) = match edge_policy {
            EdgePolicy::Clip => (
                (width + block_size - 1) / block_size,
                (height + block_size - 1) / block_size,
            ),
            EdgePolicy::Exclude => (width / block_size, height / block_size),
        };
        BlockGrid {
            width,
            height,
            block_size,
            blocks_x,
            blocks_y,
        }
    }

    fn count(&self) -> usize {
        self.blocks_x * self.blocks_y
    }

    /// Position and size of block `index`. Edge blocks are clipped to the
    /// frame.
    fn block(&self, index: usize) -> (usize, usize, usize, usize) {
        let x = (index % self.blocks_x) * self.block_size;
        let y = (index / self.blocks_x) * self.block_size;
        (
            x,
            y,
            self.block_size.min(self.width - x),
            self.block_size.min(self.height - y),
        )
    }
}

/// Block-matching motion estimator for a fixed set of reference frames.
///
/// The estimator only borrows the reference planes. Every call to
/// [`estimate`](Self::estimate) is independent of the ones before it.
#[derive(Debug)]
pub struct MotionEstimator<'r, T: Pixel> {
    params: EstimatorParams,
    references: SmallVec<[Reference<'r, T>; 4]>,
}

impl<'r, T: Pixel> MotionEstimator<'r, T> {
    /// Fails with [`MotionError::InvalidConfiguration`] for an invalid
    /// configuration or without references, and with
    /// [`MotionError::ShapeMismatch`] if their dimensions differ.
    pub fn new(params: EstimatorParams, references: &[Plane<'r, T>]) -> Result<Self> {
        params.validate()?;
        let Some(first) = references.first() else {
            return Err(MotionError::InvalidConfiguration(
                "at least one reference frame is required".to_string(),
            ));
        };
        if let Some(other) = references.iter().find(|r| !r.same_dimensions(first)) {
            return Err(MotionError::ShapeMismatch {
                left_width: first.width().get(),
                left_height: first.height().get(),
                right_width: other.width().get(),
                right_height: other.height().get(),
            });
        }

        let references = references
            .iter()
            .map(|&plane| Reference {
                plane,
                halfpel: (params.pel == Subpel::Half).then(|| HalfpelPlanes::new(&plane)),
            })
            .collect::<SmallVec<_>>();

        debug!(
            block_size = params.block_size.get(),
            radius = params.radius,
            metric = ?params.metric,
            search = ?params.search,
            edge_policy = ?params.edge_policy,
            pel = ?params.pel,
            references = references.len(),
            "configured motion estimator"
        );

        Ok(MotionEstimator { params, references })
    }

    #[must_use]
    pub fn params(&self) -> &EstimatorParams {
        &self.params
    }

    #[must_use]
    pub fn reference_count(&self) -> usize {
        self.references.len()
    }

    fn first_reference(&self) -> Plane<'r, T> {
        self.references[0].plane
    }

    /// Finds the best match of every block of `current` in the reference
    /// frames.
    ///
    /// Blocks are reported in raster order. When several blocks fail, the
    /// error of the first one in raster order is returned, whether or not
    /// the blocks were searched in parallel.
    pub fn estimate(&self, current: &Plane<'_, T>) -> Result<MotionField> {
        let reference = self.first_reference();
        if !current.same_dimensions(&reference) {
            return Err(MotionError::ShapeMismatch {
                left_width: current.width().get(),
                left_height: current.height().get(),
                right_width: reference.width().get(),
                right_height: reference.height().get(),
            });
        }

        let grid = BlockGrid::new(
            current.width().get(),
            current.height().get(),
            self.params.block_size.get(),
            self.params.edge_policy,
        );
        let search_block = |index| self.search_block(current, &grid, index);
        let results: Vec<Result<Option<BlockMotion>>> = if self.params.parallel {
            (0..grid.count()).into_par_iter().map(search_block).collect()
        } else {
            (0..grid.count()).map(search_block).collect()
        };
        let entries = results
            .into_iter()
            .filter_map(Result::transpose)
            .collect::<Result<Vec<_>>>()?;

        debug!(
            width = grid.width,
            height = grid.height,
            blocks = grid.count(),
            retained = entries.len(),
            "estimated motion field"
        );

        Ok(MotionField::new(
            entries,
            self.params.block_size,
            grid.blocks_x,
            grid.blocks_y,
            self.params.pel,
        ))
    }

    fn search_block(
        &self,
        current: &Plane<'_, T>,
        grid: &BlockGrid,
        index: usize,
    ) -> Result<Option<BlockMotion>> {
        let (block_x, block_y, width, height) = grid.block(index);
        let block = current.view(block_x, block_y, width, height)?;

        let mut block_flags = BlockFlags::empty();
        if width < grid.block_size || height < grid.block_size {
            block_flags |= BlockFlags::CLIPPED;
        }

        let mut best: Option<(usize, SearchResult, BlockFlags)> = None;
        for (reference_index, reference) in self.references.iter().enumerate() {
            let mut flags = block_flags;
            let window = self.window_for(block_x, block_y, &block, reference.plane, &mut flags);
            let request = BlockSearch {
                block,
                block_x,
                block_y,
                reference: reference.plane,
                window,
                metric: self.params.metric,
                early_termination: self.params.early_termination,
            };

            let found = match self.params.search.search(&request) {
                Ok(found) => found,
                Err(MotionError::EmptyWindow { .. })
                    if self.params.edge_policy == EdgePolicy::Exclude =>
                {
                    trace!(block_x, block_y, reference_index, "empty search window");
                    continue;
                }
                Err(err) => return Err(err),
            };
            let found = match &reference.halfpel {
                Some(planes) => {
                    let refined = refine_halfpel(&request, planes, found)?;
                    if refined.vector != found.vector.scaled(2) {
                        flags |= BlockFlags::SUBPEL_REFINED;
                    }
                    refined
                }
                None => found,
            };

            if best.is_none_or(|(_, current_best, _)| found.cost < current_best.cost) {
                best = Some((reference_index, found, flags));
            }
        }

        let Some((reference_index, found, flags)) = best else {
            trace!(block_x, block_y, "omitting block without candidates");
            return Ok(None);
        };

        trace!(
            block_x,
            block_y,
            dx = found.vector.dx,
            dy = found.vector.dy,
            cost = found.cost,
            reference_index,
            evaluated = found.evaluated,
            "matched block"
        );

        Ok(Some(BlockMotion {
            block_x,
            block_y,
            width,
            height,
            vector: found.vector,
            cost: found.cost,
            reference_index,
            flags,
        }))
    }

    /// The search window of one block. Under [`EdgePolicy::Clip`] the
    /// center is moved into the in-bounds range so the window always holds
    /// a candidate.
    fn window_for(
        &self,
        block_x: usize,
        block_y: usize,
        block: &BlockView<'_, T>,
        reference: Plane<'_, T>,
        flags: &mut BlockFlags,
    ) -> SearchWindow {
        let mut window = SearchWindow::new(self.params.window_center, self.params.radius);
        if self.params.edge_policy != EdgePolicy::Clip {
            return window;
        }
        if let Some(bounds) = DisplacementRange::in_bounds(
            block_x,
            block_y,
            block.width().get(),
            block.height().get(),
            reference.width().get(),
            reference.height().get(),
        ) {
            let center = bounds.clamp(window.center);
            if center != window.center {
                window.center = center;
                *flags |= BlockFlags::WINDOW_CLAMPED;
            }
        }
        window
    }

    /// Builds the prediction of the current frame from `field`: every entry
    /// copies its matched reference block to the block's position.
    ///
    /// Samples not covered by any entry are taken from the first reference
    /// frame at the same position.
    pub fn compensate(&self, field: &MotionField) -> Result<PlaneBuf<T>> {
        let mut predicted = self.first_reference().to_plane_buf();

        for entry in field {
            let reference = self.references.get(entry.reference_index).ok_or_else(|| {
                MotionError::InvalidConfiguration(format!(
                    "reference index {} is out of range, {} references are configured",
                    entry.reference_index,
                    self.references.len()
                ))
            })?;
            let out_of_bounds = || MotionError::OutOfBounds {
                x: entry.block_x,
                y: entry.block_y,
                width: entry.width,
                height: entry.height,
                plane_width: reference.plane.width().get(),
                plane_height: reference.plane.height().get(),
            };

            let block = match field.pel() {
                Subpel::Full => {
                    let (x, y) = displace(entry.block_x, entry.block_y, entry.vector)
                        .ok_or_else(out_of_bounds)?;
                    reference.plane.view(x, y, entry.width, entry.height)?
                }
                Subpel::Half => {
                    let planes = reference.halfpel.as_ref().ok_or_else(|| {
                        MotionError::InvalidConfiguration(
                            "a half-pel field needs an estimator configured with pel 2"
                                .to_string(),
                        )
                    })?;
                    halfpel_view(
                        reference.plane,
                        planes,
                        entry.block_x,
                        entry.block_y,
                        (entry.width, entry.height),
                        entry.vector,
                    )?
                    .ok_or_else(out_of_bounds)?
                }
            };
            predicted.write_block(entry.block_x, entry.block_y, &block)?;
        }

        Ok(predicted)
    }
}

/// Runs a single estimation of `current` against `references`.
pub fn estimate_motion<T: Pixel>(
    params: EstimatorParams,
    current: &Plane<'_, T>,
    references: &[Plane<'_, T>],
) -> Result<MotionField> {
    MotionEstimator::new(params, references)?.estimate(current)
}
