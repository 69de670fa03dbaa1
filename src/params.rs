
use std::{num::NonZeroUsize, str::FromStr};

use bitflags::bitflags;

use crate::{
    error::{MotionError, Result},
    mv::MotionVector,
};

pub const DEFAULT_BLOCK_SIZE: usize = 16;
pub const DEFAULT_RADIUS: usize = 4;

fn invalid(message: String) -> MotionError {
    MotionError::InvalidConfiguration(message)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Subpel {
    Full = 1,
    Half = 2,
}

impl TryFrom<i64> for Subpel {
    type Error = MotionError;

    fn try_from(val: i64) -> Result<Self> {
        Ok(match val {
            1 => Self::Full,
            2 => Self::Half,
            _ => return Err(invalid(format!("Invalid value for 'pel', must be 1 or 2, got {val}."))),
        })
    }
}

impl From<Subpel> for usize {
    fn from(value: Subpel) -> Self {
        match value {
            Subpel::Full => 1,
            Subpel::Half => 2,
        }
    }
}

impl FromStr for Subpel {
    type Err = MotionError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "full" | "1" => Ok(Self::Full),
            "half" | "2" => Ok(Self::Half),
            _ => Err(invalid(format!("unknown pel precision '{s}'"))),
        }
    }
}

/// Block difference measure used to rank candidates.
///
/// Chosen once per estimator so that all costs of a call are comparable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DistortionMetric {
    /// Sum of absolute differences.
    #[default]
    Sad = 0,
    /// Sum of squared differences.
    Ssd = 1,
}

impl TryFrom<i64> for DistortionMetric {
    type Error = MotionError;

    fn try_from(val: i64) -> Result<Self> {
        Ok(match val {
            0 => Self::Sad,
            1 => Self::Ssd,
            _ => return Err(invalid(format!("Invalid value for 'metric', must be 0-1, got {val}."))),
        })
    }
}

impl FromStr for DistortionMetric {
    type Err = MotionError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "sad" => Ok(Self::Sad),
            "ssd" => Ok(Self::Ssd),
            _ => Err(invalid(format!("unknown metric '{s}'"))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchType {
    /// Every displacement of the window, in raster order.
    Exhaustive = 0,
    /// Eight neighbours at a halving step size.
    Nstep = 1,
    /// Large diamond until the center wins, then one small diamond.
    #[default]
    Diamond = 2,
    /// Large hexagon until the center wins, then one small diamond.
    Hexagon = 3,
}

impl TryFrom<i64> for SearchType {
    type Error = MotionError;

    fn try_from(val: i64) -> Result<Self> {
        Ok(match val {
            0 => Self::Exhaustive,
            1 => Self::Nstep,
            2 => Self::Diamond,
            3 => Self::Hexagon,
            _ => return Err(invalid(format!("Invalid value for 'search', must be 0-3, got {val}."))),
        })
    }
}

impl FromStr for SearchType {
    type Err = MotionError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "exhaustive" | "full" => Ok(Self::Exhaustive),
            "nstep" | "step" => Ok(Self::Nstep),
            "diamond" => Ok(Self::Diamond),
            "hexagon" | "hex" => Ok(Self::Hexagon),
            _ => Err(invalid(format!("unknown search type '{s}'"))),
        }
    }
}

/// What happens to blocks that do not fit the frame or its search range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EdgePolicy {
    /// Partial edge blocks are kept with their clipped size, and the window
    /// is moved inside the frame when it would otherwise be empty.
    #[default]
    Clip = 0,
    /// Partial edge blocks are dropped, and blocks without any in-bounds
    /// candidate are omitted from the field.
    Exclude = 1,
}

impl TryFrom<i64> for EdgePolicy {
    type Error = MotionError;

    fn try_from(val: i64) -> Result<Self> {
        Ok(match val {
            0 => Self::Clip,
            1 => Self::Exclude,
            _ => return Err(invalid(format!("Invalid value for 'edge', must be 0-1, got {val}."))),
        })
    }
}

impl FromStr for EdgePolicy {
    type Err = MotionError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "clip" => Ok(Self::Clip),
            "exclude" => Ok(Self::Exclude),
            _ => Err(invalid(format!("unknown edge policy '{s}'"))),
        }
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct BlockFlags: u8 {
        /// The block is smaller than the configured block size.
        const CLIPPED = 0x01;
        /// The search window was moved to stay inside the reference frame.
        const WINDOW_CLAMPED = 0x02;
        /// Half-pel refinement moved the vector off the integer grid.
        const SUBPEL_REFINED = 0x04;
    }
}

/// Immutable configuration of a [`MotionEstimator`](crate::MotionEstimator).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EstimatorParams {
    /// Width and height of the square blocks, in pixels.
    pub block_size: NonZeroUsize,
    /// Search radius around the window center, in pixels.
    pub radius: usize,
    pub metric: DistortionMetric,
    pub search: SearchType,
    pub edge_policy: EdgePolicy,
    pub pel: Subpel,
    /// Full-pel predictor every window is centred on. Zero unless the caller
    /// knows a global motion.
    pub window_center: MotionVector,
    /// Abandon candidates once their partial cost reaches the best cost.
    pub early_termination: bool,
    /// Search blocks on the rayon thread pool.
    pub parallel: bool,
}

impl Default for EstimatorParams {
    fn default() -> Self {
        EstimatorParams {
            // SAFETY: constant is non-zero
            block_size: unsafe { NonZeroUsize::new_unchecked(DEFAULT_BLOCK_SIZE) },
            radius: DEFAULT_RADIUS,
            metric: DistortionMetric::Sad,
            search: SearchType::Diamond,
            edge_policy: EdgePolicy::Clip,
            pel: Subpel::Full,
            window_center: MotionVector::zero(),
            early_termination: true,
            parallel: true,
        }
    }
}

impl EstimatorParams {
    /// Builds a configuration from optional integer arguments, the way a
    /// scripting host hands them over. Missing arguments take their defaults.
    pub fn from_args(
        blksize: Option<i64>,
        radius: Option<i64>,
        metric: Option<i64>,
        search: Option<i64>,
        edge: Option<i64>,
        pel: Option<i64>,
        early_termination: Option<i64>,
        parallel: Option<i64>,
    ) -> Result<Self> {
        let defaults = Self::default();

        let block_size = match blksize {
            None => defaults.block_size,
            Some(val) => usize::try_from(val)
                .ok()
                .and_then(NonZeroUsize::new)
                .ok_or_else(|| {
                    invalid(format!("block size must be greater than 0, got {val}."))
                })?,
        };
        let radius = match radius {
            None => defaults.radius,
            Some(val) => usize::try_from(val).map_err(|_| {
                invalid(format!("search radius must not be negative, got {val}."))
            })?,
        };

        let params = EstimatorParams {
            block_size,
            radius,
            metric: metric.map_or(Ok(defaults.metric), DistortionMetric::try_from)?,
            search: search.map_or(Ok(defaults.search), SearchType::try_from)?,
            edge_policy: edge.map_or(Ok(defaults.edge_policy), EdgePolicy::try_from)?,
            pel: pel.map_or(Ok(defaults.pel), Subpel::try_from)?,
            window_center: defaults.window_center,
            early_termination: early_termination.is_none_or(|early| early > 0),
            parallel: parallel.is_none_or(|parallel| parallel > 0),
        };
        params.validate()?;
        Ok(params)
    }

    /// Rejects settings the search cannot represent. The radius must fit in
    /// an `isize` so every window offset is a valid displacement.
    pub fn validate(&self) -> Result<()> {
        if isize::try_from(self.radius).is_err() {
            return Err(invalid(format!(
                "search radius must be at most {}, got {}.",
                isize::MAX,
                self.radius
            )));
        }
        Ok(())
    }

    #[must_use]
    pub fn with_block_size(mut self, block_size: NonZeroUsize) -> Self {
        self.block_size = block_size;
        self
    }

    #[must_use]
    pub fn with_radius(mut self, radius: usize) -> Self {
        self.radius = radius;
        self
    }

    #[must_use]
    pub fn with_metric(mut self, metric: DistortionMetric) -> Self {
        self.metric = metric;
        self
    }

    #[must_use]
    pub fn with_search(mut self, search: SearchType) -> Self {
        self.search = search;
        self
    }

    #[must_use]
    pub fn with_edge_policy(mut self, edge_policy: EdgePolicy) -> Self {
        self.edge_policy = edge_policy;
        self
    }

    #[must_use]
    pub fn with_pel(mut self, pel: Subpel) -> Self {
        self.pel = pel;
        self
    }

    #[must_use]
    pub fn with_window_center(mut self, window_center: MotionVector) -> Self {
        self.window_center = window_center;
        self
    }

    #[must_use]
    pub fn with_early_termination(mut self, early_termination: bool) -> Self {
        self.early_termination = early_termination;
        self
    }

    #[must_use]
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }
}
