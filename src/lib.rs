// Performance
#![warn(clippy::clear_with_drain)]
#![warn(clippy::format_collect)]
#![warn(clippy::imprecise_flops)]
#![warn(clippy::inefficient_to_string)]
#![warn(clippy::inline_always)]
#![warn(clippy::large_types_passed_by_value)]
#![deny(clippy::linkedlist)]
// Can result in worse code generation: https://github.com/rust-lang/rust-clippy/issues/14944
#![allow(clippy::manual_div_ceil)]
#![warn(clippy::needless_bitwise_bool)]
#![warn(clippy::needless_collect)]
#![warn(clippy::needless_pass_by_value)]
#![warn(clippy::or_fun_call)]
#![warn(clippy::redundant_clone)]
#![warn(clippy::ref_option)]
#![warn(clippy::stable_sort_primitive)]
#![warn(clippy::trivially_copy_pass_by_ref)]
#![warn(clippy::unnecessary_box_returns)]
// Readability/Code Intention
#![warn(clippy::checked_conversions)]
#![warn(clippy::cloned_instead_of_copied)]
#![warn(clippy::enum_glob_use)]
#![warn(clippy::equatable_if_let)]
#![warn(clippy::filter_map_next)]
#![warn(clippy::flat_map_option)]
#![warn(clippy::if_then_some_else_none)]
#![warn(clippy::implicit_clone)]
#![warn(clippy::inconsistent_struct_constructor)]
#![warn(clippy::invalid_upcast_comparisons)]
#![warn(clippy::iter_filter_is_ok)]
#![warn(clippy::iter_filter_is_some)]
#![warn(clippy::manual_assert)]
#![warn(clippy::manual_is_variant_and)]
#![warn(clippy::manual_let_else)]
#![warn(clippy::map_unwrap_or)]
#![warn(clippy::match_bool)]
#![warn(clippy::mod_module_files)]
#![warn(clippy::needless_continue)]
#![warn(clippy::option_if_let_else)]
#![warn(clippy::range_minus_one)]
#![warn(clippy::range_plus_one)]
#![warn(clippy::semicolon_if_nothing_returned)]
#![warn(clippy::tests_outside_test_module)]
#![warn(clippy::verbose_bit_mask)]
// Correctness/Safety
#![deny(clippy::cfg_not_test)]
#![warn(clippy::dbg_macro)]
#![deny(clippy::debug_assert_with_mut_call)]
#![deny(clippy::expl_impl_clone_on_copy)]
#![warn(clippy::large_stack_arrays)]
#![warn(clippy::manual_midpoint)]
#![warn(clippy::mem_forget)]
#![warn(clippy::mixed_read_write_in_expression)]
#![deny(clippy::non_send_fields_in_send_ty)]
#![warn(clippy::suspicious_operation_groupings)]
#![warn(clippy::undocumented_unsafe_blocks)]
#![warn(clippy::unwrap_used)]
// Annoyances
#![allow(clippy::needless_range_loop)]
#![allow(clippy::too_many_arguments)]
#![allow(clippy::uninlined_format_args)]
#![allow(unsafe_op_in_unsafe_fn)]

//! Block-matching motion estimation.
//!
//! A [`MotionEstimator`] is configured once with [`EstimatorParams`] and a set
//! of reference [`Plane`]s. Each call to [`MotionEstimator::estimate`] splits
//! the current frame into square blocks, searches every block in every
//! reference frame, and returns the best match per block as a
//! [`MotionField`].


pub mod error;
pub mod estimator;
pub mod field;
pub mod metric;
pub mod mv;
pub mod params;
pub mod plane;
pub mod refine;
pub mod search;
pub mod util;

pub use error::{MotionError, Result};
pub use estimator::{MotionEstimator, estimate_motion};
pub use field::{BlockMotion, MotionField};
pub use mv::MotionVector;
pub use params::{
    BlockFlags, DistortionMetric, EdgePolicy, EstimatorParams, SearchType, Subpel,
};
pub use plane::{BlockView, Plane, PlaneBuf};
pub use search::{SearchResult, SearchWindow};
pub use util::Pixel;
