#![allow(clippy::unwrap_used, reason = "allow in test files")]

use std::num::NonZeroUsize;

use super::*;
use crate::{
    mv::MotionVector,
    params::{DistortionMetric, SearchType},
    tests::{random_frame, translate},
};

fn params(block_size: usize, radius: usize) -> EstimatorParams {
    EstimatorParams::default()
        .with_block_size(NonZeroUsize::new(block_size).unwrap())
        .with_radius(radius)
}

#[test]
fn new_requires_a_reference() {
    let result = MotionEstimator::<u8>::new(EstimatorParams::default(), &[]);
    assert!(matches!(result, Err(MotionError::InvalidConfiguration(_))));
}

#[test]
fn new_rejects_mismatched_references() {
    let a = vec![0u8; 64];
    let b = vec![0u8; 48];
    let result = MotionEstimator::new(EstimatorParams::default(), &[plane!(a, 8, 8), plane!(b, 8, 6)]);

    assert_eq!(
        result.unwrap_err(),
        MotionError::ShapeMismatch {
            left_width: 8,
            left_height: 8,
            right_width: 8,
            right_height: 6,
        }
    );
}

#[test]
fn new_rejects_unrepresentable_radius() {
    let data = vec![0u8; 64];
    let result = MotionEstimator::new(params(8, usize::MAX), &[plane!(data, 8, 8)]);
    assert!(matches!(result, Err(MotionError::InvalidConfiguration(_))));
}

#[test]
fn largest_radius_still_finds_a_candidate() {
    let current = random_frame::<u8>(8, 8, 255, 13);
    let reference = random_frame::<u8>(8, 8, 255, 14);
    for search in [SearchType::Exhaustive, SearchType::Nstep, SearchType::Diamond, SearchType::Hexagon] {
        let estimator = MotionEstimator::new(
            params(8, isize::MAX as usize).with_search(search),
            &[plane!(reference, 8, 8)],
        )
        .unwrap();
        let field = estimator.estimate(&plane!(current, 8, 8)).unwrap();

        assert_eq!(field.len(), 1, "{search:?}");
        assert!(field.get(0, 0).unwrap().vector.is_zero());
    }
}

#[test]
fn extreme_window_centers_do_not_overflow() {
    let current = random_frame::<u8>(16, 16, 255, 15);
    let reference = random_frame::<u8>(16, 16, 255, 16);
    let center = MotionVector::new(isize::MAX, isize::MIN);

    let exclude = MotionEstimator::new(
        params(8, 2)
            .with_edge_policy(EdgePolicy::Exclude)
            .with_window_center(center),
        &[plane!(reference, 16, 16)],
    )
    .unwrap();
    assert!(exclude.estimate(&plane!(current, 16, 16)).unwrap().is_empty());

    let clip = MotionEstimator::new(
        params(8, 2).with_window_center(center).with_pel(Subpel::Half),
        &[plane!(reference, 16, 16)],
    )
    .unwrap();
    let field = clip.estimate(&plane!(current, 16, 16)).unwrap();
    assert_eq!(field.len(), 4);
    assert!(
        field
            .iter()
            .all(|e| e.flags.contains(BlockFlags::WINDOW_CLAMPED))
    );
}

#[test]
fn estimate_rejects_mismatched_current() {
    let reference = vec![0u8; 64];
    let current = vec![0u8; 72];
    let estimator = MotionEstimator::new(params(4, 1), &[plane!(reference, 8, 8)]).unwrap();

    assert!(matches!(
        estimator.estimate(&plane!(current, 9, 8)),
        Err(MotionError::ShapeMismatch { .. })
    ));
}

#[test]
fn grid_clips_edge_blocks() {
    let clip = BlockGrid::new(20, 13, 8, EdgePolicy::Clip);
    assert_eq!((clip.blocks_x, clip.blocks_y), (3, 2));
    assert_eq!(clip.block(0), (0, 0, 8, 8));
    assert_eq!(clip.block(2), (16, 0, 4, 8));
    assert_eq!(clip.block(5), (16, 8, 4, 5));

    let exclude = BlockGrid::new(20, 13, 8, EdgePolicy::Exclude);
    assert_eq!((exclude.blocks_x, exclude.blocks_y), (2, 1));
    assert_eq!(exclude.count(), 2);

    let tiny = BlockGrid::new(5, 5, 8, EdgePolicy::Exclude);
    assert_eq!(tiny.count(), 0);
}

#[test]
fn clip_covers_the_frame() {
    let (width, height) = (20, 13);
    let current = random_frame::<u8>(width, height, 255, 1);
    let reference = random_frame::<u8>(width, height, 255, 2);
    let estimator = MotionEstimator::new(params(8, 2), &[plane!(reference, width, height)]).unwrap();
    let field = estimator.estimate(&plane!(current, width, height)).unwrap();

    assert_eq!(field.len(), 6);
    let mut covered = vec![0u8; width * height];
    for entry in &field {
        for y in entry.block_y..entry.block_y + entry.height {
            for x in entry.block_x..entry.block_x + entry.width {
                covered[y * width + x] += 1;
            }
        }
        let clipped = entry.width < 8 || entry.height < 8;
        assert_eq!(entry.flags.contains(BlockFlags::CLIPPED), clipped);
    }
    assert!(covered.iter().all(|&c| c == 1));
}

#[test]
fn exclude_drops_partial_blocks() {
    let (width, height) = (20, 13);
    let current = random_frame::<u8>(width, height, 255, 3);
    let estimator = MotionEstimator::new(
        params(8, 2).with_edge_policy(EdgePolicy::Exclude),
        &[plane!(current, width, height)],
    )
    .unwrap();
    let field = estimator.estimate(&plane!(current, width, height)).unwrap();

    assert_eq!((field.blocks_x(), field.blocks_y()), (2, 1));
    assert_eq!(field.len(), 2);
    assert!(field.iter().all(|e| e.width == 8 && e.height == 8 && e.cost == 0));
}

#[test]
fn exclude_omits_blocks_with_empty_windows() {
    let current = random_frame::<u8>(16, 8, 255, 4);
    let reference = random_frame::<u8>(16, 8, 255, 5);
    let estimator = MotionEstimator::new(
        params(4, 2)
            .with_edge_policy(EdgePolicy::Exclude)
            .with_window_center(MotionVector::new(-10, 0)),
        &[plane!(reference, 16, 8)],
    )
    .unwrap();
    let field = estimator.estimate(&plane!(current, 16, 8)).unwrap();

    // Only the two right columns can move ten pixels to the left.
    assert_eq!(field.len(), 4);
    assert!(field.get(0, 0).is_none());
    assert!(field.get(1, 1).is_none());
    assert_eq!(field.get(2, 0).unwrap().vector.dx, -8);
    assert!(field.iter().all(|e| e.block_x >= 8));
}

#[test]
fn clip_moves_empty_windows_inside_the_frame() {
    let current = random_frame::<u8>(16, 8, 255, 4);
    let reference = random_frame::<u8>(16, 8, 255, 5);
    let estimator = MotionEstimator::new(
        params(4, 2).with_window_center(MotionVector::new(-10, 0)),
        &[plane!(reference, 16, 8)],
    )
    .unwrap();
    let field = estimator.estimate(&plane!(current, 16, 8)).unwrap();

    assert_eq!(field.len(), 8);
    for entry in &field {
        let clamped = entry.block_x < 12;
        assert_eq!(entry.flags.contains(BlockFlags::WINDOW_CLAMPED), clamped);
    }
    assert!((0..=2).contains(&field.get(0, 0).unwrap().vector.dx));
}

#[test]
fn best_reference_wins() {
    let current = random_frame::<u16>(16, 16, 1023, 6);
    let noise = random_frame::<u16>(16, 16, 1023, 7);
    let estimator = MotionEstimator::new(
        params(8, 1).with_search(SearchType::Exhaustive),
        &[plane!(noise, 16, 16), plane!(current, 16, 16)],
    )
    .unwrap();
    let field = estimator.estimate(&plane!(current, 16, 16)).unwrap();

    assert_eq!(estimator.reference_count(), 2);
    assert!(field.iter().all(|e| e.reference_index == 1 && e.cost == 0));
    assert!(field.iter().all(|e| e.vector.is_zero()));
}

#[test]
fn ties_go_to_the_lower_reference() {
    let current = random_frame::<u8>(16, 16, 255, 8);
    let estimator = MotionEstimator::new(
        params(8, 2),
        &[plane!(current, 16, 16), plane!(current, 16, 16)],
    )
    .unwrap();
    let field = estimator.estimate(&plane!(current, 16, 16)).unwrap();

    assert!(field.iter().all(|e| e.reference_index == 0));
}

#[test]
fn parallel_and_sequential_agree() {
    let current = random_frame::<u8>(48, 40, 255, 9);
    let reference = translate(&current, 48, 40, 2, -1);
    for search in [SearchType::Exhaustive, SearchType::Nstep, SearchType::Diamond, SearchType::Hexagon] {
        let base = params(8, 3).with_search(search).with_metric(DistortionMetric::Ssd);
        let references = [plane!(reference, 48, 40)];

        let parallel = MotionEstimator::new(base.with_parallel(true), &references)
            .unwrap()
            .estimate(&plane!(current, 48, 40))
            .unwrap();
        let sequential = MotionEstimator::new(base.with_parallel(false), &references)
            .unwrap()
            .estimate(&plane!(current, 48, 40))
            .unwrap();

        assert_eq!(parallel, sequential, "{search:?}");
    }
}

#[test]
fn compensate_rejects_unknown_references() {
    let data = vec![0u8; 64];
    let estimator = MotionEstimator::new(params(8, 1), &[plane!(data, 8, 8)]).unwrap();
    let field = MotionField::new(
        vec![BlockMotion {
            block_x: 0,
            block_y: 0,
            width: 8,
            height: 8,
            vector: MotionVector::zero(),
            cost: 0,
            reference_index: 3,
            flags: BlockFlags::empty(),
        }],
        NonZeroUsize::new(8).unwrap(),
        1,
        1,
        Subpel::Full,
    );

    assert!(matches!(
        estimator.compensate(&field),
        Err(MotionError::InvalidConfiguration(_))
    ));
}

#[test]
fn compensate_rejects_vectors_leaving_the_frame() {
    let data = vec![0u8; 64];
    let estimator = MotionEstimator::new(params(4, 1), &[plane!(data, 8, 8)]).unwrap();
    let field = MotionField::new(
        vec![BlockMotion {
            block_x: 4,
            block_y: 0,
            width: 4,
            height: 4,
            vector: MotionVector::new(1, 0),
            cost: 0,
            reference_index: 0,
            flags: BlockFlags::empty(),
        }],
        NonZeroUsize::new(4).unwrap(),
        2,
        2,
        Subpel::Full,
    );

    assert!(matches!(
        estimator.compensate(&field),
        Err(MotionError::OutOfBounds { .. })
    ));
}

#[test]
fn compensate_fills_omitted_blocks_from_the_first_reference() {
    let current = random_frame::<u8>(16, 8, 255, 10);
    let reference = random_frame::<u8>(16, 8, 255, 11);
    let estimator = MotionEstimator::new(
        params(4, 2)
            .with_edge_policy(EdgePolicy::Exclude)
            .with_window_center(MotionVector::new(-10, 0)),
        &[plane!(reference, 16, 8)],
    )
    .unwrap();
    let field = estimator.estimate(&plane!(current, 16, 8)).unwrap();
    let predicted = estimator.compensate(&field).unwrap();

    for y in 0..8 {
        for x in 0..8 {
            assert_eq!(predicted.sample(x, y).unwrap(), reference[y * 16 + x]);
        }
    }
}

#[test]
fn estimate_motion_runs_once() {
    let current = random_frame::<u8>(16, 16, 255, 12);
    let reference = translate(&current, 16, 16, 1, 0);
    let field = estimate_motion(
        params(8, 2).with_search(SearchType::Exhaustive),
        &plane!(current, 16, 16),
        &[plane!(reference, 16, 16)],
    )
    .unwrap();

    assert_eq!(field.len(), 4);
    assert_eq!(field.get(0, 0).unwrap().vector, MotionVector::new(1, 0));
    assert_eq!(field.get(0, 0).unwrap().cost, 0);
}
