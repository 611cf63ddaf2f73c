use voxdens_core::{DensityHistogram, Frame, Grid};

/// Bins every particle of `frame` into a fresh histogram over `grid`.
///
/// Particles outside the domain are dropped silently; the number dropped is
/// `frame.len() - histogram.total()`.
pub fn bin_frame(frame: &Frame, grid: &Grid) -> DensityHistogram {
    let mut hist = DensityHistogram::for_grid(grid);
    for position in frame.iter_positions() {
        if let Some(voxel) = grid.classify(position) {
            hist.increment(voxel);
        }
    }
    hist
}

#[cfg(test)]
mod tests {
    use super::bin_frame;
    use proptest::prelude::*;
    use voxdens_core::{Frame, Grid, VoxelIndex};

    fn grid() -> Grid {
        Grid::cube(100.0, 10).unwrap()
    }

    #[test]
    fn reference_scenario() {
        let frame = Frame::from_interleaved(&[5.0, 5.0, 5.0, 95.0, 95.0, 95.0, 150.0, 50.0, 50.0]);
        let hist = bin_frame(&frame, &grid());
        assert_eq!(hist.len(), 1000);
        assert_eq!(hist.total(), 2);
        assert_eq!(hist.counts()[0], 1);
        assert_eq!(hist.counts()[999], 1);
        assert_eq!(hist.get(VoxelIndex::new(9, 9, 9)), 1);
    }

    #[test]
    fn empty_frame_gives_zero_histogram() {
        let hist = bin_frame(&Frame::new(), &grid());
        assert_eq!(hist.len(), 1000);
        assert_eq!(hist.total(), 0);
    }

    #[test]
    fn all_outside_gives_zero_histogram() {
        let frame = Frame::from_positions(vec![
            [-1.0, 5.0, 5.0],
            [100.0, 5.0, 5.0],
            [5.0, 5.0, 1e9],
            [-1e-12, 0.0, 0.0],
        ]);
        assert_eq!(bin_frame(&frame, &grid()).total(), 0);
    }

    #[test]
    fn coincident_particles_stack() {
        let frame = Frame::from_positions(vec![[42.0, 42.0, 42.0]; 500]);
        let hist = bin_frame(&frame, &grid());
        assert_eq!(hist.get(VoxelIndex::new(4, 4, 4)), 500);
        assert_eq!(hist.occupied_voxels(), 1);
    }

    proptest! {
        #[test]
        fn total_equals_in_domain_count(
            pts in prop::collection::vec(
                (-50.0f64..150.0, -50.0f64..150.0, -50.0f64..150.0),
                0..2000
            ),
            resolution in 1usize..16,
        ) {
            let grid = Grid::cube(100.0, resolution).unwrap();
            let frame = Frame::from_positions(pts.iter().map(|p| [p.0, p.1, p.2]).collect());
            let expected = frame
                .iter_positions()
                .filter(|p| p.iter().all(|&c| (0.0..100.0).contains(&c)))
                .count() as u64;
            let hist = bin_frame(&frame, &grid);
            prop_assert_eq!(hist.len(), resolution.pow(3));
            prop_assert_eq!(hist.total(), expected);
        }

        #[test]
        fn negative_coordinates_never_counted(
            pts in prop::collection::vec(
                (-1e6f64..-1e-9, 0.0f64..100.0, 0.0f64..100.0),
                1..200
            ),
        ) {
            let frame = Frame::from_positions(pts.iter().map(|p| [p.1, p.2, p.0]).collect());
            prop_assert_eq!(bin_frame(&frame, &grid()).total(), 0);
        }
    }
}
