//! Property tests for the min-accumulating rasterizer

use millsurf_core::{Bounds, Point3, SamplePoint};
use millsurf_visualizer::{BallCutter, HeightMap, Rasterizer};
use proptest::prelude::*;

const TOP: f64 = 0.5;

fn rasterizer() -> Rasterizer {
    let mut bounds = Bounds::new();
    bounds.update(Point3::new(-3.0, -3.0, 0.0));
    bounds.update(Point3::new(3.0, 3.0, 0.0));
    let cutter = BallCutter::new(1.5, 5.0).unwrap();
    let map = HeightMap::new(&bounds, 5.0, TOP).unwrap();
    Rasterizer::new(map, cutter)
}

fn sample() -> impl Strategy<Value = SamplePoint> {
    // Slightly wider than the grid so clipping is exercised
    (-3.5f64..3.5, -3.5f64..3.5, -2.0f64..1.0).prop_map(|(x, y, z)| SamplePoint::new(x, y, z))
}

fn samples(max: usize) -> impl Strategy<Value = Vec<SamplePoint>> {
    prop::collection::vec(sample(), 1..max)
}

proptest! {
    #[test]
    fn heights_never_increase(samples in samples(30)) {
        let mut raster = rasterizer();
        let mut previous = raster.clone().finish();
        for sample in &samples {
            raster.apply(sample);
            let current = raster.clone().finish();
            for (now, before) in current.heights().iter().zip(previous.heights()) {
                prop_assert!(now <= before);
            }
            previous = current;
        }
    }

    #[test]
    fn heights_never_exceed_top(samples in samples(30)) {
        let mut raster = rasterizer();
        raster.apply_all(samples);
        let map = raster.finish();
        prop_assert!(map.heights().iter().all(|&h| h <= TOP));
    }

    #[test]
    fn sample_order_does_not_matter(
        (original, shuffled) in samples(40).prop_flat_map(|v| (Just(v.clone()), Just(v).prop_shuffle()))
    ) {
        let mut a = rasterizer();
        a.apply_all(original);
        let mut b = rasterizer();
        b.apply_all(shuffled);
        prop_assert_eq!(a.finish(), b.finish());
    }

    #[test]
    fn parallel_matches_sequential(samples in samples(60)) {
        let mut sequential = rasterizer();
        sequential.apply_all(samples.iter().copied());
        let mut parallel = rasterizer();
        parallel.apply_parallel(&samples);
        prop_assert_eq!(sequential.finish(), parallel.finish());
    }

    #[test]
    fn cell_under_sample_is_at_most_its_z(s in sample()) {
        let mut raster = rasterizer();
        raster.apply(&s);
        let map = raster.finish();
        if let Some(h) = map.get_height(s.x, s.y) {
            // Same snapped cell as the footprint center
            prop_assert!(h <= s.z.min(TOP));
        }
    }
}
