//! Height-map rasterizer
//!
//! Stamps the ball cutter's footprint at every sample point and keeps the
//! running minimum per cell. Because the update is a minimum, the result does
//! not depend on the order in which samples are applied.

use millsurf_core::SamplePoint;
use rayon::prelude::*;
use tracing::debug;

use super::cutter::BallCutter;
use super::height_map::HeightMap;

/// Samples per work item when rasterizing in parallel
const PARALLEL_CHUNK: usize = 4096;

/// Owns the height map for the duration of a simulation
#[derive(Debug, Clone)]
pub struct Rasterizer {
    map: HeightMap,
    cutter: BallCutter,
    samples_applied: usize,
}

impl Rasterizer {
    /// `map` must already be sized and initialized to the material top
    pub fn new(map: HeightMap, cutter: BallCutter) -> Self {
        debug_assert_eq!(map.pixels_per_mm(), cutter.pixels_per_mm());
        Self {
            map,
            cutter,
            samples_applied: 0,
        }
    }

    pub fn cutter(&self) -> &BallCutter {
        &self.cutter
    }

    pub fn samples_applied(&self) -> usize {
        self.samples_applied
    }

    /// Apply one sample; returns the number of cells it lowered
    pub fn apply(&mut self, sample: &SamplePoint) -> usize {
        self.samples_applied += 1;
        stamp(&mut self.map, &self.cutter, sample)
    }

    /// Apply samples in sequence
    pub fn apply_all<I>(&mut self, samples: I)
    where
        I: IntoIterator<Item = SamplePoint>,
    {
        for sample in samples {
            self.apply(&sample);
        }
    }

    /// Apply a materialized batch across the rayon thread pool.
    ///
    /// Each worker stamps into its own blank map; the partial maps are reduced
    /// with a cell-wise minimum and merged into this one. The result is
    /// identical to [`Rasterizer::apply_all`] over the same samples.
    pub fn apply_parallel(&mut self, samples: &[SamplePoint]) {
        let template = self.map.blank_copy();
        let cutter = &self.cutter;

        let merged = samples
            .par_chunks(PARALLEL_CHUNK)
            .fold(
                || template.clone(),
                |mut partial, chunk| {
                    for sample in chunk {
                        stamp(&mut partial, cutter, sample);
                    }
                    partial
                },
            )
            .reduce_with(|mut a, b| {
                a.merge_min(&b);
                a
            });

        if let Some(partial) = merged {
            self.map.merge_min(&partial);
        }
        self.samples_applied += samples.len();
        debug!("Parallel rasterization applied {} samples", samples.len());
    }

    /// Hand the finished map to the caller
    pub fn finish(self) -> HeightMap {
        self.map
    }
}

/// Lower every footprint cell around `sample` to the ball surface height.
///
/// The sample is snapped to its nearest cell center; footprint cells outside
/// the map are clipped.
fn stamp(map: &mut HeightMap, cutter: &BallCutter, sample: &SamplePoint) -> usize {
    let (cx, cy) = map.world_to_pixel(sample.x, sample.y);
    let reach = cutter.radius_px();
    // Far samples saturate to isize::MAX/MIN
    if cx.saturating_add(reach) < 0
        || cy.saturating_add(reach) < 0
        || cx.saturating_sub(reach) >= map.width_px() as isize
        || cy.saturating_sub(reach) >= map.height_px() as isize
    {
        return 0;
    }

    let mut lowered = 0;
    for cell in cutter.footprint() {
        if map.lower_at_pixel(cx + cell.dx, cy + cell.dy, sample.z + cell.lift_mm) {
            lowered += 1;
        }
    }
    lowered
}
