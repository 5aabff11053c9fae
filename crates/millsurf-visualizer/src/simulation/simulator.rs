//! Simulation driver
//!
//! Ties the pipeline together: parse, size the grid, step every segment and
//! rasterize the samples. The height map is returned only once every sample
//! has been applied.

use millsurf_core::{Bounds, MotionSegment, SamplePoint, SimulationConfig};
use tracing::{debug, info};

use super::cutter::BallCutter;
use super::height_map::HeightMap;
use super::rasterizer::Rasterizer;
use super::stepper::{PathStepper, StepperStats};
use crate::error::SimulationError;
use crate::gcode::{GcodeParser, ParseStats};

/// How often (in samples) the progress callback is consulted
const PROGRESS_MASK: usize = 0xFF;

/// Outcome of a completed simulation
#[derive(Debug, Clone)]
pub struct SimulationResult {
    pub height_map: HeightMap,
    /// Present when the run started from program text
    pub parse_stats: Option<ParseStats>,
    pub stepper_stats: StepperStats,
    /// XYZ extent of the motion endpoints, before padding
    pub motion_bounds: Option<Bounds>,
    /// Deepest surface height
    pub min_z: f64,
    /// Highest surface height
    pub max_z: f64,
    /// Cells below the material top
    pub cut_cells: usize,
    /// Volume of material removed (mm³)
    pub material_removed: f64,
}

/// Ball-nose height-map simulation
#[derive(Debug, Clone)]
pub struct Simulation {
    config: SimulationConfig,
    cutter: BallCutter,
    parallel: bool,
}

impl Simulation {
    /// Validate the configuration and build the cutter footprint
    pub fn new(config: SimulationConfig) -> Result<Self, SimulationError> {
        config.validate()?;
        let cutter = BallCutter::new(config.tool_diameter_mm, config.pixels_per_mm)?;
        Ok(Self {
            config,
            cutter,
            parallel: false,
        })
    }

    /// Rasterize on the rayon thread pool instead of the calling thread
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn cutter(&self) -> &BallCutter {
        &self.cutter
    }

    /// Parse and simulate a whole program
    pub fn run(&self, source: &str) -> Result<SimulationResult, SimulationError> {
        self.run_with_progress(source, |_| true)
    }

    /// Parse and simulate, reporting progress in `[0, 1]`
    ///
    /// Returning `false` from `on_progress` stops the run with
    /// [`SimulationError::Cancelled`].
    pub fn run_with_progress<F>(
        &self,
        source: &str,
        on_progress: F,
    ) -> Result<SimulationResult, SimulationError>
    where
        F: FnMut(f32) -> bool,
    {
        let program = GcodeParser::new().parse(source)?;
        info!("Parsed {} motion segments", program.segments.len());
        let mut result = self.simulate_segments_with_progress(&program.segments, on_progress)?;
        result.parse_stats = Some(program.stats);
        Ok(result)
    }

    /// Simulate already-parsed segments
    pub fn simulate_segments(
        &self,
        segments: &[MotionSegment],
    ) -> Result<SimulationResult, SimulationError> {
        self.simulate_segments_with_progress(segments, |_| true)
    }

    pub fn simulate_segments_with_progress<F>(
        &self,
        segments: &[MotionSegment],
        mut on_progress: F,
    ) -> Result<SimulationResult, SimulationError>
    where
        F: FnMut(f32) -> bool,
    {
        let motion_bounds = Bounds::from_segments(segments);
        let map = self.allocate(motion_bounds.as_ref())?;
        let mut rasterizer = Rasterizer::new(map, self.cutter.clone());

        let total = segments.len().max(1) as f32;
        let mut stepper = PathStepper::new(
            segments.iter().copied(),
            self.config.step_mm,
            self.config.material_top_height,
        )?;
        let mut progress = ProgressReporter::new(&mut on_progress);
        progress.report(0.0)?;

        // In parallel mode stepping covers the first half of the progress range
        let scale = if self.parallel { 0.5 } else { 1.0 };
        let mut pending: Vec<SamplePoint> = Vec::new();
        let mut i = 0usize;
        while let Some(sample) = stepper.next() {
            if (i & PROGRESS_MASK) == 0 {
                progress.report(stepper.stats().segments_consumed as f32 / total * scale)?;
            }
            if self.parallel {
                pending.push(sample);
            } else {
                rasterizer.apply(&sample);
            }
            i += 1;
        }
        if self.parallel {
            progress.report(0.5)?;
            rasterizer.apply_parallel(&pending);
        }
        progress.report(1.0)?;

        let stepper_stats = stepper.stats();
        debug!(
            "Stepping complete: {} samples from {} segments ({} above material, {} zero-length)",
            stepper_stats.samples,
            stepper_stats.segments_consumed,
            stepper_stats.segments_above_material,
            stepper_stats.segments_zero_length
        );

        let height_map = rasterizer.finish();
        Ok(SimulationResult {
            min_z: height_map.min_height(),
            max_z: height_map.max_height(),
            cut_cells: height_map.cut_cells(),
            material_removed: height_map.removed_volume(),
            height_map,
            parse_stats: None,
            stepper_stats,
            motion_bounds,
        })
    }

    /// Size a grid around the motion, padded by the tool radius
    fn allocate(&self, motion_bounds: Option<&Bounds>) -> Result<HeightMap, SimulationError> {
        let bounds = motion_bounds.copied().unwrap_or_else(Bounds::origin);
        if let Some(b) = motion_bounds {
            info!("X range: {:.3} to {:.3} mm", b.min_x, b.max_x);
            info!("Y range: {:.3} to {:.3} mm", b.min_y, b.max_y);
            info!("Z range: {:.3} to {:.3} mm", b.min_z, b.max_z);
        }

        let padded = bounds.padded_xy(self.cutter.radius_mm());
        let map = HeightMap::new(
            &padded,
            self.config.pixels_per_mm,
            self.config.material_top_height,
        )?;
        info!(
            "Height map {}x{} px, material top {:.3} mm",
            map.width_px(),
            map.height_px(),
            self.config.material_top_height
        );
        info!(
            "Tool diameter {:.3} mm, radius {} px",
            self.config.tool_diameter_mm,
            self.cutter.radius_px()
        );
        Ok(map)
    }
}

/// Forwards progress to the caller and logs every 10 %
struct ProgressReporter<'a, F> {
    callback: &'a mut F,
    next_log: f32,
}

impl<'a, F> ProgressReporter<'a, F>
where
    F: FnMut(f32) -> bool,
{
    fn new(callback: &'a mut F) -> Self {
        Self {
            callback,
            next_log: 0.1,
        }
    }

    fn report(&mut self, fraction: f32) -> Result<(), SimulationError> {
        let fraction = fraction.clamp(0.0, 1.0);
        if fraction >= self.next_log {
            info!("Progress: {:.0}%", fraction * 100.0);
            self.next_log = (fraction * 10.0).floor() / 10.0 + 0.1;
        }
        if (self.callback)(fraction) {
            Ok(())
        } else {
            debug!("Simulation cancelled at {:.1}%", fraction * 100.0);
            Err(SimulationError::Cancelled)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use millsurf_core::{ConfigurationError, MotionKind, ParseError, Point3};

    fn config(top: f64) -> SimulationConfig {
        SimulationConfig::new(10.0, 2.0, top, 1.0)
    }

    #[test]
    fn test_empty_program_is_flat_top() {
        let result = Simulation::new(config(1.5)).unwrap().run("").unwrap();
        let map = &result.height_map;

        assert_eq!((map.width_px(), map.height_px()), (21, 21));
        assert!(map.heights().iter().all(|&h| h == 1.5));
        assert_eq!(result.cut_cells, 0);
        assert_eq!(result.material_removed, 0.0);
        assert!(result.motion_bounds.is_none());
        assert_eq!(result.stepper_stats.samples, 0);
    }

    #[test]
    fn test_grid_is_padded_by_tool_radius() {
        let result = Simulation::new(config(0.0))
            .unwrap()
            .run("G0 X2 Y3 Z1\nG1 X7 Y5 Z-1")
            .unwrap();
        let map = &result.height_map;

        assert_eq!(map.origin(), (1.0, 2.0));
        assert_eq!(map.width_px(), 71);
        assert_eq!(map.height_px(), 41);
        assert_eq!(map.get_height(7.0, 5.0), Some(-1.0));
        assert_eq!(result.min_z, -1.0);
        assert_eq!(result.max_z, 0.0);
        assert!(result.cut_cells > 0);
        assert!(result.material_removed > 0.0);
        assert_eq!(result.parse_stats.map(|s| s.linear_segments), Some(1));
    }

    #[test]
    fn test_rapids_cut_like_feeds() {
        let segment = MotionSegment::new(
            Point3::new(0.0, 0.0, -0.5),
            Point3::new(3.0, 0.0, -0.5),
            MotionKind::Rapid,
        );
        let result = Simulation::new(config(0.0))
            .unwrap()
            .simulate_segments(&[segment])
            .unwrap();
        assert_eq!(result.height_map.get_height(1.0, 0.0), Some(-0.5));
    }

    #[test]
    fn test_stray_coordinate_fails_cleanly() {
        let err = Simulation::new(config(0.0))
            .unwrap()
            .run("G0 X0 Y0 Z1\nG0 X99999999999999999999")
            .unwrap_err();
        assert!(matches!(err, SimulationError::GridTooLarge { .. }));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let err = Simulation::new(SimulationConfig::new(10.0, 2.0, 0.0, 0.0)).unwrap_err();
        assert_eq!(
            err,
            SimulationError::Configuration(ConfigurationError::NonPositive {
                name: "step_mm",
                value: 0.0
            })
        );
    }

    #[test]
    fn test_parse_error_aborts_run() {
        let err = Simulation::new(config(0.0))
            .unwrap()
            .run("G0 Z1\nG1 X1..2")
            .unwrap_err();
        assert!(matches!(
            err,
            SimulationError::Parse(ParseError::InvalidNumber { line_number: 2, .. })
        ));
    }

    #[test]
    fn test_progress_reaches_one_and_can_cancel() {
        let sim = Simulation::new(config(0.0)).unwrap();
        let gcode = "G0 X0 Y0 Z0\nG1 X10\nY10\nX0";

        let mut reported = Vec::new();
        sim.run_with_progress(gcode, |p| {
            reported.push(p);
            true
        })
        .unwrap();
        assert_eq!(reported.first(), Some(&0.0));
        assert_eq!(reported.last(), Some(&1.0));
        assert!(reported.windows(2).all(|w| w[0] <= w[1]));

        let mut calls = 0;
        let err = sim
            .run_with_progress(gcode, |_| {
                calls += 1;
                calls < 2
            })
            .unwrap_err();
        assert_eq!(err, SimulationError::Cancelled);
    }

    #[test]
    fn test_parallel_run_matches_sequential() {
        let gcode = "G0 X0 Y0 Z1\nG1 Z-1\nX20 Y3\nY-4 Z-2\nX-5\nG0 Z2";
        let sequential = Simulation::new(config(0.0)).unwrap().run(gcode).unwrap();
        let parallel = Simulation::new(config(0.0))
            .unwrap()
            .with_parallel(true)
            .run(gcode)
            .unwrap();
        assert_eq!(sequential.height_map, parallel.height_map);
        assert_eq!(sequential.stepper_stats, parallel.stepper_stats);
    }
}
