//! Path stepper
//!
//! Walks motion segments and yields tool-tip sample points at a fixed
//! arc-length interval. Samples are produced lazily in path order.

use millsurf_core::constants::GEOMETRY_EPSILON;
use millsurf_core::{ConfigurationError, MotionSegment, SamplePoint};

/// Samples along a single segment
///
/// Emits the points at offsets `0, step, 2*step, ...` strictly before the end,
/// then the exact endpoint. A multiple that lands within
/// [`GEOMETRY_EPSILON`] of the end is replaced by the endpoint itself.
#[derive(Debug, Clone)]
pub struct SegmentSamples {
    segment: MotionSegment,
    length: f64,
    step_mm: f64,
    next_index: usize,
    interior_count: usize,
    endpoint_pending: bool,
}

impl SegmentSamples {
    pub fn new(segment: MotionSegment, step_mm: f64) -> Self {
        let length = segment.length();
        let (interior_count, endpoint_pending) = if length <= GEOMETRY_EPSILON {
            (0, false)
        } else {
            (((length - GEOMETRY_EPSILON) / step_mm).ceil() as usize, true)
        };
        Self {
            segment,
            length,
            step_mm,
            next_index: 0,
            interior_count,
            endpoint_pending,
        }
    }
}

impl Iterator for SegmentSamples {
    type Item = SamplePoint;

    fn next(&mut self) -> Option<SamplePoint> {
        if self.next_index < self.interior_count {
            let t = self.next_index as f64 * self.step_mm / self.length;
            self.next_index += 1;
            return Some(self.segment.point_at(t).into());
        }
        if self.endpoint_pending {
            self.endpoint_pending = false;
            return Some(self.segment.end.into());
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining =
            self.interior_count - self.next_index + usize::from(self.endpoint_pending);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for SegmentSamples {}

/// Counters kept while stepping
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepperStats {
    pub segments_consumed: usize,
    /// Segments entirely above the material top
    pub segments_above_material: usize,
    pub segments_zero_length: usize,
    pub samples: usize,
}

/// Lazy sample sequence over a whole toolpath
#[derive(Debug, Clone)]
pub struct PathStepper<I> {
    segments: I,
    step_mm: f64,
    material_top: f64,
    current: Option<SegmentSamples>,
    stats: StepperStats,
}

impl<I> PathStepper<I>
where
    I: Iterator<Item = MotionSegment>,
{
    pub fn new(segments: I, step_mm: f64, material_top: f64) -> Result<Self, ConfigurationError> {
        if !step_mm.is_finite() {
            return Err(ConfigurationError::NotFinite {
                name: "step_mm",
                value: step_mm,
            });
        }
        if step_mm <= 0.0 {
            return Err(ConfigurationError::NonPositive {
                name: "step_mm",
                value: step_mm,
            });
        }
        Ok(Self {
            segments,
            step_mm,
            material_top,
            current: None,
            stats: StepperStats::default(),
        })
    }

    pub fn stats(&self) -> StepperStats {
        self.stats
    }

    /// True when no point of the segment can reach the material.
    ///
    /// The ball's lowest point is its tip and Z is linear along the segment,
    /// so the endpoints bound every sample.
    fn above_material(&self, segment: &MotionSegment) -> bool {
        segment.min_z() > self.material_top
    }
}

impl<I> Iterator for PathStepper<I>
where
    I: Iterator<Item = MotionSegment>,
{
    type Item = SamplePoint;

    fn next(&mut self) -> Option<SamplePoint> {
        loop {
            if let Some(sample) = self.current.as_mut().and_then(Iterator::next) {
                self.stats.samples += 1;
                return Some(sample);
            }
            self.current = None;

            let segment = self.segments.next()?;
            self.stats.segments_consumed += 1;
            if self.above_material(&segment) {
                self.stats.segments_above_material += 1;
                continue;
            }
            let samples = SegmentSamples::new(segment, self.step_mm);
            if samples.len() == 0 {
                self.stats.segments_zero_length += 1;
                continue;
            }
            self.current = Some(samples);
        }
    }
}
