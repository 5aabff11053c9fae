//! Modal machine state
//!
//! [`MachineState`] is a plain value. The parser folds it over the program one
//! block at a time; nothing about it is shared or global.

use millsurf_core::constants::MM_PER_INCH;
use millsurf_core::{MotionKind, MotionSegment, Point3};
use serde::{Deserialize, Serialize};

/// Motion group (G0, G1, G2, G3, G38.x)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MotionMode {
    Rapid,
    Linear,
    ArcClockwise,
    ArcCounterClockwise,
    Probe,
}

impl MotionMode {
    /// Segment kind for modes the simulator can render
    ///
    /// Arcs and probing moves return `None`; their lines are skipped.
    pub fn kind(self) -> Option<MotionKind> {
        match self {
            Self::Rapid => Some(MotionKind::Rapid),
            Self::Linear => Some(MotionKind::Linear),
            Self::ArcClockwise | Self::ArcCounterClockwise | Self::Probe => None,
        }
    }
}

/// Distance group (G90, G91)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DistanceMode {
    #[default]
    Absolute,
    Incremental,
}

/// Units group (G20, G21)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum UnitMode {
    #[default]
    Millimeters,
    Inches,
}

impl UnitMode {
    pub fn to_mm(self, value: f64) -> f64 {
        match self {
            Self::Millimeters => value,
            Self::Inches => value * MM_PER_INCH,
        }
    }
}

/// Change requested by a block's motion word
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionWord {
    Set(MotionMode),
    /// G80
    Cancel,
}

/// Axis words of one block, in program units
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AxisWords {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub z: Option<f64>,
}

impl AxisWords {
    pub fn is_empty(&self) -> bool {
        self.x.is_none() && self.y.is_none() && self.z.is_none()
    }
}

/// One line reduced to the words that affect geometry
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Block {
    pub line_number: usize,
    pub motion: Option<MotionWord>,
    pub distance: Option<DistanceMode>,
    pub units: Option<UnitMode>,
    /// A non-modal code (G28, G92, ...) whose axis words are not a move target
    pub axes_consumed: bool,
    pub axes: AxisWords,
}

/// What a block did to the toolpath
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BlockOutcome {
    /// The tool moved along a new segment
    Segment(MotionSegment),
    /// Axis words under an arc or probe mode; the line was skipped
    Unsupported,
    /// No geometric effect
    NoMotion,
}

/// Last known position plus the modal groups that affect it
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MachineState {
    pub x: f64,
    pub y: f64,
    /// Unknown until the program first sets Z
    pub z: Option<f64>,
    pub motion: Option<MotionMode>,
    pub distance: DistanceMode,
    pub units: UnitMode,
}

impl Default for MachineState {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            z: None,
            motion: None,
            distance: DistanceMode::Absolute,
            units: UnitMode::Millimeters,
        }
    }
}

impl MachineState {
    /// Current tool-tip position, once all three axes are known
    pub fn position(&self) -> Option<Point3> {
        self.z.map(|z| Point3::new(self.x, self.y, z))
    }

    /// Apply one block and return the successor state
    ///
    /// Modal words take effect before the block's axis words are resolved, so
    /// `G20 G1 X1` moves one inch.
    pub fn advance(mut self, block: &Block) -> (Self, BlockOutcome) {
        if let Some(units) = block.units {
            self.units = units;
        }
        if let Some(distance) = block.distance {
            self.distance = distance;
        }
        match block.motion {
            Some(MotionWord::Set(mode)) => self.motion = Some(mode),
            Some(MotionWord::Cancel) => self.motion = None,
            None => {}
        }

        if block.axes.is_empty() || block.axes_consumed {
            return (self, BlockOutcome::NoMotion);
        }
        let Some(mode) = self.motion else {
            return (self, BlockOutcome::NoMotion);
        };
        let Some(kind) = mode.kind() else {
            return (self, BlockOutcome::Unsupported);
        };

        let start = self.position();
        self.x = self.resolve(self.x, block.axes.x);
        self.y = self.resolve(self.y, block.axes.y);
        self.z = match (self.z, block.axes.z) {
            (Some(current), word) => Some(self.resolve(current, word)),
            // Incremental from an unknown Z is taken relative to zero
            (None, Some(value)) => Some(self.units.to_mm(value)),
            (None, None) => None,
        };

        match (start, self.position()) {
            (Some(start), Some(end)) if start != end => {
                (self, BlockOutcome::Segment(MotionSegment::new(start, end, kind)))
            }
            _ => (self, BlockOutcome::NoMotion),
        }
    }

    fn resolve(&self, current: f64, word: Option<f64>) -> f64 {
        match (word, self.distance) {
            (None, _) => current,
            (Some(value), DistanceMode::Absolute) => self.units.to_mm(value),
            (Some(value), DistanceMode::Incremental) => current + self.units.to_mm(value),
        }
    }
}
