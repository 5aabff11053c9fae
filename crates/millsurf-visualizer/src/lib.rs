//! # MillSurf Visualizer
//!
//! Simulates the surface left by a 3-axis ball-nose toolpath and renders it as
//! a greyscale depth image. Includes the G-code motion parser, the path
//! stepper, the height-map rasterizer and the image encoder.

pub mod error;
pub mod gcode;
pub mod render;
pub mod simulation;

pub use error::{RenderError, RenderResult, SimulationError};
pub use gcode::{parse_program, GcodeParser, MachineState, ParseStats, ParsedProgram};
pub use render::{
    GridOverlay, IntensityMapping, OutputFormat, RenderOptions, SurfaceRenderer,
};
pub use simulation::{
    BallCutter, HeightMap, PathStepper, Rasterizer, Simulation, SimulationResult, StepperStats,
};
