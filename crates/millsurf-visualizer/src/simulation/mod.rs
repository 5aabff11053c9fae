//! Ball-nose surface simulation
//!
//! This module provides:
//! - The path stepper turning segments into tool-tip samples
//! - The ball cutter footprint
//! - The height map and its min-accumulating rasterizer
//! - The driver that runs a whole program

pub mod cutter;
pub mod height_map;
pub mod rasterizer;
pub mod simulator;
pub mod stepper;

pub use cutter::{ball_profile, BallCutter, FootprintCell};
pub use height_map::HeightMap;
pub use rasterizer::Rasterizer;
pub use simulator::{Simulation, SimulationResult};
pub use stepper::{PathStepper, SegmentSamples, StepperStats};
