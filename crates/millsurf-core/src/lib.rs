//! # MillSurf Core
//!
//! Core types shared by every MillSurf crate:
//! - Geometry primitives (points, motion segments, sample points, bounds)
//! - Simulation configuration and its validation
//! - Error types for parsing and configuration
//! - Default constants taken from typical hobby-mill setups

pub mod config;
pub mod constants;
pub mod error;
pub mod geometry;

pub use config::SimulationConfig;
pub use error::{ConfigurationError, ParseError};
pub use geometry::{Bounds, MotionKind, MotionSegment, Point3, SamplePoint};
