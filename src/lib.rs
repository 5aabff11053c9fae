//! # MillSurf
//!
//! Renders the surface a 3-axis ball-nose end mill leaves behind as a
//! greyscale depth image. The G-code program is parsed into straight motion
//! segments, sampled at a fixed interval, and each sample stamps the ball's
//! spherical profile into a height map that keeps the deepest cut per cell.
//!
//! ## Architecture
//!
//! 1. **millsurf-core** - Geometry primitives, simulation configuration, errors
//! 2. **millsurf-visualizer** - G-code parser, path stepper, rasterizer, image rendering
//! 3. **millsurf-settings** - Configuration file loading and saving
//! 4. **millsurf** - Command line tool that ties the crates together

pub mod cli;

pub use millsurf_core::{
    Bounds, ConfigurationError, MotionKind, MotionSegment, ParseError, Point3, SamplePoint,
    SimulationConfig,
};
pub use millsurf_settings::{Config, OutputSettings, SettingsError};
pub use millsurf_visualizer::{
    parse_program, GcodeParser, GridOverlay, HeightMap, IntensityMapping, RenderError,
    RenderOptions, Simulation, SimulationError, SimulationResult, SurfaceRenderer,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Initialize logging
///
/// Sets up structured logging with:
/// - Output on stderr, human readable or JSON lines
/// - RUST_LOG environment variable support
/// - `default_level` when RUST_LOG does not say otherwise
pub fn init_logging(default_level: tracing::Level, json: bool) -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::builder()
        .with_default_directive(default_level.into())
        .from_env_lossy();

    if json {
        let fmt_layer = fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_level(true)
            .with_line_number(true);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .try_init()?;
    } else {
        let fmt_layer = fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_level(true)
            .with_thread_ids(false);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .try_init()?;
    }

    Ok(())
}
