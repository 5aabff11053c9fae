//! Simulation configuration
//!
//! The four values here are the only inputs that change the simulated surface.
//! Output concerns (intensity mapping, overlays, file format) live in the
//! settings and render layers.

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_MATERIAL_TOP_HEIGHT, DEFAULT_PIXELS_PER_MM, DEFAULT_STEP_MM, DEFAULT_TOOL_DIAMETER_MM,
    MM_PER_INCH,
};
use crate::error::ConfigurationError;

/// Parameters of one height-map simulation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Raster resolution
    pub pixels_per_mm: f64,
    /// Ball-nose cutter diameter
    pub tool_diameter_mm: f64,
    /// Z of the untouched stock surface; upper clamp of every cell
    pub material_top_height: f64,
    /// Sampling interval along each segment
    pub step_mm: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            pixels_per_mm: DEFAULT_PIXELS_PER_MM,
            tool_diameter_mm: DEFAULT_TOOL_DIAMETER_MM,
            material_top_height: DEFAULT_MATERIAL_TOP_HEIGHT,
            step_mm: DEFAULT_STEP_MM,
        }
    }
}

impl SimulationConfig {
    pub fn new(
        pixels_per_mm: f64,
        tool_diameter_mm: f64,
        material_top_height: f64,
        step_mm: f64,
    ) -> Self {
        Self {
            pixels_per_mm,
            tool_diameter_mm,
            material_top_height,
            step_mm,
        }
    }

    /// Check every parameter before a simulation starts
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        positive("pixels_per_mm", self.pixels_per_mm)?;
        positive("tool_diameter_mm", self.tool_diameter_mm)?;
        positive("step_mm", self.step_mm)?;
        if !self.material_top_height.is_finite() {
            return Err(ConfigurationError::NotFinite {
                name: "material_top_height",
                value: self.material_top_height,
            });
        }
        Ok(())
    }

    pub fn tool_radius_mm(&self) -> f64 {
        self.tool_diameter_mm / 2.0
    }

    /// Resolution expressed as dots per inch, for image metadata
    pub fn dots_per_inch(&self) -> f64 {
        self.pixels_per_mm * MM_PER_INCH
    }
}

fn positive(name: &'static str, value: f64) -> Result<(), ConfigurationError> {
    if !value.is_finite() {
        return Err(ConfigurationError::NotFinite { name, value });
    }
    if value <= 0.0 {
        return Err(ConfigurationError::NonPositive { name, value });
    }
    Ok(())
}
