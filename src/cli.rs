//! Command line interface

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use tracing::{debug, info};

use millsurf_settings::Config;
use millsurf_visualizer::{GridOverlay, IntensityMapping, Simulation, SurfaceRenderer};

#[derive(Parser, Debug)]
#[command(name = "millsurf", version)]
#[command(about = "Render a ball-nose G-code program as a greyscale depth image", long_about = None)]
pub struct Cli {
    /// G-code program to simulate
    pub input: PathBuf,

    /// Output image (.jpg, .jpeg or .png); defaults to the input with a .jpg extension
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Configuration file (.toml or .json); defaults to the user config file if present
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Raster resolution
    #[arg(long, value_name = "PX")]
    pub pixels_per_mm: Option<f64>,

    /// Ball-nose cutter diameter in mm
    #[arg(long, value_name = "MM")]
    pub tool_diameter: Option<f64>,

    /// Z of the untouched stock surface in mm
    #[arg(long, value_name = "MM", allow_hyphen_values = true)]
    pub material_top: Option<f64>,

    /// Sampling interval along each move in mm
    #[arg(long, value_name = "MM")]
    pub step: Option<f64>,

    /// Render black at this depth below the top instead of at the deepest cut
    #[arg(long, value_name = "MM")]
    pub depth_range: Option<f64>,

    /// Draw the reference grid (10 mm major, 1 mm minor)
    #[arg(long)]
    pub grid: bool,

    /// Rasterize on all cores
    #[arg(long)]
    pub parallel: bool,

    /// Write the effective configuration to this file and continue
    #[arg(long, value_name = "FILE")]
    pub save_config: Option<PathBuf>,

    /// Log as JSON lines
    #[arg(long)]
    pub log_json: bool,

    /// More output (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    pub fn log_level(&self) -> tracing::Level {
        match self.verbose {
            0 => tracing::Level::INFO,
            1 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        }
    }

    pub fn output_path(&self) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| self.input.with_extension("jpg"))
    }

    /// Flags win over the configuration file
    pub fn apply_overrides(&self, config: &mut Config) {
        let sim = &mut config.simulation;
        if let Some(v) = self.pixels_per_mm {
            sim.pixels_per_mm = v;
        }
        if let Some(v) = self.tool_diameter {
            sim.tool_diameter_mm = v;
        }
        if let Some(v) = self.material_top {
            sim.material_top_height = v;
        }
        if let Some(v) = self.step {
            sim.step_mm = v;
        }
        if let Some(depth_mm) = self.depth_range {
            config.output.intensity = IntensityMapping::FixedDepth { depth_mm };
        }
        if self.grid && config.output.grid.is_none() {
            config.output.grid = Some(GridOverlay::default());
        }
    }

    /// Load configuration, merge flags and validate
    pub fn effective_config(&self) -> Result<Config> {
        let mut config = Config::load_or_default(self.config.as_deref())
            .context("Failed to load configuration")?;
        self.apply_overrides(&mut config);
        config.validate().context("Invalid configuration")?;
        Ok(config)
    }
}

/// Simulate `cli.input` and write the depth image
pub fn run(cli: &Cli) -> Result<PathBuf> {
    let config = cli.effective_config()?;
    debug!("Effective configuration: {:?}", config);

    if let Some(path) = &cli.save_config {
        config
            .save_to_file(path)
            .with_context(|| format!("Failed to save configuration to {}", path.display()))?;
        info!("Saved configuration to {}", path.display());
    }

    let source = read_program(&cli.input)?;
    let simulation = Simulation::new(config.simulation)?.with_parallel(cli.parallel);
    let result = simulation
        .run(&source)
        .with_context(|| format!("Failed to simulate {}", cli.input.display()))?;

    info!(
        "Surface: Z {:.3} to {:.3} mm, {} cells cut, {:.1} mm³ removed",
        result.min_z, result.max_z, result.cut_cells, result.material_removed
    );

    let output = cli.output_path();
    SurfaceRenderer::new(config.output)
        .write(&result.height_map, &output)
        .with_context(|| format!("Failed to write {}", output.display()))?;
    info!("Saved {}", output.display());
    Ok(output)
}

fn read_program(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal() {
        let cli = Cli::try_parse_from(["millsurf", "part.nc"]).unwrap();
        assert_eq!(cli.input, PathBuf::from("part.nc"));
        assert_eq!(cli.output_path(), PathBuf::from("part.jpg"));
        assert_eq!(cli.log_level(), tracing::Level::INFO);
        assert!(!cli.grid && !cli.parallel);
    }

    #[test]
    fn test_flags_override_config() {
        let cli = Cli::try_parse_from([
            "millsurf",
            "part.nc",
            "-o",
            "out.png",
            "--pixels-per-mm",
            "20",
            "--tool-diameter",
            "6",
            "--material-top",
            "-1.5",
            "--step",
            "0.1",
            "--depth-range",
            "3",
            "--grid",
            "-vv",
        ])
        .unwrap();

        let mut config = Config::new();
        cli.apply_overrides(&mut config);

        assert_eq!(cli.output_path(), PathBuf::from("out.png"));
        assert_eq!(cli.log_level(), tracing::Level::TRACE);
        assert_eq!(config.simulation.pixels_per_mm, 20.0);
        assert_eq!(config.simulation.tool_diameter_mm, 6.0);
        assert_eq!(config.simulation.material_top_height, -1.5);
        assert_eq!(config.simulation.step_mm, 0.1);
        assert_eq!(
            config.output.intensity,
            IntensityMapping::FixedDepth { depth_mm: 3.0 }
        );
        assert_eq!(config.output.grid, Some(GridOverlay::default()));
    }

    #[test]
    fn test_grid_flag_keeps_configured_grid() {
        let cli = Cli::try_parse_from(["millsurf", "part.nc", "--grid"]).unwrap();
        let custom = GridOverlay {
            major_spacing_mm: 25.4,
            ..Default::default()
        };
        let mut config = Config::new();
        config.output.grid = Some(custom);
        cli.apply_overrides(&mut config);
        assert_eq!(config.output.grid, Some(custom));
    }

    #[test]
    fn test_missing_input_is_rejected() {
        assert!(Cli::try_parse_from(["millsurf"]).is_err());
    }
}
