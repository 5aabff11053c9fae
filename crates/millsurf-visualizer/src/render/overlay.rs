//! Reference grid drawn over the depth image

use std::ops::Range;

use image::{Rgb, RgbImage};
use serde::{Deserialize, Serialize};

use millsurf_core::constants::{DEFAULT_GRID_SPACING_MM, GEOMETRY_EPSILON};

use crate::error::{RenderError, RenderResult};
use crate::simulation::HeightMap;

/// Major and minor grid lines at world-coordinate multiples
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridOverlay {
    /// Distance between major lines (mm)
    pub major_spacing_mm: f64,
    /// Minor lines per major interval; 0 disables them
    pub minor_divisions: u32,
    pub major_line_px: u32,
    pub minor_line_px: u32,
    /// RGBA; alpha is the blend weight
    pub major_color: [u8; 4],
    pub minor_color: [u8; 4],
}

impl Default for GridOverlay {
    fn default() -> Self {
        Self {
            major_spacing_mm: DEFAULT_GRID_SPACING_MM,
            minor_divisions: 10,
            major_line_px: 5,
            minor_line_px: 1,
            major_color: [0, 0, 255, 128],
            minor_color: [0, 255, 0, 128],
        }
    }
}

impl GridOverlay {
    pub fn validate(&self) -> RenderResult<()> {
        if !self.major_spacing_mm.is_finite() || self.major_spacing_mm <= 0.0 {
            return Err(RenderError::InvalidGrid(format!(
                "major spacing must be positive, got {}",
                self.major_spacing_mm
            )));
        }
        if self.major_line_px == 0 || (self.minor_divisions > 0 && self.minor_line_px == 0) {
            return Err(RenderError::InvalidGrid(
                "line width must be at least 1 px".to_string(),
            ));
        }
        Ok(())
    }

    /// Blend the grid into `image`, which must be the north-up rendering of `map`
    pub fn apply(&self, image: &mut RgbImage, map: &HeightMap) -> RenderResult<()> {
        self.validate()?;

        self.draw(image, map, self.major_spacing_mm, self.major_line_px, self.major_color);
        if self.minor_divisions > 0 {
            let spacing = self.major_spacing_mm / f64::from(self.minor_divisions);
            self.draw(image, map, spacing, self.minor_line_px, self.minor_color);
        }
        Ok(())
    }

    fn draw(&self, image: &mut RgbImage, map: &HeightMap, spacing: f64, width: u32, color: [u8; 4]) {
        let (ox, oy) = map.origin();
        let ppm = map.pixels_per_mm();
        let (cols, rows) = (image.width() as usize, image.height() as usize);

        for column in line_positions(ox, ppm, cols, spacing) {
            for x in band(column, width as usize, cols) {
                for y in 0..rows {
                    blend(image.get_pixel_mut(x as u32, y as u32), color);
                }
            }
        }
        for grid_row in line_positions(oy, ppm, rows, spacing) {
            let row = rows - 1 - grid_row;
            for y in band(row, width as usize, rows) {
                for x in 0..cols {
                    blend(image.get_pixel_mut(x as u32, y as u32), color);
                }
            }
        }
    }
}

/// Cell indices nearest to each multiple of `spacing` inside the map
fn line_positions(origin: f64, ppm: f64, count: usize, spacing: f64) -> Vec<usize> {
    if count == 0 {
        return Vec::new();
    }
    let last = origin + (count - 1) as f64 / ppm;
    let first_k = (origin / spacing - GEOMETRY_EPSILON).ceil() as i64;
    let last_k = (last / spacing + GEOMETRY_EPSILON).floor() as i64;

    (first_k..=last_k)
        .filter_map(|k| {
            let p = ((k as f64 * spacing - origin) * ppm).round();
            (p >= 0.0 && p < count as f64).then_some(p as usize)
        })
        .collect()
}

/// `width` pixels centered on `center`, clipped to `0..count`
fn band(center: usize, width: usize, count: usize) -> Range<usize> {
    let start = center.saturating_sub(width.saturating_sub(1) / 2);
    start..(start + width).min(count)
}

fn blend(pixel: &mut Rgb<u8>, color: [u8; 4]) {
    let alpha = f32::from(color[3]) / 255.0;
    for (channel, &target) in pixel.0.iter_mut().zip(&color[..3]) {
        let mixed = f32::from(*channel) * (1.0 - alpha) + f32::from(target) * alpha;
        *channel = mixed.round() as u8;
    }
}
