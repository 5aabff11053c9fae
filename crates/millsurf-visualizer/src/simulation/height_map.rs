//! Height map of the machined surface
//!
//! A row-major grid of surface heights. Every cell starts at the material top
//! and only ever decreases.

use millsurf_core::constants::MAX_GRID_CELLS;
use millsurf_core::Bounds;

use crate::error::SimulationError;

/// 2D height map covering the toolpath's bounding rectangle
#[derive(Debug, Clone, PartialEq)]
pub struct HeightMap {
    /// Resolution in pixels per millimetre
    pixels_per_mm: f64,
    /// Width in pixels
    width_px: usize,
    /// Height in pixels
    height_px: usize,
    /// World coordinates of the center of cell (0, 0)
    origin: (f64, f64),
    /// Untouched material height; the initial value of every cell
    top_height: f64,
    /// Z heights at each cell (stored row-major: y * width + x)
    heights: Vec<f64>,
}

impl HeightMap {
    /// Create a map whose cell centers span `bounds` in X and Y
    ///
    /// Cell `(i, j)` is centered at `origin + (i, j) / pixels_per_mm`, so
    /// both edges of the bounds fall on cell centers. Fails with
    /// [`SimulationError::GridTooLarge`] beyond [`MAX_GRID_CELLS`].
    pub fn new(
        bounds: &Bounds,
        pixels_per_mm: f64,
        top_height: f64,
    ) -> Result<Self, SimulationError> {
        let (width_px, height_px) = Self::grid_size(bounds, pixels_per_mm)?;

        Ok(Self {
            pixels_per_mm,
            width_px,
            height_px,
            origin: (bounds.min_x, bounds.min_y),
            top_height,
            heights: vec![top_height; width_px * height_px],
        })
    }

    /// Width and height in cells of a map over `bounds`
    pub fn grid_size(
        bounds: &Bounds,
        pixels_per_mm: f64,
    ) -> Result<(usize, usize), SimulationError> {
        // Sized in f64 so a stray coordinate cannot overflow the cast
        let width = (bounds.width() * pixels_per_mm).round() + 1.0;
        let height = (bounds.height() * pixels_per_mm).round() + 1.0;
        let fits = width.is_finite()
            && height.is_finite()
            && width * height <= MAX_GRID_CELLS as f64;
        if !fits {
            return Err(SimulationError::GridTooLarge {
                width: width as u64,
                height: height as u64,
                limit: MAX_GRID_CELLS,
            });
        }
        Ok((width as usize, height as usize))
    }

    /// Same geometry, every cell reset to the material top
    pub fn blank_copy(&self) -> Self {
        Self {
            heights: vec![self.top_height; self.heights.len()],
            ..*self
        }
    }

    pub fn width_px(&self) -> usize {
        self.width_px
    }

    pub fn height_px(&self) -> usize {
        self.height_px
    }

    pub fn pixels_per_mm(&self) -> f64 {
        self.pixels_per_mm
    }

    pub fn origin(&self) -> (f64, f64) {
        self.origin
    }

    pub fn top_height(&self) -> f64 {
        self.top_height
    }

    /// Raw cell heights, row-major
    pub fn heights(&self) -> &[f64] {
        &self.heights
    }

    /// Physical size of one cell edge (mm)
    pub fn cell_size_mm(&self) -> f64 {
        1.0 / self.pixels_per_mm
    }

    fn index(&self, px: isize, py: isize) -> Option<usize> {
        if px < 0 || py < 0 || px >= self.width_px as isize || py >= self.height_px as isize {
            return None;
        }
        Some(py as usize * self.width_px + px as usize)
    }

    /// Height at pixel coordinates
    pub fn get_height_at_pixel(&self, px: usize, py: usize) -> Option<f64> {
        if px >= self.width_px || py >= self.height_px {
            return None;
        }
        Some(self.heights[py * self.width_px + px])
    }

    /// Height at world coordinates (x, y)
    /// Returns None if coordinates are outside the height map
    pub fn get_height(&self, x: f64, y: f64) -> Option<f64> {
        let (px, py) = self.world_to_pixel(x, y);
        self.index(px, py).map(|i| self.heights[i])
    }

    /// Nearest cell to a world position, rounding half away from zero.
    ///
    /// The result may lie outside the map.
    pub fn world_to_pixel(&self, x: f64, y: f64) -> (isize, isize) {
        let px = ((x - self.origin.0) * self.pixels_per_mm).round() as isize;
        let py = ((y - self.origin.1) * self.pixels_per_mm).round() as isize;
        (px, py)
    }

    /// World coordinates of a cell center
    pub fn pixel_to_world(&self, px: usize, py: usize) -> (f64, f64) {
        (
            self.origin.0 + px as f64 / self.pixels_per_mm,
            self.origin.1 + py as f64 / self.pixels_per_mm,
        )
    }

    /// Lower a cell to `candidate` if that is deeper than its current value.
    ///
    /// Cells outside the map are ignored. Returns true when the cell changed.
    pub fn lower_at_pixel(&mut self, px: isize, py: isize, candidate: f64) -> bool {
        let Some(index) = self.index(px, py) else {
            return false;
        };
        let cell = &mut self.heights[index];
        if candidate < *cell {
            *cell = candidate;
            true
        } else {
            false
        }
    }

    /// Cell-wise minimum with another map of the same geometry
    pub fn merge_min(&mut self, other: &HeightMap) {
        debug_assert_eq!(
            (self.width_px, self.height_px),
            (other.width_px, other.height_px),
            "merging height maps of different sizes"
        );
        for (cell, &theirs) in self.heights.iter_mut().zip(&other.heights) {
            if theirs < *cell {
                *cell = theirs;
            }
        }
    }

    /// Get the minimum height in the map
    pub fn min_height(&self) -> f64 {
        self.heights.iter().copied().fold(f64::INFINITY, f64::min)
    }

    /// Get the maximum height in the map
    pub fn max_height(&self) -> f64 {
        self.heights.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    }

    /// Number of cells below the material top
    pub fn cut_cells(&self) -> usize {
        self.heights.iter().filter(|&&h| h < self.top_height).count()
    }

    /// Volume of material removed (mm³)
    pub fn removed_volume(&self) -> f64 {
        let cell_area = self.cell_size_mm() * self.cell_size_mm();
        self.heights
            .iter()
            .map(|&h| (self.top_height - h).max(0.0) * cell_area)
            .sum()
    }
}
