//! Depth image rendering
//!
//! This module provides:
//! - Intensity mapping from heights to grey levels
//! - An optional reference grid overlay
//! - JPEG/PNG encoding with print resolution metadata

pub mod encoder;
pub mod intensity;
pub mod overlay;

use std::path::Path;

use image::{DynamicImage, RgbImage};
use serde::{Deserialize, Serialize};
use tracing::info;

pub use encoder::{
    dots_per_inch, encode, encode_jpeg, encode_png, pixels_per_metre, write_image, OutputFormat,
    DEFAULT_JPEG_QUALITY,
};
pub use intensity::{intensity, to_grayscale, IntensityMapping};
pub use overlay::GridOverlay;

use crate::error::RenderResult;
use crate::simulation::HeightMap;

/// Output appearance
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    /// 1-100, JPEG only
    pub jpeg_quality: u8,
    pub intensity: IntensityMapping,
    pub grid: Option<GridOverlay>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            jpeg_quality: DEFAULT_JPEG_QUALITY,
            intensity: IntensityMapping::AutoRange,
            grid: None,
        }
    }
}

/// Turns finished height maps into images
#[derive(Debug, Clone, Default)]
pub struct SurfaceRenderer {
    options: RenderOptions,
}

impl SurfaceRenderer {
    pub fn new(options: RenderOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// Greyscale depth image with the grid blended on top, north up
    pub fn render(&self, map: &HeightMap) -> RenderResult<RgbImage> {
        let gray = to_grayscale(map, self.options.intensity)?;
        let mut image = DynamicImage::ImageLuma8(gray).to_rgb8();
        if let Some(grid) = &self.options.grid {
            grid.apply(&mut image, map)?;
        }
        Ok(image)
    }

    pub fn encode(&self, map: &HeightMap, format: OutputFormat) -> RenderResult<Vec<u8>> {
        let image = self.render(map)?;
        encode(
            &image,
            format,
            self.options.jpeg_quality,
            map.pixels_per_mm(),
        )
    }

    /// Render and write to `path`; the format follows the extension
    pub fn write(&self, map: &HeightMap, path: &Path) -> RenderResult<()> {
        // Reject the extension before doing any work
        OutputFormat::from_path(path)?;
        let image = self.render(map)?;
        write_image(&image, path, self.options.jpeg_quality, map.pixels_per_mm())?;
        info!(
            "Wrote {}x{} image at {} dpi to {}",
            image.width(),
            image.height(),
            dots_per_inch(map.pixels_per_mm()),
            path.display()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use millsurf_core::{Bounds, Point3};

    fn cut_map() -> HeightMap {
        let mut bounds = Bounds::new();
        bounds.update(Point3::new(0.0, 0.0, 0.0));
        bounds.update(Point3::new(2.0, 2.0, 0.0));
        let mut map = HeightMap::new(&bounds, 2.0, 0.0).unwrap();
        map.lower_at_pixel(0, 0, -1.0);
        map
    }

    #[test]
    fn test_render_without_grid_is_grey() {
        let image = SurfaceRenderer::default().render(&cut_map()).unwrap();
        assert_eq!(image.dimensions(), (5, 5));
        assert_eq!(image.get_pixel(0, 4).0, [0, 0, 0]);
        assert_eq!(image.get_pixel(4, 0).0, [255, 255, 255]);
        assert!(image.pixels().all(|p| p.0[0] == p.0[1] && p.0[1] == p.0[2]));
    }

    #[test]
    fn test_render_with_grid_adds_colour() {
        let renderer = SurfaceRenderer::new(RenderOptions {
            grid: Some(GridOverlay {
                major_spacing_mm: 1.0,
                minor_divisions: 0,
                major_line_px: 1,
                ..Default::default()
            }),
            ..Default::default()
        });
        let image = renderer.render(&cut_map()).unwrap();
        // World x = 1 mm is column 2
        assert_eq!(image.get_pixel(2, 1).0, [127, 127, 255]);
    }

    #[test]
    fn test_options_serde_defaults() {
        let options: RenderOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(options, RenderOptions::default());
        assert_eq!(options.jpeg_quality, 90);
    }
}
