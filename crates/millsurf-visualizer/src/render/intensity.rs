//! Height to grey-level mapping

use image::{GrayImage, Luma};
use serde::{Deserialize, Serialize};

use crate::error::{RenderError, RenderResult};
use crate::simulation::HeightMap;

/// Which height renders as black
///
/// The material top is always white.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum IntensityMapping {
    /// Black is the deepest cell of the map
    #[default]
    AutoRange,
    /// Black is `depth_mm` below the material top; deeper cells clamp to black
    FixedDepth { depth_mm: f64 },
}

impl IntensityMapping {
    pub fn validate(&self) -> RenderResult<()> {
        match *self {
            Self::AutoRange => Ok(()),
            Self::FixedDepth { depth_mm } if depth_mm.is_finite() && depth_mm > 0.0 => Ok(()),
            Self::FixedDepth { depth_mm } => Err(RenderError::InvalidDepthRange(depth_mm)),
        }
    }

    /// Height that maps to black for this map
    pub fn floor(&self, map: &HeightMap) -> f64 {
        match *self {
            Self::AutoRange => map.min_height().min(map.top_height()),
            Self::FixedDepth { depth_mm } => map.top_height() - depth_mm,
        }
    }
}

/// Grey level of height `h` between `floor` (black) and `top` (white)
pub fn intensity(h: f64, floor: f64, top: f64) -> u8 {
    let range = top - floor;
    if range <= 0.0 {
        return u8::MAX;
    }
    (255.0 * (h - floor) / range).round().clamp(0.0, 255.0) as u8
}

/// Greyscale rendering of the map, north up
///
/// Image column `x` is grid column `x`; image row 0 is the highest Y.
pub fn to_grayscale(map: &HeightMap, mapping: IntensityMapping) -> RenderResult<GrayImage> {
    mapping.validate()?;
    let floor = mapping.floor(map);
    let top = map.top_height();
    let width = map.width_px() as u32;
    let height = map.height_px() as u32;

    Ok(GrayImage::from_fn(width, height, |x, y| {
        let row = (height - 1 - y) as usize;
        let h = map
            .get_height_at_pixel(x as usize, row)
            .unwrap_or(top);
        Luma([intensity(h, floor, top)])
    }))
}
