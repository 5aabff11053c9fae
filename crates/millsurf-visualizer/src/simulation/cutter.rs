//! Ball-nose cutter geometry

use millsurf_core::constants::GEOMETRY_EPSILON;
use millsurf_core::ConfigurationError;

/// One cell of the cutter footprint, relative to the footprint center
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FootprintCell {
    pub dx: isize,
    pub dy: isize,
    /// Horizontal distance from the tool axis (mm)
    pub offset_mm: f64,
    /// Height of the ball surface above the tip at this offset (mm)
    pub lift_mm: f64,
}

/// Ball-nose end mill sampled onto the raster
///
/// The footprint is computed once per resolution and reused for every
/// sample point.
#[derive(Debug, Clone)]
pub struct BallCutter {
    radius_mm: f64,
    pixels_per_mm: f64,
    radius_px: isize,
    footprint: Vec<FootprintCell>,
}

impl BallCutter {
    pub fn new(tool_diameter_mm: f64, pixels_per_mm: f64) -> Result<Self, ConfigurationError> {
        for (name, value) in [
            ("tool_diameter_mm", tool_diameter_mm),
            ("pixels_per_mm", pixels_per_mm),
        ] {
            if !value.is_finite() {
                return Err(ConfigurationError::NotFinite { name, value });
            }
            if value <= 0.0 {
                return Err(ConfigurationError::NonPositive { name, value });
            }
        }

        let radius_mm = tool_diameter_mm / 2.0;
        let radius_px = (radius_mm * pixels_per_mm + GEOMETRY_EPSILON).floor() as isize;

        let mut footprint = Vec::new();
        for dy in -radius_px..=radius_px {
            for dx in -radius_px..=radius_px {
                let offset_mm = ((dx * dx + dy * dy) as f64).sqrt() / pixels_per_mm;
                if let Some(lift_mm) = ball_profile(radius_mm, offset_mm) {
                    footprint.push(FootprintCell {
                        dx,
                        dy,
                        offset_mm,
                        lift_mm,
                    });
                }
            }
        }

        Ok(Self {
            radius_mm,
            pixels_per_mm,
            radius_px,
            footprint,
        })
    }

    pub fn radius_mm(&self) -> f64 {
        self.radius_mm
    }

    /// Tool radius in whole pixels (the footprint's half-width)
    pub fn radius_px(&self) -> isize {
        self.radius_px
    }

    pub fn pixels_per_mm(&self) -> f64 {
        self.pixels_per_mm
    }

    /// Cells covered by the tool, a filled disk around `(0, 0)`
    pub fn footprint(&self) -> &[FootprintCell] {
        &self.footprint
    }

    /// Height of the ball surface above its tip at horizontal offset `d`
    pub fn profile(&self, offset_mm: f64) -> Option<f64> {
        ball_profile(self.radius_mm, offset_mm)
    }
}

/// `r - sqrt(r² - d²)` for `d ≤ r`, `None` beyond the radius.
///
/// Offsets a hair outside `r` (float noise from pixel spacing) are treated as
/// lying on the rim.
pub fn ball_profile(radius_mm: f64, offset_mm: f64) -> Option<f64> {
    if offset_mm > radius_mm + GEOMETRY_EPSILON {
        return None;
    }
    let depth = (radius_mm * radius_mm - offset_mm * offset_mm).max(0.0).sqrt();
    Some(radius_mm - depth)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_values() {
        assert_eq!(ball_profile(1.0, 0.0), Some(0.0));
        assert_eq!(ball_profile(1.0, 1.0), Some(1.0));
        assert_eq!(ball_profile(1.0, 1.01), None);
        let half = ball_profile(2.0, 1.0).unwrap();
        assert!((half - (2.0 - 3.0_f64.sqrt())).abs() < 1e-12);
    }

    #[test]
    fn test_footprint_is_filled_disk() {
        let cutter = BallCutter::new(2.0, 10.0).unwrap();
        assert_eq!(cutter.radius_px(), 10);

        let fp = cutter.footprint();
        let center = fp.iter().find(|c| c.dx == 0 && c.dy == 0).unwrap();
        assert_eq!(center.lift_mm, 0.0);

        let rim = fp.iter().find(|c| c.dx == 10 && c.dy == 0).unwrap();
        assert_eq!(rim.offset_mm, 1.0);
        assert_eq!(rim.lift_mm, 1.0);

        // Corners of the bounding square lie outside the ball
        assert!(!fp.iter().any(|c| c.dx == 10 && c.dy == 10));
        assert!(fp.iter().all(|c| c.offset_mm <= 1.0));
        // Interior cells are all present
        assert!(fp.iter().any(|c| c.dx == 3 && c.dy == -4));
    }

    #[test]
    fn test_footprint_symmetry() {
        let cutter = BallCutter::new(3.175, 10.0).unwrap();
        assert_eq!(cutter.radius_px(), 15);
        for cell in cutter.footprint() {
            assert!(cutter
                .footprint()
                .iter()
                .any(|c| c.dx == -cell.dx && c.dy == -cell.dy && c.lift_mm == cell.lift_mm));
        }
    }

    #[test]
    fn test_tool_smaller_than_pixel() {
        let cutter = BallCutter::new(0.05, 10.0).unwrap();
        assert_eq!(cutter.radius_px(), 0);
        assert_eq!(cutter.footprint().len(), 1);
    }

    #[test]
    fn test_rejects_invalid_geometry() {
        assert!(BallCutter::new(0.0, 10.0).is_err());
        assert!(BallCutter::new(3.0, -1.0).is_err());
        assert!(BallCutter::new(f64::NAN, 10.0).is_err());
    }
}
