//! Image file encoding
//!
//! The raster resolution is recorded so the image prints at true scale: as a
//! JFIF pixel density in JPEG output and as a `pHYs` chunk in PNG output.

use std::path::Path;

use image::codecs::jpeg::{JpegEncoder, PixelDensity};
use image::RgbImage;
use millsurf_core::constants::MM_PER_INCH;

use crate::error::{RenderError, RenderResult};

/// Default JPEG quality
pub const DEFAULT_JPEG_QUALITY: u8 = 90;

/// Output container, chosen from the file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Jpeg,
    Png,
}

impl OutputFormat {
    pub fn from_path(path: &Path) -> RenderResult<Self> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match extension.as_deref() {
            Some("jpg") | Some("jpeg") => Ok(Self::Jpeg),
            Some("png") => Ok(Self::Png),
            _ => Err(RenderError::UnsupportedFormat {
                path: path.to_path_buf(),
            }),
        }
    }
}

/// Dots per inch for a raster resolution in pixels per millimetre
pub fn dots_per_inch(pixels_per_mm: f64) -> u16 {
    (pixels_per_mm * MM_PER_INCH)
        .round()
        .clamp(1.0, f64::from(u16::MAX)) as u16
}

/// Pixels per metre for a raster resolution in pixels per millimetre
pub fn pixels_per_metre(pixels_per_mm: f64) -> u32 {
    (pixels_per_mm * 1000.0)
        .round()
        .clamp(1.0, f64::from(u32::MAX)) as u32
}

pub fn encode_jpeg(image: &RgbImage, quality: u8, dpi: u16) -> RenderResult<Vec<u8>> {
    let mut bytes = Vec::new();
    let mut encoder = JpegEncoder::new_with_quality(&mut bytes, quality.clamp(1, 100));
    encoder.set_pixel_density(PixelDensity::dpi(dpi));
    encoder.encode_image(image)?;
    Ok(bytes)
}

/// 8-bit RGB PNG with a `pHYs` density in pixels per metre
pub fn encode_png(image: &RgbImage, pixels_per_mm: f64) -> RenderResult<Vec<u8>> {
    let mut bytes = Vec::new();
    let ppm = pixels_per_metre(pixels_per_mm);

    let mut encoder = png::Encoder::new(&mut bytes, image.width(), image.height());
    encoder.set_color(png::ColorType::Rgb);
    encoder.set_depth(png::BitDepth::Eight);
    encoder.set_pixel_dims(Some(png::PixelDimensions {
        xppu: ppm,
        yppu: ppm,
        unit: png::Unit::Meter,
    }));

    let mut writer = encoder.write_header()?;
    writer.write_image_data(image.as_raw())?;
    writer.finish()?;
    Ok(bytes)
}

/// Encode `image` in `format` at `pixels_per_mm`
pub fn encode(
    image: &RgbImage,
    format: OutputFormat,
    quality: u8,
    pixels_per_mm: f64,
) -> RenderResult<Vec<u8>> {
    match format {
        OutputFormat::Jpeg => encode_jpeg(image, quality, dots_per_inch(pixels_per_mm)),
        OutputFormat::Png => encode_png(image, pixels_per_mm),
    }
}

/// Encode by extension and write to `path`
pub fn write_image(
    image: &RgbImage,
    path: &Path,
    quality: u8,
    pixels_per_mm: f64,
) -> RenderResult<()> {
    let format = OutputFormat::from_path(path)?;
    let bytes = encode(image, format, quality, pixels_per_mm)?;
    std::fs::write(path, bytes)?;
    Ok(())
}
