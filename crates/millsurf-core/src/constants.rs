//! Shared constants

/// Default raster resolution (pixels per millimetre)
pub const DEFAULT_PIXELS_PER_MM: f64 = 10.0;

/// Default cutter diameter: a 1/8" ball-nose end mill
pub const DEFAULT_TOOL_DIAMETER_MM: f64 = 3.175;

/// Default top surface of the stock (Z of the untouched material)
pub const DEFAULT_MATERIAL_TOP_HEIGHT: f64 = 0.0;

/// Default sampling interval along each motion segment
pub const DEFAULT_STEP_MM: f64 = 0.2;

/// Default spacing of the major reference grid drawn over rendered images
pub const DEFAULT_GRID_SPACING_MM: f64 = 10.0;

/// Millimetres per inch, used for G20 programs and DPI metadata
pub const MM_PER_INCH: f64 = 25.4;

/// Tolerance for comparing millimetre distances derived from float arithmetic
pub const GEOMETRY_EPSILON: f64 = 1e-9;

/// Largest height map a simulation will allocate, in cells (1 GiB of heights)
pub const MAX_GRID_CELLS: u64 = 1 << 27;
