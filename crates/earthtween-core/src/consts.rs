/// Minimum output pixel count (h*w) to use row-level Rayon parallelism.
pub const PARALLEL_PIXEL_THRESHOLD: usize = 65_536;

/// Earth radius in pixels, measured manually on the calibration sample image.
pub const DEFAULT_REFERENCE_PIXEL_RADIUS: u32 = 791;

/// Width in pixels of the calibration sample image.
pub const DEFAULT_REFERENCE_IMAGE_WIDTH: u32 = 2048;

/// Satellite J2000 position (km) of the calibration sample,
/// taken from the 2020-09-04 00:03:41 capture metadata.
pub const DEFAULT_REFERENCE_POSITION: [f64; 3] = [-1326191.794585, 698719.827083, 229500.537516];

/// Default synthesized frame size (square).
pub const DEFAULT_OUTPUT_SIZE: u32 = 2048;

/// Deep space: opaque black, 16-bit RGBA.
pub const DEFAULT_BACKGROUND: [u16; 4] = [0, 0, 0, u16::MAX];

/// Sampling outside a source raster reads fully transparent black.
pub const TRANSPARENT: [u16; 4] = [0, 0, 0, 0];

/// Default angular step between synthesized frames, in degrees.
pub const DEFAULT_STEP_DEGREES: f64 = 0.5;

/// Default frame count per pair for the fixed-count policy.
pub const DEFAULT_FRAMES_PER_PAIR: usize = 10;

/// Default size of the synthesis worker pool.
pub const DEFAULT_WORKERS: usize = 4;

/// Timestamp layout used by EPIC metadata (`"2018-09-06 00:03:41"`).
pub const CAPTURE_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Longitude spans at or below this many degrees cannot be interpolated.
pub const MIN_SPAN_DEGREES: f64 = 1e-9;

/// Smallest angular step the fixed-step policy accepts, in degrees.
pub const MIN_STEP_DEGREES: f64 = 1e-3;

/// Upper bound on frames planned for a single pair, under either policy.
/// A full turn at the minimum step fits exactly.
pub const MAX_FRAMES_PER_PAIR: usize = 360_000;
