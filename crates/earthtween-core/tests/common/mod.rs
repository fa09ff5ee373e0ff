#![allow(dead_code)]

use chrono::{Duration, NaiveDate, NaiveDateTime};

use earthtween_core::config::{ErrorPolicy, FramePolicy, InterpolationConfig, OutputConfig};
use earthtween_core::consts::DEFAULT_BACKGROUND;
use earthtween_core::geometry::Calibration;
use earthtween_core::record::{Capture, CaptureRecord, Centroid, SatellitePosition, SourceRaster};

pub const RED: [u16; 4] = [u16::MAX, 0, 0, u16::MAX];
pub const BLUE: [u16; 4] = [0, 0, u16::MAX, u16::MAX];

/// Synthetic satellite distance shared by every test record.
pub const TEST_DISTANCE: f64 = 1000.0;

/// Calibration giving an earth scale of 0.75 at `TEST_DISTANCE`.
pub fn test_calibration() -> Calibration {
    Calibration {
        reference_pixel_radius: 3,
        reference_image_width: 8,
        reference_position: SatellitePosition::new(TEST_DISTANCE, 0.0, 0.0),
    }
}

pub fn test_output(size: u32) -> OutputConfig {
    OutputConfig {
        width: size,
        height: size,
        background: DEFAULT_BACKGROUND,
    }
}

/// 4x4 output, 2.5° steps, calibrated for the synthetic distance.
pub fn test_config(workers: usize) -> InterpolationConfig {
    InterpolationConfig {
        workers,
        on_error: ErrorPolicy::Halt,
        policy: FramePolicy::FixedStep { degrees: 2.5 },
        output: test_output(4),
        calibration: test_calibration(),
    }
}

pub fn capture_time(minute: i64) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2018, 9, 6)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
        + Duration::minutes(minute)
}

/// Record `id` captured `minute` minutes into the test day.
pub fn record(id: &str, minute: i64, lat: f64, lng: f64) -> CaptureRecord {
    CaptureRecord::new(
        id,
        capture_time(minute),
        Centroid { lat, lng },
        SatellitePosition::new(TEST_DISTANCE, 0.0, 0.0),
    )
}

/// Equatorial capture with a solid 4x4 raster.
pub fn capture(id: &str, minute: i64, lng: f64, color: [u16; 4]) -> Capture {
    Capture::new(record(id, minute, 0.0, lng), SourceRaster::filled(4, 4, color))
}

/// Raster whose pixels encode their own position: R = x * 1000, G = y * 1000.
pub fn coordinate_raster(size: u32) -> SourceRaster {
    let pixels = image::ImageBuffer::from_fn(size, size, |x, y| {
        image::Rgba([(x * 1000) as u16, (y * 1000) as u16, 0, u16::MAX])
    });
    SourceRaster::new(pixels)
}
