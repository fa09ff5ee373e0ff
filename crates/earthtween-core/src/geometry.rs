//! Projection math between the virtual sphere and real source images.
//!
//! Everything here is pure and allocation-free. Angles carry their unit in
//! the parameter name: `_deg` for degrees, `_rad` for radians.

use std::f64::consts::TAU;

use serde::{Deserialize, Serialize};

use crate::consts::{
    DEFAULT_REFERENCE_IMAGE_WIDTH, DEFAULT_REFERENCE_PIXEL_RADIUS, DEFAULT_REFERENCE_POSITION,
};
use crate::error::{InterpError, Result};
use crate::record::SatellitePosition;

/// Reference sample pinning apparent Earth radius to satellite distance.
///
/// Re-measure whenever the source resolution or the reference image changes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Calibration {
    /// Earth radius in pixels on the reference image.
    pub reference_pixel_radius: u32,
    /// Width in pixels of the reference image.
    pub reference_image_width: u32,
    /// Satellite position when the reference image was taken.
    pub reference_position: SatellitePosition,
}

impl Default for Calibration {
    fn default() -> Self {
        Self {
            reference_pixel_radius: DEFAULT_REFERENCE_PIXEL_RADIUS,
            reference_image_width: DEFAULT_REFERENCE_IMAGE_WIDTH,
            reference_position: DEFAULT_REFERENCE_POSITION.into(),
        }
    }
}

impl Calibration {
    pub fn validate(&self) -> Result<()> {
        if self.reference_pixel_radius == 0 || self.reference_image_width == 0 {
            return Err(InterpError::InvalidConfig(
                "calibration radius and image width must be non-zero".into(),
            ));
        }
        let distance = self.reference_position.distance();
        if !distance.is_finite() || distance <= 0.0 {
            return Err(InterpError::InvalidConfig(
                "calibration satellite distance must be finite and non-zero".into(),
            ));
        }
        Ok(())
    }

    /// Fraction of the image half-width spanned by Earth's radius when the
    /// satellite sits `distance` from the Earth's center.
    ///
    /// Apparent radius is inversely proportional to distance; the reference
    /// sample fixes the constant.
    pub fn earth_scale(&self, distance: f64) -> f64 {
        let half_width = self.reference_image_width as f64 / 2.0;
        let reference_scale = self.reference_pixel_radius as f64 / half_width;
        reference_scale * self.reference_position.distance() / distance
    }
}

/// Angular distance from `b_deg` to `a_deg` walking eastward, in `[0, 360)`.
pub fn longitude_difference(a_deg: f64, b_deg: f64) -> f64 {
    let diff = ((a_deg - b_deg) + 360.0).rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs.
    if diff >= 360.0 {
        0.0
    } else {
        diff
    }
}

/// Fold a longitude that walked below -180° back into range.
pub fn wrap_longitude(lng_deg: f64) -> f64 {
    if lng_deg < -180.0 {
        lng_deg + 360.0
    } else {
        lng_deg
    }
}

/// Output pixel expressed in sphere-local coordinates, where the visible
/// disc is the unit circle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpherePoint {
    pub x: f64,
    pub y: f64,
    /// `x² + y²`.
    pub radius_sq: f64,
}

impl SpherePoint {
    /// True when the point lands on Earth rather than in space.
    #[inline]
    pub fn on_disc(&self) -> bool {
        self.radius_sq <= 1.0
    }
}

/// Geodetic coordinate in radians.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LatLng {
    pub lat_rad: f64,
    pub lng_rad: f64,
}

/// Map output pixel `(x, y)` onto the unit disc of a sphere whose radius is
/// `earth_scale` of the image half-size. The y axis points up.
#[inline]
pub fn project_to_sphere(x: u32, y: u32, earth_scale: f64, width: u32, height: u32) -> SpherePoint {
    let half_w = width as f64 / 2.0;
    let half_h = height as f64 / 2.0;
    let ux = (x as f64 - half_w) / (half_w * earth_scale);
    let uy = -(y as f64 - half_h) / (half_h * earth_scale);
    SpherePoint {
        x: ux,
        y: uy,
        radius_sq: ux * ux + uy * uy,
    }
}

/// Recover the geodetic coordinate seen at an on-disc point of a sphere
/// tilted by `centroid_lat_rad` and rotated to `target_lng_deg`.
///
/// Longitude is returned in `[0, 2π)`.
#[inline]
pub fn sphere_to_lat_lng(point: SpherePoint, centroid_lat_rad: f64, target_lng_deg: f64) -> LatLng {
    let depth = (1.0 - point.radius_sq).max(0.0).sqrt();
    let (sin_c, cos_c) = centroid_lat_rad.sin_cos();

    let x3 = point.x;
    let y3 = cos_c * point.y - sin_c * depth;
    let z3 = sin_c * point.y + cos_c * depth;

    let lat_rad = y3.clamp(-1.0, 1.0).asin();
    let mut lng_rad = (x3.atan2(z3) + target_lng_deg.to_radians()).rem_euclid(TAU);
    // Same rounding case as longitude_difference.
    if lng_rad >= TAU {
        lng_rad = 0.0;
    }
    LatLng { lat_rad, lng_rad }
}

/// Orthographic projection of `point` into a source image centered on
/// (`source_lat_rad`, `source_lng_rad`), returning truncated pixel
/// coordinates. The result may fall outside the image.
#[inline]
pub fn lat_lng_to_source_pixel(
    point: LatLng,
    source_lat_rad: f64,
    source_lng_rad: f64,
    earth_scale: f64,
    width: u32,
    height: u32,
) -> (i64, i64) {
    let (sin_dl, cos_dl) = (point.lng_rad - source_lng_rad).sin_cos();
    let (sin_lat, cos_lat) = point.lat_rad.sin_cos();
    let (sin_src, cos_src) = source_lat_rad.sin_cos();

    let x = sin_dl * cos_lat;
    let y = sin_lat * cos_src - cos_dl * cos_lat * sin_src;

    let half_w = width as f64 / 2.0;
    let half_h = height as f64 / 2.0;
    let px = (x * half_w * earth_scale + half_w) as i64;
    let py = (-(y * half_h * earth_scale) + half_h) as i64;
    (px, py)
}
