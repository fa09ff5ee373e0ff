use chrono::NaiveDateTime;
use image::{DynamicImage, ImageBuffer, Rgba};
use serde::{Deserialize, Serialize};

use crate::consts::TRANSPARENT;
use crate::error::{InterpError, Result};

/// 16-bit RGBA pixel buffer used for both source and synthesized frames.
pub type Rgba16Image = ImageBuffer<Rgba<u16>, Vec<u16>>;

/// Geodetic coordinate of the point directly beneath the satellite, in degrees.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Centroid {
    pub lat: f64,
    #[serde(rename = "lon")]
    pub lng: f64,
}

/// Satellite position vector (J2000, km).
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SatellitePosition {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl SatellitePosition {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Distance from the Earth's center (Euclidean norm).
    pub fn distance(&self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

impl From<[f64; 3]> for SatellitePosition {
    fn from(v: [f64; 3]) -> Self {
        Self::new(v[0], v[1], v[2])
    }
}

/// Metadata describing one full-disc capture.
///
/// Field names follow the EPIC metadata JSON so a day's record array
/// deserializes directly.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CaptureRecord {
    #[serde(rename = "image")]
    pub id: String,
    #[serde(rename = "date", with = "capture_date")]
    pub captured_at: NaiveDateTime,
    #[serde(rename = "centroid_coordinates")]
    pub centroid: Centroid,
    #[serde(rename = "dscovr_j2000_position")]
    pub position: SatellitePosition,
}

impl CaptureRecord {
    pub fn new(
        id: impl Into<String>,
        captured_at: NaiveDateTime,
        centroid: Centroid,
        position: SatellitePosition,
    ) -> Self {
        Self {
            id: id.into(),
            captured_at,
            centroid,
            position,
        }
    }

    /// Reject records whose values would poison the pixel math with NaN/Inf.
    pub fn validate(&self) -> Result<()> {
        let malformed = |reason: &str| InterpError::MalformedRecord {
            id: self.id.clone(),
            reason: reason.to_string(),
        };
        if !self.centroid.lat.is_finite() || !self.centroid.lng.is_finite() {
            return Err(malformed("centroid is not finite"));
        }
        if !self.position.is_finite() {
            return Err(malformed("satellite position is not finite"));
        }
        if self.position.distance() <= 0.0 {
            return Err(malformed("satellite distance is zero"));
        }
        Ok(())
    }
}

/// A record together with its decoded raster.
#[derive(Clone, Debug)]
pub struct Capture {
    pub record: CaptureRecord,
    pub raster: SourceRaster,
}

impl Capture {
    pub fn new(record: CaptureRecord, raster: SourceRaster) -> Self {
        Self { record, raster }
    }
}

/// Decoded source image. Read-only once built.
#[derive(Clone, Debug)]
pub struct SourceRaster {
    pixels: Rgba16Image,
}

impl SourceRaster {
    pub fn new(pixels: Rgba16Image) -> Self {
        Self { pixels }
    }

    /// Solid-color raster, mostly useful for calibration checks and tests.
    pub fn filled(width: u32, height: u32, color: [u16; 4]) -> Self {
        Self::new(ImageBuffer::from_pixel(width, height, Rgba(color)))
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn pixels(&self) -> &Rgba16Image {
        &self.pixels
    }

    /// Nearest-neighbour read. Coordinates outside the raster read as
    /// transparent black.
    #[inline]
    pub fn sample(&self, x: i64, y: i64) -> [u16; 4] {
        if x < 0 || y < 0 || x >= self.pixels.width() as i64 || y >= self.pixels.height() as i64 {
            return TRANSPARENT;
        }
        self.pixels.get_pixel(x as u32, y as u32).0
    }
}

impl From<DynamicImage> for SourceRaster {
    fn from(img: DynamicImage) -> Self {
        Self::new(img.to_rgba16())
    }
}

/// A synthesized view of the virtual sphere at one target longitude.
#[derive(Clone, Debug, PartialEq)]
pub struct VirtualSphereFrame {
    /// Longitude (degrees) of the virtual sub-satellite point.
    pub target_longitude: f64,
    pub pixels: Rgba16Image,
}

impl VirtualSphereFrame {
    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn pixel(&self, x: u32, y: u32) -> [u16; 4] {
        self.pixels.get_pixel(x, y).0
    }
}

mod capture_date {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    use crate::consts::CAPTURE_DATE_FORMAT;

    pub fn serialize<S: Serializer>(date: &NaiveDateTime, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&date.format(CAPTURE_DATE_FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(d)?;
        NaiveDateTime::parse_from_str(&raw, CAPTURE_DATE_FORMAT).map_err(serde::de::Error::custom)
    }
}
