//! Frame synthesis: blend two real captures on a shared virtual sphere.

use image::ImageBuffer;
use rayon::prelude::*;
use tracing::debug;

use crate::config::{InterpolationConfig, OutputConfig};
use crate::consts::{MIN_SPAN_DEGREES, PARALLEL_PIXEL_THRESHOLD};
use crate::error::{InterpError, Result};
use crate::geometry::{
    lat_lng_to_source_pixel, longitude_difference, project_to_sphere, sphere_to_lat_lng,
    Calibration, LatLng,
};
use crate::record::{CaptureRecord, SourceRaster, VirtualSphereFrame};

/// Contribution of each source to a frame. `w1` weights the earlier capture
/// (A), `w2` the later one (B), and `w1 + w2 == 1`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BlendWeights {
    pub w1: f64,
    pub w2: f64,
}

impl BlendWeights {
    /// Weights for a frame at `target_deg` on the westward walk from
    /// `a_deg` to `b_deg`.
    ///
    /// Returns `None` when the two longitudes coincide. Targets outside the
    /// span are accepted and yield weights outside `[0, 1]`.
    pub fn between(a_deg: f64, b_deg: f64, target_deg: f64) -> Option<Self> {
        let span = longitude_difference(a_deg, b_deg);
        if !span.is_finite() || span <= MIN_SPAN_DEGREES {
            return None;
        }
        let w2 = longitude_difference(a_deg, target_deg) / span;
        Some(Self { w1: 1.0 - w2, w2 })
    }

    /// Root-sum-square blend of one channel.
    #[inline]
    fn mix(&self, a: u16, b: u16) -> u16 {
        let a = a as f64;
        let b = b as f64;
        (self.w1 * a * a + self.w2 * b * b).sqrt() as u16
    }

    #[inline]
    fn blend(&self, a: [u16; 4], b: [u16; 4]) -> [u16; 4] {
        [
            self.mix(a[0], b[0]),
            self.mix(a[1], b[1]),
            self.mix(a[2], b[2]),
            self.mix(a[3], b[3]),
        ]
    }
}

/// One real capture, prepared for inverse projection.
struct SourceView<'a> {
    raster: &'a SourceRaster,
    lat_rad: f64,
    lng_rad: f64,
    earth_scale: f64,
}

impl<'a> SourceView<'a> {
    fn new(record: &CaptureRecord, raster: &'a SourceRaster, calibration: &Calibration) -> Self {
        Self {
            raster,
            lat_rad: record.centroid.lat.to_radians(),
            lng_rad: record.centroid.lng.to_radians(),
            earth_scale: calibration.earth_scale(record.position.distance()),
        }
    }

    #[inline]
    fn sample(&self, point: LatLng) -> [u16; 4] {
        let (px, py) = lat_lng_to_source_pixel(
            point,
            self.lat_rad,
            self.lng_rad,
            self.earth_scale,
            self.raster.width(),
            self.raster.height(),
        );
        self.raster.sample(px, py)
    }
}

/// The interpolated satellite view a frame is rendered from.
struct VirtualView {
    centroid_lat_rad: f64,
    target_lng_deg: f64,
    earth_scale: f64,
    weights: BlendWeights,
}

/// Renders [`VirtualSphereFrame`]s between pairs of captures.
#[derive(Clone, Debug)]
pub struct FrameSynthesizer {
    calibration: Calibration,
    output: OutputConfig,
}

impl FrameSynthesizer {
    pub fn new(calibration: Calibration, output: OutputConfig) -> Self {
        Self {
            calibration,
            output,
        }
    }

    pub fn from_config(config: &InterpolationConfig) -> Self {
        Self::new(config.calibration.clone(), config.output.clone())
    }

    pub fn output(&self) -> &OutputConfig {
        &self.output
    }

    /// Blend weights for `target_lng_deg` between `a` and `b`.
    pub fn weights(
        &self,
        a: &CaptureRecord,
        b: &CaptureRecord,
        target_lng_deg: f64,
    ) -> Result<BlendWeights> {
        BlendWeights::between(a.centroid.lng, b.centroid.lng, target_lng_deg).ok_or_else(|| {
            InterpError::DegenerateSpan {
                previous: a.id.clone(),
                current: b.id.clone(),
                span: longitude_difference(a.centroid.lng, b.centroid.lng),
            }
        })
    }

    /// Synthesize the view at `target_lng_deg` from captures `a` and `b`.
    ///
    /// `target_lng_deg` is expected to lie on the westward span from `a` to
    /// `b`; values outside it extrapolate.
    pub fn synthesize(
        &self,
        a: &CaptureRecord,
        raster_a: &SourceRaster,
        b: &CaptureRecord,
        raster_b: &SourceRaster,
        target_lng_deg: f64,
    ) -> Result<VirtualSphereFrame> {
        a.validate()?;
        b.validate()?;
        if !target_lng_deg.is_finite() {
            return Err(InterpError::Pipeline(format!(
                "target longitude {target_lng_deg} is not finite"
            )));
        }
        let weights = self.weights(a, b, target_lng_deg)?;

        let centroid_lat_deg = a.centroid.lat * weights.w1 + b.centroid.lat * weights.w2;
        let distance = a.position.distance() * weights.w1 + b.position.distance() * weights.w2;
        let view = VirtualView {
            centroid_lat_rad: -centroid_lat_deg.to_radians(),
            target_lng_deg,
            earth_scale: self.calibration.earth_scale(distance),
            weights,
        };
        debug!(
            target_lng = target_lng_deg,
            w1 = weights.w1,
            w2 = weights.w2,
            earth_scale = view.earth_scale,
            "Synthesizing frame"
        );

        let source_a = SourceView::new(a, raster_a, &self.calibration);
        let source_b = SourceView::new(b, raster_b, &self.calibration);

        let OutputConfig { width, height, .. } = self.output;
        let row_len = width as usize * 4;
        let mut buf = vec![0u16; row_len * height as usize];

        let render = |(y, row): (usize, &mut [u16])| {
            self.render_row(row, y as u32, &view, &source_a, &source_b);
        };
        if width as usize * height as usize >= PARALLEL_PIXEL_THRESHOLD {
            buf.par_chunks_mut(row_len).enumerate().for_each(render);
        } else {
            buf.chunks_mut(row_len).enumerate().for_each(render);
        }

        let pixels =
            ImageBuffer::from_raw(width, height, buf).ok_or(InterpError::InvalidDimensions {
                width,
                height,
            })?;
        Ok(VirtualSphereFrame {
            target_longitude: target_lng_deg,
            pixels,
        })
    }

    fn render_row(
        &self,
        row: &mut [u16],
        y: u32,
        view: &VirtualView,
        a: &SourceView<'_>,
        b: &SourceView<'_>,
    ) {
        let OutputConfig {
            width,
            height,
            background,
        } = self.output;

        for (x, px) in row.chunks_exact_mut(4).enumerate() {
            let point = project_to_sphere(x as u32, y, view.earth_scale, width, height);
            let color = if point.on_disc() {
                let lat_lng = sphere_to_lat_lng(point, view.centroid_lat_rad, view.target_lng_deg);
                view.weights.blend(a.sample(lat_lng), b.sample(lat_lng))
            } else {
                background
            };
            px.copy_from_slice(&color);
        }
    }
}
