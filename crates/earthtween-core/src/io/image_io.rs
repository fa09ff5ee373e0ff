use std::path::{Path, PathBuf};

use image::ImageFormat;

use crate::error::{InterpError, Result};
use crate::record::{CaptureRecord, SourceRaster, VirtualSphereFrame};

/// Where the raster for `record` lives inside `images_dir`.
pub fn raster_path(images_dir: &Path, record: &CaptureRecord) -> PathBuf {
    images_dir.join(format!("{}.png", record.id))
}

/// Decode a source raster. Any failure, including a missing file, is a
/// decode error tagged with the record id.
pub fn load_raster(id: &str, path: &Path) -> Result<SourceRaster> {
    image::open(path)
        .map(SourceRaster::from)
        .map_err(|source| InterpError::Decode {
            id: id.to_string(),
            source,
        })
}

/// Save a synthesized frame as 16-bit RGBA PNG.
pub fn save_frame(frame: &VirtualSphereFrame, path: &Path) -> Result<()> {
    frame.pixels.save_with_format(path, ImageFormat::Png)?;
    Ok(())
}

/// Load a previously saved frame. The target longitude is not stored in the
/// file and must be supplied.
pub fn load_frame(path: &Path, target_longitude: f64) -> Result<VirtualSphereFrame> {
    let img = image::open(path)?;
    Ok(VirtualSphereFrame {
        target_longitude,
        pixels: img.to_rgba16(),
    })
}
