use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::Result;
use crate::record::{Capture, CaptureRecord};

use super::image_io::{load_raster, raster_path};
use super::metadata::{load_metadata, sort_records};

/// Capture source backed by local files: records from EPIC metadata JSON,
/// rasters from `<images>/<image>.png`.
///
/// Rasters are decoded lazily, one per `next()`, so only the records the
/// scheduler currently holds stay in memory.
pub struct DirectorySource {
    records: std::vec::IntoIter<CaptureRecord>,
    images: PathBuf,
}

impl DirectorySource {
    pub fn open(metadata: &Path, images: &Path) -> Result<Self> {
        Ok(Self::from_records(load_metadata(metadata)?, images))
    }

    pub fn from_records(mut records: Vec<CaptureRecord>, images: &Path) -> Self {
        sort_records(&mut records);
        Self {
            records: records.into_iter(),
            images: images.to_path_buf(),
        }
    }

    /// Records not yet yielded.
    pub fn remaining(&self) -> usize {
        self.records.len()
    }
}

impl Iterator for DirectorySource {
    type Item = Result<Capture>;

    fn next(&mut self) -> Option<Self::Item> {
        let record = self.records.next()?;
        let path = raster_path(&self.images, &record);
        debug!(record = %record.id, path = %path.display(), "Decoding source raster");
        Some(load_raster(&record.id, &path).map(|raster| Capture::new(record, raster)))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.records.size_hint()
    }
}
