use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::warn;

use crate::error::{InterpError, Result};
use crate::record::VirtualSphereFrame;
use crate::schedule::FrameKey;

use super::image_io::save_frame;

/// Destination for synthesized frames, doubling as the cache index.
///
/// Called concurrently from worker threads.
pub trait FrameStore: Send + Sync {
    /// True when a frame for `key` already exists and need not be rendered.
    fn contains(&self, key: &FrameKey) -> bool;

    /// Persist a finished frame.
    fn store(&self, key: &FrameKey, frame: &VirtualSphereFrame) -> Result<()>;
}

/// Writes each frame to `<root>/<key.file_name()>` as 16-bit PNG.
pub struct DirectoryStore {
    root: PathBuf,
}

impl DirectoryStore {
    /// Open (and create if needed) the output directory.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        std::fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_for(&self, key: &FrameKey) -> PathBuf {
        self.root.join(key.file_name())
    }
}

impl FrameStore for DirectoryStore {
    fn contains(&self, key: &FrameKey) -> bool {
        self.path_for(key).is_file()
    }

    fn store(&self, key: &FrameKey, frame: &VirtualSphereFrame) -> Result<()> {
        let path = self.path_for(key);
        // Encode beside the target and rename, so an interrupted write never
        // looks like a cache hit.
        let partial = path.with_extension("png.partial");
        let written = save_frame(frame, &partial)
            .and_then(|_| std::fs::rename(&partial, &path).map_err(InterpError::from));
        if written.is_err() && partial.exists() {
            if let Err(e) = std::fs::remove_file(&partial) {
                warn!(path = %partial.display(), error = %e, "Failed to remove partial frame");
            }
        }
        written
    }
}

/// Keeps frames in memory, keyed for playback order.
#[derive(Default)]
pub struct MemoryStore {
    frames: Mutex<BTreeMap<FrameKey, VirtualSphereFrame>>,
    cached: Mutex<HashSet<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Treat `file_name` as already present.
    pub fn mark_cached(&self, file_name: impl Into<String>) {
        if let Ok(mut cached) = self.cached.lock() {
            cached.insert(file_name.into());
        }
    }

    pub fn len(&self) -> usize {
        self.frames.lock().map(|f| f.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Stored frames in playback order.
    pub fn into_frames(self) -> Vec<(FrameKey, VirtualSphereFrame)> {
        self.frames
            .into_inner()
            .map(|f| f.into_iter().collect())
            .unwrap_or_default()
    }
}

impl FrameStore for MemoryStore {
    fn contains(&self, key: &FrameKey) -> bool {
        let name = key.file_name();
        let cached = self.cached.lock().map(|c| c.contains(&name)).unwrap_or(false);
        cached
            || self
                .frames
                .lock()
                .map(|f| f.keys().any(|k| k.file_name() == name))
                .unwrap_or(false)
    }

    fn store(&self, key: &FrameKey, frame: &VirtualSphereFrame) -> Result<()> {
        let mut frames = self
            .frames
            .lock()
            .map_err(|_| InterpError::Pipeline("frame store lock poisoned".into()))?;
        frames.insert(key.clone(), frame.clone());
        Ok(())
    }
}
