use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::consts::{
    DEFAULT_BACKGROUND, DEFAULT_FRAMES_PER_PAIR, DEFAULT_OUTPUT_SIZE, DEFAULT_STEP_DEGREES,
    DEFAULT_WORKERS, MAX_FRAMES_PER_PAIR, MIN_STEP_DEGREES,
};
use crate::error::{InterpError, Result};
use crate::geometry::Calibration;

/// A complete interpolation job: where records come from, where frames go,
/// and how they are synthesized.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct JobConfig {
    /// EPIC-style metadata JSON (array of capture records).
    pub metadata: PathBuf,
    /// Directory holding `<image>.png` for every record.
    pub images: PathBuf,
    /// Directory frames are written to (and looked up in for cache hits).
    pub output: PathBuf,
    #[serde(default)]
    pub interpolation: InterpolationConfig,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct InterpolationConfig {
    /// Size of the synthesis worker pool.
    #[serde(default = "default_workers")]
    pub workers: usize,
    #[serde(default)]
    pub on_error: ErrorPolicy,
    #[serde(default)]
    pub policy: FramePolicy,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub calibration: Calibration,
}

fn default_workers() -> usize {
    DEFAULT_WORKERS
}

impl Default for InterpolationConfig {
    fn default() -> Self {
        Self {
            workers: DEFAULT_WORKERS,
            on_error: ErrorPolicy::default(),
            policy: FramePolicy::default(),
            output: OutputConfig::default(),
            calibration: Calibration::default(),
        }
    }
}

impl InterpolationConfig {
    pub fn validate(&self) -> Result<()> {
        self.calibration.validate()?;
        self.output.validate()?;
        self.policy.validate()?;
        if self.workers == 0 {
            return Err(InterpError::InvalidConfig(
                "worker pool needs at least one thread".into(),
            ));
        }
        Ok(())
    }
}

/// Geometry of every synthesized frame.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    pub width: u32,
    pub height: u32,
    /// RGBA16 color painted outside the Earth disc.
    pub background: [u16; 4],
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_OUTPUT_SIZE,
            height: DEFAULT_OUTPUT_SIZE,
            background: DEFAULT_BACKGROUND,
        }
    }
}

impl OutputConfig {
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(InterpError::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }
}

/// How target longitudes are laid out between two consecutive records.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum FramePolicy {
    /// One frame every `degrees`, walking west from the earlier record.
    FixedStep { degrees: f64 },
    /// Exactly `frames` evenly spaced frames per pair.
    FixedCount { frames: usize },
}

impl Default for FramePolicy {
    fn default() -> Self {
        Self::FixedStep {
            degrees: DEFAULT_STEP_DEGREES,
        }
    }
}

impl FramePolicy {
    /// Fixed-count policy with the default number of frames.
    pub fn fixed_count() -> Self {
        Self::FixedCount {
            frames: DEFAULT_FRAMES_PER_PAIR,
        }
    }

    pub fn validate(&self) -> Result<()> {
        match self {
            Self::FixedStep { degrees }
                if !(degrees.is_finite() && *degrees >= MIN_STEP_DEGREES) =>
            {
                Err(InterpError::InvalidConfig(format!(
                    "step must be at least {MIN_STEP_DEGREES}°, got {degrees}"
                )))
            }
            Self::FixedCount { frames } if *frames == 0 || *frames > MAX_FRAMES_PER_PAIR => {
                Err(InterpError::InvalidConfig(format!(
                    "frame count must be between 1 and {MAX_FRAMES_PER_PAIR}, got {frames}"
                )))
            }
            _ => Ok(()),
        }
    }
}

impl std::fmt::Display for FramePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::FixedStep { degrees } => write!(f, "Fixed Step ({degrees}°)"),
            Self::FixedCount { frames } => write!(f, "Fixed Count ({frames} frames)"),
        }
    }
}

/// What the scheduler does when a pair cannot be synthesized.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorPolicy {
    /// Finish the current pair, then stop the run with the error.
    #[default]
    Halt,
    /// Log the failure and move on to the next pair.
    SkipPair,
}

impl std::fmt::Display for ErrorPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Halt => write!(f, "Halt"),
            Self::SkipPair => write!(f, "Skip Pair"),
        }
    }
}
