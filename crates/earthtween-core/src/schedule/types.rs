use std::fmt;

use crate::error::InterpError;

/// Deterministic identity of one synthesized frame.
///
/// Derived from the earlier record of the pair plus the frame's position in
/// the pair, so reruns produce the same names and hit the cache. Ordering is
/// by `(pair_index, frame_index)`, which is the playback order.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FrameKey {
    pub pair_index: usize,
    pub frame_index: usize,
    pub source_id: String,
}

impl FrameKey {
    pub fn new(source_id: impl Into<String>, pair_index: usize, frame_index: usize) -> Self {
        Self {
            pair_index,
            frame_index,
            source_id: source_id.into(),
        }
    }

    /// File name the frame is cached under.
    pub fn file_name(&self) -> String {
        format!("{}_{:03}.png", self.source_id, self.frame_index)
    }
}

impl fmt::Display for FrameKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.source_id, self.frame_index)
    }
}

/// How a planned frame was satisfied.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameStatus {
    Rendered,
    /// Already present in the store; not synthesized again.
    Cached,
}

impl fmt::Display for FrameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rendered => write!(f, "Rendered"),
            Self::Cached => write!(f, "Cached"),
        }
    }
}

/// Emitted downstream once per planned frame. Arrival order across workers
/// is not playback order; sort by `key`.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameEvent {
    pub key: FrameKey,
    pub target_longitude: f64,
    pub status: FrameStatus,
}

/// A pair that was skipped under [`ErrorPolicy::SkipPair`](crate::config::ErrorPolicy).
#[derive(Clone, Debug, PartialEq)]
pub struct PairFailure {
    pub previous: String,
    pub current: String,
    pub reason: String,
}

impl From<&InterpError> for PairFailure {
    fn from(err: &InterpError) -> Self {
        match err {
            InterpError::Pair {
                previous,
                current,
                source,
            } => Self {
                previous: previous.clone(),
                current: current.clone(),
                reason: source.to_string(),
            },
            other => Self {
                previous: String::new(),
                current: other.record_id().unwrap_or_default().to_string(),
                reason: other.to_string(),
            },
        }
    }
}

/// Totals for one scheduler run.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RunSummary {
    /// Pairs the scheduler attempted, including failed ones.
    pub pairs: usize,
    pub rendered: usize,
    pub cached: usize,
    pub failed_pairs: Vec<PairFailure>,
    /// The run ended because the cancellation token was raised.
    pub cancelled: bool,
}

impl RunSummary {
    pub fn frames(&self) -> usize {
        self.rendered + self.cached
    }
}
