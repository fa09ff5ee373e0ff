mod interpolator;
mod plan;
mod types;

pub use interpolator::{InterpolationHandle, Interpolator};
pub use plan::{plan_targets, PlannedFrame};
pub use types::{FrameEvent, FrameKey, FrameStatus, PairFailure, RunSummary};
