use std::collections::HashSet;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread::JoinHandle;

use rayon::prelude::*;
use tracing::{debug, error, info, warn};

use crate::cancel::{CancelExt, CancellationToken};
use crate::config::{ErrorPolicy, InterpolationConfig};
use crate::error::{InterpError, Result};
use crate::geometry::longitude_difference;
use crate::io::store::FrameStore;
use crate::record::Capture;
use crate::synth::FrameSynthesizer;

use super::plan::plan_targets;
use super::types::{FrameEvent, FrameKey, FrameStatus, PairFailure, RunSummary};

/// Placeholder id used when a failure happens before any record was accepted.
const NO_PREVIOUS: &str = "<start>";

/// Walks a capture stream two records at a time and renders the frames
/// between each consecutive pair on a bounded worker pool.
pub struct Interpolator {
    config: InterpolationConfig,
    synthesizer: FrameSynthesizer,
    pool: rayon::ThreadPool,
}

impl Interpolator {
    pub fn new(config: InterpolationConfig) -> Result<Self> {
        config.validate()?;
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.workers)
            .thread_name(|i| format!("earthtween-worker-{i}"))
            .build()
            .map_err(|e| InterpError::Pipeline(format!("failed to build worker pool: {e}")))?;
        Ok(Self {
            synthesizer: FrameSynthesizer::from_config(&config),
            config,
            pool,
        })
    }

    /// Consume `source` on the calling thread, sending one [`FrameEvent`] per
    /// planned frame to `events`.
    ///
    /// Every pair that was dispatched finishes before this returns, whether
    /// the run ends by exhaustion, cancellation or a halting error.
    pub fn run<S>(
        &self,
        source: S,
        store: &dyn FrameStore,
        cancel: &CancellationToken,
        events: &Sender<FrameEvent>,
    ) -> Result<RunSummary>
    where
        S: IntoIterator<Item = Result<Capture>>,
    {
        let mut summary = RunSummary::default();
        let mut previous: Option<Capture> = None;
        let mut dispatched: HashSet<String> = HashSet::new();

        for item in source.into_iter().until_cancelled(cancel) {
            let capture = match item.and_then(|c| c.record.validate().map(|_| c)) {
                Ok(capture) => capture,
                Err(err) => {
                    let previous_id = previous
                        .as_ref()
                        .map_or(NO_PREVIOUS, |p| p.record.id.as_str());
                    let current_id = err.record_id().unwrap_or("<unknown>").to_string();
                    self.handle_failure(err.for_pair(previous_id, &current_id), &mut summary)?;
                    continue;
                }
            };

            let Some(prev) = previous.take() else {
                debug!(record = %capture.record.id, "First record, waiting for a pair");
                previous = Some(capture);
                continue;
            };

            if cancel.is_cancelled() {
                previous = Some(prev);
                break;
            }

            let pair_index = summary.pairs;
            summary.pairs += 1;
            let outcome = self.interpolate_pair(
                pair_index,
                &prev,
                &capture,
                store,
                &mut dispatched,
                events,
                &mut summary,
            );
            if let Err(err) = outcome {
                let err = err.for_pair(&prev.record.id, &capture.record.id);
                self.handle_failure(err, &mut summary)?;
            }
            previous = Some(capture);
        }

        summary.cancelled = cancel.is_cancelled();
        info!(
            pairs = summary.pairs,
            rendered = summary.rendered,
            cached = summary.cached,
            failed = summary.failed_pairs.len(),
            cancelled = summary.cancelled,
            "Interpolation finished"
        );
        Ok(summary)
    }

    /// Run on a dedicated scheduler thread. The event channel closes once the
    /// run has drained.
    pub fn spawn<S>(
        self,
        source: S,
        store: Arc<dyn FrameStore>,
        cancel: CancellationToken,
    ) -> Result<InterpolationHandle>
    where
        S: IntoIterator<Item = Result<Capture>> + Send + 'static,
    {
        let (tx, rx) = mpsc::channel();
        let join = std::thread::Builder::new()
            .name("earthtween-scheduler".into())
            .spawn(move || self.run(source, store.as_ref(), &cancel, &tx))?;
        Ok(InterpolationHandle { events: rx, join })
    }

    #[allow(clippy::too_many_arguments)]
    fn interpolate_pair(
        &self,
        pair_index: usize,
        prev: &Capture,
        curr: &Capture,
        store: &dyn FrameStore,
        dispatched: &mut HashSet<String>,
        events: &Sender<FrameEvent>,
        summary: &mut RunSummary,
    ) -> Result<()> {
        let (a, b) = (&prev.record, &curr.record);
        // Rejects a zero span before any weights are formed.
        self.synthesizer.weights(a, b, a.centroid.lng)?;

        let plan = plan_targets(a.centroid.lng, b.centroid.lng, &self.config.policy)?;
        info!(
            pair = pair_index,
            previous = %a.id,
            current = %b.id,
            span = longitude_difference(a.centroid.lng, b.centroid.lng),
            frames = plan.len(),
            "Interpolating pair"
        );

        let mut jobs: Vec<(FrameKey, f64)> = Vec::with_capacity(plan.len());
        for planned in plan {
            let key = FrameKey::new(a.id.as_str(), pair_index, planned.frame_index);
            if store.contains(&key) || !dispatched.insert(key.file_name()) {
                debug!(frame = %key, "Cache hit, skipping synthesis");
                summary.cached += 1;
                let _ = events.send(FrameEvent {
                    key,
                    target_longitude: planned.target_longitude,
                    status: FrameStatus::Cached,
                });
                continue;
            }
            jobs.push((key, planned.target_longitude));
        }

        let jobs = &jobs;
        let tx = events.clone();
        let outcomes: Vec<Result<()>> = self.pool.install(move || {
            jobs.par_iter()
                .map_with(tx, |tx, (key, target)| -> Result<()> {
                    let frame = self.synthesizer.synthesize(
                        a,
                        &prev.raster,
                        b,
                        &curr.raster,
                        *target,
                    )?;
                    store.store(key, &frame)?;
                    debug!(frame = %key, target_lng = *target, "Frame written");
                    let _ = tx.send(FrameEvent {
                        key: key.clone(),
                        target_longitude: *target,
                        status: FrameStatus::Rendered,
                    });
                    Ok(())
                })
                .collect()
        });

        summary.rendered += outcomes.iter().filter(|r| r.is_ok()).count();
        match outcomes.into_iter().find_map(|r| r.err()) {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn handle_failure(&self, err: InterpError, summary: &mut RunSummary) -> Result<()> {
        match self.config.on_error {
            ErrorPolicy::Halt => {
                error!(error = %err, "Interpolation halted");
                Err(err)
            }
            ErrorPolicy::SkipPair => {
                warn!(error = %err, "Skipping pair");
                summary.failed_pairs.push(PairFailure::from(&err));
                Ok(())
            }
        }
    }
}

/// A run executing on its own thread.
pub struct InterpolationHandle {
    /// Frame events as they complete; closes when the run has drained.
    pub events: Receiver<FrameEvent>,
    join: JoinHandle<Result<RunSummary>>,
}

impl InterpolationHandle {
    /// Block until the scheduler thread exits.
    pub fn wait(self) -> Result<RunSummary> {
        self.join
            .join()
            .map_err(|_| InterpError::Pipeline("scheduler thread panicked".into()))?
    }

    /// Drain every remaining event, then wait for the run to finish.
    pub fn collect(self) -> (Vec<FrameEvent>, Result<RunSummary>) {
        let events: Vec<FrameEvent> = self.events.iter().collect();
        (events, self.wait())
    }
}
