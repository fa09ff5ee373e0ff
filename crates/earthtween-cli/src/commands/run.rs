use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;
use earthtween_core::cancel::CancellationToken;
use earthtween_core::config::{FramePolicy, JobConfig};
use earthtween_core::error::Result as CoreResult;
use earthtween_core::io::metadata::load_metadata;
use earthtween_core::io::{DirectorySource, DirectoryStore};
use earthtween_core::record::CaptureRecord;
use earthtween_core::schedule::{plan_targets, FrameEvent, Interpolator};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::warn;

use crate::summary::{print_job_summary, print_run_summary};

/// Name of the ffmpeg concat list written next to the frames.
const FRAME_LIST: &str = "frames.txt";

#[derive(Args)]
pub struct RunArgs {
    /// Job file (TOML)
    pub job: PathBuf,
}

pub fn run(args: &RunArgs) -> Result<()> {
    let contents = std::fs::read_to_string(&args.job)
        .with_context(|| format!("Failed to read job {}", args.job.display()))?;
    let job: JobConfig = toml::from_str(&contents).context("Invalid job file")?;

    print_job_summary(&job);
    let interpolator = Interpolator::new(job.interpolation.clone()).context("Invalid job file")?;

    let records = load_metadata(&job.metadata)
        .with_context(|| format!("Failed to load metadata from {}", job.metadata.display()))?;
    let planned = planned_frame_count(&records, &job.interpolation.policy)?;

    let cancel = CancellationToken::new();
    let handler_token = cancel.clone();
    ctrlc::set_handler(move || {
        eprintln!("\nSIGINT acknowledged, draining pipeline...");
        handler_token.cancel();
    })
    .context("Failed to install SIGINT handler")?;

    let store = DirectoryStore::new(&job.output)
        .with_context(|| format!("Failed to open output {}", job.output.display()))?;
    let source = DirectorySource::from_records(records, &job.images);
    let handle = interpolator.spawn(source, Arc::new(store), cancel)?;

    let pb = ProgressBar::new(planned as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{msg:24} [{bar:40}] {pos}/{len} frames")?
            .progress_chars("=> "),
    );

    let mut events: Vec<FrameEvent> = Vec::with_capacity(planned);
    for event in handle.events.iter() {
        pb.set_message(event.key.to_string());
        pb.inc(1);
        events.push(event);
    }
    let summary = handle.wait();
    pb.finish_with_message("Done");

    write_frame_list(&job.output, &mut events)?;
    let summary = summary?;
    if summary.cancelled {
        warn!("Run cancelled before the stream was exhausted");
    }
    print_run_summary(&summary, &job.output.join(FRAME_LIST));

    Ok(())
}

/// Frames the policy will plan across all consecutive record pairs.
fn planned_frame_count(records: &[CaptureRecord], policy: &FramePolicy) -> CoreResult<usize> {
    records
        .windows(2)
        .map(|pair| {
            plan_targets(pair[0].centroid.lng, pair[1].centroid.lng, policy).map(|p| p.len())
        })
        .sum()
}

/// Write the frames in playback order as an ffmpeg concat list.
fn write_frame_list(output: &Path, events: &mut [FrameEvent]) -> Result<()> {
    events.sort_by(|a, b| a.key.cmp(&b.key));
    let mut list = String::new();
    for event in events.iter() {
        writeln!(list, "file '{}'", event.key.file_name())?;
    }
    let path = output.join(FRAME_LIST);
    std::fs::write(&path, list)
        .with_context(|| format!("Failed to write frame list {}", path.display()))?;
    Ok(())
}
