use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use earthtween_core::config::JobConfig;
use earthtween_core::geometry::{longitude_difference, Calibration};
use earthtween_core::io::metadata::load_metadata;

#[derive(Args)]
pub struct InfoArgs {
    /// Metadata JSON file or directory of per-day files
    pub metadata: PathBuf,

    /// Job file whose calibration is used for the earth scale column
    #[arg(long)]
    pub job: Option<PathBuf>,
}

pub fn run(args: &InfoArgs) -> Result<()> {
    let calibration = match args.job {
        Some(ref path) => {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read job {}", path.display()))?;
            let job: JobConfig = toml::from_str(&contents).context("Invalid job file")?;
            job.interpolation.calibration
        }
        None => Calibration::default(),
    };

    let records = load_metadata(&args.metadata)?;
    println!("Records:     {}", records.len());
    println!();
    println!(
        "{:<20} {:<28} {:>8} {:>9} {:>12} {:>7} {:>8}",
        "Date", "Image", "Lat", "Lng", "Distance", "Scale", "Span"
    );

    for (i, record) in records.iter().enumerate() {
        let span = records
            .get(i + 1)
            .map(|next| format!("{:.2}", longitude_difference(record.centroid.lng, next.centroid.lng)))
            .unwrap_or_else(|| "-".to_string());
        let distance = record.position.distance();
        println!(
            "{:<20} {:<28} {:>8.3} {:>9.3} {:>12.0} {:>7.4} {:>8}",
            record.captured_at.format("%Y-%m-%d %H:%M:%S"),
            record.id,
            record.centroid.lat,
            record.centroid.lng,
            distance,
            calibration.earth_scale(distance),
            span
        );
    }

    Ok(())
}
