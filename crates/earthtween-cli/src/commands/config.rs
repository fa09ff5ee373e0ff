use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use earthtween_core::config::{InterpolationConfig, JobConfig};

#[derive(Args)]
pub struct ConfigArgs {
    /// Write config to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Print or save a full default JobConfig as TOML.
pub fn run(args: &ConfigArgs) -> Result<()> {
    let config = JobConfig {
        metadata: PathBuf::from("metadata"),
        images: PathBuf::from("images"),
        output: PathBuf::from("frames"),
        interpolation: InterpolationConfig::default(),
    };
    let toml_str = toml::to_string_pretty(&config)?;

    if let Some(ref path) = args.output {
        std::fs::write(path, &toml_str)
            .with_context(|| format!("Failed to write config to {}", path.display()))?;
        println!("Default config saved to {}", path.display());
    } else {
        print!("{}", toml_str);
    }

    Ok(())
}
