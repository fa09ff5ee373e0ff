use std::path::PathBuf;

use earthtween_core::config::{
    ErrorPolicy, FramePolicy, InterpolationConfig, JobConfig, OutputConfig,
};
use earthtween_core::consts::{
    DEFAULT_BACKGROUND, DEFAULT_OUTPUT_SIZE, DEFAULT_WORKERS, MAX_FRAMES_PER_PAIR,
    MIN_STEP_DEGREES,
};
use earthtween_core::error::InterpError;
use earthtween_core::geometry::Calibration;

// ---------------------------------------------------------------------------
// Display
// ---------------------------------------------------------------------------

#[test]
fn test_frame_policy_display_fixed_step() {
    assert_eq!(
        format!("{}", FramePolicy::FixedStep { degrees: 0.5 }),
        "Fixed Step (0.5°)"
    );
}

#[test]
fn test_frame_policy_display_fixed_count() {
    assert_eq!(
        format!("{}", FramePolicy::FixedCount { frames: 12 }),
        "Fixed Count (12 frames)"
    );
}

#[test]
fn test_error_policy_display() {
    assert_eq!(format!("{}", ErrorPolicy::Halt), "Halt");
    assert_eq!(format!("{}", ErrorPolicy::SkipPair), "Skip Pair");
}

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

#[test]
fn test_frame_policy_default_is_half_degree_step() {
    assert_eq!(FramePolicy::default(), FramePolicy::FixedStep { degrees: 0.5 });
    assert_eq!(FramePolicy::fixed_count(), FramePolicy::FixedCount { frames: 10 });
}

#[test]
fn test_error_policy_default_is_halt() {
    assert_eq!(ErrorPolicy::default(), ErrorPolicy::Halt);
}

#[test]
fn test_interpolation_config_defaults() {
    let config = InterpolationConfig::default();
    assert_eq!(config.workers, DEFAULT_WORKERS);
    assert_eq!(config.output.width, DEFAULT_OUTPUT_SIZE);
    assert_eq!(config.output.height, DEFAULT_OUTPUT_SIZE);
    assert_eq!(config.output.background, DEFAULT_BACKGROUND);
    assert_eq!(config.calibration, Calibration::default());
    assert!(config.validate().is_ok());
}

// ---------------------------------------------------------------------------
// Serialization
// ---------------------------------------------------------------------------

#[test]
fn test_job_config_toml_roundtrip() {
    let job = JobConfig {
        metadata: PathBuf::from("metadata/2018-09-06.json"),
        images: PathBuf::from("images"),
        output: PathBuf::from("frames"),
        interpolation: InterpolationConfig {
            workers: 8,
            on_error: ErrorPolicy::SkipPair,
            policy: FramePolicy::FixedCount { frames: 12 },
            output: OutputConfig {
                width: 1024,
                height: 768,
                background: [0, 0, 0, 0],
            },
            calibration: Calibration::default(),
        },
    };

    let text = toml::to_string(&job).unwrap();
    let parsed: JobConfig = toml::from_str(&text).unwrap();
    assert_eq!(parsed.metadata, job.metadata);
    assert_eq!(parsed.images, job.images);
    assert_eq!(parsed.output, job.output);
    assert_eq!(parsed.interpolation, job.interpolation);
}

#[test]
fn test_partial_job_falls_back_to_defaults() {
    let text = r#"
metadata = "meta.json"
images = "img"
output = "out"

[interpolation]
workers = 2
on_error = "SkipPair"

[interpolation.policy.FixedCount]
frames = 6
"#;
    let job: JobConfig = toml::from_str(text).unwrap();
    let config = &job.interpolation;
    assert_eq!(config.workers, 2);
    assert_eq!(config.on_error, ErrorPolicy::SkipPair);
    assert_eq!(config.policy, FramePolicy::FixedCount { frames: 6 });
    assert_eq!(config.output, OutputConfig::default());
    assert_eq!(config.calibration, Calibration::default());
}

#[test]
fn test_job_without_interpolation_table() {
    let text = r#"
metadata = "meta.json"
images = "img"
output = "out"
"#;
    let job: JobConfig = toml::from_str(text).unwrap();
    assert_eq!(job.interpolation, InterpolationConfig::default());
}

#[test]
fn test_interpolation_config_json_roundtrip() {
    let config = InterpolationConfig {
        policy: FramePolicy::FixedStep { degrees: 0.25 },
        ..Default::default()
    };
    let json = serde_json::to_string(&config).unwrap();
    let parsed: InterpolationConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, config);
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

#[test]
fn test_validate_rejects_non_positive_step() {
    for degrees in [0.0, -0.5, f64::NAN] {
        let policy = FramePolicy::FixedStep { degrees };
        assert!(
            matches!(policy.validate(), Err(InterpError::InvalidConfig(_))),
            "{degrees}"
        );
    }
}

#[test]
fn test_validate_rejects_tiny_step() {
    for degrees in [1e-300, 1e-9, 5e-4] {
        let policy = FramePolicy::FixedStep { degrees };
        assert!(
            matches!(policy.validate(), Err(InterpError::InvalidConfig(_))),
            "{degrees}"
        );
    }
    assert!(FramePolicy::FixedStep { degrees: MIN_STEP_DEGREES }
        .validate()
        .is_ok());
}

#[test]
fn test_validate_rejects_frame_count_above_limit() {
    let policy = FramePolicy::FixedCount {
        frames: MAX_FRAMES_PER_PAIR + 1,
    };
    assert!(matches!(policy.validate(), Err(InterpError::InvalidConfig(_))));
    assert!(FramePolicy::FixedCount {
        frames: MAX_FRAMES_PER_PAIR
    }
    .validate()
    .is_ok());
}

#[test]
fn test_validate_rejects_zero_frame_count() {
    let policy = FramePolicy::FixedCount { frames: 0 };
    assert!(matches!(policy.validate(), Err(InterpError::InvalidConfig(_))));
}

#[test]
fn test_validate_rejects_empty_output() {
    let config = InterpolationConfig {
        output: OutputConfig {
            width: 0,
            ..Default::default()
        },
        ..Default::default()
    };
    assert!(matches!(
        config.validate(),
        Err(InterpError::InvalidDimensions { width: 0, .. })
    ));
}

#[test]
fn test_validate_rejects_zero_workers() {
    let config = InterpolationConfig {
        workers: 0,
        ..Default::default()
    };
    assert!(matches!(config.validate(), Err(InterpError::InvalidConfig(_))));
}
