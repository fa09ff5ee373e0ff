use std::path::Path;

use console::Style;
use earthtween_core::config::JobConfig;
use earthtween_core::schedule::RunSummary;

struct Styles {
    title: Style,
    header: Style,
    label: Style,
    value: Style,
    method: Style,
    warning: Style,
    path: Style,
}

impl Styles {
    fn new() -> Self {
        Self {
            title: Style::new().cyan().bold(),
            header: Style::new().cyan().bold(),
            label: Style::new().dim(),
            value: Style::new().bold().white(),
            method: Style::new().green(),
            warning: Style::new().yellow(),
            path: Style::new().underlined(),
        }
    }
}

pub fn print_job_summary(job: &JobConfig) {
    let s = Styles::new();
    let config = &job.interpolation;

    println!();
    println!("  {}", s.title.apply_to("Earthtween"));
    println!("  {}", s.title.apply_to("\u{2550}".repeat(10)));
    println!();

    println!(
        "  {:<14}{}",
        s.label.apply_to("Metadata"),
        s.path.apply_to(job.metadata.display())
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Images"),
        s.path.apply_to(job.images.display())
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Output"),
        s.path.apply_to(job.output.display())
    );
    println!();

    println!("  {}", s.header.apply_to("Frames"));
    println!(
        "    {:<12}{}",
        s.label.apply_to("Policy"),
        s.method.apply_to(&config.policy)
    );
    println!(
        "    {:<12}{}",
        s.label.apply_to("Size"),
        s.value
            .apply_to(format!("{}x{}", config.output.width, config.output.height))
    );
    println!(
        "    {:<12}{}",
        s.label.apply_to("Workers"),
        s.value.apply_to(config.workers)
    );
    println!(
        "    {:<12}{}",
        s.label.apply_to("On error"),
        s.method.apply_to(config.on_error)
    );
    println!();

    let cal = &config.calibration;
    println!("  {}", s.header.apply_to("Calibration"));
    println!(
        "    {:<12}{}",
        s.label.apply_to("Radius"),
        s.value.apply_to(format!(
            "{} px of {} px",
            cal.reference_pixel_radius, cal.reference_image_width
        ))
    );
    println!(
        "    {:<12}{}",
        s.label.apply_to("Distance"),
        s.value
            .apply_to(format!("{:.0}", cal.reference_position.distance()))
    );
    println!();
}

pub fn print_run_summary(summary: &RunSummary, frame_list: &Path) {
    let s = Styles::new();

    println!();
    println!(
        "  {:<14}{}",
        s.label.apply_to("Pairs"),
        s.value.apply_to(summary.pairs)
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Rendered"),
        s.value.apply_to(summary.rendered)
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Cached"),
        s.value.apply_to(summary.cached)
    );
    for failure in &summary.failed_pairs {
        println!(
            "  {:<14}{}",
            s.label.apply_to("Skipped"),
            s.warning.apply_to(format!(
                "{} -> {}: {}",
                failure.previous, failure.current, failure.reason
            ))
        );
    }
    if summary.cancelled {
        println!(
            "  {:<14}{}",
            s.label.apply_to("Status"),
            s.warning.apply_to("cancelled")
        );
    }
    println!(
        "  {:<14}{}",
        s.label.apply_to("Frame list"),
        s.path.apply_to(frame_list.display())
    );
    println!();
}
