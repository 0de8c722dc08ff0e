use std::path::Path;

use console::Style;
use mitosel_core::pipeline::config::PipelineConfig;
use mitosel_core::pipeline::PipelineOutput;
use mitosel_core::segment::FilterPolicy;

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

pub fn print_config_summary(config: &PipelineConfig, image_id: &str, output: &Path) {
    let s = Styles::new();

    println!();
    println!("  {}", s.title.apply_to("Mitosis Selector"));
    println!("  {}", s.title.apply_to("\u{2550}".repeat(16)));
    println!();

    println!("  {:<14}{}", s.label.apply_to("Image"), s.value.apply_to(image_id));
    println!(
        "  {:<14}{}",
        s.label.apply_to("Output"),
        s.path.apply_to(output.display())
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Channel"),
        s.value.apply_to(config.channel)
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Diameter"),
        s.value.apply_to(config.nuclei_diameter)
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Half window"),
        s.value.apply_to(format!("{} frames", config.half_window_frames))
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Stages"),
        s.value.apply_to(config.stages.join(", "))
    );
    println!();

    let seg = &config.segmentation;
    println!("  {}", s.header.apply_to("Segmentation"));
    println!(
        "    {:<12}{}",
        s.label.apply_to("Policy"),
        s.method.apply_to(seg.filter_policy)
    );
    println!(
        "    {:<12}{}",
        s.label.apply_to("Threshold"),
        s.method.apply_to(seg.threshold_method)
    );
    if seg.filter_policy == FilterPolicy::ShapeAware {
        println!(
            "    {:<12}{}",
            s.label.apply_to("Min area"),
            s.value.apply_to(seg.min_area)
        );
        println!(
            "    {:<12}{}",
            s.label.apply_to("Min ecc."),
            s.value.apply_to(seg.min_eccentricity)
        );
        println!(
            "    {:<12}{}",
            s.label.apply_to("Min frames"),
            s.value.apply_to(seg.min_time_frames)
        );
    }
    println!();
}

pub fn print_run_summary(output: &PipelineOutput, dir: &Path) {
    let s = Styles::new();

    println!(
        "  {:<14}{}",
        s.label.apply_to("Box size"),
        s.value.apply_to(format!("{} px", output.box_size))
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Candidates"),
        s.value.apply_to(output.report.candidates)
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("ROIs"),
        s.value.apply_to(output.table.len())
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Frames"),
        s.value.apply_to(output.frames.len())
    );
    for skipped in &output.report.skipped_frames {
        let which = skipped
            .time_index
            .map(|t| format!("frame {t}"))
            .unwrap_or_else(|| "projection".to_string());
        println!(
            "  {:<14}{}",
            s.warning.apply_to("Skipped"),
            s.warning.apply_to(format!("{which}: {}", skipped.reason))
        );
    }
    if output.report.empty {
        println!(
            "  {}",
            s.warning.apply_to("No candidate cells found, result table is empty")
        );
    }
    println!();
    println!("  Results saved to {}", s.path.apply_to(dir.display()));
}
