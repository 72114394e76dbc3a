use retina_analysis::config::load_config;
use retina_analysis::image::io::{load_rgb_image, save_rgb_image, write_json_file};
use retina_analysis::{FundusAnalyzer, TemplateHistogramSet};
use std::env;
use std::path::PathBuf;

fn main() {
    env_logger::init();
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let mut args = env::args();
    let program = args
        .next()
        .unwrap_or_else(|| "retina_analysis".to_string());
    let config_path = args
        .next()
        .map(PathBuf::from)
        .ok_or_else(|| format!("Usage: {program} <config.json>"))?;

    let config = load_config(&config_path).map_err(|e| e.to_string())?;
    let templates =
        TemplateHistogramSet::load_dir(&config.templates_dir).map_err(|e| e.to_string())?;
    let fundus = load_rgb_image(&config.input).map_err(|e| e.to_string())?;

    let analyzer = FundusAnalyzer::new(config.params.clone(), templates);
    let report = analyzer.analyze(&fundus).map_err(|e| e.to_string())?;

    println!("Disc: ({}, {})", report.disc.x, report.disc.y);
    println!(
        "ROI: {}x{} at ({}, {})",
        report.roi.rect.width, report.roi.rect.height, report.roi.rect.x, report.roi.rect.y
    );
    println!("{}", report.summary);
    println!("Total time: {:.1} ms", report.timings.total_ms);

    if let Some(path) = &config.output.annotated_image {
        save_rgb_image(&report.annotated, path).map_err(|e| e.to_string())?;
        println!("Annotated ROI written to {}", path.display());
    }
    if let Some(path) = &config.output.json_report {
        write_json_file(path, &report).map_err(|e| e.to_string())?;
        println!("JSON report written to {}", path.display());
    }
    Ok(())
}
