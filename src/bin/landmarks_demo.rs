use retina_analysis::filters::{mean_threshold, skeletonize};
use retina_analysis::image::io::{load_gray_image, save_gray_image, write_json_file};
use retina_analysis::classify_skeleton_landmarks;
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
    let program = args.next().unwrap_or_else(|| "landmarks_demo".to_string());
    let input = args
        .next()
        .map(PathBuf::from)
        .ok_or_else(|| format!("Usage: {program} <vessels.png> [out.json] [skeleton.png]"))?;
    let json_out = args.next().map(PathBuf::from);
    let skeleton_out = args.next().map(PathBuf::from);

    let vessels = load_gray_image(&input).map_err(|e| e.to_string())?;
    let thresholded = mean_threshold(&vessels);
    let skeleton = skeletonize(&thresholded);
    let result =
        classify_skeleton_landmarks(&thresholded, &skeleton).map_err(|e| e.to_string())?;

    println!(
        "Landmarks: {} candidates, {} traced",
        result.landmarks.len(),
        result.segments.len()
    );
    println!("Bifurcations: {}", result.bifurcations.len());
    for b in &result.bifurcations {
        println!("  [{}, {}, {}, {}]", b.x0, b.y0, b.x1, b.y1);
    }
    println!("Crossings: {}", result.crossings.len());
    for c in &result.crossings {
        println!("  [{}, {}, {}, {}]", c.x0, c.y0, c.x1, c.y1);
    }

    if let Some(path) = &skeleton_out {
        save_gray_image(&skeleton, path).map_err(|e| e.to_string())?;
        println!("Skeleton written to {}", path.display());
    }

    match json_out {
        Some(path) => {
            write_json_file(&path, &result).map_err(|e| e.to_string())?;
            println!("JSON report written to {}", path.display());
        }
        None => {
            let json = serde_json::to_string_pretty(&result)
                .map_err(|e| format!("Failed to serialize JSON: {e}"))?;
            println!("{json}");
        }
    }
    Ok(())
}
