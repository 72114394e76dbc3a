mod common;

use common::synthetic_image::{disc_template, synthetic_fundus};
use retina_analysis::filters::median_blur;
use retina_analysis::roi::DiscSide;
use retina_analysis::{
    locate_disc, AnalysisError, AnalyzerParams, ClassificationTally, FundusAnalyzer,
    TemplateHistogramSet,
};

const WIDTH: u32 = 700;
const HEIGHT: u32 = 560;
const FUNDUS: (i32, i32, i32) = (350, 280, 330);
const DISC: (i32, i32, i32) = (150, 265, 30);
const DRUSEN: [(i32, i32, i32); 3] = [(320, 190, 3), (400, 270, 14), (465, 345, 24)];

fn templates() -> TemplateHistogramSet {
    // Templates go through the same median blur as the search image.
    let crop = median_blur(&disc_template(80, DISC.2), 5);
    TemplateHistogramSet::from_images(&[crop]).unwrap()
}

#[test]
fn disc_is_located_on_a_synthetic_fundus() {
    let _ = env_logger::builder().is_test(true).try_init();
    let img = synthetic_fundus(WIDTH, HEIGHT, FUNDUS, DISC, &DRUSEN);
    let disc = locate_disc(&img, &templates()).unwrap();
    assert!(disc.in_bounds(WIDTH, HEIGHT));
    assert!((disc.x - DISC.0).abs() <= 5, "disc={disc:?}");
    assert!((disc.y - DISC.1).abs() <= 5, "disc={disc:?}");
}

#[test]
fn pipeline_reports_disc_roi_and_drusen() {
    let _ = env_logger::builder().is_test(true).try_init();
    let img = synthetic_fundus(WIDTH, HEIGHT, FUNDUS, DISC, &DRUSEN);
    let analyzer = FundusAnalyzer::new(AnalyzerParams::default(), templates());
    let report = analyzer.analyze(&img).unwrap();

    assert!((report.disc.x - DISC.0).abs() <= 5, "disc={:?}", report.disc);
    assert!((report.disc.y - DISC.1).abs() <= 5, "disc={:?}", report.disc);
    assert_eq!(report.roi.disc_side, DiscSide::Left);
    assert_eq!((report.roi.rect.width, report.roi.rect.height), (271, 286));
    assert_eq!(report.annotated.dimensions(), (271, 286));
    assert!(!report.roi.clamped);
    assert_eq!(
        report.tally,
        ClassificationTally {
            normal: 1,
            medium: 1,
            large: 1
        },
        "{:?}",
        report.candidates
    );
    assert!(report.summary.contains("Total Large Drusen"));
    assert!(report.timings.total_ms >= 0.0);
    assert!(report.timings.stage("disc").is_some());

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["tally"]["large"], 1);
    assert!(json.get("annotated").is_none());
}

#[test]
fn full_resolution_input_is_mapped_back() {
    let _ = env_logger::builder().is_test(true).try_init();
    let small = synthetic_fundus(WIDTH, HEIGHT, FUNDUS, DISC, &DRUSEN);
    let big = image::imageops::resize(
        &small,
        WIDTH * 2,
        HEIGHT * 2,
        image::imageops::FilterType::Nearest,
    );
    let analyzer = FundusAnalyzer::new(AnalyzerParams::default(), templates());
    let report = analyzer.analyze(&big).unwrap();
    assert_eq!(report.input.working_width, WIDTH);
    assert_eq!(report.input.working_height, HEIGHT);
    assert!((report.disc.x - 2 * DISC.0).abs() <= 10, "disc={:?}", report.disc);
    assert!((report.disc.y - 2 * DISC.1).abs() <= 10, "disc={:?}", report.disc);
    assert_eq!(
        (report.roi.rect.width, report.roi.rect.height),
        (542, 571)
    );
}

#[test]
fn analysis_is_idempotent() {
    let img = synthetic_fundus(WIDTH, HEIGHT, FUNDUS, DISC, &DRUSEN);
    let analyzer = FundusAnalyzer::new(AnalyzerParams::default(), templates());
    let a = analyzer.analyze(&img).unwrap();
    let b = analyzer.analyze(&img).unwrap();
    assert_eq!(a.disc, b.disc);
    assert_eq!(a.tally, b.tally);
    assert_eq!(a.annotated.as_raw(), b.annotated.as_raw());
}

#[test]
fn blank_frame_is_a_detection_failure() {
    let img = image::RgbImage::new(WIDTH, HEIGHT);
    let analyzer = FundusAnalyzer::new(AnalyzerParams::default(), templates());
    assert!(matches!(
        analyzer.analyze(&img),
        Err(AnalysisError::DetectionFailure(_))
    ));
}
