#![doc = include_str!("../README.md")]

pub mod config;
pub mod diagnostics;
pub mod disc;
pub mod drusen;
pub mod error;
pub mod filters;
pub mod geometry;
pub mod image;
pub mod landmarks;
pub mod pipeline;
pub mod roi;

// --- High-level re-exports -------------------------------------------------

pub use crate::disc::{locate_disc, DiscLocation, DiscLocator, DiscLocatorParams, TemplateHistogramSet};
pub use crate::drusen::{
    detect_and_classify_drusen, ClassificationTally, DrusenDetection, DrusenDetector, DrusenParams,
    DrusenSize,
};
pub use crate::error::{AnalysisError, Result};
pub use crate::geometry::{PixelPoint, PixelRect};
pub use crate::landmarks::{
    classify_landmarks, classify_skeleton_landmarks, ClassifiedBox, JunctionKind,
    LandmarkClassification, LandmarkParams,
};
pub use crate::pipeline::{AnalyzerParams, DrusenReport, FundusAnalyzer};
pub use crate::roi::{extract_roi, RoiParams, RoiRect};

// --- Prelude ---------------------------------------------------------------

/// Small prelude for quick experiments.
///
/// ```no_run
/// use retina_analysis::prelude::*;
/// use std::path::Path;
///
/// # fn main() -> retina_analysis::Result<()> {
/// let templates = TemplateHistogramSet::load_dir(Path::new("templates"))?;
/// let fundus = load_rgb_image(Path::new("fundus.jpg"))?;
///
/// let analyzer = FundusAnalyzer::new(AnalyzerParams::default(), templates);
/// let report = analyzer.analyze(&fundus)?;
/// println!("{}", report.summary);
/// # Ok(())
/// # }
/// ```
pub mod prelude {
    pub use crate::image::io::{load_gray_image, load_rgb_image};
    pub use crate::{
        classify_landmarks, detect_and_classify_drusen, extract_roi, locate_disc, AnalyzerParams,
        FundusAnalyzer, PixelPoint, TemplateHistogramSet,
    };
}
