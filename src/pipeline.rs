//! End-to-end drusen analysis of a fundus photograph.
//!
//! The disc is searched on a copy resized to a fixed working width with dark
//! pixels suppressed; its position is mapped back to full resolution, where
//! the macula ROI is cropped and analysed.
use crate::diagnostics::{elapsed_ms, InputDescriptor, TimingBreakdown};
use crate::disc::{DiscLocation, DiscLocator, DiscLocatorParams, TemplateHistogramSet};
use crate::drusen::{ClassificationTally, DrusenCandidate, DrusenDetector, DrusenParams};
use crate::error::{AnalysisError, Result};
use crate::geometry::PixelPoint;
use crate::image::{resize_to_width, suppress_dark_pixels};
use crate::roi::{extract_roi_with, RoiParams, RoiRect};
use image::RgbImage;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Width of the copy the disc is searched on.
pub const WORKING_WIDTH: u32 = 700;

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct AnalyzerParams {
    pub working_width: u32,
    pub disc: DiscLocatorParams,
    pub roi: RoiParams,
    pub drusen: DrusenParams,
}

impl Default for AnalyzerParams {
    fn default() -> Self {
        Self {
            working_width: WORKING_WIDTH,
            disc: DiscLocatorParams::default(),
            roi: RoiParams::default(),
            drusen: DrusenParams::default(),
        }
    }
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DrusenReport {
    pub input: InputDescriptor,
    /// Disc location in working-resolution coordinates.
    pub disc_working: DiscLocation,
    /// Disc centre in full-resolution coordinates.
    pub disc: PixelPoint,
    pub roi: RoiRect,
    pub tally: ClassificationTally,
    pub summary: String,
    pub candidates: Vec<DrusenCandidate>,
    #[serde(skip)]
    pub annotated: RgbImage,
    pub timings: TimingBreakdown,
}

/// Map `p` from an image of size `from` to one of size `to` with per-axis
/// ratios, rounding and clamping into the target.
pub fn rescale_point(p: PixelPoint, from: (u32, u32), to: (u32, u32)) -> PixelPoint {
    let axis = |v: i32, src: u32, dst: u32| -> i32 {
        if src == 0 || dst == 0 {
            return 0;
        }
        let scaled = (v as f64 * dst as f64 / src as f64).round() as i64;
        scaled.clamp(0, dst as i64 - 1) as i32
    };
    PixelPoint::new(axis(p.x, from.0, to.0), axis(p.y, from.1, to.1))
}

/// Disc locator and drusen detector sharing one template set.
#[derive(Clone, Debug)]
pub struct FundusAnalyzer {
    working_width: u32,
    roi: RoiParams,
    locator: DiscLocator,
    detector: DrusenDetector,
}

impl FundusAnalyzer {
    pub fn new(params: AnalyzerParams, templates: TemplateHistogramSet) -> Self {
        Self {
            working_width: params.working_width,
            roi: params.roi,
            locator: DiscLocator::new(params.disc, templates),
            detector: DrusenDetector::new(params.drusen),
        }
    }

    pub fn analyze(&self, img: &RgbImage) -> Result<DrusenReport> {
        let (w, h) = img.dimensions();
        if w == 0 || h == 0 {
            return Err(AnalysisError::InputError("empty fundus image".to_string()));
        }
        let total_start = Instant::now();
        let mut timings = TimingBreakdown::default();

        let stage = Instant::now();
        let working = resize_to_width(img, self.working_width.max(1));
        let suppressed = suppress_dark_pixels(&working);
        timings.record_since("prepare", stage);
        debug!(
            "FundusAnalyzer::analyze input={}x{} working={}x{}",
            w,
            h,
            working.width(),
            working.height()
        );

        let stage = Instant::now();
        let disc_working = self.locator.locate_with_diagnostics(&suppressed)?;
        let disc = rescale_point(disc_working.center, working.dimensions(), (w, h));
        timings.record_since("disc", stage);

        let stage = Instant::now();
        let (roi_img, roi) = extract_roi_with(img, disc, &self.roi)?;
        timings.record_since("roi", stage);

        let stage = Instant::now();
        let detection = self.detector.detect(&roi_img)?;
        timings.record_since("drusen", stage);
        timings.total_ms = elapsed_ms(total_start);

        info!(
            "disc=({}, {}) roi={}x{}+{}+{} drusen total={} in {:.1} ms",
            disc.x,
            disc.y,
            roi.rect.width,
            roi.rect.height,
            roi.rect.x,
            roi.rect.y,
            detection.tally.total(),
            timings.total_ms
        );

        Ok(DrusenReport {
            input: InputDescriptor {
                width: w,
                height: h,
                working_width: working.width(),
                working_height: working.height(),
            },
            disc_working,
            disc,
            roi,
            summary: detection.tally.summary(),
            tally: detection.tally,
            candidates: detection.candidates,
            annotated: detection.annotated,
            timings,
        })
    }
}
