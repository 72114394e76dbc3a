//! Drusen detection and size classification on a macula ROI.
//!
//! [`segment_drusen`] produces a cleaned binary mask; every external contour
//! of that mask is one candidate. A candidate's diameter is the longest side
//! of its minimum-area rectangle converted to microns, and its size bucket
//! decides the outline colour drawn on the annotated copy of the ROI.
//!
//! Tallies are built per call, so repeated detections never accumulate.

mod annotate;
pub mod classify;
pub mod params;
pub mod segmentation;

pub use annotate::annotate_candidates;
pub use classify::{classify_diameter, pixels_to_microns, ClassificationTally, DrusenSize};
pub use params::DrusenParams;
pub use segmentation::segment_drusen;

use crate::error::{AnalysisError, Result};
use crate::geometry::{min_area_rect, ContourMoments, PixelPoint, RotatedRect};
use image::{GrayImage, RgbImage};
use imageproc::contours::{find_contours, BorderType};
use imageproc::point::Point;
use log::{debug, info};
use serde::Serialize;

/// One classified druse.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DrusenCandidate {
    /// Outer boundary pixels in ROI coordinates.
    #[serde(skip)]
    pub contour: Vec<Point<i32>>,
    pub centroid: PixelPoint,
    pub rect: RotatedRect,
    pub diameter_px: f64,
    pub diameter_microns: f64,
    pub size: DrusenSize,
}

#[derive(Clone, Debug)]
pub struct DrusenDetection {
    /// Copy of the ROI with candidate outlines drawn on it.
    pub annotated: RgbImage,
    pub tally: ClassificationTally,
    pub candidates: Vec<DrusenCandidate>,
}

#[derive(Clone, Debug, Default)]
pub struct DrusenDetector {
    params: DrusenParams,
}

impl DrusenDetector {
    pub fn new(params: DrusenParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &DrusenParams {
        &self.params
    }

    pub fn detect(&self, roi: &RgbImage) -> Result<DrusenDetection> {
        if roi.width() == 0 || roi.height() == 0 {
            return Err(AnalysisError::InputError("empty ROI image".to_string()));
        }
        let mask = segment_drusen(roi, &self.params);
        let (candidates, tally) = classify_mask(&mask);
        let mut annotated = roi.clone();
        annotate_candidates(&mut annotated, &candidates, self.params.contour_thickness);
        info!(
            "drusen: normal={} medium={} large={}",
            tally.normal, tally.medium, tally.large
        );
        Ok(DrusenDetection {
            annotated,
            tally,
            candidates,
        })
    }
}

/// Detect and classify drusen with default parameters.
pub fn detect_and_classify_drusen(roi: &RgbImage) -> Result<DrusenDetection> {
    DrusenDetector::default().detect(roi)
}

/// Classify every external contour of a 0/255 mask.
pub fn classify_mask(mask: &GrayImage) -> (Vec<DrusenCandidate>, ClassificationTally) {
    let mut tally = ClassificationTally::new();
    let candidates: Vec<DrusenCandidate> = find_contours::<i32>(mask)
        .into_iter()
        .filter(|c| c.border_type == BorderType::Outer && c.parent.is_none())
        .map(|c| {
            let rect = min_area_rect(&c.points);
            let diameter_px = rect.longest_side();
            let diameter_microns = pixels_to_microns(diameter_px);
            let size = classify_diameter(diameter_microns);
            tally.record(size);
            DrusenCandidate {
                centroid: ContourMoments::of_polygon(&c.points).centroid(),
                contour: c.points,
                rect,
                diameter_px,
                diameter_microns,
                size,
            }
        })
        .collect();
    debug!("classify_mask contours={}", candidates.len());
    (candidates, tally)
}
