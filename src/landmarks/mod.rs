//! Vessel landmark classification: bifurcations and crossings.
//!
//! Pipeline over a binary vessel mask and its skeleton:
//! 1. [`detect_candidates`] flags skeleton pixels with 4 or more neighbours.
//! 2. [`estimate_width`] measures the vessel around each candidate on the
//!    thresholded mask.
//! 3. [`trace_branches`] samples a circle sized by that width and collects
//!    one point per incident branch; 3 points tag a bifurcation, 4 a
//!    crossing.
//! 4. [`group_landmarks`] merges neighbouring landmarks into ±3 px boxes
//!    classified by majority tag.
//!
//! All coordinates are `(x, y)` = `(column, row)`.

mod candidates;
mod grouping;
mod tracing;
mod width;

pub use candidates::detect_candidates;
pub use grouping::group_landmarks;
pub use tracing::{trace_branches, trace_radius};
pub use width::estimate_width;

use crate::error::{AnalysisError, Result};
use crate::filters::{mean_threshold, skeletonize};
use crate::geometry::PixelPoint;
use image::GrayImage;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum LandmarkKind {
    /// Neighbour count of exactly 4.
    BifurcationCandidate,
    /// Neighbour count of 5 or more.
    CrossingCandidate,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Landmark {
    pub position: PixelPoint,
    /// Foreground pixels in the detection window, the landmark included.
    pub neighbors: u32,
    pub kind: LandmarkKind,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VesselWidth {
    /// One of 0, 45, 90, 135.
    pub angle_deg: u16,
    pub forward: u32,
    pub backward: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum JunctionKind {
    Bifurcation,
    Crossing,
}

/// Branch points traced around one landmark.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VesselSegment {
    pub landmark: PixelPoint,
    pub width: VesselWidth,
    pub radius: i32,
    pub points: Vec<PixelPoint>,
    pub junction: Option<JunctionKind>,
}

/// Inclusive box `[x0, x1] × [y0, y1]` around a grouped landmark.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassifiedBox {
    pub x0: i32,
    pub y0: i32,
    pub x1: i32,
    pub y1: i32,
    pub kind: JunctionKind,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct LandmarkParams {
    /// Odd side of the candidate neighbourhood window.
    pub kernel: usize,
    /// Upper bound on width-walk rounds.
    pub max_width: u32,
    /// Multiplier applied to the backward width when sizing the trace circle.
    pub backward_factor: f64,
    /// Half side of grouping boxes.
    pub box_radius: i32,
}

impl Default for LandmarkParams {
    fn default() -> Self {
        Self {
            kernel: 3,
            max_width: 64,
            backward_factor: 1.4,
            box_radius: 3,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LandmarkClassification {
    pub bifurcations: Vec<ClassifiedBox>,
    pub crossings: Vec<ClassifiedBox>,
    pub landmarks: Vec<Landmark>,
    pub segments: Vec<VesselSegment>,
}

/// Mean-threshold and skeletonize a gray vessel image, then classify.
pub fn classify_landmarks(vessels: &GrayImage) -> Result<LandmarkClassification> {
    classify_landmarks_with(vessels, &LandmarkParams::default())
}

pub fn classify_landmarks_with(
    vessels: &GrayImage,
    params: &LandmarkParams,
) -> Result<LandmarkClassification> {
    if vessels.width() == 0 || vessels.height() == 0 {
        return Err(AnalysisError::InputError("empty vessel image".to_string()));
    }
    let thresholded = mean_threshold(vessels);
    let skeleton = skeletonize(&thresholded);
    classify_skeleton_landmarks_with(&thresholded, &skeleton, params)
}

/// Classify junctions on caller-provided masks (non-zero is foreground).
pub fn classify_skeleton_landmarks(
    thresholded: &GrayImage,
    skeleton: &GrayImage,
) -> Result<LandmarkClassification> {
    classify_skeleton_landmarks_with(thresholded, skeleton, &LandmarkParams::default())
}

pub fn classify_skeleton_landmarks_with(
    thresholded: &GrayImage,
    skeleton: &GrayImage,
    params: &LandmarkParams,
) -> Result<LandmarkClassification> {
    if thresholded.dimensions() != skeleton.dimensions() {
        return Err(AnalysisError::InputError(format!(
            "thresholded {:?} and skeleton {:?} differ in size",
            thresholded.dimensions(),
            skeleton.dimensions()
        )));
    }
    if params.kernel % 2 == 0 {
        return Err(AnalysisError::InputError(format!(
            "landmark kernel must be odd, got {}",
            params.kernel
        )));
    }

    let landmarks = detect_candidates(skeleton, params.kernel);
    let mut segments = Vec::with_capacity(landmarks.len());
    let mut tags = HashMap::new();
    for lm in &landmarks {
        let Some(width) = estimate_width(thresholded, lm.position, params.max_width) else {
            warn!(
                "no vessel width at ({}, {}), landmark not traced",
                lm.position.x, lm.position.y
            );
            continue;
        };
        let radius = trace_radius(&width, params.backward_factor);
        let points = trace_branches(skeleton, lm.position, radius);
        let junction = match points.len() {
            3 => Some(JunctionKind::Bifurcation),
            4 => Some(JunctionKind::Crossing),
            _ => None,
        };
        if let Some(kind) = junction {
            tags.insert(lm.position, kind);
        }
        segments.push(VesselSegment {
            landmark: lm.position,
            width,
            radius,
            points,
            junction,
        });
    }

    let positions: Vec<PixelPoint> = landmarks.iter().map(|l| l.position).collect();
    let (bifurcations, crossings) = group_landmarks(&positions, &tags, params.box_radius);
    debug!(
        "classify_landmarks candidates={} traced={} tagged={} bifurcations={} crossings={}",
        landmarks.len(),
        segments.len(),
        tags.len(),
        bifurcations.len(),
        crossings.len()
    );
    Ok(LandmarkClassification {
        bifurcations,
        crossings,
        landmarks,
        segments,
    })
}
