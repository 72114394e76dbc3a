//! Calibration constants of the drusen stage.
//!
//! The kernel sizes, gains and micron thresholds are empirical values tied to
//! the fundus imaging modality; changing them changes classification results.
use serde::Deserialize;

/// Median aperture estimating the illumination background of the green channel.
pub const ILLUMINATION_MEDIAN_KSIZE: u32 = 71;
/// Gain applied to `green / background` before 8-bit conversion.
pub const ILLUMINATION_GAIN: f32 = 55.0;
/// Gaussian aperture of the light post-correction smoothing.
pub const ILLUMINATION_SMOOTH_KSIZE: usize = 1;
/// Median aperture of the wide background estimate used for enhancement.
pub const BACKGROUND_MEDIAN_KSIZE: u32 = 71;
/// Gaussian aperture of the narrow estimate used for enhancement.
pub const CANDIDATE_GAUSSIAN_KSIZE: usize = 15;
/// Scale of the `wide / narrow` enhancement ratio.
pub const ENHANCEMENT_SCALE: f32 = 1.09;
pub const VESSEL_CLAHE_CLIP_LIMIT: f64 = 2.0;
pub const VESSEL_CLAHE_TILES: usize = 2;
pub const VESSEL_GAUSSIAN_KSIZE: usize = 21;
pub const VESSEL_ADAPTIVE_BLOCK: usize = 11;
pub const VESSEL_ADAPTIVE_C: f64 = 2.0;
/// Elliptical dilation aperture of the vessel mask.
pub const VESSEL_DILATE_KSIZE: usize = 1;
/// Elliptical opening aperture removing specks from the final mask.
pub const OPENING_KSIZE: usize = 2;
/// Fundus calibration: one pixel spans 3.4 µm.
pub const MICRONS_PER_PIXEL: f64 = 3.4;
pub const NORMAL_MAX_MICRONS: f64 = 63.0;
pub const MEDIUM_MAX_MICRONS: f64 = 125.0;
/// Outline thickness of annotated contours in pixels.
pub const CONTOUR_THICKNESS: u32 = 2;

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct DrusenParams {
    pub illumination_median_ksize: u32,
    pub illumination_gain: f32,
    pub illumination_smooth_ksize: usize,
    pub background_median_ksize: u32,
    pub candidate_gaussian_ksize: usize,
    pub enhancement_scale: f32,
    pub vessel_clahe_clip_limit: f64,
    pub vessel_clahe_tiles: usize,
    pub vessel_gaussian_ksize: usize,
    pub vessel_adaptive_block: usize,
    pub vessel_adaptive_c: f64,
    pub vessel_dilate_ksize: usize,
    pub opening_ksize: usize,
    pub contour_thickness: u32,
}

impl Default for DrusenParams {
    fn default() -> Self {
        Self {
            illumination_median_ksize: ILLUMINATION_MEDIAN_KSIZE,
            illumination_gain: ILLUMINATION_GAIN,
            illumination_smooth_ksize: ILLUMINATION_SMOOTH_KSIZE,
            background_median_ksize: BACKGROUND_MEDIAN_KSIZE,
            candidate_gaussian_ksize: CANDIDATE_GAUSSIAN_KSIZE,
            enhancement_scale: ENHANCEMENT_SCALE,
            vessel_clahe_clip_limit: VESSEL_CLAHE_CLIP_LIMIT,
            vessel_clahe_tiles: VESSEL_CLAHE_TILES,
            vessel_gaussian_ksize: VESSEL_GAUSSIAN_KSIZE,
            vessel_adaptive_block: VESSEL_ADAPTIVE_BLOCK,
            vessel_adaptive_c: VESSEL_ADAPTIVE_C,
            vessel_dilate_ksize: VESSEL_DILATE_KSIZE,
            opening_ksize: OPENING_KSIZE,
            contour_thickness: CONTOUR_THICKNESS,
        }
    }
}
