//! Drusen candidate segmentation on a macula ROI.
//!
//! Stages, each returning a new plane:
//! 1. [`correct_illumination`]: green channel divided by its wide median.
//! 2. [`enhance_candidates`]: wide median over narrow Gaussian of the
//!    corrected plane, scaled and stored as 8 bits.
//! 3. Otsu binarisation of the enhanced plane.
//! 4. [`vessel_mask`] and [`suppress_vessels`]: the candidate mask is divided
//!    by the vessel mask (zero divisor yields 0) and re-binarised with Otsu.
//! 5. [`filter_by_color`]: candidates darker than the mean ROI green go.
//! 6. Opening with a small ellipse.
use super::params::DrusenParams;
use crate::filters::{
    adaptive_mean_threshold, clahe, dilate, gaussian_blur_u8, median_blur, open, otsu_threshold,
    ClaheParams, StructuringElement,
};
use crate::image::{extract_channel, gray_mean, Channel, ImageF32};
use image::{GrayImage, Luma, RgbImage};
use log::debug;

/// Flatten large-scale illumination of the green channel.
pub fn correct_illumination(roi: &RgbImage, params: &DrusenParams) -> GrayImage {
    let green = extract_channel(roi, Channel::Green);
    let background = median_blur(&green, params.illumination_median_ksize);
    let corrected = ImageF32::ratio(
        &ImageF32::from_gray(&green),
        &ImageF32::from_gray(&background),
        params.illumination_gain,
    )
    .to_gray_wrapping();
    gaussian_blur_u8(&corrected, params.illumination_smooth_ksize)
}

/// Candidate enhancement; returns `(enhanced, narrow)` where `narrow` is the
/// Gaussian-smoothed corrected plane reused by the vessel mask.
///
/// The 8-bit conversion wraps: neutral background (`wide ≈ narrow`, ratio
/// `≈ 1.09 · 255`) folds to a dark value while locally bright spots
/// (`narrow > wide`) stay bright.
pub fn enhance_candidates(corrected: &GrayImage, params: &DrusenParams) -> (GrayImage, GrayImage) {
    let wide = median_blur(corrected, params.background_median_ksize);
    let narrow = gaussian_blur_u8(corrected, params.candidate_gaussian_ksize);
    let mut ratio = ImageF32::ratio(
        &ImageF32::from_gray(&wide),
        &ImageF32::from_gray(&narrow),
        params.enhancement_scale,
    );
    for v in ratio.data.iter_mut() {
        *v *= 255.0;
    }
    (ratio.to_gray_wrapping(), narrow)
}

/// Binary vessel mask (0/255) of a smoothed green plane.
pub fn vessel_mask(smoothed: &GrayImage, params: &DrusenParams) -> GrayImage {
    let equalized = clahe(
        smoothed,
        ClaheParams {
            clip_limit: params.vessel_clahe_clip_limit,
            tiles_x: params.vessel_clahe_tiles,
            tiles_y: params.vessel_clahe_tiles,
        },
    );
    let blurred = gaussian_blur_u8(&equalized, params.vessel_gaussian_ksize);
    let thresholded = adaptive_mean_threshold(
        &blurred,
        params.vessel_adaptive_block,
        params.vessel_adaptive_c,
    );
    let se = StructuringElement::ellipse(params.vessel_dilate_ksize, params.vessel_dilate_ksize);
    dilate(&thresholded, &se)
}

/// Integer quotient `candidates / vessels` (0 where the vessel mask is 0),
/// re-binarised with Otsu.
pub fn suppress_vessels(candidates: &GrayImage, vessels: &GrayImage) -> GrayImage {
    let quotient = GrayImage::from_fn(candidates.width(), candidates.height(), |x, y| {
        let v = vessels.get_pixel(x, y).0[0];
        let c = candidates.get_pixel(x, y).0[0];
        Luma([if v == 0 { 0 } else { c / v }])
    });
    otsu_threshold(&quotient).1
}

/// Zero every mask pixel whose ROI green value is below the mean green value.
pub fn filter_by_color(mask: &GrayImage, roi: &RgbImage) -> GrayImage {
    let green = extract_channel(roi, Channel::Green);
    let average = gray_mean(&green);
    GrayImage::from_fn(mask.width(), mask.height(), |x, y| {
        let m = mask.get_pixel(x, y).0[0];
        if m != 0 && (green.get_pixel(x, y).0[0] as f64) < average {
            Luma([0])
        } else {
            Luma([m])
        }
    })
}

/// Remove specks narrower than the opening element.
pub fn clean_mask(mask: &GrayImage, params: &DrusenParams) -> GrayImage {
    let se = StructuringElement::ellipse(params.opening_ksize, params.opening_ksize);
    open(mask, &se)
}

/// Full segmentation producing the cleaned 0/255 drusen mask.
pub fn segment_drusen(roi: &RgbImage, params: &DrusenParams) -> GrayImage {
    let corrected = correct_illumination(roi, params);
    let (enhanced, narrow) = enhance_candidates(&corrected, params);
    let (level, candidates) = otsu_threshold(&enhanced);
    let vessels = vessel_mask(&narrow, params);
    let suppressed = suppress_vessels(&candidates, &vessels);
    let colored = filter_by_color(&suppressed, roi);
    let cleaned = clean_mask(&colored, params);
    debug!(
        "segment_drusen {}x{} otsu_level={} candidates={} after_vessels={} after_color={} cleaned={}",
        roi.width(),
        roi.height(),
        level,
        count_foreground(&candidates),
        count_foreground(&suppressed),
        count_foreground(&colored),
        count_foreground(&cleaned)
    );
    cleaned
}

pub(crate) fn count_foreground(mask: &GrayImage) -> usize {
    mask.as_raw().iter().filter(|&&v| v != 0).count()
}
