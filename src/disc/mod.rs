//! Optic disc localisation by template histogram correlation.
//!
//! Overview
//! - The search image is median-blurred, then every pixel inside the vertical
//!   search band whose blue channel is non-zero (inside the fundus) gets a
//!   correlation score between its window histograms and the averaged
//!   template histograms.
//! - The score map is thresholded at a fraction of its peak, the mask
//!   boundary is extracted with a 3×3 morphological gradient, and the disc
//!   centre is the midpoint of the boundary's bounding box.
//!
//! An empty score map (no eligible pixel, or a zero peak) is reported as
//! [`AnalysisError::DetectionFailure`], never as a `(0, 0)` coordinate.

pub mod histogram;
pub mod params;
mod scan;

pub use histogram::{window_histograms, ChannelHistograms, TemplateHistogramSet};
pub use params::{CorrelationWeights, DiscLocatorParams};
pub use scan::correlation;

use crate::error::{AnalysisError, Result};
use crate::filters::{gradient, median_blur, StructuringElement};
use crate::geometry::{PixelPoint, PixelRect};
use image::{GrayImage, Luma, RgbImage};
use log::debug;
use serde::Serialize;

/// Disc centre together with the evidence it was derived from.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscLocation {
    pub center: PixelPoint,
    /// Bounding box of the thresholded score-map boundary.
    pub bounding_box: PixelRect,
    pub peak_score: f64,
    /// Number of pixels at or above the score threshold.
    pub mask_pixels: usize,
}

/// Reusable locator holding the template histograms.
#[derive(Clone, Debug)]
pub struct DiscLocator {
    params: DiscLocatorParams,
    templates: TemplateHistogramSet,
}

impl DiscLocator {
    pub fn new(params: DiscLocatorParams, templates: TemplateHistogramSet) -> Self {
        Self { params, templates }
    }

    pub fn params(&self) -> &DiscLocatorParams {
        &self.params
    }

    /// Disc centre in the coordinates of `img`.
    pub fn locate(&self, img: &RgbImage) -> Result<PixelPoint> {
        self.locate_with_diagnostics(img).map(|loc| loc.center)
    }

    pub fn locate_with_diagnostics(&self, img: &RgbImage) -> Result<DiscLocation> {
        let (w, h) = img.dimensions();
        if w == 0 || h == 0 {
            return Err(AnalysisError::InputError("empty fundus image".to_string()));
        }
        let band = self.params.search_band(h);
        debug!(
            "DiscLocator::locate w={} h={} band={:?} window={}",
            w, h, band, self.params.window_size
        );
        if band.is_empty() {
            return Err(AnalysisError::DetectionFailure(format!(
                "search band is empty for an image of height {h}"
            )));
        }

        let blurred = median_blur(img, self.params.median_ksize);
        let scores = scan::score_map(&blurred, self.templates.histograms(), &self.params);
        let peak = scores.iter().copied().fold(0.0f64, f64::max);
        if peak <= 0.0 {
            return Err(AnalysisError::DetectionFailure(
                "no fundus pixel inside the search band".to_string(),
            ));
        }

        let cutoff = peak * self.params.threshold_ratio;
        let mut mask_pixels = 0usize;
        let mask = GrayImage::from_fn(w, h, |x, y| {
            let on = scores[(y * w + x) as usize] >= cutoff;
            mask_pixels += on as usize;
            Luma([on as u8])
        });
        let boundary = gradient(&mask, &StructuringElement::rect(3, 3));

        let mut bounds: Option<(u32, u32, u32, u32)> = None;
        for (x, y, px) in boundary.enumerate_pixels() {
            if px.0[0] == 0 {
                continue;
            }
            bounds = Some(match bounds {
                None => (x, y, x, y),
                Some((x0, y0, x1, y1)) => (x0.min(x), y0.min(y), x1.max(x), y1.max(y)),
            });
        }
        let (x0, y0, x1, y1) = bounds.ok_or_else(|| {
            AnalysisError::DetectionFailure("score mask has no boundary".to_string())
        })?;

        let center = PixelPoint::new((x0 + (x1 - x0) / 2) as i32, (y0 + (y1 - y0) / 2) as i32);
        debug!(
            "DiscLocator::locate peak={:.6} mask_px={} bbox=({},{})-({},{}) center=({},{})",
            peak, mask_pixels, x0, y0, x1, y1, center.x, center.y
        );
        Ok(DiscLocation {
            center,
            bounding_box: PixelRect {
                x: x0,
                y: y0,
                width: x1 - x0 + 1,
                height: y1 - y0 + 1,
            },
            peak_score: peak,
            mask_pixels,
        })
    }
}

/// Locate the disc with default parameters.
pub fn locate_disc(img: &RgbImage, templates: &TemplateHistogramSet) -> Result<PixelPoint> {
    DiscLocator::new(DiscLocatorParams::default(), templates.clone()).locate(img)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn small_params() -> DiscLocatorParams {
        DiscLocatorParams {
            window_size: 16,
            top_margin: 0,
            bottom_margin: 0,
            ..Default::default()
        }
    }

    #[test]
    fn black_image_is_a_detection_failure() {
        let img = RgbImage::new(40, 40);
        let templates =
            TemplateHistogramSet::from_images(&[RgbImage::from_pixel(8, 8, Rgb([200, 200, 200]))])
                .unwrap();
        let locator = DiscLocator::new(small_params(), templates);
        assert!(matches!(
            locator.locate(&img),
            Err(AnalysisError::DetectionFailure(_))
        ));
    }

    #[test]
    fn empty_band_is_a_detection_failure() {
        let img = RgbImage::from_pixel(40, 40, Rgb([90, 90, 90]));
        let templates =
            TemplateHistogramSet::from_images(&[RgbImage::from_pixel(8, 8, Rgb([90, 90, 90]))])
                .unwrap();
        let locator = DiscLocator::new(DiscLocatorParams::default(), templates);
        assert!(matches!(
            locator.locate(&img),
            Err(AnalysisError::DetectionFailure(_))
        ));
    }

    #[test]
    fn bright_square_is_found() {
        let mut img = RgbImage::from_pixel(64, 48, Rgb([110, 50, 20]));
        for y in 20..32 {
            for x in 40..52 {
                img.put_pixel(x, y, Rgb([240, 210, 160]));
            }
        }
        let template = RgbImage::from_fn(16, 16, |x, y| {
            if (2..14).contains(&x) && (2..14).contains(&y) {
                Rgb([240, 210, 160])
            } else {
                Rgb([110, 50, 20])
            }
        });
        let templates = TemplateHistogramSet::from_images(&[template]).unwrap();
        let loc = DiscLocator::new(small_params(), templates)
            .locate_with_diagnostics(&img)
            .unwrap();
        assert!((loc.center.x - 46).abs() <= 2, "center={:?}", loc.center);
        assert!((loc.center.y - 26).abs() <= 2, "center={:?}", loc.center);
        assert!(loc.center.in_bounds(64, 48));
    }
}
