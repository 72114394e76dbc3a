//! Parameters for the optic disc search.
//!
//! Defaults are calibrated for fundus photographs resized to a 700-pixel
//! working width: the disc never appears in the top 200 or bottom 230 rows.
use serde::Deserialize;
use std::ops::Range;

/// Aperture of the median blur applied before scoring.
pub const DISC_MEDIAN_KSIZE: u32 = 5;
/// Side length of the square histogram window.
pub const DISC_WINDOW_SIZE: u32 = 80;
pub const DISC_TOP_MARGIN: u32 = 200;
pub const DISC_BOTTOM_MARGIN: u32 = 230;
/// Fraction of the peak score kept in the disc mask.
pub const DISC_THRESHOLD_RATIO: f64 = 0.7;

/// Per-channel weights of the correlation score. Green carries the most
/// weight because the disc is brightest there.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct CorrelationWeights {
    pub red: f64,
    pub green: f64,
    pub blue: f64,
}

impl Default for CorrelationWeights {
    fn default() -> Self {
        Self {
            red: 0.5,
            green: 2.0,
            blue: 1.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct DiscLocatorParams {
    pub median_ksize: u32,
    pub window_size: u32,
    pub top_margin: u32,
    pub bottom_margin: u32,
    pub threshold_ratio: f64,
    pub weights: CorrelationWeights,
}

impl Default for DiscLocatorParams {
    fn default() -> Self {
        Self {
            median_ksize: DISC_MEDIAN_KSIZE,
            window_size: DISC_WINDOW_SIZE,
            top_margin: DISC_TOP_MARGIN,
            bottom_margin: DISC_BOTTOM_MARGIN,
            threshold_ratio: DISC_THRESHOLD_RATIO,
            weights: CorrelationWeights::default(),
        }
    }
}

impl DiscLocatorParams {
    /// Rows scanned for the disc in an image of `height` rows.
    pub fn search_band(&self, height: u32) -> Range<u32> {
        let end = height.saturating_sub(self.bottom_margin);
        let start = self.top_margin.min(end);
        start..end
    }
}
