//! Size buckets for drusen and the per-invocation tally.
use super::params::{MICRONS_PER_PIXEL, MEDIUM_MAX_MICRONS, NORMAL_MAX_MICRONS};
use serde::Serialize;
use std::fmt;

/// Size classification of a single druse.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum DrusenSize {
    /// Diameter `≤ 63 µm`.
    Normal,
    /// Diameter in `(63, 125] µm`.
    Medium,
    /// Diameter `> 125 µm`.
    Large,
}

impl DrusenSize {
    /// Outline colour used in annotated output (RGB).
    pub fn color(self) -> [u8; 3] {
        match self {
            DrusenSize::Normal => [0, 255, 0],
            DrusenSize::Medium => [0, 0, 255],
            DrusenSize::Large => [255, 0, 0],
        }
    }
}

impl fmt::Display for DrusenSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DrusenSize::Normal => "Normal",
            DrusenSize::Medium => "Medium",
            DrusenSize::Large => "Large",
        };
        f.write_str(s)
    }
}

/// Bucket a diameter given in microns.
pub fn classify_diameter(microns: f64) -> DrusenSize {
    if microns <= NORMAL_MAX_MICRONS {
        DrusenSize::Normal
    } else if microns <= MEDIUM_MAX_MICRONS {
        DrusenSize::Medium
    } else {
        DrusenSize::Large
    }
}

/// Convert a pixel length to microns with the fixed fundus calibration.
#[inline]
pub fn pixels_to_microns(px: f64) -> f64 {
    px * MICRONS_PER_PIXEL
}

/// Counts per size bucket. Built fresh for every detection run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ClassificationTally {
    pub normal: usize,
    pub medium: usize,
    pub large: usize,
}

impl ClassificationTally {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, size: DrusenSize) {
        match size {
            DrusenSize::Normal => self.normal += 1,
            DrusenSize::Medium => self.medium += 1,
            DrusenSize::Large => self.large += 1,
        }
    }

    pub fn count(&self, size: DrusenSize) -> usize {
        match size {
            DrusenSize::Normal => self.normal,
            DrusenSize::Medium => self.medium,
            DrusenSize::Large => self.large,
        }
    }

    pub fn total(&self) -> usize {
        self.normal + self.medium + self.large
    }

    /// One-line human readable summary with the colour legend.
    pub fn summary(&self) -> String {
        format!(
            "Total Normal Drusen (<= 63 micron) : {},Total Medium Drusen (>  63 micron and <= 125 micron) : {},Total Large Drusen  (>  125 micron) : {},Normal= Green Color Medium Blue Color Large = Red Color",
            self.normal, self.medium, self.large
        )
    }
}
