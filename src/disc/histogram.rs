//! Per-channel intensity histograms for template matching.
//!
//! [`TemplateHistogramSet`] averages the 256-bin histograms of a set of
//! reference optic-disc crops. [`window_histograms`] computes the same shape
//! over a square neighbourhood of the search image; the locator itself uses a
//! sliding update (see `super::scan`) that is equivalent to calling it at
//! every pixel.
use crate::error::{AnalysisError, Result};
use crate::image::io::load_rgb_image;
use crate::image::Channel;
use image::RgbImage;
use log::debug;
use std::fs;
use std::path::{Path, PathBuf};

pub const BINS: usize = 256;

const TEMPLATE_EXTENSIONS: [&str; 6] = ["png", "jpg", "jpeg", "tif", "tiff", "bmp"];

/// Three 256-bin histograms indexed by [`Channel`].
#[derive(Clone, Debug, PartialEq)]
pub struct ChannelHistograms {
    bins: [[f64; BINS]; 3],
}

impl Default for ChannelHistograms {
    fn default() -> Self {
        Self {
            bins: [[0.0; BINS]; 3],
        }
    }
}

impl ChannelHistograms {
    pub fn channel(&self, channel: Channel) -> &[f64; BINS] {
        &self.bins[channel.index()]
    }

    pub fn of_image(img: &RgbImage) -> Self {
        let mut out = Self::default();
        for px in img.pixels() {
            for c in 0..3 {
                out.bins[c][px.0[c] as usize] += 1.0;
            }
        }
        out
    }

    /// Squared Euclidean distance between two histograms of one channel.
    pub fn squared_distance(&self, other: &ChannelHistograms, channel: Channel) -> f64 {
        self.channel(channel)
            .iter()
            .zip(other.channel(channel))
            .map(|(a, b)| (a - b) * (a - b))
            .sum()
    }
}

/// Averaged histograms of the reference optic-disc crops. Immutable once
/// built; share it across invocations.
#[derive(Clone, Debug, PartialEq)]
pub struct TemplateHistogramSet {
    hist: ChannelHistograms,
    template_count: usize,
}

impl TemplateHistogramSet {
    pub fn from_images(templates: &[RgbImage]) -> Result<Self> {
        if templates.is_empty() {
            return Err(AnalysisError::InputError(
                "at least one optic disc template is required".to_string(),
            ));
        }
        let mut hist = ChannelHistograms::default();
        for t in templates {
            if t.width() == 0 || t.height() == 0 {
                return Err(AnalysisError::InputError(
                    "optic disc template has no pixels".to_string(),
                ));
            }
            let h = ChannelHistograms::of_image(t);
            for c in 0..3 {
                for b in 0..BINS {
                    hist.bins[c][b] += h.bins[c][b];
                }
            }
        }
        let n = templates.len() as f64;
        for channel in hist.bins.iter_mut() {
            for v in channel.iter_mut() {
                *v /= n;
            }
        }
        Ok(Self {
            hist,
            template_count: templates.len(),
        })
    }

    pub fn load_files(paths: &[PathBuf]) -> Result<Self> {
        let images = paths
            .iter()
            .map(|p| load_rgb_image(p))
            .collect::<Result<Vec<_>>>()?;
        Self::from_images(&images)
    }

    /// Load every image file in `dir` (sorted by file name).
    pub fn load_dir(dir: &Path) -> Result<Self> {
        let mut paths: Vec<PathBuf> = fs::read_dir(dir)
            .map_err(|e| {
                AnalysisError::InputError(format!("failed to list {}: {e}", dir.display()))
            })?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| {
                p.extension()
                    .and_then(|e| e.to_str())
                    .map(|e| TEMPLATE_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
                    .unwrap_or(false)
            })
            .collect();
        paths.sort();
        debug!(
            "TemplateHistogramSet::load_dir {} -> {} templates",
            dir.display(),
            paths.len()
        );
        Self::load_files(&paths)
    }

    pub fn histograms(&self) -> &ChannelHistograms {
        &self.hist
    }

    pub fn template_count(&self) -> usize {
        self.template_count
    }
}

/// Histograms over rows `cy - size/2 .. cy - size/2 + size` and the same
/// column span, clipped to the image.
pub fn window_histograms(img: &RgbImage, cx: u32, cy: u32, size: u32) -> ChannelHistograms {
    let half = (size / 2) as i64;
    let x0 = (cx as i64 - half).max(0) as u32;
    let y0 = (cy as i64 - half).max(0) as u32;
    let x1 = ((cx as i64 - half + size as i64).max(0) as u32).min(img.width());
    let y1 = ((cy as i64 - half + size as i64).max(0) as u32).min(img.height());
    let mut out = ChannelHistograms::default();
    for y in y0..y1 {
        for x in x0..x1 {
            let px = img.get_pixel(x, y).0;
            for c in 0..3 {
                out.bins[c][px[c] as usize] += 1.0;
            }
        }
    }
    out
}
