//! Sliding-window histogram correlation over the search band.
//!
//! For each row the window histogram is updated column by column (one column
//! enters, one leaves), and the squared distance to the template is
//! maintained incrementally per channel. Each row is independent, so rows are
//! scored in parallel; every row writes only its own output slice.
use super::histogram::{ChannelHistograms, BINS};
use super::params::{CorrelationWeights, DiscLocatorParams};
use crate::image::Channel;
use image::RgbImage;
use rayon::prelude::*;

/// Correlation score `Σ weight_c / (1 + distance_c)`.
#[inline]
pub fn correlation(distances: &[f64; 3], weights: &CorrelationWeights) -> f64 {
    weights.red / (1.0 + distances[Channel::Red.index()])
        + weights.green / (1.0 + distances[Channel::Green.index()])
        + weights.blue / (1.0 + distances[Channel::Blue.index()])
}

struct SlidingWindow<'a> {
    template: [&'a [f64; BINS]; 3],
    counts: [[u32; BINS]; 3],
    distances: [f64; 3],
}

impl<'a> SlidingWindow<'a> {
    fn new(template: &'a ChannelHistograms) -> Self {
        let template = [
            template.channel(Channel::Red),
            template.channel(Channel::Green),
            template.channel(Channel::Blue),
        ];
        let mut distances = [0.0; 3];
        for (d, t) in distances.iter_mut().zip(template.iter()) {
            *d = t.iter().map(|v| v * v).sum();
        }
        Self {
            template,
            counts: [[0; BINS]; 3],
            distances,
        }
    }

    #[inline]
    fn bump(&mut self, c: usize, bin: usize, add: bool) {
        let t = self.template[c][bin];
        let old = t - self.counts[c][bin] as f64;
        if add {
            self.counts[c][bin] += 1;
        } else {
            self.counts[c][bin] -= 1;
        }
        let new = t - self.counts[c][bin] as f64;
        self.distances[c] += new * new - old * old;
    }

    fn column(&mut self, img: &RgbImage, x: u32, rows: std::ops::Range<u32>, add: bool) {
        for y in rows {
            let px = img.get_pixel(x, y).0;
            for (c, &v) in px.iter().enumerate() {
                self.bump(c, v as usize, add);
            }
        }
    }
}

/// Score one image row; ineligible pixels score 0.
fn score_row(
    img: &RgbImage,
    template: &ChannelHistograms,
    y: u32,
    params: &DiscLocatorParams,
) -> Vec<f64> {
    let (w, h) = (img.width() as i64, img.height() as i64);
    let mut out = vec![0.0; w as usize];
    let eligible = |x: u32| img.get_pixel(x, y).0[Channel::Blue.index()] != 0;
    if !(0..w as u32).any(eligible) {
        return out;
    }

    let size = params.window_size as i64;
    let half = size / 2;
    let y0 = (y as i64 - half).max(0);
    let y1 = (y as i64 - half + size).clamp(0, h);
    let rows = y0 as u32..y1 as u32;

    let mut window = SlidingWindow::new(template);
    for x in 0..(size - half).min(w) {
        window.column(img, x as u32, rows.clone(), true);
    }
    for x in 0..w {
        if x > 0 {
            let entering = x - half + size - 1;
            if entering < w {
                window.column(img, entering as u32, rows.clone(), true);
            }
            let leaving = x - half - 1;
            if leaving >= 0 {
                window.column(img, leaving as u32, rows.clone(), false);
            }
        }
        if eligible(x as u32) {
            out[x as usize] = correlation(&window.distances, &params.weights);
        }
    }
    out
}

/// Row-major score map; rows outside the search band stay 0.
pub fn score_map(img: &RgbImage, template: &ChannelHistograms, params: &DiscLocatorParams) -> Vec<f64> {
    let (w, h) = (img.width() as usize, img.height() as usize);
    let mut scores = vec![0.0; w * h];
    let band = params.search_band(img.height());
    if band.is_empty() || w == 0 {
        return scores;
    }
    let start = band.start as usize;
    scores[start * w..band.end as usize * w]
        .par_chunks_mut(w)
        .enumerate()
        .for_each(|(i, row)| {
            let y = (start + i) as u32;
            row.copy_from_slice(&score_row(img, template, y, params));
        });
    scores
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::disc::histogram::window_histograms;
    use image::Rgb;

    fn textured(w: u32, h: u32) -> RgbImage {
        RgbImage::from_fn(w, h, |x, y| {
            let v = ((x * 7 + y * 13) % 23) as u8;
            let blue = if x < 3 { 0 } else { 10 + v };
            Rgb([40 + v * 3, 60 + (v % 5) * 20, blue])
        })
    }

    #[test]
    fn sliding_scores_match_direct_window_evaluation() {
        let img = textured(37, 29);
        let template = ChannelHistograms::of_image(&RgbImage::from_fn(6, 6, |x, y| {
            Rgb([40 + (x * 9) as u8, 60 + (y * 20) as u8, 15])
        }));
        let params = DiscLocatorParams {
            window_size: 10,
            top_margin: 4,
            bottom_margin: 5,
            ..Default::default()
        };
        let scores = score_map(&img, &template, &params);
        for y in 0..29u32 {
            for x in 0..37u32 {
                let got = scores[(y * 37 + x) as usize];
                let in_band = (4..24).contains(&y);
                if !in_band || img.get_pixel(x, y).0[2] == 0 {
                    assert_eq!(got, 0.0, "({x},{y}) should not be scored");
                    continue;
                }
                let win = window_histograms(&img, x, y, 10);
                let d = [
                    template.squared_distance(&win, Channel::Red),
                    template.squared_distance(&win, Channel::Green),
                    template.squared_distance(&win, Channel::Blue),
                ];
                let want = correlation(&d, &params.weights);
                assert!((got - want).abs() < 1e-12, "({x},{y}) got={got} want={want}");
            }
        }
    }

    #[test]
    fn identical_histograms_score_full_weight_sum() {
        let w = CorrelationWeights::default();
        assert!((correlation(&[0.0; 3], &w) - 3.5).abs() < 1e-12);
    }
}
