//! Global and local binarisation. All outputs are 0/255 planes.
use crate::image::gray_mean;
use image::{GrayImage, Luma};
use imageproc::contrast::otsu_level;

/// Binarise at `value > level`.
pub fn binarize_above(img: &GrayImage, level: u8) -> GrayImage {
    GrayImage::from_fn(img.width(), img.height(), |x, y| {
        Luma([if img.get_pixel(x, y).0[0] > level { 255 } else { 0 }])
    })
}

/// Otsu binarisation; returns the chosen level together with the mask.
pub fn otsu_threshold(img: &GrayImage) -> (u8, GrayImage) {
    if img.width() == 0 || img.height() == 0 {
        return (0, img.clone());
    }
    let level = otsu_level(img);
    (level, binarize_above(img, level))
}

/// Foreground where the pixel is strictly brighter than the plane mean.
pub fn mean_threshold(img: &GrayImage) -> GrayImage {
    let mean = gray_mean(img);
    GrayImage::from_fn(img.width(), img.height(), |x, y| {
        Luma([if img.get_pixel(x, y).0[0] as f64 > mean { 255 } else { 0 }])
    })
}

/// Local mean thresholding: foreground where `src > round(mean) − c`.
///
/// The mean runs over a `block × block` window with replicated borders; an
/// even or too small `block` is bumped to the next odd size of at least 3.
/// `c` is rounded up, as the usual integer implementation does.
pub fn adaptive_mean_threshold(img: &GrayImage, block: usize, c: f64) -> GrayImage {
    let block = (block | 1).max(3);
    let (w, h) = (img.width() as usize, img.height() as usize);
    if w == 0 || h == 0 {
        return img.clone();
    }
    let raw = img.as_raw();
    let half = (block / 2) as isize;
    let clamp = |i: isize, n: usize| i.clamp(0, n as isize - 1) as usize;

    let mut horiz = vec![0u32; w * h];
    for y in 0..h {
        let row = &raw[y * w..(y + 1) * w];
        for x in 0..w {
            horiz[y * w + x] = (-half..=half)
                .map(|d| row[clamp(x as isize + d, w)] as u32)
                .sum();
        }
    }

    let area = (block * block) as f64;
    let delta = c.ceil() as i32;
    let mut out = GrayImage::new(w as u32, h as u32);
    for y in 0..h {
        for x in 0..w {
            let sum: u32 = (-half..=half)
                .map(|d| horiz[clamp(y as isize + d, h) * w + x])
                .sum();
            let mean = (sum as f64 / area).round() as i32;
            let src = raw[y * w + x] as i32;
            if src - mean > -delta {
                out.put_pixel(x as u32, y as u32, Luma([255]));
            }
        }
    }
    out
}
