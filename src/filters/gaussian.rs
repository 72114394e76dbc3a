//! Separable Gaussian blur parameterised by kernel size.
//!
//! Kernel taps follow the usual "sigma from aperture" rule
//! `sigma = 0.3·((k − 1)/2 − 1) + 0.8` with the fixed small-aperture tables
//! for `k ≤ 7`, so calibration constants expressed as kernel sizes keep their
//! meaning. Borders reflect without repeating the edge sample
//! (`… c b | a b c …`).
use crate::image::ImageF32;
use image::{GrayImage, Luma};

const SMALL_KERNELS: [&[f32]; 4] = [
    &[1.0],
    &[0.25, 0.5, 0.25],
    &[0.0625, 0.25, 0.375, 0.25, 0.0625],
    &[
        0.03125, 0.109375, 0.21875, 0.28125, 0.21875, 0.109375, 0.03125,
    ],
];

/// Normalised 1D taps for an odd aperture `ksize` (even sizes round up).
pub fn gaussian_kernel(ksize: usize) -> Vec<f32> {
    let ksize = ksize | 1;
    if ksize <= 7 {
        return SMALL_KERNELS[ksize / 2].to_vec();
    }
    let sigma = 0.3 * ((ksize as f64 - 1.0) * 0.5 - 1.0) + 0.8;
    let scale = -0.5 / (sigma * sigma);
    let half = (ksize / 2) as f64;
    let raw: Vec<f64> = (0..ksize)
        .map(|i| {
            let x = i as f64 - half;
            (scale * x * x).exp()
        })
        .collect();
    let sum: f64 = raw.iter().sum();
    raw.iter().map(|v| (v / sum) as f32).collect()
}

#[inline]
pub(crate) fn reflect101(i: isize, n: usize) -> usize {
    if n == 1 {
        return 0;
    }
    let n = n as isize;
    let period = 2 * (n - 1);
    let mut i = i.rem_euclid(period);
    if i >= n {
        i = period - i;
    }
    i as usize
}

/// Blur a float plane with a `ksize × ksize` Gaussian.
pub fn gaussian_blur_f32(img: &ImageF32, ksize: usize) -> ImageF32 {
    let taps = gaussian_kernel(ksize);
    if taps.len() == 1 || img.w == 0 || img.h == 0 {
        return img.clone();
    }
    let half = (taps.len() / 2) as isize;
    let (w, h) = (img.w, img.h);

    let mut tmp = ImageF32::new(w, h);
    for y in 0..h {
        let src = img.row(y);
        let dst = tmp.row_mut(y);
        for (x, out) in dst.iter_mut().enumerate() {
            let mut acc = 0.0;
            for (k, &t) in taps.iter().enumerate() {
                let xx = reflect101(x as isize + k as isize - half, w);
                acc += src[xx] * t;
            }
            *out = acc;
        }
    }

    let mut out = ImageF32::new(w, h);
    for y in 0..h {
        let rows: Vec<&[f32]> = (0..taps.len())
            .map(|k| tmp.row(reflect101(y as isize + k as isize - half, h)))
            .collect();
        let dst = out.row_mut(y);
        for (x, v) in dst.iter_mut().enumerate() {
            *v = rows.iter().zip(&taps).map(|(r, &t)| r[x] * t).sum();
        }
    }
    out
}

/// Blur an 8-bit plane; results are rounded to the nearest integer.
pub fn gaussian_blur_u8(img: &GrayImage, ksize: usize) -> GrayImage {
    if ksize <= 1 {
        return img.clone();
    }
    let blurred = gaussian_blur_f32(&ImageF32::from_gray(img), ksize);
    GrayImage::from_fn(img.width(), img.height(), |x, y| {
        let v = blurred.get(x as usize, y as usize);
        Luma([(v + 0.5).clamp(0.0, 255.0) as u8])
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kernels_are_normalised_and_symmetric() {
        for k in [1usize, 3, 5, 7, 15, 21] {
            let taps = gaussian_kernel(k);
            assert_eq!(taps.len(), k);
            let sum: f32 = taps.iter().sum();
            assert!((sum - 1.0).abs() < 1e-5, "k={k} sum={sum}");
            for i in 0..k / 2 {
                assert!((taps[i] - taps[k - 1 - i]).abs() < 1e-6);
            }
        }
    }

    #[test]
    fn reflect101_mirrors_without_edge_repeat() {
        assert_eq!(reflect101(-1, 5), 1);
        assert_eq!(reflect101(-2, 5), 2);
        assert_eq!(reflect101(5, 5), 3);
        assert_eq!(reflect101(6, 5), 2);
        assert_eq!(reflect101(3, 1), 0);
    }

    #[test]
    fn flat_plane_is_preserved() {
        let img = GrayImage::from_pixel(20, 12, Luma([77]));
        let out = gaussian_blur_u8(&img, 15);
        assert!(out.pixels().all(|p| p.0[0] == 77));
    }

    #[test]
    fn impulse_spreads_but_keeps_peak_at_centre() {
        let mut img = ImageF32::new(21, 21);
        img.set(10, 10, 100.0);
        let out = gaussian_blur_f32(&img, 5);
        assert!(out.get(10, 10) > out.get(11, 10));
        assert!(out.get(11, 10) > out.get(12, 10));
        let total: f32 = out.data.iter().sum();
        assert!((total - 100.0).abs() < 1e-3);
    }
}
