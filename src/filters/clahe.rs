//! Contrast-limited adaptive histogram equalisation (CLAHE).
//!
//! The image is split into `tiles_x × tiles_y` tiles (padding by reflection
//! when the size is not divisible). Each tile histogram is clipped at
//! `clip_limit · tile_area / 256`, the excess redistributed uniformly, and
//! the resulting lookup tables are bilinearly interpolated between tile
//! centres.
use super::gaussian::reflect101;
use image::{GrayImage, Luma};

const BINS: usize = 256;

#[derive(Clone, Copy, Debug)]
pub struct ClaheParams {
    pub clip_limit: f64,
    pub tiles_x: usize,
    pub tiles_y: usize,
}

impl Default for ClaheParams {
    fn default() -> Self {
        Self {
            clip_limit: 2.0,
            tiles_x: 2,
            tiles_y: 2,
        }
    }
}

pub fn clahe(img: &GrayImage, params: ClaheParams) -> GrayImage {
    let (w, h) = (img.width() as usize, img.height() as usize);
    let tiles_x = params.tiles_x.max(1);
    let tiles_y = params.tiles_y.max(1);
    if w == 0 || h == 0 {
        return img.clone();
    }

    let tile_w = w.div_ceil(tiles_x);
    let tile_h = h.div_ceil(tiles_y);
    let tile_area = tile_w * tile_h;
    let clip = if params.clip_limit > 0.0 {
        ((params.clip_limit * tile_area as f64 / BINS as f64) as usize).max(1)
    } else {
        usize::MAX
    };
    let lut_scale = (BINS - 1) as f64 / tile_area as f64;
    let raw = img.as_raw();

    let mut luts = vec![[0u8; BINS]; tiles_x * tiles_y];
    for ty in 0..tiles_y {
        for tx in 0..tiles_x {
            let mut hist = [0usize; BINS];
            for yy in 0..tile_h {
                let y = reflect101((ty * tile_h + yy) as isize, h);
                for xx in 0..tile_w {
                    let x = reflect101((tx * tile_w + xx) as isize, w);
                    hist[raw[y * w + x] as usize] += 1;
                }
            }
            clip_histogram(&mut hist, clip);

            let lut = &mut luts[ty * tiles_x + tx];
            let mut sum = 0usize;
            for (bin, count) in hist.iter().enumerate() {
                sum += count;
                lut[bin] = (sum as f64 * lut_scale).round().clamp(0.0, 255.0) as u8;
            }
        }
    }

    let inv_tw = 1.0 / tile_w as f64;
    let inv_th = 1.0 / tile_h as f64;
    GrayImage::from_fn(w as u32, h as u32, |x, y| {
        let v = raw[y as usize * w + x as usize] as usize;

        let txf = x as f64 * inv_tw - 0.5;
        let tx1 = txf.floor() as isize;
        let xa = txf - tx1 as f64;
        let tx2 = (tx1 + 1).min(tiles_x as isize - 1) as usize;
        let tx1 = tx1.max(0) as usize;

        let tyf = y as f64 * inv_th - 0.5;
        let ty1 = tyf.floor() as isize;
        let ya = tyf - ty1 as f64;
        let ty2 = (ty1 + 1).min(tiles_y as isize - 1) as usize;
        let ty1 = ty1.max(0) as usize;

        let lut = |tx: usize, ty: usize| luts[ty * tiles_x + tx][v] as f64;
        let top = lut(tx1, ty1) * (1.0 - xa) + lut(tx2, ty1) * xa;
        let bottom = lut(tx1, ty2) * (1.0 - xa) + lut(tx2, ty2) * xa;
        let res = top * (1.0 - ya) + bottom * ya;
        Luma([res.round().clamp(0.0, 255.0) as u8])
    })
}

fn clip_histogram(hist: &mut [usize; BINS], clip: usize) {
    let mut excess = 0usize;
    for count in hist.iter_mut() {
        if *count > clip {
            excess += *count - clip;
            *count = clip;
        }
    }
    if excess == 0 {
        return;
    }
    let batch = excess / BINS;
    let mut residual = excess - batch * BINS;
    for count in hist.iter_mut() {
        *count += batch;
    }
    if residual > 0 {
        let step = (BINS / residual).max(1);
        let mut bin = 0;
        while bin < BINS && residual > 0 {
            hist[bin] += 1;
            residual -= 1;
            bin += step;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clipping_preserves_total_mass() {
        let mut hist = [0usize; BINS];
        hist[10] = 1000;
        hist[20] = 24;
        clip_histogram(&mut hist, 8);
        assert_eq!(hist.iter().sum::<usize>(), 1024);
        assert!(hist[10] < 1000);
    }

    #[test]
    fn output_keeps_dimensions_and_order() {
        let img = GrayImage::from_fn(33, 17, |x, _| Luma([(x * 4) as u8]));
        let out = clahe(&img, ClaheParams::default());
        assert_eq!(out.dimensions(), (33, 17));
        assert!(out.get_pixel(32, 8).0[0] > out.get_pixel(0, 8).0[0]);
    }
}
