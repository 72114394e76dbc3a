//! Binary/grayscale morphology with explicit structuring elements.
//!
//! Elements are stored as `(dx, dy)` offsets relative to the anchor, which
//! sits at `(w/2, h/2)`. Erosion takes the minimum over `src(x + dx, y + dy)`
//! and dilation the maximum over the reflected element `src(x − dx, y − dy)`,
//! so opening never grows a mask even for asymmetric elements. Samples
//! outside the image are ignored.
use image::{GrayImage, Luma};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StructuringElement {
    offsets: Vec<(isize, isize)>,
}

impl StructuringElement {
    /// Full `w × h` rectangle.
    pub fn rect(w: usize, h: usize) -> Self {
        let (ax, ay) = ((w / 2) as isize, (h / 2) as isize);
        let offsets = (0..h as isize)
            .flat_map(|i| (0..w as isize).map(move |j| (j - ax, i - ay)))
            .collect();
        Self { offsets }
    }

    /// Discretised ellipse inscribed in a `w × h` box.
    ///
    /// Row `i` spans `c ± round(c·sqrt((r² − (i − r)²)/r²))` with
    /// `r = h/2`, `c = w/2`, matching the common elliptical kernel layout
    /// (a 2×2 ellipse is an L of three pixels, a 1×1 ellipse a single pixel).
    pub fn ellipse(w: usize, h: usize) -> Self {
        let r = (h / 2) as isize;
        let c = (w / 2) as isize;
        let inv_r2 = if r > 0 { 1.0 / (r * r) as f64 } else { 0.0 };
        let mut offsets = Vec::new();
        for i in 0..h as isize {
            let dy = i - r;
            if dy.abs() > r {
                continue;
            }
            let dx = (c as f64 * (((r * r - dy * dy) as f64) * inv_r2).sqrt()).round() as isize;
            let j1 = (c - dx).max(0);
            let j2 = (c + dx + 1).min(w as isize);
            for j in j1..j2 {
                offsets.push((j - c, i - r));
            }
        }
        Self { offsets }
    }

    pub fn offsets(&self) -> &[(isize, isize)] {
        &self.offsets
    }

    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }
}

fn rank_filter(img: &GrayImage, se: &StructuringElement, take_max: bool) -> GrayImage {
    let (w, h) = (img.width() as isize, img.height() as isize);
    let sign = if take_max { -1 } else { 1 };
    GrayImage::from_fn(img.width(), img.height(), |x, y| {
        let mut acc: Option<u8> = None;
        for &(dx, dy) in se.offsets() {
            let (xx, yy) = (x as isize + sign * dx, y as isize + sign * dy);
            if xx < 0 || yy < 0 || xx >= w || yy >= h {
                continue;
            }
            let v = img.get_pixel(xx as u32, yy as u32).0[0];
            acc = Some(match acc {
                None => v,
                Some(a) if take_max => a.max(v),
                Some(a) => a.min(v),
            });
        }
        Luma([acc.unwrap_or_else(|| img.get_pixel(x, y).0[0])])
    })
}

pub fn erode(img: &GrayImage, se: &StructuringElement) -> GrayImage {
    rank_filter(img, se, false)
}

pub fn dilate(img: &GrayImage, se: &StructuringElement) -> GrayImage {
    rank_filter(img, se, true)
}

/// Erosion followed by dilation.
pub fn open(img: &GrayImage, se: &StructuringElement) -> GrayImage {
    dilate(&erode(img, se), se)
}

/// Morphological gradient `dilate − erode` (object boundary for masks).
pub fn gradient(img: &GrayImage, se: &StructuringElement) -> GrayImage {
    let d = dilate(img, se);
    let e = erode(img, se);
    GrayImage::from_fn(img.width(), img.height(), |x, y| {
        Luma([d.get_pixel(x, y).0[0].saturating_sub(e.get_pixel(x, y).0[0])])
    })
}
