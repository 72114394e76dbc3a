//! Owned single-channel f32 plane in row-major layout (stride == width).
//!
//! Used for the ratio and blur stages where 8-bit storage would clip
//! intermediate values. Conversion back to 8 bits keeps the low byte of the
//! truncated value.
use image::{GrayImage, Luma};

#[derive(Clone, Debug)]
pub struct ImageF32 {
    /// Image width in pixels
    pub w: usize,
    /// Image height in pixels
    pub h: usize,
    /// Number of f32 elements between consecutive rows (equals `w`)
    pub stride: usize,
    /// Backing storage in row-major order
    pub data: Vec<f32>,
}

impl ImageF32 {
    /// Construct a zero-initialized buffer of size `w × h`.
    pub fn new(w: usize, h: usize) -> Self {
        Self {
            w,
            h,
            stride: w,
            data: vec![0.0; w * h],
        }
    }

    /// Promote an 8-bit plane without rescaling (values stay in `0..=255`).
    pub fn from_gray(gray: &GrayImage) -> Self {
        let (w, h) = (gray.width() as usize, gray.height() as usize);
        Self {
            w,
            h,
            stride: w,
            data: gray.as_raw().iter().map(|&v| v as f32).collect(),
        }
    }

    #[inline]
    pub fn idx(&self, x: usize, y: usize) -> usize {
        y * self.stride + x
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> f32 {
        self.data[self.idx(x, y)]
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, v: f32) {
        let i = self.idx(x, y);
        self.data[i] = v;
    }

    #[inline]
    pub fn row(&self, y: usize) -> &[f32] {
        let start = y * self.stride;
        &self.data[start..start + self.w]
    }

    #[inline]
    pub fn row_mut(&mut self, y: usize) -> &mut [f32] {
        let start = y * self.stride;
        &mut self.data[start..start + self.w]
    }

    /// Element-wise `num / den * scale`; a zero denominator yields 0.
    pub fn ratio(num: &ImageF32, den: &ImageF32, scale: f32) -> ImageF32 {
        debug_assert_eq!((num.w, num.h), (den.w, den.h));
        let data = num
            .data
            .iter()
            .zip(&den.data)
            .map(|(&n, &d)| if d == 0.0 { 0.0 } else { n / d * scale })
            .collect();
        ImageF32 {
            w: num.w,
            h: num.h,
            stride: num.w,
            data,
        }
    }

    /// Truncate toward zero and keep the low byte, so `277.9` becomes `21`.
    /// Non-finite values map to 0.
    pub fn to_gray_wrapping(&self) -> GrayImage {
        let mut out = GrayImage::new(self.w as u32, self.h as u32);
        for y in 0..self.h {
            for (x, &v) in self.row(y).iter().enumerate() {
                let v = if v.is_finite() { v as i64 as u8 } else { 0 };
                out.put_pixel(x as u32, y as u32, Luma([v]));
            }
        }
        out
    }
}
