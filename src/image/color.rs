//! Channel access and the colour preprocessing steps applied before disc
//! detection.
//!
//! Buffers are RGB ordered (`image::RgbImage`). Where the classic pipeline
//! talks about the "first" channel of a BGR buffer, this module names the
//! channel explicitly (`Channel::Blue`).
use image::imageops::{self, FilterType};
use image::{GrayImage, Luma, RgbImage};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Channel {
    Red,
    Green,
    Blue,
}

impl Channel {
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Channel::Red => 0,
            Channel::Green => 1,
            Channel::Blue => 2,
        }
    }
}

/// Copy one channel into its own 8-bit plane.
pub fn extract_channel(img: &RgbImage, channel: Channel) -> GrayImage {
    let c = channel.index();
    GrayImage::from_fn(img.width(), img.height(), |x, y| {
        Luma([img.get_pixel(x, y).0[c]])
    })
}

/// Arithmetic mean of one channel; 0 for an empty image.
pub fn channel_mean(img: &RgbImage, channel: Channel) -> f64 {
    let n = img.width() as u64 * img.height() as u64;
    if n == 0 {
        return 0.0;
    }
    let c = channel.index();
    let sum: u64 = img.pixels().map(|p| p.0[c] as u64).sum();
    sum as f64 / n as f64
}

/// Mean intensity of an 8-bit plane; 0 for an empty plane.
pub fn gray_mean(img: &GrayImage) -> f64 {
    let raw = img.as_raw();
    if raw.is_empty() {
        return 0.0;
    }
    raw.iter().map(|&v| v as u64).sum::<u64>() as f64 / raw.len() as f64
}

/// Black out every pixel whose red value does not exceed the mean red value.
///
/// Fundus background and dim periphery drop to zero, which later excludes
/// them from the optic disc search.
pub fn suppress_dark_pixels(img: &RgbImage) -> RgbImage {
    let average = channel_mean(img, Channel::Red);
    let mut out = img.clone();
    for px in out.pixels_mut() {
        if px.0[0] as f64 <= average {
            px.0 = [0, 0, 0];
        }
    }
    out
}

/// Resize to `width` columns keeping the aspect ratio (height truncated).
pub fn resize_to_width(img: &RgbImage, width: u32) -> RgbImage {
    if img.width() == 0 || img.width() == width {
        return img.clone();
    }
    let ratio = width as f64 / img.width() as f64;
    let height = ((img.height() as f64 * ratio) as u32).max(1);
    imageops::resize(img, width, height, FilterType::Triangle)
}
