//! Median blur expressed by odd aperture, delegating to `imageproc`.
use image::{ImageBuffer, Pixel};
use imageproc::filter::median_filter;

/// Median over a `ksize × ksize` window (border samples replicate).
pub fn median_blur<P>(img: &ImageBuffer<P, Vec<u8>>, ksize: u32) -> ImageBuffer<P, Vec<u8>>
where
    P: Pixel<Subpixel = u8>,
{
    debug_assert!(ksize % 2 == 1, "median aperture must be odd");
    let radius = ksize / 2;
    if radius == 0 || img.width() == 0 || img.height() == 0 {
        return img.clone();
    }
    median_filter(img, radius, radius)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma};

    #[test]
    fn isolated_speck_is_removed() {
        let mut img = GrayImage::from_pixel(9, 9, Luma([10]));
        img.put_pixel(4, 4, Luma([250]));
        let out = median_blur(&img, 5);
        assert_eq!(out.get_pixel(4, 4).0, [10]);
    }
}
