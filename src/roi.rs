//! Macula region of interest derived from the optic disc position.
//!
//! The macula sits at a fixed fraction of the image width away from the
//! disc, on the side opposite to it. The crop is a fixed fraction of the
//! image size centred on that estimate and translated back inside the image
//! when it would cross an edge, so the output size never changes.
use crate::error::{AnalysisError, Result};
use crate::geometry::{PixelPoint, PixelRect};
use image::imageops;
use image::RgbImage;
use log::debug;
use serde::{Deserialize, Serialize};

/// Disc-to-macula distance as a fraction of the image width.
pub const MACULA_OFFSET_RATIO: f64 = 0.35;
/// ROI width as a fraction of the image width.
pub const ROI_WIDTH_RATIO: f64 = 0.387;
/// ROI height as a fraction of the image height.
pub const ROI_HEIGHT_RATIO: f64 = 0.51;

#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct RoiParams {
    pub macula_offset_ratio: f64,
    pub width_ratio: f64,
    pub height_ratio: f64,
}

impl Default for RoiParams {
    fn default() -> Self {
        Self {
            macula_offset_ratio: MACULA_OFFSET_RATIO,
            width_ratio: ROI_WIDTH_RATIO,
            height_ratio: ROI_HEIGHT_RATIO,
        }
    }
}

/// Which half of the image holds the optic disc.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum DiscSide {
    Left,
    Right,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoiRect {
    pub rect: PixelRect,
    /// Estimated macula centre (may lie outside the image).
    pub macula: PixelPoint,
    pub disc_side: DiscSide,
    /// True when the rectangle had to be translated to fit the image.
    pub clamped: bool,
}

/// Compute the ROI rectangle for an image of `width × height`.
pub fn roi_rect(width: u32, height: u32, disc: PixelPoint, params: &RoiParams) -> Result<RoiRect> {
    if width == 0 || height == 0 {
        return Err(AnalysisError::GeometryError(
            "cannot place a ROI in an empty image".to_string(),
        ));
    }
    if !disc.in_bounds(width, height) {
        return Err(AnalysisError::GeometryError(format!(
            "disc point ({}, {}) lies outside the {width}x{height} image",
            disc.x, disc.y
        )));
    }

    let distance = (width as f64 * params.macula_offset_ratio) as i64;
    let middle = (width / 2) as i64;
    let (disc_side, mx) = if disc.x as i64 > middle {
        (DiscSide::Right, disc.x as i64 - distance)
    } else {
        (DiscSide::Left, disc.x as i64 + distance)
    };
    let my = disc.y as i64;

    let roi_w = ((width as f64 * params.width_ratio).round() as i64).clamp(1, width as i64);
    let roi_h = ((height as f64 * params.height_ratio).round() as i64).clamp(1, height as i64);
    let want_x = mx - roi_w / 2;
    let want_y = my - roi_h / 2;
    let x0 = want_x.clamp(0, width as i64 - roi_w);
    let y0 = want_y.clamp(0, height as i64 - roi_h);

    Ok(RoiRect {
        rect: PixelRect {
            x: x0 as u32,
            y: y0 as u32,
            width: roi_w as u32,
            height: roi_h as u32,
        },
        macula: PixelPoint::new(mx as i32, my as i32),
        disc_side,
        clamped: x0 != want_x || y0 != want_y,
    })
}

/// Crop the macula ROI with default ratios.
pub fn extract_roi(img: &RgbImage, disc: PixelPoint) -> Result<(RgbImage, RoiRect)> {
    extract_roi_with(img, disc, &RoiParams::default())
}

pub fn extract_roi_with(
    img: &RgbImage,
    disc: PixelPoint,
    params: &RoiParams,
) -> Result<(RgbImage, RoiRect)> {
    let roi = roi_rect(img.width(), img.height(), disc, params)?;
    let r = roi.rect;
    debug!(
        "extract_roi disc=({},{}) side={:?} macula=({},{}) rect={}x{}+{}+{} clamped={}",
        disc.x,
        disc.y,
        roi.disc_side,
        roi.macula.x,
        roi.macula.y,
        r.width,
        r.height,
        r.x,
        r.y,
        roi.clamped
    );
    let crop = imageops::crop_imm(img, r.x, r.y, r.width, r.height).to_image();
    Ok((crop, roi))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn dimensions_follow_ratios_for_any_size() {
        for (w, h) in [(700u32, 529u32), (2124, 2056), (101, 57), (13, 9), (1, 1)] {
            let img = RgbImage::new(w, h);
            let disc = PixelPoint::new((w / 5) as i32, (h / 2) as i32);
            let (crop, roi) = extract_roi(&img, disc).unwrap();
            let ew = ((w as f64 * ROI_WIDTH_RATIO).round() as u32).max(1);
            let eh = ((h as f64 * ROI_HEIGHT_RATIO).round() as u32).max(1);
            assert_eq!(crop.dimensions(), (ew, eh), "image {w}x{h}");
            assert_eq!((roi.rect.width, roi.rect.height), (ew, eh));
        }
    }

    #[test]
    fn macula_is_placed_opposite_the_disc() {
        let left = roi_rect(1000, 800, PixelPoint::new(200, 400), &RoiParams::default()).unwrap();
        assert_eq!(left.disc_side, DiscSide::Left);
        assert_eq!(left.macula, PixelPoint::new(550, 400));
        assert!(!left.clamped);
        assert_eq!(left.rect.x, 550 - 387 / 2);

        let right = roi_rect(1000, 800, PixelPoint::new(800, 400), &RoiParams::default()).unwrap();
        assert_eq!(right.disc_side, DiscSide::Right);
        assert_eq!(right.macula, PixelPoint::new(450, 400));
    }

    #[test]
    fn rectangle_near_edges_is_translated_inside() {
        let roi = roi_rect(1000, 800, PixelPoint::new(990, 10), &RoiParams::default()).unwrap();
        assert!(roi.clamped);
        assert_eq!(roi.rect.y, 0);
        assert!(roi.rect.x + roi.rect.width <= 1000);

        let roi = roi_rect(1000, 800, PixelPoint::new(499, 795), &RoiParams::default()).unwrap();
        assert!(roi.clamped);
        assert_eq!(roi.rect.y + roi.rect.height, 800);
        assert!(roi.rect.x + roi.rect.width <= 1000);
    }

    #[test]
    fn crop_copies_source_pixels() {
        let img = RgbImage::from_fn(100, 60, |x, y| Rgb([x as u8, y as u8, 0]));
        let (crop, roi) = extract_roi(&img, PixelPoint::new(10, 30)).unwrap();
        let p = crop.get_pixel(0, 0);
        assert_eq!(p.0[0] as u32, roi.rect.x);
        assert_eq!(p.0[1] as u32, roi.rect.y);
    }

    #[test]
    fn disc_outside_image_is_a_geometry_error() {
        let img = RgbImage::new(50, 50);
        assert!(matches!(
            extract_roi(&img, PixelPoint::new(-1, 10)),
            Err(AnalysisError::GeometryError(_))
        ));
        assert!(matches!(
            extract_roi(&img, PixelPoint::new(10, 50)),
            Err(AnalysisError::GeometryError(_))
        ));
    }
}
