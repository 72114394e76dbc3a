use image::{GrayImage, Luma, Rgb, RgbImage};

pub const FUNDUS: Rgb<u8> = Rgb([180, 100, 40]);
pub const DISC: Rgb<u8> = Rgb([250, 230, 180]);
pub const DRUSE: Rgb<u8> = Rgb([200, 170, 60]);
pub const VESSEL: Rgb<u8> = Rgb([120, 60, 30]);

/// Filled disc of `(cx, cy, radius)` painted with `color`.
pub fn paint_disc(img: &mut RgbImage, cx: i32, cy: i32, radius: i32, color: Rgb<u8>) {
    for y in (cy - radius).max(0)..=(cy + radius).min(img.height() as i32 - 1) {
        for x in (cx - radius).max(0)..=(cx + radius).min(img.width() as i32 - 1) {
            let (dx, dy) = (x - cx, y - cy);
            if dx * dx + dy * dy <= radius * radius {
                img.put_pixel(x as u32, y as u32, color);
            }
        }
    }
}

/// Black frame with a circular uniform fundus, a bright optic disc and
/// drusen blobs given as `(x, y, radius)`.
pub fn synthetic_fundus(
    width: u32,
    height: u32,
    fundus: (i32, i32, i32),
    disc: (i32, i32, i32),
    drusen: &[(i32, i32, i32)],
) -> RgbImage {
    let mut img = RgbImage::new(width, height);
    paint_disc(&mut img, fundus.0, fundus.1, fundus.2, FUNDUS);
    paint_disc(&mut img, disc.0, disc.1, disc.2, DISC);
    for &(x, y, r) in drusen {
        paint_disc(&mut img, x, y, r, DRUSE);
    }
    img
}

/// Square crop of fundus background with the disc centred in it.
pub fn disc_template(size: u32, radius: i32) -> RgbImage {
    let mut img = RgbImage::from_pixel(size, size, FUNDUS);
    let c = size as i32 / 2;
    paint_disc(&mut img, c, c, radius, DISC);
    img
}

/// Macula-like ROI: uniform background, drusen blobs and an optional
/// horizontal vessel three rows thick starting at `vessel_row`.
pub fn drusen_roi(
    width: u32,
    height: u32,
    drusen: &[(i32, i32, i32)],
    vessel_row: Option<u32>,
) -> RgbImage {
    let mut img = RgbImage::from_pixel(width, height, FUNDUS);
    if let Some(row) = vessel_row {
        for y in row..(row + 3).min(height) {
            for x in 0..width {
                img.put_pixel(x, y, VESSEL);
            }
        }
    }
    for &(x, y, r) in drusen {
        paint_disc(&mut img, x, y, r, DRUSE);
    }
    img
}

fn set(img: &mut GrayImage, x: u32, y: u32) {
    img.put_pixel(x, y, Luma([255]));
}

/// Thresholded vessel mask and skeleton of a T junction: a horizontal vessel
/// along row 20 (x 5..=35) with a branch leaving downward along column 20.
/// Vessels are three pixels thick in the mask.
pub fn t_junction() -> (GrayImage, GrayImage) {
    let mut mask = GrayImage::new(41, 41);
    let mut skeleton = GrayImage::new(41, 41);
    for x in 5..=35 {
        for y in 19..=21 {
            set(&mut mask, x, y);
        }
        set(&mut skeleton, x, 20);
    }
    for y in 20..=35 {
        for x in 19..=21 {
            set(&mut mask, x, y);
        }
        set(&mut skeleton, 20, y);
    }
    (mask, skeleton)
}

/// Same layout as [`t_junction`] with the vertical vessel running through
/// the horizontal one (rows 5..=35).
pub fn plus_junction() -> (GrayImage, GrayImage) {
    let (mut mask, mut skeleton) = t_junction();
    for y in 5..20 {
        for x in 19..=21 {
            set(&mut mask, x, y);
        }
        set(&mut skeleton, 20, y);
    }
    (mask, skeleton)
}

/// Gray vessel image of two thick vessels crossing at the centre, for the
/// full threshold-and-skeletonize path.
pub fn thick_plus_vessels(size: u32, half_width: i32) -> GrayImage {
    let c = size as i32 / 2;
    GrayImage::from_fn(size, size, |x, y| {
        let (dx, dy) = (x as i32 - c, y as i32 - c);
        let on = dx.abs() <= half_width || dy.abs() <= half_width;
        Luma([if on { 200 } else { 20 }])
    })
}

/// Gray vessel image of a thick horizontal vessel with a second one leaving
/// its centre downwards to the bottom edge.
pub fn thick_t_vessels(size: u32, half_width: i32) -> GrayImage {
    let c = size as i32 / 2;
    GrayImage::from_fn(size, size, |x, y| {
        let (dx, dy) = (x as i32 - c, y as i32 - c);
        let on = dy.abs() <= half_width || (dx.abs() <= half_width && dy >= 0);
        Luma([if on { 200 } else { 20 }])
    })
}
