//! Junction candidates on a one-pixel-wide skeleton.
use super::{Landmark, LandmarkKind};
use crate::geometry::PixelPoint;
use image::GrayImage;

/// Scan interior pixels in row-major order and flag skeleton pixels whose
/// `kernel × kernel` neighbourhood (pixel included) holds 4 (bifurcation
/// candidate) or at least 5 (crossing candidate) foreground pixels.
///
/// Flagged pixels are cleared in a working copy so a later overlapping
/// window does not count them again; `skeleton` itself is untouched.
pub fn detect_candidates(skeleton: &GrayImage, kernel: usize) -> Vec<Landmark> {
    let (w, h) = (skeleton.width() as usize, skeleton.height() as usize);
    let n = kernel / 2;
    if w <= 2 * n || h <= 2 * n {
        return Vec::new();
    }
    let mut work: Vec<bool> = skeleton.as_raw().iter().map(|&v| v != 0).collect();

    let mut out = Vec::new();
    for y in n..h - n {
        for x in n..w - n {
            if !work[y * w + x] {
                continue;
            }
            let mut count = 0u32;
            for yy in y - n..=y + n {
                count += work[yy * w + x - n..=yy * w + x + n]
                    .iter()
                    .filter(|&&v| v)
                    .count() as u32;
            }
            let kind = match count {
                4 => LandmarkKind::BifurcationCandidate,
                c if c >= 5 => LandmarkKind::CrossingCandidate,
                _ => continue,
            };
            work[y * w + x] = false;
            out.push(Landmark {
                position: PixelPoint::new(x as i32, y as i32),
                neighbors: count,
                kind,
            });
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    fn draw(w: u32, h: u32, pts: &[(u32, u32)]) -> GrayImage {
        let mut img = GrayImage::new(w, h);
        for &(x, y) in pts {
            img.put_pixel(x, y, Luma([255]));
        }
        img
    }

    #[test]
    fn straight_line_has_no_candidates() {
        let pts: Vec<(u32, u32)> = (2..18).map(|x| (x, 10)).collect();
        assert!(detect_candidates(&draw(20, 20, &pts), 3).is_empty());
    }

    #[test]
    fn t_junction_flags_pixels_beside_the_stem() {
        let mut pts: Vec<(u32, u32)> = (2..18).map(|x| (x, 5)).collect();
        pts.extend((6..15).map(|y| (10, y)));
        let found = detect_candidates(&draw(20, 20, &pts), 3);
        let positions: Vec<PixelPoint> = found.iter().map(|l| l.position).collect();
        // (9,5) is flagged first and cleared, which drops (10,5) to 3.
        assert_eq!(positions, vec![PixelPoint::new(9, 5), PixelPoint::new(11, 5)]);
        assert!(found
            .iter()
            .all(|l| l.kind == LandmarkKind::BifurcationCandidate && l.neighbors == 4));
    }

    #[test]
    fn plus_junction_yields_a_crossing_candidate() {
        let mut pts: Vec<(u32, u32)> = (2..18).map(|x| (x, 10)).collect();
        pts.extend((2..18).filter(|&y| y != 10).map(|y| (10, y)));
        let found = detect_candidates(&draw(20, 20, &pts), 3);
        assert_eq!(found[0].position, PixelPoint::new(10, 9));
        assert_eq!(found[0].kind, LandmarkKind::CrossingCandidate);
        assert_eq!(found[0].neighbors, 5);
    }

    #[test]
    fn border_pixels_are_never_flagged() {
        let img = GrayImage::from_pixel(3, 3, Luma([255]));
        let found = detect_candidates(&img, 3);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].position, PixelPoint::new(1, 1));
        assert!(detect_candidates(&GrayImage::new(2, 2), 3).is_empty());
    }
}
