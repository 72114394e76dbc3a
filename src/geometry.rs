//! Pixel geometry shared across stages.
//!
//! Coordinates are `(x, y)` with `x` the column and `y` the row, origin at
//! the top-left corner. Contour helpers operate on closed polygons given as
//! ordered boundary points.
use imageproc::geometry::convex_hull;
use imageproc::point::Point;
use nalgebra::Vector2;
use serde::Serialize;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
pub struct PixelPoint {
    pub x: i32,
    pub y: i32,
}

impl PixelPoint {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn in_bounds(&self, width: u32, height: u32) -> bool {
        self.x >= 0 && self.y >= 0 && (self.x as u32) < width && (self.y as u32) < height
    }
}

/// Axis-aligned rectangle in pixels (`x`, `y` is the top-left corner).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl PixelRect {
    pub fn contains(&self, p: PixelPoint) -> bool {
        p.x >= self.x as i32
            && p.y >= self.y as i32
            && p.x < (self.x + self.width) as i32
            && p.y < (self.y + self.height) as i32
    }
}

/// Spatial moments of a closed polygon (Green's theorem form).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ContourMoments {
    pub m00: f64,
    pub m10: f64,
    pub m01: f64,
}

impl ContourMoments {
    pub fn of_polygon(points: &[Point<i32>]) -> Self {
        let n = points.len();
        if n < 3 {
            return Self::default();
        }
        let (mut a00, mut a10, mut a01) = (0.0, 0.0, 0.0);
        for i in 0..n {
            let p = points[i];
            let q = points[(i + 1) % n];
            let (xi, yi) = (p.x as f64, p.y as f64);
            let (xj, yj) = (q.x as f64, q.y as f64);
            let cross = xi * yj - xj * yi;
            a00 += cross;
            a10 += cross * (xi + xj);
            a01 += cross * (yi + yj);
        }
        // orientation independent
        let sign = if a00 < 0.0 { -1.0 } else { 1.0 };
        Self {
            m00: sign * a00 / 2.0,
            m10: sign * a10 / 6.0,
            m01: sign * a01 / 6.0,
        }
    }

    /// Centroid truncated to integer pixels; degenerate moments yield 0.
    pub fn centroid(&self) -> PixelPoint {
        let cx = if self.m00 == 0.0 || self.m10 == 0.0 {
            0
        } else {
            (self.m10 / self.m00) as i32
        };
        let cy = if self.m00 == 0.0 || self.m01 == 0.0 {
            0
        } else {
            (self.m01 / self.m00) as i32
        };
        PixelPoint::new(cx, cy)
    }
}

/// Minimum-area (rotated) bounding rectangle of a point set.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RotatedRect {
    pub center: [f64; 2],
    /// Side lengths in pixels, `[along edge direction, across]`.
    pub size: [f64; 2],
    /// Direction of the first side in degrees.
    pub angle_deg: f64,
}

impl RotatedRect {
    pub fn longest_side(&self) -> f64 {
        self.size[0].max(self.size[1])
    }
}

/// Rotating-calipers minimum-area rectangle over the convex hull.
///
/// Side lengths stay fractional; drusen size buckets sit between whole
/// pixel counts, so integer corner points are not precise enough.
pub fn min_area_rect(points: &[Point<i32>]) -> RotatedRect {
    match points.len() {
        0 => {
            return RotatedRect {
                center: [0.0, 0.0],
                size: [0.0, 0.0],
                angle_deg: 0.0,
            }
        }
        1 => {
            return RotatedRect {
                center: [points[0].x as f64, points[0].y as f64],
                size: [0.0, 0.0],
                angle_deg: 0.0,
            }
        }
        _ => {}
    }

    let hull: Vec<Vector2<f64>> = convex_hull(points)
        .into_iter()
        .map(|p| Vector2::new(p.x as f64, p.y as f64))
        .collect();
    if hull.len() == 1 {
        return RotatedRect {
            center: [hull[0].x, hull[0].y],
            size: [0.0, 0.0],
            angle_deg: 0.0,
        };
    }

    let mut best: Option<(f64, RotatedRect)> = None;
    for i in 0..hull.len() {
        let edge = hull[(i + 1) % hull.len()] - hull[i];
        let len = edge.norm();
        if len == 0.0 {
            continue;
        }
        let u = edge / len;
        let v = Vector2::new(-u.y, u.x);
        let (mut umin, mut umax, mut vmin, mut vmax) = (f64::MAX, f64::MIN, f64::MAX, f64::MIN);
        for p in &hull {
            let a = p.dot(&u);
            let b = p.dot(&v);
            umin = umin.min(a);
            umax = umax.max(a);
            vmin = vmin.min(b);
            vmax = vmax.max(b);
        }
        let (w, h) = (umax - umin, vmax - vmin);
        let area = w * h;
        let better = match &best {
            None => true,
            Some((a, _)) => area < *a - 1e-9,
        };
        if better {
            let c = u * ((umin + umax) * 0.5) + v * ((vmin + vmax) * 0.5);
            best = Some((
                area,
                RotatedRect {
                    center: [c.x, c.y],
                    size: [w, h],
                    angle_deg: u.y.atan2(u.x).to_degrees(),
                },
            ));
        }
    }

    best.map(|(_, r)| r).unwrap_or(RotatedRect {
        center: [hull[0].x, hull[0].y],
        size: [0.0, 0.0],
        angle_deg: 0.0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(x0: i32, y0: i32, side: i32) -> Vec<Point<i32>> {
        vec![
            Point::new(x0, y0),
            Point::new(x0 + side, y0),
            Point::new(x0 + side, y0 + side),
            Point::new(x0, y0 + side),
        ]
    }

    #[test]
    fn moments_of_square() {
        let m = ContourMoments::of_polygon(&square(2, 4, 10));
        assert!((m.m00 - 100.0).abs() < 1e-9);
        assert_eq!(m.centroid(), PixelPoint::new(7, 9));
    }

    #[test]
    fn degenerate_contour_centroid_falls_back_to_origin() {
        let m = ContourMoments::of_polygon(&[Point::new(5, 5), Point::new(6, 5)]);
        assert_eq!(m.centroid(), PixelPoint::new(0, 0));
    }

    #[test]
    fn axis_aligned_rectangle_sides() {
        let pts = vec![
            Point::new(0, 0),
            Point::new(8, 0),
            Point::new(8, 3),
            Point::new(0, 3),
            Point::new(4, 1),
        ];
        let r = min_area_rect(&pts);
        let mut sides = r.size;
        sides.sort_by(|a, b| a.partial_cmp(b).unwrap());
        assert!((sides[0] - 3.0).abs() < 1e-9);
        assert!((sides[1] - 8.0).abs() < 1e-9);
        assert!((r.longest_side() - 8.0).abs() < 1e-9);
    }

    #[test]
    fn diagonal_segment_uses_true_length() {
        let pts: Vec<Point<i32>> = (0..=6).map(|i| Point::new(i, i)).collect();
        let r = min_area_rect(&pts);
        assert!((r.longest_side() - 6.0 * 2f64.sqrt()).abs() < 1e-9);
        assert!(r.size[0].min(r.size[1]).abs() < 1e-9);
    }

    #[test]
    fn rotated_sliver_keeps_fractional_side_length() {
        use crate::drusen::{classify_diameter, pixels_to_microns, DrusenSize};

        // corners sit at half pixels: (-0.5, 0.5) and (12.5, 13.5)
        let pts = vec![Point::new(0, 0), Point::new(13, 13), Point::new(6, 7)];
        let r = min_area_rect(&pts);
        let long = r.longest_side();
        assert!((long - 13.0 * 2f64.sqrt()).abs() < 1e-9);
        assert!((r.size[0].min(r.size[1]) - 0.5f64.sqrt()).abs() < 1e-9);
        assert_eq!(classify_diameter(pixels_to_microns(long)), DrusenSize::Normal);

        // rounding the corners to (-1, 1) and (13, 14) stretches the long
        // side past the 63 um bound
        let rounded = (14f64 * 14.0 + 13.0 * 13.0).sqrt();
        assert_eq!(classify_diameter(pixels_to_microns(rounded)), DrusenSize::Medium);
    }

    #[test]
    fn single_point_has_zero_extent() {
        let r = min_area_rect(&[Point::new(3, 3)]);
        assert_eq!(r.size, [0.0, 0.0]);
    }

    #[test]
    fn rect_contains_is_half_open() {
        let r = PixelRect {
            x: 2,
            y: 2,
            width: 3,
            height: 3,
        };
        assert!(r.contains(PixelPoint::new(2, 2)));
        assert!(r.contains(PixelPoint::new(4, 4)));
        assert!(!r.contains(PixelPoint::new(5, 4)));
    }
}
