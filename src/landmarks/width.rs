//! Local vessel width at a landmark, measured on the thresholded mask.
use super::VesselWidth;
use crate::geometry::PixelPoint;
use image::GrayImage;

/// Axis pairs in probe order: angle, forward step, backward step (`dx, dy`,
/// image rows grow downward so 90° points up).
const AXIS_PAIRS: [(u16, (i32, i32), (i32, i32)); 4] = [
    (0, (1, 0), (-1, 0)),
    (45, (1, -1), (-1, 1)),
    (90, (0, -1), (0, 1)),
    (135, (-1, -1), (1, 1)),
];

fn foreground(mask: &GrayImage, p: PixelPoint) -> bool {
    p.in_bounds(mask.width(), mask.height()) && mask.get_pixel(p.x as u32, p.y as u32).0[0] != 0
}

fn probe(at: PixelPoint, step: (i32, i32), dist: u32) -> PixelPoint {
    PixelPoint::new(at.x + step.0 * dist as i32, at.y + step.1 * dist as i32)
}

/// Walk outward along all eight directions at once, one pixel per round.
///
/// Every counter starts at 1 and grows while its probe stays on foreground.
/// After each round the pairs are checked in order 0°, 45°, 90°, 135°; the
/// first pair with both probes on background and at least one counter past 1
/// gives `(angle, forward, backward − 1)`. Pixels outside the mask are
/// background. Returns `None` when no pair closes within `max_width` rounds.
pub fn estimate_width(mask: &GrayImage, at: PixelPoint, max_width: u32) -> Option<VesselWidth> {
    let mut fwd = [1u32; 4];
    let mut bwd = [1u32; 4];
    for _ in 0..max_width {
        for (i, &(_, f, b)) in AXIS_PAIRS.iter().enumerate() {
            if foreground(mask, probe(at, f, fwd[i])) {
                fwd[i] += 1;
            }
            if foreground(mask, probe(at, b, bwd[i])) {
                bwd[i] += 1;
            }
        }
        for (i, &(angle, f, b)) in AXIS_PAIRS.iter().enumerate() {
            let closed = !foreground(mask, probe(at, f, fwd[i]))
                && !foreground(mask, probe(at, b, bwd[i]));
            if closed && (fwd[i] > 1 || bwd[i] > 1) {
                return Some(VesselWidth {
                    angle_deg: angle,
                    forward: fwd[i],
                    backward: bwd[i] - 1,
                });
            }
        }
    }
    None
}
