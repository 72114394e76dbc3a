//! Merge nearby landmarks into classified boxes.
use super::{ClassifiedBox, JunctionKind};
use crate::geometry::PixelPoint;
use std::collections::HashMap;

/// Repeatedly seed a `±radius` box at the first remaining landmark, classify
/// it by the majority of junction tags inside, and drop every landmark the
/// box covers. Anything short of a bifurcation majority, including a box
/// with no tagged landmark at all, is a crossing.
///
/// Returns `(bifurcations, crossings)`.
pub fn group_landmarks(
    landmarks: &[PixelPoint],
    tags: &HashMap<PixelPoint, JunctionKind>,
    radius: i32,
) -> (Vec<ClassifiedBox>, Vec<ClassifiedBox>) {
    let mut remaining = landmarks.to_vec();
    let mut bifurcations = Vec::new();
    let mut crossings = Vec::new();

    while let Some(&seed) = remaining.first() {
        let inside =
            |p: &PixelPoint| (p.x - seed.x).abs() <= radius && (p.y - seed.y).abs() <= radius;
        let (mut bif, mut cross) = (0usize, 0usize);
        for (p, kind) in tags {
            if inside(p) {
                match kind {
                    JunctionKind::Bifurcation => bif += 1,
                    JunctionKind::Crossing => cross += 1,
                }
            }
        }
        remaining.retain(|p| !inside(p));

        let kind = if bif > cross {
            JunctionKind::Bifurcation
        } else {
            JunctionKind::Crossing
        };
        let bx = ClassifiedBox {
            x0: seed.x - radius,
            y0: seed.y - radius,
            x1: seed.x + radius,
            y1: seed.y + radius,
            kind,
        };
        match kind {
            JunctionKind::Bifurcation => bifurcations.push(bx),
            JunctionKind::Crossing => crossings.push(bx),
        }
    }
    (bifurcations, crossings)
}
