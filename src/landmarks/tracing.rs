//! Branch tracing around a landmark on the skeleton.
//!
//! Points are sampled on a circle around the landmark in two sweeps. A
//! sample whose 5×5 neighbourhood already holds a branch point is skipped.
//! A foreground sample becomes a branch point directly; a background sample
//! falls back to the 8-connected components of its 3×3 block, each
//! contributing its middle pixel in row-major order.
use super::VesselWidth;
use crate::geometry::PixelPoint;
use image::{GrayImage, Luma};
use imageproc::region_labelling::{connected_components, Connectivity};
use std::collections::HashSet;

/// Per-landmark view of the skeleton: pixels cleared around accepted branch
/// points and the branch points themselves. The skeleton is never mutated.
struct TraceState<'a> {
    skeleton: &'a GrayImage,
    cleared: HashSet<PixelPoint>,
    branches: HashSet<PixelPoint>,
    points: Vec<PixelPoint>,
}

impl<'a> TraceState<'a> {
    fn new(skeleton: &'a GrayImage) -> Self {
        Self {
            skeleton,
            cleared: HashSet::new(),
            branches: HashSet::new(),
            points: Vec::new(),
        }
    }

    fn foreground(&self, p: PixelPoint) -> bool {
        p.in_bounds(self.skeleton.width(), self.skeleton.height())
            && self.skeleton.get_pixel(p.x as u32, p.y as u32).0[0] != 0
            && !self.cleared.contains(&p)
    }

    fn branches_near(&self, p: PixelPoint) -> usize {
        let mut n = 0;
        for dy in -2..=2 {
            for dx in -2..=2 {
                if self.branches.contains(&PixelPoint::new(p.x + dx, p.y + dy)) {
                    n += 1;
                }
            }
        }
        n
    }

    fn accept(&mut self, p: PixelPoint) {
        self.branches.insert(p);
        self.points.push(p);
    }

    fn visit(&mut self, p: PixelPoint) {
        if !p.in_bounds(self.skeleton.width(), self.skeleton.height()) {
            return;
        }
        if self.branches_near(p) != 0 {
            return;
        }
        if self.foreground(p) {
            self.accept(p);
            for dy in -1..=1 {
                for dx in -1..=1 {
                    if dx != 0 || dy != 0 {
                        self.cleared.insert(PixelPoint::new(p.x + dx, p.y + dy));
                    }
                }
            }
        } else {
            for q in self.block_representatives(p) {
                self.accept(q);
            }
        }
    }

    fn block_representatives(&self, p: PixelPoint) -> Vec<PixelPoint> {
        let block = GrayImage::from_fn(3, 3, |bx, by| {
            let q = PixelPoint::new(p.x + bx as i32 - 1, p.y + by as i32 - 1);
            Luma([if self.foreground(q) { 255 } else { 0 }])
        });
        let labels = connected_components(&block, Connectivity::Eight, Luma([0u8]));
        let count = labels.pixels().map(|l| l.0[0]).max().unwrap_or(0);
        (1..=count)
            .filter_map(|label| {
                let members: Vec<(u32, u32)> = labels
                    .enumerate_pixels()
                    .filter(|(_, _, l)| l.0[0] == label)
                    .map(|(x, y, _)| (x, y))
                    .collect();
                members
                    .get(members.len() / 2)
                    .map(|&(bx, by)| PixelPoint::new(p.x + bx as i32 - 1, p.y + by as i32 - 1))
            })
            .collect()
    }
}

/// Search radius for a landmark: `⌈forward + backward · factor⌉`.
pub fn trace_radius(width: &VesselWidth, backward_factor: f64) -> i32 {
    (width.forward as f64 + width.backward as f64 * backward_factor).ceil() as i32
}

/// Trace the branch points of the vessels meeting at `at`.
///
/// Sweep 0 fixes the row offset `rad ∈ [−r, r]` and samples `x ∓ d`; sweep 1
/// fixes the column offset and samples `y ∓ d`, with `d = round(√(r² − rad²))`.
pub fn trace_branches(skeleton: &GrayImage, at: PixelPoint, radius: i32) -> Vec<PixelPoint> {
    let mut state = TraceState::new(skeleton);
    for sweep in 0..2 {
        for rad in -radius..=radius {
            let d = ((radius * radius - rad * rad) as f64).sqrt().round() as i32;
            let samples = if sweep == 0 {
                [
                    PixelPoint::new(at.x - d, at.y + rad),
                    PixelPoint::new(at.x + d, at.y + rad),
                ]
            } else {
                [
                    PixelPoint::new(at.x + rad, at.y - d),
                    PixelPoint::new(at.x + rad, at.y + d),
                ]
            };
            for p in samples {
                state.visit(p);
            }
        }
    }
    state.points
}
