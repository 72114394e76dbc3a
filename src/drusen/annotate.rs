//! Outline drawing for classified drusen.
use super::DrusenCandidate;
use image::{Rgb, RgbImage};
use imageproc::drawing::draw_line_segment_mut;

/// Draw every candidate contour as a closed polyline in its size colour.
///
/// Thickness is produced by repeating the polyline on a `thickness ×
/// thickness` grid of one-pixel shifts toward the bottom-right.
pub fn annotate_candidates(canvas: &mut RgbImage, candidates: &[DrusenCandidate], thickness: u32) {
    let t = thickness.max(1) as i32;
    for cand in candidates {
        let color = Rgb(cand.size.color());
        let pts = &cand.contour;
        if pts.is_empty() {
            continue;
        }
        for i in 0..pts.len() {
            let a = pts[i];
            let b = pts[(i + 1) % pts.len()];
            for dy in 0..t {
                for dx in 0..t {
                    draw_line_segment_mut(
                        canvas,
                        ((a.x + dx) as f32, (a.y + dy) as f32),
                        ((b.x + dx) as f32, (b.y + dy) as f32),
                        color,
                    );
                }
            }
        }
    }
}
