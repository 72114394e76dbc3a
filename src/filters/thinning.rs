//! Zhang–Suen thinning of binary masks to one-pixel-wide centre lines.
//!
//! Non-zero input pixels are foreground. Two alternating sub-iterations peel
//! boundary pixels whose removal keeps 8-connectivity until nothing changes.
//! Pixels on the outermost image border are treated as having background
//! neighbours outside the image.
use image::{GrayImage, Luma};

pub fn skeletonize(mask: &GrayImage) -> GrayImage {
    let (w, h) = (mask.width() as usize, mask.height() as usize);
    let mut cur: Vec<u8> = mask.as_raw().iter().map(|&v| (v != 0) as u8).collect();
    if w == 0 || h == 0 {
        return mask.clone();
    }

    let at = |buf: &[u8], x: isize, y: isize| -> u8 {
        if x < 0 || y < 0 || x >= w as isize || y >= h as isize {
            0
        } else {
            buf[y as usize * w + x as usize]
        }
    };

    let mut to_clear = Vec::new();
    loop {
        let mut changed = false;
        for step in 0..2 {
            to_clear.clear();
            for y in 0..h as isize {
                for x in 0..w as isize {
                    if at(&cur, x, y) == 0 {
                        continue;
                    }
                    // P2..P9 clockwise starting north
                    let p = [
                        at(&cur, x, y - 1),
                        at(&cur, x + 1, y - 1),
                        at(&cur, x + 1, y),
                        at(&cur, x + 1, y + 1),
                        at(&cur, x, y + 1),
                        at(&cur, x - 1, y + 1),
                        at(&cur, x - 1, y),
                        at(&cur, x - 1, y - 1),
                    ];
                    let b: u8 = p.iter().sum();
                    if !(2..=6).contains(&b) {
                        continue;
                    }
                    let a = (0..8).filter(|&i| p[i] == 0 && p[(i + 1) % 8] == 1).count();
                    if a != 1 {
                        continue;
                    }
                    let (p2, p4, p6, p8) = (p[0], p[2], p[4], p[6]);
                    let keep = if step == 0 {
                        p2 * p4 * p6 != 0 || p4 * p6 * p8 != 0
                    } else {
                        p2 * p4 * p8 != 0 || p2 * p6 * p8 != 0
                    };
                    if !keep {
                        to_clear.push(y as usize * w + x as usize);
                    }
                }
            }
            for &idx in &to_clear {
                cur[idx] = 0;
            }
            changed |= !to_clear.is_empty();
        }
        if !changed {
            break;
        }
    }

    GrayImage::from_fn(w as u32, h as u32, |x, y| {
        Luma([if cur[y as usize * w + x as usize] != 0 { 255 } else { 0 }])
    })
}
