//! Thresholded non-maximum suppression over a response surface.
//!
//! Scan order is row-major (ascending y, then x). A location survives when
//! its response exceeds `min_response` and no other location inside the
//! square window of half-width `half_window` is larger, or equal and earlier
//! in scan order. Plateaus therefore keep exactly their first sample.
use crate::image::{ImageF32, ImageView};

/// A surviving local maximum in response-surface coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Peak {
    pub x: usize,
    pub y: usize,
    pub response: f32,
}

pub fn local_maxima(response: &ImageF32, min_response: f32, half_window: usize) -> Vec<Peak> {
    let mut peaks = Vec::new();
    for y in 0..response.h {
        let row = response.row(y);
        for (x, &val) in row.iter().enumerate() {
            if val <= min_response {
                continue;
            }
            if is_window_max(response, x, y, val, half_window) {
                peaks.push(Peak {
                    x,
                    y,
                    response: val,
                });
            }
        }
    }
    peaks
}

fn is_window_max(response: &ImageF32, x: usize, y: usize, val: f32, half: usize) -> bool {
    let y0 = y.saturating_sub(half);
    let y1 = (y + half).min(response.h - 1);
    let x0 = x.saturating_sub(half);
    let x1 = (x + half).min(response.w - 1);
    for ny in y0..=y1 {
        let row = response.row(ny);
        for (nx, &other) in row.iter().enumerate().take(x1 + 1).skip(x0) {
            if nx == x && ny == y {
                continue;
            }
            let earlier = ny < y || (ny == y && nx < x);
            if other > val || (other == val && earlier) {
                return false;
            }
        }
    }
    true
}
