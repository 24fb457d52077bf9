//! Row projection and 1D peak extraction.
use crate::image::{ImageF32, ImageView};

/// Count ink pixels (`0.0` in a binary image) per row.
pub fn horizontal_projection(binary: &ImageF32) -> Vec<u32> {
    binary
        .rows()
        .map(|row| row.iter().filter(|&&v| v <= 0.0).count() as u32)
        .collect()
}

/// Rows whose count exceeds `min_count` and is a strict local maximum:
/// `projection[y - 1] < projection[y] > projection[y + 1]`. The first and
/// last rows have only one neighbour and are never peaks.
///
/// With `plateaus` set, a run of equal counts strictly above the rows on both
/// sides is also reported once, at the centre of the run. Lines thicker than
/// one row (e.g. after enlarging a page) only show up in this mode.
pub fn find_peaks(projection: &[u32], min_count: f32, plateaus: bool) -> Vec<f32> {
    let n = projection.len();
    let mut peaks = Vec::new();
    if n < 3 {
        return peaks;
    }
    let mut y = 1;
    while y < n - 1 {
        let value = projection[y];
        let mut end = y;
        if plateaus {
            while end + 1 < n && projection[end + 1] == value {
                end += 1;
            }
        }
        let rises = projection[y - 1] < value;
        let falls = end + 1 < n && projection[end + 1] < value;
        if rises && falls && value as f32 > min_count {
            peaks.push((y + end) as f32 * 0.5);
        }
        y = end + 1;
    }
    peaks
}

/// Merge sorted peaks closer than `merge_dist` to the previous member of the
/// current group, replacing each group with its mean position.
pub fn merge_peaks(peaks: &[f32], merge_dist: f32) -> Vec<f32> {
    let mut merged = Vec::new();
    let mut group: Vec<f32> = Vec::new();
    for &p in peaks {
        match group.last() {
            Some(&last) if p - last <= merge_dist => group.push(p),
            Some(_) => {
                merged.push(mean(&group));
                group.clear();
                group.push(p);
            }
            None => group.push(p),
        }
    }
    if !group.is_empty() {
        merged.push(mean(&group));
    }
    merged
}

fn mean(values: &[f32]) -> f32 {
    values.iter().sum::<f32>() / values.len() as f32
}
