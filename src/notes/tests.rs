use super::nms::local_maxima;
use super::*;
use crate::image::{ImageView, ImageViewMut};
use crate::types::StaffBounds;

const SPACING: f32 = 15.0;
const LINES: [f32; 5] = [40.0, 55.0, 70.0, 85.0, 100.0];

fn staff() -> DetectedStaff {
    DetectedStaff {
        lines: LINES,
        spacing: SPACING,
        bounds: StaffBounds {
            x: 10.0,
            y: LINES[0],
            width: 280.0,
            height: LINES[4] - LINES[0],
        },
    }
}

/// Binary page (paper = 1, ink = 0) with the staff lines drawn.
fn staff_page() -> ImageF32 {
    let mut img = ImageF32::filled(300, 160, 1.0);
    for &y in &LINES {
        for x in 10..290 {
            img.set(x, y as usize, 0.0);
        }
    }
    img
}

fn fill_disk(img: &mut ImageF32, cx: f32, cy: f32, r: f32) {
    for y in 0..img.h {
        for x in 0..img.w {
            let dx = x as f32 - cx;
            let dy = y as f32 - cy;
            if dx * dx + dy * dy <= r * r {
                img.set(x, y, 0.0);
            }
        }
    }
}

fn convolve_dense(input: &ImageF32, kernel: &CircularKernel) -> ImageF32 {
    let mut out = ImageF32::new(input.w, input.h);
    let side = kernel.side() as isize;
    let anchor = (side - 1) / 2;
    for y in 0..input.h {
        let dst = out.row_mut(y);
        for (x, px) in dst.iter_mut().enumerate() {
            let mut acc = 0.0f32;
            for ky in 0..side {
                let sy = y as isize + ky - anchor;
                if sy < 0 || sy >= input.h as isize {
                    continue;
                }
                let src = input.row(sy as usize);
                for kx in 0..side {
                    let sx = x as isize + kx - anchor;
                    if sx < 0 || sx >= input.w as isize {
                        continue;
                    }
                    acc += kernel.weight(kx as usize, ky as usize) * src[sx as usize];
                }
            }
            *px = acc;
        }
    }
    out
}

#[test]
fn kernel_geometry_follows_spacing() {
    let kernel = CircularKernel::for_spacing(SPACING, 1.2, 2.5);
    assert_eq!(kernel.side(), 18);
    assert!((kernel.radius() - 7.2).abs() < 1e-6);
    assert_eq!(kernel.weight(0, 0), 0.0);
    assert_eq!(kernel.weight(17, 17), 0.0);
    assert_eq!(kernel.weight(8, 8), 1.0);
    for ky in 0..18 {
        for kx in 0..18 {
            assert_eq!(kernel.weight(kx, ky), kernel.weight(17 - kx, 17 - ky));
        }
    }
    let area = kernel.area();
    let disk = std::f32::consts::PI * 7.2 * 7.2;
    assert!((area - disk).abs() / disk < 0.1, "area {area} vs disk {disk}");
}

#[test]
fn tiny_spacing_still_builds_a_kernel() {
    let kernel = CircularKernel::for_spacing(0.2, 1.2, 2.5);
    assert_eq!(kernel.side(), 1);
    assert_eq!(kernel.area(), 1.0);
}

#[test]
fn tap_convolution_matches_dense_reference() {
    let mut img = ImageF32::new(23, 17);
    for y in 0..img.h {
        for x in 0..img.w {
            img.set(x, y, ((x * 7 + y * 13) % 5) as f32 * 0.25);
        }
    }
    let backend = ComputeBackend::with_threads(2);
    for side in [1usize, 4, 5, 9] {
        let kernel = CircularKernel::new(side, side as f32 / 2.5);
        let fast = kernel.convolve(&img, &backend);
        let slow = convolve_dense(&img, &kernel);
        for (a, b) in fast.data.iter().zip(&slow.data) {
            assert!((a - b).abs() < 1e-4);
        }
    }
}

#[test]
fn convolution_zero_pads_the_border() {
    let img = ImageF32::filled(20, 20, 1.0);
    let kernel = CircularKernel::new(5, 2.0);
    let out = kernel.convolve(&img, &ComputeBackend::with_threads(1));
    assert_eq!(out.get(10, 10), kernel.area());
    assert!(out.get(0, 0) < kernel.area());
    assert_eq!((out.w, out.h), (20, 20));
}

#[test]
fn nms_keeps_the_first_sample_of_a_plateau() {
    let mut resp = ImageF32::new(10, 5);
    resp.set(3, 2, 5.0);
    resp.set(4, 2, 5.0);
    resp.set(4, 3, 5.0);
    let peaks = local_maxima(&resp, 1.0, 2);
    assert_eq!(peaks.len(), 1);
    assert_eq!((peaks[0].x, peaks[0].y), (3, 2));
}

#[test]
fn nms_suppresses_weaker_neighbours_only_inside_the_window() {
    let mut resp = ImageF32::new(20, 5);
    resp.set(2, 2, 9.0);
    resp.set(4, 2, 8.0);
    resp.set(10, 2, 7.0);
    let peaks = local_maxima(&resp, 1.0, 3);
    let xs: Vec<usize> = peaks.iter().map(|p| p.x).collect();
    assert_eq!(xs, vec![2, 10]);
}

#[test]
fn nms_ignores_responses_at_or_below_threshold() {
    let mut resp = ImageF32::new(8, 8);
    resp.set(4, 4, 2.0);
    assert!(local_maxima(&resp, 2.0, 1).is_empty());
}

#[test]
fn blob_on_middle_line_yields_one_confident_candidate() {
    let mut page = staff_page();
    fill_disk(&mut page, 150.0, LINES[2], 7.5);
    let det = detect_note_heads(&page, &staff(), &NoteOptions::default(), &ComputeBackend::new());
    assert_eq!(det.candidates.len(), 1, "{:?}", det.candidates);
    let c = det.candidates[0];
    assert!((c.x - 150.0).abs() <= 2.0);
    assert!((c.y - LINES[2]).abs() <= 2.0);
    assert!(c.confidence > 0.5 && c.confidence <= 1.0);
    assert_eq!(det.kernel_side, 18);
    assert_eq!(det.nms_half_window, 12);
}

#[test]
fn bare_staff_has_no_candidates() {
    let det = detect_note_heads(
        &staff_page(),
        &staff(),
        &NoteOptions::default(),
        &ComputeBackend::new(),
    );
    assert!(det.candidates.is_empty());
}

#[test]
fn candidates_are_sorted_left_to_right_in_page_coordinates() {
    let mut page = staff_page();
    fill_disk(&mut page, 220.0, 92.5, 7.5);
    fill_disk(&mut page, 60.0, 47.5, 7.5);
    fill_disk(&mut page, 140.0, 70.0, 7.5);
    let det = detect_note_heads(&page, &staff(), &NoteOptions::default(), &ComputeBackend::new());
    assert_eq!(det.candidates.len(), 3);
    let xs: Vec<f32> = det.candidates.iter().map(|c| c.x).collect();
    assert!(xs.windows(2).all(|w| w[0] < w[1]));
    assert!((det.candidates[0].y - 47.5).abs() <= 2.0);
    assert!((det.candidates[2].y - 92.5).abs() <= 2.0);
}

#[test]
fn accepted_candidates_respect_the_suppression_distance() {
    let mut page = staff_page();
    let mut x = 30.0;
    while x < 270.0 {
        fill_disk(&mut page, x, 62.5, 7.5);
        fill_disk(&mut page, x + 4.0, 77.5, 7.5);
        x += 9.0;
    }
    let det = detect_note_heads(&page, &staff(), &NoteOptions::default(), &ComputeBackend::new());
    assert!(!det.candidates.is_empty());
    let min_dist = 0.8 * SPACING;
    for (i, a) in det.candidates.iter().enumerate() {
        assert!((0.0..=1.0).contains(&a.confidence));
        for b in &det.candidates[i + 1..] {
            let d = ((a.x - b.x).powi(2) + (a.y - b.y).powi(2)).sqrt();
            assert!(d >= min_dist, "candidates {a:?} and {b:?} only {d} apart");
        }
    }
}

#[test]
fn search_region_is_padded_and_clamped() {
    let det = detect_note_heads(
        &staff_page(),
        &staff(),
        &NoteOptions::default(),
        &ComputeBackend::new(),
    );
    assert_eq!(det.region_y0, 0);
    assert_eq!(det.region_y0 + det.region_height, 146);
}

#[test]
fn even_kernels_report_the_geometric_centre() {
    assert_eq!(CircularKernel::new(18, 7.2).centre_offset(), 0.5);
    assert_eq!(CircularKernel::new(5, 2.0).centre_offset(), 0.0);
}
