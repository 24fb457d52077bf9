//! Circular matched filter and same-size 2D convolution.
//!
//! Boundary policy: the output has the input's size and samples outside the
//! input read as zero. The kernel anchor is `(side - 1) / 2` (integer
//! division) in both axes.
use crate::backend::ComputeBackend;
use crate::image::{ImageF32, ImageView};
use rayon::prelude::*;

/// Binary disk kernel sized from the staff spacing.
#[derive(Clone, Debug)]
pub struct CircularKernel {
    side: usize,
    radius: f32,
    weights: Vec<f32>,
    /// `(dx, dy)` offsets of the nonzero taps relative to the anchor.
    taps: Vec<(isize, isize)>,
}

impl CircularKernel {
    /// Kernel of side `round(size_factor × spacing)` with taps inside radius
    /// `side / radius_divisor` of the kernel centre.
    pub fn for_spacing(spacing: f32, size_factor: f32, radius_divisor: f32) -> Self {
        let side = ((size_factor * spacing).round() as usize).max(1);
        Self::new(side, side as f32 / radius_divisor)
    }

    pub fn new(side: usize, radius: f32) -> Self {
        let side = side.max(1);
        let centre = (side as f32 - 1.0) * 0.5;
        let anchor = ((side - 1) / 2) as isize;
        let mut weights = vec![0.0f32; side * side];
        let mut taps = Vec::new();
        for ky in 0..side {
            for kx in 0..side {
                let dx = kx as f32 - centre;
                let dy = ky as f32 - centre;
                if (dx * dx + dy * dy).sqrt() <= radius {
                    weights[ky * side + kx] = 1.0;
                    taps.push((kx as isize - anchor, ky as isize - anchor));
                }
            }
        }
        Self {
            side,
            radius,
            weights,
            taps,
        }
    }

    pub fn side(&self) -> usize {
        self.side
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Distance from the integer anchor to the geometric kernel centre
    /// (`0.5` for even sides, `0` for odd ones).
    pub fn centre_offset(&self) -> f32 {
        (self.side as f32 - 1.0) * 0.5 - ((self.side - 1) / 2) as f32
    }

    /// Sum of the weights (number of taps).
    pub fn area(&self) -> f32 {
        self.taps.len() as f32
    }

    pub fn weight(&self, kx: usize, ky: usize) -> f32 {
        self.weights[ky * self.side + kx]
    }

    /// Same-size, zero-padded convolution of `input` with this kernel.
    ///
    /// The kernel is symmetric, so correlation and convolution coincide.
    /// Output rows are computed in parallel on `backend`.
    pub fn convolve(&self, input: &ImageF32, backend: &ComputeBackend) -> ImageF32 {
        let mut out = ImageF32::new(input.w, input.h);
        if input.w == 0 || input.h == 0 || self.taps.is_empty() {
            return out;
        }
        let (w, h) = (input.w as isize, input.h as isize);
        let stride = out.stride;
        backend.install(|| {
            out.data
                .par_chunks_mut(stride)
                .enumerate()
                .for_each(|(y, dst)| {
                    let y = y as isize;
                    for (x, px) in dst.iter_mut().enumerate().take(input.w) {
                        let x = x as isize;
                        let mut acc = 0.0f32;
                        for &(dx, dy) in &self.taps {
                            let sx = x + dx;
                            let sy = y + dy;
                            if sx >= 0 && sx < w && sy >= 0 && sy < h {
                                acc += input.row(sy as usize)[sx as usize];
                            }
                        }
                        *px = acc;
                    }
                });
        });
        out
    }
}
