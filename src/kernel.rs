//! Sampled Gaussian-derivative kernels and 1-D convolution with mirror
//! boundaries.
//!
//! Kernels are stored as half kernels: `taps[0]` is the centre and
//! `taps[i]` the magnitude shared by offsets `±i`. Even orders are symmetric,
//! odd orders antisymmetric, so only the sign applied to the far side of the
//! line changes.
//!
//! The sampled derivative of order `n` at scale `s` is
//! `(-1)^n He_n(x/s) / s^n · G_s(x)` with `He_n` the probabilists' Hermite
//! polynomial, written out below as explicit polynomials in `x` and `1/s²`.
use crate::config::KernelRadius;
use std::f64::consts::PI;

/// Highest supported differentiation order.
pub const MAX_ORDER: usize = 10;

/// Half of a symmetric or antisymmetric sampled kernel.
#[derive(Clone, Debug, PartialEq)]
pub struct HalfKernel {
    order: usize,
    taps: Vec<f64>,
}

impl HalfKernel {
    /// Sample the Gaussian derivative of `order` at `scale` (in samples).
    ///
    /// The half length is `floor(scale · r) + 1` with `r` picked from
    /// `radius` by order, and is clipped to `max_len` (the line length).
    /// Order 0 is normalized to unit sum over the full kernel.
    pub fn gaussian(scale: f64, order: usize, max_len: usize, radius: &KernelRadius) -> Self {
        debug_assert!(scale > 0.0 && order <= MAX_ORDER);
        // A huge scale over a tiny aspect may overflow to infinity.
        let scale = scale.min(f64::MAX);
        let r = radius.for_order(order);
        let half = (scale * r).floor().min((max_len.max(1) - 1) as f64) as usize + 1;

        let is2 = 1.0 / (scale * scale);
        let c0 = 1.0 / (scale * (2.0 * PI).sqrt());
        let mut taps: Vec<f64> = (0..half)
            .map(|k| {
                let x = k as f64;
                c0 * (-0.5 * x * x * is2).exp() * hermite_factor(order, x, is2)
            })
            .collect();

        if order == 0 {
            let integral = 2.0 * taps.iter().sum::<f64>() - taps[0];
            for t in &mut taps {
                *t /= integral;
            }
        }

        Self { order, taps }
    }

    pub fn taps(&self) -> &[f64] {
        &self.taps
    }

    /// Number of padding samples needed on each side of a line.
    pub fn padding(&self) -> usize {
        self.taps.len() - 1
    }

    pub fn is_odd(&self) -> bool {
        self.order % 2 == 1
    }

    /// Convolve a mirror-padded line.
    ///
    /// `padded` holds `out.len()` samples with `padding()` extra samples on
    /// both sides.
    pub fn convolve(&self, padded: &[f64], out: &mut [f64]) {
        let pad = self.padding();
        debug_assert_eq!(padded.len(), out.len() + 2 * pad);
        let centre = self.taps[0];
        let lobes = &self.taps[1..];

        if self.is_odd() {
            for (i, o) in out.iter_mut().enumerate() {
                let c = i + pad;
                let mut acc = centre * padded[c];
                for (j, &k) in lobes.iter().enumerate() {
                    let d = j + 1;
                    acc += k * (padded[c - d] - padded[c + d]);
                }
                *o = acc;
            }
        } else {
            for (i, o) in out.iter_mut().enumerate() {
                let c = i + pad;
                let mut acc = centre * padded[c];
                for (j, &k) in lobes.iter().enumerate() {
                    let d = j + 1;
                    acc += k * (padded[c - d] + padded[c + d]);
                }
                *o = acc;
            }
        }
    }
}

/// Polynomial factor of the Gaussian derivative of `order` at offset `x`.
fn hermite_factor(order: usize, x: f64, is2: f64) -> f64 {
    let x2 = x * x;
    let x3 = x2 * x;
    let x4 = x2 * x2;
    let x5 = x4 * x;
    let x6 = x4 * x2;
    let x7 = x6 * x;
    let x8 = x4 * x4;
    let x9 = x8 * x;
    let x10 = x8 * x2;
    let is4 = is2 * is2;
    let is6 = is4 * is2;
    let is8 = is4 * is4;
    let is10 = is8 * is2;
    let is12 = is6 * is6;
    let is14 = is12 * is2;
    let is16 = is8 * is8;
    let is18 = is16 * is2;
    let is20 = is10 * is10;

    match order {
        0 => 1.0,
        1 => -x * is2,
        2 => x2 * is4 - is2,
        3 => 3.0 * x * is4 - x3 * is6,
        4 => x4 * is8 - 6.0 * x2 * is6 + 3.0 * is4,
        5 => -(x5 * is10 - 10.0 * x3 * is8 + 15.0 * x * is6),
        6 => x6 * is12 - 15.0 * x4 * is10 + 45.0 * x2 * is8 - 15.0 * is6,
        7 => -(x7 * is14 - 21.0 * x5 * is12 + 105.0 * x3 * is10 - 105.0 * x * is8),
        8 => {
            x8 * is16 - 28.0 * x6 * is14 + 210.0 * x4 * is12 - 420.0 * x2 * is10
                + 105.0 * is8
        }
        9 => {
            -(x9 * is18 - 36.0 * x7 * is16 + 378.0 * x5 * is14 - 1260.0 * x3 * is12
                + 945.0 * x * is10)
        }
        10 => {
            x10 * is20 - 45.0 * x8 * is18 + 630.0 * x6 * is16 - 3150.0 * x4 * is14
                + 4725.0 * x2 * is12
                - 945.0 * is10
        }
        _ => unreachable!("order checked against MAX_ORDER"),
    }
}

/// Fill `pad` samples on both ends of `buf` by mirror reflection of the
/// `buf.len() - 2·pad` samples in between. The reflection axis lies half a
/// sample outside the line, so the edge sample is repeated once.
pub fn mirror_pad(buf: &mut [f64], pad: usize) {
    let n = buf.len() - 2 * pad;
    if pad == 0 || n == 0 {
        return;
    }
    let period = 2 * n as isize;
    let reflect = |i: isize| {
        let m = i.rem_euclid(period) as usize;
        if m < n {
            m
        } else {
            2 * n - 1 - m
        }
    };
    for j in 1..=pad {
        buf[pad - j] = buf[pad + reflect(-(j as isize))];
        buf[pad + n - 1 + j] = buf[pad + reflect((n - 1 + j) as isize)];
    }
}
