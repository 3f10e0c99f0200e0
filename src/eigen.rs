//! Closed-form eigenvalues of small symmetric matrices.
//!
//! Both solvers avoid iteration: the 2×2 case solves the characteristic
//! quadratic in its cancellation-free form, the 3×3 case uses the
//! trigonometric solution of the depressed cubic. Results are returned in
//! descending order, by signed value or by magnitude.
use std::f64::consts::PI;

const TWO_PI: f64 = 2.0 * PI;

/// Eigenvalues of `[[xx, xy], [xy, yy]]`, largest first.
pub fn eigenvalues_2x2(xx: f64, xy: f64, yy: f64, absolute: bool) -> [f64; 2] {
    let b = -(xx + yy);
    let c = xx * yy - xy * xy;
    let disc = (b * b - 4.0 * c).max(0.0).sqrt();
    let q = if b < 0.0 {
        -0.5 * (b - disc)
    } else {
        -0.5 * (b + disc)
    };
    let (h1, h2) = if q == 0.0 { (0.0, 0.0) } else { (q, c / q) };
    let first = if absolute {
        h1.abs() >= h2.abs()
    } else {
        h1 >= h2
    };
    if first {
        [h1, h2]
    } else {
        [h2, h1]
    }
}

/// Eigenvalues of the symmetric matrix with the given upper triangle,
/// largest first.
pub fn eigenvalues_3x3(
    xx: f64,
    xy: f64,
    xz: f64,
    yy: f64,
    yz: f64,
    zz: f64,
    absolute: bool,
) -> [f64; 3] {
    let a = -(xx + yy + zz);
    let b = xx * yy + xx * zz + yy * zz - xy * xy - xz * xz - yz * yz;
    let c = xx * (yz * yz - yy * zz) + yy * xz * xz + zz * xy * xy - 2.0 * xy * xz * yz;

    let q = (a * a - 3.0 * b) / 9.0;
    let r = (a * a * a - 4.5 * a * b + 13.5 * c) / 27.0;
    let sqrtq = if q > 0.0 { q.sqrt() } else { 0.0 };
    let sqrtq3 = sqrtq * sqrtq * sqrtq;
    let a3 = a / 3.0;

    let mut h = if sqrtq3 == 0.0 {
        [-a3; 3]
    } else {
        let angle = (r / sqrtq3).clamp(-1.0, 1.0).acos();
        [
            -2.0 * sqrtq * (angle / 3.0).cos() - a3,
            -2.0 * sqrtq * ((angle + TWO_PI) / 3.0).cos() - a3,
            -2.0 * sqrtq * ((angle - TWO_PI) / 3.0).cos() - a3,
        ]
    };

    if absolute {
        h.sort_by(|u, v| v.abs().total_cmp(&u.abs()));
    } else {
        h.sort_by(|u, v| v.total_cmp(u));
    }
    h
}
