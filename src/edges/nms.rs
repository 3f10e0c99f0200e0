//! Non-maximum suppression along the continuous gradient direction.
//!
//! For every element the gradient vector is normalized and scaled to a
//! sub-sample step. The magnitude field is then sampled one step forward and
//! one step backward with linear interpolation (bilinear for a single plane,
//! trilinear for volumes) on mirror-reflected borders. The element keeps its
//! magnitude only if it is strictly larger than both samples. Elements with
//! zero magnitude have no direction and stay 0.
//!
//! The suppression is a single pass; each x-y(-z) sub-image of a 5-D image is
//! processed independently.
use crate::image::FloatImage;
use crate::progress::Progress;

/// Suppress non-maxima of `magnitude` and write the result into the last
/// component of `gradient`.
///
/// `gradient` holds the x and y (and for volumes z) derivative images with
/// the same extent as `magnitude`. Each element of the last component is
/// read before it is overwritten, so the component can double as output.
pub(crate) fn suppress(
    magnitude: &FloatImage,
    gradient: &mut [FloatImage],
    step: f64,
    progress: &mut Progress<'_>,
) {
    debug_assert!(gradient.len() == 2 || gradient.len() == 3);
    let dims = magnitude.dimensions();
    let (nx, ny, nz) = (dims.x, dims.y, dims.z);
    let plane = nx * ny;
    let volume = plane * nz;
    let field = magnitude.data();
    let last = gradient.len() - 1;

    progress.steps(dims.t * dims.c * nz);
    for vol in 0..dims.t * dims.c {
        let base = vol * volume;
        let sub = &field[base..base + volume];
        for z in 0..nz {
            for y in 0..ny {
                for x in 0..nx {
                    let p = base + z * plane + y * nx + x;
                    let centre = field[p] as f64;
                    let value = if centre == 0.0 {
                        0.0
                    } else {
                        let mut r = [0.0; 3];
                        for (k, component) in gradient.iter().enumerate() {
                            r[k] = step * component.data()[p] as f64 / centre;
                        }
                        let (fx, fy, fz) = (x as f64, y as f64, z as f64);
                        let forward = interpolate(sub, nx, ny, nz, fx + r[0], fy + r[1], fz + r[2]);
                        let backward = interpolate(sub, nx, ny, nz, fx - r[0], fy - r[1], fz - r[2]);
                        if forward >= centre || backward >= centre {
                            0.0
                        } else {
                            centre
                        }
                    };
                    gradient[last].data_mut()[p] = value as f32;
                }
            }
            progress.step();
        }
    }
    progress.finish();
}

/// Linear interpolation of a single `nx × ny × nz` volume at a fractional
/// position. Axes of extent 1 contribute no interpolation weight.
fn interpolate(field: &[f32], nx: usize, ny: usize, nz: usize, fx: f64, fy: f64, fz: f64) -> f64 {
    let (x0, x1, dx) = bracket(fx, nx);
    let (y0, y1, dy) = bracket(fy, ny);
    let (z0, z1, dz) = bracket(fz, nz);
    let at = |x: usize, y: usize, z: usize| field[(z * ny + y) * nx + x] as f64;

    let lerp_xy = |z: usize| {
        let top = (1.0 - dx) * at(x0, y0, z) + dx * at(x1, y0, z);
        let bottom = (1.0 - dx) * at(x0, y1, z) + dx * at(x1, y1, z);
        (1.0 - dy) * top + dy * bottom
    };
    if dz == 0.0 {
        lerp_xy(z0)
    } else {
        (1.0 - dz) * lerp_xy(z0) + dz * lerp_xy(z1)
    }
}

/// Neighbouring sample indices around `f` and the fractional weight of the
/// upper one.
fn bracket(f: f64, n: usize) -> (usize, usize, f64) {
    if n == 1 {
        return (0, 0, 0.0);
    }
    let i = f.floor();
    let d = f - i;
    let i = i as isize;
    (mirror(i, n), mirror(i + 1, n), d)
}

/// Mirror reflection without edge repetition, `n > 1`.
fn mirror(i: isize, n: usize) -> usize {
    let period = 2 * (n as isize - 1);
    let m = i.rem_euclid(period);
    if m < n as isize {
        m as usize
    } else {
        (period - m) as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::{Coordinates, Dimensions};
    use crate::progress::Silent;

    #[test]
    fn mirror_reflects_around_edges() {
        assert_eq!(mirror(-1, 4), 1);
        assert_eq!(mirror(4, 4), 2);
        assert_eq!(mirror(3, 4), 3);
        assert_eq!(mirror(-1, 2), 1);
    }

    #[test]
    fn interpolation_is_exact_on_planes() {
        let dims = Dimensions::xy(4, 3);
        let field: Vec<f32> = (0..12).map(|i| ((i % 4) + 10 * (i / 4)) as f32).collect();
        let v = interpolate(&field, dims.x, dims.y, 1, 1.25, 0.5, 0.0);
        assert!((v - (1.25 + 5.0)).abs() < 1e-9);
    }

    #[test]
    fn keeps_ridge_and_suppresses_flanks() {
        // Vertical ridge at x = 3 with gradient pointing along x.
        let dims = Dimensions::xy(7, 5);
        let profile = [0.0f32, 1.0, 2.0, 3.0, 2.0, 1.0, 0.0];
        let magnitude = FloatImage::from_fn(dims, |c| profile[c.x]);
        let gx = FloatImage::from_fn(dims, |c| profile[c.x] * if c.x < 3 { 1.0 } else { -1.0 });
        let gy = FloatImage::new(dims);
        let mut gradient = vec![gx, gy];
        suppress(&magnitude, &mut gradient, 0.7, &mut Progress::new(&mut Silent));
        let out = &gradient[1];
        for y in 0..dims.y {
            for x in 0..dims.x {
                let v = out.get(&Coordinates { x, y, ..Coordinates::default() });
                if x == 3 {
                    assert_eq!(v, 3.0);
                } else {
                    assert_eq!(v, 0.0, "x={x} y={y}");
                }
            }
        }
    }
}
