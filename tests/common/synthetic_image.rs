use gaussian_features::image::{Coordinates, Dimensions, FloatImage, Image};

/// Generates a simple high-contrast checkerboard image.
pub fn checkerboard_u8(width: usize, height: usize, cell: usize) -> Image<u8> {
    assert!(width > 0 && height > 0, "image dimensions must be positive");
    assert!(cell > 0, "cell size must be positive");

    Image::from_fn(Dimensions::xy(width, height), |c| {
        if (c.x / cell + c.y / cell) & 1 == 0 {
            32
        } else {
            220
        }
    })
}

/// Every element set to `value`.
pub fn constant_u8(dims: Dimensions, value: u8) -> Image<u8> {
    Image::from_fn(dims, |_| value)
}

/// Zero image with a single unit element at `at`.
pub fn impulse(dims: Dimensions, at: Coordinates) -> FloatImage {
    FloatImage::from_fn(dims, |c| if c == at { 1.0 } else { 0.0 })
}

/// Isotropic bright blob of width `sigma` centred at `(cx, cy)`.
pub fn gaussian_blob(dims: Dimensions, cx: f32, cy: f32, sigma: f32) -> FloatImage {
    FloatImage::from_fn(dims, |c| {
        let (dx, dy) = (c.x as f32 - cx, c.y as f32 - cy);
        (-(dx * dx + dy * dy) / (2.0 * sigma * sigma)).exp()
    })
}

/// Deterministic pseudo-random values in `[0, 1)` from a 64-bit LCG.
pub fn noise(dims: Dimensions, seed: u64) -> FloatImage {
    let mut state = seed.wrapping_mul(6_364_136_223_846_793_005).wrapping_add(1);
    FloatImage::from_fn(dims, |_| {
        state = state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);
        (state >> 40) as f32 / (1u64 << 24) as f32
    })
}
