//! Eigenvalues of the Gaussian Hessian.
//!
//! Second derivatives are computed at the requested scale; for every element
//! the symmetric 2×2 (z-extent 1) or 3×3 Hessian is formed and its
//! eigenvalues are solved in closed form (see [`crate::eigen`]). The result is
//! one image per eigenvalue rank, largest first.
use crate::config::Settings;
use crate::differentiator::{check_aspects, check_scale, log_input, Differentiator};
use crate::eigen::{eigenvalues_2x2, eigenvalues_3x3};
use crate::error::FeatureError;
use crate::image::{FloatImage, ImageSource, Working};
use crate::progress::{Progress, ProgressSink, Silent};
use log::debug;

pub(crate) const RANK_NAMES_2D: [&str; 2] = ["largest", "smallest"];
pub(crate) const RANK_NAMES_3D: [&str; 3] = ["largest", "middle", "smallest"];

#[derive(Clone, Copy, Debug, Default)]
pub struct Hessian {
    differentiator: Differentiator,
}

impl Hessian {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(settings: Settings) -> Self {
        Self {
            differentiator: Differentiator::with_settings(settings),
        }
    }

    /// Eigenimages of the Hessian at `scale`, ordered largest to smallest.
    ///
    /// With `absolute` set the ranks compare magnitudes instead of signed
    /// values. Returns two images for planar input and three otherwise.
    pub fn run<I: ImageSource>(
        &self,
        image: I,
        scale: f64,
        absolute: bool,
    ) -> Result<Vec<FloatImage>, FeatureError> {
        self.run_with_progress(image, scale, absolute, &mut Silent)
    }

    pub fn run_with_progress<I: ImageSource>(
        &self,
        image: I,
        scale: f64,
        absolute: bool,
        sink: &mut dyn ProgressSink,
    ) -> Result<Vec<FloatImage>, FeatureError> {
        debug!("Hessian: scale {scale}, absolute {absolute}");
        check_scale("smoothing scale", scale)?;
        log_input(&image);
        check_aspects(&image.aspects())?;

        let name = image.name().to_string();
        let planar = image.dimensions().z == 1;
        let mut progress = Progress::new(sink);
        let working = image.into_working();

        let mut eigen = if planar {
            let [hxx, hxy, hyy] = second_derivatives(
                &self.differentiator,
                working,
                scale,
                [[2, 0, 0], [1, 1, 0], [0, 2, 0]],
                &mut progress.sub(0.0, 0.9),
            );
            debug!("Computing eigenimages");
            eigen_planar(hxx, hxy, hyy, absolute)
        } else {
            let [hxx, hxy, hxz, hyy, hyz, hzz] = second_derivatives(
                &self.differentiator,
                working,
                scale,
                [
                    [2, 0, 0],
                    [1, 1, 0],
                    [1, 0, 1],
                    [0, 2, 0],
                    [0, 1, 1],
                    [0, 0, 2],
                ],
                &mut progress.sub(0.0, 0.9),
            );
            debug!("Computing eigenimages");
            eigen_volume([hxx, hxy, hxz, hyy, hyz, hzz], absolute)
        };
        progress.finish();

        let ranks: &[&str] = if planar { &RANK_NAMES_2D } else { &RANK_NAMES_3D };
        for (img, rank) in eigen.iter_mut().zip(ranks) {
            img.set_name(format!("{name} {rank} Hessian eigenvalues"));
        }
        Ok(eigen)
    }
}

/// Derivatives for each order triple; the working image is reused for the
/// last one and duplicated for all others.
pub(crate) fn second_derivatives<const N: usize>(
    differentiator: &Differentiator,
    working: Working,
    scale: f64,
    orders: [[usize; 3]; N],
    progress: &mut Progress<'_>,
) -> [FloatImage; N] {
    let mut out: Vec<FloatImage> = Vec::with_capacity(N);
    for (k, order) in orders.iter().enumerate().take(N - 1) {
        let copy = Working::Converted(working.image().clone());
        let mut stage = progress.sub(k as f64 / N as f64, (k + 1) as f64 / N as f64);
        out.push(
            differentiator
                .differentiate(copy, scale, *order, &mut stage)
                .into_image(),
        );
    }
    let mut stage = progress.sub((N - 1) as f64 / N as f64, 1.0);
    out.push(
        differentiator
            .differentiate(working, scale, orders[N - 1], &mut stage)
            .into_image(),
    );
    match out.try_into() {
        Ok(arr) => arr,
        Err(_) => unreachable!("exactly N derivatives computed"),
    }
}

/// Ordered eigenimages of the planar tensor field `[[xx, xy], [xy, yy]]`.
///
/// Buffers of the inputs are reused for the outputs.
pub(crate) fn eigen_planar(
    mut xx: FloatImage,
    xy: FloatImage,
    mut yy: FloatImage,
    absolute: bool,
) -> Vec<FloatImage> {
    for ((a, &b), c) in xx
        .data_mut()
        .iter_mut()
        .zip(xy.data())
        .zip(yy.data_mut().iter_mut())
    {
        let [l1, l2] = eigenvalues_2x2(*a as f64, b as f64, *c as f64, absolute);
        *a = l1 as f32;
        *c = l2 as f32;
    }
    vec![xx, yy]
}

/// Ordered eigenimages of the volumetric tensor field given as its upper
/// triangle `[xx, xy, xz, yy, yz, zz]`.
pub(crate) fn eigen_volume(tensor: [FloatImage; 6], absolute: bool) -> Vec<FloatImage> {
    let [mut xx, xy, xz, mut yy, yz, mut zz] = tensor;
    let n = xx.data().len();
    for i in 0..n {
        let [l1, l2, l3] = eigenvalues_3x3(
            xx.data()[i] as f64,
            xy.data()[i] as f64,
            xz.data()[i] as f64,
            yy.data()[i] as f64,
            yz.data()[i] as f64,
            zz.data()[i] as f64,
            absolute,
        );
        xx.data_mut()[i] = l1 as f32;
        yy.data_mut()[i] = l2 as f32;
        zz.data_mut()[i] = l3 as f32;
    }
    vec![xx, yy, zz]
}
