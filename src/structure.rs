//! Eigenvalues of the Gaussian structure tensor.
//!
//! The gradient is computed at the smoothing scale `sscale`; the products of
//! its components form the tensor field, which is integrated per component
//! with a Gaussian at `iscale` before the per-element eigen-decomposition.
//! The tensor is positive semi-definite, so eigenimages are ranked by signed
//! value.
use crate::config::Settings;
use crate::differentiator::{check_aspects, check_scale, log_input, Differentiator};
use crate::error::FeatureError;
use crate::hessian::{eigen_planar, eigen_volume, RANK_NAMES_2D, RANK_NAMES_3D};
use crate::image::{FloatImage, ImageSource, Working};
use crate::progress::{Progress, ProgressSink, Silent};
use log::debug;

#[derive(Clone, Copy, Debug, Default)]
pub struct Structure {
    differentiator: Differentiator,
}

impl Structure {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(settings: Settings) -> Self {
        Self {
            differentiator: Differentiator::with_settings(settings),
        }
    }

    /// Eigenimages of the structure tensor, ordered largest to smallest.
    pub fn run<I: ImageSource>(
        &self,
        image: I,
        sscale: f64,
        iscale: f64,
    ) -> Result<Vec<FloatImage>, FeatureError> {
        self.run_with_progress(image, sscale, iscale, &mut Silent)
    }

    pub fn run_with_progress<I: ImageSource>(
        &self,
        image: I,
        sscale: f64,
        iscale: f64,
        sink: &mut dyn ProgressSink,
    ) -> Result<Vec<FloatImage>, FeatureError> {
        debug!("Structure: smoothing scale {sscale}, integration scale {iscale}");
        check_scale("smoothing scale", sscale)?;
        check_scale("integration scale", iscale)?;
        log_input(&image);
        check_aspects(&image.aspects())?;

        let name = image.name().to_string();
        let planar = image.dimensions().z == 1;
        let axes = if planar { 2 } else { 3 };
        let mut progress = Progress::new(sink);
        let working = image.into_working();

        // Gradient components; the working buffer becomes the last one.
        let mut gradient: Vec<FloatImage> = Vec::with_capacity(axes);
        let span = 0.4 / axes as f64;
        for k in 0..axes - 1 {
            debug!("Computing I{}", ["x", "y", "z"][k]);
            let mut orders = [0; 3];
            orders[k] = 1;
            let copy = Working::Converted(working.image().clone());
            let mut stage = progress.sub(k as f64 * span, (k + 1) as f64 * span);
            gradient.push(
                self.differentiator
                    .differentiate(copy, sscale, orders, &mut stage)
                    .into_image(),
            );
        }
        debug!("Computing I{}", ["x", "y", "z"][axes - 1]);
        let mut orders = [0; 3];
        orders[axes - 1] = 1;
        let mut stage = progress.sub((axes - 1) as f64 * span, 0.4);
        gradient.push(
            self.differentiator
                .differentiate(working, sscale, orders, &mut stage)
                .into_image(),
        );

        debug!("Computing tensor components");
        let tensor = outer_products(gradient)?;

        debug!("Integrating tensor components");
        let count = tensor.len();
        let tensor: Vec<FloatImage> = tensor
            .into_iter()
            .enumerate()
            .map(|(k, component)| {
                let from = 0.4 + 0.55 * k as f64 / count as f64;
                let to = 0.4 + 0.55 * (k + 1) as f64 / count as f64;
                self.differentiator
                    .differentiate(
                        Working::Reused(component),
                        iscale,
                        [0, 0, 0],
                        &mut progress.sub(from, to),
                    )
                    .into_image()
            })
            .collect();

        debug!("Computing eigenimages");
        let mut eigen = match <[FloatImage; 3]>::try_from(tensor) {
            Ok([xx, xy, yy]) => eigen_planar(xx, xy, yy, false),
            Err(tensor) => match <[FloatImage; 6]>::try_from(tensor) {
                Ok(volume) => eigen_volume(volume, false),
                Err(_) => unreachable!("tensor has 3 or 6 components"),
            },
        };
        progress.finish();

        let ranks: &[&str] = if planar { &RANK_NAMES_2D } else { &RANK_NAMES_3D };
        for (img, rank) in eigen.iter_mut().zip(ranks) {
            img.set_name(format!("{name} {rank} structure eigenvalues"));
        }
        Ok(eigen)
    }
}

/// Upper triangle of `g gᵀ` in row-major order: `[xx, xy, yy]` for two
/// components, `[xx, xy, xz, yy, yz, zz]` for three.
fn outer_products(gradient: Vec<FloatImage>) -> Result<Vec<FloatImage>, FeatureError> {
    let n = gradient.len();
    let mut tensor = Vec::with_capacity(n * (n + 1) / 2);
    for i in 0..n {
        for j in i..n {
            let mut product = gradient[i].clone();
            if i == j {
                product.square();
            } else {
                product.multiply(&gradient[j])?;
            }
            tensor.push(product);
        }
    }
    Ok(tensor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::{Coordinates, Dimensions};

    #[test]
    fn oriented_pattern_has_one_dominant_eigenvalue() {
        // Stripes varying along x only: energy in one direction.
        let dims = Dimensions::xy(32, 32);
        let img = FloatImage::from_fn(dims, |c| (c.x as f32 * 0.8).sin());
        let eig = Structure::new().run(&img, 1.0, 2.0).unwrap();
        assert_eq!(eig.len(), 2);
        let c = Coordinates { x: 16, y: 16, ..Coordinates::default() };
        assert!(eig[0].get(&c) > 0.01);
        assert!(eig[1].get(&c).abs() < 1e-4 * eig[0].get(&c).max(1.0));
        assert!(eig[0].name().ends_with("largest structure eigenvalues"));
    }

    #[test]
    fn eigenvalues_are_non_negative_and_ordered() {
        let dims = Dimensions::xyz(9, 9, 9);
        let img = FloatImage::from_fn(dims, |c| ((c.x * 7 + c.y * 3 + c.z * 5) % 11) as f32);
        let eig = Structure::new().run(img, 1.0, 1.0).unwrap();
        assert_eq!(eig.len(), 3);
        for i in 0..dims.len() {
            let (a, b, c) = (eig[0].data()[i], eig[1].data()[i], eig[2].data()[i]);
            assert!(a >= b && b >= c);
            assert!(c > -1e-3 * a.max(1.0));
        }
    }

    #[test]
    fn both_scales_are_checked() {
        let img = FloatImage::new(Dimensions::xy(4, 4));
        let err = Structure::new().run(&img, 1.0, 0.0).unwrap_err();
        assert!(matches!(
            err,
            FeatureError::NonPositiveScale { name: "integration scale", .. }
        ));
    }
}
