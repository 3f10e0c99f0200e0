use crate::config::Settings;
use crate::differentiator::{check_aspects, check_scale, log_input, Differentiator};
use crate::error::FeatureError;
use crate::hessian::second_derivatives;
use crate::image::{ImageSource, Working};
use crate::progress::{Progress, ProgressSink, Silent};
use log::debug;

/// Gaussian Laplacian: trace of the Hessian, `Ixx + Iyy (+ Izz)`.
#[derive(Clone, Copy, Debug, Default)]
pub struct Laplacian {
    differentiator: Differentiator,
}

impl Laplacian {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(settings: Settings) -> Self {
        Self {
            differentiator: Differentiator::with_settings(settings),
        }
    }

    pub fn run<I: ImageSource>(&self, image: I, scale: f64) -> Result<Working, FeatureError> {
        self.run_with_progress(image, scale, &mut Silent)
    }

    pub fn run_with_progress<I: ImageSource>(
        &self,
        image: I,
        scale: f64,
        sink: &mut dyn ProgressSink,
    ) -> Result<Working, FeatureError> {
        debug!("Laplacian: scale {scale}");
        check_scale("smoothing scale", scale)?;
        log_input(&image);
        check_aspects(&image.aspects())?;

        let name = image.name().to_string();
        let planar = image.dimensions().z == 1;
        let mut progress = Progress::new(sink);
        let working = image.into_working();
        let reused = working.is_reused();

        let mut sum = if planar {
            // The last derivative holds the working buffer.
            let [hxx, mut hyy] = second_derivatives(
                &self.differentiator,
                working,
                scale,
                [[2, 0, 0], [0, 2, 0]],
                &mut progress,
            );
            hyy.add(&hxx)?;
            hyy
        } else {
            let [mut hxx, hyy, mut hzz] = second_derivatives(
                &self.differentiator,
                working,
                scale,
                [[2, 0, 0], [0, 2, 0], [0, 0, 2]],
                &mut progress,
            );
            hxx.add(&hyy)?;
            hzz.add(&hxx)?;
            hzz
        };
        sum.set_name(format!("{name} Laplacian"));
        Ok(if reused {
            Working::Reused(sum)
        } else {
            Working::Converted(sum)
        })
    }
}
