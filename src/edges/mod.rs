//! Edge detection by Gaussian gradient magnitude.
//!
//! For images with a z-extent of 1 the two-dimensional gradient `(Ix, Iy)` is
//! used, otherwise the full three-dimensional gradient. Derivatives come from
//! the [`Differentiator`] at the requested scale; the magnitude is the
//! Euclidean norm per element. Optionally, non-maximum suppression along the
//! continuous gradient direction thins the response to one-element-wide
//! ridges (see [`nms`]).
//!
//! Memory: the working image is reused for the last derivative and receives
//! the final result, so at most `axes + 1` image-sized buffers are alive.

pub mod grad;
pub(crate) mod nms;

pub use grad::magnitude_in_place;

use crate::config::Settings;
use crate::differentiator::{check_aspects, check_scale, log_input, Differentiator};
use crate::error::FeatureError;
use crate::image::{FloatImage, ImageSource, Working};
use crate::progress::{Progress, ProgressSink, Silent};
use log::debug;

/// Gradient-magnitude edge detector.
#[derive(Clone, Copy, Debug, Default)]
pub struct Edges {
    differentiator: Differentiator,
}

impl Edges {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(settings: Settings) -> Self {
        Self {
            differentiator: Differentiator::with_settings(settings),
        }
    }

    pub fn run<I: ImageSource>(
        &self,
        image: I,
        scale: f64,
        nonmaxsup: bool,
    ) -> Result<Working, FeatureError> {
        self.run_with_progress(image, scale, nonmaxsup, &mut Silent)
    }

    pub fn run_with_progress<I: ImageSource>(
        &self,
        image: I,
        scale: f64,
        nonmaxsup: bool,
        sink: &mut dyn ProgressSink,
    ) -> Result<Working, FeatureError> {
        debug!("Edges: scale {scale}, non-maximum suppression {nonmaxsup}");
        check_scale("smoothing scale", scale)?;
        log_input(&image);
        check_aspects(&image.aspects())?;

        let name = image.name().to_string();
        let axes = if image.dimensions().z == 1 { 2 } else { 3 };
        let mut progress = Progress::new(sink);
        let working = image.into_working();
        let reused = working.is_reused();

        // Stage boundaries: derivatives, magnitude, suppression.
        let deriv_end = if nonmaxsup { 0.9 } else { 0.98 };
        let mag_end = if nonmaxsup { 0.92 } else { 1.0 };

        let mut components: Vec<FloatImage> = Vec::with_capacity(axes);
        for k in 0..axes - 1 {
            debug!("Computing I{}", ["x", "y", "z"][k]);
            let mut orders = [0; 3];
            orders[k] = 1;
            let (from, to) = stage_range(k, axes, deriv_end);
            let copy = Working::Converted(working.image().clone());
            let d = self
                .differentiator
                .differentiate(copy, scale, orders, &mut progress.sub(from, to));
            components.push(d.into_image());
        }
        debug!("Computing I{}", ["x", "y", "z"][axes - 1]);
        let mut orders = [0; 3];
        orders[axes - 1] = 1;
        let (from, to) = stage_range(axes - 1, axes, deriv_end);
        let mut last = self
            .differentiator
            .differentiate(working, scale, orders, &mut progress.sub(from, to))
            .into_image();

        debug!("Computing gradient magnitude");
        let mut result = if nonmaxsup {
            let mut magnitude = last.clone();
            magnitude_in_place(&mut magnitude, &components)?;
            progress.sub(deriv_end, mag_end).finish();

            debug!("Suppressing non-maxima");
            components.push(last);
            let step = self.differentiator.settings().nms_step;
            nms::suppress(
                &magnitude,
                &mut components,
                step,
                &mut progress.sub(mag_end, 1.0),
            );
            components.swap_remove(axes - 1)
        } else {
            magnitude_in_place(&mut last, &components)?;
            progress.sub(deriv_end, mag_end).finish();
            last
        };

        result.set_name(format!("{name} edges"));
        progress.finish();
        Ok(if reused {
            Working::Reused(result)
        } else {
            Working::Converted(result)
        })
    }
}

fn stage_range(k: usize, count: usize, end: f64) -> (f64, f64) {
    let span = end / count as f64;
    (k as f64 * span, (k + 1) as f64 * span)
}
