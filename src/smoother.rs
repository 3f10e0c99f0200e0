use crate::config::Settings;
use crate::differentiator::{check_aspects, check_scale, log_input, Differentiator};
use crate::error::FeatureError;
use crate::image::{ImageSource, Working};
use crate::progress::{Progress, ProgressSink, Silent};
use log::debug;

/// Gaussian smoothing, i.e. differentiation of order zero along x, y and z.
#[derive(Clone, Copy, Debug, Default)]
pub struct Smoother {
    differentiator: Differentiator,
}

impl Smoother {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(settings: Settings) -> Self {
        Self {
            differentiator: Differentiator::with_settings(settings),
        }
    }

    pub fn gauss<I: ImageSource>(&self, image: I, scale: f64) -> Result<Working, FeatureError> {
        self.gauss_with_progress(image, scale, &mut Silent)
    }

    pub fn gauss_with_progress<I: ImageSource>(
        &self,
        image: I,
        scale: f64,
        sink: &mut dyn ProgressSink,
    ) -> Result<Working, FeatureError> {
        debug!("Smoother: scale {scale}");
        check_scale("smoothing scale", scale)?;
        log_input(&image);
        check_aspects(&image.aspects())?;

        let name = image.name().to_string();
        let mut progress = Progress::new(sink);
        let mut working =
            self.differentiator
                .differentiate(image.into_working(), scale, [0, 0, 0], &mut progress);
        progress.finish();
        working.set_name(format!("{name} smoothed"));
        Ok(working)
    }
}
