//! Gradient magnitude from per-axis Gaussian derivative images.
//!
//! The accumulator holds one derivative on entry and the Euclidean norm of
//! all components on return, so the magnitude can be formed without an extra
//! image-sized buffer.
use crate::error::FeatureError;
use crate::image::FloatImage;

/// `acc ← sqrt(acc² + Σ other²)` elementwise.
pub fn magnitude_in_place(acc: &mut FloatImage, others: &[FloatImage]) -> Result<(), FeatureError> {
    for other in others {
        if other.dimensions() != acc.dimensions() {
            return Err(FeatureError::DimensionMismatch {
                expected: acc.dimensions(),
                found: other.dimensions().len(),
            });
        }
    }
    for (i, a) in acc.data_mut().iter_mut().enumerate() {
        let mut sum = (*a as f64) * (*a as f64);
        for other in others {
            let v = other.data()[i] as f64;
            sum += v * v;
        }
        *a = sum.sqrt() as f32;
    }
    Ok(())
}
