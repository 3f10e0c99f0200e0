#![doc = include_str!("../README.md")]

// Image model and shared plumbing.
pub mod config;
pub mod error;
pub mod image;
pub mod progress;

// Operators.
pub mod differentiator;
pub mod edges;
pub mod hessian;
pub mod laplacian;
pub mod smoother;
pub mod statistics;
pub mod structure;

// Numerical building blocks, public for tools and tests.
pub mod eigen;
pub mod kernel;

// --- High-level re-exports -------------------------------------------------

pub use crate::config::{KernelRadius, Settings};
pub use crate::differentiator::Differentiator;
pub use crate::edges::Edges;
pub use crate::error::{ErrorKind, FeatureError};
pub use crate::hessian::Hessian;
pub use crate::laplacian::Laplacian;
pub use crate::smoother::Smoother;
pub use crate::statistics::{Region, Statistic, Statistics, StatisticsReport};
pub use crate::structure::Structure;

// --- Prelude ---------------------------------------------------------------

/// Small prelude for quick experiments.
///
/// ```no_run
/// use gaussian_features::prelude::*;
///
/// # fn main() -> Result<(), FeatureError> {
/// let img = FloatImage::from_fn(Dimensions::xy(64, 64), |c| ((c.x * c.y) % 7) as f32);
///
/// let edges = Edges::new().run(&img, 2.0, true)?;
/// let mut stats = Statistics::new();
/// stats.run(edges.image())?;
/// println!("mean edge strength {:.3}", stats.get(Statistic::Mean));
/// # Ok(())
/// # }
/// ```
pub mod prelude {
    pub use crate::image::{
        Aspects, Axis, Coordinates, Dimensions, FloatImage, Image, ImageSource, Working,
    };
    pub use crate::progress::ProgressSink;
    pub use crate::{
        Differentiator, Edges, FeatureError, Hessian, Laplacian, Region, Settings, Smoother,
        Statistic, Statistics, Structure,
    };
}
