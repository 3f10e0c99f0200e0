//! Aggregate statistics over an image, an optional region and an optional
//! mask.
//!
//! Two passes over the included elements: the first collects the count, the
//! extrema and the raw power sums; the second fills a [`ValueHistogram`] over
//! `[min, max]` for the median and mode and sums absolute deviations from the
//! mean. All arithmetic is in `f64` regardless of the sample type.

mod histogram;

#[cfg(test)]
mod tests;

use crate::config::Settings;
use crate::error::FeatureError;
use crate::image::{Axis, Coordinates, Dimensions, Image, LineStarts, Sample};
use crate::progress::{Progress, ProgressSink, Silent};
use histogram::ValueHistogram;
use log::{debug, warn};
use serde::Serialize;
use std::str::FromStr;

/// Aggregates computed by [`Statistics::run`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Statistic {
    Minimum,
    Maximum,
    Mean,
    Median,
    Elements,
    Mass,
    Variance,
    Mode,
    SDeviation,
    ADeviation,
    L1Norm,
    L2Norm,
    Skewness,
    Kurtosis,
}

impl Statistic {
    pub const ALL: [Statistic; 14] = [
        Statistic::Minimum,
        Statistic::Maximum,
        Statistic::Mean,
        Statistic::Median,
        Statistic::Elements,
        Statistic::Mass,
        Statistic::Variance,
        Statistic::Mode,
        Statistic::SDeviation,
        Statistic::ADeviation,
        Statistic::L1Norm,
        Statistic::L2Norm,
        Statistic::Skewness,
        Statistic::Kurtosis,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Statistic::Minimum => "minimum",
            Statistic::Maximum => "maximum",
            Statistic::Mean => "mean",
            Statistic::Median => "median",
            Statistic::Elements => "elements",
            Statistic::Mass => "mass",
            Statistic::Variance => "variance",
            Statistic::Mode => "mode",
            Statistic::SDeviation => "sdeviation",
            Statistic::ADeviation => "adeviation",
            Statistic::L1Norm => "l1norm",
            Statistic::L2Norm => "l2norm",
            Statistic::Skewness => "skewness",
            Statistic::Kurtosis => "kurtosis",
        }
    }
}

impl std::fmt::Display for Statistic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Statistic {
    type Err = FeatureError;

    /// Case-insensitive lookup by [`Statistic::name`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Statistic::ALL
            .into_iter()
            .find(|kind| kind.name() == wanted)
            .ok_or_else(|| FeatureError::UnknownStatistic(s.to_string()))
    }
}

/// Inclusive box of coordinates restricting a statistics run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Region {
    pub min: Coordinates,
    pub max: Coordinates,
}

impl Region {
    pub fn new(min: Coordinates, max: Coordinates) -> Self {
        Self { min, max }
    }

    /// Region spanning every element of `dims`. Empty extents are not
    /// representable and yield a region that fails validation.
    pub fn whole(dims: Dimensions) -> Self {
        let last = dims.to_array().map(|n| n.saturating_sub(1));
        Self {
            min: Coordinates::default(),
            max: Coordinates::from_array(last),
        }
    }

    /// Number of positions spanned along each axis.
    pub fn extent(&self) -> Dimensions {
        let mut extent = [0; 5];
        for axis in Axis::ALL {
            extent[axis.index()] = self.max[axis] + 1 - self.min[axis];
        }
        Dimensions::from_array(extent)
    }

    fn validate(&self, dims: &Dimensions) -> Result<(), FeatureError> {
        for axis in Axis::ALL {
            let (min, max, extent) = (self.min[axis], self.max[axis], dims[axis]);
            if min > max || max >= extent {
                return Err(FeatureError::RegionOutOfBounds {
                    axis,
                    min,
                    max,
                    extent,
                });
            }
        }
        Ok(())
    }
}

/// Result of the most recent statistics run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatisticsReport {
    pub minimum: f64,
    pub maximum: f64,
    pub mean: f64,
    pub median: f64,
    pub elements: u64,
    pub mass: f64,
    pub variance: f64,
    pub mode: f64,
    pub sdeviation: f64,
    pub adeviation: f64,
    pub l1norm: f64,
    pub l2norm: f64,
    pub skewness: f64,
    pub kurtosis: f64,
}

impl StatisticsReport {
    pub fn get(&self, kind: Statistic) -> f64 {
        match kind {
            Statistic::Minimum => self.minimum,
            Statistic::Maximum => self.maximum,
            Statistic::Mean => self.mean,
            Statistic::Median => self.median,
            Statistic::Elements => self.elements as f64,
            Statistic::Mass => self.mass,
            Statistic::Variance => self.variance,
            Statistic::Mode => self.mode,
            Statistic::SDeviation => self.sdeviation,
            Statistic::ADeviation => self.adeviation,
            Statistic::L1Norm => self.l1norm,
            Statistic::L2Norm => self.l2norm,
            Statistic::Skewness => self.skewness,
            Statistic::Kurtosis => self.kurtosis,
        }
    }
}

/// Raw sums collected in the first pass.
#[derive(Default)]
struct Moments {
    count: u64,
    sum: f64,
    sum2: f64,
    sum3: f64,
    sum4: f64,
    sum_abs: f64,
    min: f64,
    max: f64,
}

impl Moments {
    fn accumulate(&mut self, v: f64) {
        if self.count == 0 {
            self.min = v;
            self.max = v;
        } else {
            self.min = self.min.min(v);
            self.max = self.max.max(v);
        }
        self.count += 1;
        let v2 = v * v;
        self.sum += v;
        self.sum2 += v2;
        self.sum3 += v2 * v;
        self.sum4 += v2 * v2;
        self.sum_abs += v.abs();
    }
}

/// Image statistics calculator holding the result of its last run.
#[derive(Clone, Debug, Default)]
pub struct Statistics {
    settings: Settings,
    report: StatisticsReport,
}

impl Statistics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(settings: Settings) -> Self {
        Self {
            settings,
            report: StatisticsReport::default(),
        }
    }

    /// Statistics of every element.
    pub fn run<T: Sample>(&mut self, image: &Image<T>) -> Result<&StatisticsReport, FeatureError> {
        self.run_with_progress::<T, u8>(image, None, None, &mut Silent)
    }

    /// Statistics of the elements inside `region`.
    pub fn run_region<T: Sample>(
        &mut self,
        image: &Image<T>,
        region: Region,
    ) -> Result<&StatisticsReport, FeatureError> {
        self.run_with_progress::<T, u8>(image, Some(region), None, &mut Silent)
    }

    /// Statistics of the elements inside `region` (default: whole image)
    /// where `mask` is non-zero.
    pub fn run_masked<T: Sample, M: Sample>(
        &mut self,
        image: &Image<T>,
        region: Option<Region>,
        mask: &Image<M>,
    ) -> Result<&StatisticsReport, FeatureError> {
        self.run_with_progress(image, region, Some(mask), &mut Silent)
    }

    /// General entry point. The previous result is kept when validation
    /// fails.
    pub fn run_with_progress<T: Sample, M: Sample>(
        &mut self,
        image: &Image<T>,
        region: Option<Region>,
        mask: Option<&Image<M>>,
        sink: &mut dyn ProgressSink,
    ) -> Result<&StatisticsReport, FeatureError> {
        let dims = image.dimensions();
        let whole = region.is_none();
        let region = region.unwrap_or_else(|| Region::whole(dims));
        debug!(
            "Statistics: {} image {dims}, region {:?} to {:?}",
            T::LABEL,
            region.min.to_array(),
            region.max.to_array()
        );
        // An empty image has no valid region; as a whole it is an empty selection.
        let extent = if whole && dims.is_empty() {
            dims
        } else {
            region.validate(&dims)?;
            region.extent()
        };
        let mask = match mask {
            Some(m) => Some(MaskView::new(m, &extent)?),
            None => None,
        };

        let mut progress = Progress::new(sink);
        if extent.is_empty() {
            warn!("Statistics: empty image {dims}, every aggregate is 0");
            self.report = StatisticsReport::default();
            progress.finish();
            return Ok(&self.report);
        }
        let visitor = Visitor {
            image,
            region: &region,
            extent,
            mask: mask.as_ref(),
        };

        debug!("Collecting moments");
        let mut moments = Moments::default();
        visitor.visit(&mut progress.sub(0.0, 0.5), |v| moments.accumulate(v));

        if moments.count == 0 {
            warn!("Statistics: no elements included, every aggregate is 0");
            self.report = StatisticsReport::default();
            progress.finish();
            return Ok(&self.report);
        }

        let n = moments.count as f64;
        let mean = moments.sum / n;

        debug!("Building histogram");
        let mut histogram =
            ValueHistogram::new(self.settings.histogram_bins, moments.min, moments.max);
        let mut sum_dev = 0.0;
        visitor.visit(&mut progress.sub(0.5, 1.0), |v| {
            histogram.accumulate(v);
            sum_dev += (v - mean).abs();
        });
        progress.finish();

        let ex2 = moments.sum2 / n;
        let ex3 = moments.sum3 / n;
        let ex4 = moments.sum4 / n;
        let mean2 = mean * mean;
        let variance = (ex2 - mean2).max(0.0);
        let (skewness, kurtosis) = if variance > 0.0 {
            let m3 = ex3 - 3.0 * mean * ex2 + 2.0 * mean2 * mean;
            let m4 = ex4 - 4.0 * mean * ex3 + 6.0 * mean2 * ex2 - 3.0 * mean2 * mean2;
            (
                m3 / (variance * variance.sqrt()),
                m4 / (variance * variance) - 3.0,
            )
        } else {
            (0.0, 0.0)
        };
        let round = |v: f64| if T::INTEGRAL { v.round() } else { v };

        self.report = StatisticsReport {
            minimum: moments.min,
            maximum: moments.max,
            mean,
            median: round(histogram.median(moments.count)),
            elements: moments.count,
            mass: moments.sum,
            variance,
            mode: round(histogram.mode()),
            sdeviation: variance.sqrt(),
            adeviation: sum_dev / n,
            l1norm: moments.sum_abs,
            l2norm: moments.sum2.sqrt(),
            skewness,
            kurtosis,
        };
        Ok(&self.report)
    }

    /// Value of `kind` from the last run; all zero before the first run.
    pub fn get(&self, kind: Statistic) -> f64 {
        self.report.get(kind)
    }

    /// Value of the statistic called `name` (case-insensitive).
    pub fn get_named(&self, name: &str) -> Result<f64, FeatureError> {
        Ok(self.get(name.parse()?))
    }

    pub fn report(&self) -> &StatisticsReport {
        &self.report
    }
}

/// Mask with per-axis strides; extent-1 axes broadcast with stride 0.
struct MaskView {
    flags: Vec<bool>,
    strides: [usize; 5],
}

impl MaskView {
    fn new<M: Sample>(mask: &Image<M>, region: &Dimensions) -> Result<Self, FeatureError> {
        let dims = mask.dimensions();
        let mut strides = [0; 5];
        for axis in Axis::ALL {
            let (m, r) = (dims[axis], region[axis]);
            if m == r {
                strides[axis.index()] = dims.stride(axis);
            } else if m != 1 {
                return Err(FeatureError::MaskMismatch {
                    axis,
                    mask: m,
                    region: r,
                });
            }
        }
        let flags = mask.data().iter().map(|v| v.to_f64() != 0.0).collect();
        Ok(Self { flags, strides })
    }

    /// Whether the element at `rel` (relative to the region origin) counts.
    fn includes(&self, rel: &Coordinates) -> bool {
        let offset: usize = rel
            .to_array()
            .iter()
            .zip(&self.strides)
            .map(|(c, s)| c * s)
            .sum();
        self.flags[offset]
    }
}

struct Visitor<'a, T: Sample> {
    image: &'a Image<T>,
    region: &'a Region,
    extent: Dimensions,
    mask: Option<&'a MaskView>,
}

impl<T: Sample> Visitor<'_, T> {
    /// Feed every included value, line by line along x, to `f`.
    fn visit(&self, progress: &mut Progress<'_>, mut f: impl FnMut(f64)) {
        let dims = self.image.dimensions();
        let data = self.image.data();
        let starts = LineStarts::new(self.extent, Axis::X);
        progress.steps(starts.len());
        for rel in starts {
            let mut abs = rel;
            for axis in Axis::ALL {
                abs[axis] += self.region.min[axis];
            }
            let base = dims.offset(&abs);
            for x in 0..self.extent.x {
                if let Some(mask) = self.mask {
                    if !mask.includes(&Coordinates { x, ..rel }) {
                        continue;
                    }
                }
                f(data[base + x].to_f64());
            }
            progress.step();
        }
    }
}
