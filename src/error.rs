use crate::image::{Axis, Dimensions};

/// Coarse classification of a [`FeatureError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// A caller-supplied argument is out of range.
    InvalidArgument,
    /// The image carries metadata the operation cannot work with.
    InvalidState,
    /// A statistic name did not match any known aggregate.
    UnknownStatistic,
}

/// Reasons why an operation refuses to run.
///
/// Every error is raised before any working buffer is allocated.
#[derive(Clone, Debug, PartialEq)]
pub enum FeatureError {
    NonPositiveScale {
        name: &'static str,
        value: f64,
    },
    OrderOutOfRange {
        axis: Axis,
        order: usize,
        maximum: usize,
    },
    RegionOutOfBounds {
        axis: Axis,
        min: usize,
        max: usize,
        extent: usize,
    },
    MaskMismatch {
        axis: Axis,
        mask: usize,
        region: usize,
    },
    DimensionMismatch {
        expected: Dimensions,
        found: usize,
    },
    NonPositiveAspect {
        axis: Axis,
        value: f64,
    },
    UnknownStatistic(String),
}

impl FeatureError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            FeatureError::NonPositiveAspect { .. } => ErrorKind::InvalidState,
            FeatureError::UnknownStatistic(_) => ErrorKind::UnknownStatistic,
            _ => ErrorKind::InvalidArgument,
        }
    }
}

impl std::fmt::Display for FeatureError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FeatureError::NonPositiveScale { name, value } => {
                write!(f, "{name} must be finite and larger than 0 (got {value})")
            }
            FeatureError::OrderOutOfRange {
                axis,
                order,
                maximum,
            } => write!(
                f,
                "differentiation order {order} in {axis}-dimension exceeds {maximum}"
            ),
            FeatureError::RegionOutOfBounds {
                axis,
                min,
                max,
                extent,
            } => write!(
                f,
                "region [{min}, {max}] in {axis}-dimension is invalid for extent {extent}"
            ),
            FeatureError::MaskMismatch { axis, mask, region } => write!(
                f,
                "mask extent {mask} in {axis}-dimension is neither 1 nor the region extent {region}"
            ),
            FeatureError::DimensionMismatch { expected, found } => write!(
                f,
                "expected {} elements for dimensions {expected}, found {found}",
                expected.len()
            ),
            FeatureError::NonPositiveAspect { axis, value } => write!(
                f,
                "aspect-ratio value in {axis}-dimension not finite and positive (got {value})"
            ),
            FeatureError::UnknownStatistic(name) => write!(f, "unknown statistic \"{name}\""),
        }
    }
}

impl std::error::Error for FeatureError {}
