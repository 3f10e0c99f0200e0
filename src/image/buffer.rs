//! Owned dense 5-D image with per-axis aspects and a display name.
//!
//! Samples are stored contiguously with `x` varying fastest, then `y`, `z`,
//! `t` and `c`. Processing code reads and writes whole lines along one axis
//! through `f64` buffers; the float working type is [`FloatImage`].
use super::axes::{Aspects, Axis, Coordinates, Dimensions};
use super::lines::LineStarts;
use super::traits::Sample;
use crate::error::FeatureError;

#[derive(Clone, Debug, PartialEq)]
pub struct Image<T: Sample> {
    dims: Dimensions,
    aspects: Aspects,
    name: String,
    data: Vec<T>,
}

/// Single-precision working image used by every operator.
pub type FloatImage = Image<f32>;

impl<T: Sample> Image<T> {
    /// Construct a zero-initialized image of the given extent.
    pub fn new(dims: Dimensions) -> Self {
        Self {
            dims,
            aspects: Aspects::default(),
            name: String::new(),
            data: vec![T::default(); dims.len()],
        }
    }

    /// Wrap existing samples laid out in storage order.
    pub fn from_vec(dims: Dimensions, data: Vec<T>) -> Result<Self, FeatureError> {
        if data.len() != dims.len() {
            return Err(FeatureError::DimensionMismatch {
                expected: dims,
                found: data.len(),
            });
        }
        Ok(Self {
            dims,
            aspects: Aspects::default(),
            name: String::new(),
            data,
        })
    }

    /// Build an image by evaluating `f` at every position.
    pub fn from_fn(dims: Dimensions, mut f: impl FnMut(Coordinates) -> T) -> Self {
        let mut img = Self::new(dims);
        for start in LineStarts::new(dims, Axis::X) {
            let base = dims.offset(&start);
            for x in 0..dims.x {
                img.data[base + x] = f(Coordinates { x, ..start });
            }
        }
        img
    }

    pub fn with_aspects(mut self, aspects: Aspects) -> Self {
        self.aspects = aspects;
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    #[inline]
    pub fn dimensions(&self) -> Dimensions {
        self.dims
    }

    #[inline]
    pub fn aspects(&self) -> Aspects {
        self.aspects
    }

    pub fn set_aspects(&mut self, aspects: Aspects) {
        self.aspects = aspects;
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    #[inline]
    pub fn data(&self) -> &[T] {
        &self.data
    }

    #[inline]
    pub fn data_mut(&mut self) -> &mut [T] {
        &mut self.data
    }

    #[inline]
    pub fn get(&self, coords: &Coordinates) -> T {
        self.data[self.dims.offset(coords)]
    }

    #[inline]
    pub fn set(&mut self, coords: &Coordinates, value: T) {
        let i = self.dims.offset(coords);
        self.data[i] = value;
    }

    /// Set every element to `value`.
    pub fn fill(&mut self, value: T) {
        self.data.fill(value);
    }

    /// Start coordinates of every line along `axis`.
    pub fn line_starts(&self, axis: Axis) -> LineStarts {
        LineStarts::new(self.dims, axis)
    }

    /// Copy the line through `start` along `axis` into `out`.
    ///
    /// `out` must hold exactly `dimensions()[axis]` values.
    pub fn read_line(&self, axis: Axis, start: &Coordinates, out: &mut [f64]) {
        debug_assert_eq!(out.len(), self.dims[axis]);
        let stride = self.dims.stride(axis);
        let base = self.dims.offset(start);
        for (i, v) in out.iter_mut().enumerate() {
            *v = self.data[base + i * stride].to_f64();
        }
    }

    /// Overwrite the line through `start` along `axis` with `values`.
    pub fn write_line(&mut self, axis: Axis, start: &Coordinates, values: &[f64]) {
        debug_assert_eq!(values.len(), self.dims[axis]);
        let stride = self.dims.stride(axis);
        let base = self.dims.offset(start);
        for (i, &v) in values.iter().enumerate() {
            self.data[base + i * stride] = T::from_f64(v);
        }
    }

    /// Float copy sharing extent, aspects and name.
    pub fn to_float(&self) -> FloatImage {
        Image {
            dims: self.dims,
            aspects: self.aspects,
            name: self.name.clone(),
            data: self.data.iter().map(|v| v.to_f64() as f32).collect(),
        }
    }
}

impl FloatImage {
    fn check_same_extent(&self, other: &FloatImage) -> Result<(), FeatureError> {
        if self.dims != other.dims {
            return Err(FeatureError::DimensionMismatch {
                expected: self.dims,
                found: other.dims.len(),
            });
        }
        Ok(())
    }

    /// Elementwise `self *= other`.
    pub fn multiply(&mut self, other: &FloatImage) -> Result<(), FeatureError> {
        self.check_same_extent(other)?;
        for (a, &b) in self.data.iter_mut().zip(&other.data) {
            *a *= b;
        }
        Ok(())
    }

    /// Elementwise `self += other`.
    pub fn add(&mut self, other: &FloatImage) -> Result<(), FeatureError> {
        self.check_same_extent(other)?;
        for (a, &b) in self.data.iter_mut().zip(&other.data) {
            *a += b;
        }
        Ok(())
    }

    /// Elementwise square.
    pub fn square(&mut self) {
        for a in &mut self.data {
            *a *= *a;
        }
    }

    /// Smallest and largest sample, or `None` for an empty image.
    pub fn extrema(&self) -> Option<(f32, f32)> {
        self.data.iter().fold(None, |acc, &v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
    }
}
