//! Ownership of the float working image.
//!
//! Operators accept anything implementing [`ImageSource`]. Handing over an
//! owned [`FloatImage`] lets the operator compute in that very buffer; a
//! borrowed image of any sample type is converted into a fresh float copy and
//! the caller's image stays untouched. The result records which of the two
//! happened.
use super::axes::{Aspects, Dimensions};
use super::buffer::{FloatImage, Image};
use super::traits::Sample;
use std::ops::{Deref, DerefMut};

/// Float image produced by an operator, tagged with its buffer provenance.
#[derive(Clone, Debug, PartialEq)]
pub enum Working {
    /// The caller's own float buffer, mutated in place.
    Reused(FloatImage),
    /// A new buffer converted from a borrowed input.
    Converted(FloatImage),
}

impl Working {
    pub fn is_reused(&self) -> bool {
        matches!(self, Working::Reused(_))
    }

    pub fn image(&self) -> &FloatImage {
        match self {
            Working::Reused(img) | Working::Converted(img) => img,
        }
    }

    pub fn image_mut(&mut self) -> &mut FloatImage {
        match self {
            Working::Reused(img) | Working::Converted(img) => img,
        }
    }

    pub fn into_image(self) -> FloatImage {
        match self {
            Working::Reused(img) | Working::Converted(img) => img,
        }
    }
}

impl Deref for Working {
    type Target = FloatImage;

    fn deref(&self) -> &FloatImage {
        self.image()
    }
}

impl DerefMut for Working {
    fn deref_mut(&mut self) -> &mut FloatImage {
        self.image_mut()
    }
}

/// Input accepted by the operators.
///
/// Metadata is available before conversion so that arguments can be
/// validated without allocating.
pub trait ImageSource {
    fn dimensions(&self) -> Dimensions;
    fn aspects(&self) -> Aspects;
    fn name(&self) -> &str;
    fn into_working(self) -> Working;
}

impl ImageSource for FloatImage {
    fn dimensions(&self) -> Dimensions {
        Image::dimensions(self)
    }
    fn aspects(&self) -> Aspects {
        Image::aspects(self)
    }
    fn name(&self) -> &str {
        Image::name(self)
    }
    fn into_working(self) -> Working {
        Working::Reused(self)
    }
}

impl<T: Sample> ImageSource for &Image<T> {
    fn dimensions(&self) -> Dimensions {
        Image::dimensions(self)
    }
    fn aspects(&self) -> Aspects {
        Image::aspects(self)
    }
    fn name(&self) -> &str {
        Image::name(self)
    }
    fn into_working(self) -> Working {
        Working::Converted(self.to_float())
    }
}

impl ImageSource for Working {
    fn dimensions(&self) -> Dimensions {
        self.image().dimensions()
    }
    fn aspects(&self) -> Aspects {
        self.image().aspects()
    }
    fn name(&self) -> &str {
        self.image().name()
    }
    fn into_working(self) -> Working {
        self
    }
}
