//! Axis-indexed value bundles: dimensions, coordinates and element aspects.
//!
//! All three share the fixed `(x, y, z, t, c)` layout and can be indexed by
//! [`Axis`]. Storage order of an image follows the same layout with `x`
//! varying fastest.
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Index, IndexMut};

/// One of the five logical image axes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X,
    Y,
    Z,
    T,
    C,
}

impl Axis {
    /// All axes in storage order.
    pub const ALL: [Axis; 5] = [Axis::X, Axis::Y, Axis::Z, Axis::T, Axis::C];
    /// The spatial axes in the order the differentiation passes visit them.
    pub const SPATIAL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    #[inline]
    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
            Axis::T => 3,
            Axis::C => 4,
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Axis::X => "x",
            Axis::Y => "y",
            Axis::Z => "z",
            Axis::T => "t",
            Axis::C => "c",
        };
        f.write_str(name)
    }
}

macro_rules! axis_bundle {
    ($(#[$meta:meta])* $name:ident, $ty:ty) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
        pub struct $name {
            pub x: $ty,
            pub y: $ty,
            pub z: $ty,
            pub t: $ty,
            pub c: $ty,
        }

        impl $name {
            pub const fn new(x: $ty, y: $ty, z: $ty, t: $ty, c: $ty) -> Self {
                Self { x, y, z, t, c }
            }

            /// Values in storage order.
            pub fn to_array(&self) -> [$ty; 5] {
                [self.x, self.y, self.z, self.t, self.c]
            }

            pub fn from_array(a: [$ty; 5]) -> Self {
                Self::new(a[0], a[1], a[2], a[3], a[4])
            }
        }

        impl Index<Axis> for $name {
            type Output = $ty;

            #[inline]
            fn index(&self, axis: Axis) -> &$ty {
                match axis {
                    Axis::X => &self.x,
                    Axis::Y => &self.y,
                    Axis::Z => &self.z,
                    Axis::T => &self.t,
                    Axis::C => &self.c,
                }
            }
        }

        impl IndexMut<Axis> for $name {
            #[inline]
            fn index_mut(&mut self, axis: Axis) -> &mut $ty {
                match axis {
                    Axis::X => &mut self.x,
                    Axis::Y => &mut self.y,
                    Axis::Z => &mut self.z,
                    Axis::T => &mut self.t,
                    Axis::C => &mut self.c,
                }
            }
        }
    };
}

axis_bundle!(
    /// Image extent per axis. Every extent is at least 1 for a valid image.
    Dimensions,
    usize
);

axis_bundle!(
    /// A position in a 5-D image.
    Coordinates,
    usize
);

axis_bundle!(
    /// Physical size of one element step along each axis.
    Aspects,
    f64
);

impl Eq for Dimensions {}
impl Eq for Coordinates {}

impl Dimensions {
    /// Shorthand for a single-plane 2-D image.
    pub const fn xy(x: usize, y: usize) -> Self {
        Self::new(x, y, 1, 1, 1)
    }

    /// Shorthand for a single-volume 3-D image.
    pub const fn xyz(x: usize, y: usize, z: usize) -> Self {
        Self::new(x, y, z, 1, 1)
    }

    /// Total number of elements.
    pub fn len(&self) -> usize {
        self.x * self.y * self.z * self.t * self.c
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Distance in elements between neighbours along `axis`.
    pub fn stride(&self, axis: Axis) -> usize {
        let a = self.to_array();
        a[..axis.index()].iter().product()
    }

    /// Linear offset of `coords` in storage order.
    #[inline]
    pub fn offset(&self, coords: &Coordinates) -> usize {
        coords.x + self.x * (coords.y + self.y * (coords.z + self.z * (coords.t + self.t * coords.c)))
    }
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{},{},{},{})", self.x, self.y, self.z, self.t, self.c)
    }
}

impl Default for Coordinates {
    fn default() -> Self {
        Self::new(0, 0, 0, 0, 0)
    }
}

impl Default for Aspects {
    fn default() -> Self {
        Self::new(1.0, 1.0, 1.0, 1.0, 1.0)
    }
}

impl fmt::Display for Aspects {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{},{},{},{})", self.x, self.y, self.z, self.t, self.c)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offsets_follow_storage_order() {
        let dims = Dimensions::new(4, 3, 2, 2, 2);
        assert_eq!(dims.stride(Axis::X), 1);
        assert_eq!(dims.stride(Axis::Y), 4);
        assert_eq!(dims.stride(Axis::Z), 12);
        assert_eq!(dims.stride(Axis::C), 48);
        let c = Coordinates::new(1, 2, 1, 0, 1);
        assert_eq!(dims.offset(&c), 1 + 2 * 4 + 12 + 48);
        assert_eq!(dims.len(), 96);
    }

    #[test]
    fn axis_indexing_round_trips() {
        let mut coords = Coordinates::default();
        for (i, axis) in Axis::ALL.into_iter().enumerate() {
            coords[axis] = i + 10;
        }
        assert_eq!(coords.to_array(), [10, 11, 12, 13, 14]);
    }
}
