//! N-dimensional image model: `(x, y, z, t, c)` extents, element aspects,
//! axis-aware line access and the float working-copy ownership rules.
pub mod axes;
pub mod buffer;
pub mod io;
pub mod lines;
pub mod traits;
pub mod working;

pub use self::axes::{Aspects, Axis, Coordinates, Dimensions};
pub use self::buffer::{FloatImage, Image};
pub use self::lines::LineStarts;
pub use self::traits::Sample;
pub use self::working::{ImageSource, Working};
