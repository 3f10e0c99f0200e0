//! Enumeration of 1-D lines through a 5-D grid.
//!
//! A line along `axis` is identified by its start coordinates, which carry 0
//! on `axis` and any valid value on the other four axes. [`LineStarts`]
//! produces every start by decomposing a flat counter over the remaining
//! axes, so no mutable cursor is shared between passes.
use super::axes::{Axis, Coordinates, Dimensions};

/// Iterator over the start coordinates of all lines along one axis.
#[derive(Clone, Debug)]
pub struct LineStarts {
    dims: Dimensions,
    axis: Axis,
    next: usize,
    total: usize,
}

impl LineStarts {
    pub fn new(dims: Dimensions, axis: Axis) -> Self {
        let total = if dims.is_empty() {
            0
        } else {
            dims.len() / dims[axis]
        };
        Self {
            dims,
            axis,
            next: 0,
            total,
        }
    }
}

impl Iterator for LineStarts {
    type Item = Coordinates;

    fn next(&mut self) -> Option<Coordinates> {
        if self.next >= self.total {
            return None;
        }
        let mut rest = self.next;
        self.next += 1;
        let mut coords = Coordinates::default();
        for a in Axis::ALL {
            if a == self.axis {
                continue;
            }
            let extent = self.dims[a];
            coords[a] = rest % extent;
            rest /= extent;
        }
        Some(coords)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.total - self.next;
        (left, Some(left))
    }
}

impl ExactSizeIterator for LineStarts {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn visits_every_line_once() {
        let dims = Dimensions::new(3, 4, 2, 1, 2);
        for axis in Axis::ALL {
            let starts: Vec<_> = LineStarts::new(dims, axis).collect();
            assert_eq!(starts.len(), dims.len() / dims[axis]);
            assert!(starts.iter().all(|c| c[axis] == 0));
            let unique: HashSet<_> = starts.iter().map(|c| dims.offset(c)).collect();
            assert_eq!(unique.len(), starts.len());
        }
    }

    #[test]
    fn x_lines_vary_y_fastest() {
        let dims = Dimensions::xy(5, 3);
        let ys: Vec<_> = LineStarts::new(dims, Axis::X).map(|c| c.y).collect();
        assert_eq!(ys, vec![0, 1, 2]);
    }
}
