use std::fmt;

use crate::error::TetraError;
use crate::Result;

/// Number of axes every tensor carries.
pub const RANK: usize = 4;

/// Fixed-rank tensor shape.
///
/// Axis order is significant: axis 3 is the innermost (fastest-varying)
/// dimension in storage. Every axis of a valid shape is at least 1; the only
/// shape with zero-sized axes is the placeholder held by a tensor whose buffer
/// has been transferred out.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Shape {
    dims: [usize; RANK],
}

impl Shape {
    /// Create a new shape, rejecting zero-sized axes and element counts
    /// that overflow `usize`.
    pub fn new(dims: [usize; RANK]) -> Result<Self> {
        if let Some(axis) = dims.iter().position(|&d| d == 0) {
            return Err(TetraError::ZeroDim {
                axis,
                shape: dims.to_vec(),
            });
        }
        dims.iter()
            .try_fold(1usize, |acc, &d| acc.checked_mul(d))
            .ok_or_else(|| TetraError::Overflow {
                shape: dims.to_vec(),
            })?;
        Ok(Self { dims })
    }

    /// Placeholder shape of a tensor that no longer owns a buffer.
    pub(crate) fn empty() -> Self {
        Self { dims: [0; RANK] }
    }

    /// Whether this is the placeholder shape (no elements).
    pub fn is_empty(&self) -> bool {
        self.dims.iter().any(|&d| d == 0)
    }

    /// Total number of elements.
    pub fn numel(&self) -> usize {
        self.dims.iter().product()
    }

    /// Get dimension sizes.
    pub fn dims(&self) -> [usize; RANK] {
        self.dims
    }

    /// Get size of a specific axis.
    pub fn dim(&self, axis: usize) -> Option<usize> {
        self.dims.get(axis).copied()
    }

    /// Compute strides for a contiguous row-major layout.
    pub fn contiguous_strides(&self) -> [usize; RANK] {
        let mut strides = [1usize; RANK];
        for i in (0..RANK - 1).rev() {
            strides[i] = strides[i + 1] * self.dims[i + 1];
        }
        strides
    }

    /// First axis on which `other` cannot be broadcast into `self`.
    ///
    /// Broadcasting only runs one way: `other` may have size 1 where `self`
    /// is larger, never the reverse. Returns `None` when every axis is either
    /// equal or 1 in `other`.
    pub fn incompatible_axis(&self, other: &Shape) -> Option<usize> {
        (0..RANK).find(|&i| other.dims[i] != self.dims[i] && other.dims[i] != 1)
    }

    /// Axes along which a single element of `other` is shared by many of `self`.
    pub fn broadcast_axes(&self, other: &Shape) -> Vec<usize> {
        (0..RANK)
            .filter(|&i| other.dims[i] == 1 && self.dims[i] > 1)
            .collect()
    }

    /// Iterate every index of this shape in storage order.
    pub fn indices(&self) -> Odometer {
        Odometer::new(self)
    }
}

/// Dot product of a multi-index with a stride vector.
pub fn linear_index(index: &[usize; RANK], strides: &[usize; RANK]) -> usize {
    index.iter().zip(strides.iter()).map(|(i, s)| i * s).sum()
}

impl fmt::Debug for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Shape({:?})", self.dims)
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, d) in self.dims.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{d}")?;
        }
        write!(f, "]")
    }
}

impl TryFrom<[usize; RANK]> for Shape {
    type Error = TetraError;

    fn try_from(dims: [usize; RANK]) -> Result<Self> {
        Shape::new(dims)
    }
}

impl TryFrom<&[usize]> for Shape {
    type Error = TetraError;

    fn try_from(dims: &[usize]) -> Result<Self> {
        let dims: [usize; RANK] = dims
            .try_into()
            .map_err(|_| TetraError::InvalidRank { got: dims.len() })?;
        Shape::new(dims)
    }
}

/// Mixed-radix counter over the index space of a shape.
///
/// Starts at all zeros, advances axis 3 first and carries into slower axes on
/// overflow. Iteration ends once axis 0 overflows.
#[derive(Debug, Clone)]
pub struct Odometer {
    dims: [usize; RANK],
    next: Option<[usize; RANK]>,
    remaining: usize,
}

impl Odometer {
    pub fn new(shape: &Shape) -> Self {
        let remaining = shape.numel();
        Self {
            dims: shape.dims,
            next: (remaining > 0).then_some([0; RANK]),
            remaining,
        }
    }
}

impl Iterator for Odometer {
    type Item = [usize; RANK];

    fn next(&mut self) -> Option<[usize; RANK]> {
        let current = self.next?;
        let mut idx = current;
        self.next = None;
        for axis in (0..RANK).rev() {
            idx[axis] += 1;
            if idx[axis] < self.dims[axis] {
                self.next = Some(idx);
                break;
            }
            idx[axis] = 0;
        }
        self.remaining -= 1;
        Some(current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Odometer {}
