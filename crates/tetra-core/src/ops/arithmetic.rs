//! Element-wise in-place addition with one-directional broadcasting.

use std::ops::AddAssign;

use crate::error::TetraError;
use crate::shape::{linear_index, RANK};
use crate::tensor::Tensor;
use crate::Result;

impl<T: AddAssign + Clone> Tensor<T> {
    /// In-place broadcasting addition: self += other.
    ///
    /// On every axis `other` must either match `self` or have size 1; size-1
    /// axes are broadcast so one element of `other` is added to every slice
    /// of `self` along that axis. `self` is never expanded.
    ///
    /// Shapes are validated before any element is touched, so an error
    /// leaves `self` unchanged. Returns `self` for chaining.
    pub fn add_(&mut self, other: &Tensor<T>) -> Result<&mut Self> {
        if self.is_empty() || other.is_empty() {
            return Err(TetraError::Empty);
        }

        let this_shape = *self.shape();
        let other_shape = *other.shape();

        if let Some(axis) = this_shape.incompatible_axis(&other_shape) {
            tracing::debug!(
                "rejecting broadcast of {} into {} on axis {}",
                other_shape,
                this_shape,
                axis
            );
            return Err(TetraError::BroadcastError {
                this: this_shape.dims().to_vec(),
                other: other_shape.dims().to_vec(),
                axis,
            });
        }

        let src = other.as_slice();
        let dst = self.as_mut_slice();

        // Fast path: identical shapes walk both buffers in lockstep.
        if this_shape == other_shape {
            tracing::trace!("add_ {} (same shape)", this_shape);
            for (d, s) in dst.iter_mut().zip(src.iter()) {
                *d += s.clone();
            }
            return Ok(self);
        }

        tracing::trace!(
            "add_ {} += {} broadcasting axes {:?}",
            this_shape,
            other_shape,
            this_shape.broadcast_axes(&other_shape)
        );

        let this_strides = this_shape.contiguous_strides();
        let other_strides = other_shape.contiguous_strides();
        let other_dims = other_shape.dims();

        for idx in this_shape.indices() {
            let mut other_idx = [0usize; RANK];
            for k in 0..RANK {
                if other_dims[k] > 1 {
                    other_idx[k] = idx[k];
                }
            }
            let d = linear_index(&idx, &this_strides);
            let s = linear_index(&other_idx, &other_strides);
            dst[d] += src[s].clone();
        }

        Ok(self)
    }
}

// Operator overload
impl<T: AddAssign + Clone> AddAssign<&Tensor<T>> for Tensor<T> {
    fn add_assign(&mut self, rhs: &Tensor<T>) {
        if let Err(e) = self.add_(rhs) {
            panic!("AddAssign failed: {e}");
        }
    }
}
