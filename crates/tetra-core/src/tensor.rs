use std::fmt;

use crate::error::TetraError;
use crate::shape::{Shape, RANK};
use crate::Result;

/// A four-axis dense tensor that exclusively owns its buffer.
///
/// Storage is contiguous and row-major with axis 3 varying fastest. The type
/// is not `Clone`: a buffer has exactly one owner, and handing it
/// to another `Tensor` is a move. [`Tensor::take`] performs the transfer
/// explicitly and leaves the source empty.
///
/// # Examples
///
/// ```
/// use tetra_core::Tensor;
///
/// let mut t = Tensor::new([1, 1, 2, 2], &[1, 2, 3, 4]).unwrap();
/// let bias = Tensor::new([1, 1, 1, 2], &[10, 20]).unwrap();
/// t.add_(&bias).unwrap();
/// assert_eq!(t.as_slice(), &[11, 22, 13, 24]);
/// ```
pub struct Tensor<T> {
    shape: Shape,
    data: Vec<T>,
}

impl<T> Tensor<T> {
    // =========================================================================
    // Constructors
    // =========================================================================

    /// Create a tensor by copying the first `∏dims` elements of `data`.
    ///
    /// Fails if any axis is zero, the element count overflows `usize`, or
    /// `data` holds fewer elements than the shape requires. Surplus trailing elements are ignored.
    pub fn new(dims: [usize; RANK], data: &[T]) -> Result<Self>
    where
        T: Clone,
    {
        let shape = Shape::new(dims)?;
        let numel = shape.numel();
        if data.len() < numel {
            return Err(TetraError::BufferTooShort {
                expected: numel,
                got: data.len(),
            });
        }
        if data.len() > numel {
            tracing::debug!(
                "ignoring {} surplus source elements for shape {}",
                data.len() - numel,
                shape
            );
        }
        Ok(Self {
            shape,
            data: data[..numel].to_vec(),
        })
    }

    /// Create a tensor that takes ownership of an exactly-sized buffer.
    pub fn from_vec(dims: [usize; RANK], data: Vec<T>) -> Result<Self> {
        let shape = Shape::new(dims)?;
        if data.len() != shape.numel() {
            return Err(TetraError::LengthMismatch {
                expected: shape.numel(),
                got: data.len(),
            });
        }
        Ok(Self { shape, data })
    }

    /// Create a tensor with every element set to `value`.
    pub fn full(dims: [usize; RANK], value: T) -> Result<Self>
    where
        T: Clone,
    {
        let shape = Shape::new(dims)?;
        Ok(Self {
            data: vec![value; shape.numel()],
            shape,
        })
    }

    /// Create a tensor of `T::default()` values.
    pub fn zeros(dims: [usize; RANK]) -> Result<Self>
    where
        T: Clone + Default,
    {
        Self::full(dims, T::default())
    }

    // =========================================================================
    // Properties
    // =========================================================================

    /// Shape of the tensor.
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// Dimension sizes.
    pub fn dims(&self) -> [usize; RANK] {
        self.shape.dims()
    }

    /// Total number of elements.
    pub fn numel(&self) -> usize {
        self.data.len()
    }

    /// Row-major strides (in elements).
    pub fn strides(&self) -> [usize; RANK] {
        self.shape.contiguous_strides()
    }

    /// Whether the buffer has been transferred out of this tensor.
    pub fn is_empty(&self) -> bool {
        self.shape.is_empty()
    }

    // =========================================================================
    // Data access
    // =========================================================================

    /// The underlying buffer in storage order.
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    pub(crate) fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Element at a multi-dimensional index, or `None` if out of bounds.
    pub fn get(&self, index: [usize; RANK]) -> Option<&T> {
        let dims = self.shape.dims();
        if index.iter().zip(dims.iter()).any(|(&i, &d)| i >= d) {
            return None;
        }
        let strides = self.strides();
        self.data.get(crate::shape::linear_index(&index, &strides))
    }

    /// Consume the tensor and return its buffer.
    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    // =========================================================================
    // Ownership
    // =========================================================================

    /// Move the buffer and shape into a new tensor, leaving `self` empty.
    ///
    /// The emptied tensor is safe to drop; arithmetic on it fails with
    /// [`TetraError::Empty`].
    pub fn take(&mut self) -> Tensor<T> {
        std::mem::take(self)
    }
}

impl<T> Default for Tensor<T> {
    /// An empty tensor that owns no buffer.
    fn default() -> Self {
        Self {
            shape: Shape::empty(),
            data: Vec::new(),
        }
    }
}

impl<T> fmt::Debug for Tensor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Tensor(shape={}, numel={}, empty={})",
            self.shape,
            self.numel(),
            self.is_empty()
        )
    }
}

impl<T: fmt::Debug> fmt::Display for Tensor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "tensor(<moved>)");
        }
        let n = self.numel();
        if n <= 24 {
            write!(f, "tensor({:?}, shape={})", self.data, self.shape)
        } else {
            write!(
                f,
                "tensor([{:?}, {:?}, ..., {:?}], shape={})",
                self.data[0],
                self.data[1],
                self.data[n - 1],
                self.shape
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_copy_in_fidelity() {
        let data: Vec<i32> = (1..=24).collect();
        let t = Tensor::new([1, 2, 3, 4], &data).unwrap();
        assert_eq!(t.as_slice(), data.as_slice());
        assert_eq!(t.numel(), 24);
        assert_eq!(t.dims(), [1, 2, 3, 4]);
        assert_eq!(t.strides(), [24, 12, 4, 1]);
    }

    #[test]
    fn test_source_not_aliased() {
        let mut data = vec![1.0f32, 2.0, 3.0, 4.0];
        let t = Tensor::new([1, 1, 2, 2], &data).unwrap();
        data[0] = 99.0;
        assert_eq!(t.as_slice(), &[1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_buffer_too_short() {
        let err = Tensor::new([1, 2, 3, 4], &[1u8; 23]).unwrap_err();
        assert_eq!(err, TetraError::BufferTooShort { expected: 24, got: 23 });
    }

    #[test]
    fn test_surplus_ignored() {
        let t = Tensor::new([1, 1, 1, 2], &[1, 2, 3, 4]).unwrap();
        assert_eq!(t.as_slice(), &[1, 2]);
    }

    #[test]
    fn test_zero_dim_rejected() {
        let err = Tensor::<f64>::new([1, 0, 1, 1], &[]).unwrap_err();
        assert!(matches!(err, TetraError::ZeroDim { axis: 1, .. }));
    }

    #[test]
    fn test_overflowing_shape_rejected() {
        let err = Tensor::new([usize::MAX, 2, 1, 1], &[1i32, 2]).unwrap_err();
        assert!(matches!(err, TetraError::Overflow { .. }));

        let err = Tensor::<u8>::new([1 << (usize::BITS - 1), 2, 1, 1], &[]).unwrap_err();
        assert!(matches!(err, TetraError::Overflow { .. }));

        assert!(Tensor::<u8>::zeros([usize::MAX, usize::MAX, 1, 1]).is_err());
    }

    #[test]
    fn test_from_vec_length_mismatch() {
        let err = Tensor::from_vec([1, 1, 2, 2], vec![1, 2, 3]).unwrap_err();
        assert_eq!(err, TetraError::LengthMismatch { expected: 4, got: 3 });
    }

    #[test]
    fn test_full_and_zeros() {
        let t = Tensor::full([1, 1, 2, 3], 7i64).unwrap();
        assert_eq!(t.as_slice(), &[7; 6]);
        let z = Tensor::<f32>::zeros([2, 1, 1, 1]).unwrap();
        assert_eq!(z.as_slice(), &[0.0, 0.0]);
    }

    #[test]
    fn test_get() {
        let data: Vec<i32> = (0..24).collect();
        let t = Tensor::new([1, 2, 3, 4], &data).unwrap();
        assert_eq!(t.get([0, 0, 0, 0]), Some(&0));
        assert_eq!(t.get([0, 1, 2, 3]), Some(&23));
        assert_eq!(t.get([0, 1, 0, 2]), Some(&14));
        assert_eq!(t.get([0, 0, 3, 0]), None);
        assert_eq!(t.get([1, 0, 0, 0]), None);
    }

    #[test]
    fn test_take_leaves_source_empty() {
        let mut a = Tensor::new([1, 1, 1, 3], &[1, 2, 3]).unwrap();
        let b = a.take();
        assert!(a.is_empty());
        assert_eq!(a.numel(), 0);
        assert!(a.as_slice().is_empty());
        assert_eq!(b.as_slice(), &[1, 2, 3]);
        assert_eq!(b.dims(), [1, 1, 1, 3]);
        // Taking again from an empty tensor yields another empty tensor.
        assert!(a.take().is_empty());
    }

    #[test]
    fn test_move_transfers_buffer() {
        let a = Tensor::new([1, 1, 1, 2], &[5u32, 6]).unwrap();
        let ptr = a.as_slice().as_ptr();
        let b = a;
        assert_eq!(b.as_slice().as_ptr(), ptr);
        assert_eq!(b.into_vec(), vec![5, 6]);
    }

    #[test]
    fn test_display() {
        let t = Tensor::new([1, 1, 1, 2], &[1, 2]).unwrap();
        assert_eq!(format!("{t}"), "tensor([1, 2], shape=[1, 1, 1, 2])");
        assert_eq!(
            format!("{t:?}"),
            "Tensor(shape=[1, 1, 1, 2], numel=2, empty=false)"
        );
        let e = Tensor::<i32>::default();
        assert_eq!(format!("{e}"), "tensor(<moved>)");
    }
}
