//! # tetra-core
//!
//! Fixed-rank dense tensor for the Tetra toolkit.
//!
//! Provides the `Tensor<T>` type with:
//! - Exactly four axes, row-major storage (axis 3 varies fastest)
//! - Exclusively-owned buffers (move-only, never implicitly copied)
//! - In-place addition with one-directional broadcasting
//! - Generic element types (anything with `AddAssign`)

pub mod error;
pub mod ops;
pub mod prelude;
pub mod shape;
pub mod tensor;

pub use error::TetraError;
pub use shape::{Odometer, Shape, RANK};
pub use tensor::Tensor;

pub type Result<T> = std::result::Result<T, TetraError>;
