//! Convenience re-exports for common tetra-core types.
//!
//! ```rust
//! use tetra_core::prelude::*;
//! ```

pub use crate::Result;
pub use crate::Shape;
pub use crate::Tensor;
pub use crate::TetraError;
