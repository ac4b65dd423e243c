//! Tensor operations.
//!
//! In-place variants are suffixed with `_` (e.g., `add_`).

pub mod arithmetic;
