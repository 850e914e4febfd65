//! Exact number types used by the equation algebra.

mod proptests;
pub mod rational;
pub mod scalar;
