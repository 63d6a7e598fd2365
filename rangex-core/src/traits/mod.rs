//! Abstract interfaces for the range index
//!
//! Traits are pure interfaces. The only implementations provided here are
//! for the primitive numeric types.

pub mod bound;

pub use bound::Bound;
