//! Bound types that can be stored in range files
//!
//! Builds on [`rangex_core::Bound`] with what the collaborators need:
//! a file tag, byte-level casting for memory-mapped columns, text and
//! JSON round-tripping, and conversion from the generator's `f64` samples.

use std::fmt::{Debug, Display};
use std::str::FromStr;

use rangex_core::{Bound, DataType};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Bound type with a stable on-disk representation
pub trait StoredBound:
    Bound + bytemuck::Pod + FromStr + Display + Debug + Serialize + DeserializeOwned + Send + Sync + 'static
{
    /// File tag for this type
    fn data_type() -> DataType;

    /// Convert from f64 for generated data (saturating for integers)
    fn from_f64(value: f64) -> Self;

    /// Convert to f64 for reporting and query sampling
    fn to_f64(self) -> f64;

    /// Raw bit pattern, zero-extended to 64 bits
    fn to_bits_u64(self) -> u64;
}

macro_rules! impl_stored_bound {
    ($type:ty, $variant:ident, $bits:ty) => {
        impl StoredBound for $type {
            fn data_type() -> DataType {
                DataType::$variant
            }

            fn from_f64(value: f64) -> Self {
                value as $type
            }

            fn to_f64(self) -> f64 {
                self as f64
            }

            fn to_bits_u64(self) -> u64 {
                bytemuck::cast::<$type, $bits>(self) as u64
            }
        }
    };
}

impl_stored_bound!(f32, F32, u32);
impl_stored_bound!(f64, F64, u64);
impl_stored_bound!(i32, I32, u32);
impl_stored_bound!(i64, I64, u64);
impl_stored_bound!(u32, U32, u32);
impl_stored_bound!(u64, U64, u64);
