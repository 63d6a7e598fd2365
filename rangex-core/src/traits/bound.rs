//! Numeric domain constraints for range bounds
//!
//! This module defines the trait that constrains what types can be used
//! as the `start`/`end` coordinates of a range entry.

use core::cmp::Ordering;
use core::ops::Sub;

use num_traits::Zero;

/// Trait for types that can bound a range
///
/// The index only ever compares and subtracts bounds, so the requirements are:
/// - Copy: Bounds are passed around by value on the query hot path
/// - PartialOrd: Bounds can be compared
/// - Sub: Spans and pruned scan starts are computed by subtraction
/// - Zero: The additive identity is the span of an empty index
///
/// Both provided methods have defaults, so a custom numeric type only needs
/// an empty `impl Bound for MyType {}`.
pub trait Bound: Copy + PartialOrd + Sub<Output = Self> + Zero {
    /// Earliest start a stored entry may have and still reach `self`
    ///
    /// `max_span` is never negative. The default is plain subtraction.
    fn scan_floor(self, max_span: Self) -> Self {
        self - max_span
    }

    /// Ordering used to sort entries by start during construction
    ///
    /// Must be a total order consistent with `PartialOrd` on comparable values.
    fn order(&self, other: &Self) -> Ordering {
        self.partial_cmp(other).unwrap_or(Ordering::Equal)
    }
}

// Integer bounds saturate at the type minimum: no stored start can lie below
// it, so the scan window is the same as with unbounded arithmetic.
macro_rules! impl_integer_bound {
    ($($type:ty),* $(,)?) => {
        $(
            impl Bound for $type {
                #[inline]
                fn scan_floor(self, max_span: Self) -> Self {
                    self.saturating_sub(max_span)
                }

                #[inline]
                fn order(&self, other: &Self) -> Ordering {
                    Ord::cmp(self, other)
                }
            }
        )*
    };
}

// Float spans are rounded to nearest when stored, so the true span of an
// entry can exceed `max_span` by up to an ulp, and the subtraction below can
// round up as well. Widening by four epsilons of the operand magnitude keeps
// the floor at or below every start that can still reach `self`.
macro_rules! impl_float_bound {
    ($($type:ty),* $(,)?) => {
        $(
            impl Bound for $type {
                #[inline]
                fn scan_floor(self, max_span: Self) -> Self {
                    let magnitude = if self < 0.0 { -self } else { self };
                    let slack = (magnitude + max_span) * (4.0 * <$type>::EPSILON);
                    self - max_span - slack
                }

                #[inline]
                fn order(&self, other: &Self) -> Ordering {
                    self.total_cmp(other)
                }
            }
        )*
    };
}

impl_integer_bound!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);
impl_float_bound!(f32, f64);
