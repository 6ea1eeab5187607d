//! Tolerance-aware equality for parameter fields.

use std::fmt::Debug;

/// Absolute tolerance used when none is given.
pub const DEFAULT_TOLERANCE: f64 = 1e-7;

/// Field comparison dispatched on the field's scalar type.
///
/// Floats compare within an absolute tolerance, every other kind compares
/// exactly and ignores `tol`. Every value equals itself, NaN included.
pub trait ApproxEq {
    fn approx_eq(&self, other: &Self, tol: f64) -> bool;
}

impl ApproxEq for f64 {
    #[inline]
    fn approx_eq(&self, other: &Self, tol: f64) -> bool {
        self == other || (self - other).abs() <= tol || (self.is_nan() && other.is_nan())
    }
}

macro_rules! exact_eq {
    ($($t:ty),*) => {
        $(
            impl ApproxEq for $t {
                #[inline]
                fn approx_eq(&self, other: &Self, _tol: f64) -> bool {
                    self == other
                }
            }
        )*
    };
}

exact_eq!(i32, bool, crate::params::FeatureSelectionCriterion);

/// Compares one named field and logs it when it differs.
pub(crate) fn field_eq<T>(name: &str, a: &T, b: &T, tol: f64) -> bool
where
    T: ApproxEq + Debug,
{
    let eq = a.approx_eq(b, tol);
    if !eq {
        log::debug!("parameter `{}` differs: {:?} vs {:?}", name, a, b);
    }
    eq
}
