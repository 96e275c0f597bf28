#![allow(unused_macros)]
#![allow(unused_imports)]

//! Macros for implementing lower-bounded number types.
//!
//! Each type must implement `num_traits::bounds::LowerBounded`
//! and `PartialOrd`,
//! and the trait must be in scope
//! where a macro is invoked.

pub use paste;
pub use thiserror;

/// Derive `new` and an `Invalid<Type>Error`
/// for a float newtype bounded below,
/// rejecting NaN.
#[macro_export]
macro_rules! derive_new_from_lower_bounded_float {
    ( $type:ident < $a:ident : $bound:ident > ) => {
        $crate::_derive_new_from_lower_bounded_partial_ord!($type<$a: $bound>, $a, IsNan, "NaN");
    };
    ( $type:ident ( $inner:ty ) ) => {
        $crate::_derive_new_from_lower_bounded_partial_ord!($type, $inner, IsNan, "NaN");
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! _derive_new_from_lower_bounded_partial_ord {
    ( $type:ident $( < $a:ident : $bound:ident > )?, $inner:ty, $incomparable_name:ident, $incomparable_str:literal ) => {
        $crate::paste::paste! {
            #[doc = "Error returned when '" $type "' is given an invalid value."]
            #[derive(Clone, Copy, Debug, $crate::thiserror::Error, PartialEq)]
            pub enum [<Invalid $type Error>] $(< $a : $bound >)? {
                #[doc = "Value is " $incomparable_str "."]
                #[error("{0} is {}", $incomparable_str)]
                $incomparable_name($inner),
                /// Value is below lower bound.
                #[error("{0} is below lower bound ({})", < $type $(< $a >)? > ::min_value())]
                TooLow($inner),
            }

            impl $(< $a : $bound >)? $type $(< $a >)? {
                #[doc = "Return a new '" $type "' if given a valid value."]
                pub fn new(value: $inner) -> Result<Self, [<Invalid $type Error>] $(< $a >)? > {
                    match Self(value).partial_cmp(&Self::min_value()) {
                        None => Err([<Invalid $type Error>]::$incomparable_name(value)),
                        Some(std::cmp::Ordering::Less) => Err([<Invalid $type Error>]::TooLow(value)),
                        _ => Ok(Self(value)),
                    }
                }
            }
        }
    };
}

/// Derive `new` and an `Invalid<Type>Error`
/// for a totally ordered newtype bounded below.
#[macro_export]
macro_rules! derive_new_from_lower_bounded {
    ( $type:ident ( $inner: ty ) ) => {
        $crate::paste::paste! {
            #[doc = "Error returned when '" $type "' is given a value below lower bound."]
            #[derive(Clone, Copy, Debug, $crate::thiserror::Error, PartialEq, Eq)]
            #[error("{0} is below lower bound ({})", $type::min_value())]
            pub struct [<Invalid $type Error>](pub $inner);

            impl $type {
                #[doc = "Return a new '" $type "' if given a valid value."]
                pub fn new(value: $inner) -> Result<Self, [<Invalid $type Error>]> {
                    if Self(value) < Self::min_value() {
                        Err([<Invalid $type Error>](value))
                    } else {
                        Ok(Self(value))
                    }
                }
            }
        }
    };
}

/// Derive `TryFrom<inner>` from `new`.
#[macro_export]
macro_rules! derive_try_from_from_new {
    ( $type:ident ( $inner:ty ) ) => {
        $crate::paste::paste! {
            impl core::convert::TryFrom<$inner> for $type {
                type Error = [<Invalid $type Error>];
                fn try_from(value: $inner) -> Result<Self, Self::Error> {
                    $type::new(value)
                }
            }
        }
    };
}

/// Derive `FromStr` by parsing `inner`
/// and converting with `TryFrom`.
#[macro_export]
macro_rules! derive_from_str_from_try_into {
    ( $type:ident ( $inner:ty ) ) => {
        $crate::paste::paste! {
            #[doc = "Error returned when failing to convert from a string or into '" $type "'."]
            #[derive(Clone, Debug, $crate::thiserror::Error, PartialEq, Eq)]
            pub enum [<$type FromStrError>] {
                #[doc = "Error converting from 'str' to '" $inner "'."]
                #[error("Failed to convert from 'str': {0}")]
                FromStr(<$inner as std::str::FromStr>::Err),
                #[doc = "Error converting from '" $inner "' to '" $type "'."]
                #[error("Failed to convert into type: {0}")]
                TryInto(<$type as TryFrom<$inner>>::Error),
            }

            impl std::str::FromStr for $type {
                type Err = [<$type FromStrError>];

                fn from_str(s: &str) -> Result<Self, Self::Err> {
                    s.parse::<$inner>()
                        .map_err([<$type FromStrError>]::FromStr)
                        .and_then(|x| x.try_into().map_err([<$type FromStrError>]::TryInto))
                }
            }
        }
    };
}

/// Derive `into_inner`.
#[macro_export]
macro_rules! derive_into_inner {
    ( $type:ident ( $inner:ty ) ) => {
        $crate::paste::paste! {
            impl $type {
                #[doc = "Unwrap '" $type "' into inner value."]
                pub fn into_inner(self) -> $inner {
                    self.0
                }
            }
        }
    };
    ( $type:ident < $a:ident > ) => {
        $crate::paste::paste! {
            impl < $a > $type < $a > {
                #[doc = "Unwrap '" $type "' into inner value."]
                pub fn into_inner(self) -> $a {
                    self.0
                }
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use std::fmt;

    use num_traits::{bounds::LowerBounded, Float};

    #[derive(Clone, Copy, Debug, PartialEq, PartialOrd)]
    struct NonNegative<A>(A);

    impl<A: fmt::Display> fmt::Display for NonNegative<A> {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            fmt::Display::fmt(&self.0, f)
        }
    }

    impl<A: Float> LowerBounded for NonNegative<A> {
        fn min_value() -> Self {
            Self(A::zero())
        }
    }

    derive_new_from_lower_bounded_float!(NonNegative<A: Float>);
    derive_into_inner!(NonNegative<A>);

    #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
    struct Positive(u32);

    impl fmt::Display for Positive {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            fmt::Display::fmt(&self.0, f)
        }
    }

    impl LowerBounded for Positive {
        fn min_value() -> Self {
            Self(1)
        }
    }

    derive_new_from_lower_bounded!(Positive(u32));
    derive_into_inner!(Positive(u32));
    derive_try_from_from_new!(Positive(u32));
    derive_from_str_from_try_into!(Positive(u32));

    #[test]
    fn lower_bounded_float_should_reject_nan_and_values_below_bound() {
        assert_eq!(NonNegative::new(0.0).map(NonNegative::into_inner), Ok(0.0));
        assert_eq!(NonNegative::new(-1.0), Err(InvalidNonNegativeError::TooLow(-1.0)));
        assert!(matches!(
            NonNegative::new(f64::NAN),
            Err(InvalidNonNegativeError::IsNan(_))
        ));
    }

    #[test]
    fn lower_bounded_errors_should_name_the_bound() {
        assert_eq!(
            InvalidNonNegativeError::TooLow(-1.0).to_string(),
            "-1 is below lower bound (0)"
        );
        assert_eq!(
            InvalidPositiveError(0).to_string(),
            "0 is below lower bound (1)"
        );
    }

    #[test]
    fn lower_bounded_should_convert_from_inner_and_str() {
        assert_eq!(Positive::try_from(3).map(Positive::into_inner), Ok(3));
        assert_eq!(Positive::try_from(0), Err(InvalidPositiveError(0)));
        assert_eq!("2".parse::<Positive>(), Ok(Positive(2)));
        assert_eq!(
            "0".parse::<Positive>(),
            Err(PositiveFromStrError::TryInto(InvalidPositiveError(0)))
        );
        assert!(matches!(
            "two".parse::<Positive>(),
            Err(PositiveFromStrError::FromStr(_))
        ));
    }
}
