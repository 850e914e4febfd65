use std::fmt::{Display, Formatter};

use rug::Integer;

use crate::error::LinearSystemError;

use super::rational::Rational;

/// A numeric value accepted wherever a coefficient or a scale factor is expected.
///
/// Every scalar is normalized to a [`Rational`] before it takes part in any
/// arithmetic.
#[derive(Clone, Debug)]
pub enum Scalar {
    Rational(Rational),
    Integer(Integer),
    Decimal(f64),
}

impl Scalar {
    pub fn to_rational(&self) -> Result<Rational, LinearSystemError> {
        match self {
            Scalar::Rational(r) => Ok(r.clone()),
            Scalar::Integer(i) => Ok(Rational::from(i)),
            Scalar::Decimal(f) => Rational::try_from(*f),
        }
    }

    pub fn into_rational(self) -> Result<Rational, LinearSystemError> {
        match self {
            Scalar::Rational(r) => Ok(r),
            Scalar::Integer(i) => Ok(Rational::from(i)),
            Scalar::Decimal(f) => Rational::try_from(f),
        }
    }
}

impl Display for Scalar {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Scalar::Rational(r) => r.fmt(f),
            Scalar::Integer(i) => i.fmt(f),
            Scalar::Decimal(d) => d.fmt(f),
        }
    }
}

impl TryFrom<Scalar> for Rational {
    type Error = LinearSystemError;

    fn try_from(value: Scalar) -> Result<Self, Self::Error> {
        value.into_rational()
    }
}

impl From<Rational> for Scalar {
    fn from(value: Rational) -> Self {
        Scalar::Rational(value)
    }
}

impl From<&Rational> for Scalar {
    fn from(value: &Rational) -> Self {
        Scalar::Rational(value.clone())
    }
}

impl From<Integer> for Scalar {
    fn from(value: Integer) -> Self {
        Scalar::Integer(value)
    }
}

impl From<f64> for Scalar {
    fn from(value: f64) -> Self {
        Scalar::Decimal(value)
    }
}

macro_rules! from_machine_integer {
    ($($t: ty),*) => {
        $(
            impl From<$t> for Scalar {
                #[inline]
                fn from(value: $t) -> Self {
                    Scalar::Integer(Integer::from(value))
                }
            }
        )*
    };
}

from_machine_integer!(i32, i64, u32, u64);

#[cfg(test)]
mod test {
    use rug::{ops::Pow, Integer};

    use super::Scalar;
    use crate::domains::rational::Rational;

    #[test]
    fn normalization() {
        assert_eq!(Scalar::from(4).into_rational().unwrap(), Rational::from(4));
        assert_eq!(
            Scalar::from(0.25).into_rational().unwrap(),
            Rational::new(1, 4).unwrap()
        );
        assert_eq!(
            Scalar::from(Integer::from(10).pow(30)).to_rational().unwrap(),
            Rational::from(Integer::from(10).pow(30))
        );
        assert!(Rational::try_from(Scalar::Decimal(f64::NEG_INFINITY)).is_err());
    }
}
