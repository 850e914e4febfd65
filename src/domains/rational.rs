use std::{
    cmp::Ordering,
    fmt::{Debug, Display, Formatter},
    hash::{Hash, Hasher},
    ops::{Add, Mul, Neg, Sub},
    str::FromStr,
};

use rug::{ops::Pow, Integer, Rational as ArbitraryPrecisionRational};

use crate::{error::LinearSystemError, utils};

use super::scalar::Scalar;

/// Exponents beyond this bound are rejected while parsing decimal text.
const MAX_DECIMAL_SCALE: i64 = 100_000;

/// An exact rational number, always stored in lowest terms with a positive
/// denominator.
///
/// Small values live in machine words; anything that overflows is promoted to an
/// arbitrary-precision value and demoted again as soon as it fits, so every number
/// has exactly one representation.
#[derive(Clone)]
pub struct Rational(Value);

#[derive(Clone)]
enum Value {
    Natural(i64, i64),
    Large(ArbitraryPrecisionRational),
}

impl Rational {
    /// Create `num / den`, reducing it to lowest terms.
    pub fn new(num: i64, den: i64) -> Result<Rational, LinearSystemError> {
        if den == 0 {
            return Err(LinearSystemError::DivisionByZero(format!(
                "cannot build the fraction {}/0",
                num
            )));
        }

        Ok(Rational::normalize(num, den))
    }

    /// Create `num / den` from arbitrary-precision integers.
    pub fn from_integers(num: Integer, den: Integer) -> Result<Rational, LinearSystemError> {
        if den == 0 {
            return Err(LinearSystemError::DivisionByZero(format!(
                "cannot build the fraction {}/0",
                num
            )));
        }

        Ok(Rational::from_large(ArbitraryPrecisionRational::from((
            num, den,
        ))))
    }

    /// Create `num / den` where both sides may be integers, decimals or rationals,
    /// e.g. `from_ratio(20.9, 5.5)` is `19/5`.
    pub fn from_ratio(
        num: impl Into<Scalar>,
        den: impl Into<Scalar>,
    ) -> Result<Rational, LinearSystemError> {
        let num = num.into().into_rational()?;
        let den = den.into().into_rational()?;
        num.checked_div(&den)
    }

    /// Reduce a pair with a non-zero denominator.
    fn normalize(num: i64, den: i64) -> Rational {
        debug_assert!(den != 0);

        let g = utils::gcd_signed(num, den);
        if g <= i64::MAX as u64 {
            let (n, d) = (num / g as i64, den / g as i64);
            if d > 0 {
                return Rational(Value::Natural(n, d));
            }
            if let (Some(n), Some(d)) = (n.checked_neg(), d.checked_neg()) {
                return Rational(Value::Natural(n, d));
            }
        }

        Rational::from_large(ArbitraryPrecisionRational::from((num, den)))
    }

    /// Wrap a multi-precision rational, downcasting when both parts fit in a word.
    fn from_large(r: ArbitraryPrecisionRational) -> Rational {
        match (r.numer().to_i64(), r.denom().to_i64()) {
            (Some(n), Some(d)) => Rational(Value::Natural(n, d)),
            _ => Rational(Value::Large(r)),
        }
    }

    fn to_large(&self) -> ArbitraryPrecisionRational {
        match &self.0 {
            Value::Natural(n, d) => ArbitraryPrecisionRational::from((*n, *d)),
            Value::Large(r) => r.clone(),
        }
    }

    pub fn zero() -> Rational {
        Rational(Value::Natural(0, 1))
    }

    pub fn one() -> Rational {
        Rational(Value::Natural(1, 1))
    }

    pub fn numerator(&self) -> Integer {
        match &self.0 {
            Value::Natural(n, _) => Integer::from(*n),
            Value::Large(r) => r.numer().clone(),
        }
    }

    pub fn denominator(&self) -> Integer {
        match &self.0 {
            Value::Natural(_, d) => Integer::from(*d),
            Value::Large(r) => r.denom().clone(),
        }
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        match &self.0 {
            Value::Natural(n, _) => *n == 0,
            Value::Large(_) => false,
        }
    }

    #[inline]
    pub fn is_one(&self) -> bool {
        matches!(self.0, Value::Natural(1, 1))
    }

    #[inline]
    pub fn is_negative(&self) -> bool {
        match &self.0 {
            Value::Natural(n, _) => *n < 0,
            Value::Large(r) => r.numer().cmp0().is_lt(),
        }
    }

    pub fn is_integer(&self) -> bool {
        match &self.0 {
            Value::Natural(_, d) => *d == 1,
            Value::Large(r) => *r.denom() == 1,
        }
    }

    pub fn abs(&self) -> Rational {
        if self.is_negative() {
            -self
        } else {
            self.clone()
        }
    }

    /// The multiplicative inverse.
    pub fn inv(&self) -> Result<Rational, LinearSystemError> {
        match &self.0 {
            Value::Natural(0, _) => Err(LinearSystemError::DivisionByZero(
                "zero has no reciprocal".to_owned(),
            )),
            Value::Natural(n, d) => {
                if *n > 0 {
                    Ok(Rational(Value::Natural(*d, *n)))
                } else if let Some(neg) = n.checked_neg() {
                    Ok(Rational(Value::Natural(-d, neg)))
                } else {
                    Ok(Rational::from_large(self.to_large().recip()))
                }
            }
            Value::Large(r) => Ok(Rational::from_large(r.clone().recip())),
        }
    }

    /// Divide by `other`, failing when its numerator is zero.
    pub fn checked_div(&self, other: &Rational) -> Result<Rational, LinearSystemError> {
        if other.is_zero() {
            return Err(LinearSystemError::DivisionByZero(format!(
                "cannot divide {} by zero",
                self
            )));
        }

        Ok(self * &other.inv()?)
    }

    /// Compare with a Rational, integer or decimal by cross-multiplication.
    ///
    /// Scalars that have no rational value (`NaN`, infinities) cannot be compared.
    pub fn try_eq(&self, other: impl Into<Scalar>) -> Result<bool, LinearSystemError> {
        Ok(self.try_cmp(other)? == Ordering::Equal)
    }

    pub fn try_cmp(&self, other: impl Into<Scalar>) -> Result<Ordering, LinearSystemError> {
        let other = other.into();
        match other.to_rational() {
            Ok(r) => Ok(self.cmp(&r)),
            Err(_) => Err(LinearSystemError::InvalidComparison(format!(
                "{} cannot be compared with {}",
                self, other
            ))),
        }
    }

    fn add_ref(&self, other: &Rational) -> Rational {
        if let (Value::Natural(n1, d1), Value::Natural(n2, d2)) = (&self.0, &other.0) {
            let g = utils::gcd_signed(*d1, *d2) as i64;
            if let Some(lcm) = d2.checked_mul(d1 / g) {
                if let Some(num2) = n2.checked_mul(lcm / d2) {
                    if let Some(num1) = n1.checked_mul(lcm / d1) {
                        if let Some(num) = num1.checked_add(num2) {
                            let g = utils::gcd_signed(num, lcm) as i64;
                            return Rational(Value::Natural(num / g, lcm / g));
                        }
                    }
                }
            }
        }

        Rational::from_large(self.to_large() + other.to_large())
    }

    fn mul_ref(&self, other: &Rational) -> Rational {
        if self.is_zero() || other.is_zero() {
            return Rational::zero();
        }

        if let (Value::Natural(n1, d1), Value::Natural(n2, d2)) = (&self.0, &other.0) {
            let gcd1 = utils::gcd_signed(*n1, *d2) as i64;
            let gcd2 = utils::gcd_signed(*d1, *n2) as i64;

            if let Some(nn) = (n1 / gcd1).checked_mul(n2 / gcd2) {
                if let Some(nd) = (d1 / gcd2).checked_mul(d2 / gcd1) {
                    return Rational(Value::Natural(nn, nd));
                }
            }
        }

        Rational::from_large(self.to_large() * other.to_large())
    }

    fn neg_ref(&self) -> Rational {
        match &self.0 {
            Value::Natural(n, d) => match n.checked_neg() {
                Some(neg) => Rational(Value::Natural(neg, *d)),
                None => Rational::from_large(-self.to_large()),
            },
            Value::Large(r) => Rational::from_large(-r.clone()),
        }
    }
}

impl Default for Rational {
    fn default() -> Self {
        Rational::zero()
    }
}

impl From<i64> for Rational {
    fn from(value: i64) -> Self {
        Rational(Value::Natural(value, 1))
    }
}

impl From<i32> for Rational {
    fn from(value: i32) -> Self {
        Rational(Value::Natural(value as i64, 1))
    }
}

impl From<u32> for Rational {
    fn from(value: u32) -> Self {
        Rational(Value::Natural(value as i64, 1))
    }
}

impl From<Integer> for Rational {
    fn from(value: Integer) -> Self {
        Rational::from_large(ArbitraryPrecisionRational::from(value))
    }
}

impl From<&Integer> for Rational {
    fn from(value: &Integer) -> Self {
        Rational::from(value.clone())
    }
}

impl From<ArbitraryPrecisionRational> for Rational {
    fn from(value: ArbitraryPrecisionRational) -> Self {
        Rational::from_large(value)
    }
}

impl TryFrom<f64> for Rational {
    type Error = LinearSystemError;

    /// Convert a decimal to the fraction its shortest decimal expansion denotes,
    /// so `2.3` becomes `23/10` rather than the binary value closest to it.
    fn try_from(f: f64) -> Result<Self, Self::Error> {
        if !f.is_finite() {
            return Err(LinearSystemError::invalid_number(
                &f.to_string(),
                "not a finite decimal",
            ));
        }

        parse_decimal(&f.to_string())
    }
}

impl FromStr for Rational {
    type Err = LinearSystemError;

    /// Parse an integer (`-12`), a decimal (`2.75`, `1.1e-1`) or a fraction of
    /// two integers (`19/6`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let t = s.trim();

        if let Some((num, den)) = t.split_once('/') {
            let num = parse_integer(num.trim(), s)?;
            let den = parse_integer(den.trim(), s)?;
            return Rational::from_integers(num, den);
        }

        parse_decimal(t).map_err(|e| match e {
            LinearSystemError::InvalidNumber { reason, .. } => {
                LinearSystemError::invalid_number(s, reason)
            }
            e => e,
        })
    }
}

fn split_sign(s: &str) -> (bool, &str) {
    match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    }
}

fn parse_integer(s: &str, input: &str) -> Result<Integer, LinearSystemError> {
    let (negative, digits) = split_sign(s);

    if digits.contains(['.', 'e', 'E']) {
        return Err(LinearSystemError::invalid_number(
            input,
            "decimal notation is not allowed inside a fraction",
        ));
    }
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(LinearSystemError::invalid_number(
            input,
            "expected an integer on both sides of `/`",
        ));
    }

    let n = Integer::from_str_radix(digits, 10)
        .map_err(|_| LinearSystemError::invalid_number(input, "expected an integer"))?;
    Ok(if negative { -n } else { n })
}

/// Parse `[sign] digits [. digits] [e [sign] digits]` exactly, by scaling the
/// digits with a power of ten.
fn parse_decimal(s: &str) -> Result<Rational, LinearSystemError> {
    let (negative, rest) = split_sign(s);

    let (mantissa, exponent) = match rest.find(['e', 'E']) {
        Some(p) => (&rest[..p], Some(&rest[p + 1..])),
        None => (rest, None),
    };

    let (int_part, frac_part) = mantissa.split_once('.').unwrap_or((mantissa, ""));
    if int_part.len() + frac_part.len() == 0
        || !int_part.bytes().all(|b| b.is_ascii_digit())
        || !frac_part.bytes().all(|b| b.is_ascii_digit())
    {
        return Err(LinearSystemError::invalid_number(s, "not a number"));
    }

    let exponent = match exponent {
        Some(e) => {
            let (exp_negative, exp_digits) = split_sign(e);
            if exp_digits.is_empty() || !exp_digits.bytes().all(|b| b.is_ascii_digit()) {
                return Err(LinearSystemError::invalid_number(s, "malformed exponent"));
            }
            let e: i64 = exp_digits
                .parse()
                .map_err(|_| LinearSystemError::invalid_number(s, "exponent out of range"))?;
            if exp_negative {
                -e
            } else {
                e
            }
        }
        None => 0,
    };

    let scale = (frac_part.len() as i64)
        .checked_sub(exponent)
        .filter(|scale| scale.unsigned_abs() <= MAX_DECIMAL_SCALE as u64)
        .ok_or_else(|| LinearSystemError::invalid_number(s, "exponent out of range"))?;

    let mut digits = String::with_capacity(int_part.len() + frac_part.len());
    digits.push_str(int_part);
    digits.push_str(frac_part);
    let mut num = Integer::from_str_radix(&digits, 10)
        .map_err(|_| LinearSystemError::invalid_number(s, "not a number"))?;
    if negative {
        num = -num;
    }

    let ten = Integer::from(10);
    if scale >= 0 {
        Rational::from_integers(num, ten.pow(scale as u32))
    } else {
        Ok(Rational::from(num * ten.pow((-scale) as u32)))
    }
}

impl Display for Rational {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.0 {
            Value::Natural(n, d) => {
                if *d == 1 {
                    f.write_fmt(format_args!("{}", n))
                } else {
                    f.write_fmt(format_args!("{}/{}", n, d))
                }
            }
            Value::Large(r) => {
                if *r.denom() == 1 {
                    f.write_fmt(format_args!("{}", r.numer()))
                } else {
                    f.write_fmt(format_args!("{}/{}", r.numer(), r.denom()))
                }
            }
        }
    }
}

impl Debug for Rational {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.0 {
            Value::Natural(n, d) => write!(f, "Rational({}, {})", n, d),
            Value::Large(r) => write!(f, "Rational({}, {})", r.numer(), r.denom()),
        }
    }
}

impl PartialEq for Rational {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Rational {}

impl Hash for Rational {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match &self.0 {
            Value::Natural(n, d) => {
                state.write_u8(0);
                n.hash(state);
                d.hash(state);
            }
            Value::Large(r) => {
                state.write_u8(1);
                r.hash(state);
            }
        }
    }
}

impl PartialOrd for Rational {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Rational {
    fn cmp(&self, other: &Self) -> Ordering {
        match (&self.0, &other.0) {
            (Value::Natural(n1, d1), Value::Natural(n2, d2)) => {
                (*n1 as i128 * *d2 as i128).cmp(&(*n2 as i128 * *d1 as i128))
            }
            _ => {
                let (a, b) = (self.to_large(), other.to_large());
                (Integer::from(a.numer() * b.denom())).cmp(&Integer::from(b.numer() * a.denom()))
            }
        }
    }
}

impl PartialEq<i64> for Rational {
    fn eq(&self, other: &i64) -> bool {
        match &self.0 {
            Value::Natural(n, d) => *n as i128 == *other as i128 * *d as i128,
            Value::Large(_) => false,
        }
    }
}

impl PartialEq<Rational> for i64 {
    fn eq(&self, other: &Rational) -> bool {
        other == self
    }
}

impl PartialOrd<i64> for Rational {
    fn partial_cmp(&self, other: &i64) -> Option<Ordering> {
        Some(self.cmp(&Rational::from(*other)))
    }
}

impl PartialOrd<Rational> for i64 {
    fn partial_cmp(&self, other: &Rational) -> Option<Ordering> {
        Some(Rational::from(*self).cmp(other))
    }
}

impl Neg for Rational {
    type Output = Rational;

    fn neg(self) -> Self::Output {
        self.neg_ref()
    }
}

impl<'a> Neg for &'a Rational {
    type Output = Rational;

    fn neg(self) -> Self::Output {
        self.neg_ref()
    }
}

macro_rules! impl_binary_op {
    ($op: ident, $method: ident, $body: expr) => {
        impl<'a, 'b> $op<&'a Rational> for &'b Rational {
            type Output = Rational;

            fn $method(self, other: &'a Rational) -> Self::Output {
                $body(self, other)
            }
        }

        impl<'a> $op<&'a Rational> for Rational {
            type Output = Rational;

            fn $method(self, other: &'a Rational) -> Self::Output {
                $body(&self, other)
            }
        }

        impl $op<Rational> for Rational {
            type Output = Rational;

            fn $method(self, other: Rational) -> Self::Output {
                $body(&self, &other)
            }
        }

        impl $op<i64> for Rational {
            type Output = Rational;

            fn $method(self, other: i64) -> Self::Output {
                $body(&self, &Rational::from(other))
            }
        }

        impl<'a> $op<i64> for &'a Rational {
            type Output = Rational;

            fn $method(self, other: i64) -> Self::Output {
                $body(self, &Rational::from(other))
            }
        }

        impl $op<Rational> for i64 {
            type Output = Rational;

            fn $method(self, other: Rational) -> Self::Output {
                $body(&Rational::from(self), &other)
            }
        }

        impl<'a> $op<&'a Rational> for i64 {
            type Output = Rational;

            fn $method(self, other: &'a Rational) -> Self::Output {
                $body(&Rational::from(self), other)
            }
        }
    };
}

impl_binary_op!(Add, add, |a: &Rational, b: &Rational| a.add_ref(b));
impl_binary_op!(Sub, sub, |a: &Rational, b: &Rational| a.add_ref(&b.neg_ref()));
impl_binary_op!(Mul, mul, |a: &Rational, b: &Rational| a.mul_ref(b));
