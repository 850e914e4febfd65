//! Linear equations with exact rational coefficients.

use std::{
    fmt::{Display, Formatter},
    ops::{Index, Mul},
};

use smallvec::SmallVec;

use crate::{
    domains::{rational::Rational, scalar::Scalar},
    error::LinearSystemError,
    utils,
};

/// Inline capacity of the coefficient storage; larger equations spill to the heap.
pub(crate) const INLINE_COEFFICIENTS: usize = 8;

pub type Coefficients = SmallVec<[Rational; INLINE_COEFFICIENTS]>;

/// The equation `c_1 x1 + ... + c_n xn + k = 0`.
///
/// The coefficients are stored in unknown order, followed by the constant term `k`.
#[derive(Clone, Debug)]
pub struct LinearEquation {
    coefficients: Coefficients,
}

impl LinearEquation {
    /// Create an equation from its coefficients followed by the constant term.
    /// At least one unknown is required.
    pub fn new<I: IntoIterator<Item = Rational>>(
        coefficients: I,
    ) -> Result<LinearEquation, LinearSystemError> {
        let coefficients: Coefficients = coefficients.into_iter().collect();

        if coefficients.is_empty() {
            return Err(LinearSystemError::MalformedEquation(
                "an equation needs coefficients".to_owned(),
            ));
        }
        if coefficients.len() < 2 {
            return Err(LinearSystemError::MalformedEquation(format!(
                "not enough coefficients to form an equation: got {}, need at least 2",
                coefficients.len()
            )));
        }

        Ok(LinearEquation { coefficients })
    }

    /// Create an equation from integers, decimals or rationals.
    pub fn from_scalars<S, I>(values: I) -> Result<LinearEquation, LinearSystemError>
    where
        S: Into<Scalar>,
        I: IntoIterator<Item = S>,
    {
        let coefficients = values
            .into_iter()
            .map(|v| v.into().into_rational())
            .collect::<Result<Coefficients, _>>()?;
        LinearEquation::new(coefficients)
    }

    /// Create an equation from textual tokens such as `"3"`, `"-2.5"` or `"7/4"`.
    pub fn parse<'a, I: IntoIterator<Item = &'a str>>(
        tokens: I,
    ) -> Result<LinearEquation, LinearSystemError> {
        let coefficients = tokens
            .into_iter()
            .map(str::parse::<Rational>)
            .collect::<Result<Coefficients, _>>()?;
        LinearEquation::new(coefficients)
    }

    /// The number of stored values, including the constant term.
    #[inline]
    pub fn len(&self) -> usize {
        self.coefficients.len()
    }

    #[inline]
    pub fn num_unknowns(&self) -> usize {
        self.coefficients.len() - 1
    }

    #[inline]
    pub fn coefficients(&self) -> &[Rational] {
        &self.coefficients
    }

    /// The coefficients of the unknowns, without the constant term.
    #[inline]
    pub fn unknown_coefficients(&self) -> &[Rational] {
        &self.coefficients[..self.coefficients.len() - 1]
    }

    #[inline]
    pub fn constant(&self) -> &Rational {
        &self.coefficients[self.coefficients.len() - 1]
    }

    pub fn is_zero(&self) -> bool {
        self.coefficients.iter().all(Rational::is_zero)
    }

    /// The number of unknowns with a non-zero coefficient.
    pub fn count_non_zero_unknowns(&self) -> usize {
        self.unknown_coefficients()
            .iter()
            .filter(|c| !c.is_zero())
            .count()
    }

    /// The position of the first unknown with a non-zero coefficient.
    pub fn leading_unknown(&self) -> Option<usize> {
        self.unknown_coefficients().iter().position(|c| !c.is_zero())
    }

    /// Substitute `values` for the unknowns and return the left-hand side.
    /// The equation holds for these values exactly when the result is zero.
    pub fn evaluate(&self, values: &[Rational]) -> Result<Rational, LinearSystemError> {
        if values.len() != self.num_unknowns() {
            return Err(LinearSystemError::dimension_mismatch(
                self.num_unknowns(),
                values.len(),
            ));
        }

        Ok(self
            .unknown_coefficients()
            .iter()
            .zip(values)
            .fold(self.constant().clone(), |acc, (c, v)| acc + c * v))
    }

    fn check_dimension(&self, other: &LinearEquation) -> Result<(), LinearSystemError> {
        if self.len() != other.len() {
            return Err(LinearSystemError::dimension_mismatch(
                self.len(),
                other.len(),
            ));
        }
        Ok(())
    }

    pub fn try_add(&self, other: &LinearEquation) -> Result<LinearEquation, LinearSystemError> {
        self.check_dimension(other)?;
        Ok(LinearEquation {
            coefficients: self
                .coefficients
                .iter()
                .zip(&other.coefficients)
                .map(|(a, b)| a + b)
                .collect(),
        })
    }

    pub fn try_sub(&self, other: &LinearEquation) -> Result<LinearEquation, LinearSystemError> {
        self.check_dimension(other)?;
        Ok(LinearEquation {
            coefficients: self
                .coefficients
                .iter()
                .zip(&other.coefficients)
                .map(|(a, b)| a - b)
                .collect(),
        })
    }

    /// Multiply every coefficient by `factor`.
    pub fn scale(&self, factor: impl Into<Scalar>) -> Result<LinearEquation, LinearSystemError> {
        let factor = factor.into().into_rational()?;
        Ok(self * &factor)
    }

    /// Divide every coefficient by `divisor`.
    pub fn divide(&self, divisor: impl Into<Scalar>) -> Result<LinearEquation, LinearSystemError> {
        let divisor = divisor.into().into_rational()?;
        if divisor.is_zero() {
            return Err(LinearSystemError::DivisionByZero(format!(
                "cannot divide the equation {} by zero",
                self
            )));
        }
        Ok(self * &divisor.inv()?)
    }

    /// Check whether `self` and `other` describe the same hyperplane, i.e. one
    /// is a non-zero multiple of the other. Two zero equations are equivalent.
    pub fn try_equivalent(&self, other: &LinearEquation) -> Result<bool, LinearSystemError> {
        self.check_dimension(other)?;

        // the first pair where both sides are non-zero fixes the factor
        let mut factor = Rational::one();
        for (a, b) in self.coefficients.iter().zip(&other.coefficients) {
            if !a.is_zero() && !b.is_zero() {
                factor = a.checked_div(b)?;
                break;
            }
        }

        for (a, b) in self.coefficients.iter().zip(&other.coefficients) {
            match (a.is_zero(), b.is_zero()) {
                (true, true) => {}
                (false, false) => {
                    if a.checked_div(b)? != factor {
                        return Ok(false);
                    }
                }
                _ => return Ok(false),
            }
        }

        Ok(true)
    }

    /// The representative of the equivalence class of `self`: the equation
    /// divided by its first non-zero value. The zero equation is its own
    /// representative.
    pub fn canonical_form(&self) -> Coefficients {
        let lead = self.coefficients.iter().find(|c| !c.is_zero());
        match lead.map(Rational::inv) {
            Some(Ok(inv)) if !inv.is_one() => self.coefficients.iter().map(|c| c * &inv).collect(),
            _ => self.coefficients.clone(),
        }
    }

    /// Drop the unknown at `index`. Used when a column is unused in a whole
    /// system, which is why it may leave fewer than two values behind.
    pub(crate) fn remove_unknown(&mut self, index: usize) {
        debug_assert!(index < self.num_unknowns());
        self.coefficients.remove(index);
    }
}

impl Index<usize> for LinearEquation {
    type Output = Rational;

    fn index(&self, index: usize) -> &Self::Output {
        &self.coefficients[index]
    }
}

impl PartialEq for LinearEquation {
    /// Scalar-multiple equivalence; equations of different lengths are never equal.
    fn eq(&self, other: &Self) -> bool {
        self.try_equivalent(other).unwrap_or(false)
    }
}

impl Eq for LinearEquation {}

impl<'a, 'b> Mul<&'a Rational> for &'b LinearEquation {
    type Output = LinearEquation;

    fn mul(self, factor: &'a Rational) -> Self::Output {
        LinearEquation {
            coefficients: self.coefficients.iter().map(|c| c * factor).collect(),
        }
    }
}

impl<'a, 'b> Mul<&'a LinearEquation> for &'b Rational {
    type Output = LinearEquation;

    fn mul(self, equation: &'a LinearEquation) -> Self::Output {
        equation * self
    }
}

impl<'a> Mul<i64> for &'a LinearEquation {
    type Output = LinearEquation;

    fn mul(self, factor: i64) -> Self::Output {
        self * &Rational::from(factor)
    }
}

impl<'a> Mul<&'a LinearEquation> for i64 {
    type Output = LinearEquation;

    fn mul(self, equation: &'a LinearEquation) -> Self::Output {
        equation * &Rational::from(self)
    }
}

impl Display for LinearEquation {
    /// Render as `2 x1 - 3 x2 + 5 = 0`: every term carries an explicit sign token
    /// and a positive magnitude, except for a positive leading term.
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let unknowns = self
            .unknown_coefficients()
            .iter()
            .enumerate()
            .map(|(i, c)| (c.is_negative(), format!("{} x{}", c.abs(), i + 1)));
        let constant = std::iter::once((
            self.constant().is_negative(),
            self.constant().abs().to_string(),
        ));

        utils::write_signed_terms(f, unknowns.chain(constant))?;
        f.write_str(" = 0")
    }
}
