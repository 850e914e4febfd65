use std::fmt::{Display, Formatter};

use smartstring::{LazyCompact, SmartString};

use crate::{domains::rational::Rational, error::LinearSystemError, utils};

/// The display name of the unknown at a 0-based position.
pub fn unknown_name(index: usize) -> SmartString<LazyCompact> {
    let mut name = SmartString::new();
    name.push('x');
    name.push_str(&(index + 1).to_string());
    name
}

/// An unknown written as an affine combination of free unknowns:
/// `x_unknown = sum(coefficient * x_j) + constant`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParametricExpression {
    pub unknown: usize,
    pub terms: Vec<(usize, Rational)>,
    pub constant: Rational,
}

impl ParametricExpression {
    /// Evaluate the right-hand side, given a value for every unknown.
    pub fn evaluate(&self, values: &[Rational]) -> Result<Rational, LinearSystemError> {
        let needed = self.terms.iter().map(|(j, _)| j + 1).max().unwrap_or(0);
        if values.len() < needed {
            return Err(LinearSystemError::dimension_mismatch(needed, values.len()));
        }

        Ok(self
            .terms
            .iter()
            .fold(self.constant.clone(), |acc, (j, c)| acc + c * &values[*j]))
    }
}

impl Display for ParametricExpression {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} = ", unknown_name(self.unknown))?;

        let mut terms: Vec<(bool, String)> = self
            .terms
            .iter()
            .map(|(j, c)| (c.is_negative(), format!("{} {}", c.abs(), unknown_name(*j))))
            .collect();
        if !self.constant.is_zero() || terms.is_empty() {
            terms.push((self.constant.is_negative(), self.constant.abs().to_string()));
        }

        utils::write_signed_terms(f, terms)
    }
}

/// The classification of a reduced system, together with its answer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Solution {
    /// Every equation reduced to `0 = 0`: any assignment solves the system.
    AnyValue,
    /// Equation `equation_number` reduced to the contradiction `0 = value`.
    NoSolution {
        equation_number: usize,
        value: Rational,
    },
    /// The value of every unknown, in unknown order.
    Unique(Vec<Rational>),
    /// Every pivot unknown in terms of the free ones.
    Infinite {
        unknowns: usize,
        equations: usize,
        expressions: Vec<ParametricExpression>,
        free: Vec<usize>,
    },
}

impl Solution {
    pub fn is_unique(&self) -> bool {
        matches!(self, Solution::Unique(_))
    }

    pub fn is_consistent(&self) -> bool {
        !matches!(self, Solution::NoSolution { .. })
    }

    /// The report as separate lines, each terminated by a newline.
    pub fn report_lines(&self) -> Vec<String> {
        match self {
            Solution::AnyValue => vec![
                "The system is composed by only zeroes, any value of any unknown is a solution.\n"
                    .to_owned(),
            ],
            Solution::NoSolution {
                equation_number,
                value,
            } => vec![
                format!("From equation {}: 0 = {}\n", equation_number, value),
                "Impossible: this system has no solution.\n".to_owned(),
            ],
            Solution::Unique(values) => {
                let mut lines = vec!["This system has only one solution, which is:\n".to_owned()];
                lines.extend(
                    values
                        .iter()
                        .enumerate()
                        .map(|(i, v)| format!("{} = {}\n", unknown_name(i), v)),
                );
                lines
            }
            Solution::Infinite {
                unknowns,
                equations,
                expressions,
                free,
            } => {
                let mut lines = vec![format!(
                    "This system has {} unknowns in {} equations, so it has infinitely many solutions.\n",
                    unknowns, equations
                )];
                lines.extend(expressions.iter().map(|e| format!("{}\n", e)));
                lines.extend(
                    free.iter()
                        .map(|i| format!("{} = any value\n", unknown_name(*i))),
                );
                lines
            }
        }
    }
}

impl Display for Solution {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for l in self.report_lines() {
            f.write_str(&l)?;
        }
        Ok(())
    }
}
