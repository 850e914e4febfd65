//! Read systems from comma-separated text: one equation per line, the
//! coefficients of `x1, x2, ...` followed by the constant term.
//!
//! ```text
//! 2, 1, -1
//! 1, -1, 3
//! ```
//!
//! Blank lines are skipped and cells may be wrapped in double quotes. Every
//! cell is parsed as a [`Rational`], so integers, decimals and fractions such
//! as `7/4` can be mixed freely.

use std::{fs, path::Path};

use tracing::debug;

use crate::{
    domains::rational::Rational,
    equation::LinearEquation,
    error::LinearSystemError,
    system::EquationSystem,
};

/// Parse a single line into an equation. Cells may be quoted, as spreadsheet
/// exports do: `"1","-2/3","4"`.
pub fn parse_row(line: &str) -> Result<LinearEquation, LinearSystemError> {
    LinearEquation::new(
        line.split(',')
            .map(|cell| unquote(cell).parse::<Rational>())
            .collect::<Result<Vec<_>, _>>()?,
    )
}

fn unquote(cell: &str) -> &str {
    let cell = cell.trim();
    cell.strip_prefix('"')
        .and_then(|c| c.strip_suffix('"'))
        .unwrap_or(cell)
}

/// Parse a whole system. Errors are annotated with the 1-based line they stem from.
pub fn parse_system(text: &str) -> Result<EquationSystem, LinearSystemError> {
    let mut equations = vec![];
    let mut expected = None;

    for (i, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }

        let equation = parse_row(line).map_err(|e| e.at_line(i + 1))?;
        match expected {
            None => expected = Some(equation.len()),
            Some(len) if len != equation.len() => {
                return Err(LinearSystemError::dimension_mismatch(len, equation.len())
                    .at_line(i + 1))
            }
            Some(_) => {}
        }
        equations.push(equation);
    }

    if equations.is_empty() {
        return Err(LinearSystemError::MalformedEquation(
            "the input does not contain any equation".to_owned(),
        ));
    }

    debug!("Read {} equations", equations.len());
    EquationSystem::new(equations)
}

/// Read and parse the system stored in `path`.
pub fn read_system(path: impl AsRef<Path>) -> Result<EquationSystem, LinearSystemError> {
    let text = fs::read_to_string(path.as_ref())?;
    debug!("Loaded {}", path.as_ref().display());
    parse_system(&text)
}
