use thiserror::Error;

/// Errors raised by the rational arithmetic, the equation algebra and the
/// elimination engine.
#[derive(Debug, Error)]
pub enum LinearSystemError {
    #[error("malformed equation: {0}")]
    MalformedEquation(String),
    #[error("dimension mismatch: expected {expected} coefficients, found {found}")]
    DimensionMismatch { expected: usize, found: usize },
    #[error("division by zero: {0}")]
    DivisionByZero(String),
    #[error("invalid comparison: {0}")]
    InvalidComparison(String),
    #[error("invalid number `{input}`: {reason}")]
    InvalidNumber { input: String, reason: &'static str },
    #[error("line {line}: {source}")]
    Row {
        line: usize,
        #[source]
        source: Box<LinearSystemError>,
    },
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl LinearSystemError {
    pub(crate) fn dimension_mismatch(expected: usize, found: usize) -> LinearSystemError {
        LinearSystemError::DimensionMismatch { expected, found }
    }

    pub(crate) fn invalid_number(input: &str, reason: &'static str) -> LinearSystemError {
        LinearSystemError::InvalidNumber {
            input: input.to_owned(),
            reason,
        }
    }

    /// Attach the 1-based input line to an error raised while reading a row.
    pub fn at_line(self, line: usize) -> LinearSystemError {
        LinearSystemError::Row {
            line,
            source: Box::new(self),
        }
    }
}
