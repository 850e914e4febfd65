//! Systems of linear equations and their step-by-step reduction.
//!
//! An [`EquationSystem`] keeps every equation together with the number it was
//! given on construction, so that the narration can keep referring to `E3` even
//! after rows have been sorted, eliminated or deleted.

mod elimination;
pub mod narration;
pub mod solution;

use std::fmt::{Display, Formatter, Write};

use ahash::HashSet;
use tracing::debug;

use crate::{equation::LinearEquation, error::LinearSystemError};

use self::{narration::Narration, solution::unknown_name};

/// An equation together with its stable, 1-based identifier.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NumberedEquation {
    pub number: usize,
    pub equation: LinearEquation,
}

#[derive(Clone, Debug)]
pub struct EquationSystem {
    equations: Vec<NumberedEquation>,
    num_coefficients: usize,
    narration: Narration,
    silent: bool,
}

impl EquationSystem {
    /// Create a system, numbering the equations from 1 in the given order.
    pub fn new<I: IntoIterator<Item = LinearEquation>>(
        equations: I,
    ) -> Result<EquationSystem, LinearSystemError> {
        let equations: Vec<NumberedEquation> = equations
            .into_iter()
            .enumerate()
            .map(|(i, equation)| NumberedEquation {
                number: i + 1,
                equation,
            })
            .collect();

        let num_coefficients = match equations.first() {
            Some(e) => e.equation.len(),
            None => {
                return Err(LinearSystemError::MalformedEquation(
                    "a system requires at least one equation".to_owned(),
                ))
            }
        };

        if let Some(e) = equations
            .iter()
            .find(|e| e.equation.len() != num_coefficients)
        {
            return Err(LinearSystemError::dimension_mismatch(
                num_coefficients,
                e.equation.len(),
            ));
        }

        Ok(EquationSystem {
            equations,
            num_coefficients,
            narration: Narration::new(),
            silent: false,
        })
    }

    /// The surviving equations in their current order.
    pub fn equations(&self) -> &[NumberedEquation] {
        &self.equations
    }

    /// The length shared by all equations, including the constant term.
    pub fn num_coefficients(&self) -> usize {
        self.num_coefficients
    }

    pub fn num_unknowns(&self) -> usize {
        self.num_coefficients - 1
    }

    pub fn len(&self) -> usize {
        self.equations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.equations.is_empty()
    }

    /// Look up an equation by its identifier.
    pub fn get(&self, number: usize) -> Option<&LinearEquation> {
        self.equations
            .iter()
            .find(|e| e.number == number)
            .map(|e| &e.equation)
    }

    /// The explanation recorded by the last call to [`EquationSystem::solve`].
    pub fn narration(&self) -> &Narration {
        &self.narration
    }

    /// Drop the unknowns that have a zero coefficient in every equation and keep
    /// a single representative of every group of equivalent equations.
    pub fn minimize(&mut self) {
        let unused = self.remove_unused_unknowns();
        if !unused.is_empty() {
            let names: Vec<_> = unused.iter().map(|i| unknown_name(*i)).collect();
            self.narration.step(format!(
                "The system has been checked and some unknowns were never used (their coefficient is always zero): {} {} excluded from the system and the remaining unknowns are renumbered.\n",
                names.join(", "),
                if names.len() == 1 { "is" } else { "are" }
            ));
            self.narrate_state();
        }

        let removed = self.remove_duplicate_equations();
        if !removed.is_empty() {
            let names: Vec<_> = removed.iter().map(|n| format!("E{}", n)).collect();
            self.narration.step(format!(
                "The system has been checked and some equations were equivalent to each other: only one of them has been kept (removed {}).\n",
                names.join(", ")
            ));
            self.narrate_state();
        }
    }

    /// Remove every unknown whose coefficient is zero in all equations and return
    /// their original 0-based positions.
    fn remove_unused_unknowns(&mut self) -> Vec<usize> {
        let unused: Vec<usize> = (0..self.num_unknowns())
            .filter(|&c| self.equations.iter().all(|e| e.equation[c].is_zero()))
            .collect();

        // back to front so that the remaining positions stay valid
        for &c in unused.iter().rev() {
            for e in &mut self.equations {
                e.equation.remove_unknown(c);
            }
        }
        self.num_coefficients -= unused.len();

        if !unused.is_empty() {
            debug!("Removed unused unknowns {:?}", unused);
        }
        unused
    }

    /// Keep the first equation of every equivalence class and return the numbers
    /// of the removed ones.
    fn remove_duplicate_equations(&mut self) -> Vec<usize> {
        let mut seen = HashSet::default();
        let mut removed = vec![];

        self.equations.retain(|e| {
            if seen.insert(e.equation.canonical_form()) {
                true
            } else {
                removed.push(e.number);
                false
            }
        });

        if !removed.is_empty() {
            debug!("Removed equivalent equations {:?}", removed);
        }
        removed
    }

    /// Delete every equation that became identically zero.
    fn remove_zero_equations(&mut self) {
        self.equations.retain(|e| !e.equation.is_zero());
    }

    fn narrate_state(&mut self) {
        let state = format!("{}\n", self);
        self.narration.step(state);
    }
}

impl Display for EquationSystem {
    /// One line per equation: `E<number>: <equation>`.
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for e in &self.equations {
            f.write_fmt(format_args!("E{}: {}", e.number, e.equation))?;
            f.write_char('\n')?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use crate::{equation::LinearEquation, error::LinearSystemError};

    use super::EquationSystem;

    fn system(rows: &[&[&str]]) -> EquationSystem {
        EquationSystem::new(
            rows.iter()
                .map(|r| LinearEquation::parse(r.iter().copied()).unwrap()),
        )
        .unwrap()
    }

    #[test]
    fn construction() {
        assert!(matches!(
            EquationSystem::new(Vec::new()),
            Err(LinearSystemError::MalformedEquation(_))
        ));

        let unpaired = vec![
            LinearEquation::parse(["1", "2", "3"]).unwrap(),
            LinearEquation::parse(["1", "2"]).unwrap(),
        ];
        assert!(matches!(
            EquationSystem::new(unpaired),
            Err(LinearSystemError::DimensionMismatch {
                expected: 3,
                found: 2
            })
        ));

        let s = system(&[
            &["5.3", "-2", "3", "8.8"],
            &["-3", "4.2", "3", "2/7"],
            &["1", "-5/3", "6.2", "4"],
        ]);
        assert_eq!(s.num_coefficients(), 4);
        assert_eq!(s.equations()[2].number, 3);
        assert_eq!(
            s.to_string(),
            "E1: 53/10 x1 - 2 x2 + 3 x3 + 44/5 = 0\nE2: - 3 x1 + 21/5 x2 + 3 x3 + 2/7 = 0\nE3: 1 x1 - 5/3 x2 + 31/5 x3 + 4 = 0\n"
        );
    }

    #[test]
    fn unused_unknowns() {
        let mut s = system(&[
            &["0", "5.3", "-2", "3", "0", "8.8"],
            &["0", "-3", "4.2", "3", "0", "2/7"],
            &["0", "1", "-5/3", "6.2", "0", "4"],
        ]);
        assert_eq!(s.num_coefficients(), 6);
        assert_eq!(
            s.to_string(),
            "E1: 0 x1 + 53/10 x2 - 2 x3 + 3 x4 + 0 x5 + 44/5 = 0\nE2: 0 x1 - 3 x2 + 21/5 x3 + 3 x4 + 0 x5 + 2/7 = 0\nE3: 0 x1 + 1 x2 - 5/3 x3 + 31/5 x4 + 0 x5 + 4 = 0\n"
        );

        assert_eq!(s.remove_unused_unknowns(), vec![0, 4]);
        assert_eq!(s.num_coefficients(), 4);
        assert_eq!(
            s.to_string(),
            "E1: 53/10 x1 - 2 x2 + 3 x3 + 44/5 = 0\nE2: - 3 x1 + 21/5 x2 + 3 x3 + 2/7 = 0\nE3: 1 x1 - 5/3 x2 + 31/5 x3 + 4 = 0\n"
        );

        assert!(s.remove_unused_unknowns().is_empty());
        assert_eq!(s.num_coefficients(), 4);
    }

    #[test]
    fn zero_equations() {
        let mut s = system(&[
            &["5.3", "-2", "3", "8.8"],
            &["0", "0", "0", "0"],
            &["1", "-5/3", "6.2", "4"],
        ]);
        s.remove_zero_equations();
        assert_eq!(s.len(), 2);
        assert_eq!(s.equations()[0].number, 1);
        assert_eq!(s.equations()[1].number, 3);
        assert!(s.get(2).is_none());
        assert_eq!(
            s.get(3).unwrap(),
            &LinearEquation::parse(["1", "-5/3", "6.2", "4"]).unwrap()
        );
    }

    #[test]
    fn duplicates_keep_first_representative() {
        let mut s = system(&[
            &["1", "2", "3"],
            &["0", "1", "1"],
            &["2", "4", "6"],
            &["0", "-3", "-3"],
            &["1", "1", "1"],
        ]);
        assert_eq!(s.remove_duplicate_equations(), vec![3, 4]);
        let numbers: Vec<_> = s.equations().iter().map(|e| e.number).collect();
        assert_eq!(numbers, vec![1, 2, 5]);
    }

    #[test]
    fn minimize_narrates_changes() {
        let mut s = system(&[&["1", "0", "2"], &["3", "0", "6"], &["1", "0", "-1"]]);
        s.minimize();
        assert_eq!(s.num_coefficients(), 2);
        assert_eq!(s.len(), 2);
        assert_eq!(s.to_string(), "E1: 1 x1 + 2 = 0\nE3: 1 x1 - 1 = 0\n");

        let text = s.narration().transcript(false);
        assert!(text.contains("x2 is excluded"));
        assert!(text.contains("removed E2"));
        assert!(s.narration().transcript(true).is_empty());
    }
}
