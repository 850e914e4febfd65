//! Gauss-Jordan elimination with partial pivoting over exact rationals.

use std::cmp::Reverse;

use tracing::{debug, instrument};

use crate::{
    domains::rational::Rational,
    error::LinearSystemError,
    system::{
        solution::{unknown_name, ParametricExpression, Solution},
        EquationSystem, NumberedEquation,
    },
};

impl EquationSystem {
    /// Reduce the system, classify it and record every step in the narration.
    ///
    /// The narration of a previous call is discarded. `silent` selects what
    /// [`EquationSystem::output`] shows afterwards; all entries are recorded in
    /// both modes.
    ///
    /// Solving an already reduced system leaves it unchanged and yields the
    /// same solution.
    #[instrument(level = "trace", skip(self))]
    pub fn solve(&mut self, silent: bool) -> Result<Solution, LinearSystemError> {
        self.narration.clear();
        self.silent = silent;

        self.narration
            .step("This is the system we'll start from:\n");
        self.narrate_state();

        self.minimize();

        if self.num_coefficients == 1 && self.equations.iter().all(|e| e.equation.is_zero()) {
            debug!("Only the constant column is left and it is zero");
            return Ok(self.conclude(Solution::AnyValue));
        }

        self.reduce()?;

        self.remove_zero_equations();
        // rows without unknowns left can only differ in their constant
        let merged = self.remove_duplicate_equations();
        if !merged.is_empty() {
            let names: Vec<_> = merged.iter().map(|n| format!("E{}", n)).collect();
            self.narration.step(format!(
                "Some equations reduced to the same contradiction, so only one of them has been kept (removed {}).\n",
                names.join(", ")
            ));
        }
        self.narration
            .step("This is now our final system (with any zero equations deleted).\n");
        self.narrate_state();

        let solution = self.classify()?;
        Ok(self.conclude(solution))
    }

    /// The visible transcript of the last solve, in the mode it was run with.
    pub fn output(&self) -> String {
        self.narration.transcript(self.silent)
    }

    /// The transcript of the last solve, with or without the intermediate steps.
    pub fn transcript(&self, silent: bool) -> String {
        self.narration.transcript(silent)
    }

    fn conclude(&mut self, solution: Solution) -> Solution {
        debug!("Classified system as {:?}", solution);
        for line in solution.report_lines() {
            self.narration.solution(line);
        }
        solution
    }

    /// Bring the system in reduced row echelon form. Every pivot is scaled to 1
    /// and is the only non-zero entry in its column.
    fn reduce(&mut self) -> Result<(), LinearSystemError> {
        let last_column = self.num_unknowns().saturating_sub(1);

        for row in 0..self.equations.len() {
            for col in row..self.num_unknowns() {
                self.narration.step(format!(
                    "We order the equations in descending order of absolute value from row number {} downwards based on the coefficient of {} because we want it to be different from zero.\n",
                    row + 1,
                    unknown_name(col)
                ));

                // stable, so ties keep their current order
                self.equations[row..].sort_by_cached_key(|e| Reverse(e.equation[col].abs()));

                if self.equations[row].equation[col].is_zero() {
                    self.narration.step(
                        "All coefficients of this unknown are already zero, so we move to the next one.\n",
                    );
                    if col == last_column {
                        self.narration
                            .step("There are no more unknowns to go through.\n");
                        self.narrate_state();
                    }
                    continue;
                }

                self.narrate_state();
                self.eliminate_column(row, col)?;
                self.narrate_state();
                self.normalize_pivot(row, col)?;
                self.narrate_state();
                break;
            }
        }

        Ok(())
    }

    /// Subtract a multiple of the pivot row from every other row so that the
    /// pivot column is zero everywhere but in the pivot row.
    fn eliminate_column(&mut self, pivot_row: usize, col: usize) -> Result<(), LinearSystemError> {
        let pivot = self.equations[pivot_row].clone();
        debug!(
            "Pivot {} for {} from E{}",
            pivot.equation[col],
            unknown_name(col),
            pivot.number
        );

        self.narration.step(format!(
            "Now we divide the coefficient of {} (from E{}) by the coefficient of the same unknown from another row/equation, obtaining a factor, and then we subtract E{} multiplied by that factor from the other row/equation. We repeat this process for every row/equation.\n",
            unknown_name(col),
            pivot.number,
            pivot.number
        ));

        for (i, NumberedEquation { number, equation }) in self.equations.iter_mut().enumerate() {
            if i == pivot_row {
                continue;
            }

            let factor = equation[col].checked_div(&pivot.equation[col])?;
            if !factor.is_zero() {
                *equation = equation.try_sub(&(&pivot.equation * &factor))?;
                debug!("E{} -= {} * E{}", number, factor, pivot.number);
            }

            self.narration.step(format!(
                "From E{} we subtract {} * E{}\n",
                number, factor, pivot.number
            ));
        }

        Ok(())
    }

    fn normalize_pivot(&mut self, pivot_row: usize, col: usize) -> Result<(), LinearSystemError> {
        let NumberedEquation { number, equation } = &mut self.equations[pivot_row];

        self.narration.step(format!(
            "We then divide E{} by its own coefficient of {} in order to make it equal to 1 for convenience.\n",
            number,
            unknown_name(col)
        ));

        let pivot = equation[col].clone();
        if !pivot.is_one() {
            *equation = equation.divide(pivot)?;
        }
        Ok(())
    }

    /// Classify a reduced system without zero rows.
    fn classify(&self) -> Result<Solution, LinearSystemError> {
        let unknowns = self.num_unknowns();

        let contradiction = self
            .equations
            .iter()
            .find(|e| e.equation.count_non_zero_unknowns() == 0);

        if self.equations.len() > unknowns || contradiction.is_some() {
            // a surplus row can only exist next to a contradiction, the last
            // row is a fallback
            let culprit = match contradiction.or_else(|| self.equations.last()) {
                Some(e) => e,
                None => return Ok(Solution::AnyValue),
            };
            return Ok(Solution::NoSolution {
                equation_number: culprit.number,
                value: -culprit.equation.constant(),
            });
        }

        let mut led = vec![None; unknowns];
        for e in &self.equations {
            if let Some(lead) = e.equation.leading_unknown() {
                led[lead] = Some(&e.equation);
            }
        }

        let single_terms = self
            .equations
            .iter()
            .all(|e| e.equation.count_non_zero_unknowns() == 1);

        if single_terms && led.iter().all(Option::is_some) {
            let values = led
                .iter()
                .flatten()
                .map(|e| {
                    let lead = e.coefficients().iter().find(|c| !c.is_zero());
                    match lead {
                        Some(c) => (-e.constant()).checked_div(c),
                        None => Ok(Rational::zero()),
                    }
                })
                .collect::<Result<Vec<_>, _>>()?;
            return Ok(Solution::Unique(values));
        }

        let mut expressions = vec![];
        for (unknown, e) in led.iter().enumerate() {
            let Some(e) = e else {
                continue;
            };

            let lead = &e[unknown];
            let terms = e.unknown_coefficients()[unknown + 1..]
                .iter()
                .enumerate()
                .filter(|(_, c)| !c.is_zero())
                .map(|(j, c)| Ok((unknown + 1 + j, (-c).checked_div(lead)?)))
                .collect::<Result<Vec<_>, LinearSystemError>>()?;

            expressions.push(ParametricExpression {
                unknown,
                terms,
                constant: (-e.constant()).checked_div(lead)?,
            });
        }

        let free = led
            .iter()
            .enumerate()
            .filter(|(_, e)| e.is_none())
            .map(|(i, _)| i)
            .collect();

        Ok(Solution::Infinite {
            unknowns,
            equations: self.equations.len(),
            expressions,
            free,
        })
    }
}

#[cfg(test)]
mod test {
    use crate::{
        domains::rational::Rational,
        equation::LinearEquation,
        system::{solution::Solution, EquationSystem},
    };

    fn system(rows: &[&[&str]]) -> EquationSystem {
        EquationSystem::new(
            rows.iter()
                .map(|r| LinearEquation::parse(r.iter().copied()).unwrap()),
        )
        .unwrap()
    }

    fn r(n: i64, d: i64) -> Rational {
        Rational::new(n, d).unwrap()
    }

    #[test]
    fn unique() {
        let mut s = system(&[&["2", "1", "-1"], &["1", "-1", "3"]]);
        let solution = s.solve(false).unwrap();
        assert_eq!(solution, Solution::Unique(vec![r(-2, 3), r(7, 3)]));
        assert_eq!(
            s.to_string(),
            "E1: 1 x1 + 0 x2 + 2/3 = 0\nE2: 0 x1 + 1 x2 - 7/3 = 0\n"
        );
        assert!(s
            .output()
            .ends_with("This system has only one solution, which is:\nx1 = -2/3\nx2 = 7/3\n"));
        assert!(s.output().starts_with("This is the system we'll start from:\n"));
    }

    #[test]
    fn pivot_is_largest_magnitude() {
        let mut s = system(&[&["1", "1", "-3"], &["-4", "2", "0"]]);
        s.solve(false).unwrap();
        assert_eq!(s.equations()[0].number, 2);
        assert!(s
            .transcript(false)
            .contains("From E1 we subtract -1/4 * E2\n"));
    }

    #[test]
    fn inconsistent() {
        let mut s = system(&[&["1", "0", "-13"], &["0", "1", "-9"], &["1", "1", "-15"]]);
        let solution = s.solve(true).unwrap();
        assert_eq!(
            solution,
            Solution::NoSolution {
                equation_number: 2,
                value: Rational::from(7)
            }
        );
        assert_eq!(
            s.output(),
            "From equation 2: 0 = 7\nImpossible: this system has no solution.\n"
        );
    }

    #[test]
    fn contradiction_within_square_system() {
        let mut s = system(&[&["1", "1", "-2"], &["2", "2", "-5"]]);
        let solution = s.solve(true).unwrap();
        assert!(matches!(solution, Solution::NoSolution { .. }));
        assert!(!solution.is_consistent());
    }

    #[test]
    fn infinite() {
        let mut s = system(&[&["1", "-5", "5/2"]]);
        let solution = s.solve(true).unwrap();
        assert_eq!(
            s.output(),
            "This system has 2 unknowns in 1 equations, so it has infinitely many solutions.\nx1 = 5 x2 - 5/2\nx2 = any value\n"
        );
        match solution {
            Solution::Infinite { free, .. } => assert_eq!(free, vec![1]),
            _ => panic!("expected infinitely many solutions"),
        }
    }

    #[test]
    fn free_unknown_between_pivots() {
        let mut s = system(&[&["1", "2", "0", "-1"], &["0", "0", "1", "-3"]]);
        let solution = s.solve(true).unwrap();
        match solution {
            Solution::Infinite {
                expressions, free, ..
            } => {
                assert_eq!(free, vec![1]);
                assert_eq!(expressions.len(), 2);
                assert_eq!(expressions[0].to_string(), "x1 = - 2 x2 + 1");
                assert_eq!(expressions[1].to_string(), "x3 = 3");
            }
            _ => panic!("expected infinitely many solutions"),
        }
    }

    #[test]
    fn trivial() {
        let mut s = system(&[&["0", "0"]]);
        assert_eq!(s.solve(false).unwrap(), Solution::AnyValue);
        assert!(s.output().ends_with(
            "The system is composed by only zeroes, any value of any unknown is a solution.\n"
        ));

        let mut constant_only = system(&[&["0", "0", "0"], &["0", "0", "4"]]);
        assert!(matches!(
            constant_only.solve(true).unwrap(),
            Solution::NoSolution {
                equation_number: 2,
                ..
            }
        ));
    }

    #[test]
    fn idempotent() {
        let mut s = system(&[
            &["5.3", "-2", "3", "8.8"],
            &["-3", "4.2", "3", "2/7"],
            &["1", "-5/3", "6.2", "4"],
        ]);
        let first = s.solve(false).unwrap();
        let state = s.to_string();
        let second = s.solve(false).unwrap();
        assert_eq!(first, second);
        assert_eq!(state, s.to_string());
        assert!(first.is_unique());
    }

    #[test]
    fn each_solve_starts_a_new_transcript() {
        let mut s = system(&[&["1", "-1"]]);
        s.solve(false).unwrap();
        let len = s.narration().len();
        s.solve(false).unwrap();
        assert_eq!(s.narration().len(), len);
    }
}
