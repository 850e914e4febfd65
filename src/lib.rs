//! Exact solving of linear systems, one explained step at a time.
//!
//! Equations are stored with arbitrary precision rational coefficients, reduced
//! with partial-pivoting Gauss-Jordan elimination and classified as having a
//! unique solution, no solution or infinitely many solutions. Every step of the
//! reduction is recorded in a narration that can be shown to the user.
//!
//! For example:
//!
//! ```
//! use linsys::{equation::LinearEquation, system::EquationSystem};
//!
//! fn main() {
//!     let system = EquationSystem::new([
//!         LinearEquation::from_scalars([2, 1, -1]).unwrap(),
//!         LinearEquation::from_scalars([1, -1, 3]).unwrap(),
//!     ]);
//!     let mut system = system.unwrap();
//!
//!     let solution = system.solve(false).unwrap();
//!     assert!(solution.is_unique());
//!     print!("{}", system.output());
//! }
//! ```

pub mod domains;
pub mod equation;
pub mod error;
pub mod loader;
pub mod system;
pub mod utils;

pub use domains::{rational::Rational, scalar::Scalar};
pub use equation::LinearEquation;
pub use error::LinearSystemError;
pub use system::{solution::Solution, EquationSystem};
