use linsys::{
    loader::parse_system, EquationSystem, LinearEquation, LinearSystemError, Rational, Solution,
};

fn solve(text: &str, silent: bool) -> (EquationSystem, Solution) {
    let mut system = parse_system(text).unwrap();
    let solution = system.solve(silent).unwrap();
    (system, solution)
}

#[test]
fn unique_solution() {
    let (system, solution) = solve("2, 1, -1\n1, -1, 3\n", true);

    let values = match &solution {
        Solution::Unique(values) => values.clone(),
        s => panic!("expected a unique solution, got {:?}", s),
    };
    assert_eq!(
        values,
        vec![Rational::new(-2, 3).unwrap(), Rational::new(7, 3).unwrap()]
    );
    assert_eq!(
        system.output(),
        "This system has only one solution, which is:\nx1 = -2/3\nx2 = 7/3\n"
    );

    for row in ["2, 1, -1", "1, -1, 3"] {
        let e = linsys::loader::parse_row(row).unwrap();
        assert!(e.evaluate(&values).unwrap().is_zero());
    }
}

#[test]
fn unique_solution_of_decimal_system() {
    let text = "5.3,-2,3,8.8\n-3,4.2,3,2/7\n1,-5/3,6.2,4\n";
    let mut system = parse_system(text).unwrap();
    assert_eq!(
        system.to_string(),
        "E1: 53/10 x1 - 2 x2 + 3 x3 + 44/5 = 0\nE2: - 3 x1 + 21/5 x2 + 3 x3 + 2/7 = 0\nE3: 1 x1 - 5/3 x2 + 31/5 x3 + 4 = 0\n"
    );

    let values = match system.solve(false).unwrap() {
        Solution::Unique(values) => values,
        s => panic!("expected a unique solution, got {:?}", s),
    };

    for row in text.lines() {
        let e = linsys::loader::parse_row(row).unwrap();
        assert!(e.evaluate(&values).unwrap().is_zero());
    }
}

#[test]
fn no_solution() {
    let (system, solution) = solve("1,0,-13\n0,1,-9\n0,0,7\n", true);
    assert_eq!(
        solution,
        Solution::NoSolution {
            equation_number: 3,
            value: Rational::from(-7)
        }
    );
    assert_eq!(
        system.output(),
        "From equation 3: 0 = -7\nImpossible: this system has no solution.\n"
    );
}

#[test]
fn infinitely_many_solutions() {
    let (system, solution) = solve("1,-5,5/2", false);
    assert!(matches!(solution, Solution::Infinite { unknowns: 2, equations: 1, .. }));

    let full = system.transcript(false);
    assert!(full.starts_with("This is the system we'll start from:\nE1: 1 x1 - 5 x2 + 5/2 = 0\n\n"));
    assert!(full.ends_with(
        "This system has 2 unknowns in 1 equations, so it has infinitely many solutions.\nx1 = 5 x2 - 5/2\nx2 = any value\n"
    ));
    assert_eq!(system.output(), full);
}

#[test]
fn any_value() {
    let (system, solution) = solve("0,0\n", false);
    assert_eq!(solution, Solution::AnyValue);
    assert_eq!(
        system.transcript(true),
        "The system is composed by only zeroes, any value of any unknown is a solution.\n"
    );
}

#[test]
fn minimization_runs_before_elimination() {
    // x2 is never used and E2 is twice E1
    let (system, solution) = solve("1,0,2,-4\n2,0,4,-8\n1,0,-1,-1\n", false);

    let full = system.transcript(false);
    let unused = full.find("x2 is excluded").unwrap();
    let duplicate = full.find("removed E2").unwrap();
    let first_pivot = full.find("We order the equations").unwrap();
    assert!(unused < duplicate && duplicate < first_pivot);

    assert_eq!(system.num_coefficients(), 3);
    assert!(system.get(2).is_none());
    assert_eq!(solution, Solution::Unique(vec![Rational::from(2), Rational::from(1)]));
}

#[test]
fn sign_flipped_rows_are_duplicates() {
    let (system, solution) = solve("1,1,-2\n-1,-1,2\n", true);
    assert_eq!(system.len(), 1);
    assert!(matches!(solution, Solution::Infinite { .. }));
}

#[test]
fn solving_twice_is_idempotent() {
    let mut system = parse_system("3,1,1,-1\n1,-1,2,0\n2,2,-1,-3\n0,4,-5,-3\n").unwrap();
    let first = system.solve(false).unwrap();
    let state = system.to_string();
    let transcript = system.output();

    // E1 contradicts both E3 and E4
    assert!(matches!(first, Solution::NoSolution { .. }));
    assert_eq!(system.len(), 3);

    let second = system.solve(false).unwrap();
    assert_eq!(first, second);
    assert_eq!(state, system.to_string());
    assert_ne!(transcript, system.output());
}

#[test]
fn construction_errors() {
    assert!(matches!(
        EquationSystem::new(Vec::<LinearEquation>::new()),
        Err(LinearSystemError::MalformedEquation(_))
    ));
    assert!(matches!(
        EquationSystem::new([
            LinearEquation::from_scalars([1, 2]).unwrap(),
            LinearEquation::from_scalars([1, 2, 3]).unwrap(),
        ]),
        Err(LinearSystemError::DimensionMismatch { .. })
    ));
}
