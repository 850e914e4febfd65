//! Property-based tests for exact rational arithmetic.

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use rug::Integer;

    use crate::domains::rational::Rational;

    fn small_int() -> impl Strategy<Value = i64> {
        -1000i64..1000i64
    }

    fn non_zero_int() -> impl Strategy<Value = i64> {
        prop_oneof![(-1000i64..=-1i64), (1i64..=1000i64)]
    }

    fn any_rational() -> impl Strategy<Value = Rational> {
        (any::<i64>(), any::<i64>().prop_filter("non-zero", |d| *d != 0))
            .prop_map(|(n, d)| Rational::new(n, d).unwrap())
    }

    fn is_canonical(r: &Rational) -> bool {
        let (num, den) = (r.numerator(), r.denominator());
        den > 0 && num.clone().gcd(&den) == 1
    }

    proptest! {
        #[test]
        fn always_reduced(n in any::<i64>(), d in any::<i64>().prop_filter("non-zero", |d| *d != 0)) {
            let r = Rational::new(n, d).unwrap();
            prop_assert!(is_canonical(&r));
            prop_assert_eq!(
                r.numerator() * Integer::from(d),
                r.denominator() * Integer::from(n)
            );
        }

        #[test]
        fn operations_stay_reduced(a in any_rational(), b in any_rational()) {
            prop_assert!(is_canonical(&(&a + &b)));
            prop_assert!(is_canonical(&(&a - &b)));
            prop_assert!(is_canonical(&(&a * &b)));
            prop_assert!(is_canonical(&-&a));
            if !b.is_zero() {
                prop_assert!(is_canonical(&a.checked_div(&b).unwrap()));
            }
        }

        #[test]
        fn display_round_trip(a in any_rational()) {
            let parsed: Rational = a.to_string().parse().unwrap();
            prop_assert_eq!(parsed, a);
        }

        #[test]
        fn multiplicative_identity(a in any_rational()) {
            prop_assert_eq!(&a * &Rational::one(), a);
        }

        #[test]
        fn add_sub_inverse(a in any_rational(), b in any_rational()) {
            prop_assert_eq!(&(&a + &b) - &b, a);
        }

        #[test]
        fn div_mul_inverse(a in small_int(), b in non_zero_int(), c in non_zero_int()) {
            let x = Rational::new(a, b).unwrap();
            let y = Rational::from(c);
            prop_assert_eq!(x.checked_div(&y).unwrap() * y, x);
        }

        #[test]
        fn ordering_matches_cross_multiplication(a in any_rational(), b in any_rational()) {
            let lhs = a.numerator() * b.denominator();
            let rhs = b.numerator() * a.denominator();
            prop_assert_eq!(a.cmp(&b), lhs.cmp(&rhs));
        }

        #[test]
        fn decimals_are_exact(n in small_int(), places in 0u32..6) {
            let text = format!("{}e-{}", n, places);
            let r: Rational = text.parse().unwrap();
            prop_assert_eq!(r, Rational::new(n, 10i64.pow(places)).unwrap());
        }
    }
}
