pub fn gcd_signed(mut a: i64, mut b: i64) -> u64 {
    let mut c;
    while a != 0 {
        c = a;
        // only wraps when i64::MIN % -1 and that still yields 0
        a = b.wrapping_rem(a);
        b = c;
    }
    b.unsigned_abs()
}

/// Write `terms` as a signed sum: the first term carries a sign token only when
/// it is negative, the following ones are joined with ` + ` or ` - `.
/// Every term is given as `(is_negative, magnitude)`.
pub fn write_signed_terms<I, T>(f: &mut impl std::fmt::Write, terms: I) -> std::fmt::Result
where
    I: IntoIterator<Item = (bool, T)>,
    T: std::fmt::Display,
{
    for (i, (negative, magnitude)) in terms.into_iter().enumerate() {
        match (i, negative) {
            (0, false) => write!(f, "{}", magnitude)?,
            (0, true) => write!(f, "- {}", magnitude)?,
            (_, false) => write!(f, " + {}", magnitude)?,
            (_, true) => write!(f, " - {}", magnitude)?,
        }
    }
    Ok(())
}
