/// Asserts that a numerical value is in the provided interval `[a,b]` and panics
/// with a helpful message if not
///
/// ### Example
/// ```ignore
/// let width = 0;
/// assert_interval!(width, 1, i32::MAX);
/// ```
/// This will panic with the message "Invalid value for \`width\`. Must be in the interval \[1, 2147483647\]."
#[macro_export]
macro_rules! assert_interval {
    ($var:expr, $a:expr, $b:expr) => {
        assert!(
            $var >= $a && $var <= $b,
            "Invalid value for `{}`. Must be in the interval [{}, {}].",
            stringify!($var),
            $a,
            $b,
        );
    };
}

/// Round to the nearest integer, ties to even
///
/// Host engines hand over continuous positions rounded this way, so `2.5` lands on `2`
/// and `3.5` on `4`.
pub(crate) fn round_to_i32(v: f32) -> i32 {
    v.round_ties_even() as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_ties_to_even() {
        assert_eq!(round_to_i32(2.5), 2);
        assert_eq!(round_to_i32(3.5), 4);
        assert_eq!(round_to_i32(-0.5), 0);
        assert_eq!(round_to_i32(4.49), 4);
        assert_eq!(round_to_i32(4.51), 5);
    }

    #[test]
    #[should_panic(expected = "Invalid value for `width`")]
    fn interval_panics_outside() {
        let width = 0;
        assert_interval!(width, 1, i32::MAX);
    }
}
