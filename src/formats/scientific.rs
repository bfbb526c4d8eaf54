//! Exponential number formatting for weight files
//!
//! Weight files write floats as `<mantissa>e<sign><exponent>` with a
//! fractional mantissa and at least two exponent digits, e.g. `1.0e+00`,
//! `-9.99e+02`, `1.3819e+02`.

/// Format with the shortest mantissa that round-trips to `value`.
pub fn format_scientific(value: f64) -> String {
    normalize(&format!("{value:e}"))
}

/// Format with a fixed number of fractional mantissa digits.
pub fn format_scientific_with_precision(value: f64, digits: usize) -> String {
    normalize(&format!("{value:.digits$e}"))
}

/// Rewrite Rust's `1.5e-3` / `5e0` exponent style into `1.5e-03` / `5.0e+00`.
fn normalize(repr: &str) -> String {
    let Some((mantissa, exponent)) = repr.split_once('e') else {
        // inf / NaN carry no exponent
        return repr.to_string();
    };
    let (sign, digits) = match exponent.strip_prefix('-') {
        Some(digits) => ('-', digits),
        None => ('+', exponent),
    };
    let fraction = if mantissa.contains('.') { "" } else { ".0" };
    format!("{mantissa}{fraction}e{sign}{digits:0>2}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0.0, "0.0e+00")]
    #[case(1.0, "1.0e+00")]
    #[case(0.5, "5.0e-01")]
    #[case(138.19, "1.3819e+02")]
    #[case(-999.0, "-9.99e+02")]
    #[case(-0.125, "-1.25e-01")]
    #[case(1e-7, "1.0e-07")]
    #[case(2.5e120, "2.5e+120")]
    fn test_format_scientific(#[case] value: f64, #[case] expected: &str) {
        assert_eq!(format_scientific(value), expected);
    }

    #[rstest]
    #[case(0.5, 2, "5.00e-01")]
    #[case(1.0, 1, "1.0e+00")]
    #[case(123.456, 3, "1.235e+02")]
    fn test_format_with_precision(
        #[case] value: f64,
        #[case] digits: usize,
        #[case] expected: &str,
    ) {
        assert_eq!(format_scientific_with_precision(value, digits), expected);
    }

    #[test]
    fn test_round_trip() {
        for value in [0.1, 3.14159265, -2.0e-5, 1234.5] {
            let text = format_scientific(value);
            assert_eq!(text.parse::<f64>().unwrap(), value);
        }
    }
}
