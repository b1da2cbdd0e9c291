//! Display formatting for results and durations

/// Format a computation result for display.
///
/// Rounds to 8 decimal places and strips trailing zeros so that binary
/// floating-point artifacts (`0.1 + 0.2`) do not reach the display.
/// Negative zero prints as `0`.
#[must_use]
pub fn format_result(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let rounded = if value.fract() == 0.0 {
        value
    } else {
        format!("{value:.8}").parse::<f64>().unwrap_or(value)
    };
    if rounded == 0.0 {
        return "0".to_string();
    }
    rounded.to_string()
}

/// Format whole seconds as `MM:SS`, or `HH:MM:SS` from one hour up
#[must_use]
pub fn format_seconds(total_seconds: u64) -> String {
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;
    if hours > 0 {
        format!("{hours:02}:{minutes:02}:{seconds:02}")
    } else {
        format!("{minutes:02}:{seconds:02}")
    }
}

/// Format milliseconds as `MM:SS.hh`, or `HH:MM:SS` from one hour up
#[must_use]
pub fn format_millis(ms: u64) -> String {
    let hours = ms / 3_600_000;
    let minutes = (ms % 3_600_000) / 60_000;
    let seconds = (ms % 60_000) / 1000;
    let hundredths = (ms % 1000) / 10;
    if hours > 0 {
        format!("{hours:02}:{minutes:02}:{seconds:02}")
    } else {
        format!("{minutes:02}:{seconds:02}.{hundredths:02}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_result_integer() {
        assert_eq!(format_result(16.0), "16");
        assert_eq!(format_result(-4.0), "-4");
    }

    #[test]
    fn test_format_result_strips_float_noise() {
        assert_eq!(format_result(0.1 + 0.2), "0.3");
        assert_eq!(format_result(1.0 / 3.0), "0.33333333");
        assert_eq!(format_result(2.0 / 3.0), "0.66666667");
    }

    #[test]
    fn test_format_result_trailing_zeros() {
        assert_eq!(format_result(2.5), "2.5");
        assert_eq!(format_result(0.125), "0.125");
    }

    #[test]
    fn test_format_result_negative_zero() {
        assert_eq!(format_result(-0.0), "0");
        assert_eq!(format_result(-0.000_000_001), "0");
    }

    #[test]
    fn test_format_result_large_integer_has_no_exponent() {
        assert_eq!(format_result(1e21), "1000000000000000000000");
    }

    #[test]
    fn test_format_seconds() {
        assert_eq!(format_seconds(0), "00:00");
        assert_eq!(format_seconds(300), "05:00");
        assert_eq!(format_seconds(59), "00:59");
        assert_eq!(format_seconds(3_661), "01:01:01");
    }

    #[test]
    fn test_format_millis() {
        assert_eq!(format_millis(0), "00:00.00");
        assert_eq!(format_millis(1_234), "00:01.23");
        assert_eq!(format_millis(61_009), "01:01.00");
        assert_eq!(format_millis(3_600_000), "01:00:00");
    }
}
