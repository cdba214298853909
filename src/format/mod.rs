use std::ops::Range;

use chrono::DateTime;

// Units-based suffixes for human formatting.
const UNITS: &[&str] = &["", " K", " M", " G", " T", " P", " E", " Z", " Y"];
// SI suffixes for byte sizes.
const BYTE_UNITS: &[&str] = &["B", "kB", "MB", "GB", "TB", "PB", "EB"];

#[derive(Debug)]
pub struct F64Formatter {
    /// Decimals digits to be used
    decimals: usize,
    /// Number of times the value will be divided by 1000
    divisor: u8,
    /// Suffix (typically units) to be printed after number
    suffix: &'static str,
}

impl F64Formatter {
    /// Initializes a new `F64Formatter` for formatting numbers in the
    /// provided range (typically, the range of an axis).
    pub fn new_with_range(range: Range<f64>) -> F64Formatter {
        let difference = range.end - range.start;
        if difference == 0.0 || !difference.is_finite() {
            return F64Formatter {
                decimals: 3,
                divisor: 0,
                suffix: UNITS[0],
            };
        }
        let log = difference.abs().log10() as i64;
        let (decimals, divisor) = if log <= 0 {
            ((-log as usize).min(8) + 3, 0)
        } else {
            (log.rem_euclid(3) as usize, ((log - 1) / 3).min(5) as u8)
        };
        F64Formatter {
            decimals,
            divisor,
            suffix: UNITS[divisor as usize],
        }
    }

    pub fn format(&self, number: f64) -> String {
        format!(
            "{:.*}{}",
            self.decimals,
            number / 1000_usize.pow(self.divisor.into()) as f64,
            self.suffix
        )
    }
}

/// Formats an amount of bytes the way humans like to read them: "82 MB",
/// "1.5 kB", "7 B".
pub fn format_bytes(bytes: f64) -> String {
    if !bytes.is_finite() || bytes < 10.0 {
        return format!("{} B", bytes.max(0.0) as u64);
    }
    let exponent = ((bytes.log10() / 3.0).floor() as usize).min(BYTE_UNITS.len() - 1);
    let value = (bytes / 1000_f64.powi(exponent as i32) * 10.0 + 0.5).floor() / 10.0;
    if value < 10.0 {
        format!("{:.1} {}", value, BYTE_UNITS[exponent])
    } else {
        format!("{:.0} {}", value, BYTE_UNITS[exponent])
    }
}

/// Formats a time ordinal (seconds since the unix epoch) as a date.
pub fn format_timestamp(seconds: f64) -> String {
    match DateTime::from_timestamp(seconds.round() as i64, 0) {
        Some(date_time) => date_time.format("%Y-%m-%d").to_string(),
        None => format!("{}", seconds),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_human_format_from_zero() {
        assert_eq!(F64Formatter::new_with_range(0.0..2.0).format(1.12), "1.120");
        assert_eq!(
            F64Formatter::new_with_range(0.0..200.0).format(234.12),
            "234.12"
        );
        assert_eq!(
            F64Formatter::new_with_range(0.0..1000.0).format(234.1234),
            "234"
        );
        assert_eq!(
            F64Formatter::new_with_range(0.0..100000.0).format(234.1234),
            "0.23 K"
        );
        assert_eq!(
            F64Formatter::new_with_range(0.0..100000000.0).format(12340000.1234),
            "12.34 M"
        );
    }

    #[test]
    fn test_human_format_degenerate_range() {
        assert_eq!(F64Formatter::new_with_range(5.0..5.0).format(5.0), "5.000");
        assert_eq!(
            F64Formatter::new_with_range(0.0..f64::NAN).format(1.0),
            "1.000"
        );
    }

    #[test]
    fn test_human_format_negative_start() {
        assert_eq!(
            F64Formatter::new_with_range(-4.0..-2.0).format(-3.12),
            "-3.120"
        );
        assert_eq!(
            F64Formatter::new_with_range(-10000000.0..10.0).format(-3.12),
            "-0.0 M"
        );
    }

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(0.0), "0 B");
        assert_eq!(format_bytes(7.0), "7 B");
        assert_eq!(format_bytes(82.0), "82 B");
        assert_eq!(format_bytes(1500.0), "1.5 kB");
        assert_eq!(format_bytes(82_854_982.0), "83 MB");
        assert_eq!(format_bytes(2_500_000_000.0), "2.5 GB");
        assert_eq!(format_bytes(-3.0), "0 B");
    }

    #[test]
    fn test_format_timestamp() {
        assert_eq!(format_timestamp(0.0), "1970-01-01");
        assert_eq!(format_timestamp(1618467931.0), "2021-04-15");
    }
}
