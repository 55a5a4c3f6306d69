/// Sentinel used when a media duration is not known (file uploads).
pub const UNKNOWN_CLOCK: &str = "--:--";

/// Format a seconds value as `MM:SS`.
///
/// Used for both video durations and subtitle timestamps. Minutes are not
/// clamped, so values of 100 minutes or more render with three digits;
/// zero or negative input yields `"00:00"`.
pub fn format_clock(seconds: f64) -> String {
    if seconds <= 0.0 {
        return "00:00".to_string();
    }
    let total = seconds.floor() as u64;
    format!("{:02}:{:02}", total / 60, total % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_clock() {
        assert_eq!(format_clock(0.0), "00:00");
        assert_eq!(format_clock(5.0), "00:05");
        assert_eq!(format_clock(59.999), "00:59");
        assert_eq!(format_clock(60.0), "01:00");
        assert_eq!(format_clock(125.0), "02:05");
        assert_eq!(format_clock(3599.0), "59:59");
    }

    #[test]
    fn test_format_clock_degenerate_input() {
        assert_eq!(format_clock(-1.0), "00:00");
        assert_eq!(format_clock(0.4), "00:00");
    }

    #[test]
    fn test_minutes_are_not_clamped() {
        // 100+ minute media keeps the full minute count
        assert_eq!(format_clock(6000.0), "100:00");
        assert_eq!(format_clock(6125.0), "102:05");
    }
}
