//! Countdown arithmetic for deployment expiry
//!
//! The countdown is a duration, not a wall-clock time: no calendar or
//! timezone handling is involved.

/// Seconds left until `expiration`, negative once it has passed
pub fn seconds_remaining(expiration: i64, now: i64) -> i64 {
    expiration - now
}

/// Render a duration as zero-padded `HH:MM:SS`.
///
/// Negative durations render as `00:00:00`. Hours are not wrapped at 24.
pub fn format_countdown(total_seconds: i64) -> String {
    let total = total_seconds.max(0);
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;
    format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_zero() {
        assert_eq!(format_countdown(0), "00:00:00");
    }

    #[test]
    fn test_format_ten_minutes() {
        assert_eq!(format_countdown(600), "00:10:00");
    }

    #[test]
    fn test_format_mixed_units() {
        assert_eq!(format_countdown(3661), "01:01:01");
        assert_eq!(format_countdown(59), "00:00:59");
        assert_eq!(format_countdown(3599), "00:59:59");
    }

    #[test]
    fn test_format_does_not_wrap_days() {
        assert_eq!(format_countdown(100 * 3600 + 5), "100:00:05");
    }

    #[test]
    fn test_format_negative_clamps() {
        assert_eq!(format_countdown(-42), "00:00:00");
    }

    #[test]
    fn test_seconds_remaining() {
        assert_eq!(seconds_remaining(1_000, 400), 600);
        assert_eq!(seconds_remaining(1_000, 1_005), -5);
    }
}
